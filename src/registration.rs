//! Citizen registration ("immigration") and the green-card export.

use crate::markup::escape_html;
use anyhow::Context;
use rand::Rng;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long the registry "processes" an application before the card shows.
pub const PROCESSING_DELAY: Duration = Duration::from_secs(2);
pub const TITLES: [&str; 5] = ["Dr.", "Mr.", "Mrs.", "Ms.", "Pr."];

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CitizenRole {
    #[default]
    Resident,
    Architect,
}

impl CitizenRole {
    pub fn card_label(self) -> &'static str {
        match self {
            CitizenRole::Resident => "ГРАЖДАНИН",
            CitizenRole::Architect => "АРХИТЕКТОР",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub fio: String,
    /// Callsign for residents, alias for architects.
    pub name: String,
    pub role: CitizenRole,
    pub own_promo: String,
    pub title: String,
    pub tools: String,
    pub spheres: String,
    pub cases: String,
    pub other: String,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            fio: String::new(),
            name: String::new(),
            role: CitizenRole::Resident,
            own_promo: String::new(),
            title: TITLES[0].to_string(),
            tools: String::new(),
            spheres: String::new(),
            cases: String::new(),
            other: String::new(),
        }
    }
}

impl RegistrationForm {
    /// Required fields: name data for everyone, experience for architects.
    pub fn is_complete(&self) -> bool {
        let filled = |s: &String| !s.trim().is_empty();
        let common = filled(&self.fio) && filled(&self.name);
        match self.role {
            CitizenRole::Resident => common,
            CitizenRole::Architect => {
                common && filled(&self.tools) && filled(&self.spheres) && filled(&self.cases)
            }
        }
    }

    pub fn display_name(&self) -> String {
        match self.role {
            CitizenRole::Resident => self.name.trim().to_string(),
            CitizenRole::Architect => format!("{} {}", self.title, self.name.trim()),
        }
    }
}

/// The citizen's own promo uppercased, else `AI-` and five random characters.
pub fn issue_code(own_promo: &str, rng: &mut impl Rng) -> String {
    let own = own_promo.trim();
    if !own.is_empty() {
        return own.to_uppercase();
    }
    let suffix: String = (0..5)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("AI-{suffix}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenCard {
    pub fio: String,
    pub display_name: String,
    pub role: CitizenRole,
    pub code: String,
}

impl GreenCard {
    pub fn file_name(&self) -> String {
        format!("AI-GreenLand-Card-{}.svg", self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegistrationStep {
    #[default]
    Form,
    Processing {
        since: Instant,
        card: GreenCard,
    },
    Card(GreenCard),
}

#[derive(Debug, Default)]
pub struct Registration {
    pub form: RegistrationForm,
    step: RegistrationStep,
    exporting: bool,
}

impl Registration {
    pub fn step(&self) -> &RegistrationStep {
        &self.step
    }

    pub fn submit(&mut self, now: Instant, rng: &mut impl Rng) -> bool {
        if !matches!(self.step, RegistrationStep::Form) || !self.form.is_complete() {
            return false;
        }
        let card = GreenCard {
            fio: self.form.fio.trim().to_string(),
            display_name: self.form.display_name(),
            role: self.form.role,
            code: issue_code(&self.form.own_promo, rng),
        };
        self.step = RegistrationStep::Processing { since: now, card };
        true
    }

    /// Advance past processing once the delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let RegistrationStep::Processing { since, card } = &self.step
            && now.duration_since(*since) >= PROCESSING_DELAY
        {
            self.step = RegistrationStep::Card(card.clone());
        }
    }

    pub fn card(&self) -> Option<&GreenCard> {
        match &self.step {
            RegistrationStep::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Hand out the card for a background export. `None` while an export is
    /// already running or before a card is issued.
    pub fn begin_export(&mut self) -> Option<GreenCard> {
        if self.exporting {
            return None;
        }
        let card = self.card().cloned()?;
        self.exporting = true;
        Some(card)
    }

    pub fn finish_export(&mut self) {
        self.exporting = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Write through a sibling temp file so a failed export leaves nothing behind.
pub fn write_card(path: &Path, card: &GreenCard) -> anyhow::Result<()> {
    let svg = render_card_svg(card);
    let tmp = path.with_extension("svg.part");
    fs::write(&tmp, svg).with_context(|| format!("writing {tmp:?}"))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("moving card into {path:?}"));
    }
    Ok(())
}

/// The green card as a standalone SVG document, in the flag colours.
pub fn render_card_svg(card: &GreenCard) -> String {
    let fio = escape_html(&card.fio);
    let name = escape_html(&card.display_name);
    let code = escape_html(&card.code);
    let name_caption = match card.role {
        CitizenRole::Resident => "Позывной / Callsign",
        CitizenRole::Architect => "Эксперт / Alias",
    };
    let role = card.role.card_label();

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="1152" height="672" viewBox="0 0 384 224">
  <rect width="384" height="224" rx="16" fill="#ffffff"/>
  <path d="M0 112 H384 V208 a16 16 0 0 1 -16 16 H16 a16 16 0 0 1 -16 -16 Z" fill="#C8102E"/>
  <circle cx="150" cy="112" r="56" fill="#C8102E"/>
  <path d="M94 112 a56 56 0 0 0 112 0 Z" fill="#ffffff"/>
  <rect width="384" height="224" rx="16" fill="none" stroke="#FFD700" stroke-width="3"/>
  <g font-family="sans-serif" fill="#0B1120">
    <text x="20" y="34" font-size="18" font-weight="bold" fill="#C8102E">AI-GREENLAND</text>
    <text x="20" y="48" font-size="8" font-weight="bold" fill="#C8102E">OFFICIAL RESIDENT ID</text>
    <text x="230" y="40" font-size="6" font-weight="bold" opacity="0.6">ФИО / FULL NAME</text>
    <text x="230" y="52" font-size="9" font-weight="bold">{fio}</text>
    <text x="230" y="70" font-size="6" font-weight="bold" opacity="0.6">{name_caption}</text>
    <text x="230" y="86" font-size="14" font-weight="bold">{name}</text>
    <text x="230" y="104" font-size="6" font-weight="bold" opacity="0.6">Статус / Role</text>
    <text x="230" y="116" font-size="10" font-weight="bold">{role}</text>
    <rect x="20" y="168" width="344" height="40" rx="8" fill="#ffffff" opacity="0.9"/>
    <text x="32" y="182" font-size="7" font-weight="bold" opacity="0.6">ВАШ КОД / ID</text>
    <text x="32" y="200" font-size="16" font-weight="bold" font-family="monospace" fill="#C8102E">{code}</text>
  </g>
</svg>
"##
    )
}
