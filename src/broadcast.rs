//! Broadcast composer: a message for a set of CRM recipients, with inline
//! markup helpers, a media-dependent character budget and inline buttons.
//!
//! Sending is simulated. It writes one summary row for the broadcast log and
//! clears the composer.

use crate::statics;
use crate::table::{Fields, Row};
use crate::value::FieldValue;
use chrono::NaiveDateTime;

pub const TEXT_LIMIT: usize = 4096;
pub const CAPTION_LIMIT: usize = 1024;
pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonKind {
    #[default]
    Url,
    Callback,
    WebApp,
}

impl ButtonKind {
    pub const ALL: [ButtonKind; 3] = [ButtonKind::Url, ButtonKind::Callback, ButtonKind::WebApp];

    pub fn label(self) -> &'static str {
        match self {
            ButtonKind::Url => "URL",
            ButtonKind::Callback => "Callback",
            ButtonKind::WebApp => "WebApp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineButton {
    pub text: String,
    pub kind: ButtonKind,
    pub value: String,
}

/// Markup helpers offered above the message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Bold,
    Italic,
    Code,
    Quote,
}

impl TextStyle {
    fn tags(self) -> (&'static str, &'static str) {
        match self {
            TextStyle::Bold => ("**", "**"),
            TextStyle::Italic => ("__", "__"),
            TextStyle::Code => ("`", "`"),
            TextStyle::Quote => ("> ", ""),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BroadcastError {
    #[error("the message has neither text nor media")]
    EmptyMessage,
    #[error("no recipients selected")]
    NoRecipients,
}

/// A CRM row offered as a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub chat_id: String,
    pub fio: String,
    pub telegram: String,
}

impl Recipient {
    fn from_row(row: &Row) -> Self {
        Self {
            chat_id: row.text(statics::FIELD_CHAT_ID),
            fio: row.text(statics::FIELD_FIO),
            telegram: row.text(statics::FIELD_TELEGRAM),
        }
    }

    fn matches(&self, needle_lower: &str) -> bool {
        [&self.fio, &self.chat_id, &self.telegram]
            .iter()
            .any(|f| f.to_lowercase().contains(needle_lower))
    }
}

/// Byte index of the `char_offset`-th character, clamped to the end.
fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(i, _)| i)
}

/// First `PREVIEW_CHARS` characters, with `...` when the message is longer.
pub fn preview(message: &str) -> String {
    let mut out: String = message.chars().take(PREVIEW_CHARS).collect();
    if message.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct Composer {
    pub text: String,
    pub media_url: String,
    pub buttons: Vec<InlineButton>,
    selected: Vec<String>,
    pub recipient_filter: String,
}

impl Composer {
    pub fn recipients(crm: &[Row]) -> Vec<Recipient> {
        crm.iter().map(Recipient::from_row).collect()
    }

    /// Recipients matching the filter over name, chat id and telegram handle.
    pub fn filtered_recipients(&self, crm: &[Row]) -> Vec<Recipient> {
        let needle = self.recipient_filter.to_lowercase();
        Self::recipients(crm)
            .into_iter()
            .filter(|r| needle.is_empty() || r.matches(&needle))
            .collect()
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, chat_id: &str) -> bool {
        self.selected.iter().any(|id| id == chat_id)
    }

    pub fn toggle_recipient(&mut self, chat_id: &str) {
        if let Some(pos) = self.selected.iter().position(|id| id == chat_id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(chat_id.to_string());
        }
    }

    pub fn all_filtered_selected(&self, crm: &[Row]) -> bool {
        let filtered = self.filtered_recipients(crm);
        !filtered.is_empty()
            && self.selected.len() == filtered.len()
            && filtered.iter().all(|r| self.is_selected(&r.chat_id))
    }

    /// Select the whole filtered set, or clear if it is already selected.
    pub fn toggle_all(&mut self, crm: &[Row]) {
        if self.all_filtered_selected(crm) {
            self.selected.clear();
        } else {
            self.selected = self
                .filtered_recipients(crm)
                .into_iter()
                .map(|r| r.chat_id)
                .collect();
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn char_budget(&self) -> usize {
        if self.media_url.trim().is_empty() {
            TEXT_LIMIT
        } else {
            CAPTION_LIMIT
        }
    }

    pub fn is_over_limit(&self) -> bool {
        self.char_count() > self.char_budget()
    }

    /// Non-blocking notice: how many parts the channel would split into.
    pub fn limit_warning(&self) -> Option<String> {
        if !self.is_over_limit() {
            return None;
        }
        let parts = self.char_count().div_ceil(self.char_budget());
        Some(format!(
            "{} {}. {} {parts}.",
            statics::RU_BROADCAST_OVER_LIMIT,
            self.char_budget(),
            statics::RU_BROADCAST_PARTS
        ))
    }

    /// Insert `{key}` at a caret given in characters. Returns the caret
    /// position after the inserted token.
    pub fn insert_variable(&mut self, key: &str, caret: usize) -> usize {
        let token = format!("{{{key}}}");
        let caret = caret.min(self.char_count());
        let at = byte_index(&self.text, caret);
        self.text.insert_str(at, &token);
        caret + token.chars().count()
    }

    /// Wrap the selected character range in a style's tags.
    pub fn wrap_selection(&mut self, style: TextStyle, start: usize, end: usize) {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let (open, close) = style.tags();
        let a = byte_index(&self.text, start);
        let b = byte_index(&self.text, end);
        let mut out = String::with_capacity(self.text.len() + open.len() + close.len());
        out.push_str(&self.text[..a]);
        out.push_str(open);
        out.push_str(&self.text[a..b]);
        out.push_str(close);
        out.push_str(&self.text[b..]);
        self.text = out;
    }

    pub fn add_button(&mut self) {
        self.buttons.push(InlineButton::default());
    }

    pub fn remove_button(&mut self, idx: usize) {
        if idx < self.buttons.len() {
            self.buttons.remove(idx);
        }
    }

    pub fn can_send(&self) -> bool {
        !self.selected.is_empty()
            && (!self.text.trim().is_empty() || !self.media_url.trim().is_empty())
    }

    /// Produce the broadcast log row and reset the composer.
    pub fn send(&mut self, now: NaiveDateTime) -> Result<Fields, BroadcastError> {
        if self.text.trim().is_empty() && self.media_url.trim().is_empty() {
            return Err(BroadcastError::EmptyMessage);
        }
        if self.selected.is_empty() {
            return Err(BroadcastError::NoRecipients);
        }

        let mut row = Fields::new();
        row.insert(
            "date_sent".to_string(),
            FieldValue::text(now.format("%d.%m.%Y, %H:%M:%S").to_string()),
        );
        row.insert("message".to_string(), FieldValue::text(preview(&self.text)));
        row.insert(
            "chat_ids".to_string(),
            FieldValue::text(format!("{} recipients", self.selected.len())),
        );
        row.insert(
            "status".to_string(),
            FieldValue::text(statics::RU_STATUS_SENT),
        );

        *self = Self::default();
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::{Composer, TextStyle, preview};
    use crate::statics;
    use crate::table::TableSet;

    #[test]
    fn preview_truncates_with_ellipsis() {
        let long = "ж".repeat(60);
        assert_eq!(preview(&long).chars().count(), 53);
        assert!(preview(&long).ends_with("..."));
        assert_eq!(preview("коротко"), "коротко");
    }

    #[test]
    fn variable_is_inserted_at_caret_not_appended() {
        let mut c = Composer {
            text: "Привет, !".to_string(),
            ..Default::default()
        };
        let caret = c.insert_variable("fio", 8);
        assert_eq!(c.text, "Привет, {fio}!");
        assert_eq!(caret, 13);
    }

    #[test]
    fn caret_past_end_appends() {
        let mut c = Composer {
            text: "ab".to_string(),
            ..Default::default()
        };
        c.insert_variable("x", 99);
        assert_eq!(c.text, "ab{x}");
    }

    #[test]
    fn wrap_selection_handles_reversed_range() {
        let mut c = Composer {
            text: "один два".to_string(),
            ..Default::default()
        };
        c.wrap_selection(TextStyle::Bold, 8, 5);
        assert_eq!(c.text, "один **два**");
        c.wrap_selection(TextStyle::Quote, 0, 0);
        assert_eq!(c.text, "> один **два**");
    }

    #[test]
    fn budget_depends_on_media() {
        let mut c = Composer {
            text: "x".repeat(2000),
            ..Default::default()
        };
        assert!(!c.is_over_limit());
        assert!(c.limit_warning().is_none());
        c.media_url = "https://img".to_string();
        assert!(c.is_over_limit());
        assert!(c.limit_warning().unwrap().ends_with(": 2."));
    }

    #[test]
    fn message_at_budget_is_not_over_limit() {
        let mut c = Composer {
            text: "ж".repeat(4096),
            ..Default::default()
        };
        assert!(!c.is_over_limit());
        c.text.push('x');
        assert!(c.is_over_limit());

        c.media_url = "https://img".to_string();
        c.text = "ж".repeat(1024);
        assert!(!c.is_over_limit());
        c.text.push('x');
        assert!(c.is_over_limit());
    }

    #[test]
    fn select_all_covers_the_filtered_set_then_clears() {
        let tables = TableSet::from_json5(
            "{ CRM: [ { chat_id: '1', fio: 'Иван', telegram: '@ivan' }, \
               { chat_id: '2', fio: 'Пётр', telegram: '@petr' }, \
               { chat_id: '3', fio: 'Иванна', telegram: '@anna' } ] }",
        )
        .unwrap();
        let crm = tables.rows(statics::TBL_CRM);
        let mut c = Composer {
            recipient_filter: "ИВАН".to_string(),
            ..Default::default()
        };
        c.toggle_all(crm);
        assert_eq!(c.selected(), ["1", "3"]);
        c.toggle_all(crm);
        assert!(c.selected().is_empty());

        c.toggle_recipient("1");
        c.toggle_all(crm);
        assert_eq!(c.selected(), ["1", "3"]);
    }
}
