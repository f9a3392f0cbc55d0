//! Application shell state: the shared tables, navigation, language, theme,
//! persona and the persisted map.
//!
//! Views read from [`AppState`] and change it only through
//! [`AppState::dispatch`].

use crate::assistant::Persona;
use crate::grid::TableReplacement;
use crate::map::{CityNode, MapIntent, apply_map_intent, default_cities};
use crate::statics;
use crate::store::{LocalStore, Theme};
use crate::table::{Fields, TableError, TableSet};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Ru,
    Olbanian,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::Olbanian => "olbanian",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::Ru => Language::Olbanian,
            Language::Olbanian => Language::Ru,
        }
    }

    /// Pick the localized one of a `RU_`/`OLB_` pair.
    pub fn pick(self, ru: &'static str, olbanian: &'static str) -> &'static str {
        match self {
            Language::Ru => ru,
            Language::Olbanian => olbanian,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageView {
    #[default]
    Home,
    Immigration,
    MinistryOfLaw,
    Constitution,
    Profile,
}

impl PageView {
    pub const NAV: [PageView; 5] = [
        PageView::Home,
        PageView::Immigration,
        PageView::MinistryOfLaw,
        PageView::Constitution,
        PageView::Profile,
    ];

    /// SITE_TEXT key of the navigation label.
    pub fn nav_key(self) -> &'static str {
        match self {
            PageView::Home => "nav_home",
            PageView::Immigration => "nav_imm",
            PageView::MinistryOfLaw => "nav_law",
            PageView::Constitution => "nav_const",
            PageView::Profile => "nav_profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Main,
    Treasury,
    Admin,
}

/// The signed-in citizen. There is no login; the portal runs as one fixed
/// resident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub fio: String,
    pub id: String,
    pub promo: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: statics::PROFILE_NAME.to_string(),
            fio: statics::PROFILE_FIO.to_string(),
            id: statics::PROFILE_ID.to_string(),
            promo: statics::PROFILE_PROMO.to_string(),
        }
    }
}

impl Profile {
    pub fn rank(&self, language: Language) -> &'static str {
        language.pick(statics::RU_PROFILE_RANK, statics::OLB_PROFILE_RANK)
    }
}

/// Every change a view may request of the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum AppIntent {
    Navigate(PageView),
    Back,
    ToggleLanguage,
    ToggleTheme,
    SetPersona(Persona),
    ReplaceTable(TableReplacement),
    PrependRow { table: String, fields: Fields },
    Map(MapIntent),
}

#[derive(Debug)]
pub struct AppState {
    tables: TableSet,
    view: PageView,
    history: Vec<PageView>,
    language: Language,
    theme: Theme,
    persona: Persona,
    profile: Profile,
    cities: Vec<CityNode>,
    map_image: String,
    store: Option<LocalStore>,
    notice: Option<String>,
}

impl AppState {
    /// Shell over `tables`. With a store, the map and theme are loaded from
    /// it and every later change is written back.
    pub fn new(tables: TableSet, store: Option<LocalStore>) -> Self {
        let (cities, map_image, theme) = match &store {
            Some(store) => (store.load_cities(), store.load_map_image(), store.load_theme()),
            None => (
                default_cities(),
                statics::DEFAULT_MAP_IMAGE.to_string(),
                Theme::default(),
            ),
        };
        let language = Language::default();
        Self {
            tables,
            view: PageView::default(),
            history: Vec::new(),
            language,
            theme,
            persona: Persona::from_language(language),
            profile: Profile::default(),
            cities,
            map_image,
            store,
            notice: None,
        }
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn view(&self) -> PageView {
        self.view
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn cities(&self) -> &[CityNode] {
        &self.cities
    }

    pub fn map_image(&self) -> &str {
        &self.map_image
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Localized SITE_TEXT entry. Olbanian falls back to Russian when its cell
    /// is blank; an unknown key reads as itself.
    pub fn t(&self, key: &str) -> String {
        let Some(row) = self
            .tables
            .rows(statics::TBL_SITE_TEXT)
            .iter()
            .find(|r| r.text("key") == key)
        else {
            return key.to_string();
        };
        if self.language == Language::Olbanian {
            let olb = row.text("olbanian");
            if !olb.trim().is_empty() {
                return olb;
            }
        }
        let ru = row.text("ru");
        if ru.trim().is_empty() { key.to_string() } else { ru }
    }

    /// Apply one intent. Returns the id of a newly placed city, if any.
    pub fn dispatch(&mut self, intent: AppIntent) -> Option<String> {
        match intent {
            AppIntent::Navigate(view) => self.set_view(view),
            AppIntent::Back => self.go_back(),
            AppIntent::ToggleLanguage => {
                self.language = self.language.toggled();
                self.persona = Persona::from_language(self.language);
            }
            AppIntent::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.persist_theme();
            }
            AppIntent::SetPersona(persona) => self.persona = persona,
            AppIntent::ReplaceTable(replacement) => {
                let TableReplacement {
                    table,
                    rows,
                    base_revision,
                } = replacement;
                let result = self.tables.replace(&table, rows, base_revision).map(|_| ());
                self.report_table_result(result);
            }
            AppIntent::PrependRow { table, fields } => {
                let result = self.tables.prepend(&table, fields).map(|_| ());
                self.report_table_result(result);
            }
            AppIntent::Map(intent) => return self.apply_map(intent),
        }
        None
    }

    fn set_view(&mut self, view: PageView) {
        if view == self.view {
            return;
        }
        self.history.push(self.view);
        self.view = view;
    }

    fn go_back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.view = previous;
        }
    }

    fn report_table_result(&mut self, result: Result<(), TableError>) {
        if let Err(e) = result {
            warn!(error = %e, "table write refused");
            self.notice = Some(statics::RU_NOTICE_STALE_TABLE.to_string());
        }
    }

    fn apply_map(&mut self, intent: MapIntent) -> Option<String> {
        if let MapIntent::SetImage(url) = &intent {
            self.map_image = url.clone();
        }
        let now_ms = chrono::Utc::now().timestamp_millis();
        let placed = apply_map_intent(&mut self.cities, &intent, now_ms);
        if let Some(id) = &placed {
            info!(id = %id, "placed city node");
        }
        self.persist_map();
        placed
    }

    fn persist_map(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save_map(&self.map_image, &self.cities) {
            warn!(error = %e, "saving map state");
            self.notice = Some(statics::RU_NOTICE_SAVE_FAILED.to_string());
        }
    }

    fn persist_theme(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save_theme(self.theme) {
            warn!(error = %e, "saving theme");
            self.notice = Some(statics::RU_NOTICE_SAVE_FAILED.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppIntent, AppState, Language, PageView};
    use crate::assistant::Persona;
    use crate::map::MapIntent;
    use crate::store::{LocalStore, Theme};
    use crate::table::TableSet;

    fn state() -> AppState {
        let tables = TableSet::from_json5(
            "{ SITE_TEXT: [
                { key: 'nav_home', ru: 'Главная', olbanian: 'ГЛАГНЕ' },
                { key: 'nav_law', ru: 'Право', olbanian: '' },
            ] }",
        )
        .unwrap();
        AppState::new(tables, None)
    }

    #[test]
    fn translation_falls_back_to_russian_then_key() {
        let mut app = state();
        assert_eq!(app.t("nav_home"), "Главная");
        app.dispatch(AppIntent::ToggleLanguage);
        assert_eq!(app.language(), Language::Olbanian);
        assert_eq!(app.t("nav_home"), "ГЛАГНЕ");
        assert_eq!(app.t("nav_law"), "Право");
        assert_eq!(app.t("nope"), "nope");
    }

    #[test]
    fn navigation_keeps_history_and_ignores_same_view() {
        let mut app = state();
        app.dispatch(AppIntent::Navigate(PageView::Home));
        assert!(!app.can_go_back());

        app.dispatch(AppIntent::Navigate(PageView::Constitution));
        app.dispatch(AppIntent::Navigate(PageView::Profile));
        app.dispatch(AppIntent::Back);
        assert_eq!(app.view(), PageView::Constitution);
        app.dispatch(AppIntent::Back);
        app.dispatch(AppIntent::Back);
        assert_eq!(app.view(), PageView::Home);
    }

    #[test]
    fn persona_can_be_changed_without_language() {
        let mut app = state();
        app.dispatch(AppIntent::SetPersona(Persona::Slang));
        assert_eq!(app.persona(), Persona::Slang);
        assert_eq!(app.language(), Language::Ru);
    }

    #[test]
    fn map_and_theme_changes_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let mut app = AppState::new(TableSet::empty(), Some(store.clone()));
        assert_eq!(app.theme(), Theme::Dark);

        let id = app
            .dispatch(AppIntent::Map(MapIntent::Place { x: 10.0, y: 20.0 }))
            .unwrap();
        app.dispatch(AppIntent::Map(MapIntent::SetImage("https://x/map.png".into())));
        app.dispatch(AppIntent::ToggleTheme);

        let reloaded = AppState::new(TableSet::empty(), Some(store));
        assert!(reloaded.cities().iter().any(|c| c.id == id));
        assert_eq!(reloaded.map_image(), "https://x/map.png");
        assert_eq!(reloaded.theme(), Theme::Light);
    }
}
