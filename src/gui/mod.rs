use crate::ai::{DisabledGenerator, GeminiClient, TextGenerator};
use crate::app::{AppIntent, AppState, PageView, ProfileTab};
use crate::assistant::AssistantChat;
use crate::broadcast::Composer;
use crate::config::Config;
use crate::contract::ContractWizard;
use crate::grid::GridState;
use crate::intake::{IntakeSink, WebhookClient};
use crate::knowledge::KnowledgeDraft;
use crate::map::MapEditor;
use crate::markup::{Span, to_spans};
use crate::registration::Registration;
use crate::statics;
use crate::store::{LocalStore, Theme};
use crate::table::TableSet;
use crate::worker::{Job, JobOutcome, Widget, Worker};
use anyhow::Context;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

mod admin;
mod chat;
mod pages;

pub fn run_gui(config: Config) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let app = GreenlandApp::new(&cc.egui_ctx, &config)?;
            Ok(Box::new(app))
        }),
    )
}

/// Top-level window state. Shared data lives in [`AppState`]; everything else
/// here is per-view UI state.
struct GreenlandApp {
    state: AppState,
    worker: Worker,
    dialog_dir: Option<PathBuf>,
    status: String,

    // Admin panel.
    grid: GridState,
    composer: Composer,
    composer_caret: Option<(usize, usize)>,
    knowledge: KnowledgeDraft,
    map_editor: MapEditor,
    resize_accum: f32,

    // Views.
    wizard: ContractWizard,
    assistant: AssistantChat,
    registration: Registration,
    law_query: String,
    profile_tab: ProfileTab,
}

impl GreenlandApp {
    fn new(ctx: &egui::Context, config: &Config) -> anyhow::Result<Self> {
        egui_extras::install_image_loaders(ctx);
        let generator: Arc<dyn TextGenerator> = match GeminiClient::new(&config.ai) {
            Ok(client) => {
                info!(ai = ?config.ai, "AI service enabled");
                Arc::new(client)
            }
            Err(e) => {
                warn!(error = %e, "AI service disabled");
                Arc::new(DisabledGenerator)
            }
        };
        let intake: Arc<dyn IntakeSink> = Arc::new(
            WebhookClient::new(config.ai.timeouts).context("building the intake client")?,
        );
        let repaint = ctx.clone();
        let worker = Worker::new(generator, intake).with_waker(move || repaint.request_repaint());

        let tables = TableSet::seeded().context("loading seed tables")?;
        let store = LocalStore::new(config.data_dir.clone());
        info!(dir = %store.dir().display(), "local state directory");
        let state = AppState::new(tables, Some(store));
        apply_theme(ctx, state.theme());

        let mut wizard = ContractWizard::default();
        wizard.partner_code = Some(state.profile().promo.clone());

        Ok(Self {
            assistant: AssistantChat::new(state.persona()),
            state,
            worker,
            dialog_dir: None,
            status: String::new(),
            grid: GridState::default(),
            composer: Composer::default(),
            composer_caret: None,
            knowledge: KnowledgeDraft::default(),
            map_editor: MapEditor::default(),
            resize_accum: 0.0,
            wizard,
            registration: Registration::default(),
            law_query: String::new(),
            profile_tab: ProfileTab::default(),
        })
    }

    fn today() -> chrono::NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn dispatch(&mut self, intent: AppIntent) -> Option<String> {
        self.state.dispatch(intent)
    }

    fn report_error(&mut self, text: String) {
        error!("{text}");
        self.state.set_notice(text);
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new();
        if let Some(dir) = self.dialog_dir.clone().or_else(dirs::download_dir) {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    fn remember_dir(&mut self, path: &std::path::Path) {
        self.dialog_dir = path.parent().map(PathBuf::from);
    }

    fn send_assistant(&mut self, text_override: Option<&str>) {
        if let Some((id, request)) = self.assistant.begin_send(self.state.tables(), text_override) {
            self.worker.submit(Job::Generate {
                widget: Widget::Assistant,
                id,
                request,
            });
        }
    }

    fn send_wizard_turn(&mut self) {
        if let Some((id, request)) = self.wizard.begin_turn(Self::today()) {
            self.worker.submit(Job::Generate {
                widget: Widget::Wizard,
                id,
                request,
            });
        }
    }

    fn confirm_contract(&mut self, index: usize) {
        if let Some(dispatch) = self.wizard.confirm(index) {
            self.worker.submit(Job::Intake {
                id: dispatch.id,
                url: dispatch.url,
                payload: dispatch.payload,
            });
        }
    }

    fn apply_outcomes(&mut self) {
        for outcome in self.worker.poll() {
            match outcome {
                JobOutcome::Generated {
                    widget: Widget::Assistant,
                    id,
                    result,
                } => {
                    self.assistant.complete(id, result);
                }
                JobOutcome::Generated {
                    widget: Widget::Wizard,
                    id,
                    result,
                } => {
                    self.wizard.complete_turn(id, result, Self::today());
                }
                JobOutcome::Dispatched { id, result } => {
                    self.wizard.complete_dispatch(id, result);
                }
                JobOutcome::Exported { path, result } => {
                    self.registration.finish_export();
                    match result {
                        Ok(()) => {
                            info!(path = %path.display(), "card exported");
                            self.status =
                                format!("{} {}", statics::RU_NOTICE_CARD_SAVED, path.display());
                        }
                        Err(e) => {
                            error!("card export failed: {e:#}");
                            self.state.set_notice(statics::RU_NOTICE_CARD_FAILED);
                        }
                    }
                }
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let lang = self.state.language();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.strong(statics::APP_TITLE);
                ui.label(lang.pick(statics::RU_APP_SUBTITLE, statics::OLB_APP_SUBTITLE));
                ui.separator();

                if ui
                    .add_enabled(
                        self.state.can_go_back(),
                        egui::Button::new(lang.pick(statics::RU_BTN_BACK, statics::OLB_BTN_BACK)),
                    )
                    .clicked()
                {
                    self.dispatch(AppIntent::Back);
                }

                for view in PageView::NAV {
                    let selected = self.state.view() == view;
                    if ui
                        .selectable_label(selected, self.state.t(view.nav_key()))
                        .clicked()
                    {
                        self.dispatch(AppIntent::Navigate(view));
                    }
                }

                ui.separator();
                if ui
                    .button(lang.pick(statics::RU_BTN_LANGUAGE, statics::OLB_BTN_LANGUAGE))
                    .clicked()
                {
                    self.dispatch(AppIntent::ToggleLanguage);
                }
                if ui
                    .button(lang.pick(statics::RU_BTN_THEME, statics::OLB_BTN_THEME))
                    .clicked()
                {
                    self.dispatch(AppIntent::ToggleTheme);
                    apply_theme(ctx, self.state.theme());
                }
                if ui
                    .selectable_label(
                        self.assistant.open,
                        lang.pick(statics::RU_BTN_ASSISTANT, statics::OLB_BTN_ASSISTANT),
                    )
                    .clicked()
                {
                    self.assistant.open = !self.assistant.open;
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });
    }

    fn render_notice_bar(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.notice().map(str::to_string) else {
            return;
        };
        egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::RED, notice);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button(statics::RU_BTN_CLEAR).clicked() {
                        self.state.clear_notice();
                    }
                });
            });
        });
    }
}

fn apply_theme(ctx: &egui::Context, theme: Theme) {
    match theme {
        Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
        Theme::Light => ctx.set_visuals(egui::Visuals::light()),
    }
}

/// Render reply markup. Spans are plain text, so nothing in a reply can turn
/// into a widget other than an allow-listed link.
fn render_spans(ui: &mut egui::Ui, text: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in to_spans(text) {
            match span {
                Span::Text(t) => {
                    ui.label(t);
                }
                Span::Bold(t) => {
                    ui.strong(t);
                }
                Span::Link { label, url } => {
                    ui.hyperlink_to(label, url);
                }
                Span::LineBreak => ui.end_row(),
            }
        }
    });
}

impl eframe::App for GreenlandApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_outcomes();
        self.assistant.set_persona(self.state.persona());

        self.registration.tick(Instant::now());
        if matches!(
            self.registration.step(),
            crate::registration::RegistrationStep::Processing { .. }
        ) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.render_top_bar(ctx);
        self.render_notice_bar(ctx);
        self.render_assistant(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.view() {
                    PageView::Home => self.render_home(ui),
                    PageView::Immigration => self.render_immigration(ui),
                    PageView::MinistryOfLaw => self.render_ministry(ui),
                    PageView::Constitution => self.render_constitution(ui),
                    PageView::Profile => self.render_profile(ui),
                });
        });
    }
}
