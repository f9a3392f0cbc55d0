//! Chat surfaces: the floating assistant and the Ministry of Law wizard.

use super::{GreenlandApp, render_spans};
use crate::app::AppIntent;
use crate::assistant::{Persona, split_inline_buttons};
use crate::chat::{ChatMessage, Role};
use crate::contract::{Attachment, ExtractedContract, WizardStage, catalogue, contract_type};
use crate::statics;
use anyhow::Context;
use eframe::egui;
use std::path::Path;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Attachment {
        name,
        mime_type: mime_for(path).to_string(),
        bytes,
    })
}

fn bubble(ui: &mut egui::Ui, message: &ChatMessage, body: impl FnOnce(&mut egui::Ui)) {
    let fill = match (message.role, message.is_action) {
        (_, true) => egui::Color32::from_rgb(20, 83, 45),
        (Role::User, _) => ui.visuals().selection.bg_fill,
        (Role::Model, _) => ui.visuals().faint_bg_color,
    };
    let layout = match message.role {
        Role::User => egui::Layout::top_down(egui::Align::Max),
        Role::Model => egui::Layout::top_down(egui::Align::Min),
    };
    ui.with_layout(layout, |ui| {
        egui::Frame::group(ui.style())
            .fill(fill)
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.8);
                body(ui);
            });
    });
}

fn extracted_card(ui: &mut egui::Ui, idx: usize, extracted: &ExtractedContract) {
    let labels = contract_type(&extracted.contract_id);
    egui::Grid::new(("extracted", idx))
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for (key, value) in &extracted.fields {
                let label = labels
                    .and_then(|ct| ct.field(key))
                    .map_or(key.as_str(), |f| f.label.as_str());
                ui.label(label);
                ui.strong(value);
                ui.end_row();
            }
        });
}

impl GreenlandApp {
    pub(super) fn render_assistant(&mut self, ctx: &egui::Context) {
        if !self.assistant.open {
            return;
        }
        let lang = self.state.language();
        let mut open = self.assistant.open;
        let mut quick_reply = None;
        let mut send = false;

        egui::Window::new(lang.pick(statics::RU_ASSISTANT_TITLE, statics::OLB_ASSISTANT_TITLE))
            .collapsible(true)
            .default_size([380.0, 520.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(statics::RU_LABEL_PERSONA);
                    let current = self.state.persona();
                    for (persona, label) in [
                        (Persona::Official, statics::RU_PERSONA_OFFICIAL),
                        (Persona::Slang, statics::RU_PERSONA_SLANG),
                    ] {
                        if ui.selectable_label(current == persona, label).clicked() {
                            self.dispatch(AppIntent::SetPersona(persona));
                        }
                    }
                });
                ui.separator();

                let input_h = 64.0;
                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - input_h)
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for message in self.assistant.messages() {
                            let (text, _) = split_inline_buttons(&message.text);
                            bubble(ui, message, |ui| render_spans(ui, &text));
                        }
                        if self.assistant.is_loading() {
                            ui.weak(lang.pick(statics::RU_LABEL_TYPING, statics::OLB_LABEL_TYPING));
                        }
                    });

                let replies = self.assistant.quick_replies();
                if !replies.is_empty() && !self.assistant.is_loading() {
                    ui.horizontal_wrapped(|ui| {
                        for reply in replies {
                            if ui.small_button(&reply).clicked() {
                                quick_reply = Some(reply);
                            }
                        }
                    });
                }

                ui.horizontal(|ui| {
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut self.assistant.input)
                            .hint_text(lang.pick(
                                statics::RU_HINT_ASSISTANT_INPUT,
                                statics::OLB_HINT_ASSISTANT_INPUT,
                            ))
                            .desired_width(ui.available_width() - 40.0),
                    );
                    let enter = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let can_send =
                        !self.assistant.is_loading() && !self.assistant.input.trim().is_empty();
                    let clicked = ui.add_enabled(can_send, egui::Button::new(">")).clicked();
                    send = can_send && (enter || clicked);
                });
            });
        self.assistant.open = open;

        if let Some(reply) = quick_reply {
            self.send_assistant(Some(&reply));
        } else if send {
            self.send_assistant(None);
        }
    }

    pub(super) fn render_ministry(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.state.t("law_title"));
        ui.label(self.state.t("law_desc"));
        ui.add_space(8.0);

        if self.wizard.stage() == WizardStage::Selecting {
            self.render_contract_catalogue(ui);
        } else {
            self.render_wizard_chat(ui);
        }
    }

    fn render_contract_catalogue(&mut self, ui: &mut egui::Ui) {
        let mut chosen = None;
        for ct in catalogue() {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.strong(&ct.label);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("->").clicked() {
                            chosen = Some(ct.id.clone());
                        }
                        ui.hyperlink_to(statics::RU_LINK_VIEW_SAMPLE, &ct.view_url);
                    });
                });
                egui::CollapsingHeader::new(statics::RU_LABEL_REQUIRED_INFO)
                    .id_salt(&ct.id)
                    .show(ui, |ui| {
                        for line in &ct.required_info {
                            ui.label(format!("- {line}"));
                        }
                    });
            });
        }
        if let Some(id) = chosen {
            self.wizard.select(&id, Self::today());
        }
    }

    fn render_wizard_chat(&mut self, ui: &mut egui::Ui) {
        let Some(ct) = self.wizard.selected() else {
            return;
        };
        ui.horizontal(|ui| {
            if ui.button(statics::RU_BTN_BACK_TO_CONTRACTS).clicked() {
                self.wizard.back();
            }
            ui.separator();
            ui.strong(&ct.label);
            ui.hyperlink_to(statics::RU_LINK_FORM, &ct.form_url);
        });
        if self.wizard.selected().is_none() {
            return;
        }
        ui.separator();

        let mut fix = false;
        let mut confirm = None;
        let loading = self.wizard.is_loading();
        let last = self.wizard.messages().len().saturating_sub(1);

        for (idx, message) in self.wizard.messages().iter().enumerate() {
            bubble(ui, message, |ui| {
                if let Some(name) = &message.attachment {
                    ui.weak(format!("[{name}]"));
                }
                render_spans(ui, &message.text);
                if let Some(extracted) = &message.extracted {
                    ui.separator();
                    extracted_card(ui, idx, extracted);
                    // Only the newest card can still be acted on.
                    if idx == last {
                        ui.horizontal(|ui| {
                            if ui.add_enabled(!loading, egui::Button::new(statics::RU_BTN_FIX)).clicked() {
                                fix = true;
                            }
                            if ui
                                .add_enabled(!loading, egui::Button::new(statics::RU_BTN_CONFIRM_SEND))
                                .clicked()
                            {
                                confirm = Some(idx);
                            }
                        });
                    }
                }
            });
            ui.add_space(4.0);
        }
        if loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak(statics::RU_LABEL_ANALYZING);
            });
        }

        if fix {
            self.wizard.request_fix();
        }
        if let Some(idx) = confirm {
            self.confirm_contract(idx);
        }

        ui.separator();
        if let Some(name) = self.wizard.attachment.as_ref().map(|a| a.name.clone()) {
            ui.horizontal(|ui| {
                ui.label(format!("[{name}]"));
                if ui.small_button("x").clicked() {
                    self.wizard.attachment = None;
                }
            });
        }
        let mut send = false;
        let mut pick_image = false;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!loading, egui::Button::new(statics::RU_BTN_ATTACH_IMAGE))
                .clicked()
            {
                pick_image = true;
            }
            // Plain Enter sends; take it before the editor turns it into a newline.
            let input_id = ui.make_persistent_id("wizard_input");
            let enter = ui.memory(|m| m.has_focus(input_id))
                && ui.input_mut(|i| {
                    !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
                });
            ui.add(
                egui::TextEdit::multiline(&mut self.wizard.input)
                    .id(input_id)
                    .hint_text(statics::RU_HINT_WIZARD_INPUT)
                    .desired_rows(2)
                    .desired_width(ui.available_width() - 40.0),
            );
            let clicked = ui
                .add_enabled(self.wizard.can_send(), egui::Button::new(">"))
                .clicked();
            send = self.wizard.can_send() && (enter || clicked);
        });

        if pick_image {
            self.pick_wizard_image();
        }
        if send {
            self.send_wizard_turn();
        }
    }

    fn pick_wizard_image(&mut self) {
        let Some(path) = self
            .file_dialog()
            .add_filter("Image", &IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.remember_dir(&path);
        match read_attachment(&path) {
            Ok(attachment) => self.wizard.attach(attachment),
            Err(e) => self.report_error(format!("{} {e:#}", statics::RU_NOTICE_READ_FAILED)),
        }
    }
}
