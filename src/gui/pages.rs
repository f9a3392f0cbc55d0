//! Public pages: home, immigration, constitution and the citizen profile.

use super::GreenlandApp;
use super::admin::paint_map;
use crate::app::{AppIntent, PageView, ProfileTab};
use crate::laws;
use crate::registration::{CitizenRole, GreenCard, RegistrationStep, TITLES};
use crate::statics;
use crate::treasury::{self, format_amount};
use crate::worker::Job;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::time::Instant;

// Lore blocks, top of the hierarchy first.
const PYRAMID: [&str; 4] = ["cha", "min", "arc", "res"];

impl GreenlandApp {
    pub(super) fn render_home(&mut self, ui: &mut egui::Ui) {
        let lang = self.state.language();
        ui.heading(self.state.t("home_title"));
        ui.label(self.state.t("home_subtitle"));
        ui.add_space(8.0);
        if ui.button(self.state.t("imm_btn")).clicked() {
            self.dispatch(AppIntent::Navigate(PageView::Immigration));
        }

        ui.add_space(12.0);
        ui.strong(lang.pick(statics::RU_HOME_PYRAMID, statics::OLB_HOME_PYRAMID));
        for tier in PYRAMID {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.strong(self.state.t(&format!("lore_{tier}_title")));
                    ui.weak(self.state.t(&format!("lore_{tier}_sub")));
                });
                ui.label(self.state.t(&format!("lore_{tier}_dossier")));
            });
        }

        ui.add_space(12.0);
        ui.strong(self.state.t("home_map_title"));
        paint_map(
            ui,
            self.state.map_image(),
            self.state.cities(),
            None,
            egui::Sense::hover(),
        );
        ui.horizontal_wrapped(|ui| {
            for city in self.state.cities() {
                match &city.link {
                    Some(link) if !link.trim().is_empty() => {
                        let text = city.link_text.as_deref().unwrap_or(city.name.as_str());
                        ui.hyperlink_to(format!("{}: {text}", city.name), link);
                    }
                    _ => {
                        ui.label(&city.name);
                    }
                }
                ui.separator();
            }
        });
        ui.hyperlink_to(statics::RU_HOME_MAP_IMAGE, self.state.map_image());
    }

    pub(super) fn render_immigration(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.state.t("imm_title"));
        ui.label(self.state.t("imm_subtitle"));
        ui.add_space(8.0);

        match self.registration.step().clone() {
            RegistrationStep::Form => self.render_registration_form(ui),
            RegistrationStep::Processing { .. } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(self.state.t("imm_processing"));
                });
            }
            RegistrationStep::Card(card) => {
                ui.heading(self.state.t("imm_success"));
                render_card(ui, &card);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(
                            !self.registration.is_exporting(),
                            egui::Button::new(self.state.t("prof_download")),
                        )
                        .clicked()
                    {
                        self.export_registration_card();
                    }
                    let lang = self.state.language();
                    if ui
                        .button(lang.pick(
                            statics::RU_BTN_NEW_APPLICATION,
                            statics::OLB_BTN_NEW_APPLICATION,
                        ))
                        .clicked()
                    {
                        self.registration.reset();
                    }
                });
            }
        }
    }

    fn render_registration_form(&mut self, ui: &mut egui::Ui) {
        let form = &mut self.registration.form;
        ui.horizontal(|ui| {
            for (role, key) in [
                (CitizenRole::Resident, "imm_role_res"),
                (CitizenRole::Architect, "imm_role_exp"),
            ] {
                ui.vertical(|ui| {
                    ui.selectable_value(&mut form.role, role, self.state.t(key));
                    ui.weak(self.state.t(&format!("{key}_desc")));
                });
            }
        });
        ui.add_space(6.0);

        egui::Grid::new("registration_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label(self.state.t("imm_fio"));
                ui.text_edit_singleline(&mut form.fio);
                ui.end_row();

                if form.role == CitizenRole::Architect {
                    ui.label(statics::RU_LABEL_TITLE);
                    egui::ComboBox::from_id_salt("registration_title")
                        .selected_text(form.title.as_str())
                        .show_ui(ui, |ui| {
                            for title in TITLES {
                                ui.selectable_value(&mut form.title, title.to_string(), title);
                            }
                        });
                    ui.end_row();
                }

                ui.label(self.state.t("imm_nick"));
                ui.text_edit_singleline(&mut form.name);
                ui.end_row();

                ui.label(statics::RU_LABEL_OWN_PROMO);
                ui.text_edit_singleline(&mut form.own_promo);
                ui.end_row();

                if form.role == CitizenRole::Architect {
                    for (label, value) in [
                        (statics::RU_LABEL_TOOLS, &mut form.tools),
                        (statics::RU_LABEL_SPHERES, &mut form.spheres),
                        (statics::RU_LABEL_CASES, &mut form.cases),
                        (statics::RU_LABEL_OTHER, &mut form.other),
                    ] {
                        ui.label(label);
                        ui.add(egui::TextEdit::multiline(value).desired_rows(2));
                        ui.end_row();
                    }
                }
            });

        let button_key = match form.role {
            CitizenRole::Resident => "imm_btn",
            CitizenRole::Architect => "imm_btn_exp",
        };
        let complete = form.is_complete();
        ui.add_space(8.0);
        if ui
            .add_enabled(complete, egui::Button::new(self.state.t(button_key)))
            .clicked()
        {
            self.registration.submit(Instant::now(), &mut rand::rng());
        }
    }

    fn export_registration_card(&mut self) {
        let Some(name) = self.registration.card().map(GreenCard::file_name) else {
            return;
        };
        let Some(path) = self
            .file_dialog()
            .add_filter("SVG", &["svg"])
            .set_file_name(name)
            .save_file()
        else {
            return;
        };
        self.remember_dir(&path);
        if let Some(card) = self.registration.begin_export() {
            self.worker.submit(Job::ExportCard { path, card });
        }
    }

    fn profile_card(&self) -> GreenCard {
        let profile = self.state.profile();
        GreenCard {
            fio: profile.fio.clone(),
            display_name: profile.name.clone(),
            role: CitizenRole::Resident,
            code: profile.promo.clone(),
        }
    }

    fn export_profile_card(&mut self) {
        let card = self.profile_card();
        let Some(path) = self
            .file_dialog()
            .add_filter("SVG", &["svg"])
            .set_file_name(card.file_name())
            .save_file()
        else {
            return;
        };
        self.remember_dir(&path);
        self.worker.submit(Job::ExportCard { path, card });
    }

    pub(super) fn render_constitution(&mut self, ui: &mut egui::Ui) {
        let lang = self.state.language();
        ui.heading(self.state.t("const_title"));
        ui.label(self.state.t("const_desc"));
        ui.add(
            egui::TextEdit::singleline(&mut self.law_query)
                .hint_text(lang.pick(statics::RU_HINT_LAW_SEARCH, statics::OLB_HINT_LAW_SEARCH))
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);

        let hits = laws::search(self.state.tables(), &self.law_query);
        if hits.is_empty() {
            ui.weak(lang.pick(statics::RU_LAWS_NONE, statics::OLB_LAWS_NONE));
            return;
        }
        for law in hits {
            egui::CollapsingHeader::new(laws::question(law, lang))
                .id_salt(law.id())
                .show(ui, |ui| super::render_spans(ui, &laws::answer(law, lang)));
        }
    }

    pub(super) fn render_profile(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (tab, key) in [
                (ProfileTab::Main, "prof_tab_main"),
                (ProfileTab::Treasury, "prof_tab_treasury"),
                (ProfileTab::Admin, "prof_tab_hq"),
            ] {
                ui.selectable_value(&mut self.profile_tab, tab, self.state.t(key));
            }
        });
        ui.separator();

        match self.profile_tab {
            ProfileTab::Main => self.render_profile_main(ui),
            ProfileTab::Treasury => self.render_treasury(ui),
            ProfileTab::Admin => self.render_admin(ui),
        }
    }

    fn render_profile_main(&mut self, ui: &mut egui::Ui) {
        let lang = self.state.language();
        let profile = self.state.profile().clone();
        let leads = treasury::partner_leads(self.state.tables(), &profile.promo);
        let summary = treasury::summarize(&leads);

        ui.heading(&profile.name);
        ui.label(&profile.fio);
        ui.horizontal(|ui| {
            ui.strong(profile.rank(lang));
            ui.separator();
            ui.monospace(&profile.id);
            ui.separator();
            ui.label(statics::RU_LABEL_PROMO);
            ui.monospace(&profile.promo);
            if ui.small_button("⧉").clicked() {
                ui.ctx().copy_text(profile.promo.clone());
            }
        });
        ui.add_space(8.0);

        ui.columns(3, |cols| {
            stat(
                &mut cols[0],
                &self.state.t("prof_balance"),
                &format!("{} {}", format_amount(summary.paid_total), statics::CURRENCY),
            );
            stat(&mut cols[1], &self.state.t("prof_refs"), &summary.referrals.to_string());
            stat(&mut cols[2], &self.state.t("prof_missions"), &summary.paid.to_string());
        });

        ui.add_space(12.0);
        ui.strong(self.state.t("prof_card_title"));
        render_card(ui, &self.profile_card());
        if ui.button(self.state.t("prof_download")).clicked() {
            self.export_profile_card();
        }
    }

    fn render_treasury(&mut self, ui: &mut egui::Ui) {
        let lang = self.state.language();
        ui.heading(self.state.t("tr_title"));
        ui.label(self.state.t("tr_desc"));

        let promo = self.state.profile().promo.clone();
        let leads = treasury::partner_leads(self.state.tables(), &promo);
        let summary = treasury::summarize(&leads);

        ui.columns(3, |cols| {
            stat(&mut cols[0], &self.state.t("tr_stat_ref"), &summary.referrals.to_string());
            stat(
                &mut cols[1],
                &self.state.t("tr_stat_wait"),
                &format!(
                    "{} {} ({})",
                    format_amount(summary.pending_total),
                    statics::CURRENCY,
                    summary.pending
                ),
            );
            stat(
                &mut cols[2],
                &self.state.t("tr_stat_paid"),
                &format!(
                    "{} {} ({})",
                    format_amount(summary.paid_total),
                    statics::CURRENCY,
                    summary.paid
                ),
            );
        });

        ui.add_space(12.0);
        ui.strong(self.state.t("tr_list_title"));
        if leads.is_empty() {
            ui.weak(lang.pick(statics::RU_TREASURY_EMPTY, statics::OLB_TREASURY_EMPTY));
            return;
        }

        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        ui.push_id("treasury_table", |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(100.0))
                .column(Column::initial(200.0))
                .column(Column::initial(180.0))
                .column(Column::initial(100.0))
                .column(Column::remainder())
                .header(row_h, |mut header| {
                    for title in [
                        statics::RU_COL_DATE,
                        statics::RU_COL_CLIENT,
                        statics::RU_COL_PRODUCT,
                        statics::RU_COL_SUM,
                        statics::RU_COL_STATUS,
                    ] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for lead in &leads {
                        body.row(row_h, |mut row| {
                            row.col(|ui| {
                                ui.label(lead.text("timestamp"));
                            });
                            row.col(|ui| {
                                ui.label(lead.text(statics::FIELD_FIO));
                            });
                            row.col(|ui| {
                                ui.label(lead.text("product"));
                            });
                            row.col(|ui| {
                                ui.monospace(format_amount(treasury::lead_sum(lead)));
                            });
                            row.col(|ui| {
                                let label = treasury::status_label(lead);
                                if treasury::is_paid(lead) {
                                    ui.colored_label(egui::Color32::GREEN, label);
                                } else {
                                    ui.colored_label(egui::Color32::YELLOW, label);
                                }
                            });
                        });
                    }
                });
        });
    }
}

fn stat(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.group(|ui| {
        ui.weak(label);
        ui.heading(value);
    });
}

fn render_card(ui: &mut egui::Ui, card: &GreenCard) {
    egui::Frame::group(ui.style())
        .fill(egui::Color32::from_rgb(200, 16, 46))
        .stroke(egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 215, 0)))
        .show(ui, |ui| {
            ui.set_width(360.0);
            ui.colored_label(egui::Color32::WHITE, statics::APP_TITLE);
            ui.colored_label(egui::Color32::WHITE, card.role.card_label());
            ui.add_space(6.0);
            ui.colored_label(egui::Color32::WHITE, &card.fio);
            ui.heading(egui::RichText::new(&card.display_name).color(egui::Color32::WHITE));
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::WHITE, statics::RU_LABEL_CARD_CODE);
                ui.label(
                    egui::RichText::new(&card.code)
                        .monospace()
                        .strong()
                        .color(egui::Color32::from_rgb(255, 215, 0)),
                );
            });
        });
}
