//! Headquarters tab: the admin data grid with its broadcast composer,
//! knowledge form and map editor.

use super::GreenlandApp;
use crate::app::AppIntent;
use crate::broadcast::{ButtonKind, Composer, TextStyle};
use crate::grid::{ColumnDef, ColumnKind, PAGE_SIZES, page_count, page_slice};
use crate::map::{CityNode, format_percent};
use crate::statics;
use crate::table::Row;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use tracing::{debug, info};

const PIN_RADIUS: f32 = 6.0;
const PIN_HIT: f32 = 10.0;

/// The loaded background texture, or `None` while it is loading, when the
/// URL is empty, or when it cannot be loaded.
fn map_background(ctx: &egui::Context, image_url: &str) -> Option<egui::load::SizedTexture> {
    let url = image_url.trim();
    if url.is_empty() {
        return None;
    }
    match ctx.try_load_texture(
        url,
        egui::TextureOptions::LINEAR,
        egui::load::SizeHint::default(),
    ) {
        Ok(egui::load::TexturePoll::Ready { texture }) => Some(texture),
        Ok(egui::load::TexturePoll::Pending { .. }) => None,
        Err(e) => {
            debug!(url, error = %e, "map background unavailable");
            None
        }
    }
}

/// Paint the map background, then its pins on top. Returns the canvas rect
/// with its response.
pub(super) fn paint_map(
    ui: &mut egui::Ui,
    image_url: &str,
    cities: &[CityNode],
    selected: Option<&str>,
    sense: egui::Sense,
) -> (egui::Rect, egui::Response) {
    let w = ui.available_width().max(200.0);
    let h = (w * 0.56).clamp(160.0, 560.0);
    let (rect, response) = ui.allocate_exact_size(egui::vec2(w, h), sense);
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 4.0, egui::Color32::from_rgb(18, 52, 74));
    if let Some(texture) = map_background(ui.ctx(), image_url) {
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture.id, rect, uv, egui::Color32::WHITE);
    } else {
        let grid_stroke =
            egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 18));
        for i in 1..10 {
            let t = i as f32 / 10.0;
            let x = rect.left() + rect.width() * t;
            let y = rect.top() + rect.height() * t;
            painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], grid_stroke);
            painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], grid_stroke);
        }
    }

    let font = egui::TextStyle::Small.resolve(ui.style());
    for city in cities {
        let pos = pin_pos(rect, city);
        let color = if selected == Some(city.id.as_str()) {
            egui::Color32::from_rgb(255, 215, 0)
        } else {
            egui::Color32::from_rgb(200, 16, 46)
        };
        painter.circle_filled(pos, PIN_RADIUS, color);
        painter.circle_stroke(pos, PIN_RADIUS, egui::Stroke::new(1.0, egui::Color32::WHITE));
        painter.text(
            pos + egui::vec2(0.0, PIN_RADIUS + 2.0),
            egui::Align2::CENTER_TOP,
            &city.name,
            font.clone(),
            egui::Color32::WHITE,
        );
    }

    (rect, response)
}

fn pin_pos(rect: egui::Rect, city: &CityNode) -> egui::Pos2 {
    let (x, y) = city.position();
    egui::pos2(
        rect.left() + rect.width() * x / 100.0,
        rect.top() + rect.height() * y / 100.0,
    )
}

fn pin_at<'a>(rect: egui::Rect, cities: &'a [CityNode], p: egui::Pos2) -> Option<&'a CityNode> {
    // Topmost pin wins: later nodes are painted over earlier ones.
    cities
        .iter()
        .rev()
        .find(|c| pin_pos(rect, c).distance(p) <= PIN_HIT)
}

/// Pointer position as map percentages (unclamped).
fn percent_at(rect: egui::Rect, p: egui::Pos2) -> (f32, f32) {
    (
        (p.x - rect.left()) / rect.width() * 100.0,
        (p.y - rect.top()) / rect.height() * 100.0,
    )
}

/// One-line text field over an optional node property; empty clears it.
fn optional_edit(ui: &mut egui::Ui, label: &str, value: &mut Option<String>) -> bool {
    let mut text = value.clone().unwrap_or_default();
    ui.label(label);
    let changed = ui.text_edit_singleline(&mut text).changed();
    ui.end_row();
    if changed {
        *value = if text.is_empty() { None } else { Some(text) };
    }
    changed
}

fn cell(ui: &mut egui::Ui, row: &Row, col: &ColumnDef) {
    let text = row
        .get(&col.key)
        .map(|v| v.display())
        .unwrap_or_else(|| statics::MISSING_VALUE.to_string());
    match col.kind {
        ColumnKind::Number => {
            ui.monospace(text);
        }
        ColumnKind::Status => {
            let lower = text.to_lowercase();
            let color = if text == statics::MISSING_VALUE {
                ui.visuals().weak_text_color()
            } else if lower.contains(statics::RU_STATUS_PAID)
                || text == statics::RU_STATUS_SENT
                || lower == "active"
            {
                egui::Color32::GREEN
            } else {
                egui::Color32::YELLOW
            };
            ui.colored_label(color, text);
        }
        ColumnKind::Text | ColumnKind::Date => {
            ui.add(egui::Label::new(text).truncate());
        }
    }
}

impl GreenlandApp {
    pub(super) fn render_admin(&mut self, ui: &mut egui::Ui) {
        self.render_admin_tabs(ui);
        ui.separator();

        let active = self.grid.active().to_string();
        if active == statics::TAB_MAP {
            self.render_map_editor(ui);
            return;
        }
        if active == statics::TBL_BROADCAST {
            self.render_broadcast_composer(ui);
            ui.add_space(8.0);
        } else if active == statics::TBL_KNOWLEDGE {
            self.render_knowledge_form(ui);
            ui.add_space(8.0);
        }
        self.render_grid(ui, &active);
        self.render_column_settings(ui.ctx());
        self.render_row_editor(ui.ctx());
    }

    fn render_admin_tabs(&mut self, ui: &mut egui::Ui) {
        let tabs = self.grid.tab_order().to_vec();
        ui.horizontal_wrapped(|ui| {
            for tab in &tabs {
                let selected = self.grid.active() == tab;
                let resp = ui
                    .selectable_label(selected, tab.as_str())
                    .interact(egui::Sense::click_and_drag());
                if resp.drag_started() {
                    self.grid.begin_tab_drag(tab);
                }
                if self.grid.dragged_tab().is_some() && resp.contains_pointer() {
                    self.grid.drag_tab_over(tab);
                }
                if resp.clicked() {
                    self.grid.select_table(tab);
                }
            }
        });
        if self.grid.dragged_tab().is_some() && ui.input(|i| i.pointer.any_released()) {
            self.grid.end_tab_drag();
        }
    }

    fn render_grid(&mut self, ui: &mut egui::Ui, active: &str) {
        let columns: Vec<ColumnDef> = self
            .grid
            .visible_columns(active)
            .into_iter()
            .cloned()
            .collect();
        let rows = self.grid.filtered_view(self.state.tables());
        let pages = page_count(rows.len(), self.grid.page_size());

        ui.horizontal(|ui| {
            if ui.button(statics::RU_BTN_COLUMNS).clicked() {
                self.grid.show_column_settings = !self.grid.show_column_settings;
            }
            ui.separator();
            ui.label(format!("{} {}", statics::RU_LABEL_ROWS, rows.len()));
        });

        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
        let header_h = row_h * 2.0 + 4.0;
        let page_rows = page_slice(&rows, self.grid.page(), self.grid.page_size());
        let mut open_row: Option<Row> = None;
        let mut filter_edits: Vec<(String, String)> = Vec::new();

        egui::ScrollArea::horizontal()
            .id_salt(("grid_scroll", active))
            .show(ui, |ui| {
                let mut table = TableBuilder::new(ui)
                    .id_salt(("grid", active))
                    .striped(true)
                    .vscroll(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
                for col in &columns {
                    table = table.column(Column::exact(col.width));
                }
                table
                    .column(Column::exact(60.0))
                    .header(header_h, |mut header| {
                        for col in &columns {
                            header.col(|ui| {
                                ui.vertical(|ui| {
                                    ui.horizontal(|ui| {
                                        ui.strong(&col.label);
                                        let handle = ui
                                            .add(egui::Label::new("|").sense(egui::Sense::drag()))
                                            .on_hover_cursor(egui::CursorIcon::ResizeHorizontal);
                                        if handle.drag_started() {
                                            self.grid.begin_resize(active, &col.key);
                                            self.resize_accum = 0.0;
                                        }
                                        if handle.dragged() && self.grid.is_resizing() {
                                            self.resize_accum += handle.drag_delta().x;
                                            self.grid.drag_resize(self.resize_accum);
                                        }
                                        if handle.drag_stopped() {
                                            self.grid.end_resize();
                                        }
                                    });
                                    let mut text = self.grid.filter_text(&col.key).to_string();
                                    let edit = ui.add(
                                        egui::TextEdit::singleline(&mut text)
                                            .hint_text(statics::RU_HINT_FILTER)
                                            .desired_width(col.width - 8.0),
                                    );
                                    if edit.changed() {
                                        filter_edits.push((col.key.clone(), text));
                                    }
                                });
                            });
                        }
                        header.col(|_ui| {});
                    })
                    .body(|mut body| {
                        for row in page_rows {
                            body.row(row_h, |mut tr| {
                                for col in &columns {
                                    tr.col(|ui| cell(ui, row, col));
                                }
                                tr.col(|ui| {
                                    if ui.small_button(statics::RU_BTN_EDIT).clicked() {
                                        open_row = Some((*row).clone());
                                    }
                                });
                            });
                        }
                    });
            });

        if rows.is_empty() {
            ui.weak(statics::RU_GRID_EMPTY);
        }

        let mut page_size = self.grid.page_size();
        ui.horizontal(|ui| {
            ui.label(statics::RU_LABEL_PAGE_SIZE);
            egui::ComboBox::from_id_salt("grid_page_size")
                .selected_text(page_size.to_string())
                .show_ui(ui, |ui| {
                    for size in PAGE_SIZES {
                        ui.selectable_value(&mut page_size, size, size.to_string());
                    }
                });
            ui.separator();
            if ui
                .add_enabled(self.grid.can_go_prev(), egui::Button::new(statics::RU_BTN_FIRST))
                .clicked()
            {
                self.grid.go_first();
            }
            if ui
                .add_enabled(self.grid.can_go_prev(), egui::Button::new(statics::RU_BTN_PREV))
                .clicked()
            {
                self.grid.go_prev();
            }
            ui.label(format!(
                "{} {} {} {}",
                statics::RU_LABEL_PAGE,
                self.grid.page(),
                statics::RU_LABEL_OF,
                pages
            ));
            if ui
                .add_enabled(self.grid.can_go_next(pages), egui::Button::new(statics::RU_BTN_NEXT))
                .clicked()
            {
                self.grid.go_next(pages);
            }
            if ui
                .add_enabled(self.grid.can_go_next(pages), egui::Button::new(statics::RU_BTN_LAST))
                .clicked()
            {
                self.grid.go_last(pages);
            }
        });

        if page_size != self.grid.page_size() {
            self.grid.set_page_size(page_size);
        }
        for (key, text) in filter_edits {
            self.grid.set_filter(&key, &text);
        }
        if let Some(row) = open_row {
            self.grid.open_editor(&row);
        }
    }

    fn render_column_settings(&mut self, ctx: &egui::Context) {
        if !self.grid.show_column_settings {
            return;
        }
        let active = self.grid.active().to_string();
        let mut open = true;
        let mut toggled = None;
        egui::Window::new(statics::RU_WINDOW_COLUMNS)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                for col in self.grid.columns(&active) {
                    let mut visible = col.visible;
                    if ui.checkbox(&mut visible, &col.label).changed() {
                        toggled = Some(col.key.clone());
                    }
                }
            });
        if let Some(key) = toggled {
            self.grid.toggle_column(&active, &key);
        }
        self.grid.show_column_settings = open;
    }

    fn render_row_editor(&mut self, ctx: &egui::Context) {
        if self.grid.editor().is_none() {
            return;
        }
        let mut save = false;
        let mut delete = false;
        let mut cancel = false;
        egui::Window::new(statics::RU_WINDOW_EDIT_ROW)
            .collapsible(false)
            .default_width(520.0)
            .show(ctx, |ui| {
                let Some(session) = self.grid.editor_mut() else {
                    return;
                };
                ui.weak(&session.table);
                egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                    egui::Grid::new("row_editor")
                        .num_columns(2)
                        .striped(true)
                        .show(ui, |ui| {
                            for (key, value) in session.draft.iter_mut() {
                                ui.monospace(key);
                                ui.add(egui::TextEdit::multiline(value).desired_rows(1));
                                ui.end_row();
                            }
                        });
                });
                ui.separator();
                ui.horizontal(|ui| {
                    save = ui.button(statics::RU_BTN_SAVE).clicked();
                    delete = ui.button(statics::RU_BTN_DELETE).clicked();
                    cancel = ui.button(statics::RU_BTN_CANCEL).clicked();
                });
            });

        if cancel {
            self.grid.close_editor();
            return;
        }
        let result = if save {
            self.grid.save_edit(self.state.tables())
        } else if delete {
            self.grid.delete_edit(self.state.tables())
        } else {
            return;
        };
        match result {
            Ok(replacement) => {
                info!(table = %replacement.table, rows = replacement.rows.len(), "replacing table");
                self.dispatch(AppIntent::ReplaceTable(replacement));
            }
            Err(e) => self.report_error(format!("{} {e}", statics::RU_NOTICE_EDIT_FAILED)),
        }
    }

    fn render_broadcast_composer(&mut self, ui: &mut egui::Ui) {
        ui.heading(statics::RU_BROADCAST_HEADING);
        let crm = self.state.tables().rows(statics::TBL_CRM);
        let variables: Vec<String> = self
            .grid
            .columns(statics::TBL_CRM)
            .iter()
            .map(|c| c.key.clone())
            .collect();
        let composer = &mut self.composer;
        let caret = &mut self.composer_caret;
        let mut send = false;

        ui.columns(2, |cols| {
            let ui = &mut cols[0];
            ui.strong(statics::RU_BROADCAST_RECIPIENTS);
            ui.add(
                egui::TextEdit::singleline(&mut composer.recipient_filter)
                    .hint_text(statics::RU_HINT_RECIPIENT_FILTER),
            );
            let all = composer.all_filtered_selected(crm);
            let label = if all {
                statics::RU_BTN_UNSELECT_ALL
            } else {
                statics::RU_BTN_SELECT_ALL
            };
            ui.horizontal(|ui| {
                if ui.button(label).clicked() {
                    composer.toggle_all(crm);
                }
                ui.weak(format!("{}/{}", composer.selected().len(), crm.len()));
            });
            egui::ScrollArea::vertical()
                .id_salt("broadcast_recipients")
                .max_height(240.0)
                .show(ui, |ui| {
                    for r in composer.filtered_recipients(crm) {
                        let mut checked = composer.is_selected(&r.chat_id);
                        let name = if r.fio.trim().is_empty() {
                            statics::RU_UNNAMED
                        } else {
                            r.fio.as_str()
                        };
                        ui.horizontal(|ui| {
                            if ui.checkbox(&mut checked, name).changed() {
                                composer.toggle_recipient(&r.chat_id);
                            }
                            ui.weak(&r.chat_id);
                        });
                    }
                });

            let ui = &mut cols[1];
            ui.horizontal_wrapped(|ui| {
                let mut picked = None;
                egui::ComboBox::from_id_salt("broadcast_variable")
                    .selected_text(statics::RU_LABEL_VARIABLE)
                    .show_ui(ui, |ui| {
                        for key in &variables {
                            if ui.selectable_label(false, format!("{{{key}}}")).clicked() {
                                picked = Some(key.clone());
                            }
                        }
                    });
                if let Some(key) = picked {
                    let at = caret.map_or(composer.char_count(), |(a, b)| a.max(b));
                    let end = composer.insert_variable(&key, at);
                    *caret = Some((end, end));
                }
                for (style, label) in [
                    (TextStyle::Bold, statics::RU_BTN_BOLD),
                    (TextStyle::Italic, statics::RU_BTN_ITALIC),
                    (TextStyle::Code, statics::RU_BTN_CODE),
                    (TextStyle::Quote, statics::RU_BTN_QUOTE),
                ] {
                    if ui.small_button(label).clicked() {
                        let end = composer.char_count();
                        let (a, b) = caret.unwrap_or((end, end));
                        composer.wrap_selection(style, a, b);
                        *caret = None;
                    }
                }
            });

            let output = egui::TextEdit::multiline(&mut composer.text)
                .hint_text(statics::RU_HINT_BROADCAST_TEXT)
                .desired_rows(6)
                .desired_width(f32::INFINITY)
                .show(ui);
            if let Some(range) = output.cursor_range {
                *caret = Some((range.primary.index, range.secondary.index));
            }

            let over = composer.is_over_limit();
            let counter = format!(
                "{} {}/{}",
                statics::RU_LABEL_CHARS,
                composer.char_count(),
                composer.char_budget()
            );
            if over {
                ui.colored_label(egui::Color32::RED, counter);
            } else {
                ui.weak(counter);
            }
            if let Some(warning) = composer.limit_warning() {
                ui.colored_label(egui::Color32::YELLOW, warning);
            }

            ui.add(
                egui::TextEdit::singleline(&mut composer.media_url)
                    .hint_text(statics::RU_HINT_MEDIA_URL)
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(4.0);
            ui.strong(statics::RU_HEADING_INLINE_BUTTONS);
            render_inline_buttons(ui, composer);

            ui.add_space(6.0);
            send = ui
                .add_enabled(composer.can_send(), egui::Button::new(statics::RU_BTN_SEND))
                .clicked();
        });

        if send {
            match self.composer.send(chrono::Local::now().naive_local()) {
                Ok(fields) => {
                    info!("broadcast logged");
                    self.composer_caret = None;
                    self.dispatch(AppIntent::PrependRow {
                        table: statics::TBL_BROADCAST.to_string(),
                        fields,
                    });
                }
                Err(e) => self.report_error(e.to_string()),
            }
        }
    }

    fn render_knowledge_form(&mut self, ui: &mut egui::Ui) {
        ui.heading(statics::RU_KNOWLEDGE_HEADING);
        let draft = &mut self.knowledge;
        ui.add(egui::TextEdit::singleline(&mut draft.category).hint_text(statics::RU_HINT_CATEGORY));
        ui.add(
            egui::TextEdit::multiline(&mut draft.content)
                .hint_text(statics::RU_HINT_CONTENT)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
        ui.add(
            egui::TextEdit::multiline(&mut draft.answer)
                .hint_text(statics::RU_HINT_ANSWER)
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );

        let mut remove = None;
        for (idx, field) in draft.custom.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut field.key)
                        .hint_text(statics::RU_HINT_CUSTOM_KEY)
                        .desired_width(180.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut field.value).hint_text(statics::RU_HINT_CUSTOM_VALUE),
                );
                if ui.small_button("x").clicked() {
                    remove = Some(idx);
                }
            });
        }
        if let Some(idx) = remove {
            draft.remove_custom_field(idx);
        }
        if !draft.files.is_empty() {
            ui.weak(draft.files.join(", "));
        }

        let mut attach = false;
        let mut submit = false;
        ui.horizontal(|ui| {
            attach = ui.button(statics::RU_BTN_ATTACH_FILES).clicked();
            if ui.button(statics::RU_BTN_ADD_FIELD).clicked() {
                draft.add_custom_field();
            }
            submit = ui.button(statics::RU_BTN_ADD_ENTRY).clicked();
        });

        if attach && let Some(paths) = self.file_dialog().pick_files() {
            if let Some(first) = paths.first() {
                self.remember_dir(first);
            }
            self.knowledge.attach(
                paths
                    .iter()
                    .filter_map(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned()),
            );
        }
        if submit {
            let fields = self.knowledge.submit();
            info!("knowledge entry added");
            self.dispatch(AppIntent::PrependRow {
                table: statics::TBL_KNOWLEDGE.to_string(),
                fields,
            });
        }
    }

    fn render_map_editor(&mut self, ui: &mut egui::Ui) {
        ui.heading(statics::RU_MAP_HEADING);
        ui.weak(statics::RU_MAP_HINT);
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.map_editor.image_input)
                    .hint_text(statics::RU_HINT_MAP_IMAGE),
            );
            if ui.button(statics::RU_BTN_SET_IMAGE).clicked()
                && let Some(intent) = self.map_editor.set_image()
            {
                self.dispatch(AppIntent::Map(intent));
            }
            ui.hyperlink_to(statics::RU_HOME_MAP_IMAGE, self.state.map_image());
        });

        let selected_id = self.map_editor.selected.as_ref().map(|c| c.id.clone());
        let (rect, response) = paint_map(
            ui,
            self.state.map_image(),
            self.state.cities(),
            selected_id.as_deref(),
            egui::Sense::click_and_drag(),
        );
        let pointer = response.interact_pointer_pos();

        if response.drag_started()
            && let Some(p) = pointer
            && let Some(city) = pin_at(rect, self.state.cities(), p).cloned()
        {
            self.map_editor.select(&city);
            self.map_editor.begin_drag(&city.id);
        }
        if response.dragged()
            && let Some(p) = pointer
        {
            let (x, y) = percent_at(rect, p);
            if let Some(intent) = self.map_editor.drag_to(x, y) {
                self.dispatch(AppIntent::Map(intent));
                self.map_editor.sync_selected(self.state.cities());
            }
        }
        if response.drag_stopped() {
            self.map_editor.end_drag();
        }
        if response.clicked()
            && let Some(p) = pointer
        {
            if let Some(city) = pin_at(rect, self.state.cities(), p).cloned() {
                self.map_editor.select(&city);
            } else {
                let (x, y) = percent_at(rect, p);
                if let Some(intent) = self.map_editor.click(x, y)
                    && let Some(id) = self.dispatch(AppIntent::Map(intent))
                {
                    self.map_editor.placed(self.state.cities(), &id);
                }
            }
        }

        ui.add_space(8.0);
        self.render_node_form(ui);
    }

    fn render_node_form(&mut self, ui: &mut egui::Ui) {
        let Some(mut draft) = self.map_editor.selected.clone() else {
            ui.weak(statics::RU_MAP_SELECT_NODE);
            return;
        };
        let mut changed = false;
        let mut delete = false;

        ui.group(|ui| {
            egui::Grid::new("map_node_form")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label(statics::RU_LABEL_NAME);
                    changed |= ui.text_edit_singleline(&mut draft.name).changed();
                    ui.end_row();
                    changed |= optional_edit(ui, statics::RU_LABEL_DESCRIPTION, &mut draft.description);
                    changed |= optional_edit(ui, statics::RU_LABEL_LINK, &mut draft.link);
                    changed |= optional_edit(ui, statics::RU_LABEL_LINK_TEXT, &mut draft.link_text);
                    changed |= optional_edit(ui, statics::RU_LABEL_LOGO, &mut draft.logo);

                    ui.label(statics::RU_LABEL_POSITION);
                    let (x, y) = draft.position();
                    ui.monospace(format!("{} / {}", format_percent(x), format_percent(y)));
                    ui.end_row();
                });
            delete = ui.button(statics::RU_BTN_DELETE).clicked();
        });

        if delete {
            let intent = self.map_editor.delete(&draft.id);
            self.dispatch(AppIntent::Map(intent));
            return;
        }
        if changed && let Some(intent) = self.map_editor.edit_selected(|c| *c = draft) {
            self.dispatch(AppIntent::Map(intent));
        }
    }
}

fn render_inline_buttons(ui: &mut egui::Ui, composer: &mut Composer) {
    let mut remove = None;
    for (idx, button) in composer.buttons.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut button.text)
                    .hint_text(statics::RU_HINT_BUTTON_TEXT)
                    .desired_width(120.0),
            );
            egui::ComboBox::from_id_salt(("button_kind", idx))
                .selected_text(button.kind.label())
                .show_ui(ui, |ui| {
                    for kind in ButtonKind::ALL {
                        ui.selectable_value(&mut button.kind, kind, kind.label());
                    }
                });
            ui.add(
                egui::TextEdit::singleline(&mut button.value)
                    .hint_text(statics::RU_HINT_BUTTON_VALUE)
                    .desired_width(160.0),
            );
            if ui.small_button("x").clicked() {
                remove = Some(idx);
            }
        });
    }
    if let Some(idx) = remove {
        composer.remove_button(idx);
    }
    if ui.small_button(statics::RU_BTN_ADD_BUTTON).clicked() {
        composer.add_button();
    }
}
