//! Admin data grid: one named table at a time, with per-column filters,
//! pagination, column visibility/width, tab ordering and a row editor.
//!
//! The grid never writes to the shared tables itself. Saving or deleting a row
//! produces a [`TableReplacement`] that the application shell commits.

use crate::statics;
use crate::table::{Fields, Row, RowId, RowMatch, TableSet};
use crate::value::FieldValue;
use indexmap::IndexMap;
use std::collections::HashMap;

pub const MIN_COLUMN_WIDTH: f32 = 50.0;
pub const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    Text,
    Number,
    Status,
    Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
    pub width: f32,
    pub kind: ColumnKind,
    pub visible: bool,
}

impl ColumnDef {
    fn new(key: &str, label: &str, width: f32) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            width,
            kind: ColumnKind::Text,
            visible: true,
        }
    }

    fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }
}

/// `max(50, old + delta)`.
pub fn resized_width(old: f32, delta: f32) -> f32 {
    (old + delta).max(MIN_COLUMN_WIDTH)
}

/// Hardcoded column sets; reloading the app resets to these.
pub fn default_columns() -> IndexMap<String, Vec<ColumnDef>> {
    use ColumnKind::{Number, Status};

    let mut cols = IndexMap::new();
    cols.insert(
        statics::TBL_CRM.to_string(),
        vec![
            ColumnDef::new("chat_id", "Chat ID", 120.0),
            ColumnDef::new("partner_code", "Код Партнера", 120.0),
            ColumnDef::new("fio", "ФИО", 200.0),
            ColumnDef::new("promo", "Промокод", 120.0),
            ColumnDef::new("telegram", "Телеграм", 150.0),
            ColumnDef::new("status", "Статус", 100.0).kind(Status),
        ],
    );
    cols.insert(
        statics::TBL_LEADS.to_string(),
        vec![
            ColumnDef::new("timestamp", "Дата", 120.0),
            ColumnDef::new("fio", "ФИО", 200.0),
            ColumnDef::new("company", "Компания", 150.0),
            ColumnDef::new("product", "Продукт", 150.0),
            ColumnDef::new("sum", "Сумма", 100.0).kind(Number),
            ColumnDef::new("status", "Статус", 120.0).kind(Status),
            ColumnDef::new("partner_code", "Партнер", 100.0),
        ],
    );
    cols.insert(
        statics::TBL_PARTNERS.to_string(),
        vec![
            ColumnDef::new("timestamp", "Дата", 120.0),
            ColumnDef::new("fio", "ФИО", 200.0),
            ColumnDef::new("partner_code", "Код", 120.0),
            ColumnDef::new("telegram", "TG", 150.0),
            ColumnDef::new("status", "Статус", 100.0).kind(Status),
        ],
    );
    cols.insert(
        statics::TBL_EXPERTS.to_string(),
        vec![
            ColumnDef::new("timestamp", "Дата", 120.0),
            ColumnDef::new("fio", "ФИО", 200.0),
            ColumnDef::new("promo", "Промо", 120.0),
            ColumnDef::new("telegram", "TG", 150.0),
            ColumnDef::new("status", "Статус", 100.0).kind(Status),
        ],
    );
    cols.insert(
        statics::TBL_LOGS.to_string(),
        vec![
            ColumnDef::new("timestamp", "Время", 150.0),
            ColumnDef::new("chat_id", "Chat ID", 120.0),
            ColumnDef::new("question", "Вопрос", 300.0),
            ColumnDef::new("ai_reply", "Ответ ИИ", 300.0),
        ],
    );
    cols.insert(
        statics::TBL_AI2.to_string(),
        vec![
            ColumnDef::new("timestamp", "Время", 150.0),
            ColumnDef::new("chat_id", "Chat ID", 120.0),
            ColumnDef::new("question", "Вопрос", 250.0),
            ColumnDef::new("ai_reply", "Ответ", 250.0),
        ],
    );
    cols.insert(
        statics::TBL_BROADCAST.to_string(),
        vec![
            ColumnDef::new("date_sent", "Дата", 150.0),
            ColumnDef::new("message", "Сообщение", 300.0),
            ColumnDef::new("chat_ids", "Получатели", 150.0),
            ColumnDef::new("status", "Статус", 100.0).kind(Status),
        ],
    );
    cols.insert(
        statics::TBL_RULES.to_string(),
        vec![
            ColumnDef::new("rule", "Правило", 200.0),
            ColumnDef::new("text_col", "Текст", 300.0),
        ],
    );
    cols.insert(
        statics::TBL_LAWS.to_string(),
        vec![
            ColumnDef::new("q", "Вопрос (RU)", 300.0),
            ColumnDef::new("q_olbanian", "Вопрос (УПЧК)", 300.0),
            ColumnDef::new("a", "Ответ (RU)", 400.0),
            ColumnDef::new("a_olbanian", "Ответ (УПЧК)", 400.0),
        ],
    );
    cols.insert(
        statics::TBL_SITE_TEXT.to_string(),
        vec![
            ColumnDef::new("key", "Ключ", 150.0),
            ColumnDef::new("ru", "RU", 300.0),
            ColumnDef::new("olbanian", "УПЧК", 300.0),
        ],
    );
    cols.insert(
        statics::TBL_KNOWLEDGE.to_string(),
        vec![
            ColumnDef::new("category", "Категория", 150.0),
            ColumnDef::new("content", "Содержимое", 400.0),
            ColumnDef::new("answer", "Ответ/Описание", 400.0),
            ColumnDef::new("files", "Файлы", 150.0),
        ],
    );
    cols.insert(
        statics::TBL_IPREF.to_string(),
        vec![
            ColumnDef::new("timestamp", "Дата", 150.0),
            ColumnDef::new("IPREFFullName", "ФИО", 200.0),
            ColumnDef::new("IPREFPhone", "Телефон", 150.0),
            ColumnDef::new("IPREFCity", "Город", 150.0),
        ],
    );
    cols
}

/// Rows of `rows` passing every non-empty filter. A missing field reads as
/// the empty string and so fails any non-empty filter.
pub fn filter_rows<'a>(rows: &'a [Row], filters: &IndexMap<String, String>) -> Vec<&'a Row> {
    let active: Vec<(&str, String)> = filters
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(key, text)| (key.as_str(), text.to_lowercase()))
        .collect();

    rows.iter()
        .filter(|row| {
            active.iter().all(|(key, needle)| {
                row.get(key)
                    .map(|v| v.contains_lower(needle))
                    .unwrap_or(needle.is_empty())
            })
        })
        .collect()
}

/// `ceil(len / page_size)`; zero rows means zero pages.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Slice of `items` for a 1-based `page`. Out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// A committed whole-collection write, handed to the shell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableReplacement {
    pub table: String,
    pub rows: Vec<Row>,
    pub base_revision: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("no row is being edited")]
    NoEditSession,
    #[error("the edited row no longer exists in {table}")]
    RowNotFound { table: String },
    #[error("{count} rows in {table} match the edited row; refusing to guess")]
    AmbiguousRow { table: String, count: usize },
}

/// The row editor modal: every key present on the row, as text.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub table: String,
    row_id: RowId,
    original: Fields,
    pub draft: IndexMap<String, String>,
}

impl EditSession {
    fn open(table: &str, row: &Row) -> Self {
        Self {
            table: table.to_string(),
            row_id: row.id(),
            original: row.fields.clone(),
            draft: row
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.display()))
                .collect(),
        }
    }

    fn edited_fields(&self) -> Fields {
        self.draft
            .iter()
            .map(|(k, text)| {
                let previous = self.original.get(k).cloned().unwrap_or_default();
                (k.clone(), FieldValue::from_input(text, &previous))
            })
            .collect()
    }

    /// Index of the edited row: by synthetic id, else the best-effort
    /// identity match over the pre-edit snapshot.
    fn resolve(&self, tables: &TableSet) -> Result<usize, GridError> {
        let table = tables.table(&self.table);
        if let Some(idx) = table.and_then(|t| t.position(self.row_id)) {
            return Ok(idx);
        }

        match table.map_or(RowMatch::NotFound, |t| t.locate_by_identity(&self.original)) {
            RowMatch::Unique(idx) => Ok(idx),
            RowMatch::Ambiguous(count) => Err(GridError::AmbiguousRow {
                table: self.table.clone(),
                count,
            }),
            RowMatch::NotFound => Err(GridError::RowNotFound {
                table: self.table.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
struct ColumnDrag {
    table: String,
    key: String,
    start_width: f32,
}

#[derive(Debug, Clone)]
pub struct GridState {
    active: String,
    tab_order: Vec<String>,
    columns: IndexMap<String, Vec<ColumnDef>>,
    filters: HashMap<String, IndexMap<String, String>>,
    page: usize,
    page_size: usize,
    column_drag: Option<ColumnDrag>,
    dragged_tab: Option<String>,
    edit: Option<EditSession>,
    pub show_column_settings: bool,
}

impl Default for GridState {
    fn default() -> Self {
        let columns = default_columns();
        let mut tab_order: Vec<String> = columns.keys().cloned().collect();
        tab_order.push(statics::TAB_MAP.to_string());
        Self {
            active: statics::TBL_CRM.to_string(),
            tab_order,
            columns,
            filters: HashMap::new(),
            page: 1,
            page_size: PAGE_SIZES[0],
            column_drag: None,
            dragged_tab: None,
            edit: None,
            show_column_settings: false,
        }
    }
}

impl GridState {
    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn tab_order(&self) -> &[String] {
        &self.tab_order
    }

    pub fn select_table(&mut self, name: &str) {
        self.active = name.to_string();
        self.page = 1;
    }

    /// Column configuration of a table; unknown tables have none.
    pub fn columns(&self, table: &str) -> &[ColumnDef] {
        self.columns.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn visible_columns(&self, table: &str) -> Vec<&ColumnDef> {
        self.columns(table).iter().filter(|c| c.visible).collect()
    }

    pub fn toggle_column(&mut self, table: &str, key: &str) {
        if let Some(col) = self
            .columns
            .get_mut(table)
            .and_then(|cols| cols.iter_mut().find(|c| c.key == key))
        {
            col.visible = !col.visible;
        }
    }

    pub fn filter_text(&self, key: &str) -> &str {
        self.filters
            .get(&self.active)
            .and_then(|f| f.get(key))
            .map(String::as_str)
            .unwrap_or(statics::EMPTY)
    }

    pub fn set_filter(&mut self, key: &str, text: &str) {
        self.filters
            .entry(self.active.clone())
            .or_default()
            .insert(key.to_string(), text.to_string());
        self.page = 1;
    }

    pub fn filtered_view<'a>(&self, tables: &'a TableSet) -> Vec<&'a Row> {
        if self.active == statics::TAB_MAP {
            return Vec::new();
        }
        let rows = tables.rows(&self.active);
        match self.filters.get(&self.active) {
            Some(filters) => filter_rows(rows, filters),
            None => rows.iter().collect(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self, pages: usize) -> bool {
        self.page < pages
    }

    pub fn go_first(&mut self) {
        self.page = 1;
    }

    pub fn go_prev(&mut self) {
        if self.can_go_prev() {
            self.page -= 1;
        }
    }

    pub fn go_next(&mut self, pages: usize) {
        if self.can_go_next(pages) {
            self.page += 1;
        }
    }

    pub fn go_last(&mut self, pages: usize) {
        self.page = pages.max(1);
    }

    pub fn begin_resize(&mut self, table: &str, key: &str) {
        let Some(col) = self.columns(table).iter().find(|c| c.key == key) else {
            return;
        };
        self.column_drag = Some(ColumnDrag {
            table: table.to_string(),
            key: key.to_string(),
            start_width: col.width,
        });
    }

    /// Live width update while dragging; `total_delta` is measured from the
    /// point where the drag started.
    pub fn drag_resize(&mut self, total_delta: f32) {
        let Some(drag) = self.column_drag.clone() else {
            return;
        };
        if let Some(col) = self
            .columns
            .get_mut(&drag.table)
            .and_then(|cols| cols.iter_mut().find(|c| c.key == drag.key))
        {
            col.width = resized_width(drag.start_width, total_delta);
        }
    }

    pub fn end_resize(&mut self) {
        self.column_drag = None;
    }

    pub fn is_resizing(&self) -> bool {
        self.column_drag.is_some()
    }

    pub fn begin_tab_drag(&mut self, tab: &str) {
        self.dragged_tab = Some(tab.to_string());
    }

    /// Move the dragged tab into the slot of `target`.
    pub fn drag_tab_over(&mut self, target: &str) {
        let Some(dragged) = self.dragged_tab.as_deref() else {
            return;
        };
        if dragged == target {
            return;
        }
        let (Some(from), Some(to)) = (
            self.tab_order.iter().position(|t| t == dragged),
            self.tab_order.iter().position(|t| t == target),
        ) else {
            return;
        };
        let tab = self.tab_order.remove(from);
        self.tab_order.insert(to, tab);
    }

    pub fn end_tab_drag(&mut self) {
        self.dragged_tab = None;
    }

    pub fn dragged_tab(&self) -> Option<&str> {
        self.dragged_tab.as_deref()
    }

    pub fn open_editor(&mut self, row: &Row) {
        self.edit = Some(EditSession::open(&self.active, row));
    }

    pub fn editor(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditSession> {
        self.edit.as_mut()
    }

    pub fn close_editor(&mut self) {
        self.edit = None;
    }

    /// Replace the edited row in place. The session stays open on error so
    /// the operator can cancel explicitly.
    pub fn save_edit(&mut self, tables: &TableSet) -> Result<TableReplacement, GridError> {
        let session = self.edit.as_ref().ok_or(GridError::NoEditSession)?;
        let idx = session.resolve(tables)?;

        let base_revision = tables.revision(&session.table);
        let mut rows = tables.rows(&session.table).to_vec();
        rows[idx] = rows[idx].with_fields(session.edited_fields());

        let replacement = TableReplacement {
            table: session.table.clone(),
            rows,
            base_revision,
        };
        self.edit = None;
        Ok(replacement)
    }

    pub fn delete_edit(&mut self, tables: &TableSet) -> Result<TableReplacement, GridError> {
        let session = self.edit.as_ref().ok_or(GridError::NoEditSession)?;
        let idx = session.resolve(tables)?;

        let base_revision = tables.revision(&session.table);
        let mut rows = tables.rows(&session.table).to_vec();
        rows.remove(idx);

        let replacement = TableReplacement {
            table: session.table.clone(),
            rows,
            base_revision,
        };
        self.edit = None;
        Ok(replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::{GridError, GridState, MIN_COLUMN_WIDTH, page_count, page_slice, resized_width};
    use crate::statics;
    use crate::table::TableSet;

    fn crm() -> TableSet {
        TableSet::from_json5(
            "{ CRM: [
                { chat_id: '1', fio: 'Иванов Иван', status: 'Active' },
                { chat_id: '2', fio: 'Петров Пётр', status: 'Pending' },
                { chat_id: '3', fio: 'Иванова Анна' },
            ] }",
        )
        .unwrap()
    }

    #[test]
    fn filters_combine_with_and_and_missing_fields_fail() {
        let tables = crm();
        let mut grid = GridState::default();
        grid.select_table(statics::TBL_CRM);

        grid.set_filter("fio", "ИВАНОВ");
        assert_eq!(grid.filtered_view(&tables).len(), 2);

        grid.set_filter("status", "act");
        let view = grid.filtered_view(&tables);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].text("chat_id"), "1");

        grid.set_filter("status", "");
        assert_eq!(grid.filtered_view(&tables).len(), 2);
    }

    #[test]
    fn set_filter_resets_to_first_page() {
        let mut grid = GridState::default();
        grid.go_next(5);
        grid.go_next(5);
        assert_eq!(grid.page(), 3);
        grid.set_filter("fio", "x");
        assert_eq!(grid.page(), 1);
    }

    #[test]
    fn absent_table_degrades_to_empty_view() {
        let tables = TableSet::empty();
        let mut grid = GridState::default();
        grid.select_table("UNKNOWN");
        grid.set_filter("x", "y");
        assert!(grid.filtered_view(&tables).is_empty());
        assert!(grid.columns("UNKNOWN").is_empty());
    }

    #[test]
    fn pages_concatenate_back_to_the_view() {
        let items: Vec<u32> = (0..23).collect();
        let size = 10;
        let pages = page_count(items.len(), size);
        assert_eq!(pages, 3);

        let mut rebuilt = Vec::new();
        for p in 1..=pages {
            let slice = page_slice(&items, p, size);
            assert!(slice.len() <= size);
            rebuilt.extend_from_slice(slice);
        }
        assert_eq!(rebuilt, items);
        assert!(page_slice(&items, 4, size).is_empty());
        assert_eq!(page_count(0, size), 0);
    }

    #[test]
    fn navigation_is_bounded_by_page_count() {
        let mut grid = GridState::default();
        assert!(!grid.can_go_prev());
        grid.go_prev();
        assert_eq!(grid.page(), 1);
        grid.go_last(4);
        assert_eq!(grid.page(), 4);
        assert!(!grid.can_go_next(4));
        grid.go_next(4);
        assert_eq!(grid.page(), 4);
    }

    #[test]
    fn resize_never_goes_below_floor() {
        assert_eq!(resized_width(120.0, 30.0), 150.0);
        assert_eq!(resized_width(120.0, -1000.0), MIN_COLUMN_WIDTH);

        let mut grid = GridState::default();
        grid.begin_resize(statics::TBL_CRM, "fio");
        grid.drag_resize(-500.0);
        grid.end_resize();
        let fio = grid
            .columns(statics::TBL_CRM)
            .iter()
            .find(|c| c.key == "fio")
            .unwrap();
        assert_eq!(fio.width, MIN_COLUMN_WIDTH);
    }

    #[test]
    fn hidden_columns_stay_in_config() {
        let mut grid = GridState::default();
        let before = grid.columns(statics::TBL_CRM).len();
        grid.toggle_column(statics::TBL_CRM, "promo");
        assert_eq!(grid.columns(statics::TBL_CRM).len(), before);
        assert_eq!(grid.visible_columns(statics::TBL_CRM).len(), before - 1);
        grid.toggle_column(statics::TBL_CRM, "promo");
        assert_eq!(grid.visible_columns(statics::TBL_CRM).len(), before);
    }

    #[test]
    fn tab_drag_moves_tab_into_target_slot() {
        let mut grid = GridState::default();
        let first = grid.tab_order()[0].clone();
        let third = grid.tab_order()[2].clone();
        grid.begin_tab_drag(&third);
        grid.drag_tab_over(&first);
        grid.end_tab_drag();
        assert_eq!(grid.tab_order()[0], third);
        assert_eq!(grid.tab_order()[1], first);
        assert_eq!(grid.tab_order().last().map(String::as_str), Some(statics::TAB_MAP));
    }

    #[test]
    fn save_edit_replaces_only_the_edited_row() {
        let tables = crm();
        let mut grid = GridState::default();
        let row = tables.rows(statics::TBL_CRM)[1].clone();
        grid.open_editor(&row);
        grid.editor_mut()
            .unwrap()
            .draft
            .insert("status".to_string(), "Active".to_string());

        let replacement = grid.save_edit(&tables).unwrap();
        assert_eq!(replacement.base_revision, 0);
        assert_eq!(replacement.rows.len(), 3);
        assert_eq!(replacement.rows[1].text("status"), "Active");
        assert_eq!(replacement.rows[1].id(), row.id());
        assert_eq!(replacement.rows[0], tables.rows(statics::TBL_CRM)[0]);
        assert!(grid.editor().is_none());
    }

    #[test]
    fn delete_edit_removes_row() {
        let tables = crm();
        let mut grid = GridState::default();
        grid.open_editor(&tables.rows(statics::TBL_CRM)[0]);
        let replacement = grid.delete_edit(&tables).unwrap();
        let ids: Vec<String> = replacement.rows.iter().map(|r| r.text("chat_id")).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn edit_of_vanished_duplicate_row_is_refused() {
        let mut tables = TableSet::from_json5("{ CRM: [ { fio: 'X' }, { fio: 'Y' } ] }").unwrap();
        let mut grid = GridState::default();
        grid.open_editor(&tables.rows(statics::TBL_CRM)[0]);

        // Another panel re-creates the table with fresh row ids and a duplicate.
        let fresh = TableSet::from_json5("{ CRM: [ { fio: 'X' }, { fio: 'X' } ] }").unwrap();
        let rows = fresh.rows(statics::TBL_CRM).to_vec();
        tables.replace(statics::TBL_CRM, rows, 0).unwrap();

        assert_eq!(
            grid.save_edit(&tables),
            Err(GridError::AmbiguousRow {
                table: statics::TBL_CRM.to_string(),
                count: 2
            })
        );
        assert!(grid.editor().is_some());
    }
}
