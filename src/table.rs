use crate::statics;
use crate::value::FieldValue;
use indexmap::IndexMap;
use uuid::Uuid;

/// Field map of one row. Insertion order is the order the edit modal shows.
pub type Fields = IndexMap<String, FieldValue>;

/// Synthetic identity assigned when a row enters a [`TableSet`].
/// Never serialized into the row's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(Uuid);

impl RowId {
    pub fn new() -> Self {
        RowId(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    pub fields: Fields,
}

impl Row {
    pub fn new(fields: Fields) -> Self {
        Self {
            id: RowId::new(),
            fields,
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Display text of a field; a missing field reads as the empty string.
    pub fn text(&self, key: &str) -> String {
        self.fields.get(key).map(FieldValue::display).unwrap_or_default()
    }

    pub fn with_fields(&self, fields: Fields) -> Self {
        Self { id: self.id, fields }
    }
}

/// Outcome of the best-effort identity lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMatch {
    Unique(usize),
    Ambiguous(usize),
    NotFound,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("table {table} changed since it was read (read revision {expected}, now {actual})")]
    StaleRevision {
        table: String,
        expected: u64,
        actual: u64,
    },
    #[error("parsing table data: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Row>,
    revision: u64,
}

impl Table {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Resolve a row from a field snapshot: the `id` field if the snapshot has
    /// one, else `chat_id`, else full structural equality. Only the first rule
    /// that applies is used, so the result is deterministic.
    pub fn locate_by_identity(&self, snapshot: &Fields) -> RowMatch {
        let non_blank = |key: &str| snapshot.get(key).filter(|v| !v.is_blank());

        let hits: Vec<usize> = if let Some(id) = non_blank(statics::FIELD_ID) {
            self.matching(|r| r.get(statics::FIELD_ID) == Some(id))
        } else if let Some(chat_id) = non_blank(statics::FIELD_CHAT_ID) {
            self.matching(|r| r.get(statics::FIELD_CHAT_ID) == Some(chat_id))
        } else {
            self.matching(|r| &r.fields == snapshot)
        };

        match hits.as_slice() {
            [] => RowMatch::NotFound,
            [idx] => RowMatch::Unique(*idx),
            many => RowMatch::Ambiguous(many.len()),
        }
    }

    fn matching(&self, pred: impl Fn(&Row) -> bool) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| pred(r))
            .map(|(i, _)| i)
            .collect()
    }
}

/// The named record collections shared by every view. Mutated only by
/// whole-collection replacement through [`TableSet::replace`].
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: IndexMap<String, Table>,
}

impl TableSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON5 document of the form `{ TABLE: [ {..row..}, .. ], .. }`.
    pub fn from_json5(text: &str) -> Result<Self, TableError> {
        let raw: IndexMap<String, Vec<Fields>> =
            json5::from_str(text).map_err(|e| TableError::Parse(e.to_string()))?;

        let tables = raw
            .into_iter()
            .map(|(name, rows)| {
                let rows = rows.into_iter().map(Row::new).collect();
                (name, Table { rows, revision: 0 })
            })
            .collect();
        Ok(Self { tables })
    }

    /// The static fixtures the portal starts from.
    pub fn seeded() -> Result<Self, TableError> {
        Self::from_json5(include_str!("../data/seed.json5"))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Rows of a table; an absent table reads as empty.
    pub fn rows(&self, name: &str) -> &[Row] {
        self.tables.get(name).map(Table::rows).unwrap_or(&[])
    }

    /// Revision of a table; an absent table is at revision 0.
    pub fn revision(&self, name: &str) -> u64 {
        self.tables.get(name).map_or(0, Table::revision)
    }

    /// Replace a whole collection. `expected_revision` is the revision the
    /// caller read before computing `rows`; a mismatch means another panel
    /// committed in between and the write is refused.
    pub fn replace(
        &mut self,
        name: &str,
        rows: Vec<Row>,
        expected_revision: u64,
    ) -> Result<u64, TableError> {
        let actual = self.revision(name);
        if actual != expected_revision {
            return Err(TableError::StaleRevision {
                table: name.to_string(),
                expected: expected_revision,
                actual,
            });
        }

        let table = self.tables.entry(name.to_string()).or_default();
        table.rows = rows;
        table.revision = actual + 1;
        Ok(table.revision)
    }

    /// Read-compute-replace helper: put a new row at the top of a table.
    pub fn prepend(&mut self, name: &str, fields: Fields) -> Result<RowId, TableError> {
        let base = self.revision(name);
        let row = Row::new(fields);
        let id = row.id();
        let mut rows = Vec::with_capacity(self.rows(name).len() + 1);
        rows.push(row);
        rows.extend_from_slice(self.rows(name));
        self.replace(name, rows, base)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Fields, RowMatch, TableError, TableSet};
    use crate::statics;
    use crate::value::FieldValue;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
            .collect()
    }

    #[test]
    fn seeded_fixtures_parse_and_contain_core_tables() {
        let set = TableSet::seeded().unwrap();
        for name in [
            statics::TBL_CRM,
            statics::TBL_LEADS,
            statics::TBL_LAWS,
            statics::TBL_SITE_TEXT,
            statics::TBL_BROADCAST,
        ] {
            assert!(set.table(name).is_some(), "missing {name}");
        }
        assert!(!set.rows(statics::TBL_CRM).is_empty());
    }

    #[test]
    fn absent_table_reads_as_empty() {
        let set = TableSet::empty();
        assert!(set.rows("NOPE").is_empty());
        assert_eq!(set.revision("NOPE"), 0);
    }

    #[test]
    fn replace_rejects_stale_revision() {
        let mut set = TableSet::from_json5("{ T: [ { a: '1' } ] }").unwrap();
        let base = set.revision("T");
        let rows = set.rows("T").to_vec();

        assert_eq!(set.replace("T", rows.clone(), base), Ok(1));
        let err = set.replace("T", rows, base).unwrap_err();
        assert_eq!(
            err,
            TableError::StaleRevision {
                table: "T".to_string(),
                expected: 0,
                actual: 1
            }
        );
    }

    #[test]
    fn prepend_puts_row_first() {
        let mut set = TableSet::from_json5("{ T: [ { a: 'old' } ] }").unwrap();
        set.prepend("T", fields(&[("a", "new")])).unwrap();
        let texts: Vec<String> = set.rows("T").iter().map(|r| r.text("a")).collect();
        assert_eq!(texts, vec!["new", "old"]);
    }

    #[test]
    fn locate_by_identity_prefers_id_then_chat_id_then_structure() {
        let set = TableSet::from_json5(
            "{ T: [ { id: 'a', chat_id: '1' }, { chat_id: '2', x: 'y' }, { x: 'z' }, { x: 'z' } ] }",
        )
        .unwrap();
        let table = set.table("T").unwrap();

        assert_eq!(
            table.locate_by_identity(&fields(&[("id", "a"), ("chat_id", "999")])),
            RowMatch::Unique(0)
        );
        assert_eq!(
            table.locate_by_identity(&fields(&[("chat_id", "2"), ("x", "changed")])),
            RowMatch::Unique(1)
        );
        assert_eq!(
            table.locate_by_identity(&fields(&[("x", "z")])),
            RowMatch::Ambiguous(2)
        );
        assert_eq!(
            table.locate_by_identity(&fields(&[("x", "missing")])),
            RowMatch::NotFound
        );
    }

    #[test]
    fn numeric_id_matches_regardless_of_integer_width() {
        let set = TableSet::from_json5("{ CRM: [ { id: 7, fio: 'A' }, { id: 8, fio: 'B' } ] }").unwrap();
        let table = set.table(statics::TBL_CRM).unwrap();
        let snapshot: Fields = [
            ("id".to_string(), FieldValue::from(7i64)),
            ("fio".to_string(), FieldValue::text("edited")),
        ]
        .into_iter()
        .collect();
        assert_eq!(table.locate_by_identity(&snapshot), RowMatch::Unique(0));
    }
}
