use crate::table::Fields;
use crate::value::FieldValue;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomField {
    pub key: String,
    pub value: String,
}

/// The "add to knowledge base" form shown above the KNOWLEDGE tab.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeDraft {
    pub category: String,
    pub content: String,
    pub answer: String,
    pub files: Vec<String>,
    pub custom: Vec<CustomField>,
}

impl KnowledgeDraft {
    /// Attached files are recorded by name only.
    pub fn attach<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(names.into_iter().map(Into::into));
    }

    pub fn add_custom_field(&mut self) {
        self.custom.push(CustomField::default());
    }

    pub fn remove_custom_field(&mut self, idx: usize) {
        if idx < self.custom.len() {
            self.custom.remove(idx);
        }
    }

    /// Row for the KNOWLEDGE table. Custom fields with an empty key are
    /// dropped; a custom key may overwrite a built-in one.
    pub fn to_fields(&self) -> Fields {
        let mut row = Fields::new();
        row.insert("category".into(), FieldValue::text(&self.category));
        row.insert("content".into(), FieldValue::text(&self.content));
        row.insert("answer".into(), FieldValue::text(&self.answer));
        row.insert("files".into(), FieldValue::text(self.files.join(", ")));
        for field in &self.custom {
            let key = field.key.trim();
            if !key.is_empty() {
                row.insert(key.to_string(), FieldValue::text(&field.value));
            }
        }
        row
    }

    /// Take the row out and reset the form.
    pub fn submit(&mut self) -> Fields {
        let row = self.to_fields();
        *self = Self::default();
        row
    }
}

#[cfg(test)]
mod tests {
    use super::{CustomField, KnowledgeDraft};
    use crate::value::FieldValue;

    #[test]
    fn submit_joins_files_and_keeps_named_custom_fields() {
        let mut draft = KnowledgeDraft {
            category: "Налоги".into(),
            content: "НДС".into(),
            answer: "20%".into(),
            ..Default::default()
        };
        draft.attach(["a.pdf", "b.png"]);
        draft.custom.push(CustomField {
            key: "source".into(),
            value: "НК РФ".into(),
        });
        draft.custom.push(CustomField {
            key: " ".into(),
            value: "lost".into(),
        });

        let row = draft.submit();
        assert_eq!(row["files"], FieldValue::text("a.pdf, b.png"));
        assert_eq!(row["source"], FieldValue::text("НК РФ"));
        assert_eq!(row.len(), 5);
        assert!(draft.category.is_empty() && draft.files.is_empty());
    }
}
