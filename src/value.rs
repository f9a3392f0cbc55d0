use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A number cell. Keeps the integer/float distinction so an edited row renders
/// the same way it was seeded ("15000", not "15000.0"). Equality is by value,
/// so `I64(7)` and `U64(7)` are the same cell.
#[derive(Debug, Clone)]
pub enum FieldNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl PartialEq for FieldNumber {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl FieldNumber {
    fn as_i128(&self) -> Option<i128> {
        match self {
            FieldNumber::I64(v) => Some(i128::from(*v)),
            FieldNumber::U64(v) => Some(i128::from(*v)),
            FieldNumber::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            FieldNumber::I64(v) => *v as f64,
            FieldNumber::U64(v) => *v as f64,
            FieldNumber::F64(v) => *v,
        }
    }

    fn write_display(&self, out: &mut String) {
        match self {
            FieldNumber::I64(v) => out.push_str(&v.to_string()),
            FieldNumber::U64(v) => out.push_str(&v.to_string()),
            FieldNumber::F64(v) => {
                if !v.is_finite() {
                    out.push_str(&v.to_string());
                } else if v.fract() == 0.0 && v.abs() < 1e15 {
                    // Whole floats read like integers in the grid.
                    out.push_str(&(*v as i64).to_string());
                } else {
                    let mut buf = ryu::Buffer::new();
                    out.push_str(buf.format(*v));
                }
            }
        }
    }
}

/// One cell of a row. Rows are heterogeneous key/value maps, so every cell
/// carries its own type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(FieldNumber),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the cell. Text cells are parsed leniently so "15 000"
    /// and "15000.50" both count.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(n.as_f64()),
            FieldValue::Text(s) => {
                let compact: String = s
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| if c == ',' { '.' } else { c })
                    .collect();
                compact.parse::<f64>().ok()
            }
            _ => None,
        }
    }

    /// The string the grid shows and filters against. Null renders empty.
    pub fn display(&self) -> String {
        let mut out = String::new();
        match self {
            FieldValue::Null => {}
            FieldValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            FieldValue::Number(n) => n.write_display(&mut out),
            FieldValue::Text(s) => out.push_str(s),
        }
        out
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Case-insensitive substring test. `needle_lower` must already be lowercased.
    pub fn contains_lower(&self, needle_lower: &str) -> bool {
        self.display().to_lowercase().contains(needle_lower)
    }

    /// Convert text typed into an edit field back into a cell, keeping the
    /// type of the value it replaces where the text still fits that type.
    pub fn from_input(text: &str, previous: &FieldValue) -> FieldValue {
        match previous {
            FieldValue::Number(_) => parse_number_like(text)
                .map(FieldValue::Number)
                .unwrap_or_else(|| FieldValue::text(text)),
            FieldValue::Bool(_) => match text.trim() {
                "true" => FieldValue::Bool(true),
                "false" => FieldValue::Bool(false),
                _ => FieldValue::text(text),
            },
            FieldValue::Null if text.is_empty() => FieldValue::Null,
            _ => FieldValue::text(text),
        }
    }
}

fn parse_number_like(text: &str) -> Option<FieldNumber> {
    let t = text.trim();
    if let Ok(v) = t.parse::<i64>() {
        return Some(FieldNumber::I64(v));
    }
    if let Ok(v) = t.parse::<u64>() {
        return Some(FieldNumber::U64(v));
    }
    t.parse::<f64>().ok().map(FieldNumber::F64)
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(FieldNumber::I64(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(FieldNumber::F64(v))
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            FieldValue::Number(FieldNumber::I64(v)) => serializer.serialize_i64(*v),
            FieldValue::Number(FieldNumber::U64(v)) => serializer.serialize_u64(*v),
            FieldValue::Number(FieldNumber::F64(v)) => serializer.serialize_f64(*v),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldVisitor;

        impl<'de> de::Visitor<'de> for FieldVisitor {
            type Value = FieldValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a scalar or a list of scalars")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FieldValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FieldValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(FieldValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(FieldValue::Number(FieldNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(FieldValue::Number(FieldNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(FieldValue::Number(FieldNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(FieldValue::Text(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(FieldValue::Text(v))
            }

            // Lists (e.g. attached file names) collapse into one comma-joined cell.
            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut parts = Vec::new();
                while let Some(value) = seq.next_element::<FieldValue>()? {
                    parts.push(value.display());
                }
                Ok(FieldValue::Text(parts.join(", ")))
            }
        }

        deserializer.deserialize_any(FieldVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldNumber, FieldValue};
    use indexmap::IndexMap;

    #[test]
    fn display_renders_null_as_empty_and_whole_floats_as_integers() {
        assert_eq!(FieldValue::Null.display(), "");
        assert_eq!(FieldValue::Number(FieldNumber::F64(15000.0)).display(), "15000");
        assert_eq!(FieldValue::Number(FieldNumber::F64(0.25)).display(), "0.25");
        assert_eq!(FieldValue::from(42).display(), "42");
    }

    #[test]
    fn from_input_keeps_number_type_when_text_still_parses() {
        let prev = FieldValue::from(10);
        assert_eq!(FieldValue::from_input("25", &prev), FieldValue::from(25));
        assert_eq!(FieldValue::from_input("12.5", &prev), FieldValue::from(12.5));
        assert_eq!(FieldValue::from_input("n/a", &prev), FieldValue::text("n/a"));
        assert_eq!(FieldValue::from_input("", &FieldValue::Null), FieldValue::Null);
    }

    #[test]
    fn as_f64_accepts_spaced_text_numbers() {
        assert_eq!(FieldValue::text("15 000").as_f64(), Some(15000.0));
        assert_eq!(FieldValue::text("12,5").as_f64(), Some(12.5));
        assert_eq!(FieldValue::text("abc").as_f64(), None);
    }

    #[test]
    fn lists_deserialize_into_joined_text() {
        let row: IndexMap<String, FieldValue> =
            json5::from_str("{ files: ['a.pdf', 'b.png'], n: 3, ok: true, none: null }").unwrap();
        assert_eq!(row["files"], FieldValue::text("a.pdf, b.png"));
        assert_eq!(row["n"], FieldValue::from(3));
        assert_eq!(row["ok"], FieldValue::Bool(true));
        assert_eq!(row["none"], FieldValue::Null);
    }

    #[test]
    fn integers_compare_by_value_across_signedness() {
        assert_eq!(FieldNumber::I64(7), FieldNumber::U64(7));
        assert_eq!(FieldNumber::U64(7), FieldNumber::F64(7.0));
        assert_ne!(FieldNumber::I64(-1), FieldNumber::U64(u64::MAX));

        let seeded: IndexMap<String, FieldValue> = json5::from_str("{ id: 7 }").unwrap();
        let typed = FieldValue::from_input("7", &seeded["id"]);
        assert_eq!(seeded["id"], typed);
    }

    #[test]
    fn contains_lower_is_case_insensitive() {
        assert!(FieldValue::text("Иванов Пётр").contains_lower("иванов"));
        assert!(!FieldValue::Null.contains_lower("x"));
    }
}
