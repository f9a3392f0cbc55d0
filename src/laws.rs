//! Constitution / FAQ over the LAWS table.

use crate::app::Language;
use crate::statics;
use crate::table::{Row, TableSet};

const SEARCH_FIELDS: [&str; 4] = ["q", "a", "q_olbanian", "a_olbanian"];

/// Case-insensitive substring search in both languages. An empty query
/// returns every entry.
pub fn search<'a>(tables: &'a TableSet, query: &str) -> Vec<&'a Row> {
    let needle = query.trim().to_lowercase();
    tables
        .rows(statics::TBL_LAWS)
        .iter()
        .filter(|law| {
            needle.is_empty()
                || SEARCH_FIELDS
                    .iter()
                    .any(|f| law.text(f).to_lowercase().contains(&needle))
        })
        .collect()
}

fn localized(law: &Row, base: &str, language: Language) -> String {
    if language == Language::Olbanian {
        let olb = law.text(&format!("{base}_olbanian"));
        if !olb.trim().is_empty() {
            return olb;
        }
    }
    law.text(base)
}

pub fn question(law: &Row, language: Language) -> String {
    localized(law, "q", language)
}

pub fn answer(law: &Row, language: Language) -> String {
    localized(law, "a", language)
}

#[cfg(test)]
mod tests {
    use super::{answer, question, search};
    use crate::app::Language;
    use crate::table::TableSet;

    fn laws() -> TableSet {
        TableSet::from_json5(
            "{ LAWS: [
                { q: 'Кто такой Канцлер?', a: 'Dr.White', q_olbanian: 'КТО ГЛАГНЕ?', a_olbanian: '' },
                { q: 'Налоги', a: 'Отсутствуют' },
            ] }",
        )
        .unwrap()
    }

    #[test]
    fn search_covers_both_languages() {
        let tables = laws();
        assert_eq!(search(&tables, "").len(), 2);
        assert_eq!(search(&tables, "глагне").len(), 1);
        assert_eq!(search(&tables, "WHITE").len(), 1);
        assert!(search(&tables, "виза").is_empty());
    }

    #[test]
    fn olbanian_falls_back_to_russian_when_blank() {
        let tables = laws();
        let law = search(&tables, "канцлер")[0];
        assert_eq!(question(law, Language::Olbanian), "КТО ГЛАГНЕ?");
        assert_eq!(answer(law, Language::Olbanian), "Dr.White");
        assert_eq!(question(law, Language::Ru), "Кто такой Канцлер?");
    }
}
