//! Constraint Normalizer
//!
//! Turns the free-text `restricciones` block written by an instructor into an ordered
//! checklist the generator can reference as `R1..Rn`.
//!
//! The text may be split by the section headers `Obligaciones:` and `Recomendaciones:`.
//! Only obligations become checklist entries; text before any header counts as obligatory.
//! Headers themselves are never entries.

use crate::traits::parser::Parser;

const BULLET_CHARS: &[char] = &['-', '*', '•', '\t', ' '];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Obligations,
    Recommendations,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        match line.to_lowercase().trim_end_matches(':') {
            "obligaciones" => Some(Section::Obligations),
            "recomendaciones" => Some(Section::Recommendations),
            _ => None,
        }
    }
}

/// Ordered, 1-indexed checklist of obligatory constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintList {
    items: Vec<String>,
}

impl ConstraintList {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Entries paired with their display tag: `("R1", "usar recursión")`.
    pub fn tagged(&self) -> impl Iterator<Item = (String, &str)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (format!("R{}", i + 1), item.as_str()))
    }

    /// Renders one `- [Rn] text` line per entry; empty when there are no entries.
    pub fn render(&self) -> String {
        self.tagged()
            .map(|(tag, item)| format!("- [{tag}] {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parser for constraint text, implementing [`Parser`].
pub struct ConstraintParser;

impl<'a> Parser<&'a str, ConstraintList> for ConstraintParser {
    fn parse(&self, raw: &'a str) -> ConstraintList {
        let mut section = Section::Obligations;
        let mut items = Vec::new();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(header) = Section::from_header(line) {
                section = header;
                continue;
            }
            if section == Section::Recommendations {
                continue;
            }
            let item = line.trim_start_matches(BULLET_CHARS);
            if !item.is_empty() {
                items.push(item.to_string());
            }
        }

        ConstraintList { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> ConstraintList {
        ConstraintParser.parse(raw)
    }

    #[test]
    fn recommendations_are_not_checklist_entries() {
        let list = normalize(
            "Obligaciones:\n- usar recursión\nRecomendaciones:\n- comentar código",
        );
        assert_eq!(list.items(), ["usar recursión"]);
        assert_eq!(
            list.tagged().collect::<Vec<_>>(),
            vec![("R1".to_string(), "usar recursión")]
        );
    }

    #[test]
    fn text_without_headers_is_all_obligatory() {
        let list = normalize("* no usar bucles\n• usar math\n\t- validar entrada\nsin bullet");
        assert_eq!(
            list.items(),
            ["no usar bucles", "usar math", "validar entrada", "sin bullet"]
        );
    }

    #[test]
    fn headers_are_case_insensitive_and_never_entries() {
        let list = normalize("OBLIGACIONES:\n- a\nrecomendaciones\n- b\nObligaciones::\n- c");
        assert_eq!(list.items(), ["a", "c"]);
    }

    #[test]
    fn header_with_text_after_it_is_a_regular_line() {
        let list = normalize("Obligaciones: usar listas");
        assert_eq!(list.items(), ["Obligaciones: usar listas"]);
    }

    #[test]
    fn bare_bullets_and_blank_lines_are_skipped() {
        let list = normalize("\n  \n-\n - * \n- real");
        assert_eq!(list.items(), ["real"]);
    }

    #[test]
    fn empty_input_is_empty_list() {
        let list = normalize("");
        assert!(list.is_empty());
        assert_eq!(list.render(), "");
    }

    #[test]
    fn render_numbers_from_one() {
        let list = normalize("- uno\n- dos");
        assert_eq!(list.len(), 2);
        assert_eq!(list.render(), "- [R1] uno\n- [R2] dos");
    }
}
