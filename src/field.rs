//! Field lookup with a declared policy for absent values.
//!
//! Absence is never an error. Each style decides, per field, whether a
//! missing value drops its clause ([`MissingField::Omit`]) or shows up as a
//! visible `??name??` marker ([`MissingField::Placeholder`]).

use crate::bibliography::Record;

/// What a lookup yields when the field is absent or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// Yield an empty string.
    Omit,
    /// Yield `??name??` so the gap is visible in the output.
    Placeholder,
}

/// Returns the field text, or the sentinel chosen by `policy`.
pub fn get_field(record: &Record, name: &str, policy: MissingField) -> String {
    match optional_field(record, name) {
        Some(text) => text.to_string(),
        None => match policy {
            MissingField::Omit => String::new(),
            MissingField::Placeholder => placeholder(name),
        },
    }
}

/// Returns the field text when it is present and non-empty.
pub fn optional_field<'r>(record: &'r Record, name: &str) -> Option<&'r str> {
    record.field(name).filter(|text| !text.is_empty())
}

pub fn placeholder(name: &str) -> String {
    format!("??{}??", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record::new("k", "article")
            .with_field("title", "A Title")
            .with_field("volume", "")
    }

    #[test]
    fn test_present_field_ignores_policy() {
        let record = record();

        assert_eq!(get_field(&record, "title", MissingField::Omit), "A Title");
        assert_eq!(get_field(&record, "title", MissingField::Placeholder), "A Title");
    }

    #[test]
    fn test_absent_field_omit() {
        assert_eq!(get_field(&record(), "journal", MissingField::Omit), "");
    }

    #[test]
    fn test_absent_field_placeholder() {
        assert_eq!(
            get_field(&record(), "journal", MissingField::Placeholder),
            "??journal??"
        );
    }

    #[test]
    fn test_empty_field_counts_as_absent() {
        let record = record();

        assert_eq!(optional_field(&record, "volume"), None);
        assert_eq!(
            get_field(&record, "volume", MissingField::Placeholder),
            "??volume??"
        );
    }

    #[test]
    fn test_author_list_is_not_text() {
        let record = record().with_authors(vec![]);

        assert_eq!(optional_field(&record, "author"), None);
    }
}
