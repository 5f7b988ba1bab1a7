//! Entry classification.

use tracing::trace;

use crate::bibliography::Record;
use crate::field::optional_field;

/// The formatting template a record is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitationVariant {
    Article,
    Proceedings,
    Book,
    Preprint,
    Default,
}

impl CitationVariant {
    pub const ALL: [CitationVariant; 5] = [
        CitationVariant::Article,
        CitationVariant::Proceedings,
        CitationVariant::Book,
        CitationVariant::Preprint,
        CitationVariant::Default,
    ];

    pub fn of(record: &Record) -> Self {
        classify(record)
    }
}

/// Maps a record to its variant.
///
/// The entry type decides first; `archiveprefix` is only consulted for
/// types that are not article, proceedings or book.
pub fn classify(record: &Record) -> CitationVariant {
    let entry_type = record.entry_type.to_lowercase();
    let variant = match entry_type.as_str() {
        "article" => CitationVariant::Article,
        "inproceedings" | "conference" => CitationVariant::Proceedings,
        "book" => CitationVariant::Book,
        _ => match optional_field(record, "archiveprefix") {
            Some(prefix) if prefix.eq_ignore_ascii_case("arxiv") => CitationVariant::Preprint,
            _ => CitationVariant::Default,
        },
    };
    trace!(key = %record.key, entry_type = %record.entry_type, ?variant, "classified record");
    variant
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_type(entry_type: &str) -> CitationVariant {
        classify(&Record::new("k", entry_type))
    }

    #[test]
    fn test_known_types() {
        assert_eq!(classify_type("article"), CitationVariant::Article);
        assert_eq!(classify_type("inproceedings"), CitationVariant::Proceedings);
        assert_eq!(classify_type("conference"), CitationVariant::Proceedings);
        assert_eq!(classify_type("book"), CitationVariant::Book);
    }

    #[test]
    fn test_type_is_case_insensitive() {
        assert_eq!(classify_type("Article"), CitationVariant::Article);
        assert_eq!(classify_type("InProceedings"), CitationVariant::Proceedings);
        assert_eq!(classify_type("BOOK"), CitationVariant::Book);
    }

    #[test]
    fn test_unknown_types_default() {
        assert_eq!(classify_type("misc"), CitationVariant::Default);
        assert_eq!(classify_type("techreport"), CitationVariant::Default);
        assert_eq!(classify_type(""), CitationVariant::Default);
    }

    #[test]
    fn test_arxiv_prefix_makes_preprint() {
        let record = Record::new("k", "misc").with_field("archiveprefix", "ArXiv");

        assert_eq!(classify(&record), CitationVariant::Preprint);
    }

    #[test]
    fn test_other_archive_prefix_is_default() {
        let record = Record::new("k", "misc").with_field("archiveprefix", "bioRxiv");

        assert_eq!(classify(&record), CitationVariant::Default);
    }

    #[test]
    fn test_explicit_type_wins_over_arxiv_prefix() {
        for (entry_type, expected) in [
            ("article", CitationVariant::Article),
            ("inproceedings", CitationVariant::Proceedings),
            ("book", CitationVariant::Book),
        ] {
            let record = Record::new("k", entry_type).with_field("archiveprefix", "arXiv");
            assert_eq!(classify(&record), expected, "type {}", entry_type);
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        let record = Record::new("k", "misc").with_field("archiveprefix", "arXiv");

        assert_eq!(classify(&record), classify(&record));
        assert_eq!(CitationVariant::of(&record), classify(&record));
    }
}
