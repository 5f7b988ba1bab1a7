//! ACM reference format.
//!
//! Missing fields are omitted. Only the citation as a whole and its DOI
//! link are wrapped in markup.

use super::{arxiv_link, doi_link, escape_html, optional, retrieved_clause, text, CitationStyle};
use crate::authors::{format_authors_with, AuthorStyle};
use crate::bibliography::Record;
use crate::field::{optional_field, MissingField};
use crate::variant::CitationVariant;

const POLICY: MissingField = MissingField::Omit;

#[derive(Debug, Clone, Copy, Default)]
pub struct Acm;

impl CitationStyle for Acm {
    fn name(&self) -> &'static str {
        "acm"
    }

    fn format_reference(&self, record: &Record, variant: CitationVariant) -> String {
        match variant {
            CitationVariant::Article => format_article(&ArticleRef::from_record(record)),
            CitationVariant::Proceedings => {
                format_proceedings(&ProceedingsRef::from_record(record))
            }
            CitationVariant::Book => format_book(&BookRef::from_record(record)),
            CitationVariant::Preprint => format_preprint(&PreprintRef::from_record(record)),
            CitationVariant::Default => format_default(&DefaultRef::from_record(record)),
        }
    }

    fn unresolved(&self, key: &str) -> String {
        format!("[?{}]", escape_html(key))
    }
}

/// Authors as `A, B and C`; falls back to a plain-text `author` field.
fn authors(record: &Record) -> String {
    if record.authors().is_empty() {
        return optional_field(record, "author")
            .map(escape_html)
            .unwrap_or_default();
    }
    format_authors_with(record.authors(), AuthorStyle::Acm, |name| escape_html(&name))
}

struct ArticleRef {
    authors: String,
    year: String,
    title: String,
    journal: String,
    volume: Option<String>,
    number: Option<String>,
    month: Option<String>,
    pages: Option<String>,
    doi: Option<String>,
}

impl ArticleRef {
    fn from_record(record: &Record) -> Self {
        Self {
            authors: authors(record),
            year: text(record, "year", POLICY),
            title: text(record, "title", POLICY),
            journal: text(record, "journal", POLICY),
            volume: optional(record, "volume"),
            number: optional(record, "number"),
            month: optional(record, "month"),
            pages: optional(record, "pages"),
            doi: optional(record, "doi"),
        }
    }
}

/// Patricia S. Abril and Robert Plant. 2007. The patent holder's dilemma.
/// <em>Commun. ACM</em> 50, 1 (Jan. 2007, 36-44). doi: ...
fn format_article(article: &ArticleRef) -> String {
    let mut citation = format!(
        r#"<span class="citation">{}. {}. {}. <em>{}</em>"#,
        article.authors, article.year, article.title, article.journal
    );

    if let Some(volume) = &article.volume {
        citation.push(' ');
        citation.push_str(volume);
        if let Some(number) = &article.number {
            citation.push_str(", ");
            citation.push_str(number);
        }
    }

    if article.month.is_some() || article.pages.is_some() {
        citation.push_str(" (");
        if let Some(month) = &article.month {
            citation.push_str(&format!("{} {}", month, article.year));
        }
        if let Some(pages) = &article.pages {
            if article.month.is_some() {
                citation.push_str(", ");
            }
            citation.push_str(pages);
        }
        citation.push(')');
    }

    if let Some(doi) = &article.doi {
        citation.push_str(&format!(". doi: {}", doi_link(doi)));
    }

    citation.push_str("</span>");
    citation
}

struct ProceedingsRef {
    authors: String,
    year: String,
    title: String,
    booktitle: String,
    month: Option<String>,
    address: Option<String>,
    publisher: Option<String>,
    pages: Option<String>,
    doi: Option<String>,
}

impl ProceedingsRef {
    fn from_record(record: &Record) -> Self {
        Self {
            authors: authors(record),
            year: text(record, "year", POLICY),
            title: text(record, "title", POLICY),
            booktitle: text(record, "booktitle", POLICY),
            month: optional(record, "month"),
            address: optional(record, "address"),
            publisher: optional(record, "publisher"),
            pages: optional(record, "pages"),
            doi: optional(record, "doi"),
        }
    }
}

/// Sten Andler. 1979. Predicate path expressions. In <em>Proceedings of
/// POPL '79</em>, January 1979, San Antonio, Texas. ACM Inc., 226-236. doi: ...
fn format_proceedings(r: &ProceedingsRef) -> String {
    let mut citation = format!(
        r#"<span class="citation">{}. {}. {}. In <em>{}</em>"#,
        r.authors, r.year, r.title, r.booktitle
    );

    if r.month.is_some() || r.address.is_some() {
        citation.push_str(", ");
        if let Some(month) = &r.month {
            citation.push_str(&format!("{} {}", month, r.year));
        }
        if let Some(address) = &r.address {
            if r.month.is_some() {
                citation.push_str(", ");
            }
            citation.push_str(address);
        }
    }

    if let Some(publisher) = &r.publisher {
        citation.push_str(". ");
        citation.push_str(publisher);
    }

    if let Some(pages) = &r.pages {
        citation.push_str(", ");
        citation.push_str(pages);
    }

    if let Some(doi) = &r.doi {
        citation.push_str(&format!(". doi: {}", doi_link(doi)));
    }

    citation.push_str("</span>");
    citation
}

struct BookRef {
    authors: String,
    year: String,
    title: String,
    edition: Option<String>,
    publisher: Option<String>,
    address: Option<String>,
    doi: Option<String>,
}

impl BookRef {
    fn from_record(record: &Record) -> Self {
        Self {
            authors: authors(record),
            year: text(record, "year", POLICY),
            title: text(record, "title", POLICY),
            edition: optional(record, "edition"),
            publisher: optional(record, "publisher"),
            address: optional(record, "address"),
            doi: optional(record, "doi"),
        }
    }
}

/// David Kosiur. 2001. <em>Understanding Policy-Based Networking</em>
/// (2nd. ed.). Wiley, New York, NY.
fn format_book(r: &BookRef) -> String {
    let mut citation = format!(
        r#"<span class="citation">{}. {}. <em>{}</em>"#,
        r.authors, r.year, r.title
    );

    if let Some(edition) = &r.edition {
        citation.push_str(&format!(" ({} ed.)", edition));
    }

    if let Some(publisher) = &r.publisher {
        citation.push_str(". ");
        citation.push_str(publisher);
        if let Some(address) = &r.address {
            citation.push_str(", ");
            citation.push_str(address);
        }
    }

    if let Some(doi) = &r.doi {
        citation.push_str(&format!(". doi: {}", doi_link(doi)));
    }

    citation.push_str("</span>");
    citation
}

struct PreprintRef {
    authors: String,
    year: String,
    title: String,
    eprint: Option<String>,
    primary_class: Option<String>,
}

impl PreprintRef {
    fn from_record(record: &Record) -> Self {
        Self {
            authors: authors(record),
            year: text(record, "year", POLICY),
            title: text(record, "title", POLICY),
            eprint: optional(record, "eprint"),
            primary_class: optional(record, "primaryclass"),
        }
    }
}

/// Ali Javadi-Abhari et al. 2024. Quantum computing with Qiskit.
/// arXiv: 2405.08810 [quant-ph]
fn format_preprint(r: &PreprintRef) -> String {
    let mut citation = format!(
        r#"<span class="citation">{}. {}. {}"#,
        r.authors, r.year, r.title
    );

    if let Some(eprint) = &r.eprint {
        citation.push_str(". ");
        citation.push_str(&arxiv_link(eprint, r.primary_class.as_deref()));
    }

    citation.push_str("</span>");
    citation
}

struct DefaultRef {
    authors: String,
    year: String,
    title: String,
    month: Option<String>,
    howpublished: Option<String>,
    url: Option<String>,
}

impl DefaultRef {
    fn from_record(record: &Record) -> Self {
        Self {
            authors: authors(record),
            year: text(record, "year", POLICY),
            title: text(record, "title", POLICY),
            month: optional(record, "month"),
            howpublished: optional(record, "howpublished"),
            url: optional(record, "url"),
        }
    }
}

fn format_default(r: &DefaultRef) -> String {
    let mut citation = format!(
        r#"<span class="citation">{}. {}. {}"#,
        r.authors, r.year, r.title
    );

    if let Some(month) = &r.month {
        citation.push_str(&format!(". ({} {})", month, r.year));
    }

    if let Some(clause) = retrieved_clause(r.howpublished.as_deref(), r.url.as_deref()) {
        citation.push_str(". ");
        citation.push_str(&clause);
    }

    citation.push_str("</span>");
    citation
}
