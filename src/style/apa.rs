//! APA style.
//!
//! Every structural field sits in its own `<span class="...">` so it can be
//! styled downstream. Required fields that are missing show up as
//! `??name??`; optional clauses are dropped. An inline citation is a short
//! `citation-key` fragment followed by the full reference.

use super::{arxiv_link, doi_link, escape_html, optional, retrieved_clause, text, CitationStyle};
use crate::authors::{format_authors_with, trim_last_name, AuthorStyle};
use crate::bibliography::Record;
use crate::field::{placeholder, MissingField};
use crate::variant::{classify, CitationVariant};

const REQUIRED: MissingField = MissingField::Placeholder;

#[derive(Debug, Clone, Copy, Default)]
pub struct Apa;

impl CitationStyle for Apa {
    fn name(&self) -> &'static str {
        "apa"
    }

    fn format_reference(&self, record: &Record, variant: CitationVariant) -> String {
        let head = Head::from_record(record);
        let body = match variant {
            CitationVariant::Article => format_article(&head, record),
            CitationVariant::Proceedings => format_proceedings(&head, record),
            CitationVariant::Book => format_book(&head, record),
            CitationVariant::Preprint => format_preprint(&head, record),
            CitationVariant::Default => format_default(&head, record),
        };
        format!(r#"<span class="citation-full">{}.</span>"#, body)
    }

    fn format_citation(&self, record: &Record) -> String {
        format!(
            "{}{}",
            format_citation_key(record),
            self.format_reference(record, classify(record))
        )
    }

    fn unresolved(&self, key: &str) -> String {
        format!("[??{}??]", escape_html(key))
    }
}

/// `<span class="citation-key">Abern., 1999</span>` from the first author's
/// (trimmed) last name and the year.
///
/// A plain-text `author` field is used whole.
pub fn format_citation_key(record: &Record) -> String {
    let last_name = match record.authors().first() {
        Some(author) if !author.last.is_empty() => escape_html(&trim_last_name(&author.last)),
        Some(_) => placeholder("author"),
        None => optional(record, "author").unwrap_or_else(|| placeholder("author")),
    };

    format!(
        r#"<span class="citation-key">{}, {}</span>"#,
        last_name,
        text(record, "year", REQUIRED)
    )
}

/// The `Authors (year). Title` part shared by all variants.
struct Head {
    authors: String,
    year: String,
    title: String,
}

impl Head {
    fn from_record(record: &Record) -> Self {
        let authors = if record.authors().is_empty() {
            optional(record, "author")
                .map(|author| span("author", &author))
                .unwrap_or_else(|| placeholder("author"))
        } else {
            format_authors_with(record.authors(), AuthorStyle::Apa, |name| {
                span("author", &escape_html(&name))
            })
        };
        Self {
            authors,
            year: text(record, "year", REQUIRED),
            title: text(record, "title", REQUIRED),
        }
    }
}

fn span(class: &str, content: &str) -> String {
    format!(r#"<span class="{}">{}</span>"#, class, content)
}

fn push_doi(citation: &mut String, record: &Record) {
    if let Some(doi) = optional(record, "doi") {
        citation.push_str(&format!(". doi: {}", doi_link(&doi)));
    }
}

fn format_article(head: &Head, record: &Record) -> String {
    let mut citation = format!(
        "{} ({}). {}. {}",
        head.authors,
        head.year,
        span("title", &head.title),
        span("journal", &text(record, "journal", REQUIRED))
    );

    if let Some(volume) = optional(record, "volume") {
        citation.push_str(", ");
        citation.push_str(&span("volume", &volume));
        if let Some(number) = optional(record, "number") {
            citation.push_str(&format!("({})", span("number", &number)));
        }
    }
    if let Some(pages) = optional(record, "pages") {
        citation.push_str(", ");
        citation.push_str(&span("pages", &pages));
    }
    push_doi(&mut citation, record);

    citation
}

fn format_proceedings(head: &Head, record: &Record) -> String {
    let mut citation = format!(
        "{} ({}). {}. In {}",
        head.authors,
        head.year,
        span("title", &head.title),
        span("booktitle", &text(record, "booktitle", REQUIRED))
    );

    if let Some(pages) = optional(record, "pages") {
        citation.push_str(&format!(" (pp. {})", span("pages", &pages)));
    }
    push_doi(&mut citation, record);

    citation
}

fn format_book(head: &Head, record: &Record) -> String {
    let mut citation = format!(
        "{} ({}). {}",
        head.authors,
        head.year,
        span("title", &format!("<em>{}</em>", head.title))
    );

    if let Some(edition) = optional(record, "edition") {
        citation.push_str(&format!(" ({} ed.)", span("edition", &edition)));
    }
    if let Some(publisher) = optional(record, "publisher") {
        citation.push_str(". ");
        citation.push_str(&span("publisher", &publisher));
        if let Some(address) = optional(record, "address") {
            citation.push_str(", ");
            citation.push_str(&span("address", &address));
        }
    }
    push_doi(&mut citation, record);

    citation
}

fn format_preprint(head: &Head, record: &Record) -> String {
    let mut citation = format!(
        "{} ({}). {}",
        head.authors,
        head.year,
        span("title", &head.title)
    );

    if let Some(eprint) = optional(record, "eprint") {
        let primary_class = optional(record, "primaryclass");
        citation.push_str(". ");
        citation.push_str(&arxiv_link(&eprint, primary_class.as_deref()));
    }

    citation
}

fn format_default(head: &Head, record: &Record) -> String {
    let date = match optional(record, "month") {
        Some(month) => format!("{}, {}", head.year, month),
        None => head.year.clone(),
    };
    let mut citation = format!("{} ({}). {}", head.authors, date, span("title", &head.title));

    let howpublished = optional(record, "howpublished").map(|how| span("howpublished", &how));
    let url = optional(record, "url");
    if let Some(clause) = retrieved_clause(howpublished.as_deref(), url.as_deref()) {
        citation.push_str(". ");
        citation.push_str(&clause);
    }

    citation
}
