//! Bibliographic styles.
//!
//! A [`CitationStyle`] turns a resolved record into HTML-flavoured text.
//! Styles are stateless; the built-in ones are looked up by name with
//! [`builtin_style`].

pub mod acm;
pub mod apa;

use crate::bibliography::Record;
use crate::field::{get_field, optional_field, MissingField};
use crate::variant::{classify, CitationVariant};

pub use acm::Acm;
pub use apa::Apa;

const DOI_URL_PREFIX: &str = "https://doi.org/";
const ARXIV_URL_PREFIX: &str = "https://arxiv.org/abs/";

/// A formatting strategy for one bibliographic style.
pub trait CitationStyle: Send + Sync {
    /// Registry name, e.g. `"acm"`.
    fn name(&self) -> &'static str;

    /// The full reference for `record`, formatted with the template of `variant`.
    fn format_reference(&self, record: &Record, variant: CitationVariant) -> String;

    /// The text that replaces an inline citation marker.
    fn format_citation(&self, record: &Record) -> String {
        self.format_reference(record, classify(record))
    }

    /// The placeholder emitted for a key missing from the bibliography.
    fn unresolved(&self, key: &str) -> String;
}

/// Built-in styles: (name, strategy).
const BUILTIN_STYLES: &[(&str, &dyn CitationStyle)] = &[("acm", &Acm), ("apa", &Apa)];

/// Returns a built-in style by name (case-insensitive).
pub fn builtin_style(name: &str) -> Option<&'static dyn CitationStyle> {
    BUILTIN_STYLES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, style)| *style)
}

/// Returns the list of available builtin style names.
pub fn builtin_style_names() -> Vec<&'static str> {
    BUILTIN_STYLES.iter().map(|(n, _)| *n).collect()
}

/// Escapes text for inclusion in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Field text (escaped), or the sentinel chosen by `policy`.
fn text(record: &Record, name: &str, policy: MissingField) -> String {
    escape_html(&get_field(record, name, policy))
}

/// Escaped field text, only when present and non-empty.
fn optional(record: &Record, name: &str) -> Option<String> {
    optional_field(record, name).map(escape_html)
}

/// `<a href="https://doi.org/DOI">DOI</a>`; expects escaped input.
fn doi_link(doi: &str) -> String {
    format!(r#"<a href="{DOI_URL_PREFIX}{doi}">{doi}</a>"#)
}

/// `arXiv: <a href="https://arxiv.org/abs/ID">ID</a>` with an optional
/// ` [class]` suffix; expects escaped input.
fn arxiv_link(eprint: &str, primary_class: Option<&str>) -> String {
    let mut link = format!(r#"arXiv: <a href="{ARXIV_URL_PREFIX}{eprint}">{eprint}</a>"#);
    if let Some(class) = primary_class {
        link.push_str(&format!(" [{}]", class));
    }
    link
}

/// `<a href="URL">URL</a>`; expects escaped input.
fn url_link(url: &str) -> String {
    format!(r#"<a href="{url}">{url}</a>"#)
}

/// The "Retrieved [howpublished ]from <url>" clause, phrased for whichever
/// of the two fields is present.
fn retrieved_clause(howpublished: Option<&str>, url: Option<&str>) -> Option<String> {
    match (howpublished, url) {
        (Some(how), Some(url)) => Some(format!("Retrieved {} from {}", how, url_link(url))),
        (None, Some(url)) => Some(format!("Retrieved from {}", url_link(url))),
        (Some(how), None) => Some(how.to_string()),
        (None, None) => None,
    }
}
