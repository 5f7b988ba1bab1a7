//! Author list formatting.
//!
//! ACM renders `First Prefix Last` joined as `A, B and C`.
//! APA renders `Last First` joined as `A, B, & C`.

use crate::bibliography::Author;

/// How one name is laid out and how the list is joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorStyle {
    Acm,
    Apa,
}

impl AuthorStyle {
    fn final_joiner(self) -> &'static str {
        match self {
            AuthorStyle::Acm => " and ",
            AuthorStyle::Apa => ", & ",
        }
    }
}

/// Renders a single name. Empty components are skipped.
pub fn format_name(author: &Author, style: AuthorStyle) -> String {
    let parts = match style {
        AuthorStyle::Acm => vec![
            author.first.as_str(),
            author.prefix.as_str(),
            author.last.as_str(),
        ],
        AuthorStyle::Apa => vec![author.last.as_str(), author.first.as_str()],
    };
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Joins names with `", "` and puts `final_joiner` before the last one.
pub fn join_names<I>(names: I, final_joiner: &str) -> String
where
    I: IntoIterator<Item = String>,
    I::IntoIter: ExactSizeIterator,
{
    let names = names.into_iter();
    let count = names.len();
    let mut joined = String::new();
    for (i, name) in names.enumerate() {
        if i > 0 {
            if i == count - 1 {
                joined.push_str(final_joiner);
            } else {
                joined.push_str(", ");
            }
        }
        joined.push_str(&name);
    }
    joined
}

/// Formats an author list as plain text.
pub fn format_authors(authors: &[Author], style: AuthorStyle) -> String {
    format_authors_with(authors, style, |name| name)
}

/// Formats an author list, passing each rendered name through `decorate`
/// before joining (used to wrap names in markup).
pub fn format_authors_with(
    authors: &[Author],
    style: AuthorStyle,
    decorate: impl Fn(String) -> String,
) -> String {
    join_names(
        authors
            .iter()
            .map(|author| decorate(format_name(author, style))),
        style.final_joiner(),
    )
}

/// Shortens a last name longer than 7 characters to its first 6 plus `.`.
///
/// ```
/// use bibmark::authors::trim_last_name;
///
/// assert_eq!(trim_last_name("Abernathy"), "Abern.");
/// assert_eq!(trim_last_name("Albert"), "Albert");
/// ```
pub fn trim_last_name(name: &str) -> String {
    if name.chars().count() > 7 {
        let mut trimmed: String = name.chars().take(6).collect();
        trimmed.push('.');
        trimmed
    } else {
        name.to_string()
    }
}
