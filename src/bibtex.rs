//! BibTeX loading.
//!
//! Parsing (entries, `@string` abbreviations, `#` concatenation, LaTeX
//! escapes and name splitting) is done by the `biblatex` crate. This module
//! maps its entries into [`Record`]s: field values become plain text and the
//! `author` field becomes a list of [`Author`]s.

use std::sync::LazyLock;

use biblatex::{Chunk, Chunks, Entry, ParseError, Person};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::bibliography::{Author, FieldValue, Record};

/// A BibTeX database that could not be parsed.
#[derive(Error, Debug)]
#[error("line {line}: {source}")]
pub struct BibtexError {
    /// 1-based line where the error starts
    pub line: usize,
    #[source]
    pub source: ParseError,
}

/// Fields whose value is kept exactly as written.
const VERBATIM_FIELDS: &[&str] = &["url", "doi", "eprint"];

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[A-Za-z]+\*?").expect("command pattern is valid"));

static ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\([&%$#_])").expect("escape pattern is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Parses a BibTeX database into records, in source order.
///
/// # Errors
///
/// Returns a [`BibtexError`] carrying the line of the first syntax error.
pub fn parse_bibtex(input: &str) -> Result<Vec<Record>, BibtexError> {
    let database = biblatex::Bibliography::parse(input).map_err(|source| BibtexError {
        line: line_of(input, source.span.start),
        source,
    })?;

    let records: Vec<Record> = database.iter().map(to_record).collect();
    debug!(count = records.len(), "parsed bibtex database");
    Ok(records)
}

fn line_of(input: &str, offset: usize) -> usize {
    let end = offset.min(input.len());
    input.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

fn to_record(entry: &Entry) -> Record {
    let mut record = Record::new(entry.key.clone(), entry.entry_type.to_string().to_lowercase());

    for (name, chunks) in &entry.fields {
        let name = name.to_lowercase();
        if name == "author" {
            continue;
        }
        let value = if VERBATIM_FIELDS.contains(&name.as_str()) {
            verbatim_text(chunks)
        } else {
            plain_text(chunks)
        };
        record.fields.insert(name, FieldValue::Text(value));
    }

    if entry.fields.contains_key("author") {
        let value = match entry.author() {
            Ok(people) => FieldValue::Authors(people.iter().map(to_author).collect()),
            Err(e) => {
                trace!(key = %entry.key, error = %e, "author field kept as text");
                FieldValue::Text(entry.fields.get("author").map(plain_text).unwrap_or_default())
            }
        };
        record.fields.insert("author".to_string(), value);
    }

    record
}

fn to_author(person: &Person) -> Author {
    let last = match person.suffix.as_str() {
        "" => simplify_text(&person.name),
        suffix => simplify_text(&format!("{} {}", person.name, suffix)),
    };
    Author {
        first: simplify_text(&person.given_name),
        prefix: simplify_text(&person.prefix),
        last,
    }
}

fn verbatim_text(chunks: &Chunks) -> String {
    chunks
        .iter()
        .map(|chunk| match &chunk.v {
            Chunk::Normal(s) | Chunk::Verbatim(s) | Chunk::Math(s) => s.as_str(),
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn plain_text(chunks: &Chunks) -> String {
    let mut text = String::new();
    for chunk in chunks {
        match &chunk.v {
            Chunk::Normal(s) => text.push_str(&strip_markup(s)),
            Chunk::Verbatim(s) => text.push_str(s),
            Chunk::Math(s) => {
                text.push('$');
                text.push_str(s);
                text.push('$');
            }
        }
    }
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Drops LaTeX control words and grouping braces, keeping their arguments.
///
/// Dash ligatures keep their source spelling (`223--241`) and ties become
/// plain spaces.
fn strip_markup(text: &str) -> String {
    let text = ESCAPE_RE.replace_all(text, "$1");
    let text = COMMAND_RE.replace_all(&text, "");
    text.chars()
        .filter(|c| !matches!(c, '{' | '}'))
        .map(|c| match c {
            '~' | '\u{a0}' => " ".to_string(),
            '\u{2013}' => "--".to_string(),
            '\u{2014}' => "---".to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// Plain text for a name part or a free-standing LaTeX string.
pub fn simplify_text(raw: &str) -> String {
    WHITESPACE_RE
        .replace_all(strip_markup(raw).trim(), " ")
        .into_owned()
}
