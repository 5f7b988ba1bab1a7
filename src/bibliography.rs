//! Bibliography snapshot and loading.
//!
//! A [`Bibliography`] maps citation keys to [`Record`]s. It is built once,
//! before any document is converted, and is read-only afterwards.
//!
//! Records can be loaded from:
//! - a JSON array of record objects (`.json`)
//! - JSONL, one record object per line (`.jsonl`)
//! - a BibTeX database (`.bib`, `.bibtex`)

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::bibtex::{parse_bibtex, BibtexError};

/// Errors that can occur when loading a bibliography.
#[derive(Error, Debug)]
pub enum BibliographyError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid JSONL at line {line}: {message}")]
    JsonlError { line: usize, message: String },

    #[error("Records must be a JSON array")]
    NotAnArray,

    #[error("Invalid BibTeX: {0}")]
    BibtexError(#[from] BibtexError),

    #[error("Unsupported bibliography format: {0}")]
    UnsupportedFormat(String),
}

/// One author of a record, split into name components.
///
/// Any component may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub last: String,
}

impl Author {
    /// Creates an author without a name particle.
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            prefix: String::new(),
            last: last.into(),
        }
    }

    /// Sets the name particle (e.g. "van", "de la").
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// The value of a record field.
///
/// Every field is plain text except `author`, which is an ordered list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged, from = "RawFieldValue")]
pub enum FieldValue {
    Text(String),
    Authors(Vec<Author>),
}

// JSON snapshots sometimes carry numeric years or volumes.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldValue {
    Text(String),
    Number(serde_json::Number),
    Authors(Vec<Author>),
}

impl From<RawFieldValue> for FieldValue {
    fn from(raw: RawFieldValue) -> Self {
        match raw {
            RawFieldValue::Text(text) => FieldValue::Text(text),
            RawFieldValue::Number(number) => FieldValue::Text(number.to_string()),
            RawFieldValue::Authors(authors) => FieldValue::Authors(authors),
        }
    }
}

/// A single bibliographic record, identified by its citation key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub key: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(flatten)]
    pub fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: HashMap::new(),
        }
    }

    /// Adds a text field. Field names are stored lower-cased.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.to_lowercase(), FieldValue::Text(value.into()));
        self
    }

    /// Sets the `author` field.
    pub fn with_authors(mut self, authors: Vec<Author>) -> Self {
        self.fields
            .insert("author".to_string(), FieldValue::Authors(authors));
        self
    }

    /// Returns the text of a field, or `None` if it is absent or not text.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the structured authors, or an empty slice.
    pub fn authors(&self) -> &[Author] {
        match self.fields.get("author") {
            Some(FieldValue::Authors(authors)) => authors,
            _ => &[],
        }
    }

    fn normalize_field_names(mut self) -> Self {
        if self.fields.keys().any(|k| k.chars().any(char::is_uppercase)) {
            self.fields = self
                .fields
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect();
        }
        self
    }
}

/// Read-only mapping from citation key to record.
#[derive(Debug, Clone, Default)]
pub struct Bibliography {
    records: HashMap<String, Record>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bibliography; a later record replaces an earlier one with the same key.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut records_by_key = HashMap::new();
        for record in records {
            let record = record.normalize_field_names();
            if records_by_key.contains_key(&record.key) {
                warn!(key = %record.key, "duplicate bibliography key, keeping the last entry");
            }
            records_by_key.insert(record.key.clone(), record);
        }
        Self {
            records: records_by_key,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

impl FromIterator<Record> for Bibliography {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}

/// Loads a bibliography, choosing the reader from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is malformed, or has an
/// unsupported extension.
pub fn load_bibliography(path: &Path) -> Result<Bibliography, BibliographyError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let records = match extension.as_str() {
        "json" | "jsonl" => parse_json_records(&fs::read_to_string(path)?)?,
        "bib" | "bibtex" => parse_bibtex(&fs::read_to_string(path)?)?,
        _ => {
            return Err(BibliographyError::UnsupportedFormat(format!(
                "'{}' (expected .json, .jsonl or .bib)",
                path.display()
            )))
        }
    };

    debug!(path = %path.display(), count = records.len(), "loaded bibliography");
    Ok(Bibliography::from_records(records))
}

/// Parses records from a JSON array or from JSONL content.
///
/// Empty content yields no records.
pub fn parse_json_records(content: &str) -> Result<Vec<Record>, BibliographyError> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    // a single multi-line JSON value is a malformed .json file, not JSONL
    if trimmed.lines().count() > 1
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return Err(BibliographyError::NotAnArray);
    }

    let mut records = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Record>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                return Err(BibliographyError::JsonlError {
                    line: line_num + 1,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(records)
}
