//! bibmark: resolve `@key` citations in Markdown documents against a
//! bibliography and render them in a bibliographic style.
//!
//! This library provides functionality to:
//! - Load bibliographies from JSON, JSONL and BibTeX files
//! - Scan `@key` citation markers in Markdown text
//! - Format resolved records in the ACM or APA style
//! - Render a document as HTML or splice citations back into Markdown

pub mod authors;
pub mod bibliography;
pub mod bibtex;
pub mod field;
pub mod markdown;
pub mod output;
pub mod processor;
pub mod style;
pub mod variant;

pub use bibliography::{load_bibliography, Author, Bibliography, Record};
pub use markdown::{
    extract_citations, scan_citation, Citation, CitationMarker, InlineCursor, TextCursor,
};
pub use output::{generate_output, render_html, replace_citations, RenderedDocument};
pub use processor::{
    check_references, format_bibliography, format_citations, CitationRenderer, ProcessedCitation,
};
pub use style::{builtin_style, builtin_style_names, CitationStyle};
pub use variant::{classify, CitationVariant};
