//! Citation marker scanning.
//!
//! A marker is the sentinel `@` followed by a non-empty run of key
//! characters (ASCII letters, digits, `_`, `-`, `:`), e.g. `@Albert1989`.
//! The scan is greedy and never backtracks; a sentinel that is not followed
//! by a key character is left as plain text.

use tracing::trace;

/// The character that starts a citation marker.
pub const SENTINEL: u8 = b'@';

/// Read access to inline source text, one line at a time.
pub trait InlineCursor {
    /// The rest of the current line, starting at the cursor.
    fn peek_line(&self) -> &[u8];

    /// Moves the cursor forward by `n` bytes.
    fn advance(&mut self, n: usize);
}

/// An [`InlineCursor`] over a string slice.
#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TextCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Byte offset of the cursor in the underlying text.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Text from the cursor to the end.
    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }
}

impl InlineCursor for TextCursor<'_> {
    fn peek_line(&self) -> &[u8] {
        let rest = self.remaining().as_bytes();
        match rest.iter().position(|&b| b == b'\n') {
            Some(newline) => &rest[..=newline],
            None => rest,
        }
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
    }
}

/// A recognised citation marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationMarker {
    /// The key, without the sentinel (e.g. `Albert1989`).
    pub key: String,
    /// Everything consumed, sentinel included (e.g. `@Albert1989`).
    pub raw_text: String,
}

/// A marker together with its location in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub marker: CitationMarker,
    /// Start and end byte positions in the original text
    pub span: (usize, usize),
}

impl Citation {
    pub fn key(&self) -> &str {
        &self.marker.key
    }
}

/// Returns true for bytes allowed in a citation key.
pub fn is_key_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}

/// Scans one marker at the cursor.
///
/// On success the cursor has moved past the sentinel and the key. On
/// failure nothing is consumed.
pub fn scan_citation<C: InlineCursor + ?Sized>(cursor: &mut C) -> Option<CitationMarker> {
    let line = cursor.peek_line();
    if line.first() != Some(&SENTINEL) {
        return None;
    }

    let consumed = 1 + line[1..].iter().take_while(|&&b| is_key_char(b)).count();
    if consumed == 1 {
        trace!("sentinel without a citation key, leaving it as text");
        return None;
    }

    // key characters are ASCII, so each byte is one char
    let marker = CitationMarker {
        key: line[1..consumed].iter().map(|&b| char::from(b)).collect(),
        raw_text: line[..consumed].iter().map(|&b| char::from(b)).collect(),
    };
    cursor.advance(consumed);
    trace!(key = %marker.key, "scanned citation marker");
    Some(marker)
}

/// Extracts all citation markers from the given text, in order.
///
/// # Examples
///
/// ```
/// use bibmark::extract_citations;
///
/// let citations = extract_citations("As shown in @Albert1989, the results hold.");
/// assert_eq!(citations.len(), 1);
/// assert_eq!(citations[0].key(), "Albert1989");
/// ```
pub fn extract_citations(text: &str) -> Vec<Citation> {
    let mut cursor = TextCursor::new(text);
    let mut citations = Vec::new();

    while let Some(offset) = cursor.remaining().find(char::from(SENTINEL)) {
        cursor.advance(offset);
        let start = cursor.position();
        match scan_citation(&mut cursor) {
            Some(marker) => citations.push(Citation {
                marker,
                span: (start, cursor.position()),
            }),
            None => cursor.advance(1),
        }
    }

    citations
}
