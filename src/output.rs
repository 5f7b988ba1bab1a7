//! Output generation for rendered citations.
//!
//! Two ways to put rendered citations back into a document:
//! - [`replace_citations`] splices them into the original Markdown source
//! - [`render_html`] converts the whole document to HTML, swapping each
//!   marker in the text for an inline-HTML event

use std::collections::VecDeque;

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::markdown::{extract_citations, CitationMarker};
use crate::processor::{CitationRenderer, ProcessedCitation};

/// Replaces citation markers in the Markdown with formatted citations.
///
/// Replacements are performed from the end of the text towards the
/// beginning so earlier spans stay valid.
pub fn replace_citations(markdown: &str, processed: &[ProcessedCitation]) -> String {
    if processed.is_empty() {
        return markdown.to_string();
    }

    let mut sorted_citations: Vec<_> = processed.iter().collect();
    sorted_citations.sort_by(|a, b| b.original_span.0.cmp(&a.original_span.0));

    let mut result = markdown.to_string();

    for citation in sorted_citations {
        let (start, end) = citation.original_span;
        result.replace_range(start..end, &citation.formatted);
    }

    result
}

/// Appends the reference list, under `bib_header`, to the document.
pub fn generate_output(content: &str, bibliography: Option<&str>, bib_header: &str) -> String {
    let mut output = content.trim_end().to_string();

    if let Some(bib) = bibliography {
        if !bib.is_empty() {
            output.push_str("\n\n");
            output.push_str(bib_header.trim_end());
            output.push_str("\n\n");
            output.push_str(bib);
        }
    }

    output
}

/// Result of converting a Markdown document to HTML.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub html: String,
    /// Markers found in the document text, in order.
    pub citations: Vec<CitationMarker>,
}

/// Converts Markdown to HTML with citation markers rendered in place.
///
/// Markers inside code spans and code blocks are left alone.
pub fn render_html(markdown: &str, renderer: &CitationRenderer<'_>) -> RenderedDocument {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut filter = CitationFilter::new(TextMergeStream::new(parser), *renderer);

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, &mut filter);

    RenderedDocument {
        html: output,
        citations: filter.into_citations(),
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Iterator adapter that renders citation markers in a pulldown-cmark
/// event stream.
///
/// Each text event containing markers is split into plain text and
/// [`Event::InlineHtml`] events carrying the rendered citations. All other
/// events pass through unchanged. Expects adjacent text events to be merged
/// (see [`TextMergeStream`]) so a marker is never split across events.
pub struct CitationFilter<'a, 'r, I: Iterator<Item = Event<'a>>> {
    iter: I,
    renderer: CitationRenderer<'r>,
    pending: VecDeque<Event<'a>>,
    citations: Vec<CitationMarker>,
    in_code_block: bool,
}

impl<'a, 'r, I: Iterator<Item = Event<'a>>> CitationFilter<'a, 'r, I> {
    pub fn new(iter: I, renderer: CitationRenderer<'r>) -> Self {
        Self {
            iter,
            renderer,
            pending: VecDeque::new(),
            citations: Vec::new(),
            in_code_block: false,
        }
    }

    /// Markers rendered so far.
    pub fn citations(&self) -> &[CitationMarker] {
        &self.citations
    }

    pub fn into_citations(self) -> Vec<CitationMarker> {
        self.citations
    }

    fn split_text(&mut self, text: CowStr<'a>) -> Event<'a> {
        let found = extract_citations(&text);
        if found.is_empty() {
            return Event::Text(text);
        }

        let mut last = 0;
        for citation in found {
            let (start, end) = citation.span;
            if start > last {
                self.pending
                    .push_back(Event::Text(CowStr::from(text[last..start].to_string())));
            }
            let rendered = self.renderer.render(&citation.marker);
            self.pending.push_back(Event::InlineHtml(CowStr::from(rendered)));
            self.citations.push(citation.marker);
            last = end;
        }
        if last < text.len() {
            self.pending
                .push_back(Event::Text(CowStr::from(text[last..].to_string())));
        }

        // at least one event was queued above
        self.pending.pop_front().unwrap_or(Event::Text(CowStr::from("")))
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for CitationFilter<'a, '_, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        match self.iter.next()? {
            event @ Event::Start(Tag::CodeBlock(_)) => {
                self.in_code_block = true;
                Some(event)
            }
            event @ Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
                Some(event)
            }
            Event::Text(text) if !self.in_code_block => Some(self.split_text(text)),
            event => Some(event),
        }
    }
}
