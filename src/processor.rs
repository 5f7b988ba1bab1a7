//! Citation resolution and rendering.
//!
//! A [`CitationRenderer`] looks each marker up in the bibliography and
//! delegates to the configured [`CitationStyle`]. Unresolved keys render as
//! the style's placeholder; they never abort a conversion.

use thiserror::Error;
use tracing::{debug, warn};

use crate::bibliography::Bibliography;
use crate::markdown::{Citation, CitationMarker};
use crate::style::CitationStyle;
use crate::variant::classify;

/// Errors raised by strict resolution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Reference not found: {0}")]
    ReferenceNotFound(String),
}

/// A citation that has been rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedCitation {
    /// The span in the original text where this citation was found
    pub original_span: (usize, usize),
    /// The rendered citation text
    pub formatted: String,
}

/// Renders citation markers against one bibliography in one style.
#[derive(Clone, Copy)]
pub struct CitationRenderer<'a> {
    bibliography: &'a Bibliography,
    style: &'a dyn CitationStyle,
}

impl<'a> CitationRenderer<'a> {
    pub fn new(bibliography: &'a Bibliography, style: &'a dyn CitationStyle) -> Self {
        Self {
            bibliography,
            style,
        }
    }

    pub fn style(&self) -> &'a dyn CitationStyle {
        self.style
    }

    pub fn bibliography(&self) -> &'a Bibliography {
        self.bibliography
    }

    /// Renders one marker, or the style's placeholder if its key is unknown.
    pub fn render(&self, marker: &CitationMarker) -> String {
        match self.bibliography.get(&marker.key) {
            Some(record) => {
                debug!(key = %marker.key, style = self.style.name(), "resolved citation");
                self.style.format_citation(record)
            }
            None => {
                warn!(key = %marker.key, "citation key not found in bibliography");
                self.style.unresolved(&marker.key)
            }
        }
    }
}

/// Renders every citation, keeping its span for later substitution.
pub fn format_citations(
    citations: &[Citation],
    renderer: &CitationRenderer<'_>,
) -> Vec<ProcessedCitation> {
    citations
        .iter()
        .map(|citation| ProcessedCitation {
            original_span: citation.span,
            formatted: renderer.render(&citation.marker),
        })
        .collect()
}

/// Formats the reference list for the given markers.
///
/// One `<li>` per resolved marker, in document order. The list is not
/// sorted or deduplicated; unresolved markers are skipped. Returns an
/// empty string when nothing resolves.
pub fn format_bibliography<'c>(
    markers: impl IntoIterator<Item = &'c CitationMarker>,
    renderer: &CitationRenderer<'_>,
) -> String {
    let items: Vec<String> = markers
        .into_iter()
        .filter_map(|marker| renderer.bibliography().get(&marker.key))
        .map(|record| {
            format!(
                "<li>{}</li>",
                renderer.style().format_reference(record, classify(record))
            )
        })
        .collect();

    if items.is_empty() {
        return String::new();
    }

    format!("<ol class=\"references\">\n{}\n</ol>", items.join("\n"))
}

/// Fails on the first marker whose key is not in the bibliography.
pub fn check_references<'c>(
    markers: impl IntoIterator<Item = &'c CitationMarker>,
    bibliography: &Bibliography,
) -> Result<(), ProcessorError> {
    match markers
        .into_iter()
        .find(|marker| !bibliography.contains_key(&marker.key))
    {
        Some(missing) => Err(ProcessorError::ReferenceNotFound(missing.key.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bibliography::{Author, Record};
    use crate::markdown::extract_citations;
    use crate::style::{Acm, Apa};
    use pretty_assertions::assert_eq;

    fn bibliography() -> Bibliography {
        Bibliography::from_records([
            Record::new("doe2021", "book")
                .with_authors(vec![Author::new("John", "Doe")])
                .with_field("year", "2021")
                .with_field("title", "Test Book"),
            Record::new("smith2020", "misc")
                .with_authors(vec![Author::new("Alice", "Smith")])
                .with_field("year", "2020")
                .with_field("title", "Notes"),
        ])
    }

    fn marker(key: &str) -> CitationMarker {
        CitationMarker {
            key: key.to_string(),
            raw_text: format!("@{}", key),
        }
    }

    #[test]
    fn test_render_resolved_acm() {
        let bib = bibliography();
        let renderer = CitationRenderer::new(&bib, &Acm);

        assert_eq!(
            renderer.render(&marker("doe2021")),
            r#"<span class="citation">John Doe. 2021. <em>Test Book</em></span>"#
        );
    }

    #[test]
    fn test_render_unresolved_uses_style_placeholder() {
        let bib = bibliography();

        assert_eq!(
            CitationRenderer::new(&bib, &Acm).render(&marker("Unknown2099")),
            "[?Unknown2099]"
        );
        assert_eq!(
            CitationRenderer::new(&bib, &Apa).render(&marker("Unknown2099")),
            "[??Unknown2099??]"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let bib = bibliography();
        let renderer = CitationRenderer::new(&bib, &Apa);

        assert_eq!(
            renderer.render(&marker("smith2020")),
            renderer.render(&marker("smith2020"))
        );
    }

    #[test]
    fn test_format_citations_keeps_spans() {
        // Given: text with one known and one unknown key
        let text = "See @doe2021 and @missing.";
        let citations = extract_citations(text);
        let bib = bibliography();
        let renderer = CitationRenderer::new(&bib, &Acm);

        // When: we format the citations
        let processed = format_citations(&citations, &renderer);

        // Then: spans point at the markers and each gets rendered text
        assert_eq!(processed.len(), 2);
        assert_eq!(processed[0].original_span, (4, 12));
        assert!(processed[0].formatted.contains("John Doe"));
        assert_eq!(processed[1].original_span, (17, 25));
        assert_eq!(processed[1].formatted, "[?missing]");
    }

    #[test]
    fn test_format_bibliography_in_document_order() {
        let citations = extract_citations("@smith2020 @missing @doe2021 @smith2020");
        let bib = bibliography();
        let renderer = CitationRenderer::new(&bib, &Acm);

        let result = format_bibliography(citations.iter().map(|c| &c.marker), &renderer);

        assert_eq!(
            result,
            concat!(
                "<ol class=\"references\">\n",
                "<li><span class=\"citation\">Alice Smith. 2020. Notes</span></li>\n",
                "<li><span class=\"citation\">John Doe. 2021. <em>Test Book</em></span></li>\n",
                "<li><span class=\"citation\">Alice Smith. 2020. Notes</span></li>\n",
                "</ol>",
            )
        );
    }

    #[test]
    fn test_format_bibliography_apa_omits_citation_key() {
        let citations = extract_citations("@doe2021");
        let bib = bibliography();
        let renderer = CitationRenderer::new(&bib, &Apa);

        let result = format_bibliography(citations.iter().map(|c| &c.marker), &renderer);

        assert!(result.contains("citation-full"));
        assert!(!result.contains("citation-key"));
    }

    #[test]
    fn test_format_bibliography_nothing_resolved() {
        let citations = extract_citations("@missing");
        let bib = bibliography();
        let renderer = CitationRenderer::new(&bib, &Acm);

        assert_eq!(
            format_bibliography(citations.iter().map(|c| &c.marker), &renderer),
            ""
        );
    }

    #[test]
    fn test_check_references() {
        let bib = bibliography();

        let known = extract_citations("@doe2021");
        let with_unknown = extract_citations("@doe2021 @Unknown2099 @Other");

        assert_eq!(check_references(known.iter().map(|c| &c.marker), &bib), Ok(()));
        assert_eq!(
            check_references(with_unknown.iter().map(|c| &c.marker), &bib),
            Err(ProcessorError::ReferenceNotFound("Unknown2099".to_string()))
        );
    }
}
