//! Position text composition
//!
//! Measurement descriptions mix free prose with inline attribute tokens
//! (`Farbton:`, `Applikationsart:`) that must render on their own lines.
//! Normalization here is markup-agnostic and produces typed lines; the
//! [`MarkupRenderer`] applies formatting as a final, swappable step.

use ausmass_domain::constants::{APPLICATION_TOKEN, COLOR_TOKEN};

const TOKENS: [&str; 2] = [COLOR_TOKEN, APPLICATION_TOKEN];

/// Classification of a normalized line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Free prose
    Plain,
    /// Starts with an attribute token
    Attribute,
}

/// One normalized line of position text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    fn classify(text: String) -> Self {
        let kind = if TOKENS.iter().any(|token| text.starts_with(token)) {
            LineKind::Attribute
        } else {
            LineKind::Plain
        };
        Self { kind, text }
    }
}

/// Rendering seam between line structure and concrete markup.
pub trait MarkupRenderer: Send + Sync {
    fn bold(&self, text: &str) -> String;
    fn bold_underline(&self, text: &str) -> String;
    /// Separator between lines of the same block
    fn line_break(&self) -> &str;
    /// Separator between paragraphs and blocks
    fn paragraph_break(&self) -> &str;
}

/// Renderer producing the inline HTML subset Bexio accepts in position text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl MarkupRenderer for HtmlRenderer {
    fn bold(&self, text: &str) -> String {
        format!("<strong>{text}</strong>")
    }

    fn bold_underline(&self, text: &str) -> String {
        format!("<strong><u>{text}</u></strong>")
    }

    fn line_break(&self) -> &str {
        "<br/>"
    }

    fn paragraph_break(&self) -> &str {
        "<br/><br/>"
    }
}

/// Split paragraphs into typed lines, pulling every attribute token onto a
/// line of its own while preserving encounter order of the remaining prose.
pub fn normalize_paragraphs(paragraphs: &[String]) -> Vec<Line> {
    let mut lines = Vec::new();
    for paragraph in paragraphs {
        split_paragraph(paragraph, &mut lines);
    }
    lines
}

fn split_paragraph(paragraph: &str, lines: &mut Vec<Line>) {
    let mut rest = paragraph;

    // Peel leading prose off before each token in turn. A token at offset 0
    // stays attached to `rest` and is handled by the final split below.
    for token in TOKENS {
        if let Some(idx) = rest.find(token) {
            if idx > 0 {
                let before = rest[..idx].trim();
                if !before.is_empty() {
                    lines.push(Line::classify(before.to_string()));
                }
                rest = &rest[idx..];
            }
        }
    }

    if rest.is_empty() {
        return;
    }

    let collapsed: String = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    for part in split_at_tokens(&collapsed) {
        let trimmed = part.trim();
        if !trimmed.is_empty() {
            lines.push(Line::classify(trimmed.to_string()));
        }
    }
}

/// Split a string immediately before every token occurrence, keeping the
/// tokens with their trailing text.
fn split_at_tokens(text: &str) -> Vec<&str> {
    let mut cuts: Vec<usize> =
        TOKENS.iter().flat_map(|token| text.match_indices(token).map(|(idx, _)| idx)).collect();
    cuts.sort_unstable();
    cuts.dedup();
    if cuts.first() != Some(&0) {
        cuts.insert(0, 0);
    }
    cuts.push(text.len());
    cuts.windows(2).map(|window| &text[window[0]..window[1]]).collect()
}

/// Join normalized lines into a position body: prose paragraphs first,
/// attribute lines as a compact trailing block.
pub fn render_body(renderer: &dyn MarkupRenderer, lines: &[Line]) -> String {
    let plain: Vec<&str> = lines
        .iter()
        .filter(|line| line.kind == LineKind::Plain)
        .map(|line| line.text.as_str())
        .collect();
    let attributes: Vec<&str> = lines
        .iter()
        .filter(|line| line.kind == LineKind::Attribute)
        .map(|line| line.text.as_str())
        .collect();

    let mut blocks = Vec::new();
    if !plain.is_empty() {
        blocks.push(plain.join(renderer.paragraph_break()));
    }
    if !attributes.is_empty() {
        blocks.push(attributes.join(renderer.line_break()));
    }
    blocks.join(renderer.paragraph_break())
}

/// Full position text: bold title, then the body if any lines survived
/// normalization.
pub fn render_position_text(renderer: &dyn MarkupRenderer, title: &str, lines: &[Line]) -> String {
    let title_markup = renderer.bold(title);
    if lines.is_empty() {
        return title_markup;
    }
    let body = render_body(renderer, lines);
    format!("{}{}{}", title_markup, renderer.paragraph_break(), body).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(paragraphs: &[&str]) -> Vec<String> {
        paragraphs.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn prose_paragraphs_stay_plain_and_join_as_paragraphs() {
        let lines = normalize_paragraphs(&owned(&[
            "Weiss, matt",
            "Nordwand",
            "Hinweis: Vorsicht Fenster",
        ]));

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.kind == LineKind::Plain));

        let body = render_body(&HtmlRenderer, &lines);
        assert_eq!(body, "Weiss, matt<br/><br/>Nordwand<br/><br/>Hinweis: Vorsicht Fenster");
    }

    #[test]
    fn adjacent_tokens_split_into_separate_attribute_lines() {
        let lines = normalize_paragraphs(&owned(&["Farbton: RAL9010 Applikationsart: gerollt"]));

        assert_eq!(
            lines,
            vec![
                Line { kind: LineKind::Attribute, text: "Farbton: RAL9010".to_string() },
                Line { kind: LineKind::Attribute, text: "Applikationsart: gerollt".to_string() },
            ]
        );

        let body = render_body(&HtmlRenderer, &lines);
        assert_eq!(body, "Farbton: RAL9010<br/>Applikationsart: gerollt");
    }

    #[test]
    fn prose_before_token_is_peeled_off() {
        let lines =
            normalize_paragraphs(&owned(&["Wände zweimal streichen Farbton: NCS S 0502-Y"]));

        assert_eq!(lines[0].kind, LineKind::Plain);
        assert_eq!(lines[0].text, "Wände zweimal streichen");
        assert_eq!(lines[1].kind, LineKind::Attribute);
        assert_eq!(lines[1].text, "Farbton: NCS S 0502-Y");
    }

    #[test]
    fn mixed_lines_render_prose_block_then_attribute_block() {
        let lines = normalize_paragraphs(&owned(&[
            "Decke spachteln",
            "Farbton: RAL9016",
            "Zweiter Anstrich nach Trocknung",
        ]));

        let body = render_body(&HtmlRenderer, &lines);
        assert_eq!(
            body,
            "Decke spachteln<br/><br/>Zweiter Anstrich nach Trocknung<br/><br/>Farbton: RAL9016"
        );
    }

    #[test]
    fn excess_whitespace_is_collapsed_in_token_segments() {
        let lines = normalize_paragraphs(&owned(&["Farbton:   RAL  9010"]));
        assert_eq!(lines, vec![Line { kind: LineKind::Attribute, text: "Farbton: RAL 9010".to_string() }]);
    }

    #[test]
    fn empty_paragraphs_produce_title_only_text() {
        let lines = normalize_paragraphs(&[]);
        assert!(lines.is_empty());

        let text = render_position_text(&HtmlRenderer, "Malerarbeiten", &lines);
        assert_eq!(text, "<strong>Malerarbeiten</strong>");
    }

    #[test]
    fn full_text_places_body_after_title() {
        let lines = normalize_paragraphs(&owned(&["Weiss, matt"]));
        let text = render_position_text(&HtmlRenderer, "Malerarbeiten", &lines);
        assert_eq!(text, "<strong>Malerarbeiten</strong><br/><br/>Weiss, matt");
    }
}
