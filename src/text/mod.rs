//! # Text Layout
//!
//! Greedy, whitespace-only line breaking against real font metrics.
//!
//! Words are never split. A word wider than the column is emitted on a line of
//! its own and allowed to overflow; that is the only case where a line's
//! measured width exceeds the width it was broken against.

use crate::font::{FontContext, FontSpec};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The words on this line, joined by single spaces.
    pub text: String,
    /// Measured width of `text` in points.
    pub width: f64,
}

impl BrokenLine {
    /// True for the lone-oversized-word fallback.
    pub fn overflows(&self, max_width: f64) -> bool {
        self.width > max_width
    }
}

/// One step of wrapped output for text that may hold several paragraphs.
#[derive(Debug, Clone, PartialEq)]
pub enum WrappedLine {
    /// A line to draw.
    Line(BrokenLine),
    /// A blank paragraph: draw nothing, advance half a line.
    ParagraphGap,
}

pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break text that may contain `\n` paragraph breaks.
    ///
    /// Each paragraph is broken with [`TextLayout::break_paragraph`]. A
    /// paragraph that is empty after trimming yields a single
    /// [`WrappedLine::ParagraphGap`].
    pub fn wrap(
        &self,
        font_context: &FontContext,
        text: &str,
        font: &FontSpec,
        max_width: f64,
    ) -> Vec<WrappedLine> {
        let mut out = Vec::new();
        for paragraph in text.split('\n') {
            if paragraph.trim().is_empty() {
                out.push(WrappedLine::ParagraphGap);
                continue;
            }
            out.extend(
                self.break_paragraph(font_context, paragraph, font, max_width)
                    .into_iter()
                    .map(WrappedLine::Line),
            );
        }
        out
    }

    /// Break a single paragraph into lines that fit within `max_width`.
    ///
    /// Words are accumulated greedily; when adding a word makes the candidate
    /// wider than `max_width`, the candidate without that word is emitted and
    /// the word starts the next line. Whitespace runs collapse to one space.
    pub fn break_paragraph(
        &self,
        font_context: &FontContext,
        paragraph: &str,
        font: &FontSpec,
        max_width: f64,
    ) -> Vec<BrokenLine> {
        let mut lines = Vec::new();
        let mut line = String::new();
        let mut line_width = 0.0;

        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            let candidate_width = font_context.measure(&candidate, font);

            if candidate_width > max_width && !line.is_empty() {
                lines.push(BrokenLine {
                    text: std::mem::take(&mut line),
                    width: line_width,
                });
                line_width = font_context.measure(word, font);
                line = word.to_string();
            } else {
                line = candidate;
                line_width = candidate_width;
            }
        }

        if !line.is_empty() {
            lines.push(BrokenLine {
                text: line,
                width: line_width,
            });
        }

        lines
    }
}
