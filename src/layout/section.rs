//! # Section Rendering
//!
//! Draws one content section into the right-hand column: the title with its
//! rule, then the body in one of three shapes (bullet list, experience
//! blocks, wrapped paragraphs), then the section gap. Every vertical step goes
//! through the [`Paginator`].

use super::page_break::Paginator;
use super::{LayoutElement, PageGeometry, Stroke, CM};
use crate::font::{FontContext, FontSpec};
use crate::model::experience::TextBlock;
use crate::model::{Section, SectionBody};
use crate::style::ColorPalette;
use crate::text::{TextLayout, WrappedLine};

const TITLE_SIZE: f64 = 14.0;
const RULE_DROP: f64 = 0.3 * CM;
const RULE_EXTRA: f64 = CM;
const RULE_WIDTH: f64 = 1.0;
const TITLE_ADVANCE: f64 = CM;
const SECTION_GAP: f64 = CM;

const BODY_SIZE: f64 = 11.0;
const PARAGRAPH_LINE_HEIGHT: f64 = 18.0;

/// Bullet dot offset from the column edge; text sits further in.
const BULLET_DOT_X: f64 = 0.3 * CM;
const BULLET_TEXT_X: f64 = 0.8 * CM;

const LIST_DOT_RISE: f64 = 0.15 * CM;
const LIST_DOT_RADIUS: f64 = 0.1 * CM;
const LIST_ROW: f64 = 0.6 * CM;

const ENTRY_HEADER_SIZE: f64 = 12.0;
const AFTER_ENTRY_HEADER: f64 = 0.8 * CM;
const EXPERIENCE_DOT_RISE: f64 = 0.1 * CM;
const EXPERIENCE_DOT_RADIUS: f64 = 0.08 * CM;
const AFTER_BULLET: f64 = 0.2 * CM;
const ENTRY_GAP: f64 = 0.8 * CM;

/// Split a comma-separated list, trimming items and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

pub struct SectionRenderer<'a> {
    pub geometry: PageGeometry,
    pub palette: &'a ColorPalette,
    pub font_context: &'a FontContext,
    pub text_layout: &'a TextLayout,
}

impl SectionRenderer<'_> {
    /// Draw a list or paragraph section. Returns false, having drawn nothing
    /// and moved nothing, when the section has no content.
    pub fn render(&self, section: Section, title: &str, raw: &str, paginator: &mut Paginator) -> bool {
        match section.body() {
            SectionBody::List => {
                let items = split_list(raw);
                if items.is_empty() {
                    return false;
                }
                self.draw_title(title, LIST_ROW, paginator);
                self.draw_list(&items, paginator);
            }
            SectionBody::Paragraph => {
                if raw.trim().is_empty() {
                    return false;
                }
                self.draw_title(title, PARAGRAPH_LINE_HEIGHT, paginator);
                let font = FontSpec::regular(BODY_SIZE);
                self.draw_wrapped(
                    raw,
                    &font,
                    self.geometry.content_width,
                    PARAGRAPH_LINE_HEIGHT,
                    paginator,
                );
            }
            SectionBody::Experience => {
                // Structured content never arrives as raw text.
                return false;
            }
        }
        paginator.advance(SECTION_GAP);
        true
    }

    /// Draw the experience section from already-normalized entries.
    pub fn render_experience(&self, title: &str, entries: &[Vec<TextBlock>], paginator: &mut Paginator) -> bool {
        if entries.is_empty() {
            return false;
        }
        self.draw_title(title, self.geometry.line_height, paginator);
        for blocks in entries {
            for block in blocks {
                match block {
                    TextBlock::Header(text) => self.draw_entry_header(text, paginator),
                    TextBlock::Bullet(text) => self.draw_bullet(text, paginator),
                }
            }
            paginator.advance(ENTRY_GAP);
        }
        paginator.advance(SECTION_GAP);
        true
    }

    /// Title in bold primary with a rule underneath, kept together with the
    /// first body line. `first_line` is the step that line takes below the
    /// title advance.
    fn draw_title(&self, title: &str, first_line: f64, paginator: &mut Paginator) {
        paginator.reserve(TITLE_ADVANCE + first_line);

        let font = FontSpec::bold(TITLE_SIZE);
        let x = self.geometry.content_x;
        let y = paginator.y();
        let width = self.font_context.measure(title, &font);
        paginator.draw(
            LayoutElement::text(x, y, title, width, &font, self.palette.primary).tagged("SectionTitle"),
        );
        paginator.draw(
            LayoutElement::line(
                x,
                y - RULE_DROP,
                x + width + RULE_EXTRA,
                y - RULE_DROP,
                Stroke {
                    color: self.palette.primary,
                    width: RULE_WIDTH,
                },
            )
            .tagged("SectionRule"),
        );
        paginator.advance(TITLE_ADVANCE);
    }

    fn draw_list(&self, items: &[&str], paginator: &mut Paginator) {
        let font = FontSpec::regular(BODY_SIZE);
        let x = self.geometry.content_x;
        for item in items {
            paginator.reserve(LIST_ROW);
            let y = paginator.y();
            paginator.draw(
                LayoutElement::filled_circle(x + BULLET_DOT_X, y + LIST_DOT_RISE, LIST_DOT_RADIUS, self.palette.secondary)
                    .tagged("Bullet"),
            );
            paginator.draw(
                LayoutElement::text(
                    x + BULLET_TEXT_X,
                    y,
                    item,
                    self.font_context.measure(item, &font),
                    &font,
                    self.palette.text,
                )
                .tagged("ListItem"),
            );
            paginator.advance(LIST_ROW);
        }
    }

    fn draw_entry_header(&self, text: &str, paginator: &mut Paginator) {
        let font = FontSpec::bold(ENTRY_HEADER_SIZE);
        self.draw_wrapped(
            text,
            &font,
            self.geometry.content_width,
            self.geometry.line_height,
            paginator,
        );
        paginator.advance(AFTER_ENTRY_HEADER);
    }

    /// One bullet: the dot sits beside the first wrapped line only.
    fn draw_bullet(&self, text: &str, paginator: &mut Paginator) {
        let font = FontSpec::regular(BODY_SIZE);
        let line_height = self.geometry.line_height;
        let x = self.geometry.content_x;
        let lines = self.text_layout.break_paragraph(
            self.font_context,
            text,
            &font,
            self.geometry.content_width - BULLET_TEXT_X,
        );

        for (i, line) in lines.iter().enumerate() {
            paginator.reserve(line_height);
            let y = paginator.y();
            if i == 0 {
                paginator.draw(
                    LayoutElement::filled_circle(
                        x + BULLET_DOT_X,
                        y + EXPERIENCE_DOT_RISE,
                        EXPERIENCE_DOT_RADIUS,
                        self.palette.secondary,
                    )
                    .tagged("Bullet"),
                );
            }
            paginator.draw(
                LayoutElement::text(x + BULLET_TEXT_X, y, &line.text, line.width, &font, self.palette.text)
                    .tagged("BulletText"),
            );
            paginator.advance(line_height);
        }
        paginator.advance(AFTER_BULLET);
    }

    /// Wrapped text in the content column. Each line steps down first and
    /// breaks the page if that step would cross the bottom margin.
    fn draw_wrapped(
        &self,
        text: &str,
        font: &FontSpec,
        max_width: f64,
        line_height: f64,
        paginator: &mut Paginator,
    ) {
        let x = self.geometry.content_x;
        for wrapped in self.text_layout.wrap(self.font_context, text, font, max_width) {
            match wrapped {
                WrappedLine::ParagraphGap => paginator.advance(line_height * 0.5),
                WrappedLine::Line(line) => {
                    let y = paginator.next_line(line_height);
                    paginator.draw(
                        LayoutElement::text(x, y, &line.text, line.width, font, self.palette.text)
                            .tagged("BodyText"),
                    );
                }
            }
        }
    }
}
