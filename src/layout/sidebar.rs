//! # Sidebar
//!
//! The left column: background and accent stripe, optional framed photo, the
//! candidate's name fitted to the column, and the contact block. It is drawn
//! in full on every page and never paginates; it starts at the top of the
//! page regardless of where the content column is.

use std::sync::Arc;

use super::page_break::PageDecorator;
use super::{LayoutElement, LayoutPage, PageGeometry, Stroke, CM};
use crate::font::{FontContext, FontSpec};
use crate::image_loader::LoadedImage;
use crate::model::{Labels, ProfileData};
use crate::style::ColorPalette;
use crate::text::{BrokenLine, TextLayout};

const TOP_INSET: f64 = 1.5 * CM;
const STRIPE_WIDTH: f64 = 0.4 * CM;

const PHOTO_RADIUS: f64 = 2.0 * CM;
const PHOTO_CENTER_DROP: f64 = 2.8 * CM;
const PHOTO_SIZE: f64 = 3.6 * CM;
const PHOTO_FRAME_WIDTH: f64 = 3.0;
const PHOTO_BLOCK: f64 = 6.0 * CM;
const NO_PHOTO_GAP: f64 = CM;

const NAME_START_SIZE: f64 = 18.0;
const NAME_MIN_SIZE: f64 = 12.0;
const NAME_FALLBACK_SIZE: f64 = 14.0;
const NAME_SINGLE_LINE_ADVANCE: f64 = 2.0 * CM;
const NAME_LINE_STEP: f64 = 0.8 * CM;
const NAME_SPLIT_TRAILING_GAP: f64 = 1.2 * CM;

const CONTACT_LEAD: f64 = 0.5 * CM;
const CONTACT_BAND_INSET: f64 = 0.3 * CM;
const CONTACT_BAND_HEIGHT: f64 = 0.8 * CM;
const CONTACT_LABEL_X: f64 = 0.7 * CM;
const CONTACT_LABEL_SIZE: f64 = 12.0;
const CONTACT_AFTER_BAND: f64 = 1.2 * CM;
const CONTACT_DOT_X: f64 = 0.7 * CM;
const CONTACT_DOT_RISE: f64 = 0.15 * CM;
const CONTACT_DOT_RADIUS: f64 = 0.08 * CM;
const CONTACT_TEXT_X: f64 = 1.2 * CM;
const CONTACT_TEXT_SIZE: f64 = 9.0;
const CONTACT_CONTINUATION_STEP: f64 = 11.0;
const CONTACT_ROW: f64 = 0.7 * CM;

/// Which rule produced the name's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitTier {
    /// Fits at the starting size.
    Full,
    /// Fits on one line after shrinking.
    Shrunk,
    /// Two words or fewer, one per line at the fallback size.
    Split,
    /// Three or more words, greedily wrapped at the fallback size.
    Wrapped,
}

/// The name laid out for the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct NameFit {
    pub tier: FitTier,
    pub font: FontSpec,
    pub lines: Vec<BrokenLine>,
}

impl NameFit {
    pub fn is_single_line(&self) -> bool {
        matches!(self.tier, FitTier::Full | FitTier::Shrunk)
    }
}

/// Fit `name` into `usable_width`.
///
/// Tries bold at 18pt, then shrinks one point at a time down to 12pt. If it
/// still doesn't fit on one line it drops to 14pt and spreads over several
/// lines: one word per line for one or two words, greedy wrapping for more.
/// A single word that overflows even then is kept whole.
pub fn fit_name(
    font_context: &FontContext,
    text_layout: &TextLayout,
    name: &str,
    usable_width: f64,
) -> NameFit {
    let name = name.trim();
    let single = |font: FontSpec, width: f64, tier: FitTier| NameFit {
        tier,
        font,
        lines: vec![BrokenLine {
            text: name.to_string(),
            width,
        }],
    };

    let mut font = FontSpec::bold(NAME_START_SIZE);
    let mut width = font_context.measure(name, &font);
    if width <= usable_width {
        return single(font, width, FitTier::Full);
    }

    while width > usable_width && font.size > NAME_MIN_SIZE {
        font = font.with_size(font.size - 1.0);
        width = font_context.measure(name, &font);
    }
    if width <= usable_width {
        return single(font, width, FitTier::Shrunk);
    }

    let font = FontSpec::bold(NAME_FALLBACK_SIZE);
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() <= 2 {
        let lines = words
            .iter()
            .map(|word| BrokenLine {
                text: word.to_string(),
                width: font_context.measure(word, &font),
            })
            .collect();
        return NameFit {
            tier: FitTier::Split,
            font,
            lines,
        };
    }

    let lines = text_layout.break_paragraph(font_context, name, &font, usable_width);
    NameFit {
        tier: FitTier::Wrapped,
        font,
        lines,
    }
}

/// Draws the sidebar onto every page it is handed.
pub struct Sidebar<'a> {
    pub geometry: PageGeometry,
    pub profile: &'a ProfileData,
    /// Already masked to a circle.
    pub photo: Option<Arc<LoadedImage>>,
    pub palette: &'a ColorPalette,
    pub labels: &'a Labels,
    pub font_context: &'a FontContext,
    pub text_layout: &'a TextLayout,
}

impl PageDecorator for Sidebar<'_> {
    fn decorate(&self, page: &mut LayoutPage) {
        self.draw_background(page);
        let mut y = self.geometry.page_height - TOP_INSET;
        y = self.draw_photo(page, y);
        y = self.draw_name(page, y);
        self.draw_contacts(page, y);
    }
}

impl Sidebar<'_> {
    fn draw_background(&self, page: &mut LayoutPage) {
        let height = self.geometry.page_height;
        page.push(
            LayoutElement::rect(0.0, 0.0, self.geometry.sidebar_width, height, self.palette.text)
                .tagged("SidebarBackground"),
        );
        page.push(
            LayoutElement::rect(0.0, 0.0, STRIPE_WIDTH, height, self.palette.primary)
                .tagged("SidebarStripe"),
        );
    }

    fn draw_photo(&self, page: &mut LayoutPage, y: f64) -> f64 {
        let Some(photo) = &self.photo else {
            return y - NO_PHOTO_GAP;
        };
        let center_x = self.geometry.sidebar_width / 2.0;
        page.push(
            LayoutElement::stroked_circle(
                center_x,
                y - PHOTO_CENTER_DROP,
                PHOTO_RADIUS,
                Stroke {
                    color: self.palette.primary,
                    width: PHOTO_FRAME_WIDTH,
                },
            )
            .tagged("PhotoFrame"),
        );
        page.push(
            LayoutElement::image(
                center_x - PHOTO_SIZE / 2.0,
                y - PHOTO_CENTER_DROP - PHOTO_SIZE / 2.0,
                PHOTO_SIZE,
                PHOTO_SIZE,
                Arc::clone(photo),
            )
            .tagged("Photo"),
        );
        y - PHOTO_BLOCK
    }

    fn draw_name(&self, page: &mut LayoutPage, mut y: f64) -> f64 {
        // No name: keep the contact block where it would be.
        if self.profile.name.trim().is_empty() {
            return y - NAME_SINGLE_LINE_ADVANCE;
        }
        let fit = fit_name(
            self.font_context,
            self.text_layout,
            &self.profile.name,
            self.geometry.sidebar_text_width(),
        );
        let sidebar_width = self.geometry.sidebar_width;
        let mut push_line = |line: &BrokenLine, y: f64| {
            page.push(
                LayoutElement::text(
                    (sidebar_width - line.width) / 2.0,
                    y,
                    &line.text,
                    line.width,
                    &fit.font,
                    self.palette.white,
                )
                .tagged("NameLine"),
            );
        };

        if fit.is_single_line() {
            if let Some(line) = fit.lines.first() {
                push_line(line, y);
            }
            return y - NAME_SINGLE_LINE_ADVANCE;
        }

        for line in &fit.lines {
            push_line(line, y);
            y -= NAME_LINE_STEP;
        }
        y - NAME_SPLIT_TRAILING_GAP
    }

    fn draw_contacts(&self, page: &mut LayoutPage, mut y: f64) {
        let contacts: Vec<&str> = self.profile.contacts().collect();
        if contacts.is_empty() {
            return;
        }

        y -= CONTACT_LEAD;
        let label_font = FontSpec::bold(CONTACT_LABEL_SIZE);
        let band_width = self.geometry.sidebar_width - 2.0 * CONTACT_BAND_INSET;
        page.push(
            LayoutElement::rect(
                CONTACT_BAND_INSET,
                y - CONTACT_BAND_INSET,
                band_width,
                CONTACT_BAND_HEIGHT,
                self.palette.primary,
            )
            .tagged("ContactBand"),
        );
        let label = self.labels.contact.as_str();
        page.push(
            LayoutElement::text(
                CONTACT_LABEL_X,
                y,
                label,
                self.font_context.measure(label, &label_font),
                &label_font,
                self.palette.white,
            )
            .tagged("ContactLabel"),
        );
        y -= CONTACT_AFTER_BAND;

        let font = FontSpec::regular(CONTACT_TEXT_SIZE);
        let text_width = self.geometry.sidebar_width - CONTACT_TEXT_X - CONTACT_BAND_INSET;
        for value in contacts {
            page.push(
                LayoutElement::filled_circle(
                    CONTACT_DOT_X,
                    y + CONTACT_DOT_RISE,
                    CONTACT_DOT_RADIUS,
                    self.palette.secondary,
                )
                .tagged("ContactDot"),
            );
            let lines = self
                .text_layout
                .break_paragraph(self.font_context, value, &font, text_width);
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    y -= CONTACT_CONTINUATION_STEP;
                }
                page.push(
                    LayoutElement::text(CONTACT_TEXT_X, y, &line.text, line.width, &font, self.palette.white)
                        .tagged("ContactText"),
                );
            }
            y -= CONTACT_ROW;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DrawCommand;

    fn fit(name: &str, usable: f64) -> NameFit {
        fit_name(&FontContext::new(), &TextLayout::new(), name, usable)
    }

    #[test]
    fn short_name_fits_at_full_size() {
        let usable = PageGeometry::a4().sidebar_text_width();
        let f = fit("Ana Silva", usable);
        assert_eq!(f.tier, FitTier::Full);
        assert_eq!(f.font.size, 18.0);
        assert_eq!(f.lines.len(), 1);
        assert_eq!(f.lines[0].text, "Ana Silva");
    }

    #[test]
    fn medium_name_shrinks_onto_one_line() {
        let fc = FontContext::new();
        let name = "Alexandra Rodrigues";
        let at_18 = fc.measure(name, &FontSpec::bold(18.0));
        let at_15 = fc.measure(name, &FontSpec::bold(15.0));
        // Room for 15pt but not 18pt.
        let usable = (at_18 + at_15) / 2.0;
        let f = fit(name, usable);
        assert_eq!(f.tier, FitTier::Shrunk);
        assert!(f.font.size < 18.0 && f.font.size >= 12.0);
        assert!(f.lines[0].width <= usable);
        // The largest size that fits was chosen.
        assert!(fc.measure(name, &f.font.with_size(f.font.size + 1.0)) > usable);
    }

    #[test]
    fn long_name_wraps_at_fallback_size() {
        let usable = 100.0;
        let f = fit("Maria Fernanda de Oliveira Santos Junior", usable);
        assert_eq!(f.tier, FitTier::Wrapped);
        assert_eq!(f.font.size, 14.0);
        assert!(f.lines.len() >= 2);
        for line in &f.lines {
            assert!(line.width <= usable, "{:?}", line);
        }
        let words: Vec<&str> = f.lines.iter().flat_map(|l| l.text.split(' ')).collect();
        assert_eq!(words.join(" "), "Maria Fernanda de Oliveira Santos Junior");
    }

    #[test]
    fn two_word_name_splits_one_word_per_line() {
        let f = fit("Bartholomew Montgomery", 60.0);
        assert_eq!(f.tier, FitTier::Split);
        assert_eq!(f.font.size, 14.0);
        let texts: Vec<&str> = f.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Bartholomew", "Montgomery"]);
    }

    #[test]
    fn single_oversized_word_is_kept_whole() {
        let f = fit("Bartholomew", 60.0);
        assert_eq!(f.tier, FitTier::Split);
        assert_eq!(f.font.size, 14.0);
        assert_eq!(f.lines.len(), 1);
        assert!(f.lines[0].overflows(60.0));
    }

    fn render(profile: &ProfileData, photo: Option<Arc<LoadedImage>>) -> LayoutPage {
        let geometry = PageGeometry::a4();
        let palette = ColorPalette::default();
        let labels = Labels::default();
        let fc = FontContext::new();
        let tl = TextLayout::new();
        let sidebar = Sidebar {
            geometry,
            profile,
            photo,
            palette: &palette,
            labels: &labels,
            font_context: &fc,
            text_layout: &tl,
        };
        let mut page = LayoutPage::new(1, &geometry);
        sidebar.decorate(&mut page);
        page
    }

    #[test]
    fn background_then_stripe_first() {
        let page = render(&ProfileData::default(), None);
        assert_eq!(page.elements[0].node_type, Some("SidebarBackground"));
        assert_eq!(page.elements[1].node_type, Some("SidebarStripe"));
        assert!(matches!(page.elements[0].draw, DrawCommand::Rect { fill } if fill == ColorPalette::default().text));
    }

    #[test]
    fn contact_block_omitted_without_contacts() {
        let page = render(&ProfileData::default(), None);
        assert_eq!(page.tagged("NameLine").count(), 0);
        assert_eq!(page.tagged("ContactBand").count(), 0);
        assert_eq!(page.tagged("ContactLabel").count(), 0);
    }

    #[test]
    fn one_dot_per_contact_value() {
        let profile = ProfileData {
            name: "Ana Silva".into(),
            email: "ana@example.com".into(),
            phone: "+351 900 000 000".into(),
            linkedin: "linkedin.com/in/ana".into(),
            ..Default::default()
        };
        let page = render(&profile, None);
        assert_eq!(page.tagged("ContactBand").count(), 1);
        assert_eq!(page.tagged("ContactDot").count(), 3);
        let texts: Vec<&str> = page.texts().collect();
        assert!(texts.contains(&"CONTACT"));
        assert!(texts.contains(&"ana@example.com"));
    }

    #[test]
    fn long_contact_value_wraps_inside_sidebar() {
        let profile = ProfileData {
            address: "Rua das Flores 123, Apartamento 45, Bairro Jardim Paulista, Sao Paulo".into(),
            ..Default::default()
        };
        let page = render(&profile, None);
        assert_eq!(page.tagged("ContactDot").count(), 1);
        let lines: Vec<&LayoutElement> = page.tagged("ContactText").collect();
        assert!(lines.len() > 1);
        for line in lines {
            assert!(line.x + line.width <= PageGeometry::a4().sidebar_width);
        }
    }

    #[test]
    fn name_is_centered_in_white() {
        let profile = ProfileData {
            name: "Ana Silva".into(),
            ..Default::default()
        };
        let page = render(&profile, None);
        let name = page.tagged("NameLine").next().unwrap();
        let sidebar_width = PageGeometry::a4().sidebar_width;
        assert!(((name.x * 2.0 + name.width) - sidebar_width).abs() < 1e-9);
        assert!(matches!(&name.draw, DrawCommand::Text { color, .. } if *color == ColorPalette::default().white));
    }

    #[test]
    fn photo_is_framed_and_pushes_name_down() {
        let photo = Arc::new(LoadedImage {
            pixel_data: crate::image_loader::ImagePixelData::Decoded {
                rgb: vec![0; 3],
                alpha: None,
            },
            width_px: 1,
            height_px: 1,
        });
        let profile = ProfileData {
            name: "Ana Silva".into(),
            ..Default::default()
        };
        let with = render(&profile, Some(photo));
        let without = render(&profile, None);
        assert_eq!(with.tagged("PhotoFrame").count(), 1);
        assert_eq!(with.tagged("Photo").count(), 1);
        let y_with = with.tagged("NameLine").next().unwrap().y;
        let y_without = without.tagged("NameLine").next().unwrap().y;
        assert!((y_without - y_with - 5.0 * CM).abs() < 1e-9);
    }
}
