//! # Two-Column Page Layout
//!
//! Every page has the same shape: a fixed-width sidebar on the left, redrawn
//! in full on each page, and a content column on the right into which the
//! sections flow.
//!
//! ## How layout runs
//!
//! 1. Open page 1 and let the sidebar decorate it
//! 2. Walk the sections in their fixed order, skipping empty ones
//! 3. Before each line or row, ask the paginator: "does this fit?"
//! 4. If it doesn't: close the page, open the next, redraw the sidebar,
//!    resume at the top margin
//! 5. Hand the finished pages to the PDF writer
//!
//! Coordinates are PDF user space: origin at the bottom-left corner, y grows
//! upward. The content cursor therefore only ever decreases on a page.

pub mod page_break;
pub mod section;
pub mod sidebar;

use std::sync::Arc;

use crate::font::{FontContext, FontSpec};
use crate::image_loader::LoadedImage;
use crate::model::experience;
use crate::model::{Document, Section};
use crate::style::Color;
use crate::text::TextLayout;

use page_break::Paginator;
use section::SectionRenderer;
use sidebar::Sidebar;

/// One centimetre in points.
pub const CM: f64 = 72.0 / 2.54;

/// A4 in points (210 x 297 mm).
pub const A4: (f64, f64) = (210.0 * 72.0 / 25.4, 297.0 * 72.0 / 25.4);

/// The fixed page geometry every component lays out against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub sidebar_width: f64,
    /// Left edge of the content column.
    pub content_x: f64,
    pub content_width: f64,
    /// Highest baseline content may start at.
    pub top_margin: f64,
    /// Content is never drawn below this.
    pub bottom_margin: f64,
    pub line_height: f64,
}

impl PageGeometry {
    /// A4 with a 6 cm sidebar and 1 cm gutters.
    pub fn a4() -> Self {
        Self::new(A4.0, A4.1, 6.0 * CM)
    }

    fn new(page_width: f64, page_height: f64, sidebar_width: f64) -> Self {
        Self {
            page_width,
            page_height,
            sidebar_width,
            content_x: sidebar_width + CM,
            content_width: page_width - sidebar_width - 2.0 * CM,
            top_margin: page_height - 2.0 * CM,
            bottom_margin: 2.0 * CM,
            line_height: 16.0,
        }
    }

    /// Same page with a different sidebar width; the content column is
    /// recomputed from it.
    pub fn with_sidebar_width(&self, sidebar_width: f64) -> Self {
        Self::new(self.page_width, self.page_height, sidebar_width)
    }

    /// Width available to the name inside the sidebar.
    pub fn sidebar_text_width(&self) -> f64 {
        self.sidebar_width - CM
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// A fully laid-out page ready for PDF serialization.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    /// 1-based.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    /// Drawn in order; later elements paint over earlier ones.
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    pub fn new(number: usize, geometry: &PageGeometry) -> Self {
        Self {
            number,
            width: geometry.page_width,
            height: geometry.page_height,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: LayoutElement) {
        self.elements.push(element);
    }

    /// Elements carrying the given tag.
    pub fn tagged<'a>(&'a self, node_type: &'a str) -> impl Iterator<Item = &'a LayoutElement> {
        self.elements
            .iter()
            .filter(move |e| e.node_type == Some(node_type))
    }

    /// Text of every text element on the page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match &e.draw {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A positioned drawing primitive.
///
/// `x`/`y` is the bottom-left corner of the element's box, except for text,
/// where `y` is the baseline. Lines run from `(x, y)` to
/// `(x + width, y + height)`.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: DrawCommand,
    /// Logical role (e.g. "SidebarBackground", "SectionTitle") for tests and
    /// debugging. Not written to the PDF.
    pub node_type: Option<&'static str>,
}

/// What to actually draw for this element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// A filled rectangle.
    Rect { fill: Color },
    /// A circle inscribed in the element box.
    Circle {
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// A straight stroked line.
    Line { stroke: Stroke },
    /// A single line of text, already known to fit (or to be the
    /// lone-oversized-word case).
    Text {
        text: String,
        font: FontSpec,
        color: Color,
    },
    /// A raster image stretched to the element box.
    Image { image: Arc<LoadedImage> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl LayoutElement {
    pub fn rect(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            draw: DrawCommand::Rect { fill },
            node_type: None,
        }
    }

    pub fn filled_circle(cx: f64, cy: f64, radius: f64, fill: Color) -> Self {
        Self::circle(cx, cy, radius, Some(fill), None)
    }

    pub fn stroked_circle(cx: f64, cy: f64, radius: f64, stroke: Stroke) -> Self {
        Self::circle(cx, cy, radius, None, Some(stroke))
    }

    fn circle(cx: f64, cy: f64, radius: f64, fill: Option<Color>, stroke: Option<Stroke>) -> Self {
        Self {
            x: cx - radius,
            y: cy - radius,
            width: 2.0 * radius,
            height: 2.0 * radius,
            draw: DrawCommand::Circle { fill, stroke },
            node_type: None,
        }
    }

    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            draw: DrawCommand::Line { stroke },
            node_type: None,
        }
    }

    /// Text at baseline `(x, y)`; `width` is its measured width.
    pub fn text(x: f64, y: f64, text: &str, width: f64, font: &FontSpec, color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height: font.size,
            draw: DrawCommand::Text {
                text: text.to_string(),
                font: font.clone(),
                color,
            },
            node_type: None,
        }
    }

    pub fn image(x: f64, y: f64, width: f64, height: f64, image: Arc<LoadedImage>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            draw: DrawCommand::Image { image },
            node_type: None,
        }
    }

    pub fn tagged(mut self, node_type: &'static str) -> Self {
        self.node_type = Some(node_type);
        self
    }
}

/// The main layout engine: the document assembler.
pub struct LayoutEngine {
    geometry: PageGeometry,
    text_layout: TextLayout,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::with_geometry(PageGeometry::a4())
    }

    pub fn with_geometry(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            text_layout: TextLayout::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Main entry point: lay out a resume into pages.
    ///
    /// `photo` must already be circularly masked; it is drawn as-is inside
    /// the sidebar's frame on every page.
    pub fn layout(
        &self,
        document: &Document,
        photo: Option<&LoadedImage>,
        font_context: &FontContext,
    ) -> Vec<LayoutPage> {
        let palette = document.color_palette();
        let sidebar = Sidebar {
            geometry: self.geometry,
            profile: &document.profile,
            photo: photo.map(|p| Arc::new(p.clone())),
            palette: &palette,
            labels: &document.labels,
            font_context,
            text_layout: &self.text_layout,
        };
        let sections = SectionRenderer {
            geometry: self.geometry,
            palette: &palette,
            font_context,
            text_layout: &self.text_layout,
        };

        let experience = experience::parse_entries(&document.profile.experience);
        log::debug!(
            "normalized {} of {} experience entries",
            experience.len(),
            document.profile.experience.len()
        );

        let mut paginator = Paginator::new(self.geometry, &sidebar);

        for section in Section::ORDER {
            let title = document.labels.title(section);
            let drawn = match section {
                Section::Experience => sections.render_experience(title, &experience, &mut paginator),
                _ => sections.render(
                    section,
                    title,
                    document.profile.section_text(section),
                    &mut paginator,
                ),
            };
            if drawn {
                log::debug!(
                    "section {:?} drawn, cursor now page {} y={:.2}",
                    section,
                    paginator.cursor().page_number,
                    paginator.cursor().y
                );
            } else {
                log::debug!("section {:?} is empty, skipped", section);
            }
        }

        let pages = paginator.finish();
        log::debug!("layout produced {} page(s)", pages.len());
        pages
    }
}
