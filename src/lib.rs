//! # Forme Resume
//!
//! A two-column resume engine: a colored sidebar with the photo, name and
//! contacts on the left of every page, and the resume sections flowed into
//! the column on the right.
//!
//! Like the engine it grew out of, pages are the unit of layout. The content
//! cursor is checked against the bottom margin before every line is drawn,
//! and a new page always arrives with its sidebar already painted.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    Profile, experience entries, labels, palette name
//!       ↓
//!   [style]    Palette lookup
//!       ↓
//!   [layout]   Sidebar + sections + pagination, using [font] and [text]
//!       ↓
//!   [pdf]      Serialize to PDF bytes
//! ```

pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;

pub use error::{ResumeError, Result};

use font::FontContext;
use image_loader::LoadedImage;
use layout::{LayoutEngine, LayoutPage};
use model::Document;
use pdf::PdfWriter;

/// Render a resume to PDF bytes.
///
/// This is the primary entry point. `photo`, if given, must already be masked
/// to a circle; it is drawn in the sidebar of every page.
pub fn render(document: &Document, photo: Option<&LoadedImage>) -> Result<Vec<u8>> {
    let font_context = FontContext::new();
    let pages = layout(document, photo, &font_context);
    PdfWriter::new().write(&pages, &document.metadata(), &font_context)
}

/// Render a resume described as JSON to PDF bytes.
pub fn render_json(json: &str, photo: Option<&LoadedImage>) -> Result<Vec<u8>> {
    let document: Document = serde_json::from_str(json)?;
    render(&document, photo)
}

/// Lay out a resume without serializing it. Useful for inspecting where
/// everything landed.
pub fn layout(document: &Document, photo: Option<&LoadedImage>, font_context: &FontContext) -> Vec<LayoutPage> {
    LayoutEngine::new().layout(document, photo, font_context)
}
