//! # Font Metrics
//!
//! Text measurement for the fonts the PDF writer can reference.
//!
//! Only the standard PDF fonts are supported (Helvetica and Courier families),
//! which don't require embedding. Measuring with the same AFM widths the PDF
//! viewer uses is what keeps wrapped lines from overflowing on the rendered
//! page.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use std::collections::HashMap;

/// The family every resume is set in.
pub const DEFAULT_FAMILY: &str = "Helvetica";

/// A font registry that maps font family + weight + style to a standard font.
pub struct FontRegistry {
    fonts: HashMap<FontKey, StandardFont>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    /// Key with the weight snapped to 400 or 700.
    pub fn new(family: &str, weight: u32, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            weight: snap_weight(weight),
            italic,
        }
    }
}

fn snap_weight(weight: u32) -> u32 {
    if weight >= 600 {
        700
    } else {
        400
    }
}

/// The standard PDF fonts this crate can measure and reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &metrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &metrics::HELVETICA_BOLD,
            Self::Courier | Self::CourierBold | Self::CourierOblique | Self::CourierBoldOblique => {
                &metrics::COURIER
            }
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let standard_mappings = [
            (("Helvetica", 400, false), StandardFont::Helvetica),
            (("Helvetica", 700, false), StandardFont::HelveticaBold),
            (("Helvetica", 400, true), StandardFont::HelveticaOblique),
            (("Helvetica", 700, true), StandardFont::HelveticaBoldOblique),
            (("Courier", 400, false), StandardFont::Courier),
            (("Courier", 700, false), StandardFont::CourierBold),
            (("Courier", 400, true), StandardFont::CourierOblique),
            (("Courier", 700, true), StandardFont::CourierBoldOblique),
        ];

        let fonts = standard_mappings
            .into_iter()
            .map(|((family, weight, italic), font)| (FontKey::new(family, weight, italic), font))
            .collect();

        Self { fonts }
    }

    /// Look up a font, falling back to Helvetica if the family is unknown.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> StandardFont {
        if let Some(font) = self.fonts.get(&FontKey::new(family, weight, italic)) {
            return *font;
        }
        match (snap_weight(weight), italic) {
            (700, true) => StandardFont::HelveticaBoldOblique,
            (700, false) => StandardFont::HelveticaBold,
            (_, true) => StandardFont::HelveticaOblique,
            _ => StandardFont::Helvetica,
        }
    }
}

/// Family, weight and size of a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
    pub size: f64,
}

impl FontSpec {
    pub fn new(family: &str, weight: u32, size: f64) -> Self {
        Self {
            family: family.to_string(),
            weight,
            italic: false,
            size,
        }
    }

    /// Helvetica at the given size.
    pub fn regular(size: f64) -> Self {
        Self::new(DEFAULT_FAMILY, 400, size)
    }

    /// Helvetica-Bold at the given size.
    pub fn bold(size: f64) -> Self {
        Self::new(DEFAULT_FAMILY, 700, size)
    }

    /// Same face at a different size.
    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    pub fn key(&self) -> FontKey {
        FontKey::new(&self.family, self.weight, self.italic)
    }
}

/// Shared font context used by layout and PDF serialization.
///
/// Measurement is a pure function of (text, family, weight, size): no caches,
/// no interior mutability, safe to share between independent renders.
pub struct FontContext {
    registry: FontRegistry,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(
        &self,
        ch: char,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        self.registry
            .resolve(family, weight, italic)
            .metrics()
            .char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(
        &self,
        text: &str,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        self.registry
            .resolve(family, weight, italic)
            .metrics()
            .measure_string(text, font_size, 0.0)
    }

    /// Measure `text` set in `font`.
    pub fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        self.measure_string(text, &font.family, font.weight, font.italic, font.size)
    }

    /// Resolve a font spec to the standard font that will be referenced.
    pub fn resolve(&self, font: &FontSpec) -> StandardFont {
        self.registry.resolve(&font.family, font.weight, font.italic)
    }

    /// Access the underlying font registry.
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }
}
