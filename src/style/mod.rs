//! # Colors and Palettes
//!
//! A resume is drawn with exactly one [`ColorPalette`], chosen by name when the
//! document is built and passed by reference to every renderer afterwards.
//! There is no global palette state.

use serde::{Deserialize, Serialize};

/// An RGB color with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse `#rgb` or `#rrggbb`. Malformed input yields black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        match hex.len() {
            3 if hex.is_ascii() => Self::from_rgb8(
                channel(&hex[0..1].repeat(2)),
                channel(&hex[1..2].repeat(2)),
                channel(&hex[2..3].repeat(2)),
            ),
            6 if hex.is_ascii() => {
                Self::from_rgb8(channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6]))
            }
            _ => Self::BLACK,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// The named colors every renderer draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    /// Accent stripe, section titles and rules, contact band, photo frame.
    pub primary: Color,
    /// Bullet and contact marker dots.
    pub secondary: Color,
    /// Body text, and the sidebar background.
    pub text: Color,
    pub light_bg: Color,
    pub white: Color,
    pub border: Color,
    pub muted: Color,
}

/// Name used when a document doesn't ask for a palette, or asks for one
/// that doesn't exist.
pub const DEFAULT_PALETTE: &str = "professional";

/// `0xRRGGBB` values: primary, secondary, light_bg. Text, border and muted
/// are shared by every preset.
static PRESETS: [(&str, [u32; 3]); 4] = [
    ("professional", [0xdc2626, 0xf59e0b, 0xfef2f2]),
    ("corporate", [0x1e40af, 0x0891b2, 0xeff6ff]),
    ("modern", [0x7c3aed, 0x06b6d4, 0xf3f4f6]),
    ("elegant", [0x059669, 0xd97706, 0xf0fdf4]),
];

const TEXT: u32 = 0x374151;
const BORDER: u32 = 0xe5e7eb;
const MUTED: u32 = 0x6b7280;

fn packed(rgb: u32) -> Color {
    Color::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

impl ColorPalette {
    /// Look up a preset by name (`professional`, `corporate`, `modern`,
    /// `elegant`). Unknown names silently fall back to [`DEFAULT_PALETTE`].
    pub fn named(name: &str) -> ColorPalette {
        let key = name.trim().to_ascii_lowercase();
        let [primary, secondary, light_bg] = PRESETS
            .iter()
            .find(|(preset, _)| *preset == key)
            .unwrap_or(&PRESETS[0])
            .1;
        ColorPalette {
            primary: packed(primary),
            secondary: packed(secondary),
            text: packed(TEXT),
            light_bg: packed(light_bg),
            white: Color::WHITE,
            border: packed(BORDER),
            muted: packed(MUTED),
        }
    }

    /// Names of the built-in presets, in declaration order.
    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, _)| *name)
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::named(DEFAULT_PALETTE)
    }
}
