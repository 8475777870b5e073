//! # Photo Loading
//!
//! Reads the candidate photo from a file path, a `data:` URI, or raw base64
//! and prepares it for embedding. JPEG bytes pass through untouched (DCTDecode
//! in the PDF). PNG is decoded to RGB with a separate alpha channel, which is
//! what carries the circular mask into the PDF as an SMask.
//!
//! The photo is expected to be masked to a circle already; nothing here
//! crops or masks it.

use std::io::Cursor;
use std::path::Path;

use crate::error::{ResumeError, Result};

/// A decoded photo ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// The pixel data in a form the PDF writer can consume directly.
#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Raw JPEG bytes, embedded as-is.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded pixels.
    Decoded {
        /// width * height * 3 bytes (RGB)
        rgb: Vec<u8>,
        /// width * height bytes. None if fully opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// JPEG color space for the PDF /ColorSpace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl JpegColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::DeviceRGB => "DeviceRGB",
            Self::DeviceGray => "DeviceGray",
        }
    }
}

/// Load a photo from a source string.
///
/// - `data:image/...;base64,...`
/// - a path starting with `/`, `./` or `../`
/// - anything else is treated as raw base64
pub fn load_image(src: &str) -> Result<LoadedImage> {
    let raw = read_source_bytes(src)?;
    decode_image_bytes(&raw)
}

/// Load a photo file from disk.
pub fn load_image_file(path: &Path) -> Result<LoadedImage> {
    let raw = std::fs::read(path).map_err(|e| {
        ResumeError::Image(format!("Failed to read photo '{}': {}", path.display(), e))
    })?;
    decode_image_bytes(&raw)
}

fn read_source_bytes(src: &str) -> Result<Vec<u8>> {
    if src.starts_with("data:image/") {
        let comma = src
            .find(',')
            .ok_or_else(|| ResumeError::Image("Invalid data URI: missing comma".to_string()))?;
        return base64_decode(&src[comma + 1..]);
    }

    // Base64 can contain '/', so only explicit path prefixes count as paths.
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        return std::fs::read(src)
            .map_err(|e| ResumeError::Image(format!("Failed to read photo '{}': {}", src, e)));
    }

    base64_decode(src)
}

fn base64_decode(input: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| ResumeError::Image(format!("Base64 decode error: {}", e)))
}

/// Detect the format from magic bytes and decode accordingly.
pub fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage> {
    if data.len() < 4 {
        return Err(ResumeError::Image("Image data too short".to_string()));
    }

    let loaded = if is_jpeg(data) {
        decode_jpeg(data)?
    } else if is_png(data) {
        decode_png(data)?
    } else {
        return Err(ResumeError::Image(
            "Unsupported image format (expected JPEG or PNG)".to_string(),
        ));
    };

    log::debug!(
        "loaded photo {}x{} ({})",
        loaded.width_px,
        loaded.height_px,
        match loaded.pixel_data {
            ImagePixelData::Jpeg { .. } => "jpeg",
            ImagePixelData::Decoded { alpha: Some(_), .. } => "png with alpha",
            ImagePixelData::Decoded { alpha: None, .. } => "png",
        }
    );
    Ok(loaded)
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == [0x89, 0x50, 0x4E, 0x47]
}

/// Dimensions and color space only; the pixels stay compressed.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage> {
    let (width, height) = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ResumeError::Image(format!("JPEG format detection error: {}", e)))?
        .into_dimensions()
        .map_err(|e| ResumeError::Image(format!("Failed to read JPEG dimensions: {}", e)))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Component count from the first SOF segment; RGB if none is found.
fn jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2;
    while i + 3 < data.len() && data[i] == 0xFF {
        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        // length(2) precision(1) height(2) width(2) components(1)
        if is_sof && i + 9 < data.len() {
            return if data[i + 9] == 1 {
                JpegColorSpace::DeviceGray
            } else {
                JpegColorSpace::DeviceRGB
            };
        }
        let segment_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + segment_len;
    }
    JpegColorSpace::DeviceRGB
}

/// Decode to RGBA and split off the alpha channel.
fn decode_png(data: &[u8]) -> Result<LoadedImage> {
    let img = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ResumeError::Image(format!("PNG format detection error: {}", e)))?
        .decode()
        .map_err(|e| ResumeError::Image(format!("Failed to decode PNG: {}", e)))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixel_count = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }
    let opaque = alpha.iter().all(|&a| a == 255);

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if opaque { None } else { Some(alpha) },
        },
        width_px: width,
        height_px: height,
    })
}
