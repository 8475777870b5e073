//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer covering exactly what a resume
//! needs: filled rectangles, circles, lines, single-line text runs in the
//! standard fonts, and one raster photo.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object and the info dictionary
//! %%EOF
//! ```
//!
//! Layout coordinates are already PDF user space (origin bottom-left), so
//! elements are written without any y-flip.

use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;
use std::sync::Arc;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{ResumeError, Result};
use crate::font::metrics::{winansi_code, REPLACEMENT};
use crate::font::{FontContext, StandardFont};
use crate::image_loader::{ImagePixelData, LoadedImage};
use crate::layout::{DrawCommand, LayoutElement, LayoutPage, Stroke};
use crate::model::Metadata;
use crate::style::Color;

/// Control point distance for approximating a quarter circle with a cubic
/// Bezier, as a fraction of the radius.
const KAPPA: f64 = 0.552_284_749_8;

const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Referenced as /F0, /F1, ... in the order registered.
    font_objects: Vec<(StandardFont, usize)>,
    /// Referenced as /Im0, /Im1, ...; one entry per distinct image, however
    /// many pages draw it.
    image_objects: Vec<(Arc<LoadedImage>, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(&self, pages: &[LayoutPage], metadata: &Metadata, font_context: &FontContext) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ResumeError::Render("no pages to write".to_string()));
        }

        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
            image_objects: Vec::new(),
        };

        // 0 = placeholder (PDF objects are 1-indexed), 1 = Catalog, 2 = Pages
        for _ in 0..3 {
            builder.objects.push(PdfObject { data: Vec::new() });
        }

        self.register_fonts(&mut builder, pages, font_context);
        self.register_images(&mut builder, pages);

        let font_resources = self.build_font_resource_dict(&builder.font_objects);
        let mut page_obj_ids: Vec<usize> = Vec::with_capacity(pages.len());

        for page in pages {
            let content = self.build_content_stream_for_page(page, &builder, font_context)?;
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_obj_id = builder.objects.len();
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: content_data });

            let xobject_resources = self.build_xobject_resource_dict(page, &builder);
            let resources = if xobject_resources.is_empty() {
                format!("/Font << {} >>", font_resources)
            } else {
                format!("/Font << {} >> /XObject << {} >>", font_resources, xobject_resources)
            };
            let page_obj_id = builder.objects.len();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width, page.height, content_obj_id, resources
            );
            builder.objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = builder.objects.len();
        builder.objects.push(PdfObject {
            data: self.build_info_dict(metadata).into_bytes(),
        });

        Ok(self.serialize(&builder, info_obj_id))
    }

    fn build_info_dict(&self, metadata: &Metadata) -> String {
        let mut info = String::from("<< ");
        let entries = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                let _ = write!(info, "/{} {} ", key, Self::pdf_text_string(value));
            }
        }
        let _ = write!(info, "/Producer ({}) /Creator ({}) >>", PRODUCER, env!("CARGO_PKG_NAME"));
        info
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream_for_page(
        &self,
        page: &LayoutPage,
        builder: &PdfBuilder,
        font_context: &FontContext,
    ) -> Result<String> {
        let mut stream = String::new();
        for element in &page.elements {
            self.write_element(&mut stream, element, builder, font_context)?;
        }
        Ok(stream)
    }

    /// Write a single layout element as PDF operators.
    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        builder: &PdfBuilder,
        font_context: &FontContext,
    ) -> Result<()> {
        let (x, y, w, h) = (element.x, element.y, element.width, element.height);

        match &element.draw {
            DrawCommand::Rect { fill } => {
                let _ = writeln!(
                    stream,
                    "q\n{} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ",
                    Self::color_operands(fill),
                    x,
                    y,
                    w,
                    h
                );
            }

            DrawCommand::Circle { fill, stroke } => {
                let paint = match (fill, stroke) {
                    (Some(_), Some(_)) => "B",
                    (Some(_), None) => "f",
                    (None, Some(_)) => "S",
                    (None, None) => return Ok(()),
                };
                stream.push_str("q\n");
                if let Some(fill) = fill {
                    let _ = writeln!(stream, "{} rg", Self::color_operands(fill));
                }
                if let Some(stroke) = stroke {
                    self.write_stroke_state(stream, stroke);
                }
                self.write_circle_path(stream, x + w / 2.0, y + h / 2.0, w / 2.0);
                let _ = writeln!(stream, "{}\nQ", paint);
            }

            DrawCommand::Line { stroke } => {
                stream.push_str("q\n");
                self.write_stroke_state(stream, stroke);
                let _ = writeln!(
                    stream,
                    "{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ",
                    x,
                    y,
                    x + w,
                    y + h
                );
            }

            DrawCommand::Text { text, font, color } => {
                let resolved = font_context.resolve(font);
                let idx = self.font_index(resolved, &builder.font_objects).ok_or_else(|| {
                    ResumeError::Render(format!("font {} was not registered", resolved.pdf_name()))
                })?;
                let _ = writeln!(
                    stream,
                    "BT\n{} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET",
                    Self::color_operands(color),
                    idx,
                    font.size,
                    x,
                    y,
                    Self::encode_winansi(text)
                );
            }

            DrawCommand::Image { image } => {
                let idx = self.image_index(image, &builder.image_objects).ok_or_else(|| {
                    ResumeError::Render("image was not registered".to_string())
                })?;
                let _ = writeln!(
                    stream,
                    "q\n{:.4} 0 0 {:.4} {:.4} {:.4} cm\n/Im{} Do\nQ",
                    w, h, x, y, idx
                );
            }
        }
        Ok(())
    }

    fn write_stroke_state(&self, stream: &mut String, stroke: &Stroke) {
        let _ = writeln!(
            stream,
            "{} RG\n{:.2} w",
            Self::color_operands(&stroke.color),
            stroke.width
        );
    }

    /// A full circle as four cubic Bezier arcs, counter-clockwise from the
    /// rightmost point.
    fn write_circle_path(&self, stream: &mut String, cx: f64, cy: f64, r: f64) {
        let k = KAPPA * r;
        let _ = writeln!(stream, "{:.2} {:.2} m", cx + r, cy);
        let arcs = [
            (cx + r, cy + k, cx + k, cy + r, cx, cy + r),
            (cx - k, cy + r, cx - r, cy + k, cx - r, cy),
            (cx - r, cy - k, cx - k, cy - r, cx, cy - r),
            (cx + k, cy - r, cx + r, cy - k, cx + r, cy),
        ];
        for (x1, y1, x2, y2, x3, y3) in arcs {
            let _ = writeln!(
                stream,
                "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
                x1, y1, x2, y2, x3, y3
            );
        }
    }

    fn color_operands(color: &Color) -> String {
        format!("{:.3} {:.3} {:.3}", color.r, color.g, color.b)
    }

    /// Register each standard font the pages reference, in a stable order.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage], font_context: &FontContext) {
        let mut fonts: Vec<StandardFont> = pages
            .iter()
            .flat_map(|page| page.elements.iter())
            .filter_map(|element| match &element.draw {
                DrawCommand::Text { font, .. } => Some(font_context.resolve(font)),
                _ => None,
            })
            .collect();

        fonts.sort_by_key(|font| font.pdf_name());
        fonts.dedup();

        if fonts.is_empty() {
            fonts.push(StandardFont::Helvetica);
        }

        for font in fonts {
            let obj_id = builder.objects.len();
            let font_dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                 /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            builder.objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            builder.font_objects.push((font, obj_id));
        }
    }

    /// Write one XObject per distinct image. The sidebar hands every page
    /// the same `Arc`, so the photo is stored once.
    fn register_images(&self, builder: &mut PdfBuilder, pages: &[LayoutPage]) {
        for element in pages.iter().flat_map(|page| page.elements.iter()) {
            if let DrawCommand::Image { image } = &element.draw {
                if self.image_index(image, &builder.image_objects).is_none() {
                    let obj_id = Self::write_image_xobject(builder, image);
                    builder.image_objects.push((Arc::clone(image), obj_id));
                }
            }
        }
    }

    /// Write a single image as one or two XObject PDF objects.
    /// Returns the main XObject ID.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let obj_id = builder.objects.len();
                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace /{} \
                     /BitsPerComponent 8 \
                     /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space.pdf_name(),
                    data.len()
                );
                obj_data.extend_from_slice(data);
                obj_data.extend_from_slice(b"\nendstream");
                builder.objects.push(PdfObject { data: obj_data });
                obj_id
            }

            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_id = alpha.as_ref().map(|alpha_data| {
                    let compressed_alpha = compress_to_vec_zlib(alpha_data, 6);
                    let smask_obj_id = builder.objects.len();
                    let mut smask_data: Vec<u8> = Vec::new();
                    let _ = write!(
                        smask_data,
                        "<< /Type /XObject /Subtype /Image \
                         /Width {} /Height {} \
                         /ColorSpace /DeviceGray \
                         /BitsPerComponent 8 \
                         /Filter /FlateDecode \
                         /Length {} >>\nstream\n",
                        image.width_px,
                        image.height_px,
                        compressed_alpha.len()
                    );
                    smask_data.extend_from_slice(&compressed_alpha);
                    smask_data.extend_from_slice(b"\nendstream");
                    builder.objects.push(PdfObject { data: smask_data });
                    smask_obj_id
                });

                let compressed_rgb = compress_to_vec_zlib(rgb, 6);
                let smask_ref = smask_id
                    .map(|id| format!(" /SMask {} 0 R", id))
                    .unwrap_or_default();
                let obj_id = builder.objects.len();
                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace /DeviceRGB \
                     /BitsPerComponent 8 \
                     /Filter /FlateDecode \
                     /Length {}{} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    compressed_rgb.len(),
                    smask_ref
                );
                obj_data.extend_from_slice(&compressed_rgb);
                obj_data.extend_from_slice(b"\nendstream");
                builder.objects.push(PdfObject { data: obj_data });
                obj_id
            }
        }
    }

    /// /XObject entries for the images drawn on one page.
    fn build_xobject_resource_dict(&self, page: &LayoutPage, builder: &PdfBuilder) -> String {
        let mut used: Vec<usize> = page
            .elements
            .iter()
            .filter_map(|element| match &element.draw {
                DrawCommand::Image { image } => self.image_index(image, &builder.image_objects),
                _ => None,
            })
            .collect();
        used.sort_unstable();
        used.dedup();
        used.iter()
            .map(|&idx| format!("/Im{} {} 0 R", idx, builder.image_objects[idx].1))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn build_font_resource_dict(&self, font_objects: &[(StandardFont, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn font_index(&self, font: StandardFont, font_objects: &[(StandardFont, usize)]) -> Option<usize> {
        font_objects.iter().position(|(f, _)| *f == font)
    }

    fn image_index(&self, image: &Arc<LoadedImage>, image_objects: &[(Arc<LoadedImage>, usize)]) -> Option<usize> {
        image_objects.iter().position(|(known, _)| Arc::ptr_eq(known, image))
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Encode text for a literal string shown with a WinAnsi font. Bytes
    /// outside ASCII are written as octal escapes so the content stream stays
    /// 7-bit; characters WinAnsi cannot represent become `?`.
    fn encode_winansi(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match winansi_code(ch) {
                Some(b'(') => out.push_str("\\("),
                Some(b')') => out.push_str("\\)"),
                Some(b'\\') => out.push_str("\\\\"),
                Some(byte) if byte.is_ascii() => out.push(byte as char),
                Some(byte) => {
                    let _ = write!(out, "\\{:03o}", byte);
                }
                None => out.push(REPLACEMENT),
            }
        }
        out
    }

    /// A text string for the info dictionary: a literal for plain ASCII,
    /// otherwise UTF-16BE hex with a byte order mark.
    fn pdf_text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let mut hex = String::from("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(hex, "{:04X}", unit);
        }
        hex.push('>');
        hex
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontSpec;
    use crate::layout::PageGeometry;
    use miniz_oxide::inflate::decompress_to_vec_zlib;

    fn blank_page() -> LayoutPage {
        LayoutPage::new(1, &PageGeometry::a4())
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle.as_bytes()).count()
    }

    /// Inflate every FlateDecode stream in the file and concatenate them.
    fn content_streams(pdf: &[u8]) -> String {
        let mut out = String::new();
        let mut rest = pdf;
        while let Some(start) = rest.windows(7).position(|w| w == b"stream\n") {
            let body = &rest[start + 7..];
            let Some(end) = body.windows(10).position(|w| w == b"\nendstream") else {
                break;
            };
            if let Ok(raw) = decompress_to_vec_zlib(&body[..end]) {
                out.push_str(&String::from_utf8_lossy(&raw));
            }
            rest = &body[end + b"\nendstream".len()..];
        }
        out
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(PdfWriter::escape_pdf_string("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(PdfWriter::escape_pdf_string("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn winansi_encoding_escapes_non_ascii() {
        assert_eq!(PdfWriter::encode_winansi("Jos\u{e9}"), "Jos\\351");
        assert_eq!(PdfWriter::encode_winansi("\u{2022} (a)"), "\\225 \\(a\\)");
        assert_eq!(PdfWriter::encode_winansi("\u{4e2d}"), "?");
    }

    #[test]
    fn info_strings_fall_back_to_utf16() {
        assert_eq!(PdfWriter::pdf_text_string("Ana"), "(Ana)");
        assert_eq!(PdfWriter::pdf_text_string("S\u{e3}o"), "<FEFF005300E3006F>");
    }

    #[test]
    fn empty_page_produces_valid_pdf() {
        let bytes = PdfWriter::new()
            .write(&[blank_page()], &Metadata::default(), &FontContext::new())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, "%%EOF"));
        assert!(contains(&bytes, "xref"));
        assert!(contains(&bytes, "/Count 1"));
        assert!(contains(&bytes, "/BaseFont /Helvetica "));
    }

    #[test]
    fn no_pages_is_a_render_error() {
        let result = PdfWriter::new().write(&[], &Metadata::default(), &FontContext::new());
        assert!(matches!(result, Err(ResumeError::Render(_))));
    }

    #[test]
    fn metadata_in_info_dictionary() {
        let metadata = Metadata {
            title: Some("Resume - Ana Silva".to_string()),
            author: Some("Ana Silva".to_string()),
            subject: Some(Metadata::SUBJECT.to_string()),
        };
        let bytes = PdfWriter::new()
            .write(&[blank_page()], &metadata, &FontContext::new())
            .unwrap();
        assert!(contains(&bytes, "/Title (Resume - Ana Silva)"));
        assert!(contains(&bytes, "/Author (Ana Silva)"));
        assert!(contains(&bytes, "/Subject (Professional Resume)"));
        assert!(contains(&bytes, "/Info "));
    }

    #[test]
    fn regular_and_bold_registered_separately() {
        let mut page = blank_page();
        page.push(LayoutElement::text(10.0, 10.0, "a", 5.0, &FontSpec::regular(11.0), Color::BLACK));
        page.push(LayoutElement::text(10.0, 30.0, "b", 5.0, &FontSpec::bold(14.0), Color::BLACK));
        let bytes = PdfWriter::new()
            .write(&[page], &Metadata::default(), &FontContext::new())
            .unwrap();
        assert!(contains(&bytes, "/BaseFont /Helvetica "));
        assert!(contains(&bytes, "/BaseFont /Helvetica-Bold "));
        let content = content_streams(&bytes);
        assert!(content.contains("/F0 11.0 Tf"));
        assert!(content.contains("/F1 14.0 Tf"));
    }

    #[test]
    fn primitives_become_operators() {
        let mut page = blank_page();
        let stroke = Stroke {
            color: Color::BLACK,
            width: 3.0,
        };
        page.push(LayoutElement::rect(0.0, 0.0, 100.0, 200.0, Color::WHITE));
        page.push(LayoutElement::stroked_circle(50.0, 50.0, 10.0, stroke));
        page.push(LayoutElement::filled_circle(50.0, 50.0, 2.0, Color::BLACK));
        page.push(LayoutElement::line(0.0, 5.0, 40.0, 5.0, stroke));
        let bytes = PdfWriter::new()
            .write(&[page], &Metadata::default(), &FontContext::new())
            .unwrap();
        let content = content_streams(&bytes);
        assert!(content.contains("0.00 0.00 100.00 200.00 re\nf"));
        assert!(content.contains("60.00 50.00 m"));
        assert_eq!(content.matches(" c\n").count(), 8);
        assert!(content.contains("3.00 w"));
        assert!(content.contains("\nS\n"));
        assert!(content.contains("\nf\n"));
        assert!(content.contains("0.00 5.00 m\n40.00 5.00 l"));
    }

    #[test]
    fn shared_photo_is_written_once() {
        let photo = Arc::new(LoadedImage {
            pixel_data: ImagePixelData::Decoded {
                rgb: vec![255, 0, 0],
                alpha: Some(vec![0]),
            },
            width_px: 1,
            height_px: 1,
        });
        let pages: Vec<LayoutPage> = (1..=3)
            .map(|n| {
                let mut page = LayoutPage::new(n, &PageGeometry::a4());
                page.push(LayoutElement::image(10.0, 10.0, 20.0, 20.0, Arc::clone(&photo)));
                page
            })
            .collect();
        let bytes = PdfWriter::new()
            .write(&pages, &Metadata::default(), &FontContext::new())
            .unwrap();
        assert_eq!(count(&bytes, "/Subtype /Image"), 2); // RGB + SMask
        assert_eq!(count(&bytes, "/SMask "), 1);
        assert_eq!(count(&bytes, "/XObject << /Im0 "), 3);
        assert_eq!(content_streams(&bytes).matches("/Im0 Do").count(), 3);
    }
}
