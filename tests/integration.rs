//! Integration tests for the resume rendering pipeline.
//!
//! These tests exercise the full path from JSON input to PDF output.
//! They verify:
//! - JSON deserialization works correctly, including the form aliases
//! - Layout produces the right number of pages, each with its sidebar
//! - Empty sections leave no trace
//! - Page breaks happen at the bottom margin and resume at the top
//! - The name fits the sidebar through each of its tiers
//! - PDF output is structurally valid

use std::sync::Arc;

use forme_resume::font::FontContext;
use forme_resume::image_loader::{ImagePixelData, LoadedImage};
use forme_resume::layout::{DrawCommand, LayoutElement, LayoutEngine, LayoutPage, PageGeometry, CM};
use forme_resume::model::*;
use forme_resume::ResumeError;

// ─── Helpers ────────────────────────────────────────────────────

fn profile(name: &str) -> ProfileData {
    ProfileData {
        name: name.to_string(),
        email: "someone@example.com".to_string(),
        ..Default::default()
    }
}

fn layout_doc(document: &Document) -> Vec<LayoutPage> {
    forme_resume::layout(document, None, &FontContext::new())
}

fn layout_with(geometry: PageGeometry, document: &Document) -> Vec<LayoutPage> {
    LayoutEngine::with_geometry(geometry).layout(document, None, &FontContext::new())
}

fn text_of(element: &LayoutElement) -> &str {
    match &element.draw {
        DrawCommand::Text { text, .. } => text,
        _ => "",
    }
}

fn font_size_of(element: &LayoutElement) -> f64 {
    match &element.draw {
        DrawCommand::Text { font, .. } => font.size,
        _ => 0.0,
    }
}

fn titles(pages: &[LayoutPage]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|p| p.tagged("SectionTitle"))
        .map(|e| text_of(e).to_string())
        .collect()
}

fn long_experience(entries: usize) -> Vec<ExperienceEntry> {
    (0..entries)
        .map(|i| ExperienceEntry {
            company: format!("Company {}", i),
            role: "Engineer".to_string(),
            period: "2019 - 2021".to_string(),
            responsibilities: vec![
                "Designed and operated services processing millions of requests per day \
                 across several regions with strict latency budgets"
                    .to_string(),
                "Mentored junior engineers and ran the weekly architecture review".to_string(),
            ],
            achievements: vec!["Reduced infrastructure cost by thirty percent".to_string()],
        })
        .collect()
}

fn photo() -> LoadedImage {
    LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb: vec![200, 100, 50, 200, 100, 50, 200, 100, 50, 200, 100, 50],
            alpha: Some(vec![0, 255, 255, 0]),
        },
        width_px: 2,
        height_px: 2,
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
}

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle.as_bytes()).count()
}

// ─── JSON → PDF ─────────────────────────────────────────────────

#[test]
fn test_render_json_produces_pdf_with_metadata() {
    let json = r#"{
        "profile": {
            "name": "Ana Silva",
            "email": "ana@example.com",
            "summary": "Backend engineer.",
            "skills": "Rust, Go"
        }
    }"#;
    let bytes = forme_resume::render_json(json, None).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(contains(&bytes, "%%EOF"));
    assert!(contains(&bytes, "/Title (Resume - Ana Silva)"));
    assert!(contains(&bytes, "/Author (Ana Silva)"));
    assert!(contains(&bytes, "/Subject (Professional Resume)"));
    assert!(contains(&bytes, "/Count 1"));
}

#[test]
fn test_form_aliases_render() {
    let json = r#"{
        "paleta": "corporate",
        "profile": {
            "nome": "Maria Souza",
            "telefone": "+55 11 99999-0000",
            "habilidades": "Python, SQL",
            "experiencias": [
                { "empresa": "Acme", "cargo": "Dev", "periodo": "2021",
                  "responsabilidades": "Fiz A\n• Fiz B" }
            ]
        }
    }"#;
    let doc: Document = serde_json::from_str(json).unwrap();
    let pages = layout_doc(&doc);
    let texts: Vec<&str> = pages[0].texts().collect();
    assert!(texts.contains(&"Maria Souza"));
    assert!(texts.contains(&"Acme - Dev (2021)"));
    assert!(texts.contains(&"Fiz B"));
    assert!(forme_resume::render(&doc, None).is_ok());
}

#[test]
fn test_invalid_json_is_parse_error_with_hint() {
    let err = forme_resume::render_json("{ \"profile\": ", None).unwrap_err();
    match err {
        ResumeError::Parse { hint, .. } => assert!(!hint.is_empty()),
        other => panic!("expected parse error, got {:?}", other),
    }

    let err = forme_resume::render_json(r#"{ "profile": { "experience": 5 } }"#, None).unwrap_err();
    assert!(err.to_string().contains("schema"));
}

#[test]
fn test_unknown_palette_falls_back() {
    let mut doc = Document::new(profile("Ana Silva"));
    doc.palette = "neon".to_string();
    let pages = layout_doc(&doc);
    let default_primary = forme_resume::style::ColorPalette::default().primary;
    let stripe = pages[0].tagged("SidebarStripe").next().unwrap();
    assert!(matches!(stripe.draw, DrawCommand::Rect { fill } if fill == default_primary));
}

// ─── Sections ───────────────────────────────────────────────────

#[test]
fn test_sections_in_fixed_order() {
    let doc = Document::new(ProfileData {
        projects: "P".into(),
        summary: "S".into(),
        certifications: "C".into(),
        skills: "a, b".into(),
        education: "E".into(),
        courses: "K".into(),
        experience: long_experience(1),
        ..profile("Ana Silva")
    });
    assert_eq!(
        titles(&layout_doc(&doc)),
        vec![
            "Professional Summary",
            "Technical Skills",
            "Professional Experience",
            "Education",
            "Additional Courses",
            "Certifications",
            "Relevant Projects",
        ]
    );
}

#[test]
fn test_empty_section_is_skipped_without_gap() {
    let doc = Document::new(ProfileData {
        education: "B.Sc. Computer Science".into(),
        courses: "   ".into(),
        certifications: "CKA".into(),
        ..profile("Ana Silva")
    });
    let pages = layout_doc(&doc);
    let found = titles(&pages);
    assert!(!found.iter().any(|t| t == "Additional Courses"));

    let title_y: Vec<f64> = pages[0].tagged("SectionTitle").map(|e| e.y).collect();
    assert_eq!(title_y.len(), 2);
    // Education: title advance, one 18pt line, section gap. Nothing for courses.
    let expected = CM + 18.0 + CM;
    assert!((title_y[0] - title_y[1] - expected).abs() < 1e-9);
}

#[test]
fn test_skills_split_into_rows() {
    let doc = Document::new(ProfileData {
        skills: "Python, Go ,  Rust,,".into(),
        ..profile("Ana Silva")
    });
    let pages = layout_doc(&doc);
    let items: Vec<&str> = pages[0].tagged("ListItem").map(text_of).collect();
    assert_eq!(items, vec!["Python", "Go", "Rust"]);
}

#[test]
fn test_experience_blocks() {
    let doc = Document::new(ProfileData {
        experience: vec![ExperienceEntry {
            company: "Acme".into(),
            role: "Engineer".into(),
            period: "2020-2022".into(),
            responsibilities: vec!["Built X".into(), "• Shipped Y".into()],
            achievements: vec![],
        }],
        ..profile("Ana Silva")
    });
    let pages = layout_doc(&doc);
    let body: Vec<&str> = pages[0]
        .tagged("BodyText")
        .chain(pages[0].tagged("BulletText"))
        .map(text_of)
        .collect();
    assert_eq!(body, vec!["Acme - Engineer (2020-2022)", "Built X", "Shipped Y"]);
    assert_eq!(pages[0].tagged("Bullet").count(), 2);
}

// ─── Pagination ─────────────────────────────────────────────────

#[test]
fn test_long_resume_spans_pages_with_sidebar_on_each() {
    let doc = Document::new(ProfileData {
        summary: "Engineer.".into(),
        experience: long_experience(14),
        ..profile("Ana Silva")
    });
    let pages = layout_doc(&doc);
    assert!(pages.len() >= 2, "expected several pages, got {}", pages.len());

    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.number, i + 1);
        assert_eq!(page.tagged("SidebarBackground").count(), 1);
        assert_eq!(page.tagged("SidebarStripe").count(), 1);
        assert_eq!(page.elements[0].node_type, Some("SidebarBackground"));
        assert_eq!(page.tagged("ContactBand").count(), 1);
        let names: Vec<&str> = page.tagged("NameLine").map(text_of).collect();
        assert_eq!(names, vec!["Ana Silva"]);
    }

    let bytes = forme_resume::render(&doc, None).unwrap();
    assert!(contains(&bytes, &format!("/Count {}", pages.len())));
}

#[test]
fn test_content_stays_above_bottom_margin() {
    let doc = Document::new(ProfileData {
        experience: long_experience(14),
        projects: vec!["Open source maintainer of several libraries."; 60].join(" "),
        ..profile("Ana Silva")
    });
    let geometry = PageGeometry::a4();
    for page in layout_doc(&doc) {
        for e in page.elements.iter().filter(|e| e.x >= geometry.content_x) {
            if let DrawCommand::Text { .. } = e.draw {
                assert!(e.y >= geometry.bottom_margin, "{:?} below margin", text_of(e));
                assert!(e.y <= geometry.top_margin);
            }
        }
    }
}

#[test]
fn test_cursor_is_monotonic_within_a_page() {
    let doc = Document::new(ProfileData {
        summary: "First paragraph.\n\nSecond paragraph after a gap.".into(),
        skills: "Rust, Go, SQL".into(),
        experience: long_experience(10),
        education: "B.Sc.".into(),
        ..profile("Ana Silva")
    });
    let content_x = PageGeometry::a4().content_x;
    for page in layout_doc(&doc) {
        let baselines: Vec<f64> = page
            .elements
            .iter()
            .filter(|e| e.x >= content_x && matches!(e.draw, DrawCommand::Text { .. }))
            .map(|e| e.y)
            .collect();
        for pair in baselines.windows(2) {
            assert!(pair[1] <= pair[0], "cursor moved up: {} -> {}", pair[0], pair[1]);
        }
    }
}

#[test]
fn test_continuation_page_resumes_at_top_margin() {
    let doc = Document::new(ProfileData {
        projects: vec!["Shipped a thing that mattered to many users."; 200].join(" "),
        ..profile("Ana Silva")
    });
    let pages = layout_doc(&doc);
    assert!(pages.len() >= 2);
    let first = pages[1].tagged("BodyText").next().unwrap();
    assert_eq!(first.y, PageGeometry::a4().top_margin);
}

// ─── Sidebar name fitting ───────────────────────────────────────

#[test]
fn test_short_name_single_line_at_start_size() {
    let pages = layout_doc(&Document::new(profile("Ana Silva")));
    let names: Vec<&LayoutElement> = pages[0].tagged("NameLine").collect();
    assert_eq!(names.len(), 1);
    assert_eq!(font_size_of(names[0]), 18.0);
    let sidebar = PageGeometry::a4().sidebar_width;
    assert!(((sidebar - names[0].width) / 2.0 - names[0].x).abs() < 1e-9);
}

#[test]
fn test_long_name_wraps_in_narrow_sidebar() {
    let usable = 100.0;
    let geometry = PageGeometry::a4().with_sidebar_width(usable + CM);
    let pages = layout_with(
        geometry,
        &Document::new(profile("Maria Fernanda de Oliveira Santos Junior")),
    );
    let names: Vec<&LayoutElement> = pages[0].tagged("NameLine").collect();
    assert!(names.len() >= 2);
    for line in &names {
        assert_eq!(font_size_of(line), 14.0);
        assert!(line.width <= usable);
        assert!(((geometry.sidebar_width - line.width) / 2.0 - line.x).abs() < 1e-9);
    }
    let rebuilt: Vec<&str> = names.iter().map(|e| text_of(e)).collect();
    assert_eq!(rebuilt.join(" "), "Maria Fernanda de Oliveira Santos Junior");
}

#[test]
fn test_single_long_word_name_is_not_split() {
    let geometry = PageGeometry::a4().with_sidebar_width(60.0 + CM);
    let pages = layout_with(geometry, &Document::new(profile("Bartholomew")));
    let names: Vec<&LayoutElement> = pages[0].tagged("NameLine").collect();
    assert_eq!(names.len(), 1);
    assert_eq!(text_of(names[0]), "Bartholomew");
    assert_eq!(font_size_of(names[0]), 14.0);
}

// ─── Photo ──────────────────────────────────────────────────────

#[test]
fn test_photo_on_every_page_written_once() {
    let doc = Document::new(ProfileData {
        experience: long_experience(14),
        ..profile("Ana Silva")
    });
    let photo = photo();
    let pages = forme_resume::layout(&doc, Some(&photo), &FontContext::new());
    assert!(pages.len() >= 2);
    let shared: Vec<Arc<LoadedImage>> = pages
        .iter()
        .flat_map(|p| p.tagged("Photo"))
        .filter_map(|e| match &e.draw {
            DrawCommand::Image { image } => Some(Arc::clone(image)),
            _ => None,
        })
        .collect();
    assert_eq!(shared.len(), pages.len());
    assert!(shared.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));

    let bytes = forme_resume::render(&doc, Some(&photo)).unwrap();
    assert_eq!(count(&bytes, "/SMask "), 1);
    assert_eq!(count(&bytes, "/XObject << /Im0 "), pages.len());
}
