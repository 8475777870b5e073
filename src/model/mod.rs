//! # Document Model
//!
//! The input representation for the resume engine: a profile (contact fields,
//! free-text sections, structured work history), the palette name, and the
//! labels drawn as section titles.
//!
//! Everything here is plain data deserialized from JSON and treated as
//! immutable during rendering. Field names follow the English schema; the
//! Portuguese names of the web form are accepted as aliases so that
//! captured form posts can be replayed unchanged.

pub mod experience;

use serde::{Deserialize, Deserializer, Serialize};

use crate::style::{ColorPalette, DEFAULT_PALETTE};

/// A complete resume ready for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Palette preset name. Unknown names fall back to the default preset.
    #[serde(default = "default_palette", alias = "paleta")]
    pub palette: String,

    pub profile: ProfileData,

    /// Section titles and the sidebar contact heading.
    #[serde(default)]
    pub labels: Labels,
}

fn default_palette() -> String {
    DEFAULT_PALETTE.to_string()
}

impl Document {
    pub fn new(profile: ProfileData) -> Self {
        Self {
            palette: default_palette(),
            profile,
            labels: Labels::default(),
        }
    }

    /// Resolve the palette preset for this document.
    pub fn color_palette(&self) -> ColorPalette {
        ColorPalette::named(&self.palette)
    }

    /// Metadata written into the PDF info dictionary.
    pub fn metadata(&self) -> Metadata {
        Metadata::for_profile(&self.profile)
    }
}

/// The candidate's data. Every string may be empty; empty means "skip".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    #[serde(alias = "nome")]
    pub name: String,
    pub email: String,
    #[serde(alias = "telefone")]
    pub phone: String,
    #[serde(alias = "endereco")]
    pub address: String,
    pub linkedin: String,
    pub github: String,

    #[serde(alias = "resumo")]
    pub summary: String,
    /// Comma-separated list.
    #[serde(alias = "habilidades")]
    pub skills: String,
    #[serde(alias = "escolaridade")]
    pub education: String,
    #[serde(alias = "cursos")]
    pub courses: String,
    #[serde(alias = "certificacoes")]
    pub certifications: String,
    #[serde(alias = "projetos")]
    pub projects: String,

    #[serde(alias = "experiencias")]
    pub experience: Vec<ExperienceEntry>,
}

impl ProfileData {
    /// Populated contact values in sidebar order: email, phone, address,
    /// then the two links.
    pub fn contacts(&self) -> impl Iterator<Item = &str> {
        [
            &self.email,
            &self.phone,
            &self.address,
            &self.linkedin,
            &self.github,
        ]
        .into_iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
    }

    /// Raw text of a free-text or list section. Experience is structured and
    /// has no raw text.
    pub fn section_text(&self, section: Section) -> &str {
        match section {
            Section::Summary => &self.summary,
            Section::Skills => &self.skills,
            Section::Experience => "",
            Section::Education => &self.education,
            Section::Courses => &self.courses,
            Section::Certifications => &self.certifications,
            Section::Projects => &self.projects,
        }
    }
}

/// One position in the work history, as entered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    #[serde(alias = "empresa")]
    pub company: String,
    #[serde(alias = "cargo")]
    pub role: String,
    #[serde(alias = "periodo")]
    pub period: String,
    /// One raw line per responsibility, optionally already bulleted.
    #[serde(alias = "responsabilidades", deserialize_with = "deserialize_lines")]
    pub responsibilities: Vec<String>,
    #[serde(alias = "conquistas", deserialize_with = "deserialize_lines")]
    pub achievements: Vec<String>,
}

/// Lines may arrive as a JSON list or as one newline-separated string (the
/// shape a form textarea posts).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLines {
    Text(String),
    List(Vec<String>),
}

fn deserialize_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawLines>::deserialize(deserializer)? {
        Some(RawLines::Text(text)) => text.lines().map(str::to_string).collect(),
        Some(RawLines::List(lines)) => lines,
        None => Vec::new(),
    })
}

/// The content sections, in the only order they are ever drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Summary,
    Skills,
    Experience,
    Education,
    Courses,
    Certifications,
    Projects,
}

/// How a section's body is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionBody {
    /// Comma-separated items, one bullet row each.
    List,
    /// Normalized experience blocks.
    Experience,
    /// Wrapped paragraphs.
    Paragraph,
}

impl Section {
    /// Declaration order. Input cannot reorder sections.
    pub const ORDER: [Section; 7] = [
        Section::Summary,
        Section::Skills,
        Section::Experience,
        Section::Education,
        Section::Courses,
        Section::Certifications,
        Section::Projects,
    ];

    pub fn body(&self) -> SectionBody {
        match self {
            Section::Skills => SectionBody::List,
            Section::Experience => SectionBody::Experience,
            _ => SectionBody::Paragraph,
        }
    }
}

/// User-facing strings drawn by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub summary: String,
    pub skills: String,
    pub experience: String,
    pub education: String,
    pub courses: String,
    pub certifications: String,
    pub projects: String,
    /// Heading of the sidebar contact band.
    pub contact: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            summary: "Professional Summary".to_string(),
            skills: "Technical Skills".to_string(),
            experience: "Professional Experience".to_string(),
            education: "Education".to_string(),
            courses: "Additional Courses".to_string(),
            certifications: "Certifications".to_string(),
            projects: "Relevant Projects".to_string(),
            contact: "CONTACT".to_string(),
        }
    }
}

impl Labels {
    /// Brazilian Portuguese titles.
    pub fn pt_br() -> Self {
        Self {
            summary: "Resumo Profissional".to_string(),
            skills: "Habilidades Técnicas".to_string(),
            experience: "Experiência Profissional".to_string(),
            education: "Formação Acadêmica".to_string(),
            courses: "Cursos Complementares".to_string(),
            certifications: "Certificações".to_string(),
            projects: "Projetos Relevantes".to_string(),
            contact: "CONTATO".to_string(),
        }
    }

    pub fn title(&self, section: Section) -> &str {
        match section {
            Section::Summary => &self.summary,
            Section::Skills => &self.skills,
            Section::Experience => &self.experience,
            Section::Education => &self.education,
            Section::Courses => &self.courses,
            Section::Certifications => &self.certifications,
            Section::Projects => &self.projects,
        }
    }
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

impl Metadata {
    pub const SUBJECT: &'static str = "Professional Resume";

    /// Title and author derive from the candidate's name; the subject is fixed.
    pub fn for_profile(profile: &ProfileData) -> Self {
        let name = profile.name.trim();
        let shown = if name.is_empty() { "Candidate" } else { name };
        Self {
            title: Some(format!("Resume - {}", shown)),
            author: Some(name.to_string()),
            subject: Some(Self::SUBJECT.to_string()),
        }
    }
}
