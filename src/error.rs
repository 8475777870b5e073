//! Structured error types for the resume engine.
//!
//! Layout never fails: missing fields are skipped and oversized text degrades
//! visually. Errors only come from the edges: JSON input, photo loading,
//! PDF serialization and file I/O.

use thiserror::Error;

/// Result alias used across the crate's public API.
pub type Result<T> = std::result::Result<T, ResumeError>;

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// JSON input failed to parse as a valid resume document.
    #[error("Failed to parse document: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// The photo could not be read or decoded.
    #[error("Image error: {0}")]
    Image(String),
    /// PDF generation failed.
    #[error("Render error: {0}")]
    Render(String),
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for ResumeError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the resume schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ResumeError::Parse { source: e, hint }
    }
}
