//! # Forme Resume CLI
//!
//! Usage:
//!   forme-resume resume.json -o resume.pdf
//!   echo '{ ... }' | forme-resume --photo me.png
//!   forme-resume --example > resume.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use forme_resume::image_loader;
use forme_resume::model::Document;
use forme_resume::style::ColorPalette;
use forme_resume::Result;

#[derive(Parser)]
#[command(name = "forme-resume")]
#[command(version)]
#[command(about = "Render a two-column resume PDF from JSON", long_about = None)]
struct Cli {
    /// Resume JSON (stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF (default: resume_<Name>.pdf)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Palette preset, overriding the document's
    #[arg(long, value_name = "NAME")]
    palette: Option<String>,

    /// Photo already masked to a circle (PNG with alpha, or JPEG)
    #[arg(long, value_name = "FILE")]
    photo: Option<PathBuf>,

    /// Print an example resume JSON and exit
    #[arg(long)]
    example: bool,

    /// List the palette presets and exit
    #[arg(long)]
    list_palettes: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.example {
        print!("{}", example_resume_json());
        return Ok(());
    }
    if cli.list_palettes {
        for name in ColorPalette::preset_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut document: Document = serde_json::from_str(&input)?;
    if let Some(palette) = cli.palette {
        document.palette = palette;
    }

    let photo = cli
        .photo
        .as_deref()
        .map(image_loader::load_image_file)
        .transpose()?;

    let pdf_bytes = forme_resume::render(&document, photo.as_ref())?;

    let output_path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(default_output_name(&document.profile.name)));
    fs::write(&output_path, &pdf_bytes)?;

    log::info!("palette {:?}, {} bytes", document.palette, pdf_bytes.len());
    eprintln!(
        "✓ Written {} bytes to {}",
        pdf_bytes.len(),
        output_path.display()
    );
    Ok(())
}

/// `resume_<Name_With_Underscores>.pdf`, or `resume.pdf` without a name.
fn default_output_name(name: &str) -> String {
    let stem: Vec<String> = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !matches!(c, '/' | '\\' | ':'))
                .collect()
        })
        .filter(|word: &String| !word.is_empty())
        .collect();
    if stem.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("resume_{}.pdf", stem.join("_"))
    }
}

fn example_resume_json() -> &'static str {
    r##"{
  "palette": "professional",
  "profile": {
    "name": "Ana Silva",
    "email": "ana.silva@example.com",
    "phone": "+55 11 98765-4321",
    "address": "Sao Paulo, SP",
    "linkedin": "linkedin.com/in/anasilva",
    "github": "github.com/anasilva",
    "summary": "Backend engineer with eight years of experience building payment and logistics platforms. Comfortable owning services from design review to on-call.\n\nCurrently focused on reliability and developer tooling.",
    "skills": "Rust, Go, PostgreSQL, Kafka, Kubernetes, Terraform",
    "experience": [
      {
        "company": "Acme Payments",
        "role": "Senior Software Engineer",
        "period": "2020 - Present",
        "responsibilities": [
          "Designed the settlement service handling 2M transactions per day",
          "• Led the migration from a monolith to event-driven services"
        ],
        "achievements": ["Cut reconciliation time from six hours to twenty minutes"]
      },
      {
        "company": "Logix",
        "role": "Software Engineer",
        "period": "2016 - 2020",
        "responsibilities": "Built route optimization APIs\nMaintained the CI pipeline"
      }
    ],
    "education": "B.Sc. Computer Science, University of Sao Paulo (2015)",
    "courses": "Distributed Systems, MIT OpenCourseWare",
    "certifications": "Certified Kubernetes Administrator (2022)",
    "projects": "Maintainer of an open-source rate limiter used by several fintech startups."
  }
}
"##
}
