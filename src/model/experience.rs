//! Normalizes raw work-history entries into the header/bullet block sequence
//! the experience section draws.

use super::ExperienceEntry;

/// The bullet marker users may type themselves.
pub const BULLET: char = '•';

/// A normalized unit of experience content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    /// `"{company} - {role} ({period})"` or a shorter form. Drawn bold.
    Header(String),
    /// A responsibility or achievement, without its marker.
    Bullet(String),
}

impl TextBlock {
    pub fn text(&self) -> &str {
        match self {
            TextBlock::Header(text) | TextBlock::Bullet(text) => text,
        }
    }
}

/// Header line for an entry, if it has one.
///
/// A role or period without a company produces no header.
fn header(entry: &ExperienceEntry) -> Option<String> {
    let company = entry.company.trim();
    let role = entry.role.trim();
    let period = entry.period.trim();

    match (company.is_empty(), role.is_empty(), period.is_empty()) {
        (false, false, false) => Some(format!("{} - {} ({})", company, role, period)),
        (false, false, true) => Some(format!("{} - {}", company, role)),
        (false, true, _) => Some(company.to_string()),
        _ => None,
    }
}

/// One bullet per non-empty line. A line the user already bulleted keeps its
/// text and does not get a second marker.
fn bullets(lines: &[String]) -> impl Iterator<Item = TextBlock> + '_ {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix(BULLET) {
            Some(rest) => rest.trim_start(),
            None => line,
        })
        .filter(|text| !text.is_empty())
        .map(|text| TextBlock::Bullet(text.to_string()))
}

/// Normalize one entry: optional header, then responsibilities, then
/// achievements. Returns an empty vec for an entry with nothing to show.
pub fn parse_entry(entry: &ExperienceEntry) -> Vec<TextBlock> {
    let has_content = !entry.company.trim().is_empty()
        || !entry.role.trim().is_empty()
        || entry.responsibilities.iter().any(|l| !l.trim().is_empty())
        || entry.achievements.iter().any(|l| !l.trim().is_empty());
    if !has_content {
        return Vec::new();
    }

    header(entry)
        .map(TextBlock::Header)
        .into_iter()
        .chain(bullets(&entry.responsibilities))
        .chain(bullets(&entry.achievements))
        .collect()
}

/// Normalize every entry, dropping the ones that produce no blocks.
pub fn parse_entries(entries: &[ExperienceEntry]) -> Vec<Vec<TextBlock>> {
    entries
        .iter()
        .map(parse_entry)
        .filter(|blocks| !blocks.is_empty())
        .collect()
}
