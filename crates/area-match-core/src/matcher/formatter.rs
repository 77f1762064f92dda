//! Canonical area-name formatter.
//!
//! Reassembles a [`ParsedArea`] as `Where What Location Sub-location` with
//! standard capitalization and clinical abbreviations.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::noise::{collapse_whitespace, strip_noise};
use super::rules::{Placement, RuleMatch};
use super::segments::{LOCATION_RULES, SUB_LOCATION_RULES};
use crate::models::ParsedArea;

/// Words kept lowercase unless they start the segment.
const MINOR_WORDS: &[&str] = &["and", "of", "the"];

/// Shortest name worth suggesting.
const MIN_NAME_CHARS: usize = 2;

static AND_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:&|\band\b)\s*").expect("valid list joiner regex"));

static RANGE_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:-|\bto\b)\s*").expect("valid range joiner regex"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid number regex"));

/// Formats parsed segments into a display name.
#[derive(Debug, Clone)]
pub struct Formatter {
    /// Lowercase token → canonical abbreviation
    abbreviations: HashMap<String, String>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    /// Create a formatter with the standard clinical abbreviations.
    pub fn new() -> Self {
        Self {
            abbreviations: Self::default_abbreviations(),
        }
    }

    /// Register an extra abbreviation, kept uppercase in the What segment.
    pub fn add_abbreviation(&mut self, abbreviation: &str) {
        let abbreviation = abbreviation.trim();
        if abbreviation.is_empty() {
            return;
        }
        self.abbreviations
            .insert(abbreviation.to_lowercase(), abbreviation.to_uppercase());
    }

    /// Canonical display name for a parsed reference.
    ///
    /// Returns an empty string when nothing usable remains.
    pub fn format(&self, parsed: &ParsedArea) -> String {
        if parsed.is_empty() {
            return self.fallback(&parsed.original);
        }

        let segments = [
            parsed.where_.clone(),
            parsed.what.as_deref().map(|w| self.format_what(w)),
            parsed.location.as_deref().map(format_location),
            parsed.sub_location.as_deref().map(format_sub_location),
        ];
        let name = segments
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.chars().count() < MIN_NAME_CHARS {
            String::new()
        } else {
            name
        }
    }

    /// Title-case the department text and standardize abbreviations.
    pub fn format_what(&self, what: &str) -> String {
        title_case(what)
            .split(' ')
            .map(|word| {
                self.abbreviations
                    .get(&word.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| word.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Generic cleanup for text no segment could be pulled from.
    ///
    /// All-uppercase tokens are kept as abbreviations; everything else is
    /// title-cased. Text without a letter or digit is not a name.
    pub fn fallback(&self, original: &str) -> String {
        let cleaned = strip_noise(original);
        let name = cleaned
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                if is_all_caps(word) {
                    word.to_string()
                } else {
                    title_word(word, i == 0)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        if name.chars().count() < MIN_NAME_CHARS || !name.chars().any(char::is_alphanumeric) {
            String::new()
        } else {
            name
        }
    }

    fn default_abbreviations() -> HashMap<String, String> {
        [
            "ICU", "ED", "CED", "HDU", "CCU", "NICU", "PICU", "PACU", "MAPU", "EDOU", "SSR", "SAU",
            "SAPU", "ASSU", "MSSU", "IRW", "WRH", "CT", "MRI", "ENT", "PET", "GP", "OT",
        ]
        .iter()
        .map(|abbr| (abbr.to_lowercase(), abbr.to_string()))
        .collect()
    }
}

/// Render location text as `Lvl 3`, `Ground Floor`, `East Wing` and so on.
pub fn format_location(location: &str) -> String {
    let matches = LOCATION_RULES.find_all(location);
    if matches.is_empty() {
        return title_case(location);
    }
    matches
        .iter()
        .map(render_location)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_location(m: &RuleMatch<'_, '_>) -> String {
    let value = if m.value.chars().any(|c| c.is_ascii_digit()) {
        normalize_numbers(m.value)
    } else {
        title_case(m.value)
    };
    match m.placement() {
        Placement::Before => format!("{} {}", m.label(), value),
        Placement::After => format!("{} {}", value, m.label()),
        Placement::ValueOnly => value,
    }
}

/// Render sub-location text as `Rm 5`, `Rms 5 & 6`, `Bays 1-4` and so on.
///
/// Room, bay, bed and space labels are pluralized when more than one
/// number is given. Care and resus labels never are.
pub fn format_sub_location(sub_location: &str) -> String {
    let Some(m) = SUB_LOCATION_RULES.find_first(sub_location) else {
        return title_case(sub_location);
    };

    let value = normalize_numbers(m.value);
    let several = NUMBER.find_iter(&value).count() > 1;
    let label = match (m.label(), several) {
        ("Rm", true) => "Rms".to_string(),
        ("Bay" | "Bed" | "Space", true) => format!("{}s", m.label()),
        (label, _) => label.to_string(),
    };
    format!("{label} {value}")
}

/// "5 and 6" → "5 & 6", "1 to 4" → "1-4", "12a" → "12A".
fn normalize_numbers(value: &str) -> String {
    let joined = AND_JOIN.replace_all(value.trim(), " & ");
    let ranged = RANGE_JOIN.replace_all(&joined, "-");
    collapse_whitespace(&ranged).to_uppercase()
}

/// Title-case every word; minor words stay lowercase unless first and
/// words carrying digits are uppercased ("12a" → "12A").
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| title_word(word, i == 0))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_word(word: &str, first: bool) -> String {
    if word.chars().any(|c| c.is_ascii_digit()) {
        return word.to_uppercase();
    }
    let lower = word.to_lowercase();
    if !first && MINOR_WORDS.contains(&lower.as_str()) {
        return lower;
    }
    lower
        .split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}
