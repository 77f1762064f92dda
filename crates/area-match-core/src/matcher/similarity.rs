//! Similarity scoring against existing areas.
//!
//! Scores are integers 0-100:
//! - identical after normalization: 100
//! - one contains the other: length ratio scaled to 95
//! - otherwise: Levenshtein similarity

use std::collections::HashSet;

use strsim::levenshtein;
use tracing::trace;

use super::gazetteer::Gazetteer;
use super::noise::{collapse_whitespace, strip_noise};
use super::rules::remove_spans;
use crate::models::ExistingArea;

/// Ceiling for a substring match, so exact equality stays strictly highest.
const SUBSTRING_CEILING: f64 = 95.0;

/// Shortest hospital-name word stripped from references.
const MIN_HOSPITAL_WORD_CHARS: usize = 3;

/// Hospital-name words that say nothing about the area.
const GENERIC_HOSPITAL_WORDS: &[&str] = &[
    "health", "hospital", "hospitals", "board", "district", "dhb", "new", "zealand", "and", "the",
    "of", "te", "whatu", "ora", "services", "service", "regional", "base", "national", "medical",
    "centre", "center", "care",
];

/// Similarity between two area names, 0-100.
///
/// Symmetric. Two texts that both normalize to nothing are identical; one
/// empty side scores 0.
pub fn calculate_similarity(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return 100;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let longest = len_a.max(len_b) as f64;

    if a.contains(b.as_str()) || b.contains(a.as_str()) {
        let shortest = len_a.min(len_b) as f64;
        return (shortest / longest * SUBSTRING_CEILING).round() as u8;
    }

    let distance = levenshtein(&a, &b) as f64;
    ((1.0 - distance / longest) * 100.0).round().max(0.0) as u8
}

/// Lowercase, drop punctuation, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    collapse_whitespace(&kept)
}

/// An existing area with its match confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredArea<'a> {
    pub area: &'a ExistingArea,
    pub confidence: u8,
}

/// Picks the best existing area for a candidate reference.
pub struct Scorer<'a> {
    gazetteer: &'a Gazetteer,
    threshold: u8,
}

impl<'a> Scorer<'a> {
    pub fn new(gazetteer: &'a Gazetteer, threshold: u8) -> Self {
        Self {
            gazetteer,
            threshold,
        }
    }

    /// Strip noise, town names and hospital-name words.
    pub fn clean_for_matching(&self, text: &str, hospital_name: &str) -> String {
        let stripped = strip_noise(text);

        let towns: Vec<(usize, usize)> = self
            .gazetteer
            .find_all_towns(&stripped)
            .iter()
            .map(|m| (m.start, m.end))
            .collect();
        let without_towns = remove_spans(&stripped, &towns);

        let hospital_words = hospital_words(hospital_name);
        let kept: Vec<&str> = without_towns
            .split_whitespace()
            .filter(|word| !hospital_words.contains(&word.to_lowercase()))
            .collect();
        kept.join(" ")
    }

    /// Best of the raw/cleaned variant pairings for one existing area.
    pub fn score(
        &self,
        candidate: &str,
        cleaned_candidate: &str,
        area: &ExistingArea,
        hospital_name: &str,
    ) -> u8 {
        let cleaned_name = self.clean_for_matching(&area.name, hospital_name);
        let variants = [
            (candidate, area.name.as_str()),
            (cleaned_candidate, area.name.as_str()),
            (cleaned_candidate, cleaned_name.as_str()),
            (candidate, cleaned_name.as_str()),
        ];
        let best = variants
            .iter()
            .map(|(a, b)| calculate_similarity(a, b))
            .max()
            .unwrap_or(0);
        trace!(candidate, area = %area.name, best, "Scored area");
        best
    }

    /// Highest-scoring area at or above the threshold.
    ///
    /// Ties keep the area that came first.
    pub fn best_match<'e>(
        &self,
        candidate: &str,
        existing: &'e [ExistingArea],
        hospital_name: &str,
    ) -> Option<ScoredArea<'e>> {
        let cleaned_candidate = self.clean_for_matching(candidate, hospital_name);

        let mut best: Option<ScoredArea<'e>> = None;
        for area in existing {
            let confidence = self.score(candidate, &cleaned_candidate, area, hospital_name);
            if confidence < self.threshold {
                continue;
            }
            if best.map_or(true, |b| confidence > b.confidence) {
                best = Some(ScoredArea { area, confidence });
            }
        }
        best
    }
}

fn hospital_words(hospital_name: &str) -> HashSet<String> {
    hospital_name
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= MIN_HOSPITAL_WORD_CHARS)
        .filter(|w| !GENERIC_HOSPITAL_WORDS.contains(&w.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_after_normalization() {
        assert_eq!(calculate_similarity("ICU Lvl 3", "icu lvl 3"), 100);
        assert_eq!(calculate_similarity("ICU - Lvl 3", "ICU Lvl. 3"), 100);
        assert_eq!(calculate_similarity("  ICU   Lvl 3 ", "ICU Lvl 3"), 100);
    }

    #[test]
    fn test_substring_score() {
        // 3 / 9 * 95 = 31.67
        assert_eq!(calculate_similarity("ICU", "ICU Lvl 3"), 32);
        // 6 / 7 * 95 = 81.43
        assert_eq!(calculate_similarity("Ward 2", "Ward 21"), 81);
    }

    #[test]
    fn test_edit_distance_score() {
        // one substitution in 6 characters
        assert_eq!(calculate_similarity("Ward 2", "Ward 3"), 83);
        assert_eq!(calculate_similarity("abc", "xyz"), 0);
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(calculate_similarity("", ""), 100);
        assert_eq!(calculate_similarity("---", " "), 100);
        assert_eq!(calculate_similarity("ICU", ""), 0);
        assert_eq!(calculate_similarity("---", "ICU"), 0);
    }

    #[test]
    fn test_clean_for_matching() {
        let gazetteer = Gazetteer::new();
        let scorer = Scorer::new(&gazetteer, 60);
        assert_eq!(
            scorer.clean_for_matching("PO 123456 - Wellington ICU", "Capital & Coast Health"),
            "ICU"
        );
        assert_eq!(
            scorer.clean_for_matching("Hutt ICU", "Hutt Valley District Health Board"),
            "ICU"
        );
    }

    #[test]
    fn test_best_match_above_threshold() {
        let gazetteer = Gazetteer::new();
        let scorer = Scorer::new(&gazetteer, 60);
        let areas = vec![
            ExistingArea::new(1, "Emergency Department", 1),
            ExistingArea::new(2, "Wellington ICU", 1),
        ];
        let best = scorer
            .best_match("PO 4500123 ICU", &areas, "Capital & Coast Health")
            .unwrap();
        assert_eq!(best.area.id, 2);
        assert_eq!(best.confidence, 100);
    }

    #[test]
    fn test_best_match_below_threshold() {
        let gazetteer = Gazetteer::new();
        let scorer = Scorer::new(&gazetteer, 60);
        let areas = vec![ExistingArea::new(1, "Emergency Department", 1)];
        assert!(scorer
            .best_match("Oncology", &areas, "Test Hospital")
            .is_none());
    }

    #[test]
    fn test_references_cleaned_to_nothing_match() {
        let gazetteer = Gazetteer::new();
        let scorer = Scorer::new(&gazetteer, 60);
        let areas = vec![
            ExistingArea::new(1, "Emergency Department", 1),
            ExistingArea::new(2, "Wellington", 1),
        ];
        let best = scorer
            .best_match("PO 45001 Wellington", &areas, "Capital & Coast Health")
            .unwrap();
        assert_eq!(best.area.id, 2);
        assert_eq!(best.confidence, 100);
    }

    #[test]
    fn test_tie_goes_to_first_area() {
        let gazetteer = Gazetteer::new();
        let scorer = Scorer::new(&gazetteer, 60);
        let areas = vec![
            ExistingArea::new(7, "Ward 3", 1),
            ExistingArea::new(8, "Ward 4", 1),
        ];
        let best = scorer.best_match("Ward 5", &areas, "Test Hospital").unwrap();
        assert_eq!(best.area.id, 7);
        assert_eq!(best.confidence, 83);
    }
}
