//! Area-name extraction and matching.
//!
//! Pipeline: Noise Stripping → Segment Extraction → Canonical Formatting,
//! with Similarity Scoring against the hospital's existing areas deciding
//! between reuse and a new name.

mod formatter;
mod gazetteer;
mod noise;
mod rules;
mod segments;
mod similarity;

pub use formatter::*;
pub use gazetteer::*;
pub use noise::*;
pub use rules::*;
pub use segments::*;
pub use similarity::*;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::config::MatcherConfig;
use crate::models::{AreaIndex, AreaSuggestion, ExistingArea, ParsedArea, PurchaseReference};

/// Main matcher that coordinates the full pipeline.
///
/// Holds no mutable state while matching, so one matcher can serve many
/// threads.
#[derive(Debug, Clone)]
pub struct AreaMatcher {
    config: MatcherConfig,
    gazetteer: Gazetteer,
    formatter: Formatter,
}

impl Default for AreaMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AreaMatcher {
    /// Create a matcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    /// Create a matcher from a configuration.
    pub fn with_config(config: MatcherConfig) -> Self {
        let mut gazetteer = Gazetteer::new();
        for facility in &config.extra_facilities {
            gazetteer.add_facility(facility);
        }
        for town in &config.extra_towns {
            gazetteer.add_town(town);
        }

        let mut formatter = Formatter::new();
        for abbreviation in &config.extra_abbreviations {
            formatter.add_abbreviation(abbreviation);
        }

        Self {
            config,
            gazetteer,
            formatter,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn confidence_threshold(&self) -> u8 {
        self.config.confidence_threshold
    }

    pub fn add_facility(&mut self, name: &str) {
        self.gazetteer.add_facility(name);
    }

    pub fn add_town(&mut self, name: &str) {
        self.gazetteer.add_town(name);
    }

    pub fn add_abbreviation(&mut self, abbreviation: &str) {
        self.formatter.add_abbreviation(abbreviation);
    }

    /// Decompose a raw reference into its naming segments.
    pub fn parse(&self, raw: &str, hospital_name: &str) -> ParsedArea {
        let cleaned = strip_noise(raw);
        let parsed = SegmentExtractor::new(&self.gazetteer).extract(&cleaned, hospital_name);
        ParsedArea {
            original: raw.to_string(),
            ..parsed
        }
    }

    /// Canonical display name for parsed segments.
    pub fn format(&self, parsed: &ParsedArea) -> String {
        self.formatter.format(parsed)
    }

    /// Canonical name to propose for a new area.
    ///
    /// An empty string means nothing usable could be salvaged.
    pub fn format_new_area_suggestion(&self, raw: &str, hospital_name: &str) -> String {
        self.format(&self.parse(raw, hospital_name))
    }

    /// Best existing area at or above the confidence threshold.
    pub fn best_match<'e>(
        &self,
        candidate: &str,
        existing: &'e [ExistingArea],
        hospital_name: &str,
    ) -> Option<ScoredArea<'e>> {
        Scorer::new(&self.gazetteer, self.confidence_threshold()).best_match(
            candidate,
            existing,
            hospital_name,
        )
    }

    /// Suggest an area for one raw reference.
    ///
    /// Returns `None` when the reference is absent, empty or whitespace.
    pub fn suggest_area(
        &self,
        raw: Option<&str>,
        existing: &[ExistingArea],
        hospital_name: &str,
    ) -> Option<AreaSuggestion> {
        let raw = raw.filter(|r| !r.trim().is_empty())?;

        let suggestion = match self.best_match(raw, existing, hospital_name) {
            Some(best) => AreaSuggestion::Existing {
                area_id: best.area.id,
                area_name: best.area.name.clone(),
                confidence: best.confidence,
            },
            None => AreaSuggestion::New {
                area_name: self.format_new_area_suggestion(raw, hospital_name),
            },
        };

        debug!(
            raw,
            hospital = hospital_name,
            area = suggestion.area_name(),
            confidence = suggestion.confidence(),
            existing = suggestion.is_existing(),
            "Suggested area"
        );
        Some(suggestion)
    }

    /// Suggest areas for a batch of purchases.
    ///
    /// Each purchase is matched against its own hospital's areas. A hospital
    /// missing from `hospital_names` is treated as having an empty name.
    pub fn suggest_areas(
        &self,
        purchases: &[PurchaseReference],
        index: &AreaIndex,
        hospital_names: &HashMap<i64, String>,
    ) -> BTreeMap<i64, Option<AreaSuggestion>> {
        let suggestions: BTreeMap<i64, Option<AreaSuggestion>> = purchases
            .iter()
            .map(|purchase| {
                let hospital_name = hospital_names
                    .get(&purchase.hospital_id)
                    .map(String::as_str)
                    .unwrap_or("");
                let suggestion = self.suggest_area(
                    purchase.raw_area_text.as_deref(),
                    index.areas_for(purchase.hospital_id),
                    hospital_name,
                );
                (purchase.id, suggestion)
            })
            .collect();

        let existing = suggestions
            .values()
            .filter(|s| s.as_ref().is_some_and(AreaSuggestion::is_existing))
            .count();
        let skipped = suggestions.values().filter(|s| s.is_none()).count();
        debug!(
            purchases = purchases.len(),
            existing,
            new = suggestions.len() - existing - skipped,
            skipped,
            "Suggested areas for batch"
        );
        suggestions
    }
}
