//! Segment extraction.
//!
//! Splits a noise-stripped reference into Where / What / Location /
//! Sub-location. Each extracted segment is cut out of the working text
//! before the next step runs:
//!
//! 1. Sub-location (first rule that matches)
//! 2. Location (every match, left to right)
//! 3. Where (facility, then town, then the hospital name)
//! 4. What (whatever is left)

use std::sync::LazyLock;

use tracing::trace;

use super::gazetteer::Gazetteer;
use super::noise::collapse_whitespace;
use super::rules::{remove_spans, PatternRule, Placement, RuleSet};
use crate::models::ParsedArea;

/// Numbers attached to a sub-location keyword: "5", "12a", "5 & 6",
/// "5 and 6", "1-4", "1 to 4".
const NUMBERS: &str = r"(?P<value>\d+[a-z]?(?:\s*(?:&|and|to|-)\s*\d+[a-z]?)*)\b";

/// Room/bay/bed-level rules in priority order.
pub(crate) static SUB_LOCATION_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    let rule = |keyword: &str, label: &str| {
        PatternRule::new(
            &format!(r"(?i)\b{keyword}\s*{NUMBERS}"),
            label,
            Placement::Before,
        )
        .expect("valid sub-location regex")
    };
    RuleSet::new(vec![
        rule(r"resus(?:citation)?(?:\s+(?:bays?|rooms?|rms?))?", "Resus"),
        rule(r"care\s+(?:bays?|spaces?)", "Care"),
        rule(r"(?:rooms?|rms?)\.?", "Rm"),
        rule(r"bays?", "Bay"),
        rule(r"beds?", "Bed"),
        rule(r"spaces?", "Space"),
    ])
});

/// Level/floor/building/block/wing/unit rules. All matches are kept.
pub(crate) static LOCATION_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet::compile(&[
        (
            r"(?i)\b(?:levels?|lvl|lev|lv|l)\.?\s*(?P<value>\d+[a-z]?(?:\s*(?:&|and|-)\s*\d+[a-z]?)?)\b",
            "Lvl",
            Placement::Before,
        ),
        (
            r"(?i)\b(?P<value>\d+)(?:st|nd|rd|th)?\s*floor\b",
            "Floor",
            Placement::Before,
        ),
        (
            r"(?i)\b(?P<value>lower\s+ground|ground|basement)\s*floor\b",
            "Floor",
            Placement::After,
        ),
        (r"(?i)\bfloor\s*(?P<value>\d+)\b", "Floor", Placement::Before),
        (
            r"(?i)\b(?:building|bldg|blg|bld)\.?\s*(?P<value>\d+[a-z]?|[a-z])\b",
            "Bldg",
            Placement::Before,
        ),
        (
            r"(?i)\bblock\s*(?P<value>\d+[a-z]?|[a-z])\b",
            "Block",
            Placement::Before,
        ),
        (
            r"(?i)\b(?P<value>north|south|east|west)\s*wing\b",
            "Wing",
            Placement::After,
        ),
        (
            r"(?i)\bwing\s*(?P<value>\d+[a-z]?|[a-z])\b",
            "Wing",
            Placement::Before,
        ),
        (r"(?i)\bunit\s*(?P<value>\d+[a-z]?)\b", "Unit", Placement::Before),
        // Trailing compass direction ("Ward 5 North")
        (
            r"(?i)\b(?P<value>north|south|east|west)\s*$",
            "",
            Placement::ValueOnly,
        ),
    ])
    .expect("valid location regex")
});

/// Splits cleaned text into the four naming segments.
pub struct SegmentExtractor<'a> {
    gazetteer: &'a Gazetteer,
}

impl<'a> SegmentExtractor<'a> {
    pub fn new(gazetteer: &'a Gazetteer) -> Self {
        Self { gazetteer }
    }

    /// Extract segments from noise-stripped text.
    ///
    /// The hospital name is only consulted for a Where segment when the
    /// text itself names no place and something else was extracted.
    pub fn extract(&self, text: &str, hospital_name: &str) -> ParsedArea {
        let mut working = text.to_string();

        let sub_location = match SUB_LOCATION_RULES.find_first(&working) {
            Some(m) => {
                let found = m.matched.trim().to_string();
                let span = (m.start, m.end);
                working = remove_spans(&working, &[span]);
                Some(found)
            }
            None => None,
        };

        // Compass words inside place names ("Palmerston North") stay put.
        let places = self.gazetteer.place_spans(&working);
        let locations: Vec<_> = LOCATION_RULES
            .find_all(&working)
            .into_iter()
            .filter(|m| !places.iter().any(|&(s, e)| m.start < e && s < m.end))
            .collect();
        let location = if locations.is_empty() {
            None
        } else {
            let found: Vec<&str> = locations.iter().map(|m| m.matched.trim()).collect();
            Some(found.join(" "))
        };
        let spans: Vec<(usize, usize)> = locations.iter().map(|m| (m.start, m.end)).collect();
        working = remove_spans(&working, &spans);

        let mut where_ = match self.gazetteer.find_place(&working) {
            Some(m) => {
                let label = m.label().to_string();
                let span = (m.start, m.end);
                working = remove_spans(&working, &[span]);
                Some(label)
            }
            None => None,
        };

        let what = clean_remainder(&working);

        if where_.is_none() && (what.is_some() || location.is_some() || sub_location.is_some())
        {
            where_ = self
                .gazetteer
                .find_place(hospital_name)
                .map(|m| m.label().to_string());
        }

        trace!(
            text,
            ?where_,
            ?what,
            ?location,
            ?sub_location,
            "Extracted segments"
        );

        ParsedArea {
            where_,
            what,
            location,
            sub_location,
            original: text.to_string(),
        }
    }
}

/// Tidy what is left once the other segments are cut out.
fn clean_remainder(text: &str) -> Option<String> {
    let collapsed = collapse_whitespace(text);
    let trimmed = collapsed.trim_matches(|c: char| c == '&' || c == '\'' || c.is_whitespace());
    let cleaned = collapse_whitespace(trimmed);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str, hospital: &str) -> ParsedArea {
        let gazetteer = Gazetteer::new();
        SegmentExtractor::new(&gazetteer).extract(text, hospital)
    }

    #[test]
    fn test_all_four_segments() {
        let parsed = extract("Wellington ICU Rms 5 and 6 Level 2", "Capital & Coast Health");
        assert_eq!(parsed.where_.as_deref(), Some("Wellington"));
        assert_eq!(parsed.what.as_deref(), Some("ICU"));
        assert_eq!(parsed.location.as_deref(), Some("Level 2"));
        assert_eq!(parsed.sub_location.as_deref(), Some("Rms 5 and 6"));
    }

    #[test]
    fn test_location_first_input() {
        let parsed = extract("Lvl 3 ICU", "Capital & Coast Health");
        assert_eq!(parsed.where_, None);
        assert_eq!(parsed.what.as_deref(), Some("ICU"));
        assert_eq!(parsed.location.as_deref(), Some("Lvl 3"));
    }

    #[test]
    fn test_bay_range() {
        let parsed = extract("Bay 1-4 Ward 7", "Test Hospital");
        assert_eq!(parsed.sub_location.as_deref(), Some("Bay 1-4"));
        assert_eq!(parsed.what.as_deref(), Some("Ward 7"));
    }

    #[test]
    fn test_resus_takes_priority_over_rooms() {
        let parsed = extract("ED Resus Room 5 and 6", "Test Hospital");
        assert_eq!(parsed.sub_location.as_deref(), Some("Resus Room 5 and 6"));
        assert_eq!(parsed.what.as_deref(), Some("ED"));
    }

    #[test]
    fn test_only_first_sub_location() {
        let parsed = extract("Bay 3 Bed 4", "Test Hospital");
        assert_eq!(parsed.sub_location.as_deref(), Some("Bay 3"));
        assert_eq!(parsed.what.as_deref(), Some("Bed 4"));
    }

    #[test]
    fn test_all_locations_in_order() {
        let parsed = extract("Ground Floor Radiology East Wing", "Test Hospital");
        assert_eq!(parsed.location.as_deref(), Some("Ground Floor East Wing"));
        assert_eq!(parsed.what.as_deref(), Some("Radiology"));
    }

    #[test]
    fn test_block_unit_and_numbered_wing() {
        let parsed = extract("Oncology Block B Unit 4 Wing 2", "Test Hospital");
        assert_eq!(parsed.location.as_deref(), Some("Block B Unit 4 Wing 2"));
        assert_eq!(parsed.what.as_deref(), Some("Oncology"));
        assert_eq!(parsed.where_, None);
    }

    #[test]
    fn test_trailing_compass() {
        let parsed = extract("Ward 5 North", "Test Hospital");
        assert_eq!(parsed.location.as_deref(), Some("North"));
        assert_eq!(parsed.what.as_deref(), Some("Ward 5"));
    }

    #[test]
    fn test_compass_inside_town_name() {
        let parsed = extract("ED Palmerston North", "MidCentral Health");
        assert_eq!(parsed.where_.as_deref(), Some("Palmerston North"));
        assert_eq!(parsed.location, None);
        assert_eq!(parsed.what.as_deref(), Some("ED"));
    }

    #[test]
    fn test_facility_is_kept() {
        let parsed = extract("Kenepuru PACU", "Capital & Coast Health New Zealand");
        assert_eq!(parsed.where_.as_deref(), Some("Kenepuru"));
        assert_eq!(parsed.what.as_deref(), Some("PACU"));
    }

    #[test]
    fn test_where_from_hospital_name() {
        let parsed = extract("ICU", "Wellington Regional Hospital");
        assert_eq!(parsed.where_.as_deref(), Some("Wellington"));
        assert_eq!(parsed.what.as_deref(), Some("ICU"));
    }

    #[test]
    fn test_empty_text_ignores_hospital_name() {
        let parsed = extract("", "Wellington Regional Hospital");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_remainder_trimmed_of_joiners() {
        let parsed = extract("& Oncology &", "Test Hospital");
        assert_eq!(parsed.what.as_deref(), Some("Oncology"));
    }
}
