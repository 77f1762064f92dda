//! Known facility and town names.
//!
//! Facilities (named campuses and sub-campuses) are always looked up before
//! towns, so "Kenepuru" is kept as a facility rather than being mistaken for
//! a generic place.

use super::rules::{RuleMatch, RuleSet};

/// Facility and town lookup tables.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    facilities: Vec<String>,
    towns: Vec<String>,
    facility_rules: RuleSet,
    town_rules: RuleSet,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new()
    }
}

impl Gazetteer {
    /// Create a gazetteer with the built-in names.
    pub fn new() -> Self {
        Self::from_names(Self::default_facilities(), Self::default_towns())
    }

    /// Create a gazetteer from explicit name lists.
    pub fn from_names(facilities: Vec<String>, towns: Vec<String>) -> Self {
        Self {
            facility_rules: RuleSet::keywords(&facilities),
            town_rules: RuleSet::keywords(&towns),
            facilities,
            towns,
        }
    }

    /// Add a facility name.
    pub fn add_facility(&mut self, name: &str) {
        if self.has_name(&self.facilities, name) {
            return;
        }
        self.facilities.push(name.trim().to_string());
        self.facility_rules = RuleSet::keywords(&self.facilities);
    }

    /// Add a town name.
    pub fn add_town(&mut self, name: &str) {
        if self.has_name(&self.towns, name) {
            return;
        }
        self.towns.push(name.trim().to_string());
        self.town_rules = RuleSet::keywords(&self.towns);
    }

    fn has_name(&self, names: &[String], name: &str) -> bool {
        let name = name.trim();
        name.is_empty() || names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Earliest facility name in the text.
    pub fn find_facility<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.facility_rules.find_leftmost(text)
    }

    /// Earliest town name in the text.
    pub fn find_town<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.town_rules.find_leftmost(text)
    }

    /// Every town name in the text.
    pub fn find_all_towns<'r, 't>(&'r self, text: &'t str) -> Vec<RuleMatch<'r, 't>> {
        self.town_rules.find_all(text)
    }

    /// Facility first, then town.
    pub fn find_place<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.find_facility(text).or_else(|| self.find_town(text))
    }

    /// Byte spans of every facility or town name in the text.
    pub fn place_spans(&self, text: &str) -> Vec<(usize, usize)> {
        self.facility_rules
            .find_all(text)
            .into_iter()
            .chain(self.town_rules.find_all(text))
            .map(|m| (m.start, m.end))
            .collect()
    }

    pub fn facilities(&self) -> &[String] {
        &self.facilities
    }

    pub fn towns(&self) -> &[String] {
        &self.towns
    }

    /// Built-in hospital campus and ward-cluster names.
    fn default_facilities() -> Vec<String> {
        [
            // Auckland region
            "Starship",
            "Greenlane",
            "Middlemore",
            "North Shore",
            "Waitakere",
            "Manukau Surgery Centre",
            "Manukau Super Clinic",
            "Botany Super Clinic",
            "Pukekohe",
            "Mason Clinic",
            "Buchanan",
            // Midland
            "Waikato",
            "Tokoroa",
            "Te Kuiti",
            "Taumarunui",
            "Thames",
            // Capital, Coast and Hutt
            "Kenepuru",
            "Kapiti Health Centre",
            "Ratonga Rua",
            "Te Whare Ahuru",
            "Hutt Valley",
            // Central
            "Wairarapa",
            "Wairau",
            "Hawera",
            "Dannevirke",
            // Canterbury and Southern
            "Burwood",
            "Princess Margaret",
            "Hillmorton",
            "Christchurch Women's",
            "Grey Base",
            "Dunstan",
            "Lakes District",
            "Wakari",
            "Southland",
            // Northland
            "Bay of Islands",
            "Dargaville",
            "Kaitaia",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Built-in city and town names.
    fn default_towns() -> Vec<String> {
        [
            "Auckland",
            "Wellington",
            "Christchurch",
            "Hamilton",
            "Tauranga",
            "Dunedin",
            "Palmerston North",
            "Napier",
            "Hastings",
            "Nelson",
            "Rotorua",
            "New Plymouth",
            "Whangarei",
            "Invercargill",
            "Whanganui",
            "Wanganui",
            "Gisborne",
            "Timaru",
            "Masterton",
            "Porirua",
            "Lower Hutt",
            "Upper Hutt",
            "Blenheim",
            "Greymouth",
            "Taupo",
            "Levin",
            "Oamaru",
            "Ashburton",
            "Whakatane",
            "Queenstown",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_before_town() {
        let gazetteer = Gazetteer::new();
        let place = gazetteer.find_place("Wellington Kenepuru PACU").unwrap();
        assert_eq!(place.label(), "Kenepuru");
    }

    #[test]
    fn test_town_fallback() {
        let gazetteer = Gazetteer::new();
        let place = gazetteer.find_place("wellington icu").unwrap();
        assert_eq!(place.label(), "Wellington");
        assert_eq!(place.matched, "wellington");
    }

    #[test]
    fn test_multi_word_names() {
        let gazetteer = Gazetteer::new();
        assert_eq!(
            gazetteer.find_place("new plymouth ED").unwrap().label(),
            "New Plymouth"
        );
        assert_eq!(
            gazetteer.find_place("north shore ward 10").unwrap().label(),
            "North Shore"
        );
    }

    #[test]
    fn test_no_place() {
        let gazetteer = Gazetteer::new();
        assert!(gazetteer.find_place("Capital & Coast Health").is_none());
        assert!(gazetteer.find_place("Capital & Coast Health New Zealand").is_none());
    }

    #[test]
    fn test_add_names() {
        let mut gazetteer = Gazetteer::new();
        gazetteer.add_facility("Te Nikau");
        gazetteer.add_town("Kaikoura");
        gazetteer.add_town("kaikoura");

        assert_eq!(gazetteer.find_facility("te nikau ward").unwrap().label(), "Te Nikau");
        assert_eq!(gazetteer.find_town("Kaikoura clinic").unwrap().label(), "Kaikoura");
        assert_eq!(
            gazetteer.towns().iter().filter(|t| t.as_str() == "Kaikoura").count(),
            1
        );
    }

    #[test]
    fn test_find_all_towns() {
        let gazetteer = Gazetteer::new();
        let towns: Vec<&str> = gazetteer
            .find_all_towns("Porirua to Wellington transfer")
            .iter()
            .map(|m| m.label())
            .collect();
        assert_eq!(towns, vec!["Porirua", "Wellington"]);
    }

    #[test]
    fn test_place_spans() {
        let gazetteer = Gazetteer::new();
        let spans = gazetteer.place_spans("ED Palmerston North");
        assert_eq!(spans, vec![(3, 19)]);
    }
}
