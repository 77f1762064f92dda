//! JSON inputs for the command line.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use area_match_core::models::{AreaIndex, AreaSuggestion, ExistingArea, PurchaseReference};
use area_match_core::AreaMatcher;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
}

/// A batch of purchases to suggest areas for.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJob {
    /// Hospital ID → hospital name
    #[serde(default)]
    pub hospitals: HashMap<i64, String>,
    /// Existing areas across all hospitals
    #[serde(default)]
    pub areas: Vec<ExistingArea>,
    pub purchases: Vec<PurchaseReference>,
}

impl BatchJob {
    pub fn from_file(path: &Path) -> Result<Self> {
        read_json(path)
    }

    pub fn run(&self, matcher: &AreaMatcher) -> BTreeMap<i64, Option<AreaSuggestion>> {
        let index: AreaIndex = self.areas.iter().cloned().collect();
        matcher.suggest_areas(&self.purchases, &index, &self.hospitals)
    }
}
