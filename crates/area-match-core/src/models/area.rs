//! Area and purchase-reference models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A canonical area already confirmed for a hospital.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExistingArea {
    /// Area ID owned by the surrounding application
    pub id: i64,
    /// Canonical display name (e.g., "Wellington ICU Lvl 3")
    pub name: String,
    /// Hospital the area belongs to
    pub hospital_id: i64,
}

impl ExistingArea {
    /// Create a new existing area.
    pub fn new(id: i64, name: impl Into<String>, hospital_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            hospital_id,
        }
    }
}

/// An imported order line awaiting an area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReference {
    /// Purchase ID
    pub id: i64,
    /// Free-text customer reference as typed by purchasing staff
    pub raw_area_text: Option<String>,
    /// Hospital the order was placed by
    pub hospital_id: i64,
}

/// Existing areas grouped by hospital.
///
/// Insertion order is preserved within each hospital, which is what the
/// first-seen tie-break in scoring relies on.
#[derive(Debug, Clone, Default)]
pub struct AreaIndex {
    by_hospital: HashMap<i64, Vec<ExistingArea>>,
}

impl AreaIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an area under its hospital.
    pub fn insert(&mut self, area: ExistingArea) {
        self.by_hospital
            .entry(area.hospital_id)
            .or_default()
            .push(area);
    }

    /// Areas for a hospital, in insertion order.
    pub fn areas_for(&self, hospital_id: i64) -> &[ExistingArea] {
        self.by_hospital
            .get(&hospital_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of areas across all hospitals.
    pub fn len(&self) -> usize {
        self.by_hospital.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<ExistingArea> for AreaIndex {
    fn from_iter<I: IntoIterator<Item = ExistingArea>>(iter: I) -> Self {
        let mut index = AreaIndex::new();
        for area in iter {
            index.insert(area);
        }
        index
    }
}
