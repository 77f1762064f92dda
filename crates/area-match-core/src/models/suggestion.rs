//! Parsed reference and suggestion models.

use serde::{Deserialize, Serialize};

/// A raw reference decomposed into the four-part naming convention.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedArea {
    /// Facility or town (e.g., "Kenepuru", "Wellington")
    #[serde(rename = "where")]
    pub where_: Option<String>,
    /// Department or function (e.g., "ICU", "Gastro Ward 2")
    pub what: Option<String>,
    /// Level/building/wing text as found, in reading order (e.g., "level 3")
    pub location: Option<String>,
    /// Room/bay/bed text as found (e.g., "rms 5 and 6")
    pub sub_location: Option<String>,
    /// The text this was parsed from
    pub original: String,
}

impl ParsedArea {
    /// True when no segment was extracted.
    pub fn is_empty(&self) -> bool {
        self.where_.is_none()
            && self.what.is_none()
            && self.location.is_none()
            && self.sub_location.is_none()
    }
}

/// Outcome of matching a raw reference against a hospital's areas.
///
/// Both variants serialize with a `confidence` key; a new area writes 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    rename_all_fields = "camelCase",
    into = "SuggestionJson"
)]
pub enum AreaSuggestion {
    /// Reuse an existing area
    Existing {
        area_id: i64,
        area_name: String,
        /// Always at or above the matcher's confidence threshold
        confidence: u8,
    },
    /// Create a new area with this canonical name.
    ///
    /// An empty name means nothing usable survived cleanup; callers should
    /// prompt for manual entry instead of creating a blank area.
    New { area_name: String },
}

impl AreaSuggestion {
    /// Suggested area name.
    pub fn area_name(&self) -> &str {
        match self {
            AreaSuggestion::Existing { area_name, .. } | AreaSuggestion::New { area_name } => {
                area_name
            }
        }
    }

    /// Match confidence; always 0 for a new area.
    pub fn confidence(&self) -> u8 {
        match self {
            AreaSuggestion::Existing { confidence, .. } => *confidence,
            AreaSuggestion::New { .. } => 0,
        }
    }

    /// Existing area ID, if this reuses one.
    pub fn area_id(&self) -> Option<i64> {
        match self {
            AreaSuggestion::Existing { area_id, .. } => Some(*area_id),
            AreaSuggestion::New { .. } => None,
        }
    }

    pub fn is_existing(&self) -> bool {
        matches!(self, AreaSuggestion::Existing { .. })
    }

    /// True for a new-area suggestion with nothing to name it.
    pub fn is_unnamed(&self) -> bool {
        matches!(self, AreaSuggestion::New { area_name } if area_name.is_empty())
    }
}

/// Wire form of [`AreaSuggestion`].
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
enum SuggestionJson {
    Existing {
        area_id: i64,
        area_name: String,
        confidence: u8,
    },
    New {
        area_name: String,
        confidence: u8,
    },
}

impl From<AreaSuggestion> for SuggestionJson {
    fn from(suggestion: AreaSuggestion) -> Self {
        match suggestion {
            AreaSuggestion::Existing {
                area_id,
                area_name,
                confidence,
            } => SuggestionJson::Existing {
                area_id,
                area_name,
                confidence,
            },
            AreaSuggestion::New { area_name } => SuggestionJson::New {
                area_name,
                confidence: 0,
            },
        }
    }
}
