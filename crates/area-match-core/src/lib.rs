//! Area-Match Core Library
//!
//! Hospital area-name extraction and fuzzy matching for the curtain reorder
//! dashboard.
//!
//! # Architecture
//!
//! ```text
//! Raw order reference ("PO 4500123 - Wellington ICU Rms 5 and 6 Level 2")
//!          │
//!          ▼
//!    Noise Stripping ──────────────────────────────┐
//!          │                                       │
//!          ▼                                       ▼
//!   Segment Extraction                    Similarity Scoring
//!   Where / What / Location / Sub         vs existing areas
//!          │                                       │
//!          ▼                                       │
//!   Canonical Formatting                           │
//!   "Wellington ICU Lvl 2 Rms 5 & 6"               │
//!          │                                       │
//!          └──────────────┬────────────────────────┘
//!                         ▼
//!          AreaSuggestion: Existing (score ≥ threshold) | New
//! ```
//!
//! # Core Principle
//!
//! **Suggestions are proposals.** Every suggestion is confirmed by a person
//! in the dashboard before an area is created or reused.
//!
//! # Modules
//!
//! - [`matcher`]: Noise stripper, segment extractor, formatter and scorer
//! - [`models`]: Domain types (ExistingArea, ParsedArea, AreaSuggestion, etc.)
//! - [`config`]: Matcher configuration loaded from JSON
//! - [`reorder`]: Curtain changeover scheduling

pub mod config;
pub mod matcher;
pub mod models;
pub mod reorder;

// Re-export commonly used types
pub use config::{ConfigError, MatcherConfig};
pub use matcher::AreaMatcher;
pub use models::{
    AreaIndex, AreaOrder, AreaSuggestion, ExistingArea, ParsedArea, PurchaseReference,
};
pub use reorder::{reorder_dashboard, ReorderEntry, ReorderError, ReorderPolicy, ReorderStatus};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum AreaMatchError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ConfigError> for AreaMatchError {
    fn from(e: ConfigError) -> Self {
        AreaMatchError::ConfigError(e.to_string())
    }
}

impl From<ReorderError> for AreaMatchError {
    fn from(e: ReorderError) -> Self {
        AreaMatchError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a matcher with the default configuration.
#[uniffi::export]
pub fn new_area_matcher() -> Arc<AreaMatchCore> {
    Arc::new(AreaMatchCore {
        matcher: AreaMatcher::new(),
    })
}

/// Create a matcher from a JSON config file.
#[uniffi::export]
pub fn open_area_matcher(config_path: String) -> Result<Arc<AreaMatchCore>, AreaMatchError> {
    let config = MatcherConfig::from_json_file(&config_path)?;
    Ok(Arc::new(AreaMatchCore {
        matcher: AreaMatcher::with_config(config),
    }))
}

/// Similarity between two area names, 0-100.
#[uniffi::export]
pub fn calculate_similarity(a: String, b: String) -> u8 {
    matcher::calculate_similarity(&a, &b)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe matcher wrapper for FFI.
#[derive(uniffi::Object)]
pub struct AreaMatchCore {
    matcher: AreaMatcher,
}

#[uniffi::export]
impl AreaMatchCore {
    // =========================================================================
    // Matching Operations
    // =========================================================================

    /// Suggest an area for one raw reference; `None` for blank input.
    pub fn suggest_area(
        &self,
        raw_reference: Option<String>,
        existing_areas: Vec<FfiExistingArea>,
        hospital_name: String,
    ) -> Option<FfiAreaSuggestion> {
        let existing: Vec<ExistingArea> = existing_areas.into_iter().map(Into::into).collect();
        self.matcher
            .suggest_area(raw_reference.as_deref(), &existing, &hospital_name)
            .map(Into::into)
    }

    /// Suggest areas for a batch of purchases, in purchase-id order.
    pub fn suggest_areas(
        &self,
        purchases: Vec<FfiPurchaseReference>,
        existing_areas: Vec<FfiExistingArea>,
        hospital_names: HashMap<i64, String>,
    ) -> Vec<FfiBatchSuggestion> {
        let purchases: Vec<PurchaseReference> = purchases.into_iter().map(Into::into).collect();
        let index: AreaIndex = existing_areas.into_iter().map(ExistingArea::from).collect();
        self.matcher
            .suggest_areas(&purchases, &index, &hospital_names)
            .into_iter()
            .map(|(purchase_id, suggestion)| FfiBatchSuggestion {
                purchase_id,
                suggestion: suggestion.map(Into::into),
            })
            .collect()
    }

    /// Canonical name for a new area; empty when nothing is usable.
    pub fn format_new_area_suggestion(&self, raw_reference: String, hospital_name: String) -> String {
        self.matcher
            .format_new_area_suggestion(&raw_reference, &hospital_name)
    }

    pub fn confidence_threshold(&self) -> u8 {
        self.matcher.confidence_threshold()
    }

    // =========================================================================
    // Reorder Operations
    // =========================================================================

    /// Reorder dashboard as of `today` (`YYYY-MM-DD` or `dd/mm/yyyy`).
    pub fn reorder_dashboard(
        &self,
        orders: Vec<FfiAreaOrder>,
        today: String,
    ) -> Result<Vec<FfiReorderEntry>, AreaMatchError> {
        let today = reorder::parse_order_date(&today)?;
        let orders = orders
            .into_iter()
            .map(AreaOrder::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let entries = reorder_dashboard(&orders, &self.matcher.config().reorder, today);
        Ok(entries.into_iter().map(Into::into).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe existing area.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExistingArea {
    pub id: i64,
    pub name: String,
    pub hospital_id: i64,
}

impl From<FfiExistingArea> for ExistingArea {
    fn from(area: FfiExistingArea) -> Self {
        ExistingArea::new(area.id, area.name, area.hospital_id)
    }
}

/// FFI-safe purchase reference.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPurchaseReference {
    pub id: i64,
    pub raw_area_text: Option<String>,
    pub hospital_id: i64,
}

impl From<FfiPurchaseReference> for PurchaseReference {
    fn from(purchase: FfiPurchaseReference) -> Self {
        PurchaseReference {
            id: purchase.id,
            raw_area_text: purchase.raw_area_text,
            hospital_id: purchase.hospital_id,
        }
    }
}

/// FFI-safe area suggestion.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiAreaSuggestion {
    Existing {
        area_id: i64,
        area_name: String,
        confidence: u8,
    },
    New {
        area_name: String,
    },
}

impl From<AreaSuggestion> for FfiAreaSuggestion {
    fn from(suggestion: AreaSuggestion) -> Self {
        match suggestion {
            AreaSuggestion::Existing {
                area_id,
                area_name,
                confidence,
            } => FfiAreaSuggestion::Existing {
                area_id,
                area_name,
                confidence,
            },
            AreaSuggestion::New { area_name } => FfiAreaSuggestion::New { area_name },
        }
    }
}

/// FFI-safe batch result row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBatchSuggestion {
    pub purchase_id: i64,
    pub suggestion: Option<FfiAreaSuggestion>,
}

/// FFI-safe order history row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAreaOrder {
    pub area_id: i64,
    pub area_name: String,
    pub hospital_id: i64,
    /// `YYYY-MM-DD` or `dd/mm/yyyy`
    pub ordered_on: String,
}

impl TryFrom<FfiAreaOrder> for AreaOrder {
    type Error = ReorderError;

    fn try_from(order: FfiAreaOrder) -> Result<Self, Self::Error> {
        Ok(AreaOrder::new(
            order.area_id,
            order.area_name,
            order.hospital_id,
            reorder::parse_order_date(&order.ordered_on)?,
        ))
    }
}

/// FFI-safe reorder status.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiReorderStatus {
    Overdue { days_overdue: i64 },
    DueSoon { days_remaining: i64 },
    Current { days_remaining: i64 },
}

impl From<ReorderStatus> for FfiReorderStatus {
    fn from(status: ReorderStatus) -> Self {
        match status {
            ReorderStatus::Overdue { days_overdue } => FfiReorderStatus::Overdue { days_overdue },
            ReorderStatus::DueSoon { days_remaining } => {
                FfiReorderStatus::DueSoon { days_remaining }
            }
            ReorderStatus::Current { days_remaining } => {
                FfiReorderStatus::Current { days_remaining }
            }
        }
    }
}

/// FFI-safe dashboard row. Dates are ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReorderEntry {
    pub area_id: i64,
    pub area_name: String,
    pub hospital_id: i64,
    pub last_ordered: String,
    pub due_date: String,
    pub status: FfiReorderStatus,
}

impl From<ReorderEntry> for FfiReorderEntry {
    fn from(entry: ReorderEntry) -> Self {
        Self {
            area_id: entry.area_id,
            area_name: entry.area_name,
            hospital_id: entry.hospital_id,
            last_ordered: entry.last_ordered.to_string(),
            due_date: entry.due_date.to_string(),
            status: entry.status.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffi_area(id: i64, name: &str, hospital_id: i64) -> FfiExistingArea {
        FfiExistingArea {
            id,
            name: name.into(),
            hospital_id,
        }
    }

    #[test]
    fn test_ffi_suggest_area() {
        let core = new_area_matcher();
        let suggestion = core.suggest_area(
            Some("Kenepuru PACU".into()),
            vec![ffi_area(1, "Kenepuru PACU", 1)],
            "Capital & Coast Health".into(),
        );
        assert_eq!(
            suggestion,
            Some(FfiAreaSuggestion::Existing {
                area_id: 1,
                area_name: "Kenepuru PACU".into(),
                confidence: 100,
            })
        );
        assert_eq!(core.suggest_area(None, vec![], "Test Hospital".into()), None);
    }

    #[test]
    fn test_ffi_batch_is_ordered_by_purchase_id() {
        let core = new_area_matcher();
        let purchases = vec![
            FfiPurchaseReference {
                id: 9,
                raw_area_text: Some("ICU".into()),
                hospital_id: 1,
            },
            FfiPurchaseReference {
                id: 3,
                raw_area_text: Some("   ".into()),
                hospital_id: 1,
            },
        ];
        let rows = core.suggest_areas(purchases, vec![ffi_area(1, "ICU", 1)], HashMap::new());
        let ids: Vec<i64> = rows.iter().map(|r| r.purchase_id).collect();
        assert_eq!(ids, vec![3, 9]);
        assert!(rows[0].suggestion.is_none());
        assert!(matches!(
            rows[1].suggestion,
            Some(FfiAreaSuggestion::Existing { area_id: 1, .. })
        ));
    }

    #[test]
    fn test_ffi_reorder_dashboard() {
        let core = new_area_matcher();
        let orders = vec![FfiAreaOrder {
            area_id: 1,
            area_name: "ICU".into(),
            hospital_id: 1,
            ordered_on: "01/01/2022".into(),
        }];
        let rows = core.reorder_dashboard(orders, "2024-01-11".into()).unwrap();
        assert_eq!(rows[0].due_date, "2024-01-01");
        assert_eq!(rows[0].status, FfiReorderStatus::Overdue { days_overdue: 10 });
    }

    #[test]
    fn test_ffi_reorder_rejects_bad_date() {
        let core = new_area_matcher();
        let err = core.reorder_dashboard(vec![], "soon".into()).unwrap_err();
        assert!(matches!(err, AreaMatchError::InvalidInput(_)));
    }

    #[test]
    fn test_open_area_matcher_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json").to_string_lossy().into_owned();
        assert!(matches!(
            open_area_matcher(path),
            Err(AreaMatchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_ffi_similarity() {
        assert_eq!(calculate_similarity("ICU".into(), "icu".into()), 100);
    }
}
