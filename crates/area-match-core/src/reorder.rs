//! Curtain changeover scheduling.
//!
//! Each area's curtains are due for replacement a fixed number of months
//! after its latest order. The dashboard lists every area once, most urgent
//! first.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::AreaOrder;

/// Reorder errors.
#[derive(Error, Debug, PartialEq)]
pub enum ReorderError {
    #[error("invalid order date: {0}")]
    InvalidDate(String),
}

pub type ReorderResult<T> = Result<T, ReorderError>;

/// Accepted order-date formats, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse an order date written as `YYYY-MM-DD` or `dd/mm/yyyy`.
pub fn parse_order_date(raw: &str) -> ReorderResult<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| ReorderError::InvalidDate(raw.to_string()))
}

/// Changeover cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReorderPolicy {
    /// Months between changeovers
    pub cycle_months: u32,
    /// Days before the due date an area counts as due soon
    pub due_soon_days: u32,
}

impl Default for ReorderPolicy {
    fn default() -> Self {
        Self {
            cycle_months: 24,
            due_soon_days: 60,
        }
    }
}

impl ReorderPolicy {
    /// Date the next changeover falls due.
    pub fn due_date(&self, last_ordered: NaiveDate) -> NaiveDate {
        last_ordered
            .checked_add_months(Months::new(self.cycle_months))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn status(&self, last_ordered: NaiveDate, today: NaiveDate) -> ReorderStatus {
        let days = (self.due_date(last_ordered) - today).num_days();
        if days < 0 {
            ReorderStatus::Overdue {
                days_overdue: -days,
            }
        } else if days <= i64::from(self.due_soon_days) {
            ReorderStatus::DueSoon {
                days_remaining: days,
            }
        } else {
            ReorderStatus::Current {
                days_remaining: days,
            }
        }
    }
}

/// Where an area sits in its changeover cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ReorderStatus {
    Overdue { days_overdue: i64 },
    DueSoon { days_remaining: i64 },
    Current { days_remaining: i64 },
}

impl ReorderStatus {
    /// Overdue or due soon.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, ReorderStatus::Current { .. })
    }
}

/// One dashboard row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReorderEntry {
    pub area_id: i64,
    pub area_name: String,
    pub hospital_id: i64,
    pub last_ordered: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(flatten)]
    pub status: ReorderStatus,
}

/// Build the reorder dashboard from order history.
///
/// Only the latest order per area counts. Rows are sorted by due date, then
/// area name.
pub fn reorder_dashboard(
    orders: &[AreaOrder],
    policy: &ReorderPolicy,
    today: NaiveDate,
) -> Vec<ReorderEntry> {
    let mut latest: HashMap<i64, &AreaOrder> = HashMap::new();
    for order in orders {
        latest
            .entry(order.area_id)
            .and_modify(|current| {
                if order.ordered_on > current.ordered_on {
                    *current = order;
                }
            })
            .or_insert(order);
    }

    let mut entries: Vec<ReorderEntry> = latest
        .into_values()
        .map(|order| ReorderEntry {
            area_id: order.area_id,
            area_name: order.area_name.clone(),
            hospital_id: order.hospital_id,
            last_ordered: order.ordered_on,
            due_date: policy.due_date(order.ordered_on),
            status: policy.status(order.ordered_on, today),
        })
        .collect();
    entries.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.area_name.cmp(&b.area_name))
            .then_with(|| a.area_id.cmp(&b.area_id))
    });

    debug!(
        orders = orders.len(),
        areas = entries.len(),
        attention = entries.iter().filter(|e| e.status.needs_attention()).count(),
        "Built reorder dashboard"
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_order_date() {
        assert_eq!(parse_order_date("2023-04-01").unwrap(), date(2023, 4, 1));
        assert_eq!(parse_order_date(" 01/04/2023 ").unwrap(), date(2023, 4, 1));
        assert_eq!(
            parse_order_date("31/02/2023"),
            Err(ReorderError::InvalidDate("31/02/2023".into()))
        );
    }

    #[test]
    fn test_due_date_clamps_month_end() {
        let policy = ReorderPolicy {
            cycle_months: 12,
            due_soon_days: 60,
        };
        assert_eq!(policy.due_date(date(2024, 2, 29)), date(2025, 2, 28));
        assert_eq!(ReorderPolicy::default().due_date(date(2023, 4, 1)), date(2025, 4, 1));
    }

    #[test]
    fn test_status() {
        let policy = ReorderPolicy::default();
        let last = date(2023, 4, 1);

        assert_eq!(
            policy.status(last, date(2025, 4, 11)),
            ReorderStatus::Overdue { days_overdue: 10 }
        );
        assert_eq!(
            policy.status(last, date(2025, 4, 1)),
            ReorderStatus::DueSoon { days_remaining: 0 }
        );
        assert_eq!(
            policy.status(last, date(2025, 3, 2)),
            ReorderStatus::DueSoon { days_remaining: 30 }
        );
        assert_eq!(
            policy.status(last, date(2024, 4, 1)),
            ReorderStatus::Current { days_remaining: 365 }
        );
    }

    #[test]
    fn test_dashboard_uses_latest_order_and_sorts() {
        let orders = vec![
            AreaOrder::new(1, "ICU", 1, date(2021, 1, 10)),
            AreaOrder::new(2, "ED", 1, date(2022, 6, 1)),
            AreaOrder::new(1, "ICU", 1, date(2023, 1, 10)),
            AreaOrder::new(3, "Ward 5", 1, date(2022, 6, 1)),
        ];
        let dashboard = reorder_dashboard(&orders, &ReorderPolicy::default(), date(2024, 6, 1));

        let rows: Vec<(&str, NaiveDate)> = dashboard
            .iter()
            .map(|e| (e.area_name.as_str(), e.last_ordered))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("ED", date(2022, 6, 1)),
                ("Ward 5", date(2022, 6, 1)),
                ("ICU", date(2023, 1, 10)),
            ]
        );
        assert_eq!(dashboard[0].status, ReorderStatus::DueSoon { days_remaining: 0 });
        assert!(!dashboard[2].status.needs_attention());
    }

    #[test]
    fn test_entry_json_shape() {
        let orders = vec![AreaOrder::new(1, "ICU", 1, date(2022, 1, 1))];
        let dashboard = reorder_dashboard(&orders, &ReorderPolicy::default(), date(2024, 1, 11));
        let json = serde_json::to_value(&dashboard[0]).unwrap();
        assert_eq!(json["status"], "overdue");
        assert_eq!(json["daysOverdue"], 10);
        assert_eq!(json["dueDate"], "2024-01-01");
    }
}
