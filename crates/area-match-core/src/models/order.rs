//! Curtain order history.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::reorder::parse_order_date;

/// A past curtain order delivered to an area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AreaOrder {
    pub area_id: i64,
    pub area_name: String,
    pub hospital_id: i64,
    /// Accepts "2023-04-01" or "01/04/2023"; always written as ISO
    #[serde(deserialize_with = "deserialize_order_date")]
    pub ordered_on: NaiveDate,
}

impl AreaOrder {
    pub fn new(
        area_id: i64,
        area_name: impl Into<String>,
        hospital_id: i64,
        ordered_on: NaiveDate,
    ) -> Self {
        Self {
            area_id,
            area_name: area_name.into(),
            hospital_id,
            ordered_on,
        }
    }
}

fn deserialize_order_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_order_date(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_dates_in_either_format() {
        let json = r#"[
            {"areaId": 1, "areaName": "ICU", "hospitalId": 1, "orderedOn": "2023-04-01"},
            {"areaId": 2, "areaName": "ED", "hospitalId": 1, "orderedOn": "01/04/2023"}
        ]"#;
        let orders: Vec<AreaOrder> = serde_json::from_str(json).unwrap();
        assert_eq!(orders[0].ordered_on, orders[1].ordered_on);

        let written = serde_json::to_value(&orders[1]).unwrap();
        assert_eq!(written["orderedOn"], "2023-04-01");
    }

    #[test]
    fn test_bad_order_date() {
        let json = r#"{"areaId": 1, "areaName": "ICU", "hospitalId": 1, "orderedOn": "April"}"#;
        assert!(serde_json::from_str::<AreaOrder>(json).is_err());
    }
}
