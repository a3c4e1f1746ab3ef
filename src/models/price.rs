use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: i64,
    pub close: f64,
}

/// Chart windows offered by the price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
            TimeRange::Year => "1y",
        }
    }

    /// Parses an optional query value, falling back to the default window.
    pub fn parse_or_default(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse(),
            None => Ok(TimeRange::default()),
        }
    }
}

impl FromStr for TimeRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        TimeRange::ALL
            .into_iter()
            .find(|range| range.as_str() == normalized)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Unsupported range '{}'; expected one of 24h, 7d, 30d, 90d, 1y",
                    s
                ))
            })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PriceChange {
    pub value: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    pub coin: String,
    pub range: TimeRange,
    pub data: Vec<PricePoint>,
    pub current_price: f64,
    pub change: PriceChange,
    pub updated_at: DateTime<Utc>,
}
