use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Bucket size for aggregated analytics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Day,
    Week,
    Month,
}

impl Aggregation {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Day => "day",
            Aggregation::Week => "week",
            Aggregation::Month => "month",
        }
    }
}

fn default_limit() -> u32 {
    100
}

/// Window and paging for `GET /email/analytics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub aggregated_by: Aggregation,
}

impl AnalyticsQuery {
    /// Query-string pairs in the order and format the backend expects.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "startDate",
                self.start_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            (
                "endDate",
                self.end_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("aggregatedBy", self.aggregated_by.as_str().to_string()),
        ]
    }
}
