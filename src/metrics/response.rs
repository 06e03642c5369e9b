use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::query::Cursor;
use crate::error::{EvalsError, Result};

/// Shown in place of a label the point does not carry
pub const LABEL_NOT_AVAILABLE: &str = "N/A";

// ============= Wire Models =============

#[derive(Debug, Deserialize)]
pub struct RawMetricsResponse {
    #[serde(default)]
    pub data: Vec<RawMetricGroup>,
    pub total_points: Option<u64>,
    pub total_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RawMetricGroup {
    pub metric_name: String,
    #[serde(default, alias = "data_points")]
    pub points: Vec<RawMetricPoint>,
}

#[derive(Debug, Deserialize)]
pub struct RawMetricPoint {
    pub event_time: i64,
    pub numeric_value: Option<f64>,
    pub enum_value: Option<String>,
    pub bool_value: Option<bool>,
    pub labels: Option<BTreeMap<String, String>>,
}

// ============= Normalized Models =============

/// Value carried by a data point. `Absent` means the server populated none of
/// the value fields, which is not the same as a numeric zero or empty enum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Numeric(f64),
    Enum(String),
    Bool(bool),
    Absent,
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Numeric(v) => write!(f, "{}", v),
            MetricValue::Enum(v) => write!(f, "{}", v),
            MetricValue::Bool(v) => write!(f, "{}", v),
            MetricValue::Absent => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    /// Milliseconds since the Unix epoch
    pub event_time: i64,
    pub value: MetricValue,
    pub labels: BTreeMap<String, String>,
}

impl MetricPoint {
    /// Label value, or [`LABEL_NOT_AVAILABLE`] when the point has no such label
    pub fn label(&self, key: &str) -> &str {
        self.labels
            .get(key)
            .map(String::as_str)
            .unwrap_or(LABEL_NOT_AVAILABLE)
    }

    fn from_raw(metric_name: &str, raw: RawMetricPoint) -> Result<Self> {
        let value = match (raw.numeric_value, raw.enum_value, raw.bool_value) {
            (Some(v), None, None) => MetricValue::Numeric(v),
            (None, Some(v), None) => MetricValue::Enum(v),
            (None, None, Some(v)) => MetricValue::Bool(v),
            (None, None, None) => MetricValue::Absent,
            _ => {
                return Err(EvalsError::MalformedResponse(format!(
                    "point at {} in metric '{}' has more than one value field set",
                    raw.event_time, metric_name
                )));
            }
        };

        Ok(Self {
            event_time: raw.event_time,
            value,
            labels: raw.labels.unwrap_or_default(),
        })
    }
}

/// First points of a group together with how many were left out
#[derive(Debug, PartialEq)]
pub struct Preview<'a> {
    pub shown: &'a [MetricPoint],
    pub omitted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGroup {
    pub metric_name: String,
    pub points: Vec<MetricPoint>,
}

impl MetricGroup {
    pub fn preview(&self, max_points: usize) -> Preview<'_> {
        let shown = &self.points[..max_points.min(self.points.len())];
        Preview {
            shown,
            omitted: self.points.len() - shown.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsPage {
    pub data: Vec<MetricGroup>,
    pub total_points: usize,
    pub total_results: u64,
    /// Whether `total_results` came from the server rather than the group count
    #[serde(skip)]
    pub total_results_reported: bool,
}

impl MetricsPage {
    /// Cursor for the following page, if more results exist.
    ///
    /// A server-reported `total_results` decides; without one, a full page is
    /// taken to mean there may be more.
    pub fn next_cursor(&self, current: Cursor, limit: u32) -> Option<Cursor> {
        if limit == 0 {
            return None;
        }

        let next = current.advance(limit);
        let has_next = if self.total_results_reported {
            next.0 < self.total_results
        } else {
            self.total_points >= limit as usize
        };

        has_next.then_some(next)
    }
}

/// Convert a raw response into a [`MetricsPage`], validating each point.
/// Group and point order are kept as received.
pub fn normalize(raw: RawMetricsResponse) -> Result<MetricsPage> {
    let reported_points = raw.total_points;
    let group_count = raw.data.len() as u64;

    let data = raw
        .data
        .into_iter()
        .map(|group| {
            let points = group
                .points
                .into_iter()
                .map(|p| MetricPoint::from_raw(&group.metric_name, p))
                .collect::<Result<Vec<_>>>()?;
            Ok(MetricGroup {
                metric_name: group.metric_name,
                points,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let total_points = data.iter().map(|g| g.points.len()).sum();

    if let Some(reported) = reported_points
        && reported != total_points as u64
    {
        log::warn!(
            "Server reported {} points but the response contains {}",
            reported,
            total_points
        );
    }

    Ok(MetricsPage {
        data,
        total_points,
        total_results: raw.total_results.unwrap_or(group_count),
        total_results_reported: raw.total_results.is_some(),
    })
}

/// Parse and normalize a response body
pub fn normalize_value(body: serde_json::Value) -> Result<MetricsPage> {
    let raw: RawMetricsResponse = serde_json::from_value(body)?;
    normalize(raw)
}
