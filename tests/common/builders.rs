// Test data builders for constructing mock API responses

use serde_json::{Value, json};

/// Builder for a single metrics data point
pub struct PointBuilder {
    event_time: i64,
    value: Option<(&'static str, Value)>,
    labels: Vec<(String, String)>,
}

impl PointBuilder {
    pub fn at(event_time: i64) -> Self {
        Self {
            event_time,
            value: None,
            labels: Vec::new(),
        }
    }

    pub fn numeric(mut self, value: f64) -> Self {
        self.value = Some(("numeric_value", json!(value)));
        self
    }

    pub fn enum_value(mut self, value: &str) -> Self {
        self.value = Some(("enum_value", json!(value)));
        self
    }

    pub fn boolean(mut self, value: bool) -> Self {
        self.value = Some(("bool_value", json!(value)));
        self
    }

    pub fn label(mut self, key: &str, value: &str) -> Self {
        self.labels.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> Value {
        let mut point = json!({
            "event_time": self.event_time,
            "numeric_value": null,
            "enum_value": null,
            "bool_value": null,
            "labels": self
                .labels
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect::<serde_json::Map<String, Value>>()
        });
        if let Some((key, value)) = self.value {
            point[key] = value;
        }
        point
    }
}

/// Builder for grouped metrics responses
pub struct MetricsResponseBuilder {
    groups: Vec<Value>,
    total_results: Option<u64>,
}

impl MetricsResponseBuilder {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            total_results: None,
        }
    }

    pub fn with_group(mut self, metric_name: &str, points: Vec<PointBuilder>) -> Self {
        self.groups.push(json!({
            "metric_name": metric_name,
            "points": points.into_iter().map(PointBuilder::build).collect::<Vec<_>>()
        }));
        self
    }

    /// Group of `count` numeric points one second apart starting at `start_ms`
    pub fn with_numeric_group(self, metric_name: &str, start_ms: i64, count: usize) -> Self {
        let points = (0..count)
            .map(|i| {
                PointBuilder::at(start_ms + i as i64 * 1000)
                    .numeric(i as f64)
                    .label("environment", "prd")
            })
            .collect();
        self.with_group(metric_name, points)
    }

    pub fn with_total_results(mut self, total: u64) -> Self {
        self.total_results = Some(total);
        self
    }

    pub fn build(self) -> Value {
        let total_points: usize = self
            .groups
            .iter()
            .map(|g| g["points"].as_array().map_or(0, Vec::len))
            .sum();

        json!({
            "data": self.groups,
            "total_points": total_points,
            "total_results": self.total_results.unwrap_or(total_points as u64),
        })
    }
}

impl Default for MetricsResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
