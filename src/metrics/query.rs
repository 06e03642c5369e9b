use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::{EvalsError, Result};
use crate::utils::now_ts;

/// Page size used when the caller does not set one
pub const DEFAULT_LIMIT: u32 = 50;

/// A single filter predicate, forwarded to the server verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl FromStr for FilterCondition {
    type Err = EvalsError;

    /// Parse a filter from its JSON object form,
    /// e.g. `{"field":"environment","operator":"eq","value":"prd"}`
    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| {
            EvalsError::InvalidInput(format!(
                "filter must be a JSON object with field, operator and value: {}",
                e
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    EventTime,
    MetricName,
    Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for LogicalOperator {
    type Err = EvalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(LogicalOperator::And),
            "or" => Ok(LogicalOperator::Or),
            other => Err(EvalsError::InvalidInput(format!(
                "unknown logical operator '{}' (expected and|or)",
                other
            ))),
        }
    }
}

impl FromStr for SortField {
    type Err = EvalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "event_time" | "time" => Ok(SortField::EventTime),
            "metric_name" | "name" => Ok(SortField::MetricName),
            "value" => Ok(SortField::Value),
            other => Err(EvalsError::InvalidInput(format!(
                "unknown sort field '{}' (expected event_time|metric_name|value)",
                other
            ))),
        }
    }
}

impl FromStr for SortOrder {
    type Err = EvalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(EvalsError::InvalidInput(format!(
                "unknown sort order '{}' (expected asc|desc)",
                other
            ))),
        }
    }
}

/// Integer offset into the result set. Zero is the first page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub u64);

impl Cursor {
    pub const START: Cursor = Cursor(0);

    /// Cursor for the page following one fetched with `limit`
    pub fn advance(self, limit: u32) -> Cursor {
        Cursor(self.0.saturating_add(u64::from(limit)))
    }
}

/// Parameters of a metrics query. Unset fields take server-friendly defaults
/// when the payload is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricQuery {
    pub project_id: Option<String>,
    pub from_ts: Option<i64>,
    pub to_ts: Option<i64>,
    pub environments: BTreeSet<String>,
    pub metric_name: Option<String>,
    pub metric_source: Option<String>,
    pub filters: Vec<FilterCondition>,
    pub logical_operator: LogicalOperator,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub limit: Option<u32>,
    pub cursor: Cursor,
}

impl MetricQuery {
    pub fn new(project_id: impl Into<String>, from_ts: i64) -> Self {
        Self {
            project_id: Some(project_id.into()),
            from_ts: Some(from_ts),
            ..Default::default()
        }
    }

    pub fn to_ts(mut self, to_ts: i64) -> Self {
        self.to_ts = Some(to_ts);
        self
    }

    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.environments.insert(env.into());
        self
    }

    pub fn metric_name(mut self, name: impl Into<String>) -> Self {
        self.metric_name = Some(name.into());
        self
    }

    pub fn metric_source(mut self, source: impl Into<String>) -> Self {
        self.metric_source = Some(source.into());
        self
    }

    pub fn filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn logical_operator(mut self, op: LogicalOperator) -> Self {
        self.logical_operator = op;
        self
    }

    pub fn sort(mut self, by: SortField, order: SortOrder) -> Self {
        self.sort_by = by;
        self.sort_order = order;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Build the JSON request body.
    ///
    /// An omitted `to_ts` resolves to the wall clock at the moment of this
    /// call, so two builds of the same query may differ in their upper bound.
    /// Optional filters are left out of the body entirely when empty.
    pub fn build_payload(&self) -> Result<Value> {
        let project_id = self
            .project_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| EvalsError::InvalidQuery("project_id is required".to_string()))?;

        let from_ts = self
            .from_ts
            .ok_or_else(|| EvalsError::InvalidQuery("from timestamp is required".to_string()))?;

        let to_ts = self.to_ts.unwrap_or_else(now_ts);
        if from_ts > to_ts {
            return Err(EvalsError::InvalidQuery(format!(
                "from timestamp ({}) is after to timestamp ({})",
                from_ts, to_ts
            )));
        }

        let limit = self.effective_limit();
        if limit == 0 {
            return Err(EvalsError::InvalidQuery(
                "limit must be a positive integer".to_string(),
            ));
        }

        let mut body = Map::new();
        body.insert("project_id".to_string(), json!(project_id));
        body.insert("from_timestamp_sec".to_string(), json!(from_ts));
        body.insert("to_timestamp_sec".to_string(), json!(to_ts));

        if !self.environments.is_empty() {
            body.insert("environments".to_string(), json!(self.environments));
        }
        if let Some(name) = self.metric_name.as_deref().filter(|n| !n.is_empty()) {
            body.insert("metric_name".to_string(), json!(name));
        }
        if let Some(source) = self.metric_source.as_deref().filter(|s| !s.is_empty()) {
            body.insert("metric_source".to_string(), json!(source));
        }
        if !self.filters.is_empty() {
            body.insert("filters".to_string(), serde_json::to_value(&self.filters)?);
        }
        if self.filters.len() >= 2 {
            body.insert(
                "logical_operator".to_string(),
                serde_json::to_value(self.logical_operator)?,
            );
        }

        body.insert("sort_by".to_string(), serde_json::to_value(self.sort_by)?);
        body.insert("sort_order".to_string(), serde_json::to_value(self.sort_order)?);
        body.insert("limit".to_string(), json!(limit));
        body.insert("cursor".to_string(), json!(self.cursor));

        Ok(Value::Object(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn base() -> MetricQuery {
        MetricQuery::new("proj-1", 1_700_000_000).to_ts(1_700_604_800)
    }

    fn env_filter(value: &str) -> FilterCondition {
        FilterCondition {
            field: "environment".to_string(),
            operator: "eq".to_string(),
            value: json!(value),
        }
    }

    #[test]
    fn test_defaults() {
        let payload = base().build_payload().unwrap();

        assert_eq!(payload["project_id"], "proj-1");
        assert_eq!(payload["from_timestamp_sec"], 1_700_000_000);
        assert_eq!(payload["to_timestamp_sec"], 1_700_604_800);
        assert_eq!(payload["sort_by"], "event_time");
        assert_eq!(payload["sort_order"], "DESC");
        assert_eq!(payload["limit"], 50);
        assert_eq!(payload["cursor"], 0);
    }

    #[test]
    fn test_empty_optionals_are_omitted() {
        let mut query = base();
        query.metric_name = Some(String::new());
        let payload = query.build_payload().unwrap();
        let obj = payload.as_object().unwrap();

        for key in ["environments", "metric_name", "metric_source", "filters", "logical_operator"] {
            assert!(!obj.contains_key(key), "{} should be omitted", key);
        }
    }

    #[test]
    fn test_optionals_included_when_set() {
        let payload = base()
            .environment("prd")
            .environment("dev")
            .metric_name("char-count")
            .metric_source("evaluator")
            .filter(env_filter("prd"))
            .build_payload()
            .unwrap();

        assert_eq!(payload["environments"], json!(["dev", "prd"]));
        assert_eq!(payload["metric_name"], "char-count");
        assert_eq!(payload["metric_source"], "evaluator");
        assert_eq!(payload["filters"][0]["field"], "environment");
        // A single filter has nothing to combine
        assert!(payload.get("logical_operator").is_none());
    }

    #[test]
    fn test_logical_operator_with_multiple_filters() {
        let payload = base()
            .filter(env_filter("prd"))
            .filter(env_filter("stg"))
            .logical_operator(LogicalOperator::Or)
            .build_payload()
            .unwrap();

        assert_eq!(payload["logical_operator"], "OR");
        assert_eq!(payload["filters"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_project_id() {
        let mut query = base();
        query.project_id = None;
        assert_matches!(query.build_payload(), Err(EvalsError::InvalidQuery(_)));

        query.project_id = Some("   ".to_string());
        assert_matches!(query.build_payload(), Err(EvalsError::InvalidQuery(_)));
    }

    #[test]
    fn test_missing_from() {
        let mut query = base();
        query.from_ts = None;
        assert_matches!(query.build_payload(), Err(EvalsError::InvalidQuery(msg)) if msg.contains("from"));
    }

    #[test]
    fn test_from_after_to() {
        let query = MetricQuery::new("p", 200).to_ts(100);
        assert_matches!(query.build_payload(), Err(EvalsError::InvalidQuery(_)));
    }

    #[test]
    fn test_zero_limit() {
        assert_matches!(base().limit(0).build_payload(), Err(EvalsError::InvalidQuery(_)));
    }

    #[test]
    fn test_to_defaults_to_now() {
        let before = now_ts();
        let payload = MetricQuery::new("p", 1).build_payload().unwrap();
        let to = payload["to_timestamp_sec"].as_i64().unwrap();
        assert!(to >= before && to <= now_ts());
    }

    #[test]
    fn test_cursor_only_difference_between_pages() {
        let first = base().limit(10).cursor(Cursor::START);
        let second = first.clone().cursor(Cursor::START.advance(10));

        let mut a = first.build_payload().unwrap();
        let mut b = second.build_payload().unwrap();
        assert_eq!(a["cursor"], 0);
        assert_eq!(b["cursor"], 10);

        a.as_object_mut().unwrap().remove("cursor");
        b.as_object_mut().unwrap().remove("cursor");
        assert_eq!(a, b);
    }

    #[test]
    fn test_sort_serialization() {
        let payload = base()
            .sort(SortField::MetricName, SortOrder::Asc)
            .build_payload()
            .unwrap();
        assert_eq!(payload["sort_by"], "metric_name");
        assert_eq!(payload["sort_order"], "ASC");
    }

    #[test]
    fn test_filter_from_str() {
        let filter: FilterCondition =
            r#"{"field":"score","operator":"gt","value":0.5}"#.parse().unwrap();
        assert_eq!(filter.field, "score");
        assert_eq!(filter.value, json!(0.5));

        assert_matches!(
            "environment=prd".parse::<FilterCondition>(),
            Err(EvalsError::InvalidInput(_))
        );
    }

    #[test]
    fn test_enum_from_str() {
        assert_eq!("OR".parse::<LogicalOperator>().unwrap(), LogicalOperator::Or);
        assert_eq!("event_time".parse::<SortField>().unwrap(), SortField::EventTime);
        assert_eq!("Asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_matches!("sideways".parse::<SortOrder>(), Err(EvalsError::InvalidInput(_)));
    }

    #[test]
    fn test_cursor_advance() {
        assert_eq!(Cursor::START.advance(10), Cursor(10));
        assert_eq!(Cursor(20).advance(5), Cursor(25));
        assert_eq!(Cursor(u64::MAX).advance(5), Cursor(u64::MAX));
    }
}
