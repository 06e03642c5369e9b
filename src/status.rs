use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// Lag at or below this is healthy
pub const OK_MAX_LAG_SECS: f64 = 180.0;
/// Lag at or below this (and above [`OK_MAX_LAG_SECS`]) is degraded
pub const DEGRADED_MAX_LAG_SECS: f64 = 600.0;

/// Pipeline health tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusTier {
    Ok,
    Degraded,
    Error,
    #[default]
    Unknown,
}

impl StatusTier {
    /// Tier named by a server status string. Anything unrecognised is `Unknown`.
    pub fn from_server(status: &str) -> Self {
        match status.to_ascii_uppercase().as_str() {
            "OK" => StatusTier::Ok,
            "DEGRADED" => StatusTier::Degraded,
            "ERROR" => StatusTier::Error,
            _ => StatusTier::Unknown,
        }
    }

    /// Local tiering of a lag value, used only to colour the lag before or
    /// alongside the server verdict. `None` means nothing has been evaluated.
    pub fn from_lag(lag_in_seconds: Option<f64>) -> Self {
        match lag_in_seconds {
            Some(lag) if lag <= OK_MAX_LAG_SECS => StatusTier::Ok,
            Some(lag) if lag <= DEGRADED_MAX_LAG_SECS => StatusTier::Degraded,
            _ => StatusTier::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Ok => "OK",
            StatusTier::Degraded => "DEGRADED",
            StatusTier::Error => "ERROR",
            StatusTier::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for StatusTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monitoring status as sent by the server. Fields are kept as received so
/// the JSON output matches the server payload; lags may be integral or
/// fractional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluated_up_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_span_received: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag_in_seconds: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag_in_spans: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl MonitoringStatus {
    /// Tier used for display. The server verdict wins over local lag math.
    pub fn tier(&self) -> StatusTier {
        self.status
            .as_deref()
            .map(StatusTier::from_server)
            .unwrap_or_default()
    }

    /// Status text to show: the server string as sent, or `UNKNOWN`
    pub fn status_label(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(StatusTier::Unknown.as_str())
    }

    pub fn lag_seconds(&self) -> Option<f64> {
        self.lag_in_seconds.as_ref().and_then(Number::as_f64)
    }

    /// Local tier for colouring the lag figure
    pub fn lag_tier(&self) -> StatusTier {
        StatusTier::from_lag(self.lag_seconds())
    }

    pub fn reasons(&self) -> &[String] {
        self.reasons.as_deref().unwrap_or_default()
    }
}
