use crate::error::{EvalsError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Calendar formats accepted by [`resolve_timestamp`], in priority order
pub const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Resolve a timestamp expression into Unix epoch seconds
/// Supports:
/// - Unix timestamp: "1704067200"
/// - Date only: "2024-01-01" (midnight)
/// - Date and time: "2024-01-01T10:00:00" or "2024-01-01 10:00:00"
///
/// Calendar strings carry no zone and are always read as UTC.
pub fn resolve_timestamp(input: &str) -> Result<i64> {
    let input = input.trim();

    if let Ok(timestamp) = input.parse::<i64>() {
        return Ok(timestamp);
    }

    for format in ACCEPTED_FORMATS {
        let parsed = if format.contains("%H") {
            NaiveDateTime::parse_from_str(input, format).ok()
        } else {
            NaiveDate::parse_from_str(input, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        };

        if let Some(naive) = parsed {
            return Ok(naive.and_utc().timestamp());
        }
    }

    Err(EvalsError::InvalidTimestamp {
        input: input.to_string(),
        accepted: ACCEPTED_FORMATS.to_vec(),
    })
}

/// Current wall-clock time in epoch seconds
pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

/// Epoch seconds `days` days before now
pub fn days_ago(days: i64) -> i64 {
    (Utc::now() - Duration::days(days)).timestamp()
}

/// Render an event time in epoch milliseconds for display
pub fn format_event_time(millis: i64) -> String {
    if let Some(dt) = DateTime::from_timestamp_millis(millis) {
        dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string()
    } else {
        format!("Invalid timestamp: {}", millis)
    }
}
