use anyhow::Result;
use colored::Colorize;

use crate::api::EvalsClient;
use crate::handlers::common::{NOT_AVAILABLE, ResponseFormatter, color_tier, or_na};
use crate::status::MonitoringStatus;

pub struct MonitoringHandler;

impl ResponseFormatter for MonitoringHandler {}

impl MonitoringHandler {
    pub async fn status(client: &EvalsClient, as_json: bool) -> Result<String> {
        let handler = MonitoringHandler;
        let status = client.get_monitoring_status().await?;

        if as_json {
            return Ok(handler.format_json(&status)?);
        }

        Ok(handler.render(&status))
    }

    pub fn render(&self, status: &MonitoringStatus) -> String {
        let banner = self.format_banner(
            "Monitoring Status",
            &color_tier(status.status_label(), &status.tier())
                .bold()
                .to_string(),
        );

        let mut fields = vec![("Organization", or_na(status.organization_id.as_deref()))];
        if let Some(env) = status.environment.as_deref().filter(|e| !e.is_empty()) {
            fields.push(("Environment", env.to_string()));
        }
        if let Some(project) = status.project.as_deref().filter(|p| !p.is_empty()) {
            fields.push(("Project", project.to_string()));
        }

        fields.push(("", String::new()));
        fields.push(("Evaluated Up To", Self::or_dim_na(status.evaluated_up_to.as_deref())));
        fields.push((
            "Latest Span Received",
            Self::or_dim_na(status.latest_span_received.as_deref()),
        ));

        fields.push(("", String::new()));
        let lag_seconds = status
            .lag_in_seconds
            .as_ref()
            .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string);
        fields.push((
            "Lag (seconds)",
            color_tier(&lag_seconds, &status.lag_tier()).to_string(),
        ));
        fields.push((
            "Lag (spans)",
            or_na(status.lag_in_spans.as_ref().map(ToString::to_string).as_deref()),
        ));

        if !status.reasons().is_empty() {
            fields.push(("", String::new()));
            fields.push(("Reasons", status.reasons().join(", ")));
        }

        format!("{}\n{}", banner, self.format_fields(&fields))
    }

    fn or_dim_na(value: Option<&str>) -> String {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => v.to_string(),
            None => NOT_AVAILABLE.dimmed().to_string(),
        }
    }
}
