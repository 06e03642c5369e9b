use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::EvalsClient;
use crate::cli::QuickstartArgs;
use crate::handlers::common::ResponseFormatter;
use crate::handlers::metrics::{DEFAULT_WINDOW_DAYS, MetricsHandler};
use crate::handlers::monitoring::MonitoringHandler;
use crate::handlers::organizations::OrganizationsHandler;
use crate::handlers::setups::SetupsHandler;
use crate::metrics::MetricQuery;
use crate::utils::{days_ago, now_ts};

/// Page size for the metrics step
const QUICKSTART_LIMIT: u32 = 10;

pub struct QuickstartHandler;

impl ResponseFormatter for QuickstartHandler {}

impl QuickstartHandler {
    /// Run the onboarding flow. `admin` creates the organization; every later
    /// step authenticates with the key issued for its first environment.
    pub async fn run(admin: &EvalsClient, args: &QuickstartArgs) -> Result<String> {
        let mut out = Vec::new();

        out.push(Self::step(1, "Create organization"));
        let (org, rendered) =
            OrganizationsHandler::create(admin, &args.org_name, &args.environments, false).await?;
        out.push(rendered);

        let api_key = org
            .first_api_key()
            .context("Organization response did not include an API key")?;
        let client = EvalsClient::new(admin.base_url(), api_key)?;

        out.push(Self::step(2, "Create monitor setup"));
        let (_, rendered) = SetupsHandler::create(
            &client,
            &args.entity_type,
            &args.entity_value,
            &[],
            &args.evaluator_types,
        )
        .await?;
        out.push(rendered);

        out.push(Self::step(3, "Check monitoring status"));
        out.push(MonitoringHandler::status(&client, false).await?);

        out.push(Self::step(4, "Get metrics"));
        let query = MetricQuery::new(args.project_id.clone(), days_ago(DEFAULT_WINDOW_DAYS))
            .to_ts(now_ts())
            .limit(QUICKSTART_LIMIT);
        let page = client.query_metrics(&query).await?;
        let next = page.next_cursor(query.cursor, QUICKSTART_LIMIT);
        out.push(MetricsHandler.render(&page, QUICKSTART_LIMIT as usize, next));

        Ok(out.join("\n"))
    }

    fn step(n: u8, title: &str) -> String {
        format!("\n{}", format!("Step {} - {}", n, title).cyan().bold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_flow_uses_issued_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/organizations"))
            .and(header("Authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "org-1",
                "name": "Demo Organization",
                "environments": [{"name": "prd", "api_key": "issued-key"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v2/auto-monitor-setups"))
            .and(header("Authorization", "Bearer issued-key"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "s-1", "entity_type": "workflow", "entity_value": "jokes", "status": "pending"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/monitoring/status"))
            .and(header("Authorization", "Bearer issued-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ERROR", "organization_id": "org-1", "reasons": ["no evaluation data"]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v2/metrics"))
            .and(header("Authorization", "Bearer issued-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [], "total_points": 0, "total_results": 0
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let admin = EvalsClient::new(&mock_server.uri(), "admin-token").unwrap();
        let args = QuickstartArgs {
            org_name: "Demo Organization".to_string(),
            environments: vec!["prd".to_string()],
            entity_type: "workflow".to_string(),
            entity_value: "jokes".to_string(),
            evaluator_types: vec!["char-count".to_string()],
            project_id: "demo-project".to_string(),
        };

        let out = QuickstartHandler::run(&admin, &args).await.unwrap();
        assert!(out.contains("Step 4 - Get metrics"));
        assert!(out.contains("No metrics found."));
    }

    #[tokio::test]
    async fn test_flow_stops_without_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/organizations"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "org-1"})))
            .mount(&mock_server)
            .await;

        let admin = EvalsClient::new(&mock_server.uri(), "admin-token").unwrap();
        let args = QuickstartArgs {
            org_name: "x".to_string(),
            environments: vec![],
            entity_type: "workflow".to_string(),
            entity_value: "jokes".to_string(),
            evaluator_types: vec!["char-count".to_string()],
            project_id: "demo-project".to_string(),
        };

        let err = QuickstartHandler::run(&admin, &args).await.unwrap_err();
        assert!(err.to_string().contains("API key"));
    }
}
