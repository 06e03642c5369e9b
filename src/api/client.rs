use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::*;
use crate::config::{Config, bearer_header};
use crate::error::{EvalsError, Result};
use crate::metrics::response::{RawMetricsResponse, normalize};
use crate::metrics::{MetricQuery, MetricsPage};
use crate::status::MonitoringStatus;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ORGANIZATIONS_PATH: &str = "/v2/organizations";
const SETUPS_PATH: &str = "/v2/auto-monitor-setups";
const MONITORING_STATUS_PATH: &str = "/v2/monitoring/status";
const METRICS_PATH: &str = "/v2/metrics";

pub struct EvalsClient {
    client: Client,
    auth_header: String,
    base_url: String,
}

impl EvalsClient {
    pub fn new(base_url: &str, auth_token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(EvalsError::Network)?;

        Ok(Self {
            client,
            auth_header: bearer_header(auth_token),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from resolved configuration, requiring a token
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url, config.require_token()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        query: Option<Vec<(&str, String)>>,
        body: Option<impl Serialize>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        log::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json");

        if let Some(ref params) = query {
            request = request.query(params);
        }

        if let Some(ref data) = body {
            request = request.json(data);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await;

        if status.as_u16() >= 400 {
            let message = match text {
                Ok(body) => match serde_json::from_str::<serde_json::Value>(&body) {
                    Ok(json) => json.to_string(),
                    Err(_) if !body.is_empty() => body,
                    Err(_) => "Unknown error".to_string(),
                },
                Err(_) => "Unknown error".to_string(),
            };

            return Err(EvalsError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        let body = text?;
        if body.trim().is_empty() {
            // Empty success bodies (e.g. DELETE) decode as JSON null
            Ok(serde_json::from_value(serde_json::Value::Null)?)
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }

    // ============= Organizations API =============

    pub async fn create_organization(&self, request: &OrganizationRequest) -> Result<Organization> {
        self.request(
            reqwest::Method::POST,
            ORGANIZATIONS_PATH,
            None,
            Some(request),
        )
        .await
    }

    // ============= Auto-Monitor Setups API =============

    pub async fn create_setup(&self, request: &SetupRequest) -> Result<AutoMonitorSetup> {
        self.request(reqwest::Method::POST, SETUPS_PATH, None, Some(request))
            .await
    }

    pub async fn list_setups(&self, filter: &SetupListFilter) -> Result<Vec<AutoMonitorSetup>> {
        let mut params = vec![];

        if let Some(t) = filter.entity_type.as_deref().filter(|t| !t.is_empty()) {
            params.push(("entity_type", t.to_string()));
        }
        if let Some(s) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            params.push(("status", s.to_string()));
        }

        let setups: Option<Vec<AutoMonitorSetup>> = self
            .request(
                reqwest::Method::GET,
                SETUPS_PATH,
                if params.is_empty() {
                    None
                } else {
                    Some(params)
                },
                None::<()>,
            )
            .await?;

        Ok(setups.unwrap_or_default())
    }

    pub async fn get_setup(&self, setup_id: &str) -> Result<AutoMonitorSetup> {
        let endpoint = format!("{}/{}", SETUPS_PATH, setup_id);

        self.request(reqwest::Method::GET, &endpoint, None, None::<()>)
            .await
    }

    pub async fn delete_setup(&self, setup_id: &str) -> Result<()> {
        let endpoint = format!("{}/{}", SETUPS_PATH, setup_id);

        let _: Option<serde_json::Value> = self
            .request(reqwest::Method::DELETE, &endpoint, None, None::<()>)
            .await?;
        Ok(())
    }

    // ============= Monitoring API =============

    pub async fn get_monitoring_status(&self) -> Result<MonitoringStatus> {
        self.request(
            reqwest::Method::GET,
            MONITORING_STATUS_PATH,
            None,
            None::<()>,
        )
        .await
    }

    // ============= Metrics API =============

    /// Run one page of a metrics query. Validation failures surface before
    /// any request is sent.
    pub async fn query_metrics(&self, query: &MetricQuery) -> Result<MetricsPage> {
        let body = query.build_payload()?;

        log::debug!(
            "Metrics query body: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let raw: RawMetricsResponse = self
            .request(reqwest::Method::POST, METRICS_PATH, None, Some(body))
            .await?;

        normalize(raw)
    }
}
