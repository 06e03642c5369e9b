use anyhow::{Result, anyhow, bail};
use colored::Colorize;

use crate::api::EvalsClient;
use crate::api::models::{AutoMonitorSetup, SetupListFilter, SetupRequest};
use crate::error::EvalsError;
use crate::handlers::common::{ResponseFormatter, or_na};

pub struct SetupsHandler;

impl ResponseFormatter for SetupsHandler {}

/// Turn a 404 into a readable message, pass anything else through
fn not_found_as_message(err: EvalsError, setup_id: &str) -> anyhow::Error {
    if err.status_code() == Some(404) {
        anyhow!("Setup '{}' not found.", setup_id)
    } else {
        err.into()
    }
}

impl SetupsHandler {
    pub async fn create(
        client: &EvalsClient,
        entity_type: &str,
        entity_value: &str,
        evaluator_ids: &[String],
        evaluator_types: &[String],
    ) -> Result<(AutoMonitorSetup, String)> {
        let handler = SetupsHandler;

        if evaluator_ids.is_empty() && evaluator_types.is_empty() {
            bail!(EvalsError::InvalidInput(
                "Must specify at least one --evaluator-id or --evaluator-type".to_string()
            ));
        }

        let request = SetupRequest::new(entity_type, entity_value, evaluator_ids, evaluator_types);
        let setup = client.create_setup(&request).await?;

        let output = format!(
            "{}\n{}",
            handler.format_banner(
                "Success",
                &"Auto-monitor-setup created successfully!".green().to_string()
            ),
            handler.format_json(&setup)?
        );

        Ok((setup, output))
    }

    pub async fn list(
        client: &EvalsClient,
        entity_type: Option<String>,
        status: Option<String>,
        as_json: bool,
    ) -> Result<String> {
        let handler = SetupsHandler;

        let setups = client
            .list_setups(&SetupListFilter {
                entity_type,
                status,
            })
            .await?;

        if as_json {
            return Ok(handler.format_json(&setups)?);
        }

        if setups.is_empty() {
            return Ok("No setups found.".yellow().to_string());
        }

        let rows: Vec<Vec<String>> = setups
            .iter()
            .map(|s| {
                vec![
                    or_na(s.id.as_deref()),
                    or_na(s.entity_type.as_deref()),
                    or_na(s.entity_value.as_deref()),
                    or_na(s.status.as_deref()),
                    s.evaluators.len().to_string(),
                ]
            })
            .collect();

        let mut out = handler.format_table(
            "Auto-Monitor Setups",
            &["ID", "Entity Type", "Entity Value", "Status", "Evaluators"],
            &rows,
        );
        out.push_str(
            &format!("\nTotal: {} setup(s)", setups.len())
                .dimmed()
                .to_string(),
        );
        Ok(out)
    }

    pub async fn get(client: &EvalsClient, setup_id: &str) -> Result<String> {
        let handler = SetupsHandler;

        let setup = client
            .get_setup(setup_id)
            .await
            .map_err(|e| not_found_as_message(e, setup_id))?;

        Ok(format!(
            "{}\n{}",
            handler.format_banner(
                "Auto-Monitor Setup",
                &format!("Setup: {}", setup_id).cyan().to_string()
            ),
            handler.format_json(&setup)?
        ))
    }

    pub async fn delete(client: &EvalsClient, setup_id: &str) -> Result<String> {
        client
            .delete_setup(setup_id)
            .await
            .map_err(|e| not_found_as_message(e, setup_id))?;

        Ok(format!("Setup '{}' deleted successfully.", setup_id)
            .green()
            .to_string())
    }
}
