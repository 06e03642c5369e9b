use anyhow::{Result, anyhow};
use colored::Colorize;

use crate::api::EvalsClient;
use crate::api::models::{Organization, OrganizationRequest};
use crate::handlers::common::{ResponseFormatter, or_na};

pub struct OrganizationsHandler;

impl ResponseFormatter for OrganizationsHandler {}

impl OrganizationsHandler {
    pub async fn create(
        client: &EvalsClient,
        name: &str,
        environments: &[String],
        as_json: bool,
    ) -> Result<(Organization, String)> {
        let handler = OrganizationsHandler;

        let request = OrganizationRequest {
            org_name: name.to_string(),
            environments: environments.to_vec(),
        };

        let org = match client.create_organization(&request).await {
            Ok(org) => org,
            Err(e) if e.status_code() == Some(403) => {
                return Err(anyhow!(
                    "Not permitted to create organizations with this token ({})",
                    e
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let output = if as_json {
            handler.format_json(&org)?
        } else {
            handler.render(&org)
        };

        Ok((org, output))
    }

    fn render(&self, org: &Organization) -> String {
        let mut out = self.format_banner(
            "Organization",
            &"Organization created successfully!".green().to_string(),
        );
        out.push('\n');
        out.push_str(&self.format_fields(&[
            ("ID", or_na(org.id.as_deref())),
            ("Name", or_na(org.name.as_deref())),
        ]));
        out.push('\n');

        let rows: Vec<Vec<String>> = org
            .environments
            .iter()
            .map(|env| vec![or_na(env.name.as_deref()), or_na(env.api_key.as_deref())])
            .collect();
        if !rows.is_empty() {
            out.push('\n');
            out.push_str(&self.format_table("Environments", &["Environment", "API Key"], &rows));
        }
        out
    }
}
