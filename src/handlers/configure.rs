use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::io::BufRead;
use std::path::Path;

use crate::config::Config;
use crate::handlers::common::prompt_line;

pub struct ConfigureHandler;

impl ConfigureHandler {
    /// Token from the command line, or read from `input` when not given so it
    /// stays out of shell history
    pub fn resolve_token(given: Option<String>, input: impl BufRead) -> Result<String> {
        let token = match given {
            Some(token) => token.trim().to_string(),
            None => prompt_line("Auth token: ", input).context("Failed to read auth token")?,
        };

        if token.is_empty() {
            bail!("Auth token must not be empty");
        }
        Ok(token)
    }

    pub fn save(base_url: &str, auth_token: &str, path: &Path) -> Result<String> {
        let config = Config {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
        };
        config
            .save_to(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok("Configuration saved successfully!".green().to_string())
    }
}
