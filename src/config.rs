use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EvalsError, Result};

pub const BASE_URL_ENV: &str = "EVALS_API_BASE_URL";
pub const AUTH_TOKEN_ENV: &str = "EVALS_API_AUTH_TOKEN";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const CONFIG_DIR: &str = ".evals-cli";
const CONFIG_FILE: &str = "config";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub auth_token: String,
}

impl Config {
    /// Resolve settings from the environment, falling back to the config file
    /// at its default location.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::from_env()),
        }
    }

    /// Resolve settings from the environment, falling back to `path`.
    ///
    /// The file is only consulted when no token is set in the environment.
    /// Its `base_url` never overrides an explicit `EVALS_API_BASE_URL`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::from_env();

        if config.auth_token.is_empty() && path.exists() {
            log::debug!("Reading configuration from {}", path.display());
            let base_url_from_env = non_empty_env(BASE_URL_ENV).is_some();

            for (key, value) in parse_config_file(&fs::read_to_string(path)?) {
                match key.as_str() {
                    "base_url" if !base_url_from_env => config.base_url = value,
                    "auth_token" => config.auth_token = value,
                    _ => {}
                }
            }
        }

        Ok(config)
    }

    fn from_env() -> Self {
        Self {
            base_url: non_empty_env(BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            auth_token: non_empty_env(AUTH_TOKEN_ENV).unwrap_or_default(),
        }
    }

    /// Fail with a hint when no token is configured
    pub fn require_token(&self) -> Result<&str> {
        if self.auth_token.is_empty() {
            Err(EvalsError::Config(
                "No auth token configured. Run `evals-cli configure` to set up authentication."
                    .to_string(),
            ))
        } else {
            Ok(&self.auth_token)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(
            path,
            format!("base_url={}\nauth_token={}\n", self.base_url, self.auth_token),
        )?;
        Ok(())
    }
}

/// Environment value, treating an empty string as unset
fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE))
}

fn parse_config_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Authorization header value for a token that may already carry the scheme
pub fn bearer_header(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {}", token)
    }
}
