//! Client configuration sourced from the environment.

use serde::Deserialize;
use thiserror::Error;

use crate::client::{TemplateClient, DEFAULT_BASE_URL};
use crate::error::ApiError;

/// Prefix for every variable read by `ClientConfig::from_env`.
pub const ENV_PREFIX: &str = "POSTMARK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid or missing environment variable: {0}")]
    Env(#[from] envy::Error),
}

/// Server token plus API host.
///
/// Read from `POSTMARK_SERVER_TOKEN` and the optional `POSTMARK_BASE_URL`.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub server_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(server_token: &str) -> Self {
        Self {
            server_token: server_token.to_string(),
            base_url: default_base_url(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Fails if the token is blank.
    pub fn client(&self) -> Result<TemplateClient, ApiError> {
        TemplateClient::new(&self.base_url, &self.server_token)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
