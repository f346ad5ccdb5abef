//! Connection settings for the review service.
//!
//! Loading and merging the shared/per-user settings files is the host
//! integration's job; this crate receives the merged values and rejects
//! unusable ones before any network call is made.

use serde::{Deserialize, Serialize};

/// Prefix of the placeholder token shipped in unconfigured installs.
const PLACEHOLDER_TOKEN_PREFIX: &str = "fio-x-xxxxxx";

/// Which host-project field names the remote project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectToken {
    /// The short project nickname (the historical default).
    #[default]
    Nickname,
    /// The full project name.
    Name,
}

/// Validated connection settings handed in by the host integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bearer token for the service API.
    pub token: String,
    pub account_id: String,
    pub team_id: String,
    #[serde(default)]
    pub project_token: ProjectToken,
}

/// Configuration problems detected before any network call.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration value for '{0}'")]
    Missing(&'static str),

    #[error("placeholder API token detected, update the connection settings")]
    PlaceholderToken,
}

impl ServiceConfig {
    /// Checks that every credential is present and not a placeholder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::Missing("token"));
        }
        if self.account_id.trim().is_empty() {
            return Err(ConfigError::Missing("account_id"));
        }
        if self.team_id.trim().is_empty() {
            return Err(ConfigError::Missing("team_id"));
        }
        if self.token.starts_with(PLACEHOLDER_TOKEN_PREFIX) {
            return Err(ConfigError::PlaceholderToken);
        }
        Ok(())
    }
}
