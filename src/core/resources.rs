//! Client configuration
//!
//! [`ClientSettings`] is read once at startup (see
//! [`settings_persistence`](crate::core::settings_persistence)) and handed to
//! the authority client and the submission flow.

use crate::core::error::{CoreError, CoreResult};
use crate::game::components::GameMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Environment variable overriding [`ClientSettings::authority_url`]
pub const ENV_AUTHORITY_URL: &str = "XFCHESS_AUTHORITY_URL";

/// Environment variable overriding [`ClientSettings::request_timeout_secs`]
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "XFCHESS_REQUEST_TIMEOUT_SECS";

/// Settings for talking to the authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL every authority route is relative to
    pub authority_url: String,

    /// Per-request timeout; 0 disables it
    pub request_timeout_secs: u64,

    /// Mode a new session starts in
    pub default_mode: GameMode,

    /// Log an inferred history entry for AI replies
    pub record_ai_moves: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            authority_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 10,
            default_mode: GameMode::PlayerVsPlayer,
            record_ai_moves: false,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> CoreResult<()> {
        Url::parse(&self.authority_url).map_err(|e| CoreError::InvalidConfig {
            key: "authority_url".to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Apply overrides from a variable lookup
    ///
    /// Unset variables leave the field alone; set but unusable ones are an
    /// error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_AUTHORITY_URL) {
            self.authority_url = url;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs =
                raw.trim().parse().map_err(|_| CoreError::InvalidConfig {
                    key: ENV_REQUEST_TIMEOUT_SECS.to_string(),
                    message: format!("expected whole seconds, got {raw:?}"),
                })?;
        }
        self.validate()
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> CoreResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }
}
