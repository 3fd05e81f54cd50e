//! # Board Configuration
//!
//! Layered configuration for the live board: compiled-in defaults, an
//! optional TOML file, then `CLINIC_FLOW__*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clinic_flow::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//!
//! let refresh = config.board.refresh_interval();
//! let policy = config.transition_policy()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::constants::timers;
use crate::state_machine::{PolicyResult, TransitionPolicy};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Root configuration structure mirroring clinic-flow.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Collaborator API connection settings
    pub api: ApiEndpointConfig,

    /// Live board timers
    pub board: BoardTimingConfig,

    /// Metrics dashboard settings
    pub metrics: MetricsConfig,

    /// Optional per-clinic transition table (status key -> allowed targets).
    /// Empty means the standard table.
    pub transitions: HashMap<String, Vec<String>>,
}

/// Connection settings for the clinic REST API
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiEndpointConfig {
    /// Base URL for the API (e.g., "<http://localhost:8000/api>")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum attempts for read requests
    pub max_retries: u32,
    /// Session token issued by the authentication collaborator
    pub auth_token: Option<String>,
}

impl Default for ApiEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 30000,
            max_retries: 3,
            auth_token: None,
        }
    }
}

impl ApiEndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Clock tick and refresh cadence of the live board
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardTimingConfig {
    pub clock_tick_seconds: u64,
    pub refresh_interval_seconds: u64,
}

impl Default for BoardTimingConfig {
    fn default() -> Self {
        Self {
            clock_tick_seconds: timers::CLOCK_TICK_SECONDS,
            refresh_interval_seconds: timers::BOARD_REFRESH_SECONDS,
        }
    }
}

impl BoardTimingConfig {
    pub fn clock_tick(&self) -> Duration {
        Duration::from_secs(self.clock_tick_seconds)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub refresh_interval_seconds: u64,
    /// Maximum rows rendered in the longest-waiters card
    pub longest_waiters_limit: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: timers::METRICS_REFRESH_SECONDS,
            longest_waiters_limit: 10,
        }
    }
}

impl MetricsConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

impl BoardConfig {
    /// Check values that would otherwise fail at runtime
    pub fn validate(&self) -> ConfigResult<()> {
        if reqwest::Url::parse(&self.api.base_url).is_err() {
            return Err(ConfigurationError::invalid_value(
                "api.base_url",
                &self.api.base_url,
                "must be an absolute URL",
            ));
        }
        if self.api.max_retries == 0 {
            return Err(ConfigurationError::invalid_value(
                "api.max_retries",
                "0",
                "at least one attempt is required",
            ));
        }

        let intervals = [
            ("board.clock_tick_seconds", self.board.clock_tick_seconds),
            (
                "board.refresh_interval_seconds",
                self.board.refresh_interval_seconds,
            ),
            (
                "metrics.refresh_interval_seconds",
                self.metrics.refresh_interval_seconds,
            ),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    "0",
                    "interval must be greater than zero",
                ));
            }
        }

        self.transition_policy()?;
        Ok(())
    }

    /// Transition policy for this clinic
    pub fn transition_policy(&self) -> PolicyResult<TransitionPolicy> {
        if self.transitions.is_empty() {
            Ok(TransitionPolicy::standard())
        } else {
            TransitionPolicy::from_table(&self.transitions)
        }
    }

    /// Configuration safe to log: secrets are masked
    pub fn sanitized(&self) -> serde_json::Value {
        let mut value = serde_json::json!(self);
        if let Some(token) = value.pointer_mut("/api/auth_token") {
            if !token.is_null() {
                *token = serde_json::Value::String("[MASKED]".to_string());
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::{CheckInStatus, WorkflowStatus};

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.board.clock_tick(), Duration::from_secs(15));
        assert_eq!(config.board.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.metrics.longest_waiters_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = BoardConfig::default();
        config.board.refresh_interval_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = BoardConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_transition_override() {
        let mut config = BoardConfig::default();
        config.transitions = HashMap::from([(
            "roomed".to_string(),
            vec!["ready".to_string()],
        )]);
        let policy = config.transition_policy().unwrap();
        assert!(!policy.is_allowed(
            &WorkflowStatus::Known(CheckInStatus::Roomed),
            CheckInStatus::Completed
        ));
    }

    #[test]
    fn test_sanitized_masks_token() {
        let mut config = BoardConfig::default();
        config.api.auth_token = Some("abc123".to_string());
        let sanitized = config.sanitized();
        assert_eq!(sanitized["api"]["auth_token"], "[MASKED]");
    }
}
