//! Configuration Loader
//!
//! Layers compiled-in defaults, an optional TOML file and environment
//! variables through the `config` crate, then validates the result.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::{debug, info};

use super::error::{ConfigResult, ConfigurationError};
use super::BoardConfig;

/// Environment variable prefix; nested keys use `__`, e.g.
/// `CLINIC_FLOW__API__BASE_URL`.
pub const ENV_PREFIX: &str = "CLINIC_FLOW";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "CLINIC_FLOW_CONFIG";

const DEFAULT_LOCATIONS: [&str; 2] = ["clinic-flow.toml", "config/clinic-flow.toml"];

/// Builder-style loader for [`BoardConfig`]
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_overrides: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from this file instead of searching the default locations.
    /// The file must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Use this map in place of the process environment.
    /// Keys follow the `CLINIC_FLOW__SECTION__FIELD` convention.
    pub fn with_env_overrides(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    pub fn load(self) -> ConfigResult<BoardConfig> {
        let mut builder = Config::builder();

        if let Some(path) = self.resolve_file()? {
            debug!(path = %path.display(), "Loading board configuration file");
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        } else {
            debug!("No board configuration file found, using defaults");
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(self.env_overrides);
        builder = builder.add_source(environment);

        let config: BoardConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            "Board configuration loaded: {}",
            serde_json::to_string(&config.sanitized())
                .unwrap_or_else(|_| "[serialization error]".to_string())
        );
        info!(
            base_url = %config.api.base_url,
            clock_tick_seconds = config.board.clock_tick_seconds,
            refresh_interval_seconds = config.board.refresh_interval_seconds,
            custom_transitions = !config.transitions.is_empty(),
            "Board configuration loaded successfully"
        );

        Ok(config)
    }

    fn resolve_file(&self) -> ConfigResult<Option<PathBuf>> {
        let explicit = self
            .file
            .clone()
            .or_else(|| std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigurationError::ConfigFileNotFound { path });
            }
            return Ok(Some(path));
        }

        Ok(DEFAULT_LOCATIONS
            .iter()
            .map(Path::new)
            .find(|path| path.is_file())
            .map(Path::to_path_buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_then_env_layering() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://emr.example.com/api"
timeout_ms = 5000

[board]
refresh_interval_seconds = 20
"#
        )
        .unwrap();

        let env = HashMap::from([(
            "CLINIC_FLOW__BOARD__CLOCK_TICK_SECONDS".to_string(),
            "5".to_string(),
        )]);

        let config = ConfigLoader::new()
            .with_file(file.path())
            .with_env_overrides(env)
            .load()
            .unwrap();

        assert_eq!(config.api.base_url, "https://emr.example.com/api");
        assert_eq!(config.api.timeout_ms, 5000);
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.board.refresh_interval_seconds, 20);
        assert_eq!(config.board.clock_tick_seconds, 5);
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = ConfigLoader::new()
            .with_file("/definitely/not/here/clinic-flow.toml")
            .with_env_overrides(HashMap::new())
            .load();
        assert!(matches!(
            result,
            Err(ConfigurationError::ConfigFileNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_transition_table_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[transitions]
completed = ["roomed"]
"#
        )
        .unwrap();

        let result = ConfigLoader::new()
            .with_file(file.path())
            .with_env_overrides(HashMap::new())
            .load();
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidTransitions(_))
        ));
    }
}
