//! Settings loader.
//!
//! Layers an optional settings file under `CIRRUS_*` environment variables.
//! Nested keys use `__`, so `CIRRUS_CONNECTION__RETRIES=4` sets
//! `connection.retries`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cirrus_domain::ConsoleSettings;
use config::{Config, Environment, File};
use tracing::{debug, warn};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CIRRUS";

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "cirrus";

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The explicit settings file does not exist.
    #[error("settings file not found: {0}")]
    NotFound(PathBuf),

    /// A source could not be read or the values do not fit the schema.
    #[error("invalid settings: {0}")]
    Invalid(#[from] config::ConfigError),
}

/// Builds [`ConsoleSettings`] from a file and the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    path: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
}

impl SettingsLoader {
    /// Loader reading `cirrus.{toml,yaml,json,ini}` if present.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads this file instead; it must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Uses `vars` in place of the process environment.
    #[must_use]
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Loads and validates the settings, logging any warnings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the explicit file is missing or a value
    /// has the wrong type.
    pub fn load(&self) -> Result<ConsoleSettings, SettingsError> {
        let file = match &self.path {
            Some(path) => {
                if !path.exists() {
                    return Err(SettingsError::NotFound(path.clone()));
                }
                File::from(path.as_path()).required(true)
            }
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };
        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(self.env.clone());

        let settings: ConsoleSettings = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        for warning in settings.warnings() {
            warn!("{warning}");
        }
        let (host, port) = settings.base_host_port();
        debug!(
            host = %host,
            port,
            retries = settings.connection.retries,
            validate_certs = settings.connection.ssl.validation,
            "loaded settings"
        );
        Ok(settings)
    }
}

/// Loads settings from `path` (or the default file) and the environment.
///
/// # Errors
///
/// See [`SettingsLoader::load`].
pub fn load_settings(path: Option<&Path>) -> Result<ConsoleSettings, SettingsError> {
    let loader = SettingsLoader::new();
    match path {
        Some(path) => loader.with_file(path).load(),
        None => loader.load(),
    }
}
