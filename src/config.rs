//! Consumer configuration.
//!
//! [`ConsumerConfig`] is read from the `consumer` section of
//! `config/rowguard.toml` (optional), then from environment variables with
//! `__` as separator, e.g. `ROWGUARD__CONSUMER__WARN_UNRESOLVED=false`.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "config/rowguard.toml";
const ENV_PREFIX: &str = "ROWGUARD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsumerConfig {
    /// Log unresolved aliases at `warn` instead of `debug`
    #[serde(default = "default_warn_unresolved")]
    pub warn_unresolved: bool,
    /// Log swallowed JSON decode failures at `warn` instead of `debug`
    #[serde(default)]
    pub warn_decode_failures: bool,
}

fn default_warn_unresolved() -> bool {
    true
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            warn_unresolved: default_warn_unresolved(),
            warn_decode_failures: false,
        }
    }
}

impl ConsumerConfig {
    /// Load the `consumer` section from `config/rowguard.toml`, falling back to env vars.
    ///
    /// A missing `consumer` section yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither source can be read, or if the section
    /// is present but malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Same as [`ConsumerConfig::load`], reading the given file instead.
    ///
    /// # Errors
    ///
    /// See [`ConsumerConfig::load`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // Unreadable file: retry with the environment only
                if path.exists() {
                    log::warn!(
                        "failed to load config file {}, falling back to env: {}",
                        path.display(),
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        match settings.get::<ConsumerConfig>("consumer") {
            Ok(cfg) => Ok(cfg),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Consumer configuration could not be loaded: {}",
                e
            ))),
        }
    }
}
