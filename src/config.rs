//! Object map configuration.
//!
//! Settings live under an `[object_map]` table in `config/config.toml`
//! (optional) and can be overridden by environment variables prefixed with
//! `OBJECTMAP`, using `__` as the nesting separator:
//!
//! ```toml
//! [object_map]
//! metadata_api = "legacy"
//! max_depth = 16
//! ```
//!
//! ```text
//! OBJECTMAP__OBJECT_MAP__METADATA_API=modern
//! ```

use crate::relation::introspect::MetadataApi;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "OBJECTMAP";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ObjectMapConfig {
    /// Descriptor metadata API of the host model layer
    #[serde(default)]
    pub metadata_api: MetadataApi,
    /// Maximum serializer nesting depth, unlimited when absent
    #[serde(default)]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct Settings {
    #[serde(default)]
    object_map: ObjectMapConfig,
}

/// `OBJECTMAP__OBJECT_MAP__MAX_DEPTH=8` style overrides; numbers are parsed
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

impl ObjectMapConfig {
    /// Load the configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load the configuration from `path` (extension optional) overlaid by env vars
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(environment());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new(path).exists() {
                    log::warn!("Failed to load config file {path}, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(environment())
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        let settings: Settings = settings.try_deserialize().map_err(|e| {
            ConfigError::Message(format!(
                "Object map configuration could not be loaded from file or environment: {e}"
            ))
        })?;

        Ok(settings.object_map)
    }
}
