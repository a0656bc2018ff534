//! Adapter configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate. Each
//! sub-module represents a logical configuration section, and every field has
//! a default so an empty source yields a working configuration.

pub mod container;
pub mod hooks;
pub mod logging;
pub mod paths;
pub mod plugin;

use serde::{Deserialize, Serialize};

pub use self::container::ContainerConfig;
pub use self::hooks::{HooksConfig, ListenerFailurePolicy};
pub use self::logging::LoggingConfig;
pub use self::paths::PathsConfig;
pub use self::plugin::{DependencyConfig, PluginConfig};

use crate::error::AppError;

/// Root adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Service container settings.
    #[serde(default)]
    pub container: ContainerConfig,
    /// Hook dispatch settings.
    #[serde(default)]
    pub hooks: HooksConfig,
    /// Adapter plugin identity.
    #[serde(default)]
    pub plugin: PluginConfig,
    /// Host installation paths.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Debug mode of the embedded framework.
    #[serde(default = "default_true")]
    pub debug: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            container: ContainerConfig::default(),
            hooks: HooksConfig::default(),
            plugin: PluginConfig::default(),
            paths: PathsConfig::default(),
            logging: LoggingConfig::default(),
            debug: true,
        }
    }
}

impl AdapterConfig {
    /// Load configuration.
    ///
    /// Merges the built-in defaults with `config/default`, an
    /// environment-specific overlay `config/{env}`, and environment variables
    /// prefixed with `BASE3__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BASE3")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parses configuration from a TOML document, falling back to defaults
    /// for anything it leaves out.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(AppError::from)
    }
}

fn default_true() -> bool {
    true
}
