//! Container configuration.

use serde::{Deserialize, Serialize};

/// Service container settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Maximum number of alias hops followed before resolution fails.
    #[serde(default = "default_max_alias_depth")]
    pub max_alias_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_alias_depth: default_max_alias_depth(),
        }
    }
}

fn default_max_alias_depth() -> usize {
    8
}
