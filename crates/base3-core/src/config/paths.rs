//! Installation path configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the host installation lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory of the host installation.
    #[serde(default = "default_ilias_root")]
    pub ilias_root: PathBuf,
    /// Name of the host ini file below the root.
    #[serde(default = "default_ini_file")]
    pub ini_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            ilias_root: default_ilias_root(),
            ini_file: default_ini_file(),
        }
    }
}

fn default_ilias_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_ini_file() -> String {
    "ilias.ini.php".to_string()
}
