//! Installation path layout.
//!
//! Data and client directories come from the `clients` section of the host
//! ini file. Everything else is a fixed layout below `components/Base3/`.

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::Serialize;
use tracing::{debug, warn};

use base3_core::config::PathsConfig;

/// Container id under which the bootstrap registers the resolved layout.
pub const INSTALLATION_PATHS: &str = "Base3Ilias\\InstallationPaths";

/// Resolved directories of a host installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationPaths {
    /// Host installation root.
    pub ilias_root: PathBuf,
    /// Data directory, when the ini file names one.
    pub data_dir: Option<PathBuf>,
    /// Default client's directory inside the data directory.
    pub client_dir: Option<PathBuf>,
    pub components: PathBuf,
    pub base3: PathBuf,
    pub framework: PathBuf,
    pub src: PathBuf,
    pub test: PathBuf,
    pub plugin: PathBuf,
    /// Scratch directory. Must be created by the installer.
    pub tmp: PathBuf,
    pub local: PathBuf,
}

impl InstallationPaths {
    /// Resolves the layout, reading the ini file below the configured root.
    ///
    /// A missing, unreadable or malformed ini file leaves the data and client
    /// directories unset.
    pub fn resolve(config: &PathsConfig) -> Self {
        let ini_path = config.ilias_root.join(&config.ini_file);
        if !ini_path.is_file() {
            warn!(path = %ini_path.display(), "Host ini file not found, data directories unset");
            return Self::layout(&config.ilias_root, None, None);
        }

        match std::fs::read_to_string(&ini_path) {
            Ok(content) => Self::from_ini_str(&config.ilias_root, &content),
            Err(e) => {
                warn!(path = %ini_path.display(), error = %e, "Host ini file unreadable, data directories unset");
                Self::layout(&config.ilias_root, None, None)
            }
        }
    }

    /// Resolves the layout from ini file content.
    ///
    /// Backslashes are taken literally. Content that does not parse leaves
    /// the data and client directories unset.
    pub fn from_ini_str(ilias_root: &Path, content: &str) -> Self {
        let literal = content.replace('\\', "\\\\");
        let ini = match Config::builder()
            .add_source(File::from_str(&literal, FileFormat::Ini))
            .build()
        {
            Ok(ini) => ini,
            Err(e) => {
                warn!(error = %e, "Host ini file malformed, data directories unset");
                return Self::layout(ilias_root, None, None);
            }
        };

        let value = |key: &str| {
            ini.get_string(key)
                .ok()
                .map(|v| v.trim().trim_matches('"').to_string())
                .filter(|v| !v.is_empty())
        };

        // Both keys or neither.
        let (data_dir, client_dir) = match (value("clients.datadir"), value("clients.default")) {
            (Some(data), Some(client)) => {
                let data_dir = PathBuf::from(data);
                let client_dir = data_dir.join(client);
                (Some(data_dir), Some(client_dir))
            }
            _ => (None, None),
        };

        let paths = Self::layout(ilias_root, data_dir, client_dir);
        debug!(
            data_dir = ?paths.data_dir,
            client_dir = ?paths.client_dir,
            "Installation paths resolved"
        );
        paths
    }

    fn layout(ilias_root: &Path, data_dir: Option<PathBuf>, client_dir: Option<PathBuf>) -> Self {
        let components = ilias_root.join("components");
        let base3 = components.join("Base3");
        let framework = base3.join("Base3Framework");
        let tmp = base3.join("temp");
        Self {
            ilias_root: ilias_root.to_path_buf(),
            data_dir,
            client_dir,
            src: framework.join("src"),
            test: framework.join("test"),
            plugin: base3.clone(),
            local: tmp.clone(),
            tmp,
            framework,
            base3,
            components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI: &str = r#"; <?php exit; ?>
[server]
absolute_path = "/srv/ilias"

[clients]
path = "data"
inifile = "client.ini.php"
datadir = "/var/iliasdata"
default = "main"
"#;

    #[test]
    fn test_clients_section() {
        let paths = InstallationPaths::from_ini_str(Path::new("/srv/ilias"), INI);

        assert_eq!(paths.data_dir, Some(PathBuf::from("/var/iliasdata")));
        assert_eq!(paths.client_dir, Some(PathBuf::from("/var/iliasdata/main")));
    }

    #[test]
    fn test_fixed_layout() {
        let paths = InstallationPaths::from_ini_str(Path::new("/srv/ilias"), INI);

        assert_eq!(paths.base3, PathBuf::from("/srv/ilias/components/Base3"));
        assert_eq!(
            paths.src,
            PathBuf::from("/srv/ilias/components/Base3/Base3Framework/src")
        );
        assert_eq!(paths.plugin, paths.base3);
        assert_eq!(paths.tmp, PathBuf::from("/srv/ilias/components/Base3/temp"));
        assert_eq!(paths.local, paths.tmp);
    }

    #[test]
    fn test_incomplete_clients_section() {
        let ini = "[clients]\ndatadir = \"/var/iliasdata\"\n";
        let paths = InstallationPaths::from_ini_str(Path::new("/srv/ilias"), ini);

        assert_eq!(paths.data_dir, None);
        assert_eq!(paths.client_dir, None);
    }

    #[test]
    fn test_missing_ini_file() {
        let config = PathsConfig {
            ilias_root: PathBuf::from("/nonexistent/base3-ilias-root"),
            ini_file: "ilias.ini.php".to_string(),
        };
        let paths = InstallationPaths::resolve(&config);

        assert_eq!(paths.data_dir, None);
        assert_eq!(
            paths.components,
            PathBuf::from("/nonexistent/base3-ilias-root/components")
        );
    }

    #[test]
    fn test_malformed_ini_file() {
        let root = std::env::temp_dir().join(format!("base3-malformed-ini-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("ilias.ini.php"), "[clients\ndatadir = x\n").unwrap();
        let config = PathsConfig {
            ilias_root: root.clone(),
            ini_file: "ilias.ini.php".to_string(),
        };

        let paths = InstallationPaths::resolve(&config);
        std::fs::remove_dir_all(&root).unwrap();

        assert_eq!(paths.data_dir, None);
        assert_eq!(paths.client_dir, None);
        assert_eq!(paths.components, root.join("components"));
    }

    #[test]
    fn test_backslashes_kept_literally() {
        let ini = "[clients]\ndatadir = \"C:\\data\"\ndefault = \"c1\"\n";
        let paths = InstallationPaths::from_ini_str(Path::new("/srv/ilias"), ini);

        assert_eq!(paths.data_dir, Some(PathBuf::from("C:\\data")));
        assert_eq!(paths.client_dir, Some(PathBuf::from("C:\\data").join("c1")));
    }
}
