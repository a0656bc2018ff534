//! Adapter plugin identity and dependency configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity of the adapter plugin inside the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin id, also the suffix of its host registry key.
    #[serde(default = "default_id")]
    pub id: String,
    /// Human-readable plugin name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Settings module key in the host settings store.
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
    /// Namespace of the plugin's own classes.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Prefix of the host registry keys under which plugins publish themselves.
    #[serde(default = "default_registry_prefix")]
    pub registry_prefix: String,
    /// Other host plugins this one depends on, keyed by dependency name.
    ///
    /// `None` means the dependency table itself is missing.
    #[serde(default = "default_dependencies")]
    pub dependencies: Option<BTreeMap<String, DependencyConfig>>,
}

/// Host coordinates of a dependency plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    /// Component type, e.g. `"Services"`.
    pub component_type: String,
    /// Component name, e.g. `"UIComponent"`.
    pub component_name: String,
    /// Plugin slot id, e.g. `"uihk"`.
    pub slot_id: String,
    /// Plugin name inside the slot.
    pub plugin_name: String,
}

impl PluginConfig {
    /// Host registry key under which a plugin with the given id publishes itself.
    pub fn registry_key(&self, plugin_id: &str) -> String {
        format!("{}{}", self.registry_prefix, plugin_id)
    }

    /// Host registry key of this plugin.
    pub fn own_registry_key(&self) -> String {
        self.registry_key(&self.id)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            id: default_id(),
            name: default_name(),
            settings_key: default_settings_key(),
            namespace: default_namespace(),
            registry_prefix: default_registry_prefix(),
            dependencies: default_dependencies(),
        }
    }
}

fn default_id() -> String {
    "base3iliasadapter".to_string()
}

fn default_name() -> String {
    "Base3IliasAdapter".to_string()
}

fn default_settings_key() -> String {
    "base3iliasadapter".to_string()
}

fn default_namespace() -> String {
    "Base3IliasAdapter".to_string()
}

fn default_registry_prefix() -> String {
    "de.qualitus.plugin.".to_string()
}

fn default_dependencies() -> Option<BTreeMap<String, DependencyConfig>> {
    Some(BTreeMap::new())
}
