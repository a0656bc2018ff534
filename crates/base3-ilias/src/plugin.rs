//! Adapter plugin lifecycle.
//!
//! The host instantiates the plugin, calls `init()` on load, and the
//! activation/uninstall hooks from its plugin administration. On init the
//! plugin publishes itself into the host registry under
//! `registry_prefix + id` and pulls in the plugins it depends on, so other
//! adapters can find both through the registry.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use base3_core::config::PluginConfig;
use base3_core::service::Service;

use crate::host::{HostContext, SettingsStore};

/// Host GUI class of the component settings screen.
pub const COMPONENT_SETTINGS_GUI: &str = "ilObjComponentSettingsGUI";

/// The adapter plugin as registered with the host.
pub struct AdapterPlugin {
    config: PluginConfig,
    host: HostContext,
    /// Opened on first use.
    settings: OnceLock<Arc<dyn SettingsStore>>,
}

impl AdapterPlugin {
    /// Creates the plugin. Nothing is published until [`init`](Self::init).
    pub fn new(config: PluginConfig, host: HostContext) -> Arc<Self> {
        Arc::new(Self {
            config,
            host,
            settings: OnceLock::new(),
        })
    }

    /// Plugin id.
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Plugin name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The plugin's settings module, opened lazily.
    pub fn settings(&self) -> Arc<dyn SettingsStore> {
        self.settings
            .get_or_init(|| self.host.settings.open(&self.config.settings_key))
            .clone()
    }

    /// Called by the host when the plugin is loaded.
    pub fn init(self: &Arc<Self>) {
        self.register_autoloader();
        self.settings();
        self.publish_self();
    }

    /// Class loading is static in this build; kept as a lifecycle step.
    fn register_autoloader(&self) {
        debug!(namespace = %self.config.namespace, "Autoloader registration skipped");
    }

    /// Publishes the plugin under its registry key unless the key is taken,
    /// then loads dependencies.
    fn publish_self(self: &Arc<Self>) {
        let key = self.config.own_registry_key();
        let published = self
            .host
            .registry
            .insert_if_absent(&key, Arc::clone(self) as Service);
        info!(key = %key, published, "Adapter plugin published");
        self.load_dependencies();
    }

    /// Returns whether the dependency `name` is present in the host registry.
    ///
    /// A missing dependency queues a failure message and redirects to the
    /// component settings screen when `redirect` is set, or queues an info
    /// message otherwise.
    pub fn check_dependency(&self, name: &str, redirect: bool) -> bool {
        if self.host.registry.contains(&self.config.registry_key(name)) {
            return true;
        }

        warn!(dependency = %name, redirect, "Missing plugin dependency");
        if redirect {
            self.host
                .feedback
                .failure(&format!("Abort because of missing dependency: {name}"));
            let target = self.host.ctrl.link_target(COMPONENT_SETTINGS_GUI, "view");
            self.host.ctrl.redirect_to_url(&target);
        } else {
            self.host
                .feedback
                .info(&format!("Missing dependency: {name}"));
        }
        false
    }

    /// Publishes every configured dependency the host registry does not
    /// hold yet. Returns how many were published.
    ///
    /// Dependencies the plugin administration cannot provide are skipped.
    pub fn load_dependencies(&self) -> usize {
        let Some(dependencies) = &self.config.dependencies else {
            warn!(plugin = %self.config.id, "Dependency table missing");
            self.host.feedback.failure("Dependency table missing");
            return 0;
        };

        let mut loaded = 0;
        for (name, coordinates) in dependencies {
            let key = self.config.registry_key(name);
            if self.host.registry.contains(&key) {
                continue;
            }
            let Some(object) = self.host.plugin_admin.plugin_object(coordinates) else {
                debug!(dependency = %key, "Could not load dependency");
                continue;
            };
            if self.host.registry.insert_if_absent(&key, object) {
                loaded += 1;
            }
        }

        debug!(plugin = %self.config.id, loaded, "Dependencies loaded");
        loaded
    }

    /// Called by the host after activation.
    pub fn after_activation(&self) {}

    /// Called by the host before uninstalling. Deactivates the plugin.
    pub fn before_uninstall(&self) -> bool {
        info!(plugin = %self.config.id, "Deactivating before uninstall");
        self.host.plugin_admin.deactivate(&self.config.id)
    }
}

impl std::fmt::Debug for AdapterPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterPlugin")
            .field("id", &self.config.id)
            .field("name", &self.config.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use base3_core::config::DependencyConfig;
    use base3_core::traits::HostRegistry;

    use super::*;
    use crate::memory::{FeedbackLevel, InMemoryHost};

    fn dependency(plugin_name: &str) -> DependencyConfig {
        DependencyConfig {
            component_type: "Services".to_string(),
            component_name: "UIComponent".to_string(),
            slot_id: "uihk".to_string(),
            plugin_name: plugin_name.to_string(),
        }
    }

    fn config_with(deps: Option<BTreeMap<String, DependencyConfig>>) -> PluginConfig {
        PluginConfig {
            dependencies: deps,
            ..PluginConfig::default()
        }
    }

    #[test]
    fn test_init_publishes_self_once() {
        let host = InMemoryHost::new();
        let plugin = AdapterPlugin::new(PluginConfig::default(), host.context());

        plugin.init();
        plugin.init();

        let key = "de.qualitus.plugin.base3iliasadapter";
        let published = host.registry.get(key).unwrap().downcast::<AdapterPlugin>().unwrap();
        assert!(Arc::ptr_eq(&published, &plugin));
        assert_eq!(host.settings.modules(), vec!["base3iliasadapter"]);
    }

    #[test]
    fn test_existing_registry_entry_wins() {
        let host = InMemoryHost::new();
        host.registry
            .insert("de.qualitus.plugin.base3iliasadapter", Arc::new("other".to_string()));

        AdapterPlugin::new(PluginConfig::default(), host.context()).init();

        let kept = host
            .registry
            .get("de.qualitus.plugin.base3iliasadapter")
            .unwrap()
            .downcast::<String>()
            .unwrap();
        assert_eq!(*kept, "other");
    }

    #[test]
    fn test_load_dependencies() {
        let host = InMemoryHost::new();
        host.plugin_admin.install("Reports", Arc::new("reports plugin".to_string()));
        let deps = BTreeMap::from([
            ("reports".to_string(), dependency("Reports")),
            ("absent".to_string(), dependency("Absent")),
        ]);
        let plugin = AdapterPlugin::new(config_with(Some(deps)), host.context());

        assert_eq!(plugin.load_dependencies(), 1);
        assert!(host.registry.contains("de.qualitus.plugin.reports"));
        assert!(!host.registry.contains("de.qualitus.plugin.absent"));
        assert_eq!(plugin.load_dependencies(), 0);
    }

    #[test]
    fn test_missing_dependency_table() {
        let host = InMemoryHost::new();
        let plugin = AdapterPlugin::new(config_with(None), host.context());

        assert_eq!(plugin.load_dependencies(), 0);
        assert_eq!(
            host.feedback.messages(),
            vec![(FeedbackLevel::Failure, "Dependency table missing".to_string())]
        );
    }

    #[test]
    fn test_check_dependency_redirects() {
        let host = InMemoryHost::new();
        let plugin = AdapterPlugin::new(PluginConfig::default(), host.context());

        assert!(!plugin.check_dependency("reports", true));
        assert_eq!(
            host.feedback.messages(),
            vec![(
                FeedbackLevel::Failure,
                "Abort because of missing dependency: reports".to_string()
            )]
        );
        assert_eq!(
            host.ctrl.redirects(),
            vec!["ilias.php?cmdClass=ilobjcomponentsettingsgui&cmd=view"]
        );
    }

    #[test]
    fn test_check_dependency_without_redirect() {
        let host = InMemoryHost::new();
        host.registry
            .insert("de.qualitus.plugin.reports", Arc::new(()));
        let plugin = AdapterPlugin::new(PluginConfig::default(), host.context());

        assert!(plugin.check_dependency("reports", false));
        assert!(!plugin.check_dependency("absent", false));
        assert_eq!(
            host.feedback.messages(),
            vec![(FeedbackLevel::Info, "Missing dependency: absent".to_string())]
        );
        assert!(host.ctrl.redirects().is_empty());
    }

    #[test]
    fn test_before_uninstall_deactivates() {
        let host = InMemoryHost::new();
        let plugin = AdapterPlugin::new(PluginConfig::default(), host.context());

        plugin.after_activation();
        assert!(plugin.before_uninstall());
        assert_eq!(host.plugin_admin.deactivated(), vec!["base3iliasadapter"]);
    }
}
