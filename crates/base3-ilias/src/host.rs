//! Host collaborator contracts.
//!
//! The adapter treats the host's rendering, routing, language, settings,
//! and plugin administration as opaque services. Each is a small trait so
//! tests and the demo binary can substitute in-memory versions.

use std::sync::{Arc, Weak};

use base3_core::config::DependencyConfig;
use base3_core::service::Service;
use base3_core::traits::HostRegistry;

/// Container id under which the bootstrap binds the host registry.
pub const HOST_CONTAINER: &str = "ILIAS\\DI\\Container";

/// Handle to the host registry as seen from inside the container.
///
/// Held weakly: publishing the handle back into the host registry must not
/// make the registry own itself.
#[derive(Clone)]
pub struct HostHandle(Weak<dyn HostRegistry>);

impl HostHandle {
    pub fn new(registry: &Arc<dyn HostRegistry>) -> Self {
        Self(Arc::downgrade(registry))
    }

    /// The host registry, while the host is alive.
    pub fn registry(&self) -> Option<Arc<dyn HostRegistry>> {
        self.0.upgrade()
    }
}

impl std::fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostHandle")
            .field("alive", &(self.0.strong_count() > 0))
            .finish()
    }
}

/// Page template of the current host screen.
pub trait Template: Send + Sync {
    /// Adds a script include.
    fn add_javascript(&self, path: &str);
    /// Adds a stylesheet include.
    fn add_css(&self, path: &str);
    /// Sets the main content markup.
    fn set_content(&self, html: &str);
}

/// Tab bar of the current host screen.
pub trait Tabs: Send + Sync {
    /// Appends a tab.
    fn add_tab(&self, id: &str, label: &str, link: &str);
    /// Marks a tab as active.
    fn activate_tab(&self, id: &str);
}

/// Host request routing and link generation.
pub trait Ctrl: Send + Sync {
    /// Link to `cmd` on the GUI class `gui`.
    fn link_target(&self, gui: &str, cmd: &str) -> String;
    /// Redirects the client.
    fn redirect_to_url(&self, url: &str);
}

/// Language service.
pub trait Lang: Send + Sync {
    /// Translates a language variable.
    fn txt(&self, key: &str) -> String;
}

/// One-shot user messages shown on the next rendered screen.
pub trait Feedback: Send + Sync {
    /// Queues a failure message.
    fn failure(&self, message: &str);
    /// Queues an info message.
    fn info(&self, message: &str);
}

/// A settings module of the host settings storage.
pub trait SettingsStore: Send + Sync {
    /// Reads a value.
    fn get(&self, key: &str) -> Option<String>;
    /// Writes a value.
    fn set(&self, key: &str, value: &str);
}

/// Opens settings modules.
pub trait SettingsProvider: Send + Sync {
    /// Opens the settings module `module`.
    fn open(&self, module: &str) -> Arc<dyn SettingsStore>;
}

/// Host plugin administration.
pub trait PluginAdmin: Send + Sync {
    /// Returns the plugin object at the given coordinates, if installed.
    fn plugin_object(&self, coordinates: &DependencyConfig) -> Option<Service>;
    /// Deactivates a plugin. Returns whether it was active.
    fn deactivate(&self, plugin_id: &str) -> bool;
}

/// Everything the adapter needs from the host for one request.
#[derive(Clone)]
pub struct HostContext {
    /// The host's process-wide service registry.
    pub registry: Arc<dyn HostRegistry>,
    /// Page template.
    pub template: Arc<dyn Template>,
    /// Tab bar.
    pub tabs: Arc<dyn Tabs>,
    /// Routing.
    pub ctrl: Arc<dyn Ctrl>,
    /// Language.
    pub lang: Arc<dyn Lang>,
    /// User messages.
    pub feedback: Arc<dyn Feedback>,
    /// Settings storage.
    pub settings: Arc<dyn SettingsProvider>,
    /// Plugin administration.
    pub plugin_admin: Arc<dyn PluginAdmin>,
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("registry_entries", &self.registry.keys().len())
            .finish()
    }
}
