//! In-memory host collaborators.
//!
//! Used by tests and by the demo binary to simulate a host request without
//! a running host. Every collaborator records what the adapter did to it.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use base3_core::config::DependencyConfig;
use base3_core::service::Service;
use base3_core::traits::HostRegistry;

use crate::host::{
    Ctrl, Feedback, HostContext, Lang, PluginAdmin, SettingsProvider, SettingsStore, Tabs,
    Template,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Host registry backed by a sorted map.
#[derive(Default)]
pub struct InMemoryRegistry {
    entries: Mutex<BTreeMap<String, Service>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl HostRegistry for InMemoryRegistry {
    fn contains(&self, id: &str) -> bool {
        lock(&self.entries).contains_key(id)
    }

    fn get(&self, id: &str) -> Option<Service> {
        lock(&self.entries).get(id).cloned()
    }

    fn insert(&self, id: &str, value: Service) {
        lock(&self.entries).insert(id.to_string(), value);
    }

    fn keys(&self) -> Vec<String> {
        lock(&self.entries).keys().cloned().collect()
    }
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Template recording includes and content.
#[derive(Debug, Default)]
pub struct RecordingTemplate {
    scripts: Mutex<Vec<String>>,
    styles: Mutex<Vec<String>>,
    content: Mutex<Option<String>>,
}

impl RecordingTemplate {
    /// Script includes, in order.
    pub fn scripts(&self) -> Vec<String> {
        lock(&self.scripts).clone()
    }

    /// Stylesheet includes, in order.
    pub fn styles(&self) -> Vec<String> {
        lock(&self.styles).clone()
    }

    /// Last content set.
    pub fn content(&self) -> Option<String> {
        lock(&self.content).clone()
    }
}

impl Template for RecordingTemplate {
    fn add_javascript(&self, path: &str) {
        lock(&self.scripts).push(path.to_string());
    }

    fn add_css(&self, path: &str) {
        lock(&self.styles).push(path.to_string());
    }

    fn set_content(&self, html: &str) {
        *lock(&self.content) = Some(html.to_string());
    }
}

/// One tab added to [`RecordingTabs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    pub id: String,
    pub label: String,
    pub link: String,
}

/// Tab bar recording tabs and the active one.
#[derive(Debug, Default)]
pub struct RecordingTabs {
    tabs: Mutex<Vec<TabEntry>>,
    active: Mutex<Option<String>>,
}

impl RecordingTabs {
    /// Tabs in the order they were added.
    pub fn tabs(&self) -> Vec<TabEntry> {
        lock(&self.tabs).clone()
    }

    /// Ids of the tabs in the order they were added.
    pub fn ids(&self) -> Vec<String> {
        lock(&self.tabs).iter().map(|t| t.id.clone()).collect()
    }

    /// The active tab.
    pub fn active(&self) -> Option<String> {
        lock(&self.active).clone()
    }
}

impl Tabs for RecordingTabs {
    fn add_tab(&self, id: &str, label: &str, link: &str) {
        lock(&self.tabs).push(TabEntry {
            id: id.to_string(),
            label: label.to_string(),
            link: link.to_string(),
        });
    }

    fn activate_tab(&self, id: &str) {
        *lock(&self.active) = Some(id.to_string());
    }
}

/// Routing that builds `ilias.php` style links and records redirects.
#[derive(Debug)]
pub struct SimpleCtrl {
    base_url: String,
    redirects: Mutex<Vec<String>>,
}

impl SimpleCtrl {
    /// Creates a router producing links below `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Redirect targets, in order.
    pub fn redirects(&self) -> Vec<String> {
        lock(&self.redirects).clone()
    }
}

impl Default for SimpleCtrl {
    fn default() -> Self {
        Self::new("ilias.php")
    }
}

impl Ctrl for SimpleCtrl {
    fn link_target(&self, gui: &str, cmd: &str) -> String {
        format!("{}?cmdClass={}&cmd={}", self.base_url, gui.to_lowercase(), cmd)
    }

    fn redirect_to_url(&self, url: &str) {
        lock(&self.redirects).push(url.to_string());
    }
}

/// Language service over a fixed map. Unknown variables render as `-key-`.
#[derive(Debug, Default)]
pub struct MapLang {
    entries: BTreeMap<String, String>,
}

impl MapLang {
    /// Creates a language service from `(key, text)` pairs.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Lang for MapLang {
    fn txt(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("-{key}-"))
    }
}

/// Severity of a recorded feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackLevel {
    Failure,
    Info,
}

/// Feedback recording every message.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    messages: Mutex<Vec<(FeedbackLevel, String)>>,
}

impl RecordingFeedback {
    /// Messages, in order.
    pub fn messages(&self) -> Vec<(FeedbackLevel, String)> {
        lock(&self.messages).clone()
    }
}

impl Feedback for RecordingFeedback {
    fn failure(&self, message: &str) {
        lock(&self.messages).push((FeedbackLevel::Failure, message.to_string()));
    }

    fn info(&self, message: &str) {
        lock(&self.messages).push((FeedbackLevel::Info, message.to_string()));
    }
}

/// One settings module.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_string(), value.to_string());
    }
}

/// Settings storage keeping one store per module.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    modules: Mutex<BTreeMap<String, Arc<InMemorySettingsStore>>>,
}

impl InMemorySettings {
    /// Names of the modules opened so far.
    pub fn modules(&self) -> Vec<String> {
        lock(&self.modules).keys().cloned().collect()
    }
}

impl SettingsProvider for InMemorySettings {
    fn open(&self, module: &str) -> Arc<dyn SettingsStore> {
        lock(&self.modules)
            .entry(module.to_string())
            .or_default()
            .clone()
    }
}

/// Plugin administration over a fixed set of installed plugins.
#[derive(Default)]
pub struct StaticPluginAdmin {
    /// Installed plugin objects keyed by plugin name.
    installed: Mutex<BTreeMap<String, Service>>,
    deactivated: Mutex<Vec<String>>,
}

impl StaticPluginAdmin {
    /// Installs a plugin object under its plugin name.
    pub fn install(&self, plugin_name: &str, object: Service) {
        lock(&self.installed).insert(plugin_name.to_string(), object);
    }

    /// Plugin ids deactivated so far.
    pub fn deactivated(&self) -> Vec<String> {
        lock(&self.deactivated).clone()
    }
}

impl PluginAdmin for StaticPluginAdmin {
    fn plugin_object(&self, coordinates: &DependencyConfig) -> Option<Service> {
        lock(&self.installed).get(&coordinates.plugin_name).cloned()
    }

    fn deactivate(&self, plugin_id: &str) -> bool {
        let mut deactivated = lock(&self.deactivated);
        if deactivated.iter().any(|id| id == plugin_id) {
            return false;
        }
        deactivated.push(plugin_id.to_string());
        true
    }
}

impl std::fmt::Debug for StaticPluginAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticPluginAdmin")
            .field("installed", &lock(&self.installed).keys().collect::<Vec<_>>())
            .field("deactivated", &self.deactivated())
            .finish()
    }
}

/// A complete in-memory host. Keeps the concrete collaborators so callers
/// can inspect them after the adapter ran.
#[derive(Debug, Clone)]
pub struct InMemoryHost {
    pub registry: Arc<InMemoryRegistry>,
    pub template: Arc<RecordingTemplate>,
    pub tabs: Arc<RecordingTabs>,
    pub ctrl: Arc<SimpleCtrl>,
    pub lang: Arc<MapLang>,
    pub feedback: Arc<RecordingFeedback>,
    pub settings: Arc<InMemorySettings>,
    pub plugin_admin: Arc<StaticPluginAdmin>,
}

impl InMemoryHost {
    /// Creates a host with English labels for the built-in tabs.
    pub fn new() -> Self {
        Self::with_lang(MapLang::new([
            ("tab_general", "General"),
            ("tab_schema", "Schema"),
            ("tab_services", "Services"),
        ]))
    }

    /// Creates a host with the given language service.
    pub fn with_lang(lang: MapLang) -> Self {
        Self {
            registry: Arc::new(InMemoryRegistry::new()),
            template: Arc::default(),
            tabs: Arc::default(),
            ctrl: Arc::default(),
            lang: Arc::new(lang),
            feedback: Arc::default(),
            settings: Arc::default(),
            plugin_admin: Arc::default(),
        }
    }

    /// The collaborators as the adapter sees them.
    pub fn context(&self) -> HostContext {
        HostContext {
            registry: self.registry.clone(),
            template: self.template.clone(),
            tabs: self.tabs.clone(),
            ctrl: self.ctrl.clone(),
            lang: self.lang.clone(),
            feedback: self.feedback.clone(),
            settings: self.settings.clone(),
            plugin_admin: self.plugin_admin.clone(),
        }
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}
