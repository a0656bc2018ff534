//! Capability contracts implemented by discovered sub-plugin classes.
//!
//! A capability is identified by an interface name. Classes declare the
//! capabilities they provide when they are added to the class table, and
//! discovery hands them back as trait objects of the matching type.

use async_trait::async_trait;

use crate::result::AppResult;

/// Ties a capability trait object type to its stable interface name.
///
/// Implemented for `dyn Trait` types so discovery can be asked for
/// `ClassMap::get_instances_by_interface::<dyn HookListener>()`.
pub trait Capability: Send + Sync + 'static {
    /// Interface name used as the discovery key.
    const INTERFACE: &'static str;
}

/// Reacts to named lifecycle events.
///
/// Listeners receive every dispatched event and must no-op on names they do
/// not handle.
#[async_trait]
pub trait HookListener: Send + Sync + std::fmt::Debug {
    /// Identifier used in logs and dispatch reports.
    fn listener_id(&self) -> &str;

    /// Handles one event by name.
    async fn handle(&self, event: &str) -> AppResult<()>;
}

/// A sub-plugin initialized once per bootstrap.
#[async_trait]
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Identifier used in logs and the bootstrap report.
    fn plugin_id(&self) -> &str;

    /// Called exactly once during the plugin-init phase.
    async fn init(&self) -> AppResult<()>;
}

/// A tab of the configuration screen contributed by a sub-plugin.
pub trait AdminDisplay: Send + Sync + std::fmt::Debug {
    /// Stable routing key of the tab.
    fn name(&self) -> &str;

    /// Renderable markup for the tab body.
    fn output(&self) -> AppResult<String>;
}

impl Capability for dyn HookListener {
    const INTERFACE: &'static str = "Base3\\Hook\\IHookListener";
}

impl Capability for dyn Plugin {
    const INTERFACE: &'static str = "Base3\\Api\\IPlugin";
}

impl Capability for dyn AdminDisplay {
    const INTERFACE: &'static str = "Base3\\Api\\IAdminDisplay";
}
