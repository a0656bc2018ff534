//! Hook system: listener registry, manager, and dispatch reports.

pub mod manager;
pub mod registry;
pub mod report;

pub use manager::HookManager;
pub use registry::ListenerRegistry;
pub use report::{DispatchReport, ListenerFailureRecord};
