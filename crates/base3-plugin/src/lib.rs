//! # base3-plugin
//!
//! Plugin runtime of the Base3 adapter. Provides:
//!
//! - Hook manager with registration-ordered dispatch and a configurable
//!   listener failure policy
//! - The one-shot bootstrap sequencer and its process-wide guard
//! - The per-request `Request` value
//! - The standard service selector that routes to admin displays

pub mod bootstrap;
pub mod hooks;
pub mod macros;
pub mod prelude;
pub mod request;
pub mod selector;

pub use bootstrap::{BootstrapGuard, BootstrapOutcome, BootstrapReport, Bootstrapper};
pub use hooks::{DispatchReport, HookManager};
pub use request::Request;
pub use selector::StandardServiceSelector;
