//! Trait definitions shared by the container, the hook manager, and the
//! host adapter.

pub mod capability;
pub mod host;

pub use capability::{AdminDisplay, Capability, HookListener, Plugin};
pub use host::HostRegistry;
