//! Prelude for convenient imports in sub-plugins.

pub use async_trait::async_trait;

pub use base3_container::{ClassMap, ClassTableBuilder, Container, InstanceCriteria, ids};
pub use base3_core::error::{AppError, ErrorKind};
pub use base3_core::events::LifecycleEvent;
pub use base3_core::result::AppResult;
pub use base3_core::traits::{AdminDisplay, Capability, HookListener, Plugin};

pub use crate::hooks::HookManager;
pub use crate::request::Request;

pub use crate::register_class;
