//! # base3-core
//!
//! Core crate for the Base3 host adapter. Contains the unified error system,
//! configuration schemas, lifecycle event names, the capability traits that
//! discovered sub-plugin classes implement, and the host registry contract.
//!
//! This crate has **no** internal dependencies on other Base3 crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod service;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use events::LifecycleEvent;
pub use result::AppResult;
pub use service::Service;
