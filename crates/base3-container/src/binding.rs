//! Binding kinds stored in the container.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::debug;

use base3_core::error::AppError;
use base3_core::result::AppResult;
use base3_core::service::Service;

use crate::container::Container;

/// A zero-argument producer. It receives the container so it can resolve
/// its own dependencies.
pub type FactoryFn = Arc<dyn Fn(&Container) -> AppResult<Service> + Send + Sync>;

/// The kind of a binding, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// A pre-built value returned as-is.
    Instance,
    /// A producer invoked on every resolve.
    Factory,
    /// A producer invoked on first resolve only; the result is cached.
    SharedFactory,
    /// A redirect to another identifier.
    Alias,
}

/// A single entry of the container.
pub enum Binding {
    /// A pre-built value.
    Instance(Service),
    /// An uncached producer.
    Factory(FactoryFn),
    /// A cached producer.
    Shared(SharedFactory),
    /// A redirect to another identifier.
    Alias(String),
}

impl Binding {
    /// Creates an instance binding.
    pub fn instance(value: Service) -> Self {
        Self::Instance(value)
    }

    /// Creates an uncached factory binding.
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&Container) -> AppResult<Service> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(factory))
    }

    /// Creates a shared factory binding.
    pub fn shared<F>(factory: F) -> Self
    where
        F: Fn(&Container) -> AppResult<Service> + Send + Sync + 'static,
    {
        Self::Shared(SharedFactory::new(Arc::new(factory)))
    }

    /// Creates an alias binding.
    pub fn alias(target: impl Into<String>) -> Self {
        Self::Alias(target.into())
    }

    /// Returns the kind of this binding.
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Instance(_) => BindingKind::Instance,
            Self::Factory(_) => BindingKind::Factory,
            Self::Shared(_) => BindingKind::SharedFactory,
            Self::Alias(_) => BindingKind::Alias,
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::Shared(shared) => f
                .debug_struct("Shared")
                .field("constructed", &shared.is_constructed())
                .finish(),
            Self::Alias(target) => f.debug_tuple("Alias").field(target).finish(),
        }
    }
}

/// Construction state of a shared factory.
enum SharedSlot {
    /// Not constructed yet, or the last attempt failed.
    Empty,
    /// The factory is running.
    Building,
    /// The cached value.
    Ready(Service),
}

/// A producer plus the cache of its first successful result.
pub struct SharedFactory {
    /// The producer.
    factory: FactoryFn,
    /// Construction state.
    slot: Mutex<SharedSlot>,
}

impl SharedFactory {
    /// Wraps a producer with an empty cache.
    pub fn new(factory: FactoryFn) -> Self {
        Self {
            factory,
            slot: Mutex::new(SharedSlot::Empty),
        }
    }

    /// Returns whether the cached value exists.
    pub fn is_constructed(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        matches!(*slot, SharedSlot::Ready(_))
    }

    /// Returns the cached value, running the producer on first use.
    ///
    /// The lock is released while the producer runs so it may resolve other
    /// services. Resolving `id` itself from inside the producer fails with
    /// `CircularDependency`. A failed attempt leaves the cache empty.
    pub(crate) fn resolve(&self, id: &str, container: &Container) -> AppResult<Service> {
        {
            let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
            match &*slot {
                SharedSlot::Ready(value) => return Ok(value.clone()),
                SharedSlot::Building => return Err(AppError::circular_dependency(id)),
                SharedSlot::Empty => *slot = SharedSlot::Building,
            }
        }

        let result = (self.factory)(container);

        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match result {
            Ok(value) => {
                debug!(service_id = %id, "Shared service constructed");
                *slot = SharedSlot::Ready(value.clone());
                Ok(value)
            }
            Err(e) => {
                *slot = SharedSlot::Empty;
                Err(e)
            }
        }
    }
}
