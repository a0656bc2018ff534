//! Service container: keyed bindings resolved on demand.
//!
//! One container lives for exactly one bootstrap. Bindings are registered
//! during the bootstrap and only resolved afterwards, although nothing
//! enforces that split.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, Weak};

use tracing::{debug, trace};

use base3_core::config::ContainerConfig;
use base3_core::error::AppError;
use base3_core::result::AppResult;
use base3_core::service::Service;
use base3_core::traits::HostRegistry;

use crate::binding::{Binding, BindingKind};

/// Registry mapping service identifiers to bindings.
pub struct Container {
    /// Identifier → binding. Ordered so `service_list` is stable.
    bindings: RwLock<BTreeMap<String, Arc<Binding>>>,
    /// Alias hops followed before resolution fails.
    max_alias_depth: usize,
    /// Host registry consulted for identifiers this container does not bind.
    host: RwLock<Option<Weak<dyn HostRegistry>>>,
    /// Handle to the owning `Arc`, for the self-reference binding.
    this: Weak<Container>,
}

impl Container {
    /// Creates an empty container.
    pub fn new(max_alias_depth: usize) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            bindings: RwLock::new(BTreeMap::new()),
            max_alias_depth,
            host: RwLock::new(None),
            this: this.clone(),
        })
    }

    /// Creates an empty container from configuration.
    pub fn from_config(config: &ContainerConfig) -> Arc<Self> {
        Self::new(config.max_alias_depth)
    }

    /// Returns a strong handle to this container.
    pub fn handle(&self) -> AppResult<Arc<Container>> {
        self.this
            .upgrade()
            .ok_or_else(|| AppError::internal("Container handle requested during teardown"))
    }

    /// Returns the configured alias hop bound.
    pub fn max_alias_depth(&self) -> usize {
        self.max_alias_depth
    }

    /// Registers a binding. An existing binding under the same id is replaced.
    pub fn set(&self, id: impl Into<String>, binding: Binding) -> &Self {
        let id = id.into();
        let kind = binding.kind();
        let mut bindings = self.bindings.write().unwrap_or_else(|e| e.into_inner());
        let overwritten = bindings.insert(id.clone(), Arc::new(binding)).is_some();

        debug!(service_id = %id, kind = ?kind, overwritten, "Binding registered");
        self
    }

    /// Binds a pre-built value.
    pub fn set_instance<T: Any + Send + Sync>(&self, id: impl Into<String>, value: Arc<T>) -> &Self {
        self.set(id, Binding::instance(value))
    }

    /// Binds a producer invoked on every resolve.
    pub fn set_factory<T, F>(&self, id: impl Into<String>, factory: F) -> &Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> AppResult<Arc<T>> + Send + Sync + 'static,
    {
        self.set(
            id,
            Binding::factory(move |c| factory(c).map(|value| value as Service)),
        )
    }

    /// Binds a producer invoked on first resolve only.
    pub fn set_shared<T, F>(&self, id: impl Into<String>, factory: F) -> &Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> AppResult<Arc<T>> + Send + Sync + 'static,
    {
        self.set(
            id,
            Binding::shared(move |c| factory(c).map(|value| value as Service)),
        )
    }

    /// Binds `id` as a redirect to `target`.
    pub fn set_alias(&self, id: impl Into<String>, target: impl Into<String>) -> &Self {
        self.set(id, Binding::alias(target))
    }

    /// Attaches the host registry as a secondary source for unbound ids.
    ///
    /// Held weakly: the host registry usually ends up holding this container.
    pub fn set_host(&self, host: &Arc<dyn HostRegistry>) -> &Self {
        let mut slot = self.host.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(Arc::downgrade(host));
        self
    }

    /// Returns whether `id` is bound here or held by the host.
    pub fn has(&self, id: &str) -> bool {
        self.binding(id).is_some() || self.host().is_some_and(|host| host.contains(id))
    }

    /// Returns the kind of the binding registered under `id`.
    pub fn kind_of(&self, id: &str) -> Option<BindingKind> {
        self.binding(id).map(|binding| binding.kind())
    }

    /// Resolves `id`.
    ///
    /// Aliases are followed transitively up to the configured hop bound.
    /// Unbound ids fall back to the host registry; an alias that ends at an
    /// unbound id does not.
    pub fn get(&self, id: &str) -> AppResult<Service> {
        let mut current = id.to_string();
        let mut hops = 0usize;

        loop {
            let Some(binding) = self.binding(&current) else {
                if hops == 0 {
                    return self
                        .host()
                        .and_then(|host| host.get(id))
                        .ok_or_else(|| AppError::unknown_service(id));
                }
                return Err(AppError::unresolvable_alias(format!(
                    "Alias '{id}' ends at unbound service '{current}' after {hops} hop(s)"
                )));
            };

            match &*binding {
                Binding::Alias(target) => {
                    hops += 1;
                    if hops > self.max_alias_depth {
                        return Err(AppError::unresolvable_alias(format!(
                            "Alias chain from '{id}' exceeds {} hop(s)",
                            self.max_alias_depth
                        )));
                    }
                    trace!(service_id = %current, target = %target, "Following alias");
                    current = target.clone();
                }
                Binding::Instance(value) => return Ok(value.clone()),
                Binding::Factory(factory) => return factory(self),
                Binding::Shared(shared) => return shared.resolve(&current, self),
            }
        }
    }

    /// Resolves `id` and downcasts it to `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> AppResult<Arc<T>> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| AppError::type_mismatch(id, std::any::type_name::<T>()))
    }

    /// Returns every identifier bound in this container, sorted.
    ///
    /// Host-only ids are not included.
    pub fn service_list(&self) -> Vec<String> {
        let bindings = self.bindings.read().unwrap_or_else(|e| e.into_inner());
        bindings.keys().cloned().collect()
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        let bindings = self.bindings.read().unwrap_or_else(|e| e.into_inner());
        bindings.len()
    }

    /// Returns whether no binding is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn binding(&self, id: &str) -> Option<Arc<Binding>> {
        let bindings = self.bindings.read().unwrap_or_else(|e| e.into_inner());
        bindings.get(id).cloned()
    }

    fn host(&self) -> Option<Arc<dyn HostRegistry>> {
        let slot = self.host.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.service_list())
            .field("max_alias_depth", &self.max_alias_depth)
            .finish()
    }
}
