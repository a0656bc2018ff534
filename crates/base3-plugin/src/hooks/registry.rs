//! Listener registry: hook listeners in registration order.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use base3_core::traits::HookListener;

/// Ordered list of registered hook listeners.
///
/// Registering the same listener twice keeps both entries, so it is invoked
/// twice per dispatch.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    /// Listeners in registration order.
    listeners: RwLock<Vec<Arc<dyn HookListener>>>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener.
    pub async fn register(&self, listener: Arc<dyn HookListener>) {
        let mut listeners = self.listeners.write().await;
        info!(
            listener = %listener.listener_id(),
            position = listeners.len(),
            "Hook listener registered"
        );
        listeners.push(listener);
    }

    /// Returns a copy of the current listener list.
    pub async fn snapshot(&self) -> Vec<Arc<dyn HookListener>> {
        let listeners = self.listeners.read().await;
        listeners.clone()
    }

    /// Returns the number of registered listeners.
    pub async fn len(&self) -> usize {
        let listeners = self.listeners.read().await;
        listeners.len()
    }

    /// Returns whether no listener is registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns the ids of the registered listeners, in order.
    pub async fn listener_ids(&self) -> Vec<String> {
        let listeners = self.listeners.read().await;
        listeners
            .iter()
            .map(|listener| listener.listener_id().to_string())
            .collect()
    }
}
