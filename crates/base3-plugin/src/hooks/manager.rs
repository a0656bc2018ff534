//! Hook manager: fires named events at every registered listener.
//!
//! Dispatch is sequential: each listener runs to completion, in registration
//! order, before the next one starts, and `dispatch` returns only after the
//! last one. Listeners that do not care about an event are expected to no-op.
//!
//! Failure handling follows the configured [`ListenerFailurePolicy`]:
//! - `Abort`: the first failing listener ends the dispatch; the error is
//!   returned and the remaining listeners are not invoked.
//! - `Isolate`: failures are logged and recorded in the report, and the
//!   remaining listeners still run.

use std::sync::Arc;

use tracing::{debug, error, warn};

use base3_core::config::ListenerFailurePolicy;
use base3_core::error::{AppError, ErrorKind};
use base3_core::result::AppResult;
use base3_core::traits::HookListener;

use super::registry::ListenerRegistry;
use super::report::{DispatchReport, ListenerFailureRecord};

/// Ordered pub/sub dispatcher for lifecycle events.
#[derive(Debug)]
pub struct HookManager {
    /// Registered listeners.
    registry: ListenerRegistry,
    /// What to do when a listener fails.
    policy: ListenerFailurePolicy,
}

impl HookManager {
    /// Creates a hook manager with no listeners.
    pub fn new(policy: ListenerFailurePolicy) -> Self {
        Self {
            registry: ListenerRegistry::new(),
            policy,
        }
    }

    /// Returns the failure policy.
    pub fn policy(&self) -> ListenerFailurePolicy {
        self.policy
    }

    /// Registers a listener. No deduplication: adding the same listener
    /// twice makes it run twice per dispatch.
    pub async fn add_hook_listener(&self, listener: Arc<dyn HookListener>) {
        self.registry.register(listener).await;
    }

    /// Returns the number of registered listeners.
    pub async fn listener_count(&self) -> usize {
        self.registry.len().await
    }

    /// Returns the ids of the registered listeners, in dispatch order.
    pub async fn listener_ids(&self) -> Vec<String> {
        self.registry.listener_ids().await
    }

    /// Dispatches `event` to all listeners registered before this call.
    ///
    /// Listeners added while the dispatch runs take part from the next
    /// dispatch on.
    pub async fn dispatch(&self, event: &str) -> AppResult<DispatchReport> {
        let listeners = self.registry.snapshot().await;
        let mut report = DispatchReport::new(event);

        if listeners.is_empty() {
            return Ok(report);
        }

        debug!(
            event = %event,
            listener_count = listeners.len(),
            policy = %self.policy,
            "Dispatching hook event"
        );

        for listener in &listeners {
            report.invoked += 1;

            let Err(e) = listener.handle(event).await else {
                continue;
            };

            match self.policy {
                ListenerFailurePolicy::Abort => {
                    error!(
                        event = %event,
                        listener = %listener.listener_id(),
                        error = %e,
                        "Hook listener failed, aborting dispatch"
                    );
                    return Err(AppError::with_source(
                        ErrorKind::ListenerFailure,
                        format!(
                            "Listener '{}' failed while handling '{}'",
                            listener.listener_id(),
                            event
                        ),
                        e,
                    ));
                }
                ListenerFailurePolicy::Isolate => {
                    warn!(
                        event = %event,
                        listener = %listener.listener_id(),
                        error = %e,
                        "Hook listener failed, continuing dispatch"
                    );
                    report.failures.push(ListenerFailureRecord {
                        listener: listener.listener_id().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

impl Default for HookManager {
    fn default() -> Self {
        Self::new(ListenerFailurePolicy::default())
    }
}
