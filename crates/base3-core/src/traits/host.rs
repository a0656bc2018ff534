//! Host registry contract.

use crate::service::Service;

/// The host platform's process-wide service registry.
///
/// The adapter never assumes exclusive ownership: it reads entries, and
/// writes only under keys the host does not already hold.
pub trait HostRegistry: Send + Sync {
    /// Returns whether the host holds an entry under `id`.
    fn contains(&self, id: &str) -> bool;

    /// Returns the entry under `id`, if any.
    fn get(&self, id: &str) -> Option<Service>;

    /// Stores `value` under `id`, replacing any previous entry.
    fn insert(&self, id: &str, value: Service);

    /// Returns all keys currently held, sorted.
    fn keys(&self) -> Vec<String>;

    /// Stores `value` only if `id` is vacant. Returns whether it was stored.
    fn insert_if_absent(&self, id: &str, value: Service) -> bool {
        if self.contains(id) {
            return false;
        }
        self.insert(id, value);
        true
    }
}
