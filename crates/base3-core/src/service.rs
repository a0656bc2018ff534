//! Type-erased service values shared between the container and the host.

use std::any::Any;
use std::sync::Arc;

/// A resolved service value.
///
/// Both the container and the host registry store values of this type, so a
/// value resolved from one can be inserted into the other without copying.
pub type Service = Arc<dyn Any + Send + Sync>;

/// Wraps a concrete value into a [`Service`].
pub fn service<T: Any + Send + Sync>(value: T) -> Service {
    Arc::new(value)
}
