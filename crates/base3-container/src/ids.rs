//! Well-known service identifiers bound by every bootstrap.

/// Friendly name of the container itself.
pub const SERVICE_LOCATOR: &str = "servicelocator";

/// Interface name of the container.
pub const CONTAINER: &str = "Base3\\Api\\IContainer";

/// The current request.
pub const REQUEST: &str = "Base3\\Api\\IRequest";

/// Friendly name of the class map.
pub const CLASS_MAP_NAME: &str = "classmap";

/// Interface name of the class map.
pub const CLASS_MAP: &str = "Base3\\Api\\IClassMap";

/// The hook manager.
pub const HOOK_MANAGER: &str = "Base3\\Hook\\IHookManager";

/// The service selector.
pub const SERVICE_SELECTOR: &str = "Base3\\ServiceSelector\\Api\\IServiceSelector";
