//! # base3-ilias
//!
//! Host adapter layer that embeds the Base3 runtime in an ILIAS
//! installation. Provides:
//!
//! - Host collaborator contracts (template, tabs, ctrl, language, feedback,
//!   settings, plugin admin) bundled in [`HostContext`]
//! - In-memory host implementations for tests and the demo binary
//! - Installation path layout derived from `ilias.ini.php`
//! - The adapter plugin lifecycle
//! - The UI hook that runs the bootstrap on every request
//! - The configuration GUI and its inline notice rendering
//! - Built-in capabilities contributed by the adapter itself

pub mod builtin;
pub mod config_gui;
pub mod host;
pub mod memory;
pub mod notice;
pub mod paths;
pub mod plugin;
pub mod ui_hook;

pub use config_gui::ConfigGui;
pub use host::HostContext;
pub use memory::InMemoryHost;
pub use notice::Notice;
pub use paths::InstallationPaths;
pub use plugin::AdapterPlugin;
pub use ui_hook::{HtmlMode, HtmlResponse, UiHook};
