//! Standard service selector: routes a request to an admin display.

use std::sync::Arc;

use tracing::debug;

use base3_container::{ClassMap, Container, ids};
use base3_core::error::AppError;
use base3_core::result::AppResult;
use base3_core::traits::AdminDisplay;

use crate::request::Request;

/// Request parameter naming the display to render.
pub const NAME_PARAM: &str = "name";

/// Display rendered when the request names none.
pub const DEFAULT_DISPLAY: &str = "index";

/// Picks the admin display a request asks for and renders it.
#[derive(Debug)]
pub struct StandardServiceSelector {
    /// Discovery for admin displays.
    class_map: Arc<ClassMap>,
    /// The current request.
    request: Arc<Request>,
}

impl StandardServiceSelector {
    /// Creates a selector.
    pub fn new(class_map: Arc<ClassMap>, request: Arc<Request>) -> Self {
        Self { class_map, request }
    }

    /// Creates a selector from the bootstrap bindings.
    pub fn from_container(container: &Container) -> AppResult<Self> {
        Ok(Self::new(
            container.get_as::<ClassMap>(ids::CLASS_MAP)?,
            container.get_as::<Request>(ids::REQUEST)?,
        ))
    }

    /// Returns the display named `name`.
    ///
    /// When several displays share the name, the last discovered one wins.
    pub fn select(&self, name: &str) -> AppResult<Arc<dyn AdminDisplay>> {
        self.class_map
            .get_instances_by_interface::<dyn AdminDisplay>()?
            .into_iter()
            .rev()
            .find(|display| display.name() == name)
            .ok_or_else(|| AppError::missing_capability(format!("No admin display named '{name}'")))
    }

    /// Renders the display named by the request, or the default display.
    pub fn render(&self) -> AppResult<String> {
        let name = self.request.get(NAME_PARAM).unwrap_or(DEFAULT_DISPLAY);
        debug!(request_id = %self.request.id, display = %name, "Selecting admin display");
        self.select(name)?.output()
    }
}
