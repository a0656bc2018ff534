//! Configuration screen of the adapter plugin.
//!
//! The host routes a free-text command to [`ConfigGui::perform_command`].
//! The screen has two built-in tabs, `general` and `schema`, followed by one
//! tab per discovered admin display, sorted by name. A display whose name
//! matches an earlier one (built-in or discovered) replaces it. Unknown
//! commands fall back to `general`, and render failures become an inline
//! notice instead of an error page.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use base3_container::{ClassMap, Container, ids};
use base3_core::config::PluginConfig;
use base3_core::error::AppError;
use base3_core::result::AppResult;
use base3_core::traits::{AdminDisplay, Capability, HookListener, Plugin};

use crate::host::HostContext;
use crate::notice::{Notice, escape_html};

/// Host GUI class name used for tab links.
pub const GUI_CLASS: &str = "ilBase3IliasAdapterConfigGUI";

/// Default command.
pub const CMD_GENERAL: &str = "general";

/// Capability overview command.
pub const CMD_SCHEMA: &str = "schema";

/// Client scripts included on every configuration screen.
pub const SCRIPTS: [&str; 2] = [
    "components/Base3/ClientStack/assetloader/assetloader.min.js",
    "components/Base3/ClientStack/jqueryui/jquery-ui.js",
];

/// Stylesheets included on every configuration screen.
pub const STYLES: [&str; 1] = ["components/Base3/ClientStack/jqueryui/jquery-ui.css"];

/// Content source of one tab.
enum TabContent {
    General,
    Schema,
    Display(Arc<dyn AdminDisplay>),
}

/// The adapter's configuration screen.
pub struct ConfigGui {
    plugin: PluginConfig,
    host: HostContext,
    container: Arc<Container>,
}

impl ConfigGui {
    /// Creates the screen over a bootstrapped container.
    pub fn new(plugin: PluginConfig, host: HostContext, container: Arc<Container>) -> Self {
        Self {
            plugin,
            host,
            container,
        }
    }

    /// Creates the screen over the container the bootstrap published into
    /// the host registry.
    pub fn from_host(plugin: PluginConfig, host: HostContext) -> AppResult<Self> {
        let container = host
            .registry
            .get(ids::CONTAINER)
            .ok_or_else(|| AppError::unknown_service(ids::CONTAINER))?
            .downcast::<Container>()
            .map_err(|_| AppError::type_mismatch(ids::CONTAINER, "Container"))?;
        Ok(Self::new(plugin, host, container))
    }

    /// Executes `cmd` and returns the markup set as page content.
    pub fn perform_command(&self, cmd: &str) -> String {
        for script in SCRIPTS {
            self.host.template.add_javascript(script);
        }
        for style in STYLES {
            self.host.template.add_css(style);
        }

        let html = self.execute(cmd).unwrap_or_else(|e| {
            warn!(command = %cmd, error = %e, "Configuration screen failed to render");
            Notice::from_error(&e).render()
        });
        self.host.template.set_content(&html);
        html
    }

    fn execute(&self, cmd: &str) -> AppResult<String> {
        let routes = self.routes()?;
        for name in routes.tab_order() {
            self.add_tab(name);
        }

        let active = if routes.contains(cmd) {
            cmd
        } else {
            debug!(command = %cmd, "Unknown command, falling back to general");
            CMD_GENERAL
        };
        self.host.tabs.activate_tab(active);

        let content = routes
            .get(active)
            .ok_or_else(|| AppError::internal("General tab is not routed"))?;
        self.render(content)
    }

    /// Built-in routes, then one per discovered display.
    fn routes(&self) -> AppResult<TabRoutes> {
        let displays = self
            .class_map()?
            .get_instances_by_interface::<dyn AdminDisplay>()?;

        let mut routes = TabRoutes::default();
        routes.insert(CMD_GENERAL.to_string(), TabContent::General);
        routes.insert(CMD_SCHEMA.to_string(), TabContent::Schema);
        for display in displays {
            routes.insert(display.name().to_string(), TabContent::Display(display));
        }
        Ok(routes)
    }

    fn add_tab(&self, name: &str) {
        let label = self.host.lang.txt(&format!("tab_{name}"));
        let link = self.host.ctrl.link_target(GUI_CLASS, name);
        self.host.tabs.add_tab(name, &label, &link);
    }

    fn render(&self, content: &TabContent) -> AppResult<String> {
        match content {
            TabContent::General => Ok(format!(
                "<h2>{}</h2><p>Base3 framework is bootstrapped with {} services.</p>",
                escape_html(&self.plugin.name),
                self.container.len()
            )),
            TabContent::Schema => self.render_schema(),
            TabContent::Display(display) => display.output(),
        }
    }

    /// Lists the discovered classes per capability.
    fn render_schema(&self) -> AppResult<String> {
        let class_map = self.class_map()?;
        let mut html = String::from("<h2>Schema</h2>");
        for interface in [
            <dyn HookListener as Capability>::INTERFACE,
            <dyn Plugin as Capability>::INTERFACE,
            <dyn AdminDisplay as Capability>::INTERFACE,
        ] {
            html.push_str(&format!("<h3>{}</h3><ul>", escape_html(interface)));
            for (app, class) in class_map.classes_for(interface) {
                html.push_str(&format!(
                    "<li>{} <small>{}</small></li>",
                    escape_html(class),
                    escape_html(app)
                ));
            }
            html.push_str("</ul>");
        }
        Ok(html)
    }

    fn class_map(&self) -> AppResult<Arc<ClassMap>> {
        self.container.get_as::<ClassMap>(ids::CLASS_MAP)
    }
}

impl std::fmt::Debug for ConfigGui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigGui")
            .field("plugin", &self.plugin.id)
            .field("container", &self.container)
            .finish()
    }
}

/// Tab routes keyed by command.
#[derive(Default)]
struct TabRoutes {
    by_name: BTreeMap<String, TabContent>,
}

impl TabRoutes {
    /// Inserts or replaces a route.
    fn insert(&mut self, name: String, content: TabContent) {
        self.by_name.insert(name, content);
    }

    fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&TabContent> {
        self.by_name.get(name)
    }

    /// Built-in tabs first, then the rest sorted by name.
    fn tab_order(&self) -> Vec<&str> {
        let builtin = [CMD_GENERAL, CMD_SCHEMA];
        builtin
            .into_iter()
            .chain(
                self.by_name
                    .keys()
                    .map(String::as_str)
                    .filter(|name| !builtin.contains(name)),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use base3_container::{ClassTable, ClassTableBuilder};
    use base3_core::error::ErrorKind;

    use super::*;
    use crate::memory::InMemoryHost;

    #[derive(Debug)]
    struct Fixed {
        name: &'static str,
        body: Result<&'static str, ErrorKind>,
    }

    impl AdminDisplay for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn output(&self) -> AppResult<String> {
            self.body
                .map(str::to_string)
                .map_err(|kind| AppError::new(kind, "display failed"))
        }
    }

    fn display(
        builder: &mut ClassTableBuilder,
        class: &str,
        name: &'static str,
        body: Result<&'static str, ErrorKind>,
    ) {
        builder.register::<dyn AdminDisplay, _>("test", class, move |_| {
            Ok(Arc::new(Fixed { name, body }) as Arc<dyn AdminDisplay>)
        });
    }

    fn gui(table: Arc<ClassTable>) -> (InMemoryHost, ConfigGui) {
        let host = InMemoryHost::new();
        let container = Container::new(8);
        let class_map = Arc::new(ClassMap::new(table, &container));
        container.set_instance(ids::CLASS_MAP, class_map);
        let gui = ConfigGui::new(PluginConfig::default(), host.context(), container);
        (host, gui)
    }

    #[test]
    fn test_assets_and_builtin_tabs() {
        let (host, gui) = gui(ClassTable::empty());

        let html = gui.perform_command("general");

        assert_eq!(host.template.scripts(), SCRIPTS.to_vec());
        assert_eq!(host.template.styles(), STYLES.to_vec());
        assert_eq!(host.tabs.ids(), vec!["general", "schema"]);
        assert_eq!(host.tabs.active().as_deref(), Some("general"));
        assert_eq!(host.tabs.tabs()[0].label, "General");
        assert_eq!(
            host.tabs.tabs()[1].link,
            "ilias.php?cmdClass=ilbase3iliasadapterconfiggui&cmd=schema"
        );
        assert!(html.contains("<h2>Base3IliasAdapter</h2>"));
        assert_eq!(host.template.content(), Some(html));
    }

    #[test]
    fn test_unknown_command_falls_back_to_general() {
        let (host, gui) = gui(ClassTable::empty());

        let html = gui.perform_command("drop_all_tables");

        assert_eq!(host.tabs.active().as_deref(), Some("general"));
        assert!(html.contains("<h2>Base3IliasAdapter</h2>"));
    }

    #[test]
    fn test_displays_sorted_after_builtins() {
        let mut builder = ClassTableBuilder::new();
        display(&mut builder, "Zeta", "zeta", Ok("z"));
        display(&mut builder, "Alpha", "alpha", Ok("a"));
        let (host, gui) = gui(builder.build());

        let html = gui.perform_command("zeta");

        assert_eq!(host.tabs.ids(), vec!["general", "schema", "alpha", "zeta"]);
        assert_eq!(host.tabs.active().as_deref(), Some("zeta"));
        assert_eq!(html, "z");
    }

    #[test]
    fn test_name_collision_last_discovered_wins() {
        let mut builder = ClassTableBuilder::new();
        display(&mut builder, "First", "report", Ok("first"));
        display(&mut builder, "Second", "report", Ok("second"));
        let (host, gui) = gui(builder.build());

        let html = gui.perform_command("report");

        assert_eq!(html, "second");
        assert_eq!(host.tabs.ids(), vec!["general", "schema", "report"]);
    }

    #[test]
    fn test_display_can_replace_builtin_tab() {
        let mut builder = ClassTableBuilder::new();
        display(&mut builder, "Custom", "general", Ok("custom general"));
        let (host, gui) = gui(builder.build());

        assert_eq!(gui.perform_command("nope"), "custom general");
        assert_eq!(host.tabs.ids(), vec!["general", "schema"]);
    }

    #[test]
    fn test_render_failure_becomes_notice() {
        let mut builder = ClassTableBuilder::new();
        display(&mut builder, "Broken", "broken", Err(ErrorKind::Internal));
        let (host, gui) = gui(builder.build());

        let html = gui.perform_command("broken");

        assert!(html.contains("alert-danger"));
        assert!(html.contains("display failed"));
        assert_eq!(host.template.content(), Some(html));
    }

    #[test]
    fn test_missing_class_map_becomes_notice() {
        let host = InMemoryHost::new();
        let gui = ConfigGui::new(PluginConfig::default(), host.context(), Container::new(8));

        let html = gui.perform_command("general");

        assert!(html.contains("Service not available"));
        assert!(host.tabs.ids().is_empty());
    }

    #[test]
    fn test_schema_lists_classes() {
        let mut builder = ClassTableBuilder::new();
        display(&mut builder, "Zeta", "zeta", Ok("z"));
        let (_host, gui) = gui(builder.build());

        let html = gui.perform_command("schema");

        assert!(html.contains("<h3>Base3\\Api\\IAdminDisplay</h3><ul><li>Zeta <small>test</small></li></ul>"));
    }

    #[test]
    fn test_from_host_requires_published_container() {
        let host = InMemoryHost::new();
        let err = ConfigGui::from_host(PluginConfig::default(), host.context()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownService);
    }
}
