//! Capabilities contributed by the adapter itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::info;

use base3_container::{ClassTable, ClassTableBuilder, Container};
use base3_core::result::AppResult;
use base3_core::traits::{AdminDisplay, HookListener};
use base3_plugin::register_class;

use crate::notice::escape_html;

/// App name under which the built-in classes are registered.
pub const APP: &str = "base3ilias";

/// Logs every lifecycle event it receives.
#[derive(Debug, Default)]
pub struct BootstrapTraceListener {
    seen: AtomicUsize,
}

impl BootstrapTraceListener {
    pub fn build(_: &Container) -> AppResult<Arc<Self>> {
        Ok(Arc::new(Self::default()))
    }

    /// Number of events handled so far.
    pub fn seen(&self) -> usize {
        self.seen.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HookListener for BootstrapTraceListener {
    fn listener_id(&self) -> &str {
        "base3ilias.bootstrap-trace"
    }

    async fn handle(&self, event: &str) -> AppResult<()> {
        let seq = self.seen.fetch_add(1, Ordering::SeqCst) + 1;
        info!(event = %event, seq, "Base3 lifecycle event");
        Ok(())
    }
}

/// Admin tab listing the ids bound in the container.
#[derive(Debug)]
pub struct ServicesDisplay {
    container: Arc<Container>,
}

impl ServicesDisplay {
    pub fn build(container: &Container) -> AppResult<Arc<Self>> {
        Ok(Arc::new(Self {
            container: container.handle()?,
        }))
    }
}

impl AdminDisplay for ServicesDisplay {
    fn name(&self) -> &str {
        "services"
    }

    fn output(&self) -> AppResult<String> {
        let items: String = self
            .container
            .service_list()
            .iter()
            .map(|id| {
                let kind = self
                    .container
                    .kind_of(id)
                    .map(|k| format!("{k:?}"))
                    .unwrap_or_default();
                format!("<li><code>{}</code> {}</li>", escape_html(id), kind)
            })
            .collect();
        Ok(format!("<h2>Services</h2><ul>{items}</ul>"))
    }
}

/// Adds the built-in classes to a class table.
pub fn register_classes(builder: &mut ClassTableBuilder) {
    register_class!(
        builder,
        app: APP,
        class: BootstrapTraceListener => [dyn HookListener],
        BootstrapTraceListener::build
    );
    register_class!(
        builder,
        app: APP,
        class: ServicesDisplay => [dyn AdminDisplay],
        ServicesDisplay::build
    );
}

/// A class table holding only the built-in classes.
pub fn class_table() -> Arc<ClassTable> {
    let mut builder = ClassTableBuilder::new();
    register_classes(&mut builder);
    builder.build()
}

#[cfg(test)]
mod tests {
    use base3_container::ClassMap;

    use super::*;

    #[test]
    fn test_builtin_table() {
        let container = Container::new(8);
        let map = ClassMap::new(class_table(), &container);

        assert_eq!(map.get_instances_by_interface::<dyn HookListener>().unwrap().len(), 1);
        let displays = map.get_instances_by_interface::<dyn AdminDisplay>().unwrap();
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].name(), "services");
    }

    #[test]
    fn test_services_display_lists_ids() {
        let container = Container::new(8);
        container
            .set_instance("b<x>", Arc::new(1u8))
            .set_alias("a", "b<x>");

        let html = ServicesDisplay::build(&container).unwrap().output().unwrap();

        assert!(html.contains("<li><code>a</code> Alias</li>"));
        assert!(html.contains("<li><code>b&lt;x&gt;</code> Instance</li>"));
        assert!(html.find("<code>a</code>") < html.find("<code>b&lt;x&gt;</code>"));
    }

    #[tokio::test]
    async fn test_trace_listener_counts_events() {
        let listener = BootstrapTraceListener::default();
        listener.handle("bootstrap.init").await.unwrap();
        listener.handle("bootstrap.finish").await.unwrap();
        assert_eq!(listener.seen(), 2);
    }
}
