//! Capability discovery.
//!
//! Sub-plugins add their classes to a [`ClassTable`] once per process. Each
//! bootstrap wraps the table in a [`ClassMap`] that instantiates classes
//! through that bootstrap's container. Discovery order is table order.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, Weak};

use tracing::debug;

use base3_core::error::AppError;
use base3_core::result::AppResult;
use base3_core::service::Service;
use base3_core::traits::Capability;

use crate::container::Container;

/// Type-erased constructor of one class for one capability.
type Constructor = Arc<dyn Fn(&Container) -> AppResult<Service> + Send + Sync>;

/// One class registered for one capability.
#[derive(Clone)]
struct ClassEntry {
    /// Sub-plugin (app) that contributed the class.
    app: String,
    /// Class name, unique within its app.
    class: String,
    /// Interface name of the capability.
    interface: &'static str,
    /// Builds an `Arc<C>` boxed as a `Service`.
    construct: Constructor,
}

impl std::fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassEntry")
            .field("app", &self.app)
            .field("class", &self.class)
            .field("interface", &self.interface)
            .finish()
    }
}

/// Collects class registrations before the table is frozen.
#[derive(Debug, Default)]
pub struct ClassTableBuilder {
    entries: Vec<ClassEntry>,
}

impl ClassTableBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class` of `app` as an implementation of capability `C`.
    ///
    /// A class providing several capabilities is registered once per
    /// capability.
    pub fn register<C, F>(&mut self, app: &str, class: &str, construct: F) -> &mut Self
    where
        C: Capability + ?Sized,
        F: Fn(&Container) -> AppResult<Arc<C>> + Send + Sync + 'static,
    {
        self.entries.push(ClassEntry {
            app: app.to_string(),
            class: class.to_string(),
            interface: C::INTERFACE,
            construct: Arc::new(move |c| construct(c).map(|object| Arc::new(object) as Service)),
        });
        self
    }

    /// Freezes the registrations.
    pub fn build(self) -> Arc<ClassTable> {
        Arc::new(ClassTable {
            entries: self.entries,
        })
    }
}

/// Immutable, ordered registration table shared by every bootstrap.
#[derive(Debug, Default)]
pub struct ClassTable {
    entries: Vec<ClassEntry>,
}

impl ClassTable {
    /// A table with no classes.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns the number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table has no registrations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Filters for [`ClassMap::get_instances`] beyond the capability itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceCriteria {
    /// Only classes contributed by this app.
    pub app: Option<String>,
    /// Only the class with this name.
    pub class: Option<String>,
}

impl InstanceCriteria {
    /// Criteria matching every class.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts to one app.
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Restricts to one class name.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    fn matches(&self, entry: &ClassEntry) -> bool {
        self.app.as_deref().is_none_or(|app| app == entry.app)
            && self.class.as_deref().is_none_or(|class| class == entry.class)
    }
}

/// Per-bootstrap discovery over a class table.
pub struct ClassMap {
    /// The process-wide registrations.
    table: Arc<ClassTable>,
    /// Container used to construct instances. Weak: the container holds the map.
    container: Weak<Container>,
    /// Interface name → entry positions, built on first query.
    index: OnceLock<BTreeMap<&'static str, Vec<usize>>>,
}

impl ClassMap {
    /// Creates a class map constructing through `container`.
    pub fn new(table: Arc<ClassTable>, container: &Arc<Container>) -> Self {
        Self {
            table,
            container: Arc::downgrade(container),
            index: OnceLock::new(),
        }
    }

    /// Returns every implementation of capability `C`, in table order.
    ///
    /// Returns an empty list when nothing implements `C`.
    pub fn get_instances_by_interface<C: Capability + ?Sized>(&self) -> AppResult<Vec<Arc<C>>> {
        self.get_instances::<C>(&InstanceCriteria::any())
    }

    /// Returns the implementations of capability `C` matching `criteria`.
    pub fn get_instances<C: Capability + ?Sized>(
        &self,
        criteria: &InstanceCriteria,
    ) -> AppResult<Vec<Arc<C>>> {
        let positions = match self.index().get(C::INTERFACE) {
            Some(positions) => positions,
            None => return Ok(Vec::new()),
        };

        let container = self
            .container
            .upgrade()
            .ok_or_else(|| AppError::internal("Class map outlived its container"))?;

        let mut instances = Vec::with_capacity(positions.len());
        for entry in positions
            .iter()
            .map(|&pos| &self.table.entries[pos])
            .filter(|entry| criteria.matches(entry))
        {
            let object = (entry.construct)(&container)?
                .downcast::<Arc<C>>()
                .map_err(|_| AppError::type_mismatch(&entry.class, C::INTERFACE))?;
            instances.push(Arc::clone(&*object));
        }

        debug!(
            interface = C::INTERFACE,
            count = instances.len(),
            "Capability instances discovered"
        );

        Ok(instances)
    }

    /// Returns `(app, class)` for each class implementing `interface`.
    pub fn classes_for(&self, interface: &str) -> Vec<(&str, &str)> {
        self.index()
            .get(interface)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| {
                        let entry = &self.table.entries[pos];
                        (entry.app.as_str(), entry.class.as_str())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn index(&self) -> &BTreeMap<&'static str, Vec<usize>> {
        self.index.get_or_init(|| {
            let mut index: BTreeMap<&'static str, Vec<usize>> = BTreeMap::new();
            for (pos, entry) in self.table.entries.iter().enumerate() {
                index.entry(entry.interface).or_default().push(pos);
            }
            index
        })
    }
}

impl std::fmt::Debug for ClassMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassMap")
            .field("classes", &self.table.len())
            .field("indexed", &self.index.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use base3_core::traits::{AdminDisplay, HookListener, Plugin};

    use super::*;

    #[derive(Debug)]
    struct NamedDisplay {
        name: String,
        greeting: Arc<String>,
    }

    impl AdminDisplay for NamedDisplay {
        fn name(&self) -> &str {
            &self.name
        }

        fn output(&self) -> AppResult<String> {
            Ok(format!("{} {}", self.greeting, self.name))
        }
    }

    #[derive(Debug)]
    struct Both;

    #[async_trait]
    impl Plugin for Both {
        fn plugin_id(&self) -> &str {
            "both"
        }

        async fn init(&self) -> AppResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl HookListener for Both {
        fn listener_id(&self) -> &str {
            "both"
        }

        async fn handle(&self, _event: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn display_table() -> Arc<ClassTable> {
        let mut builder = ClassTableBuilder::new();
        for (app, name) in [("reports", "zeta"), ("reports", "alpha"), ("users", "mid")] {
            let name = name.to_string();
            builder.register::<dyn AdminDisplay, _>(app, &format!("{name}Display"), move |c| {
                let greeting = c.get_as::<String>("greeting")?;
                Ok(Arc::new(NamedDisplay {
                    name: name.clone(),
                    greeting,
                }) as Arc<dyn AdminDisplay>)
            });
        }
        builder.build()
    }

    fn container() -> Arc<Container> {
        let container = Container::new(8);
        container.set_instance("greeting", Arc::new("hello".to_string()));
        container
    }

    #[test]
    fn test_empty_capability_set_is_not_an_error() {
        let container = container();
        let map = ClassMap::new(ClassTable::empty(), &container);

        let listeners = map.get_instances_by_interface::<dyn HookListener>().unwrap();
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_instances_come_back_in_table_order_with_dependencies() {
        let container = container();
        let map = ClassMap::new(display_table(), &container);

        let displays = map.get_instances_by_interface::<dyn AdminDisplay>().unwrap();
        let names: Vec<&str> = displays.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(displays[1].output().unwrap(), "hello alpha");
    }

    #[test]
    fn test_criteria_filter_by_app_and_class() {
        let container = container();
        let map = ClassMap::new(display_table(), &container);

        let reports = map
            .get_instances::<dyn AdminDisplay>(&InstanceCriteria::any().with_app("reports"))
            .unwrap();
        assert_eq!(reports.len(), 2);

        let single = map
            .get_instances::<dyn AdminDisplay>(
                &InstanceCriteria::any()
                    .with_app("users")
                    .with_class("midDisplay"),
            )
            .unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].name(), "mid");
    }

    #[test]
    fn test_class_registered_for_several_capabilities() {
        let mut builder = ClassTableBuilder::new();
        builder
            .register::<dyn Plugin, _>("core", "Both", |_| Ok(Arc::new(Both) as Arc<dyn Plugin>))
            .register::<dyn HookListener, _>("core", "Both", |_| {
                Ok(Arc::new(Both) as Arc<dyn HookListener>)
            });
        let container = container();
        let map = ClassMap::new(builder.build(), &container);

        assert_eq!(map.get_instances_by_interface::<dyn Plugin>().unwrap().len(), 1);
        assert_eq!(
            map.get_instances_by_interface::<dyn HookListener>().unwrap().len(),
            1
        );
        assert!(map.get_instances_by_interface::<dyn AdminDisplay>().unwrap().is_empty());
        assert_eq!(
            map.classes_for(<dyn Plugin as Capability>::INTERFACE),
            vec![("core", "Both")]
        );
    }

    #[test]
    fn test_each_query_constructs_fresh_instances() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let mut builder = ClassTableBuilder::new();
        builder.register::<dyn Plugin, _>("core", "Both", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Both) as Arc<dyn Plugin>)
        });
        let container = container();
        let map = ClassMap::new(builder.build(), &container);

        map.get_instances_by_interface::<dyn Plugin>().unwrap();
        map.get_instances_by_interface::<dyn Plugin>().unwrap();
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_constructor_errors_propagate() {
        let mut builder = ClassTableBuilder::new();
        builder.register::<dyn AdminDisplay, _>("core", "Broken", |c| {
            c.get_as::<u8>("missing")?;
            unreachable!()
        });
        let container = container();
        let map = ClassMap::new(builder.build(), &container);

        let err = map.get_instances_by_interface::<dyn AdminDisplay>().unwrap_err();
        assert_eq!(err.kind, base3_core::error::ErrorKind::UnknownService);
    }
}
