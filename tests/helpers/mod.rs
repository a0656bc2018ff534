//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use base3_container::{ClassTable, ClassTableBuilder, Container};
use base3_core::config::{AdapterConfig, ListenerFailurePolicy};
use base3_core::error::AppError;
use base3_core::result::AppResult;
use base3_core::traits::{AdminDisplay, HookListener, Plugin};
use base3_ilias::{InMemoryHost, builtin};
use base3_plugin::{BootstrapGuard, Bootstrapper};

/// Ordered log of what fixtures did.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// Counts invocations of a factory or constructor.
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Hook listener writing `id:event` to a journal.
#[derive(Debug)]
pub struct RecordingListener {
    pub id: String,
    pub journal: Journal,
    pub fail_on: Option<&'static str>,
}

#[async_trait]
impl HookListener for RecordingListener {
    fn listener_id(&self) -> &str {
        &self.id
    }

    async fn handle(&self, event: &str) -> AppResult<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.id, event));
        if self.fail_on == Some(event) {
            return Err(AppError::internal(format!("{} refused {}", self.id, event)));
        }
        Ok(())
    }
}

/// Plugin writing `plugin:id` to a journal on init.
#[derive(Debug)]
pub struct RecordingPlugin {
    pub id: String,
    pub journal: Journal,
}

#[async_trait]
impl Plugin for RecordingPlugin {
    fn plugin_id(&self) -> &str {
        &self.id
    }

    async fn init(&self) -> AppResult<()> {
        self.journal.lock().unwrap().push(format!("plugin:{}", self.id));
        Ok(())
    }
}

/// Admin display with fixed output.
#[derive(Debug)]
pub struct FixedDisplay {
    pub name: String,
    pub output: String,
}

impl AdminDisplay for FixedDisplay {
    fn name(&self) -> &str {
        &self.name
    }

    fn output(&self) -> AppResult<String> {
        Ok(self.output.clone())
    }
}

/// Builds class tables for tests.
pub struct TableFixture {
    builder: ClassTableBuilder,
    pub journal: Journal,
    /// Counts every class constructed by the fixture.
    pub constructed: Counter,
}

impl TableFixture {
    pub fn new() -> Self {
        Self {
            builder: ClassTableBuilder::new(),
            journal: journal(),
            constructed: Counter::default(),
        }
    }

    /// Includes the adapter's built-in classes.
    pub fn with_builtins(mut self) -> Self {
        builtin::register_classes(&mut self.builder);
        self
    }

    pub fn listener(self, id: &str) -> Self {
        self.listener_failing_on(id, None)
    }

    pub fn listener_failing_on(mut self, id: &str, fail_on: Option<&'static str>) -> Self {
        let id = id.to_string();
        let journal = self.journal.clone();
        let counter = self.constructed.clone();
        self.builder
            .register::<dyn HookListener, _>("fixtures", &id.clone(), move |_: &Container| {
                counter.bump();
                Ok(Arc::new(RecordingListener {
                    id: id.clone(),
                    journal: journal.clone(),
                    fail_on,
                }) as Arc<dyn HookListener>)
            });
        self
    }

    pub fn plugin(mut self, id: &str) -> Self {
        let id = id.to_string();
        let journal = self.journal.clone();
        let counter = self.constructed.clone();
        self.builder
            .register::<dyn Plugin, _>("fixtures", &id.clone(), move |_: &Container| {
                counter.bump();
                Ok(Arc::new(RecordingPlugin {
                    id: id.clone(),
                    journal: journal.clone(),
                }) as Arc<dyn Plugin>)
            });
        self
    }

    pub fn display(mut self, class: &str, name: &str, output: &str) -> Self {
        let name = name.to_string();
        let output = output.to_string();
        self.builder
            .register::<dyn AdminDisplay, _>("fixtures", class, move |_: &Container| {
                Ok(Arc::new(FixedDisplay {
                    name: name.clone(),
                    output: output.clone(),
                }) as Arc<dyn AdminDisplay>)
            });
        self
    }

    pub fn build(self) -> (Arc<ClassTable>, Journal, Counter) {
        (self.builder.build(), self.journal, self.constructed)
    }
}

/// Configuration pointing at a root without an ini file.
pub fn config(policy: ListenerFailurePolicy) -> AdapterConfig {
    let mut config = AdapterConfig::default();
    config.hooks.failure_policy = policy;
    config.paths.ilias_root = "/nonexistent/base3-integration".into();
    config
}

/// A bootstrapper with its own guard, so tests do not share the process one.
pub fn bootstrapper(table: Arc<ClassTable>, policy: ListenerFailurePolicy) -> Bootstrapper {
    Bootstrapper::new(&config(policy), table).with_guard(Arc::new(BootstrapGuard::new()))
}

pub fn host() -> InMemoryHost {
    InMemoryHost::new()
}
