//! Bootstrap sequencer: builds the container, discovers listeners and
//! plugins, fires the lifecycle events, and publishes services to the host.
//!
//! Phases run in strict order:
//!
//! 1. `Uninitialized`: build the container and register the core bindings.
//! 2. `Discovering`: register every discovered hook listener, fire
//!    `bootstrap.init`.
//! 3. `PluginInit`: call `init()` on every discovered plugin, fire
//!    `bootstrap.start`.
//! 4. `Publishing`: copy every container service the host does not already
//!    hold into the host registry.
//! 5. `Finished`: fire `bootstrap.finish`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use base3_container::{Binding, ClassMap, ClassTable, Container, ids};
use base3_core::config::{AdapterConfig, ContainerConfig, ListenerFailurePolicy};
use base3_core::error::{AppError, ErrorKind};
use base3_core::events::LifecycleEvent;
use base3_core::result::AppResult;
use base3_core::service::Service;
use base3_core::traits::{HookListener, HostRegistry, Plugin};

use super::guard::BootstrapGuard;
use super::report::{BootstrapOutcome, BootstrapReport, Bootstrapped};
use super::state::BootstrapState;
use crate::hooks::HookManager;
use crate::request::Request;
use crate::selector::StandardServiceSelector;

/// Runs the bootstrap for a host request, at most once per guard.
#[derive(Debug)]
pub struct Bootstrapper {
    /// Classes available for discovery.
    table: Arc<ClassTable>,
    /// Container settings.
    container_config: ContainerConfig,
    /// Listener failure policy of the hook manager.
    failure_policy: ListenerFailurePolicy,
    /// The "already bootstrapped" flag.
    guard: Arc<BootstrapGuard>,
    /// Host values registered as instances next to the core bindings.
    instances: Vec<(String, Service)>,
}

impl Bootstrapper {
    /// Creates a bootstrapper guarded by the process-wide guard.
    pub fn new(config: &AdapterConfig, table: Arc<ClassTable>) -> Self {
        Self {
            table,
            container_config: config.container.clone(),
            failure_policy: config.hooks.failure_policy,
            guard: BootstrapGuard::process(),
            instances: Vec::new(),
        }
    }

    /// Replaces the guard.
    pub fn with_guard(mut self, guard: Arc<BootstrapGuard>) -> Self {
        self.guard = guard;
        self
    }

    /// Registers `value` as an instance binding under `id` in every container
    /// this bootstrapper builds.
    pub fn with_instance(mut self, id: impl Into<String>, value: Service) -> Self {
        self.instances.push((id.into(), value));
        self
    }

    /// Returns the guard.
    pub fn guard(&self) -> &Arc<BootstrapGuard> {
        &self.guard
    }

    /// Runs the bootstrap.
    ///
    /// A second call on the same guard does nothing and returns
    /// `AlreadyBootstrapped`. A failing phase aborts the bootstrap; the guard
    /// stays claimed.
    pub async fn run(
        &self,
        request: Request,
        host: Arc<dyn HostRegistry>,
    ) -> AppResult<BootstrapOutcome> {
        if let Err(e) = self.guard.claim() {
            warn!(request_id = %request.id, error = %e, "Duplicate bootstrap ignored");
            return Ok(BootstrapOutcome::AlreadyBootstrapped);
        }

        let mut sequence = Sequence::initialize(
            request,
            &host,
            self.table.clone(),
            &self.instances,
            &self.container_config,
            self.failure_policy,
        )?;
        sequence.discover_listeners().await?;
        sequence.init_plugins().await?;
        sequence.publish(host.as_ref())?;
        sequence.finish().await?;

        Ok(BootstrapOutcome::Completed(Box::new(Bootstrapped {
            container: sequence.container,
            report: sequence.report,
        })))
    }
}

/// State of one bootstrap in progress.
struct Sequence {
    state: BootstrapState,
    container: Arc<Container>,
    hooks: Arc<HookManager>,
    report: BootstrapReport,
}

impl Sequence {
    /// Uninitialized → Discovering: build the container and core bindings.
    fn initialize(
        request: Request,
        host: &Arc<dyn HostRegistry>,
        table: Arc<ClassTable>,
        instances: &[(String, Service)],
        config: &ContainerConfig,
        policy: ListenerFailurePolicy,
    ) -> AppResult<Self> {
        let state = BootstrapState::Uninitialized;
        let report = BootstrapReport::new(request.id);
        info!(request_id = %request.id, state = ?state, "Bootstrap started");

        let container = Container::from_config(config);
        container.set_host(host);

        let class_map = Arc::new(ClassMap::new(table, &container));
        container
            .set_factory(ids::SERVICE_LOCATOR, |c: &Container| c.handle())
            .set_instance(ids::REQUEST, Arc::new(request))
            .set_alias(ids::CONTAINER, ids::SERVICE_LOCATOR)
            .set_shared(ids::HOOK_MANAGER, move |_| {
                Ok(Arc::new(HookManager::new(policy)))
            })
            .set_instance(ids::CLASS_MAP_NAME, class_map)
            .set_alias(ids::CLASS_MAP, ids::CLASS_MAP_NAME)
            .set_shared(ids::SERVICE_SELECTOR, |c: &Container| {
                StandardServiceSelector::from_container(c).map(Arc::new)
            });
        for (id, value) in instances {
            container.set(id.clone(), Binding::instance(value.clone()));
        }

        let hooks = container.get_as::<HookManager>(ids::HOOK_MANAGER)?;

        Ok(Self {
            state: state.advance(BootstrapState::Discovering)?,
            container,
            hooks,
            report,
        })
    }

    /// Discovering → PluginInit: register listeners, fire `bootstrap.init`.
    async fn discover_listeners(&mut self) -> AppResult<()> {
        self.state.ensure(BootstrapState::Discovering)?;
        self.log_phase();

        let listeners = self
            .class_map()?
            .get_instances_by_interface::<dyn HookListener>()?;
        for listener in listeners {
            self.report
                .listeners
                .push(listener.listener_id().to_string());
            self.hooks.add_hook_listener(listener).await;
        }

        self.dispatch(LifecycleEvent::BootstrapInit).await?;
        self.state = self.state.advance(BootstrapState::PluginInit)?;
        Ok(())
    }

    /// PluginInit → Publishing: init every plugin once, fire `bootstrap.start`.
    async fn init_plugins(&mut self) -> AppResult<()> {
        self.state.ensure(BootstrapState::PluginInit)?;
        self.log_phase();

        let plugins = self.class_map()?.get_instances_by_interface::<dyn Plugin>()?;
        for plugin in plugins {
            plugin.init().await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Plugin,
                    format!("Plugin '{}' failed to initialize", plugin.plugin_id()),
                    e,
                )
            })?;
            self.report.plugins.push(plugin.plugin_id().to_string());
        }

        self.dispatch(LifecycleEvent::BootstrapStart).await?;
        self.state = self.state.advance(BootstrapState::Publishing)?;
        Ok(())
    }

    /// Publishing → Finished: insert every container service the host lacks.
    ///
    /// Every service is resolved before the first insert, so a failing
    /// resolve leaves the host registry untouched.
    fn publish(&mut self, host: &dyn HostRegistry) -> AppResult<()> {
        self.state.ensure(BootstrapState::Publishing)?;
        self.log_phase();

        let mut resolved: Vec<(String, Service)> = Vec::new();
        for id in self.container.service_list() {
            if host.contains(&id) {
                self.report.host_owned.push(id);
                continue;
            }
            let value = self.container.get(&id)?;
            resolved.push((id, value));
        }

        for (id, value) in resolved {
            host.insert(&id, value);
            self.report.published.push(id);
        }

        info!(
            request_id = %self.report.request_id,
            published = self.report.published.len(),
            host_owned = self.report.host_owned.len(),
            "Services published to host"
        );

        self.state = self.state.advance(BootstrapState::Finished)?;
        Ok(())
    }

    /// Finished: fire `bootstrap.finish`.
    async fn finish(&mut self) -> AppResult<()> {
        self.state.ensure(BootstrapState::Finished)?;

        self.dispatch(LifecycleEvent::BootstrapFinish).await?;
        self.report.finished_at = Some(Utc::now());

        info!(
            request_id = %self.report.request_id,
            listeners = self.report.listeners.len(),
            plugins = self.report.plugins.len(),
            "Bootstrap finished"
        );
        Ok(())
    }

    async fn dispatch(&mut self, event: LifecycleEvent) -> AppResult<()> {
        let report = self.hooks.dispatch(event.as_str()).await?;
        self.report.dispatches.push(report);
        Ok(())
    }

    fn class_map(&self) -> AppResult<Arc<ClassMap>> {
        self.container.get_as::<ClassMap>(ids::CLASS_MAP)
    }

    fn log_phase(&self) {
        info!(request_id = %self.report.request_id, state = ?self.state, "Bootstrap phase");
    }
}
