//! UI hook: the host's per-request entry point.
//!
//! The host constructs the hook early on every request. Construction runs
//! the bootstrap once per process; later constructions find the guard
//! claimed and do nothing. The hook never changes host markup.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use base3_container::ClassTable;
use base3_core::config::AdapterConfig;
use base3_core::result::AppResult;
use base3_plugin::{BootstrapGuard, BootstrapOutcome, Bootstrapper, Request};

use crate::host::{HOST_CONTAINER, HostContext, HostHandle};
use crate::paths::{INSTALLATION_PATHS, InstallationPaths};

/// How the host should combine returned markup with its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HtmlMode {
    Keep,
    Replace,
    Append,
    Prepend,
}

/// Answer to a host `get_html` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlResponse {
    pub mode: HtmlMode,
    pub html: String,
}

impl HtmlResponse {
    /// Leave the host markup untouched.
    pub fn keep() -> Self {
        Self {
            mode: HtmlMode::Keep,
            html: String::new(),
        }
    }
}

/// The adapter's UI hook.
#[derive(Debug)]
pub struct UiHook {
    outcome: BootstrapOutcome,
    paths: Arc<InstallationPaths>,
}

impl UiHook {
    /// Constructs the hook, bootstrapping under the process-wide guard.
    pub async fn new(
        config: &AdapterConfig,
        table: Arc<ClassTable>,
        host: &HostContext,
        request: Request,
    ) -> AppResult<Self> {
        Self::with_guard(config, table, host, request, BootstrapGuard::process()).await
    }

    /// Constructs the hook, bootstrapping under `guard`.
    pub async fn with_guard(
        config: &AdapterConfig,
        table: Arc<ClassTable>,
        host: &HostContext,
        request: Request,
        guard: Arc<BootstrapGuard>,
    ) -> AppResult<Self> {
        let paths = Arc::new(InstallationPaths::resolve(&config.paths));
        info!(
            request_id = %request.id,
            debug = config.debug,
            root = %paths.ilias_root.display(),
            "UI hook constructed"
        );

        let outcome = Bootstrapper::new(config, table)
            .with_guard(guard)
            .with_instance(INSTALLATION_PATHS, paths.clone())
            .with_instance(HOST_CONTAINER, Arc::new(HostHandle::new(&host.registry)))
            .run(request, host.registry.clone())
            .await?;

        Ok(Self { outcome, paths })
    }

    /// What the construction-time bootstrap did.
    pub fn outcome(&self) -> &BootstrapOutcome {
        &self.outcome
    }

    /// Installation layout resolved for this request.
    pub fn paths(&self) -> &InstallationPaths {
        &self.paths
    }

    /// Host markup callback. Always keeps the host markup.
    pub fn get_html(
        &self,
        _component: &str,
        _part: &str,
        _params: &BTreeMap<String, String>,
    ) -> HtmlResponse {
        HtmlResponse::keep()
    }
}
