//! Base3 ILIAS adapter: simulated host request.
//!
//! Wires the adapter against in-memory host collaborators, runs the UI-hook
//! bootstrap the way the host would on two consecutive requests, performs a
//! configuration screen command, and prints what happened.

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use base3_core::config::AdapterConfig;
use base3_core::traits::HostRegistry;
use base3_ilias::{AdapterPlugin, ConfigGui, HtmlResponse, InMemoryHost, UiHook, builtin};
use base3_plugin::{BootstrapReport, Request};

/// Base3 ILIAS adapter
#[derive(Debug, Parser)]
#[command(name = "base3-adapter", version, about, long_about = None)]
struct Cli {
    /// Configuration overlay to load from `config/{env}`
    #[arg(short, long, default_value = "development")]
    env: String,

    /// Configuration screen command to perform
    #[arg(short, long, default_value = "general")]
    command: String,
}

/// Printed as JSON before the rendered markup.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    bootstrap: Option<&'a BootstrapReport>,
    second_request_skipped: bool,
    ui_hook: HtmlResponse,
    host_registry: Vec<String>,
    tabs: Vec<String>,
    active_tab: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AdapterConfig::load(&cli.env).context("Failed to load configuration")?;
    init_logging(&config);

    run(config, &cli.command).await
}

/// Initialize tracing/logging
fn init_logging(config: &AdapterConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(config: AdapterConfig, command: &str) -> anyhow::Result<()> {
    tracing::info!("Starting Base3 adapter v{}", env!("CARGO_PKG_VERSION"));

    let host = InMemoryHost::new();
    let context = host.context();
    let table = builtin::class_table();

    // Host loads the plugin before any hook runs.
    let plugin = AdapterPlugin::new(config.plugin.clone(), context.clone());
    plugin.init();

    let first = UiHook::new(
        &config,
        table.clone(),
        &context,
        Request::new().with_command(command),
    )
    .await
    .context("Bootstrap failed")?;
    let second = UiHook::new(&config, table, &context, Request::new())
        .await
        .context("Second request failed")?;

    let gui = ConfigGui::from_host(config.plugin.clone(), context)
        .context("Configuration screen unavailable")?;
    let html = gui.perform_command(command);

    let summary = RunSummary {
        bootstrap: first.outcome().completed().map(|done| &done.report),
        second_request_skipped: second.outcome().is_skipped(),
        ui_hook: first.get_html("", "", &Default::default()),
        host_registry: host.registry.keys(),
        tabs: host.tabs.ids(),
        active_tab: host.tabs.active(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!("{html}");
    Ok(())
}
