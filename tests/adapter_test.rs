//! End-to-end tests of the host adapter: plugin load, UI hook, and
//! configuration screen.

mod helpers;

use std::sync::Arc;

use base3_container::ids;
use base3_core::config::ListenerFailurePolicy;
use base3_core::traits::HostRegistry;
use base3_ilias::{AdapterPlugin, ConfigGui, UiHook};
use base3_plugin::{BootstrapGuard, Request};

use helpers::TableFixture;

#[tokio::test]
async fn test_request_then_configuration_screen() {
    let (table, _, _) = TableFixture::new()
        .with_builtins()
        .display("Reports", "reports", "<p>reports</p>")
        .build();
    let host = helpers::host();
    let config = helpers::config(ListenerFailurePolicy::Abort);

    AdapterPlugin::new(config.plugin.clone(), host.context()).init();
    let hook = UiHook::with_guard(
        &config,
        table,
        &host.context(),
        Request::new().with_command("services"),
        Arc::new(BootstrapGuard::new()),
    )
    .await
    .unwrap();
    assert!(!hook.outcome().is_skipped());

    let gui = ConfigGui::from_host(config.plugin.clone(), host.context()).unwrap();
    let html = gui.perform_command("services");

    assert_eq!(
        host.tabs.ids(),
        vec!["general", "schema", "reports", "services"]
    );
    assert_eq!(host.tabs.active().as_deref(), Some("services"));
    assert!(html.contains("<code>servicelocator</code>"));
    assert!(host.registry.contains("de.qualitus.plugin.base3iliasadapter"));
    assert!(host.registry.contains(ids::CONTAINER));
}

#[tokio::test]
async fn test_unknown_command_renders_general() {
    let (table, _, _) = TableFixture::new().with_builtins().build();
    let host = helpers::host();
    let config = helpers::config(ListenerFailurePolicy::Abort);

    UiHook::with_guard(
        &config,
        table,
        &host.context(),
        Request::new(),
        Arc::new(BootstrapGuard::new()),
    )
    .await
    .unwrap();

    let html = ConfigGui::from_host(config.plugin.clone(), host.context())
        .unwrap()
        .perform_command("; rm -rf /");

    assert_eq!(host.tabs.active().as_deref(), Some("general"));
    assert!(html.starts_with("<h2>Base3IliasAdapter</h2>"));
}

#[tokio::test]
async fn test_failed_bootstrap_leaves_no_container_for_the_screen() {
    let (table, _, _) = TableFixture::new()
        .listener_failing_on("L", Some("bootstrap.init"))
        .build();
    let host = helpers::host();
    let config = helpers::config(ListenerFailurePolicy::Abort);
    let guard = Arc::new(BootstrapGuard::new());

    let err = UiHook::with_guard(&config, table, &host.context(), Request::new(), guard.clone())
        .await
        .unwrap_err();

    assert_eq!(err.kind, base3_core::ErrorKind::ListenerFailure);
    assert!(guard.is_claimed());
    assert!(ConfigGui::from_host(config.plugin.clone(), host.context()).is_err());
}
