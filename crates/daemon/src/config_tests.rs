// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = Config::load(&dir.path().join("config.toml")).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn empty_file_yields_defaults() {
    assert_eq!(Config::parse("").unwrap(), Config::default());
}

#[test]
fn full_settings_file() {
    let config = Config::parse(
        r#"
        socket = "/tmp/sway.sock"
        pool_size = 2
        eager = false
        backoff_ms = 250
        request_timeout_ms = 3000
        max_decode_faults = 8
        battery_target = "battery.target"
        tasks = ["battery_pause"]

        [policy]
        never_signal = ["keepassxc"]
        no_recursion = ["kitty"]

        [timings]
        settle = 20
        wake_interval = 120

        [subscriptions.window]
        focus = "visibility"
        "#,
    )
    .unwrap();

    assert_eq!(config.socket, Some(PathBuf::from("/tmp/sway.sock")));
    assert_eq!(config.battery_target.as_deref(), Some("battery.target"));
    assert!(config.policy.never_signal.contains("keepassxc"));
    // a given list replaces the default one
    assert!(!config.policy.no_recursion.contains("foot"));
    assert_eq!(config.timings.settle, Duration::from_millis(20));
    assert_eq!(config.timings.wake_interval, Duration::from_secs(120));
    assert_eq!(config.timings.grace, Timings::default().grace);
    assert_eq!(config.subscriptions.len(), 1);

    let connection = config.connection();
    assert_eq!(connection.pool_size, 2);
    assert!(!connection.eager);
    assert_eq!(connection.channel.backoff, Duration::from_millis(250));
    assert_eq!(connection.channel.request_timeout, Some(Duration::from_secs(3)));
    assert_eq!(connection.max_decode_faults, Some(8));
}

#[test]
fn default_subscriptions_resolve() {
    let registry = Config::default().registry().unwrap();

    assert_eq!(
        registry.events(),
        vec![EventKind::Workspace, EventKind::Output, EventKind::Window, EventKind::Binding]
    );
    let (name, _) = registry.lookup(EventKind::Window, "focus").unwrap();
    assert_eq!(name, "fullscreen");
    assert!(registry.lookup(EventKind::Window, "title").is_none());
}

#[test]
fn default_tasks_resolve() {
    let tasks = Config::default().periodic_tasks().unwrap();

    let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["wake_timer", "battery_pause"]);
}

#[yare::parameterized(
    unknown_event = { "[subscriptions.windows]\nfocus = \"signal_all\"", "unknown event: windows" },
    sentinel_event = { "[subscriptions.error]\nrun = \"signal_all\"", "unknown event: error" },
    unknown_handler = { "[subscriptions.window]\nfocus = \"freeze\"", "unknown handler \"freeze\" for window/focus" },
)]
fn bad_subscriptions_are_rejected(toml: &str, message: &str) {
    let err = Config::parse(toml).unwrap().registry().unwrap_err();

    assert_eq!(err.to_string(), message);
}

#[test]
fn unknown_task_is_rejected() {
    let config = Config::parse("tasks = [\"wake_timer\", \"nap\"]").unwrap();

    assert!(matches!(config.periodic_tasks(), Err(ConfigError::UnknownTask(name)) if name == "nap"));
}

#[test]
fn unknown_keys_fail_to_parse() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "pool = 3\n").unwrap();

    assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
}
