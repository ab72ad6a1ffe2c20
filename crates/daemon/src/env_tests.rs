// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn swaysock_wins_over_i3sock() {
    std::env::set_var("SWAYSOCK", "/run/user/1000/sway-ipc.sock");
    std::env::set_var("I3SOCK", "/run/user/1000/i3/ipc-socket");

    assert_eq!(socket_path(), Some(PathBuf::from("/run/user/1000/sway-ipc.sock")));

    std::env::remove_var("SWAYSOCK");
    std::env::remove_var("I3SOCK");
}

#[test]
#[serial]
fn i3sock_is_the_fallback() {
    std::env::set_var("SWAYSOCK", "");
    std::env::set_var("I3SOCK", "/run/user/1000/i3/ipc-socket");

    assert_eq!(socket_path(), Some(PathBuf::from("/run/user/1000/i3/ipc-socket")));

    std::env::remove_var("SWAYSOCK");
    std::env::remove_var("I3SOCK");
}

#[test]
#[serial]
fn no_socket_variables_means_no_socket() {
    std::env::remove_var("SWAYSOCK");
    std::env::remove_var("I3SOCK");

    assert_eq!(socket_path(), None);
}

#[test]
#[serial]
fn lull_config_overrides_the_xdg_location() {
    std::env::set_var("LULL_CONFIG", "/etc/lull.toml");

    assert_eq!(config_path(), Some(PathBuf::from("/etc/lull.toml")));

    std::env::remove_var("LULL_CONFIG");
    std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg");
    assert_eq!(config_path(), Some(PathBuf::from("/tmp/xdg/lull/config.toml")));
    std::env::remove_var("XDG_CONFIG_HOME");
}

#[test]
#[serial]
fn log_filter_defaults_to_info() {
    std::env::remove_var("LULL_LOG");
    assert_eq!(log_filter(), "info");

    std::env::set_var("LULL_LOG", "lull_engine=debug");
    assert_eq!(log_filter(), "lull_engine=debug");
    std::env::remove_var("LULL_LOG");
}
