// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber setup for `lulld`.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::env;

/// Install the global subscriber. Logs go to stderr, or to `file` when
/// given. Keep the returned guard alive until exit so buffered lines are
/// flushed.
pub fn init(file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new(env::DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let Some(path) = file else {
        let _ = builder.with_writer(std::io::stderr).try_init();
        return None;
    };
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let name = path.file_name().map(OsStr::to_os_string).unwrap_or_else(|| OsString::from("lulld.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    let _ = builder.with_ansi(false).with_writer(writer).try_init();
    Some(guard)
}
