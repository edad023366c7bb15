#![deny(missing_docs)]
//! Shared logging utilities for the sanjaya workspace.
//!
//! This crate provides the `sanjaya_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line is tagged
//! with the run id of the query currently being streamed on this thread, so
//! interleaved output from consecutive queries can be told apart.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the id of the query run being processed.
    static RUN_ID: Cell<u64> = const { Cell::new(0) };
}

/// Sets the run id for the current thread.
/// Called once per submitted query, before the stream is opened.
pub fn set_run_id(run_id: u64) {
    RUN_ID.with(|v| v.set(run_id));
}

/// Retrieves the run id for the current thread.
/// Returns 0 if no run has started.
pub fn current_run_id() -> u64 {
    RUN_ID.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current run id.
#[macro_export]
macro_rules! sanjaya_trace {
    ($($arg:tt)*) => {{
        log::trace!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current run id.
#[macro_export]
macro_rules! sanjaya_debug {
    ($($arg:tt)*) => {{
        log::debug!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current run id.
#[macro_export]
macro_rules! sanjaya_info {
    ($($arg:tt)*) => {{
        log::info!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current run id.
#[macro_export]
macro_rules! sanjaya_warn {
    ($($arg:tt)*) => {{
        log::warn!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current run id.
#[macro_export]
macro_rules! sanjaya_error {
    ($($arg:tt)*) => {{
        log::error!("[run {}] {}", $crate::current_run_id(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
