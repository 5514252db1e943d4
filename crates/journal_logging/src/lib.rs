#![deny(missing_docs)]
//! Shared logging utilities for the journal workspace.
//!
//! This crate provides the `journal_*` logging macros used across the
//! codebase, a thread-local "active date" so faults can be traced back to
//! the day being processed, and a minimal test initializer for the global
//! logger.

use std::cell::RefCell;

thread_local! {
    /// Thread-local storage for the date currently being processed.
    static ACTIVE_DATE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Sets the active date for the current thread.
/// The batch driver calls this once per date iteration.
pub fn set_active_date(date: impl Into<String>) {
    ACTIVE_DATE.with(|v| *v.borrow_mut() = Some(date.into()));
}

/// Clears the active date for the current thread.
pub fn clear_active_date() {
    ACTIVE_DATE.with(|v| *v.borrow_mut() = None);
}

/// Retrieves the active date for the current thread, if one is set.
pub fn get_active_date() -> Option<String> {
    ACTIVE_DATE.with(|v| v.borrow().clone())
}

/// Formats a message with the active-date prefix when one is set.
/// Used by the `journal_*` macros; not intended for direct use.
pub fn with_date_context(message: String) -> String {
    match get_active_date() {
        Some(date) => format!("[{date}] {message}"),
        None => message,
    }
}

/// Logs a trace-level message with the active-date context.
#[macro_export]
macro_rules! journal_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}", $crate::with_date_context(format!($($arg)*)));
    }};
}

/// Logs an info-level message with the active-date context.
#[macro_export]
macro_rules! journal_info {
    ($($arg:tt)*) => {{
        log::info!("{}", $crate::with_date_context(format!($($arg)*)));
    }};
}

/// Logs a debug-level message with the active-date context.
#[macro_export]
macro_rules! journal_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}", $crate::with_date_context(format!($($arg)*)));
    }};
}

/// Logs a warn-level message with the active-date context.
#[macro_export]
macro_rules! journal_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}", $crate::with_date_context(format!($($arg)*)));
    }};
}

/// Logs an error-level message with the active-date context.
#[macro_export]
macro_rules! journal_error {
    ($($arg:tt)*) => {{
        log::error!("{}", $crate::with_date_context(format!($($arg)*)));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
