// SPDX-License-Identifier: MIT OR Apache-2.0

//! The macro surface as a downstream crate sees it, with particular
//! attention to the promise that disabled calls evaluate nothing.

use logtree::{MemoryHandler, Severity};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

static GLOBAL_GUARD: Mutex<()> = Mutex::new(());

fn with_capture(f: impl FnOnce(&MemoryHandler)) {
    let _guard = GLOBAL_GUARD.lock().unwrap();
    logtree::shutdown();
    let handler = Arc::new(MemoryHandler::new());
    logtree::set_output_handler(Some(handler.clone()));
    f(&handler);
    logtree::shutdown();
}

/// A value whose Display impl must never run.
struct ExplodesWhenFormatted;

impl fmt::Display for ExplodesWhenFormatted {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("formatted an argument of a disabled log call");
    }
}

#[test]
fn enabled_macro_reaches_handler() {
    with_capture(|handler| {
        logtree::warn!("app", "capacity at {}%", 95);
        let records = handler.drain();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Warn);
        assert_eq!(records[0].name, "app");
        assert_eq!(records[0].message, "capacity at 95%");
    });
}

#[test]
fn macro_captures_call_site() {
    with_capture(|handler| {
        logtree::error!("app", "oops");
        let records = handler.drain();
        let location = records[0].location.expect("macro should attach a location");
        assert!(location.file_name.ends_with("macro_logging.rs"));
        assert!(location.line_number > 0);
    });
}

#[test]
fn disabled_call_formats_nothing() {
    with_capture(|handler| {
        logtree::set_logger_threshold("quiet", Severity::Error).unwrap();

        // Below threshold: the Display impl must not run.
        logtree::debug!("quiet", "value: {}", ExplodesWhenFormatted);
        logtree::info!("quiet", "value: {}", ExplodesWhenFormatted);
        logtree::warn!("quiet", "value: {}", ExplodesWhenFormatted);
        assert!(handler.is_empty());

        // At threshold it does run - proving the guard, not the argument,
        // is what kept the calls above quiet.
        let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logtree::error!("quiet", "value: {}", ExplodesWhenFormatted);
        }));
        assert!(panicked.is_err());
    });
}

#[test]
fn disabled_call_evaluates_no_arguments() {
    with_capture(|handler| {
        logtree::set_logger_threshold("quiet", Severity::Error).unwrap();
        let evaluations = AtomicUsize::new(0);
        let count = || evaluations.fetch_add(1, Ordering::SeqCst);

        logtree::debug!("quiet", "n = {}", count());
        assert_eq!(evaluations.load(Ordering::SeqCst), 0);

        logtree::fatal!("quiet", "n = {}", count());
        assert_eq!(evaluations.load(Ordering::SeqCst), 1);
        assert_eq!(handler.drain_messages(), "n = 0");
    });
}

#[test]
fn each_severity_macro_tags_correctly() {
    with_capture(|handler| {
        logtree::set_logger_threshold("m", Severity::Debug).unwrap();
        logtree::debug!("m", "a");
        logtree::info!("m", "b");
        logtree::warn!("m", "c");
        logtree::error!("m", "d");
        logtree::fatal!("m", "e");

        let severities: Vec<Severity> =
            handler.drain().into_iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Debug,
                Severity::Info,
                Severity::Warn,
                Severity::Error,
                Severity::Fatal,
            ]
        );
    });
}

#[test]
fn generic_log_macro_takes_severity_expression() {
    with_capture(|handler| {
        let severity = Severity::Fatal;
        logtree::log!(severity, "dyn", "picked at runtime");
        let records = handler.drain();
        assert_eq!(records[0].severity, Severity::Fatal);
    });
}

#[test]
fn empty_name_addresses_root() {
    with_capture(|handler| {
        logtree::set_default_threshold(Severity::Warn).unwrap();
        logtree::info!("", "below the root threshold");
        assert!(handler.is_empty());
        logtree::warn!("", "at the root threshold");
        assert_eq!(handler.drain().len(), 1);
    });
}
