// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide logging context and its auto-initializing API.
//!
//! Most programs want exactly one logging domain, configured once at
//! startup.  This module keeps a single [`Context`] in a static slot behind
//! a reader/writer spinlock and mirrors every context operation as a free
//! function.  The crate macros funnel through [`is_enabled_for`] and [`log`]
//! here.
//!
//! # Auto-initialization
//!
//! Every function in this module initializes the slot with a
//! platform-allocator context on first use, so normal callers never invoke
//! [`initialize`] explicitly.  Call it (or
//! [`initialize_with_allocator`]) yourself when you need to control the
//! allocator or want initialization to happen at a known point.
//! Re-initializing an initialized system is a no-op; it never reallocates.
//!
//! # Thread safety
//!
//! Reads (enablement checks, threshold getters, log dispatch) take the lock
//! shared and are safe from any thread.  Mutations (threshold and handler
//! setters, [`initialize`], [`shutdown`]) take it exclusive; they are safe
//! in the data-race sense, but the single-threaded-mutation contract of
//! [`Context`] still applies in spirit: configure before you start logging
//! concurrently, or external ordering is on you.  The handler is cloned out
//! of the slot before emission, so slow sinks do not hold the lock.
//!
//! # Examples
//!
//! ```
//! use logtree::Severity;
//!
//! logtree::set_logger_threshold("app.net", Severity::Debug).unwrap();
//! assert!(logtree::is_enabled_for("app.net.client", Severity::Debug));
//!
//! logtree::info!("app.net", "listening on port {}", 8080);
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::allocator::Allocator;
use crate::context::{Context, DEFAULT_THRESHOLD};
use crate::error::{Error, Result};
use crate::handler::OutputHandler;
use crate::location::LogLocation;
use crate::severity::Severity;
use crate::spinlock::Spinlock;

/// Static storage for the process-wide context.  `None` means shut down or
/// never initialized.
static GLOBAL_CONTEXT: OnceLock<Spinlock<Option<Context>>> = OnceLock::new();

fn slot() -> &'static Spinlock<Option<Context>> {
    GLOBAL_CONTEXT.get_or_init(|| Spinlock::new(None))
}

fn ensure_initialized() {
    // Cheap shared-mode probe first; the exclusive pass re-checks.
    let needs_init = slot().with(|context| context.is_none());
    if needs_init {
        slot().with_mut(|context| {
            if context.is_none() {
                *context = Some(Context::new());
            }
        });
    }
}

/// Initializes the process-wide context with the platform allocator.
///
/// No-op when already initialized.  Auto-invoked by every other function in
/// this module, so calling it explicitly is only useful to pin down *when*
/// initialization happens.
pub fn initialize() -> Result<()> {
    ensure_initialized();
    Ok(())
}

/// Initializes the process-wide context with `allocator`.
///
/// Fails with [`Error::InvalidArgument`] when the record is incomplete,
/// leaving the system uninitialized.  No-op when already initialized (the
/// existing context and its allocator stay in place).
pub fn initialize_with_allocator(allocator: Allocator) -> Result<()> {
    slot().with_mut(|context| {
        if context.is_none() {
            *context = Some(Context::with_allocator(allocator)?);
        }
        Ok(())
    })
}

/// Shuts the process-wide context down, releasing the registry and the
/// handler.  Safe to call when already shut down.  The next call into this
/// module re-initializes from scratch.
pub fn shutdown() {
    slot().with_mut(|context| {
        if let Some(context) = context.as_mut() {
            context.shutdown();
        }
        *context = None;
    });
}

pub fn is_initialized() -> bool {
    slot().with(|context| context.is_some())
}

/// Global mirror of [`Context::set_default_threshold`].
pub fn set_default_threshold(severity: Severity) -> Result<()> {
    ensure_initialized();
    slot().with_mut(|context| match context.as_mut() {
        Some(context) => context.set_default_threshold(severity),
        None => Err(Error::NotInitialized),
    })
}

/// Global mirror of [`Context::default_threshold`].
pub fn default_threshold() -> Severity {
    ensure_initialized();
    slot().with(|context| {
        context
            .as_ref()
            .map_or(DEFAULT_THRESHOLD, Context::default_threshold)
    })
}

/// Global mirror of [`Context::set_logger_threshold`].
pub fn set_logger_threshold(name: &str, severity: Severity) -> Result<()> {
    ensure_initialized();
    slot().with_mut(|context| match context.as_mut() {
        Some(context) => context.set_logger_threshold(name, severity),
        None => Err(Error::NotInitialized),
    })
}

/// Global mirror of [`Context::logger_threshold`].
pub fn logger_threshold(name: &str) -> Severity {
    ensure_initialized();
    slot().with(|context| {
        context
            .as_ref()
            .map_or(Severity::Unset, |context| context.logger_threshold(name))
    })
}

/// Global mirror of [`Context::effective_threshold`].
pub fn effective_threshold(name: &str) -> Severity {
    ensure_initialized();
    slot().with(|context| {
        context.as_ref().map_or(DEFAULT_THRESHOLD, |context| {
            context.effective_threshold(name)
        })
    })
}

/// Global mirror of [`Context::is_enabled_for`].  This is the fast guard
/// the macros evaluate before touching their format arguments.
pub fn is_enabled_for(name: &str, severity: Severity) -> bool {
    ensure_initialized();
    slot().with(|context| {
        context
            .as_ref()
            .is_some_and(|context| context.is_enabled_for(name, severity))
    })
}

/// Global mirror of [`Context::set_output_handler`].  `None` silently drops
/// all output.
pub fn set_output_handler(handler: Option<Arc<dyn OutputHandler>>) {
    ensure_initialized();
    slot().with_mut(|context| {
        if let Some(context) = context.as_mut() {
            context.set_output_handler(handler);
        }
    });
}

/// Global mirror of [`Context::output_handler`].
pub fn output_handler() -> Option<Arc<dyn OutputHandler>> {
    ensure_initialized();
    slot().with(|context| context.as_ref().and_then(Context::output_handler))
}

/// The global log entry point: checks enablement against the process-wide
/// context and, if enabled, hands `args` to the current handler.
///
/// The handler is cloned out of the slot before emission, so the sink runs
/// without the global lock held.  Prefer the crate macros, which also guard
/// argument evaluation.
pub fn log(
    location: Option<&LogLocation>,
    severity: Severity,
    name: &str,
    args: fmt::Arguments<'_>,
) {
    ensure_initialized();
    let handler = slot().with(|context| match context.as_ref() {
        Some(context)
            if !severity.is_unset() && context.is_enabled_for(name, severity) =>
        {
            context.output_handler()
        }
        _ => None,
    });
    if let Some(handler) = handler {
        handler.emit(location, severity, name, args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_handler::MemoryHandler;
    use std::sync::Mutex;

    // The global slot is process state; these tests serialize on this guard
    // and leave the system shut down behind them.
    static GLOBAL_GUARD: Mutex<()> = Mutex::new(());

    fn with_clean_slate(f: impl FnOnce()) {
        let _guard = GLOBAL_GUARD.lock().unwrap();
        shutdown();
        f();
        shutdown();
    }

    #[test]
    fn auto_initializes_on_first_use() {
        with_clean_slate(|| {
            assert!(!is_initialized());
            assert_eq!(default_threshold(), DEFAULT_THRESHOLD);
            assert!(is_initialized());
        });
    }

    #[test]
    fn initialize_is_idempotent() {
        with_clean_slate(|| {
            initialize().unwrap();
            set_logger_threshold("keep", Severity::Fatal).unwrap();
            // A second initialize must not reset anything.
            initialize().unwrap();
            assert_eq!(logger_threshold("keep"), Severity::Fatal);
        });
    }

    #[test]
    fn lifecycle_round_trip_restores_defaults() {
        with_clean_slate(|| {
            initialize().unwrap();
            set_logger_threshold("a.b", Severity::Debug).unwrap();
            set_default_threshold(Severity::Fatal).unwrap();
            set_output_handler(Some(Arc::new(MemoryHandler::new())));

            shutdown();
            assert!(!is_initialized());

            initialize().unwrap();
            assert!(is_initialized());
            assert_eq!(logger_threshold("a.b"), Severity::Unset);
            assert_eq!(default_threshold(), DEFAULT_THRESHOLD);
            // The default console handler is back.
            assert!(output_handler().is_some());
        });
    }

    #[test]
    fn shutdown_twice_is_fine() {
        with_clean_slate(|| {
            initialize().unwrap();
            shutdown();
            shutdown();
            assert!(!is_initialized());
        });
    }

    #[test]
    fn incomplete_allocator_leaves_system_uninitialized() {
        with_clean_slate(|| {
            let result = initialize_with_allocator(Allocator::zero_initialized());
            assert!(result.is_err());
            assert!(!is_initialized());
        });
    }

    #[test]
    fn log_reaches_installed_handler() {
        with_clean_slate(|| {
            let handler = Arc::new(MemoryHandler::new());
            set_output_handler(Some(handler.clone()));

            log(None, Severity::Warn, "svc", format_args!("count {}", 3));
            let records = handler.drain();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].message, "count 3");
        });
    }

    #[test]
    fn disabled_log_is_dropped() {
        with_clean_slate(|| {
            let handler = Arc::new(MemoryHandler::new());
            set_output_handler(Some(handler.clone()));
            set_logger_threshold("svc", Severity::Error).unwrap();

            log(None, Severity::Debug, "svc", format_args!("nope"));
            assert!(handler.is_empty());
        });
    }

    #[test]
    fn effective_threshold_inherits_globally() {
        with_clean_slate(|| {
            set_logger_threshold("p", Severity::Warn).unwrap();
            assert_eq!(effective_threshold("p.child"), Severity::Warn);
        });
    }
}
