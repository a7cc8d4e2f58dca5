// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lifecycle-scoped logging context.
//!
//! A [`Context`] owns everything one logging domain needs: the registry of
//! explicit thresholds, the process default threshold, the output handler,
//! and the allocator the registry charges its names against.  The
//! process-wide singleton in [`crate::global`] is just one of these behind a
//! lock; tests (and embedders that want isolated logging domains) construct
//! their own.
//!
//! # Thread safety
//!
//! The mutation contract is in the signatures: everything that mutates takes
//! `&mut self` and must be externally serialized - typically by doing all
//! configuration at startup, before concurrent logging begins.  Everything
//! on the log hot path ([`Context::is_enabled_for`],
//! [`Context::effective_threshold`], [`Context::log`]) takes `&self`, is
//! allocation-free, and may run from any number of threads at once.
//!
//! # Lifecycle
//!
//! Construction is initialization.  [`Context::shutdown`] releases the
//! registry and marks the context dead: mutating operations afterwards fail
//! fast with [`Error::NotInitialized`], and reads fall back to their
//! defaults.  Shutdown is idempotent.

use std::fmt;
use std::sync::Arc;

use crate::allocator::Allocator;
use crate::console_handler::ConsoleHandler;
use crate::error::{Error, Result};
use crate::handler::OutputHandler;
use crate::location::LogLocation;
use crate::registry::Registry;
use crate::severity::Severity;

/// Default severity threshold installed at initialization.
pub const DEFAULT_THRESHOLD: Severity = Severity::Info;

/// One independent logging domain.  See the [module docs](self).
#[derive(Debug)]
pub struct Context {
    registry: Registry,
    default_threshold: Severity,
    output_handler: Option<Arc<dyn OutputHandler>>,
    allocator: Allocator,
    initialized: bool,
}

impl Context {
    /// A context backed by the platform allocator.
    pub fn new() -> Self {
        // The platform record is complete by construction, so no validation
        // failure is possible on this path.
        Self::build(Allocator::default())
    }

    /// A context backed by `allocator`.
    ///
    /// Fails with [`Error::InvalidArgument`] when the record is missing any
    /// of its four entries, constructing nothing.
    pub fn with_allocator(allocator: Allocator) -> Result<Self> {
        if !allocator.is_valid() {
            return Err(Error::InvalidArgument(
                "allocator record is missing one or more entries",
            ));
        }
        Ok(Self::build(allocator))
    }

    fn build(allocator: Allocator) -> Self {
        Self {
            registry: Registry::new(),
            default_threshold: DEFAULT_THRESHOLD,
            output_handler: Some(Arc::new(ConsoleHandler::new())),
            allocator,
            initialized: true,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// The threshold applied when no ancestor has an explicit one.
    pub fn default_threshold(&self) -> Severity {
        self.default_threshold
    }

    /// Replaces the default threshold.  [`Severity::Unset`] is an absence
    /// marker, not an active threshold, and is rejected here.
    pub fn set_default_threshold(&mut self, severity: Severity) -> Result<()> {
        self.ensure_initialized()?;
        if severity.is_unset() {
            return Err(Error::InvalidArgument(
                "the default threshold must be an active severity",
            ));
        }
        self.default_threshold = severity;
        Ok(())
    }

    /// Sets `name`'s explicit threshold, creating the entry on first use.
    ///
    /// The empty name addresses the root of the hierarchy and routes to
    /// [`Context::set_default_threshold`].  Setting [`Severity::Unset`] on a
    /// named logger clears its explicit threshold without removing the
    /// entry, so the name inherits again.
    ///
    /// Fails with [`Error::OutOfMemory`] when duplicating a new name through
    /// the allocator fails; prior state is left unchanged.
    pub fn set_logger_threshold(&mut self, name: &str, severity: Severity) -> Result<()> {
        self.ensure_initialized()?;
        if name.is_empty() {
            return self.set_default_threshold(severity);
        }
        self.registry.set(&self.allocator, name, severity)
    }

    /// Explicit threshold for exactly `name`; [`Severity::Unset`] when none
    /// is set.  The empty name reads the default threshold.  Never
    /// allocates.  Ancestors are not consulted - that is
    /// [`Context::effective_threshold`]'s job.
    pub fn logger_threshold(&self, name: &str) -> Severity {
        if name.is_empty() {
            self.default_threshold
        } else {
            self.registry.get(name)
        }
    }

    /// Threshold actually applied to `name`: the nearest ancestor's explicit
    /// threshold (most specific wins, starting with `name` itself), or the
    /// default when the whole chain is unset.
    pub fn effective_threshold(&self, name: &str) -> Severity {
        self.registry.effective(name, self.default_threshold)
    }

    /// Whether a call at `severity` for `name` would be emitted: exactly
    /// `severity >= effective_threshold(name)`.  Pure and allocation-free;
    /// this is the gate in front of every log call.
    pub fn is_enabled_for(&self, name: &str, severity: Severity) -> bool {
        severity >= self.effective_threshold(name)
    }

    /// The currently installed handler, if any.
    pub fn output_handler(&self) -> Option<Arc<dyn OutputHandler>> {
        self.output_handler.clone()
    }

    /// Installs `handler` as the sink for every enabled log call.
    ///
    /// No validation is performed: `None` means log calls silently do
    /// nothing, by contract rather than by defensive guard, which keeps the
    /// hot path branch-light.
    pub fn set_output_handler(&mut self, handler: Option<Arc<dyn OutputHandler>>) {
        self.output_handler = handler;
    }

    /// The log entry point: checks enablement and, if enabled, hands the
    /// still-unformatted `args` to the current handler.
    ///
    /// Formatting is the handler's responsibility; this function formats
    /// nothing and mutates nothing.  Calls at [`Severity::Unset`] never
    /// emit.  Callers on a hot path should prefer the crate macros, which
    /// guard argument evaluation behind [`Context::is_enabled_for`].
    pub fn log(
        &self,
        location: Option<&LogLocation>,
        severity: Severity,
        name: &str,
        args: fmt::Arguments<'_>,
    ) {
        if severity.is_unset() {
            return;
        }
        if !self.is_enabled_for(name, severity) {
            return;
        }
        if let Some(handler) = &self.output_handler {
            handler.emit(location, severity, name, args);
        }
    }

    /// Flushes the handler and releases every registry entry.  Idempotent;
    /// mutating operations after this fail fast with
    /// [`Error::NotInitialized`].
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        if let Some(handler) = &self.output_handler {
            handler.prepare_to_die();
        }
        self.registry.clear();
        self.initialized = false;
    }

    /// The allocator this context charges registry names against.
    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    #[cfg(test)]
    pub(crate) fn registry_is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_handler::MemoryHandler;

    #[test]
    fn hierarchy_most_specific_wins() {
        let mut context = Context::new();
        context.set_logger_threshold("a", Severity::Warn).unwrap();
        context
            .set_logger_threshold("a.b.c", Severity::Debug)
            .unwrap();

        assert_eq!(context.effective_threshold("a.b"), Severity::Warn);
        assert_eq!(context.effective_threshold("a.b.c"), Severity::Debug);
        assert_eq!(context.effective_threshold("a"), Severity::Warn);
    }

    #[test]
    fn unset_chain_uses_default_at_call_time() {
        let mut context = Context::new();
        assert_eq!(context.effective_threshold("x.y"), DEFAULT_THRESHOLD);

        context.set_default_threshold(Severity::Error).unwrap();
        assert_eq!(context.effective_threshold("x.y"), Severity::Error);
    }

    #[test]
    fn enablement_is_exactly_the_comparison() {
        let mut context = Context::new();

        let severities = [
            Severity::Debug,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::Fatal,
        ];
        for severity in severities {
            for threshold in severities {
                context.set_logger_threshold("gate", threshold).unwrap();
                assert_eq!(
                    context.is_enabled_for("gate", severity),
                    severity >= threshold,
                    "severity {severity} against threshold {threshold}"
                );
            }
        }
    }

    #[test]
    fn empty_name_compares_against_default() {
        let mut context = Context::new();
        context.set_default_threshold(Severity::Warn).unwrap();
        assert!(!context.is_enabled_for("", Severity::Info));
        assert!(context.is_enabled_for("", Severity::Warn));
    }

    #[test]
    fn set_get_round_trip() {
        let mut context = Context::new();
        context
            .set_logger_threshold("node", Severity::Fatal)
            .unwrap();
        assert_eq!(context.logger_threshold("node"), Severity::Fatal);
    }

    #[test]
    fn exact_lookup_does_not_inherit() {
        let mut context = Context::new();
        context.set_logger_threshold("a", Severity::Warn).unwrap();
        assert_eq!(context.logger_threshold("a.b"), Severity::Unset);
    }

    #[test]
    fn empty_name_routes_to_default_threshold() {
        let mut context = Context::new();
        context.set_logger_threshold("", Severity::Fatal).unwrap();
        assert_eq!(context.default_threshold(), Severity::Fatal);
        assert_eq!(context.logger_threshold(""), Severity::Fatal);
        assert!(context.registry_is_empty());
    }

    #[test]
    fn unset_rejected_as_default_threshold() {
        let mut context = Context::new();
        assert!(context.set_default_threshold(Severity::Unset).is_err());
        assert!(context.set_logger_threshold("", Severity::Unset).is_err());
    }

    #[test]
    fn unset_clears_explicit_threshold() {
        let mut context = Context::new();
        context.set_logger_threshold("a", Severity::Error).unwrap();
        context.set_logger_threshold("a.b", Severity::Debug).unwrap();
        context.set_logger_threshold("a.b", Severity::Unset).unwrap();

        assert_eq!(context.logger_threshold("a.b"), Severity::Unset);
        assert_eq!(context.effective_threshold("a.b"), Severity::Error);
    }

    #[test]
    fn invalid_allocator_is_rejected() {
        let result = Context::with_allocator(Allocator::zero_initialized());
        assert_eq!(
            result.err(),
            Some(Error::InvalidArgument(
                "allocator record is missing one or more entries"
            ))
        );
    }

    #[test]
    fn allocation_failure_leaves_registry_intact() {
        let mut failing = Allocator::default();
        failing.allocate = Some(|_size, _state| None);

        let mut context = Context::with_allocator(failing).unwrap();
        assert_eq!(
            context.set_logger_threshold("fresh", Severity::Debug),
            Err(Error::OutOfMemory)
        );
        assert_eq!(context.logger_threshold("fresh"), Severity::Unset);
    }

    #[test]
    fn log_dispatches_to_handler() {
        let handler = Arc::new(MemoryHandler::new());
        let mut context = Context::new();
        context.set_output_handler(Some(handler.clone()));

        context.log(None, Severity::Error, "app", format_args!("failed: {}", 7));
        let records = handler.drain();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "failed: 7");
        assert_eq!(records[0].name, "app");
    }

    #[test]
    fn disabled_log_does_not_dispatch() {
        let handler = Arc::new(MemoryHandler::new());
        let mut context = Context::new();
        context.set_output_handler(Some(handler.clone()));
        context.set_logger_threshold("app", Severity::Error).unwrap();

        context.log(None, Severity::Info, "app", format_args!("quiet"));
        assert!(handler.is_empty());
    }

    #[test]
    fn unset_severity_never_emits() {
        let handler = Arc::new(MemoryHandler::new());
        let mut context = Context::new();
        context.set_output_handler(Some(handler.clone()));

        context.log(None, Severity::Unset, "app", format_args!("never"));
        assert!(handler.is_empty());
    }

    #[test]
    fn none_handler_silently_drops() {
        let mut context = Context::new();
        context.set_output_handler(None);
        // Nothing to assert beyond "does not panic".
        context.log(None, Severity::Fatal, "app", format_args!("dropped"));
    }

    #[test]
    fn shutdown_releases_registry_and_gates_mutation() {
        let mut context = Context::new();
        context.set_logger_threshold("a", Severity::Debug).unwrap();
        assert!(!context.registry_is_empty());

        context.shutdown();
        assert!(!context.is_initialized());
        assert!(context.registry_is_empty());
        assert_eq!(
            context.set_logger_threshold("a", Severity::Debug),
            Err(Error::NotInitialized)
        );
        assert_eq!(
            context.set_default_threshold(Severity::Warn),
            Err(Error::NotInitialized)
        );

        // Idempotent.
        context.shutdown();
        assert!(!context.is_initialized());
    }

    #[test]
    fn default_handler_is_installed() {
        let context = Context::new();
        assert!(context.output_handler().is_some());
    }
}
