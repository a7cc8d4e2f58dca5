// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::location::LogLocation;
use crate::severity::Severity;
use std::fmt;
use std::fmt::Debug;

/// Sink invoked once per enabled log call.
///
/// Exactly one handler is installed on a context at a time; replace it to
/// redirect logs to files, the network, or a structured sink, or wrap the
/// default console handler to decorate its output.
pub trait OutputHandler: Debug + Send + Sync {
    /**
        Emits one enabled log call.

        `message` arrives unformatted; rendering it (or discarding it) is the
        handler's decision.  `location` is absent when the call site did not
        supply one.
    */
    fn emit(
        &self,
        location: Option<&LogLocation>,
        severity: Severity,
        name: &str,
        message: fmt::Arguments<'_>,
    );

    /**
    The application may imminently exit.  Ensure all buffers are flushed and
    up to date.  Contexts call this once during shutdown.
    */
    fn prepare_to_die(&self);
}

/*
Boilerplate notes.

# OutputHandler

Send + Sync are required: handlers are shared behind an Arc and emit may be
called from any thread.  Debug is required so contexts holding a handler can
themselves derive Debug.  Clone on the trait makes no sense (handlers own
sinks); equality is similarly murky - data equality vs provenance - so
neither is required of implementors.
*/
