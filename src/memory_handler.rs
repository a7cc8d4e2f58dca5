// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-memory handler
//!
//! An [`OutputHandler`] that captures emissions in memory instead of writing
//! them to a stream.  Useful for:
//!
//! - Unit testing code that logs, including this crate's own tests
//! - Capturing logs where stdout/stderr are redirected or unavailable
//! - Programmatically examining what was emitted
//!
//! Records are stored behind a mutex, so the handler can be shared across
//! threads like any other handler.
//!
//! ## Testing example
//!
//! ```rust
//! use logtree::{Context, MemoryHandler, Severity};
//! use std::sync::Arc;
//!
//! let handler = Arc::new(MemoryHandler::new());
//! let mut context = Context::new();
//! context.set_output_handler(Some(handler.clone()));
//!
//! context.log(None, Severity::Warn, "job.queue", format_args!("{} stalled", 3));
//!
//! let records = handler.drain();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].severity, Severity::Warn);
//! assert_eq!(records[0].name, "job.queue");
//! assert_eq!(records[0].message, "3 stalled");
//! ```

use std::fmt;
use std::sync::Mutex;

use crate::handler::OutputHandler;
use crate::location::LogLocation;
use crate::severity::Severity;

/// One captured emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub severity: Severity,
    pub name: String,
    pub message: String,
    pub location: Option<LogLocation>,
}

/// An output handler that stores every emission in a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryHandler {
    records: Mutex<Vec<CapturedRecord>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: derived; required by OutputHandler and useful in test failures
// - Default: derived; the zero value (empty buffer) is the obvious one
// - Clone: NOT implemented - two handles onto the same buffer is what Arc is
//   for, and a deep copy is never what a test wants
// - PartialEq/Hash: NOT implemented - comparing mutex state is problematic
// - Send/Sync: automatic via the Mutex, and required by OutputHandler

impl MemoryHandler {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Takes all captured records, leaving the buffer empty.
    pub fn drain(&self) -> Vec<CapturedRecord> {
        let mut records = self.records.lock().unwrap();
        std::mem::take(&mut *records)
    }

    /// Takes all captured message bodies joined by newlines, leaving the
    /// buffer empty.  Convenient for `contains` assertions.
    pub fn drain_messages(&self) -> String {
        let records = self.drain();
        records
            .iter()
            .map(|record| record.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of records currently buffered.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutputHandler for MemoryHandler {
    fn emit(
        &self,
        location: Option<&LogLocation>,
        severity: Severity,
        name: &str,
        message: fmt::Arguments<'_>,
    ) {
        let record = CapturedRecord {
            severity,
            name: name.to_string(),
            message: message.to_string(),
            location: location.copied(),
        };
        self.records.lock().unwrap().push(record);
    }

    fn prepare_to_die(&self) {
        // records live in memory; nothing to flush
    }
}
