// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logger-name registry and threshold resolution.
//!
//! The registry is a table of explicitly configured thresholds keyed by
//! logger name.  Entries are only ever added or overwritten in place; the
//! table as a whole is dropped at shutdown.  Resolution walks the
//! dot-separated name hierarchy from most specific to least specific and is
//! allocation-free, since it runs on every enablement check.

use std::collections::HashMap;

use crate::allocator::Allocator;
use crate::error::Result;
use crate::find::find_last;
use crate::severity::Severity;

#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: HashMap<Box<str>, Severity>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Sets `name`'s explicit threshold, duplicating the name through
    /// `allocator` when the entry does not exist yet.
    ///
    /// On allocation failure nothing is mutated: a name that was never added
    /// still reads back as [`Severity::Unset`].
    pub(crate) fn set(
        &mut self,
        allocator: &Allocator,
        name: &str,
        severity: Severity,
    ) -> Result<()> {
        if let Some(slot) = self.entries.get_mut(name) {
            *slot = severity;
            return Ok(());
        }
        let key = allocator.duplicate_str(name)?;
        self.entries.insert(key, severity);
        Ok(())
    }

    /// Explicit threshold for exactly `name`; [`Severity::Unset`] when the
    /// name has no entry.  Never allocates.
    pub(crate) fn get(&self, name: &str) -> Severity {
        self.entries.get(name).copied().unwrap_or(Severity::Unset)
    }

    /// Effective threshold for `name`.
    ///
    /// Checks the full name, then each prefix ending immediately before a
    /// `.`, in order of decreasing length; the first explicit threshold
    /// wins.  Prefixes are taken exactly as they appear (`"a..b"` is
    /// followed by `"a."`, then `"a"`), but the empty prefix is never a
    /// valid ancestor key: a name like `".a"` falls straight through to
    /// `default` after its own lookup.
    pub(crate) fn effective(&self, name: &str, default: Severity) -> Severity {
        if name.is_empty() {
            return default;
        }
        let mut prefix = name;
        loop {
            let severity = self.get(prefix);
            if !severity.is_unset() {
                return severity;
            }
            match find_last(prefix, '.') {
                Some(dot) if dot > 0 => prefix = &prefix[..dot],
                _ => return default,
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
