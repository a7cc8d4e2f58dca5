// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pluggable allocation capability record.
//!
//! The logging context obtains all of its dynamic memory through an
//! [`Allocator`]: a plain record of four function pointers plus an opaque
//! state handle, mirroring the platform allocator surface (`alloc`,
//! `dealloc`, `realloc`, `alloc_zeroed`).  A record is valid iff all four
//! entries are present.
//!
//! The interesting consumer is the logger registry, which duplicates every
//! stored logger name through the record.  Embedders can interpose a record
//! that accounts memory or injects failure without touching the process
//! allocator; the crate's own out-of-memory tests do exactly that.
//!
//! Buffers are plain `Vec<u8>`s, so ownership transfers through the entry
//! points and nothing here is unsafe.  The `deallocate` entry exists for
//! records that track their grants; buffers handed back through it must not
//! be used again.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;

/// Opaque state shared with the allocation entry points.
pub type AllocatorState = Arc<dyn Any + Send + Sync>;

/// Obtain an empty buffer with capacity for at least `size` bytes, or `None`
/// on exhaustion.
pub type AllocateFn = fn(size: usize, state: Option<&AllocatorState>) -> Option<Vec<u8>>;

/// Return a buffer to the record that granted it.
pub type DeallocateFn = fn(buffer: Vec<u8>, state: Option<&AllocatorState>);

/// Grow or shrink a previously granted buffer to hold `new_size` bytes, or
/// `None` on exhaustion (the original buffer is consumed either way).
pub type ReallocateFn =
    fn(buffer: Vec<u8>, new_size: usize, state: Option<&AllocatorState>) -> Option<Vec<u8>>;

/// Obtain a zero-filled buffer for `count` elements of `elem_size` bytes
/// each, or `None` on exhaustion or overflow.
pub type ZeroAllocateFn =
    fn(count: usize, elem_size: usize, state: Option<&AllocatorState>) -> Option<Vec<u8>>;

/// Allocation capability record.
///
/// Valid iff all four entries are [`Some`]; see [`Allocator::is_valid`].
/// [`Allocator::default`] is the platform-backed record and is always
/// complete.  [`Allocator::zero_initialized`] is the all-absent record,
/// useful for exercising validation paths.
#[derive(Clone)]
pub struct Allocator {
    pub allocate: Option<AllocateFn>,
    pub deallocate: Option<DeallocateFn>,
    pub reallocate: Option<ReallocateFn>,
    pub zero_allocate: Option<ZeroAllocateFn>,
    /// Passed through to every entry point; opaque to this crate.
    pub state: Option<AllocatorState>,
}

impl Allocator {
    /// The record with every entry absent.  Rejected by context
    /// construction; overwrite the entries before use.
    pub const fn zero_initialized() -> Self {
        Self {
            allocate: None,
            deallocate: None,
            reallocate: None,
            zero_allocate: None,
            state: None,
        }
    }

    /// Whether all four entries are present.
    pub fn is_valid(&self) -> bool {
        self.allocate.is_some()
            && self.deallocate.is_some()
            && self.reallocate.is_some()
            && self.zero_allocate.is_some()
    }

    /// Copies `s` into a buffer granted by this record.
    ///
    /// This is how the registry takes ownership of logger names, so that a
    /// record injecting failure makes `set` fail without mutating anything.
    pub(crate) fn duplicate_str(&self, s: &str) -> Result<Box<str>, Error> {
        let allocate = self
            .allocate
            .ok_or(Error::InvalidArgument("allocator record has no allocate entry"))?;
        let mut buffer =
            allocate(s.len(), self.state.as_ref()).ok_or(Error::OutOfMemory)?;
        buffer.clear();
        buffer.extend_from_slice(s.as_bytes());
        // The buffer was just filled from a `str`, so this conversion cannot
        // fail; the error arm only keeps the function total.
        String::from_utf8(buffer)
            .map(String::into_boxed_str)
            .map_err(|_| Error::OutOfMemory)
    }
}

fn platform_allocate(size: usize, _state: Option<&AllocatorState>) -> Option<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size).ok()?;
    Some(buffer)
}

fn platform_deallocate(buffer: Vec<u8>, _state: Option<&AllocatorState>) {
    drop(buffer);
}

fn platform_reallocate(
    mut buffer: Vec<u8>,
    new_size: usize,
    _state: Option<&AllocatorState>,
) -> Option<Vec<u8>> {
    let additional = new_size.saturating_sub(buffer.len());
    buffer.try_reserve_exact(additional).ok()?;
    buffer.truncate(new_size);
    Some(buffer)
}

fn platform_zero_allocate(
    count: usize,
    elem_size: usize,
    _state: Option<&AllocatorState>,
) -> Option<Vec<u8>> {
    let size = count.checked_mul(elem_size)?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size).ok()?;
    buffer.resize(size, 0);
    Some(buffer)
}

impl Default for Allocator {
    /// The platform-backed record.  Always complete.
    fn default() -> Self {
        Self {
            allocate: Some(platform_allocate),
            deallocate: Some(platform_deallocate),
            reallocate: Some(platform_reallocate),
            zero_allocate: Some(platform_zero_allocate),
            state: None,
        }
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("allocate", &self.allocate.is_some())
            .field("deallocate", &self.deallocate.is_some())
            .field("reallocate", &self.reallocate.is_some())
            .field("zero_allocate", &self.zero_allocate.is_some())
            .field("state", &self.state.is_some())
            .finish()
    }
}

/*
Boilerplate notes.

# Allocator

Clone is cheap (four pointers and an Arc bump) and contexts hand the record
to the registry by value, so it's in.  Debug is manual because the state is
`dyn Any`; presence flags are the useful part anyway.  PartialEq on function
pointers is a well-known footgun (the same function can compare unequal
across codegen units), so it stays out.  Default returns the *working*
platform record rather than the zero value, which gets its own named
constructor, because a Default that fails validation is a trap.
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_record_is_valid() {
        assert!(Allocator::default().is_valid());
    }

    #[test]
    fn zero_initialized_record_is_not() {
        assert!(!Allocator::zero_initialized().is_valid());
    }

    #[test]
    fn partial_record_is_not_valid() {
        let mut record = Allocator::default();
        record.reallocate = None;
        assert!(!record.is_valid());
    }

    #[test]
    fn duplicate_str_copies() {
        let record = Allocator::default();
        let copy = record.duplicate_str("a.b.c").unwrap();
        assert_eq!(&*copy, "a.b.c");
    }

    #[test]
    fn duplicate_str_reports_exhaustion() {
        let mut record = Allocator::default();
        record.allocate = Some(|_size, _state| None);
        assert_eq!(record.duplicate_str("a"), Err(Error::OutOfMemory));
    }

    #[test]
    fn zero_allocate_is_zeroed() {
        let record = Allocator::default();
        let zero_allocate = record.zero_allocate.unwrap();
        let buffer = zero_allocate(3, 4, None).unwrap();
        assert_eq!(buffer.len(), 12);
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_allocate_rejects_overflow() {
        let record = Allocator::default();
        let zero_allocate = record.zero_allocate.unwrap();
        assert!(zero_allocate(usize::MAX, 2, None).is_none());
    }

    #[test]
    fn reallocate_grows() {
        let record = Allocator::default();
        let allocate = record.allocate.unwrap();
        let reallocate = record.reallocate.unwrap();
        let buffer = allocate(4, None).unwrap();
        let grown = reallocate(buffer, 64, None).unwrap();
        assert!(grown.capacity() >= 64);
    }
}
