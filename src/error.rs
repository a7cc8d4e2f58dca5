// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types reported by logging operations.
//!
//! All failures are reported synchronously to the immediate caller; nothing
//! in this crate retries.  Stream-write and formatting failures are
//! deliberately absent here: output is best-effort and never surfaces as an
//! error to the code that logged.

use thiserror::Error;

/// Failure of a logging operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A required argument was missing or malformed, such as an allocator
    /// record with absent entries.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An allocation through the context's allocator failed.  The operation
    /// was abandoned with prior state intact.
    #[error("out of memory")]
    OutOfMemory,

    /// The operation requires an initialized context.
    #[error("logging context is not initialized")]
    NotInitialized,
}

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
