// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character-search helpers.
//!
//! Small conveniences shared by the threshold resolver's ancestor walk and
//! the console template scanner.  Callers that need the "search only the
//! first `n` bytes" variants of these can slice the haystack instead; `&str`
//! carries its own length.

/// Byte index of the first occurrence of `needle` in `haystack`.
pub fn find_first(haystack: &str, needle: char) -> Option<usize> {
    haystack.find(needle)
}

/// Byte index of the last occurrence of `needle` in `haystack`.
pub fn find_last(haystack: &str, needle: char) -> Option<usize> {
    haystack.rfind(needle)
}
