// SPDX-License-Identifier: MIT OR Apache-2.0
/// Source location of a log call.
///
/// Locations are supplied by the caller and borrowed for `'static`: the
/// expectation is that they come from `file!()`, `line!()` and
/// `module_path!()`, whose literals live for the life of the program.  The
/// [`location!`](macro@crate::location) macro captures all three; the function
/// slot carries the module path, since Rust has no function-name macro in
/// std.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogLocation {
    /// Enclosing function, or the nearest thing the caller can name.
    pub function_name: &'static str,
    /// Source file of the call site.
    pub file_name: &'static str,
    /// 1-based line of the call site.
    pub line_number: u32,
}

impl LogLocation {
    pub const fn new(
        function_name: &'static str,
        file_name: &'static str,
        line_number: u32,
    ) -> Self {
        Self {
            function_name,
            file_name,
            line_number,
        }
    }
}

/*
Boilerplate notes.

# LogLocation

Copy is cheap (two pointers and an int) and call sites pass these around
freely, so it's in.  PartialEq/Eq/Hash are derived so records that carry a
location can themselves be compared and hashed.  Ord has no meaning for a
source position.  Default would imply some blessed "nowhere" location; an
Option at the use site says that better.  Display is the console handler's
job, which knows the template.
*/
