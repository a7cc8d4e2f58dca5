// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::error::Error;

/// Severity of a log call, least to most severe.
///
/// The discriminants are wire-stable: external tooling that configures
/// thresholds numerically relies on them never changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum Severity {
    /// Detailed diagnostics, normally suppressed
    Debug = 0,
    /// Routine operational messages
    Info = 1,
    /// Suspicious condition
    Warn = 2,
    /// Runtime error
    Error = 3,
    /// Error the process is unlikely to survive
    Fatal = 4,
    /// Absence marker for registry entries.  Never an active threshold for a
    /// log call.
    Unset = 100,
}

impl Severity {
    /// Upper-case label as it appears in console output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Unset => "UNSET",
        }
    }

    /// The wire-stable integer value.
    pub const fn wire_value(self) -> i32 {
        self as i32
    }

    /// Inverse of [`Severity::wire_value`].
    pub const fn from_wire(value: i32) -> Option<Severity> {
        match value {
            0 => Some(Severity::Debug),
            1 => Some(Severity::Info),
            2 => Some(Severity::Warn),
            3 => Some(Severity::Error),
            4 => Some(Severity::Fatal),
            100 => Some(Severity::Unset),
            _ => None,
        }
    }

    pub const fn is_unset(self) -> bool {
        matches!(self, Severity::Unset)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = Error;

    /// Parses the upper-case labels produced by [`Severity::as_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "FATAL" => Ok(Severity::Fatal),
            "UNSET" => Ok(Severity::Unset),
            _ => Err(Error::InvalidArgument("unrecognized severity label")),
        }
    }
}
