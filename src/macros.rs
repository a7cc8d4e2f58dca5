// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-site macros.
//!
//! These are thin wrappers over [`crate::log`] with two jobs: capture the
//! source location, and keep disabled log statements cheap.  The enablement
//! check runs *before* `format_args!` is constructed, so a disabled call
//! never evaluates its arguments - an expression with side effects (or one
//! that would panic) on the right-hand side of a disabled log line simply
//! does not run.
//!
//! The first argument is always the logger name; pass `""` to address the
//! root logger.
//!
//! ```
//! logtree::warn!("app.cache", "evicted {} entries", 128);
//! logtree::info!("", "root-level message");
//! ```

/// Captures the current source location.
///
/// The function slot carries `module_path!()`, the closest thing to a
/// function name std can produce.
#[macro_export]
macro_rules! location {
    () => {
        $crate::LogLocation::new(
            ::core::module_path!(),
            ::core::file!(),
            ::core::line!(),
        )
    };
}

/// Logs at `severity` for logger `name` through the process-wide context.
///
/// Format arguments are not evaluated unless the call is enabled.
#[macro_export]
macro_rules! log {
    ($severity:expr, $name:expr, $($arg:tt)+) => {{
        let severity = $severity;
        let name = $name;
        if $crate::is_enabled_for(name, severity) {
            $crate::log(
                ::core::option::Option::Some(&$crate::location!()),
                severity,
                name,
                ::core::format_args!($($arg)+),
            );
        }
    }};
}

/// Logs at [`Severity::Debug`](crate::Severity::Debug).
#[macro_export]
macro_rules! debug {
    ($name:expr, $($arg:tt)+) => {
        $crate::log!($crate::Severity::Debug, $name, $($arg)+)
    };
}

/// Logs at [`Severity::Info`](crate::Severity::Info).
#[macro_export]
macro_rules! info {
    ($name:expr, $($arg:tt)+) => {
        $crate::log!($crate::Severity::Info, $name, $($arg)+)
    };
}

/// Logs at [`Severity::Warn`](crate::Severity::Warn).
#[macro_export]
macro_rules! warn {
    ($name:expr, $($arg:tt)+) => {
        $crate::log!($crate::Severity::Warn, $name, $($arg)+)
    };
}

/// Logs at [`Severity::Error`](crate::Severity::Error).
#[macro_export]
macro_rules! error {
    ($name:expr, $($arg:tt)+) => {
        $crate::log!($crate::Severity::Error, $name, $($arg)+)
    };
}

/// Logs at [`Severity::Fatal`](crate::Severity::Fatal).
#[macro_export]
macro_rules! fatal {
    ($name:expr, $($arg:tt)+) => {
        $crate::log!($crate::Severity::Fatal, $name, $($arg)+)
    };
}
