// SPDX-License-Identifier: MIT OR Apache-2.0

//! The built-in console sink.
//!
//! Formats one line per enabled log call from a template of `{token}`
//! substitutions and routes it by severity: `DEBUG` and `INFO` to stdout,
//! everything else to stderr.
//!
//! # The template
//!
//! Recognized tokens are `{severity}`, `{name}`, `{message}`,
//! `{function_name}`, `{file_name}`, `{line_number}` and `{time}` (seconds
//! `.` nanoseconds since the Unix epoch).  Anything else is passed through
//! verbatim: an unrecognized `{foo}` prints as-is, and a `{` with no closing
//! `}` copies the rest of the template literally.
//!
//! The template comes from the [`CONSOLE_OUTPUT_FORMAT_ENV`] environment
//! variable, read and parsed once at the handler's first emission and cached
//! for its lifetime; unset or empty falls back to
//! [`DEFAULT_OUTPUT_FORMAT`].  [`ConsoleHandler::with_format`] bypasses the
//! environment entirely, which is the right tool in tests.
//!
//! # Buffers
//!
//! Lines are rendered into a [`STACK_BUFFER_LEN`]-byte stack buffer in the
//! common case.  Output that does not fit is re-rendered into a heap buffer
//! sized by its content - long lines are never silently truncated - which is
//! released after the write.
//!
//! # Thread safety
//!
//! The handler holds no mutable state other than the one-time template
//! cache, so concurrent emissions are as safe as the platform stream locks.
//! Initializing the cache concurrently is benign (first writer wins) but the
//! environment read is not guaranteed to happen exactly once.

use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::find::find_first;
use crate::handler::OutputHandler;
use crate::location::LogLocation;
use crate::severity::Severity;

/// Environment variable consulted for the line template.
pub const CONSOLE_OUTPUT_FORMAT_ENV: &str = "LOGTREE_CONSOLE_OUTPUT_FORMAT";

/// Template used when the environment does not supply one.
pub const DEFAULT_OUTPUT_FORMAT: &str =
    "[{severity}] [{name}]: {message} ({function_name}() at {file_name}:{line_number})";

/// Bytes rendered on the stack before falling back to the heap.
pub const STACK_BUFFER_LEN: usize = 1024;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Severity,
    Name,
    Message,
    FunctionName,
    FileName,
    LineNumber,
    Time,
}

/// Splits `template` into literal runs and recognized tokens.
fn parse_format(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;
    loop {
        let Some(start) = find_first(rest, '{') else {
            literal.push_str(rest);
            break;
        };
        literal.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let Some(end) = find_first(candidate, '}') else {
            // No closing delimiter anywhere ahead; the rest is literal.
            literal.push_str(candidate);
            break;
        };
        let token = match &candidate[1..end] {
            "severity" => Some(Segment::Severity),
            "name" => Some(Segment::Name),
            "message" => Some(Segment::Message),
            "function_name" => Some(Segment::FunctionName),
            "file_name" => Some(Segment::FileName),
            "line_number" => Some(Segment::LineNumber),
            "time" => Some(Segment::Time),
            _ => None,
        };
        match token {
            Some(segment) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
                rest = &candidate[end + 1..];
            }
            None => {
                // Not a token: emit the delimiter and resume right after it,
                // since the remainder may hold more delimiters.
                literal.push('{');
                rest = &candidate[1..];
            }
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Destination stream for a severity; `None` for severities that are not
/// active log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stream {
    Stdout,
    Stderr,
}

pub(crate) fn stream_for(severity: Severity) -> Option<Stream> {
    match severity {
        Severity::Debug | Severity::Info => Some(Stream::Stdout),
        Severity::Warn | Severity::Error | Severity::Fatal => Some(Stream::Stderr),
        Severity::Unset => None,
    }
}

/// Fixed-capacity text buffer that refuses writes which would overflow,
/// so callers can detect the overflow and retry on the heap.
struct StackBuffer {
    bytes: [u8; STACK_BUFFER_LEN],
    len: usize,
}

impl StackBuffer {
    const fn new() -> Self {
        Self {
            bytes: [0; STACK_BUFFER_LEN],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        // Only whole `str`s are ever appended, so the contents are valid
        // UTF-8 up to len.
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }
}

impl fmt::Write for StackBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let incoming = s.as_bytes();
        let Some(end) = self.len.checked_add(incoming.len()) else {
            return Err(fmt::Error);
        };
        if end > STACK_BUFFER_LEN {
            return Err(fmt::Error);
        }
        self.bytes[self.len..end].copy_from_slice(incoming);
        self.len = end;
        Ok(())
    }
}

/// The default output handler: template-driven console formatting with
/// severity-based stream routing.  See the [module docs](self) for the
/// template language.
#[derive(Debug, Default)]
pub struct ConsoleHandler {
    segments: OnceLock<Vec<Segment>>,
}

impl ConsoleHandler {
    /// A handler that reads its template from the environment at first use.
    pub const fn new() -> Self {
        Self {
            segments: OnceLock::new(),
        }
    }

    /// A handler using `template` directly, never touching the environment.
    pub fn with_format(template: &str) -> Self {
        let handler = Self::new();
        let _ = handler.segments.set(parse_format(template));
        handler
    }

    fn segments(&self) -> &[Segment] {
        self.segments.get_or_init(|| match std::env::var(CONSOLE_OUTPUT_FORMAT_ENV) {
            Ok(template) if !template.is_empty() => parse_format(&template),
            Ok(_) | Err(std::env::VarError::NotPresent) => parse_format(DEFAULT_OUTPUT_FORMAT),
            Err(err) => {
                eprintln!(
                    "failed to read {CONSOLE_OUTPUT_FORMAT_ENV} from the environment: {err}; using the default output format"
                );
                parse_format(DEFAULT_OUTPUT_FORMAT)
            }
        })
    }

    /// Expands the template into `out`.  Fails only when `out` refuses a
    /// write, which the stack-buffer path uses to trigger the heap retry.
    pub(crate) fn render<W: fmt::Write>(
        &self,
        out: &mut W,
        location: Option<&LogLocation>,
        severity: Severity,
        name: &str,
        message: &str,
    ) -> fmt::Result {
        for segment in self.segments() {
            match segment {
                Segment::Literal(text) => out.write_str(text)?,
                Segment::Severity => out.write_str(severity.as_str())?,
                Segment::Name => out.write_str(name)?,
                Segment::Message => out.write_str(message)?,
                Segment::FunctionName => {
                    out.write_str(location.map_or("\"\"", |l| l.function_name))?
                }
                Segment::FileName => out.write_str(location.map_or("\"\"", |l| l.file_name))?,
                Segment::LineNumber => match location {
                    Some(l) => write!(out, "{}", l.line_number)?,
                    None => out.write_str("0")?,
                },
                Segment::Time => {
                    let now = SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .unwrap_or_default();
                    write!(out, "{}.{:09}", now.as_secs(), now.subsec_nanos())?;
                }
            }
        }
        Ok(())
    }
}

fn write_line(mut stream: impl std::io::Write, line: &str) {
    // Stream failures are deliberately best-effort; a broken pipe must not
    // take the logging caller down with it.
    let _ = stream.write_all(line.as_bytes());
    let _ = stream.write_all(b"\n");
}

impl OutputHandler for ConsoleHandler {
    fn emit(
        &self,
        location: Option<&LogLocation>,
        severity: Severity,
        name: &str,
        message: fmt::Arguments<'_>,
    ) {
        let Some(stream) = stream_for(severity) else {
            eprintln!("unknown severity level: {}", severity.wire_value());
            return;
        };

        // Format the message body, stack first.
        let mut body_stack = StackBuffer::new();
        let body_heap: String;
        let body: &str = if body_stack.write_fmt(message).is_ok() {
            body_stack.as_str()
        } else {
            body_heap = message.to_string();
            &body_heap
        };

        // Expand the template around it, stack first again.
        let mut line_stack = StackBuffer::new();
        let line_heap: String;
        let line: &str = if self
            .render(&mut line_stack, location, severity, name, body)
            .is_ok()
        {
            line_stack.as_str()
        } else {
            let mut grown = String::new();
            if self
                .render(&mut grown, location, severity, name, body)
                .is_err()
            {
                return;
            }
            line_heap = grown;
            &line_heap
        };

        match stream {
            Stream::Stdout => write_line(std::io::stdout().lock(), line),
            Stream::Stderr => write_line(std::io::stderr().lock(), line),
        }
    }

    fn prepare_to_die(&self) {
        // stderr is unbuffered; stdout may not be.
        let _ = std::io::stdout().lock().flush();
    }
}
