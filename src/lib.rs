//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# logtree

logtree is an opinionated hierarchical logging facility for Rust.

# The problem

Most logging crates treat the logger as an afterthought: there is one level
for the whole program (or at best per-module filtering bolted on through a
string DSL), and turning one subsystem up without drowning in everything
else's output is harder than it should be.

logtree starts from the logger *name*.  Names are dot-separated and form a
hierarchy: `app`, `app.net`, `app.net.client`.  A severity threshold set on
`app.net` applies to `app.net.client` and everything below it until
something more specific overrides it.  Resolution is most-specific-wins and
falls back to a process default when nothing in the chain says otherwise.

# Severities

| Name  | Usecase                                   | Console stream |
|-------|-------------------------------------------|----------------|
| debug | Detailed diagnostics, normally suppressed | stdout         |
| info  | Routine operational messages              | stdout         |
| warn  | Suspicious condition                      | stderr         |
| error | Runtime error                             | stderr         |
| fatal | The process is unlikely to survive this   | stderr         |

The default threshold is `info`.

# The API

```rust
logtree::set_logger_threshold("app.net", logtree::Severity::Debug).unwrap();

logtree::debug!("app.net.client", "connecting to {}:{}", "localhost", 4242);
logtree::warn!("app", "disk is {}% full", 93);
```

The process-wide context initializes itself on first use; nothing needs to
be called at startup unless you want a custom allocator
([`initialize_with_allocator`]) or a custom sink ([`set_output_handler`]).
Format arguments are only evaluated when the call is actually enabled, so a
disabled `debug!` costs a threshold lookup and nothing else.

# Contexts

All global functions are mirrors of methods on [`Context`], an explicit,
lifecycle-scoped logging domain you can construct yourself.  Tests in
particular should prefer their own `Context` over mutating process state.
Mutation takes `&mut self`; the hot path takes `&self` and is safe to share.

# Handlers

Every enabled log call is dispatched, unformatted, to the single installed
[`OutputHandler`].  The default is [`ConsoleHandler`], which renders a
template (configurable via the `LOGTREE_CONSOLE_OUTPUT_FORMAT` environment
variable) and routes by severity to stdout or stderr.  [`MemoryHandler`]
captures emissions for inspection.  Installing `None` drops all output.

```rust
use std::sync::Arc;
use logtree::{Context, MemoryHandler, Severity};

let handler = Arc::new(MemoryHandler::new());
let mut context = Context::new();
context.set_output_handler(Some(handler.clone()));

context.log(None, Severity::Info, "job", format_args!("finished in {}ms", 12));
assert_eq!(handler.drain_messages(), "finished in 12ms");
```
*/

mod allocator;
mod console_handler;
mod context;
mod error;
pub mod find;
pub mod global;
mod handler;
mod location;
mod macros;
mod memory_handler;
mod registry;
mod severity;
mod spinlock;

pub use allocator::{
    AllocateFn, Allocator, AllocatorState, DeallocateFn, ReallocateFn, ZeroAllocateFn,
};
pub use console_handler::{
    CONSOLE_OUTPUT_FORMAT_ENV, ConsoleHandler, DEFAULT_OUTPUT_FORMAT, STACK_BUFFER_LEN,
};
pub use context::{Context, DEFAULT_THRESHOLD};
pub use error::{Error, Result};
pub use global::{
    default_threshold, effective_threshold, initialize, initialize_with_allocator,
    is_enabled_for, is_initialized, log, logger_threshold, output_handler,
    set_default_threshold, set_logger_threshold, set_output_handler, shutdown,
};
pub use handler::OutputHandler;
pub use location::LogLocation;
pub use memory_handler::{CapturedRecord, MemoryHandler};
pub use severity::Severity;
