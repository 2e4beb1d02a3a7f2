//! Pre-built [`tracing::Span`] constructors for ledger host operations.
//!
//! Consistent span names and field sets make it easy to filter and correlate
//! log lines belonging to one invocation.

use tracing::{info_span, Span};

/// Span covering a single invocation, from name resolution to commit.
pub fn invoke_span(operation: &str, arg_count: usize) -> Span {
    info_span!("invoke", operation = %operation, args = arg_count)
}

/// Span covering one line read by the request loop.
pub fn request_span(line_no: u64) -> Span {
    info_span!("request", line = line_no)
}
