//! Token ledger host — runs the ledger for a process.
//!
//! The host is the layer between whatever transport delivers requests and the
//! ledger state machine. It:
//! - Serializes invocations behind a single lock
//! - Fans committed events out to subscribers
//! - Records Prometheus metrics per operation and failure kind
//! - Loads its configuration from TOML
//! - Speaks a newline-delimited JSON request/response format

pub mod config;
pub mod error;
pub mod host;
pub mod ledger_event;
pub mod metrics;
pub mod tracing_spans;
pub mod wire;

pub use config::NodeConfig;
pub use error::NodeError;
pub use host::LedgerHost;
pub use ledger_event::EventBus;
pub use metrics::NodeMetrics;
pub use wire::{handle_line, InvokeRequest, InvokeResponse};
