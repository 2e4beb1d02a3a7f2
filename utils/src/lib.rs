//! Shared utilities for the token ledger workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
