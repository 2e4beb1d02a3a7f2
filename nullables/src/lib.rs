//! Nullable infrastructure for deterministic testing.
//!
//! The ledger's only external dependency is its key-value store. This crate
//! provides an in-memory implementation that:
//! - Never touches the filesystem
//! - Is deterministic (ordered keys)
//! - Can be told to fail commits, to exercise error paths
//!
//! Usage: hand a [`NullStore`] to the ledger in tests, or to a host that
//! keeps state only for the lifetime of the process.

pub mod store;

pub use store::NullStore;
