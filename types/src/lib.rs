//! Fundamental types for the token ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identifiers, token amounts, and the parse errors raised when a raw
//! string argument cannot be turned into either.

pub mod address;
pub mod amount;
pub mod error;

pub use address::AccountId;
pub use amount::TokenAmount;
pub use error::TypeError;
