//! Token ledger state machine.
//!
//! Tracks which accounts exist, what each holds, how much of one account's
//! balance another may move on its behalf, and a total supply fixed at
//! initialization. Callers address it by operation name with positional string
//! arguments ([`LedgerState::invoke`]) or through the typed methods.
//!
//! State lives in an injected [`token_store::KvStore`]; the ledger commits each
//! operation as one atomic batch after all of its preconditions pass.

pub mod error;
pub mod event;
pub mod genesis;
pub mod operation;
pub mod snapshot;
pub mod state;

pub use error::{ErrorKind, LedgerError};
pub use event::LedgerEvent;
pub use genesis::{GenesisConfig, DEFAULT_TOTAL_SUPPLY};
pub use operation::{Operation, OperationKind};
pub use snapshot::{AccountSnapshot, AllowanceSnapshot, LedgerSnapshot};
pub use state::{LedgerState, Receipt};
