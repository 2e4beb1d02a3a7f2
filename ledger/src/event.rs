//! Events describing committed ledger transitions.

use serde::Serialize;

use token_types::{AccountId, TokenAmount};

/// One effect of a successful operation, in the order it was applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// All state was wiped and the supply fixed.
    Initialized {
        total_supply: TokenAmount,
        issuer: Option<AccountId>,
    },
    /// An account came into existence with a zero balance (approval side effect).
    AccountCreated { account: AccountId },
    /// Tokens moved. `spender` is set when the move consumed an allowance.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: TokenAmount,
        spender: Option<AccountId>,
    },
    /// An allowance was set (overwritten, not added to).
    Approval {
        spender: AccountId,
        owner: AccountId,
        amount: TokenAmount,
    },
}
