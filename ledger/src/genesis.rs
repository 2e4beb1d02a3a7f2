//! Initial ledger configuration.
//!
//! Total supply is fixed when the ledger is initialized and never changes
//! afterwards. By default no account holds any of it; an optional issuer
//! receives the whole supply as the genesis allocation.

use token_types::{AccountId, TokenAmount};

/// Supply used when nothing else is configured.
pub const DEFAULT_TOTAL_SUPPLY: u64 = 100_000_000_000;

/// Parameters applied by [`crate::LedgerState::initialize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisConfig {
    pub total_supply: TokenAmount,
    /// Account credited with the entire supply at initialization.
    pub issuer: Option<AccountId>,
}

impl GenesisConfig {
    pub fn new(total_supply: TokenAmount) -> Self {
        Self {
            total_supply,
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: AccountId) -> Self {
        self.issuer = Some(issuer);
        self
    }
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self::new(TokenAmount::new(DEFAULT_TOTAL_SUPPLY))
    }
}
