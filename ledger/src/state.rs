//! The ledger state machine.

use tracing::debug;

use token_store::{decode_u64, KvStore, StateKey, StoreError, WriteBatch};
use token_types::{AccountId, TokenAmount};

use crate::event::LedgerEvent;
use crate::genesis::GenesisConfig;
use crate::operation::{Operation, OperationKind};
use crate::snapshot::LedgerSnapshot;
use crate::LedgerError;

/// Outcome of a successful operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Empty for mutating operations; 8-byte little-endian amount for reads.
    pub payload: Vec<u8>,
    pub events: Vec<LedgerEvent>,
}

impl Receipt {
    fn events(events: Vec<LedgerEvent>) -> Self {
        Self {
            payload: Vec::new(),
            events,
        }
    }

    fn amount(amount: TokenAmount) -> Self {
        Self {
            payload: amount.to_le_bytes().to_vec(),
            events: Vec::new(),
        }
    }

    /// Decode the payload of a read operation.
    pub fn as_amount(&self) -> Option<TokenAmount> {
        let bytes: [u8; 8] = self.payload.as_slice().try_into().ok()?;
        Some(TokenAmount::from_le_bytes(bytes))
    }
}

/// Balances, allowances, and total supply of one token, kept in an injected
/// [`KvStore`].
///
/// Every operation checks all of its preconditions before writing anything,
/// then commits its writes as one [`WriteBatch`]. A failed operation therefore
/// leaves the store exactly as it found it. Mutating methods take `&mut self`;
/// hosts sharing a ledger between callers wrap it in a lock.
pub struct LedgerState<S> {
    store: S,
    genesis: GenesisConfig,
}

impl<S: KvStore> LedgerState<S> {
    /// Wrap `store`. Nothing is written until [`Self::initialize`] runs.
    pub fn new(store: S, genesis: GenesisConfig) -> Self {
        Self { store, genesis }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn genesis(&self) -> &GenesisConfig {
        &self.genesis
    }

    /// Resolve `name` against the operation table and execute it.
    pub fn invoke<A: AsRef<str>>(&mut self, name: &str, args: &[A]) -> Result<Receipt, LedgerError> {
        let op = Operation::parse(name, args)?;
        self.execute(op)
    }

    /// Execute a resolved operation.
    ///
    /// Precondition order is part of the contract: identifiers are checked
    /// for existence before the amount is parsed, so `transfer` from a
    /// missing account with amount `"abc"` reports `NotFound`.
    pub fn execute(&mut self, op: Operation) -> Result<Receipt, LedgerError> {
        let kind = op.kind();
        match op {
            Operation::Init => self.initialize(),
            Operation::BalanceOf { address } => {
                let balance = self.require_balance(kind, &address)?;
                Ok(Receipt::amount(balance))
            }
            Operation::Transfer { from, to, amount } => {
                let from_balance = self.require_balance(kind, &from)?;
                let to_balance = self.require_balance(kind, &to)?;
                let amount = parse_amount(kind, &amount)?;
                self.apply_transfer(kind, &from, from_balance, &to, to_balance, amount, None)
            }
            Operation::TransferFrom {
                from,
                to,
                spender,
                amount,
            } => {
                let from_balance = self.require_balance(kind, &from)?;
                let to_balance = self.require_balance(kind, &to)?;
                let amount = parse_amount(kind, &amount)?;
                self.apply_transfer(
                    kind,
                    &from,
                    from_balance,
                    &to,
                    to_balance,
                    amount,
                    Some(&spender),
                )
            }
            Operation::Approve {
                spender,
                owner,
                amount,
            } => {
                self.require_balance(kind, &owner)?;
                let amount = parse_amount(kind, &amount)?;
                self.apply_approve(&spender, &owner, amount)
            }
            Operation::TotalSupply => Ok(Receipt::amount(self.total_supply()?)),
            Operation::Allowance { spender, owner } => {
                Ok(Receipt::amount(self.allowance(&spender, &owner)?))
            }
        }
    }

    /// Wipe all state and fix the total supply.
    ///
    /// With an issuer configured, the issuer account is created holding the
    /// entire supply. Otherwise no account exists afterwards. An empty issuer
    /// is rejected before anything is wiped.
    pub fn initialize(&mut self) -> Result<Receipt, LedgerError> {
        let supply = self.genesis.total_supply;
        let issuer = self.genesis.issuer.clone();

        let mut batch = WriteBatch::truncating();
        batch.put_u64(&StateKey::TotalSupply, supply.raw())?;
        if let Some(issuer) = &issuer {
            issuer
                .require_non_empty()
                .map_err(|e| LedgerError::InvalidArgument {
                    operation: OperationKind::Init,
                    argument: "issuer",
                    reason: e.to_string(),
                })?;
            batch.put_u64(&StateKey::Balance(issuer.clone()), supply.raw())?;
        }
        self.store.commit(batch)?;

        debug!(total_supply = %supply, issuer = ?issuer.as_ref().map(AccountId::as_str), "ledger initialized");
        Ok(Receipt::events(vec![LedgerEvent::Initialized {
            total_supply: supply,
            issuer,
        }]))
    }

    /// Balance of an existing account.
    pub fn balance_of(&self, address: &AccountId) -> Result<TokenAmount, LedgerError> {
        self.require_balance(OperationKind::BalanceOf, address)
    }

    /// Whether `address` has been registered.
    pub fn exists(&self, address: &AccountId) -> Result<bool, LedgerError> {
        Ok(self
            .store
            .contains(&StateKey::Balance(address.clone()).encode()?)?)
    }

    /// Move `amount` from `from` to `to` without consulting any allowance.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: TokenAmount,
    ) -> Result<Receipt, LedgerError> {
        let kind = OperationKind::Transfer;
        let from_balance = self.require_balance(kind, from)?;
        let to_balance = self.require_balance(kind, to)?;
        self.apply_transfer(kind, from, from_balance, to, to_balance, amount, None)
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// `spender`'s allowance over `from`.
    pub fn transfer_from(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        spender: &AccountId,
        amount: TokenAmount,
    ) -> Result<Receipt, LedgerError> {
        let kind = OperationKind::TransferFrom;
        let from_balance = self.require_balance(kind, from)?;
        let to_balance = self.require_balance(kind, to)?;
        self.apply_transfer(kind, from, from_balance, to, to_balance, amount, Some(spender))
    }

    /// Set `spender`'s allowance over `owner`'s tokens to exactly `amount`.
    ///
    /// The owner must exist. A spender that does not exist yet is created
    /// with a zero balance; this is the only way accounts come into being
    /// after initialization. The empty identifier is never created.
    pub fn approve(
        &mut self,
        spender: &AccountId,
        owner: &AccountId,
        amount: TokenAmount,
    ) -> Result<Receipt, LedgerError> {
        self.require_balance(OperationKind::Approve, owner)?;
        self.apply_approve(spender, owner, amount)
    }

    /// Remaining allowance of `spender` over `owner`. Zero if never granted.
    pub fn allowance(
        &self,
        spender: &AccountId,
        owner: &AccountId,
    ) -> Result<TokenAmount, LedgerError> {
        let key = StateKey::Allowance {
            spender: spender.clone(),
            owner: owner.clone(),
        };
        Ok(self.read_u64(&key)?.map(TokenAmount::new).unwrap_or_default())
    }

    /// Total supply fixed at initialization. Zero before the first `initialize`.
    pub fn total_supply(&self) -> Result<TokenAmount, LedgerError> {
        Ok(self
            .read_u64(&StateKey::TotalSupply)?
            .map(TokenAmount::new)
            .unwrap_or_default())
    }

    /// Capture every balance and non-zero allowance.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        LedgerSnapshot::capture(&self.store)
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn read_u64(&self, key: &StateKey) -> Result<Option<u64>, LedgerError> {
        match self.store.get(&key.encode()?)? {
            Some(bytes) => Ok(Some(decode_u64(key, &bytes)?)),
            None => Ok(None),
        }
    }

    fn require_balance(
        &self,
        operation: OperationKind,
        account: &AccountId,
    ) -> Result<TokenAmount, LedgerError> {
        self.read_u64(&StateKey::Balance(account.clone()))?
            .map(TokenAmount::new)
            .ok_or_else(|| LedgerError::NotFound {
                operation,
                account: account.clone(),
            })
    }

    /// Shared tail of `transfer` and `transferFrom`, run once both accounts
    /// are known to exist. The allowance check precedes the funds check.
    #[allow(clippy::too_many_arguments)]
    fn apply_transfer(
        &mut self,
        operation: OperationKind,
        from: &AccountId,
        from_balance: TokenAmount,
        to: &AccountId,
        to_balance: TokenAmount,
        amount: TokenAmount,
        spender: Option<&AccountId>,
    ) -> Result<Receipt, LedgerError> {
        let mut batch = WriteBatch::new();

        if let Some(spender) = spender {
            let allowed = self.allowance(spender, from)?;
            let remaining =
                allowed
                    .checked_sub(amount)
                    .ok_or_else(|| LedgerError::AllowanceExceeded {
                        operation,
                        spender: spender.clone(),
                        owner: from.clone(),
                        allowed,
                        requested: amount,
                    })?;
            put_allowance(&mut batch, spender, from, remaining)?;
        }

        let debited = from_balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                operation,
                account: from.clone(),
                needed: amount,
                available: from_balance,
            })?;

        // A self-transfer leaves the balance as it was; writing both sides
        // would let the credit overwrite the debit.
        if from != to {
            let credited =
                to_balance
                    .checked_add(amount)
                    .ok_or_else(|| LedgerError::BalanceOverflow {
                        operation,
                        account: to.clone(),
                    })?;
            batch.put_u64(&StateKey::Balance(from.clone()), debited.raw())?;
            batch.put_u64(&StateKey::Balance(to.clone()), credited.raw())?;
        }

        if !batch.is_empty() {
            self.store.commit(batch)?;
        }

        debug!(
            operation = %operation,
            from = %from,
            to = %to,
            spender = ?spender.map(AccountId::as_str),
            amount = %amount,
            "tokens moved"
        );
        Ok(Receipt::events(vec![LedgerEvent::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount,
            spender: spender.cloned(),
        }]))
    }

    fn apply_approve(
        &mut self,
        spender: &AccountId,
        owner: &AccountId,
        amount: TokenAmount,
    ) -> Result<Receipt, LedgerError> {
        let mut batch = WriteBatch::new();
        let mut events = Vec::with_capacity(2);

        if !self.exists(spender)? {
            spender
                .require_non_empty()
                .map_err(|e| LedgerError::InvalidArgument {
                    operation: OperationKind::Approve,
                    argument: "spender",
                    reason: e.to_string(),
                })?;
            batch.put_u64(&StateKey::Balance(spender.clone()), 0)?;
            events.push(LedgerEvent::AccountCreated {
                account: spender.clone(),
            });
        }
        put_allowance(&mut batch, spender, owner, amount)?;
        self.store.commit(batch)?;

        debug!(spender = %spender, owner = %owner, amount = %amount, created = events.len() > 1, "allowance set");
        events.push(LedgerEvent::Approval {
            spender: spender.clone(),
            owner: owner.clone(),
            amount,
        });
        Ok(Receipt::events(events))
    }
}

/// A zero allowance is stored as an absent key.
fn put_allowance(
    batch: &mut WriteBatch,
    spender: &AccountId,
    owner: &AccountId,
    amount: TokenAmount,
) -> Result<(), StoreError> {
    let key = StateKey::Allowance {
        spender: spender.clone(),
        owner: owner.clone(),
    };
    if amount.is_zero() {
        batch.delete(&key)?;
    } else {
        batch.put_u64(&key, amount.raw())?;
    }
    Ok(())
}

fn parse_amount(operation: OperationKind, raw: &str) -> Result<TokenAmount, LedgerError> {
    raw.parse().map_err(|e: token_types::TypeError| LedgerError::InvalidArgument {
        operation,
        argument: "amount",
        reason: e.to_string(),
    })
}
