//! Ledger snapshots — capture every balance and allowance at a point in time.
//!
//! The snapshot hash is computed deterministically from the captured state, so
//! two ledgers that went through equivalent histories produce the same hash.
//! Snapshots are what invariant checks (circulating supply never above total
//! supply) and state dumps are built from.

use serde::{Deserialize, Serialize};

use token_store::{decode_u64, KeyTag, KvStore, StateKey, StoreError};
use token_types::{AccountId, TokenAmount};

use crate::LedgerError;

const SNAPSHOT_VERSION: u32 = 1;

/// A point-in-time copy of the whole ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the captured state.
    pub hash: [u8; 32],
    pub total_supply: TokenAmount,
    /// Every existing account, sorted by encoded key.
    pub accounts: Vec<AccountSnapshot>,
    /// Every non-zero allowance, sorted by encoded key.
    pub allowances: Vec<AllowanceSnapshot>,
    pub version: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account: AccountId,
    pub balance: TokenAmount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSnapshot {
    pub spender: AccountId,
    pub owner: AccountId,
    pub amount: TokenAmount,
}

impl LedgerSnapshot {
    /// Read the full ledger out of `store`.
    pub fn capture<S: KvStore + ?Sized>(store: &S) -> Result<Self, LedgerError> {
        let total_supply = match store.get(&StateKey::TotalSupply.encode()?)? {
            Some(bytes) => TokenAmount::new(decode_u64(&StateKey::TotalSupply, &bytes)?),
            None => TokenAmount::ZERO,
        };

        let mut accounts = Vec::new();
        for (raw_key, value) in store.scan_prefix(&KeyTag::Balance.prefix())? {
            let key = StateKey::decode(&raw_key)?;
            let balance = TokenAmount::new(decode_u64(&key, &value)?);
            match key {
                StateKey::Balance(account) => accounts.push(AccountSnapshot { account, balance }),
                other => return Err(unexpected_key(&other)),
            }
        }

        let mut allowances = Vec::new();
        for (raw_key, value) in store.scan_prefix(&KeyTag::Allowance.prefix())? {
            let key = StateKey::decode(&raw_key)?;
            let amount = TokenAmount::new(decode_u64(&key, &value)?);
            match key {
                StateKey::Allowance { spender, owner } => allowances.push(AllowanceSnapshot {
                    spender,
                    owner,
                    amount,
                }),
                other => return Err(unexpected_key(&other)),
            }
        }

        Ok(Self::create(total_supply, accounts, allowances))
    }

    pub fn create(
        total_supply: TokenAmount,
        accounts: Vec<AccountSnapshot>,
        allowances: Vec<AllowanceSnapshot>,
    ) -> Self {
        let mut snap = Self {
            hash: [0u8; 32],
            total_supply,
            accounts,
            allowances,
            version: SNAPSHOT_VERSION,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        fn update_id(hasher: &mut Blake2b<U32>, id: &AccountId) {
            hasher.update((id.as_bytes().len() as u64).to_le_bytes());
            hasher.update(id.as_bytes());
        }

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.total_supply.to_le_bytes());
        hasher.update((self.accounts.len() as u64).to_le_bytes());
        for entry in &self.accounts {
            update_id(&mut hasher, &entry.account);
            hasher.update(entry.balance.to_le_bytes());
        }
        hasher.update((self.allowances.len() as u64).to_le_bytes());
        for entry in &self.allowances {
            update_id(&mut hasher, &entry.spender);
            update_id(&mut hasher, &entry.owner);
            hasher.update(entry.amount.to_le_bytes());
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the captured data.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn hash_hex(&self) -> String {
        self.hash.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Sum of all balances. Widened so a corrupt ledger cannot overflow it.
    pub fn circulating(&self) -> u128 {
        self.accounts
            .iter()
            .map(|a| u128::from(a.balance.raw()))
            .sum()
    }

    pub fn balance(&self, account: &AccountId) -> Option<TokenAmount> {
        self.accounts
            .iter()
            .find(|a| &a.account == account)
            .map(|a| a.balance)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

fn unexpected_key(key: &StateKey) -> LedgerError {
    LedgerError::Storage(StoreError::Corruption(format!(
        "{key} found under the wrong key prefix"
    )))
}
