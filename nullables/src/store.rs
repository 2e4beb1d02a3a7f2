//! Nullable store — thread-safe in-memory key-value storage.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use token_store::{KvStore, StoreError, WriteBatch, WriteOp};

/// An in-memory [`KvStore`].
///
/// Keys are kept in a `BTreeMap` so prefix scans come back sorted. A commit
/// takes the single map lock once, so batches are applied atomically.
pub struct NullStore {
    entries: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
    fail_commits: AtomicBool,
    commits: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            fail_commits: AtomicBool::new(false),
            commits: AtomicU64::new(0),
        }
    }

    /// Make every subsequent commit fail (or succeed again) without applying
    /// any of its writes.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of successfully applied commits.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for NullStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("commit rejected by null store".into()));
        }
        let (truncate, ops) = batch.into_parts();
        let mut entries = self.entries.lock().unwrap();
        if truncate {
            entries.clear();
        }
        for op in ops {
            match op {
                WriteOp::Put { key, value } => {
                    entries.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_store::{KeyTag, StateKey};
    use token_types::AccountId;

    fn balance_key(s: &str) -> StateKey {
        StateKey::Balance(AccountId::new(s))
    }

    fn puts(entries: &[(StateKey, u64)]) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for (key, value) in entries {
            batch.put_u64(key, *value).unwrap();
        }
        batch
    }

    #[test]
    fn test_put_get() {
        let store = NullStore::new();
        let key = balance_key("alice");
        store.commit(puts(&[(key.clone(), 7)])).unwrap();
        let raw = key.encode().unwrap();
        assert_eq!(store.get(&raw).unwrap(), Some(7u64.to_le_bytes().to_vec()));
        assert!(store.contains(&raw).unwrap());
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn test_missing_key() {
        let store = NullStore::new();
        let raw = balance_key("nobody").encode().unwrap();
        assert_eq!(store.get(&raw).unwrap(), None);
    }

    #[test]
    fn test_failed_commit_applies_nothing() {
        let store = NullStore::new();
        store.fail_commits(true);
        let batch = puts(&[(balance_key("a"), 1), (balance_key("b"), 2)]);
        assert!(store.commit(batch).is_err());
        assert!(store.is_empty());
        assert_eq!(store.commit_count(), 0);

        store.fail_commits(false);
        store.commit(puts(&[(balance_key("a"), 1)])).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_truncating_commit() {
        let store = NullStore::new();
        store
            .commit(puts(&[(balance_key("a"), 1), (balance_key("b"), 2)]))
            .unwrap();

        let mut reset = WriteBatch::truncating();
        reset.put_u64(&StateKey::TotalSupply, 100).unwrap();
        store.commit(reset).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store
            .contains(&StateKey::TotalSupply.encode().unwrap())
            .unwrap());
    }

    #[test]
    fn test_delete() {
        let store = NullStore::new();
        let key = balance_key("a");
        store.commit(puts(&[(key.clone(), 1)])).unwrap();
        let mut batch = WriteBatch::new();
        batch.delete(&key).unwrap();
        store.commit(batch).unwrap();
        assert!(!store.contains(&key.encode().unwrap()).unwrap());
    }

    #[test]
    fn test_scan_prefix_is_sorted_and_scoped() {
        let store = NullStore::new();
        let allowance = StateKey::Allowance {
            spender: AccountId::new("bob"),
            owner: AccountId::new("alice"),
        };
        store
            .commit(puts(&[
                (balance_key("carol"), 3),
                (balance_key("alice"), 1),
                (StateKey::TotalSupply, 100),
                (allowance, 9),
            ]))
            .unwrap();

        let balances = store.scan_prefix(&KeyTag::Balance.prefix()).unwrap();
        let keys: Vec<StateKey> = balances
            .iter()
            .map(|(k, _)| StateKey::decode(k).unwrap())
            .collect();
        assert_eq!(keys, vec![balance_key("alice"), balance_key("carol")]);
    }
}
