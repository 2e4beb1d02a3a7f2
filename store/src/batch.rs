//! Atomic write batches.

use crate::{StateKey, StoreError};

/// A single write inside a [`WriteBatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// An ordered group of writes committed atomically by a [`crate::KvStore`].
///
/// When `truncate` is set the store drops every existing entry before applying
/// the operations, still as part of the same atomic commit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    truncate: bool,
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A batch that starts by wiping the store.
    pub fn truncating() -> Self {
        Self {
            truncate: true,
            ops: Vec::new(),
        }
    }

    pub fn put(&mut self, key: &StateKey, value: Vec<u8>) -> Result<&mut Self, StoreError> {
        self.ops.push(WriteOp::Put {
            key: key.encode()?,
            value,
        });
        Ok(self)
    }

    pub fn put_u64(&mut self, key: &StateKey, value: u64) -> Result<&mut Self, StoreError> {
        self.put(key, value.to_le_bytes().to_vec())
    }

    pub fn delete(&mut self, key: &StateKey) -> Result<&mut Self, StoreError> {
        self.ops.push(WriteOp::Delete { key: key.encode()? });
        Ok(self)
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.truncate && self.ops.is_empty()
    }

    pub fn into_parts(self) -> (bool, Vec<WriteOp>) {
        (self.truncate, self.ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_types::AccountId;

    #[test]
    fn ops_keep_insertion_order() {
        let alice = StateKey::Balance(AccountId::new("alice"));
        let mut batch = WriteBatch::new();
        batch
            .put_u64(&alice, 5)
            .unwrap()
            .delete(&StateKey::TotalSupply)
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.ops()[0],
            WriteOp::Put {
                key: alice.encode().unwrap(),
                value: 5u64.to_le_bytes().to_vec()
            }
        );
        assert!(matches!(batch.ops()[1], WriteOp::Delete { .. }));
    }

    #[test]
    fn truncating_batch_is_never_empty() {
        assert!(WriteBatch::new().is_empty());
        assert!(!WriteBatch::truncating().is_empty());
    }
}
