//! Key-value storage capability for the token ledger.
//!
//! The ledger never owns persistence. It is handed something implementing
//! [`KvStore`] and speaks to it only in terms of byte keys (see [`StateKey`])
//! and atomic [`WriteBatch`] commits. Backends (in-memory for testing, or
//! whatever durable store the host provides) implement the trait; the rest of
//! the codebase depends only on it.

pub mod batch;
pub mod error;
pub mod key;

pub use batch::{WriteBatch, WriteOp};
pub use error::StoreError;
pub use key::{KeyTag, StateKey};

/// A byte-oriented key-value store.
///
/// Implementations must apply a [`WriteBatch`] atomically: either every
/// operation in it becomes visible, or none does. Methods take `&self`;
/// backends are expected to handle their own interior synchronisation.
pub trait KvStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Apply every operation of `batch` as a single atomic write.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Return every entry whose key starts with `prefix`, in ascending key order.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    /// Whether any value is stored under `key`.
    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        self.get(key).map(|v| v.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        (**self).scan_prefix(prefix)
    }
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        (**self).scan_prefix(prefix)
    }
}

/// Decode an 8-byte little-endian `u64` value read from the store.
pub fn decode_u64(key: &StateKey, bytes: &[u8]) -> Result<u64, StoreError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StoreError::MalformedValue {
            key: key.to_string(),
            expected: 8,
            found: bytes.len(),
        })?;
    Ok(u64::from_le_bytes(arr))
}
