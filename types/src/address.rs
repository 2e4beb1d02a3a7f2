//! Opaque account identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeError;

/// An account identifier as supplied by the caller.
///
/// The ledger never interprets the contents: any string names an account,
/// and whether that account *exists* is a ledger question. The empty string
/// is representable so lookups fail with the ledger's own existence errors,
/// but no account can be created under it (see [`AccountId::require_non_empty`]).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reject the empty identifier where an account is about to be created.
    pub fn require_non_empty(&self) -> Result<(), TypeError> {
        if self.is_empty() {
            return Err(TypeError::EmptyAccountId);
        }
        Ok(())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_cannot_be_created() {
        let empty = AccountId::new("");
        assert!(empty.is_empty());
        assert_eq!(empty.require_non_empty(), Err(TypeError::EmptyAccountId));
        assert_eq!(AccountId::new("alice").require_non_empty(), Ok(()));
    }

    #[test]
    fn identifiers_are_opaque() {
        for raw in ["alice", "0xdeadbeef", "with space", "a/b\\c", "ünïcødé"] {
            let id = AccountId::new(raw);
            assert_eq!(id.as_str(), raw);
            assert_eq!(id.to_string(), raw);
            assert_eq!(AccountId::from(raw), id);
        }
    }
}
