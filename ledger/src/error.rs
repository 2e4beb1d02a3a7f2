use thiserror::Error;

use token_types::{AccountId, TokenAmount};

use crate::operation::OperationKind;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{operation}: account {account} does not exist")]
    NotFound {
        operation: OperationKind,
        account: AccountId,
    },

    #[error("{operation}: invalid {argument}: {reason}")]
    InvalidArgument {
        operation: OperationKind,
        argument: &'static str,
        reason: String,
    },

    #[error("{operation}: {account} holds {available} tokens, needs {needed}")]
    InsufficientFunds {
        operation: OperationKind,
        account: AccountId,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("{operation}: {spender} may move {allowed} of {owner}'s tokens, requested {requested}")]
    AllowanceExceeded {
        operation: OperationKind,
        spender: AccountId,
        owner: AccountId,
        allowed: TokenAmount,
        requested: TokenAmount,
    },

    #[error("unknown operation {name:?}")]
    UnknownOperation { name: String },

    #[error("{operation}: crediting {account} would overflow its balance")]
    BalanceOverflow {
        operation: OperationKind,
        account: AccountId,
    },

    #[error("storage error: {0}")]
    Storage(#[from] token_store::StoreError),
}

/// Coarse failure category, stable across message wording changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    InsufficientFunds,
    AllowanceExceeded,
    UnknownOperation,
    BalanceOverflow,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::InvalidArgument => "InvalidArgument",
            Self::InsufficientFunds => "InsufficientFunds",
            Self::AllowanceExceeded => "AllowanceExceeded",
            Self::UnknownOperation => "UnknownOperation",
            Self::BalanceOverflow => "BalanceOverflow",
            Self::Storage => "Storage",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::AllowanceExceeded { .. } => ErrorKind::AllowanceExceeded,
            Self::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            Self::BalanceOverflow { .. } => ErrorKind::BalanceOverflow,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// The operation that failed, when the name resolved to one.
    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            Self::NotFound { operation, .. }
            | Self::InvalidArgument { operation, .. }
            | Self::InsufficientFunds { operation, .. }
            | Self::AllowanceExceeded { operation, .. }
            | Self::BalanceOverflow { operation, .. } => Some(*operation),
            Self::UnknownOperation { .. } | Self::Storage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_structured_fields() {
        let err = LedgerError::InsufficientFunds {
            operation: OperationKind::Transfer,
            account: AccountId::new("alice"),
            needed: TokenAmount::new(10),
            available: TokenAmount::new(3),
        };
        assert_eq!(err.to_string(), "transfer: alice holds 3 tokens, needs 10");
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(err.operation(), Some(OperationKind::Transfer));
    }

    #[test]
    fn unknown_operation_has_no_operation_kind() {
        let err = LedgerError::UnknownOperation {
            name: "mint".into(),
        };
        assert_eq!(err.to_string(), "unknown operation \"mint\"");
        assert_eq!(err.operation(), None);
        assert_eq!(err.kind().as_str(), "UnknownOperation");
    }
}
