//! Errors raised while converting raw arguments into ledger types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("account identifier must not be empty")]
    EmptyAccountId,

    #[error("amount must not be empty")]
    EmptyAmount,

    #[error("amount {value:?} is not a base-10 unsigned integer")]
    AmountNotNumeric { value: String },

    #[error("amount {value:?} does not fit in 64 bits")]
    AmountOverflow { value: String },
}
