//! Name-based operation dispatch.
//!
//! Callers address the ledger with an operation name and positional string
//! arguments. [`Operation::parse`] resolves the name into an
//! [`OperationKind`], checks the argument count, and wraps identifier
//! arguments as [`AccountId`]s without judging them: an identifier that names
//! no account is reported by the ledger's existence checks. Amount arguments
//! stay raw: the ledger parses them only after the checks that precede them.

use std::fmt;

use token_types::AccountId;

use crate::LedgerError;

/// Every operation the ledger understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Init,
    BalanceOf,
    Transfer,
    TransferFrom,
    Approve,
    TotalSupply,
    Allowance,
}

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        Self::Init,
        Self::BalanceOf,
        Self::Transfer,
        Self::TransferFrom,
        Self::Approve,
        Self::TotalSupply,
        Self::Allowance,
    ];

    /// Resolve a wire name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "init" => Some(Self::Init),
            "balanceOf" => Some(Self::BalanceOf),
            "transfer" => Some(Self::Transfer),
            "transferFrom" => Some(Self::TransferFrom),
            "approve" => Some(Self::Approve),
            "totalSupply" => Some(Self::TotalSupply),
            "allowance" => Some(Self::Allowance),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::BalanceOf => "balanceOf",
            Self::Transfer => "transfer",
            Self::TransferFrom => "transferFrom",
            Self::Approve => "approve",
            Self::TotalSupply => "totalSupply",
            Self::Allowance => "allowance",
        }
    }

    /// Positional argument names, in order.
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            Self::Init | Self::TotalSupply => &[],
            Self::BalanceOf => &["address"],
            Self::Transfer => &["from", "to", "amount"],
            Self::TransferFrom => &["from", "to", "spender", "amount"],
            Self::Approve => &["spender", "owner", "amount"],
            Self::Allowance => &["spender", "owner"],
        }
    }

    pub fn arity(&self) -> usize {
        self.parameters().len()
    }

    /// Whether a successful execution changes ledger state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Init | Self::Transfer | Self::TransferFrom | Self::Approve
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved invocation, ready for [`crate::LedgerState::execute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Init,
    BalanceOf {
        address: AccountId,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: String,
    },
    TransferFrom {
        from: AccountId,
        to: AccountId,
        spender: AccountId,
        amount: String,
    },
    Approve {
        spender: AccountId,
        owner: AccountId,
        amount: String,
    },
    TotalSupply,
    Allowance {
        spender: AccountId,
        owner: AccountId,
    },
}

impl Operation {
    /// Resolve `name` and bind `args` positionally.
    pub fn parse<A: AsRef<str>>(name: &str, args: &[A]) -> Result<Self, LedgerError> {
        let kind = OperationKind::from_name(name).ok_or_else(|| LedgerError::UnknownOperation {
            name: name.to_string(),
        })?;
        if args.len() != kind.arity() {
            return Err(LedgerError::InvalidArgument {
                operation: kind,
                argument: "arguments",
                reason: format!("expected {}, got {}", kind.arity(), args.len()),
            });
        }
        let account = |i: usize| AccountId::new(args[i].as_ref());
        let raw = |i: usize| args[i].as_ref().to_string();

        Ok(match kind {
            OperationKind::Init => Self::Init,
            OperationKind::BalanceOf => Self::BalanceOf {
                address: account(0),
            },
            OperationKind::Transfer => Self::Transfer {
                from: account(0),
                to: account(1),
                amount: raw(2),
            },
            OperationKind::TransferFrom => Self::TransferFrom {
                from: account(0),
                to: account(1),
                spender: account(2),
                amount: raw(3),
            },
            OperationKind::Approve => Self::Approve {
                spender: account(0),
                owner: account(1),
                amount: raw(2),
            },
            OperationKind::TotalSupply => Self::TotalSupply,
            OperationKind::Allowance => Self::Allowance {
                spender: account(0),
                owner: account(1),
            },
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Init => OperationKind::Init,
            Self::BalanceOf { .. } => OperationKind::BalanceOf,
            Self::Transfer { .. } => OperationKind::Transfer,
            Self::TransferFrom { .. } => OperationKind::TransferFrom,
            Self::Approve { .. } => OperationKind::Approve,
            Self::TotalSupply => OperationKind::TotalSupply,
            Self::Allowance { .. } => OperationKind::Allowance,
        }
    }
}
