//! Byte-key layout of ledger state.
//!
//! Every key starts with a one-byte [`KeyTag`] so a prefix scan over the tag
//! yields all entries of one kind. Identifiers are length-prefixed (u32 LE),
//! which keeps keys unambiguous for arbitrary identifier contents.

use std::fmt;

use token_types::AccountId;

use crate::StoreError;

/// Discriminant byte at the start of every encoded key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyTag {
    TotalSupply = 0x00,
    Balance = 0x01,
    Allowance = 0x02,
}

impl KeyTag {
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Prefix that every key of this kind starts with.
    pub fn prefix(self) -> [u8; 1] {
        [self.as_byte()]
    }

    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Self::TotalSupply),
            0x01 => Some(Self::Balance),
            0x02 => Some(Self::Allowance),
            _ => None,
        }
    }
}

/// A typed ledger key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateKey {
    TotalSupply,
    /// Presence of this key is what makes an account exist.
    Balance(AccountId),
    Allowance {
        spender: AccountId,
        owner: AccountId,
    },
}

impl StateKey {
    pub fn tag(&self) -> KeyTag {
        match self {
            Self::TotalSupply => KeyTag::TotalSupply,
            Self::Balance(_) => KeyTag::Balance,
            Self::Allowance { .. } => KeyTag::Allowance,
        }
    }

    /// Fails only for identifiers too long for the u32 length prefix.
    pub fn encode(&self) -> Result<Vec<u8>, StoreError> {
        let mut out = vec![self.tag().as_byte()];
        match self {
            Self::TotalSupply => {}
            Self::Balance(account) => put_segment(&mut out, account)?,
            Self::Allowance { spender, owner } => {
                put_segment(&mut out, spender)?;
                put_segment(&mut out, owner)?;
            }
        }
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        let (&tag, mut rest) = bytes
            .split_first()
            .ok_or_else(|| StoreError::MalformedKey("empty key".into()))?;
        let tag = KeyTag::from_byte(tag)
            .ok_or_else(|| StoreError::MalformedKey(format!("unknown tag {tag:#04x}")))?;
        let key = match tag {
            KeyTag::TotalSupply => Self::TotalSupply,
            KeyTag::Balance => Self::Balance(take_account(&mut rest)?),
            KeyTag::Allowance => {
                let spender = take_account(&mut rest)?;
                let owner = take_account(&mut rest)?;
                Self::Allowance { spender, owner }
            }
        };
        if !rest.is_empty() {
            return Err(StoreError::MalformedKey(format!(
                "{} trailing bytes",
                rest.len()
            )));
        }
        Ok(key)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalSupply => write!(f, "total_supply"),
            Self::Balance(account) => write!(f, "balance[{account}]"),
            Self::Allowance { spender, owner } => write!(f, "allowance[{spender}][{owner}]"),
        }
    }
}

fn put_segment(out: &mut Vec<u8>, account: &AccountId) -> Result<(), StoreError> {
    let bytes = account.as_bytes();
    out.extend_from_slice(&segment_len(bytes.len())?.to_le_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

fn segment_len(len: usize) -> Result<u32, StoreError> {
    u32::try_from(len).map_err(|_| {
        StoreError::MalformedKey(format!(
            "identifier of {len} bytes exceeds the u32 length prefix"
        ))
    })
}

fn take_account(rest: &mut &[u8]) -> Result<AccountId, StoreError> {
    if rest.len() < 4 {
        return Err(StoreError::MalformedKey("truncated length prefix".into()));
    }
    let (len_bytes, tail) = rest.split_at(4);
    let len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
    if tail.len() < len {
        return Err(StoreError::MalformedKey("truncated identifier".into()));
    }
    let (raw, tail) = tail.split_at(len);
    let s = std::str::from_utf8(raw)
        .map_err(|e| StoreError::MalformedKey(format!("identifier is not utf-8: {e}")))?;
    *rest = tail;
    Ok(AccountId::new(s))
}
