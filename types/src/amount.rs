//! Token amount type.
//!
//! Amounts travel as base-10 strings and are held as raw `u64` units. Parsing
//! is strict: ASCII digits only, no sign, no surrounding whitespace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// A quantity of tokens in raw units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Fixed-width little-endian encoding used for read payloads.
    pub fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }
}

impl FromStr for TokenAmount {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TypeError::EmptyAmount);
        }
        // `u64::from_str` would accept a leading '+'.
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::AmountNotNumeric {
                value: s.to_string(),
            });
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::AmountOverflow {
                value: s.to_string(),
            })
    }
}

impl From<u64> for TokenAmount {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
