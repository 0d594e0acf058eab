//! Bin identifiers
//!
//! A bin id is a 24-bit unsigned integer. Id `2^23` is the bin whose lower
//! price bound is exactly 1.0; every step away multiplies or divides the
//! price by the pair's base `1 + bin_step / 10_000`.

use crate::errors::{LbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset of the parity bin, fixed by the protocol
pub const REAL_ID_SHIFT: u32 = 1 << 23;

/// Largest valid bin id
pub const MAX_BIN_ID: u32 = (1 << 24) - 1;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct BinId(u32);

impl BinId {
    /// Parity bin (price ratio 1.0)
    pub const CENTER: Self = Self(REAL_ID_SHIFT);

    pub fn new(id: u32) -> Result<Self> {
        if id > MAX_BIN_ID {
            return Err(LbError::BinIdOutOfRange(id as i64));
        }
        Ok(Self(id))
    }

    /// Build from a signed exponent relative to the parity bin
    pub fn from_exponent(exponent: i64) -> Result<Self> {
        let id = exponent + REAL_ID_SHIFT as i64;
        if !(0..=MAX_BIN_ID as i64).contains(&id) {
            return Err(LbError::BinIdOutOfRange(id));
        }
        Ok(Self(id as u32))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Signed distance from the parity bin
    pub fn exponent(self) -> i64 {
        self.0 as i64 - REAL_ID_SHIFT as i64
    }

    /// Bin reached by moving `delta` bins from this one
    pub fn offset(self, delta: i32) -> Result<Self> {
        Self::from_exponent(self.exponent() + delta as i64)
    }

    /// Absolute number of bins between two ids
    pub fn distance(self, other: Self) -> u32 {
        self.0.abs_diff(other.0)
    }
}

impl TryFrom<u32> for BinId {
    type Error = LbError;

    fn try_from(id: u32) -> Result<Self> {
        Self::new(id)
    }
}

impl From<BinId> for u32 {
    fn from(id: BinId) -> u32 {
        id.0
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
