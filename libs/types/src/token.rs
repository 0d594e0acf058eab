//! Token and pair reference data

use crate::errors::{LbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address and code hash of a deployed contract
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractRef {
    pub address: String,
    pub code_hash: String,
}

impl ContractRef {
    pub fn new(address: impl Into<String>, code_hash: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            code_hash: code_hash.into(),
        }
    }
}

/// A registered SNIP-20 token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub address: String,
    pub code_hash: String,
    pub symbol: String,
    /// Decimal places between human and machine units (6 for SCRT, 8 for SHD)
    pub decimals: u8,
}

impl Token {
    pub fn new(
        address: impl Into<String>,
        code_hash: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            address: address.into(),
            code_hash: code_hash.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    pub fn contract(&self) -> ContractRef {
        ContractRef::new(&self.address, &self.code_hash)
    }

    /// Schema form used inside pair messages
    pub fn to_token_type(&self) -> TokenType {
        TokenType::CustomToken {
            contract_addr: self.address.clone(),
            token_code_hash: self.code_hash.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

/// Token identity as the contracts expect it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    CustomToken {
        contract_addr: String,
        token_code_hash: String,
    },
}

/// Ordered token pair with its bin step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub token_x: Token,
    pub token_y: Token,
    /// Bin width in basis points (100 = 1%)
    pub bin_step: u16,
}

impl Pair {
    pub fn new(token_x: Token, token_y: Token, bin_step: u16) -> Result<Self> {
        if bin_step == 0 {
            return Err(LbError::InvalidBinStep(bin_step));
        }
        Ok(Self {
            token_x,
            token_y,
            bin_step,
        })
    }
}
