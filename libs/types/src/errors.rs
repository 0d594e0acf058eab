//! Error taxonomy for the liquidity book client core
//!
//! Local variants are raised by validation before anything is handed to the
//! broadcaster. Remote variants carry what the chain or transport reported,
//! with the raw log preserved verbatim.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LbError {
    /// Amount string is not a well-formed non-negative decimal / integer
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// Price is zero, negative, NaN or infinite
    #[error("Invalid price {price}: must be finite and strictly positive")]
    InvalidPrice { price: String },

    /// Bin step of zero has no log base
    #[error("Invalid bin step {0}: must be greater than zero")]
    InvalidBinStep(u16),

    /// Bin id outside the 24-bit range
    #[error("Bin id {0} is outside [0, 2^24)")]
    BinIdOutOfRange(i64),

    /// Slippage tolerance above 100%
    #[error("Invalid slippage {0} bps: must be at most 10000")]
    InvalidSlippage(u32),

    /// Both desired amounts are zero
    #[error("Liquidity intent deposits nothing: both amounts are zero")]
    EmptyIntent,

    /// A side's weights do not sum to one within epsilon, or a weight is outside [0, 1]
    #[error("Weight mismatch on side {side}: {detail}")]
    WeightMismatch { side: char, detail: String },

    /// No bin offsets were supplied
    #[error("Bin spread is empty")]
    SpreadEmpty,

    /// Same offset listed twice in a spread
    #[error("Bin offset {0} appears more than once in the spread")]
    DuplicateBinOffset(i32),

    /// Required message field missing or malformed
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// No viewing key cached for the (token, account) pair
    #[error("No viewing key cached for token {token} and account {account}")]
    KeyNotFound { token: String, account: String },

    /// Token address is not in the registry
    #[error("Token {0} is not registered")]
    TokenNotRegistered(String),

    /// Contract executed and reported a non-zero status code
    #[error("Contract rejected transaction (code {code}, gas used {gas_used}): {raw_log}")]
    ContractRejected {
        code: u32,
        raw_log: String,
        gas_used: u64,
    },

    /// Signer / broadcaster / query transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request being waited on was dropped before it completed
    #[error("Viewing key request for token {token} was abandoned before completion")]
    RequestAbandoned { token: String },
}

impl LbError {
    pub fn invalid_amount(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_price(price: f64) -> Self {
        Self::InvalidPrice {
            price: price.to_string(),
        }
    }

    pub fn weight_mismatch(side: char, detail: impl Into<String>) -> Self {
        Self::WeightMismatch {
            side,
            detail: detail.into(),
        }
    }

    /// True when the failure was detected before any network call
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            Self::ContractRejected { .. } | Self::Transport(_) | Self::RequestAbandoned { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LbError>;
