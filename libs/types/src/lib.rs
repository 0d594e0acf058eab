//! # Liquidity Book Shared Types
//!
//! Reference data and the error taxonomy shared by every crate of the
//! liquidity book client core.
//!
//! ## Contents
//!
//! - **Tokens and pairs**: [`Token`], [`Pair`], [`ContractRef`] and the
//!   schema-level [`TokenType`] they serialize to
//! - **Bin identifiers**: [`BinId`], a 24-bit id centered at `2^23`
//! - **Registry**: [`TokenRegistry`], the immutable address → token lookup
//! - **Errors**: [`LbError`], split into local validation failures (never sent
//!   to the chain) and remote failures reported by the broadcaster
//!
//! ## Quick Start
//!
//! ```rust
//! use lb_types::{BinId, Pair, Token};
//!
//! let x = Token::new("secret1x", "hash_x", "TOKENX", 6);
//! let y = Token::new("secret1y", "hash_y", "TOKENY", 6);
//! let pair = Pair::new(x, y, 100).unwrap();
//!
//! assert_eq!(pair.bin_step, 100);
//! assert_eq!(BinId::CENTER.value(), 8_388_608);
//! ```

pub mod bin_id;
pub mod errors;
pub mod registry;
pub mod token;

pub use bin_id::{BinId, MAX_BIN_ID, REAL_ID_SHIFT};
pub use errors::{LbError, Result};
pub use registry::TokenRegistry;
pub use token::{ContractRef, Pair, Token, TokenType};

/// Number of hex characters in a viewing key (32 random bytes)
pub const VIEWING_KEY_HEX_LEN: usize = 64;

/// Check that a viewing key is exactly 64 hex characters
pub fn is_valid_viewing_key(key: &str) -> bool {
    key.len() == VIEWING_KEY_HEX_LEN && hex::decode(key).is_ok()
}
