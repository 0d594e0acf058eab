//! Immutable token registry
//!
//! Built once at startup from configuration and shared read-only. Lookups of
//! unknown addresses fail; there is no default token. Symbols are unique
//! ignoring ASCII case, so resolving a symbol is unambiguous.

use crate::errors::{LbError, Result};
use crate::token::Token;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, Token>,
    /// Lowercased symbol → address
    symbols: HashMap<String, String>,
}

impl TokenRegistry {
    /// Build a registry, rejecting duplicate addresses and symbols
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Result<Self> {
        let mut map = HashMap::new();
        let mut symbols = HashMap::new();
        for token in tokens {
            if map.contains_key(&token.address) {
                return Err(LbError::SchemaViolation(format!(
                    "token {} registered twice",
                    token.address
                )));
            }
            let symbol = token.symbol.to_ascii_lowercase();
            if let Some(existing) = symbols.get(&symbol) {
                return Err(LbError::SchemaViolation(format!(
                    "symbol {} used by both {} and {}",
                    token.symbol, existing, token.address
                )));
            }
            debug!("Registering token {}", token);
            symbols.insert(symbol, token.address.clone());
            map.insert(token.address.clone(), token);
        }
        Ok(Self { tokens: map, symbols })
    }

    pub fn get(&self, address: &str) -> Result<&Token> {
        self.tokens
            .get(address)
            .ok_or_else(|| LbError::TokenNotRegistered(address.to_string()))
    }

    /// Find a token by symbol (case-insensitive)
    pub fn by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.symbols
            .get(&symbol.to_ascii_lowercase())
            .and_then(|address| self.tokens.get(address))
    }

    /// Resolve either an address or a symbol
    pub fn resolve(&self, address_or_symbol: &str) -> Result<&Token> {
        self.get(address_or_symbol).or_else(|err| {
            self.by_symbol(address_or_symbol).ok_or(err)
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }
}
