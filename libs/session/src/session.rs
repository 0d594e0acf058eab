//! Viewing Key Session with Single-Flight Issuance
//!
//! Each `(token, account)` slot moves through `Unissued → Requested → Cached`.
//! Issued keys live in an in-memory map for the lifetime of the session. A
//! second map holds one watch channel per slot that is currently being issued;
//! concurrent callers subscribe to it instead of submitting their own
//! `set_viewing_key`.
//!
//! The leader's in-flight entry is removed by a drop guard, so a cancelled
//! request leaves the slot `Unissued` and any waiters fail with
//! [`LbError::RequestAbandoned`] rather than hanging. The entry is gone before
//! the outcome is published, so a caller arriving afterwards either hits the
//! cache or makes its own attempt.
//!
//! Every account carries a disconnect epoch. A key issued across a
//! `disconnect` is returned to its caller but not cached.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lb_amm::FixedPointConverter;
use lb_contracts::{submit_checked, Broadcaster, ContractMessageBuilder, QueryAnswer, QueryClient, TxRequest};
use lb_types::{is_valid_viewing_key, LbError, Result, Token, TokenRegistry};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

type Outcome = Option<Result<String>>;

/// Gas and padding applied to every `set_viewing_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub gas_limit: u64,
    pub padding: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            gas_limit: 40_000,
            padding: "one amber club".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    Unissued,
    Requested,
    Cached,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct KeySlot {
    token: String,
    account: String,
}

impl KeySlot {
    fn new(token: &str, account: &str) -> Self {
        Self {
            token: token.to_string(),
            account: account.to_string(),
        }
    }
}

enum Role {
    Cached(String),
    Wait(watch::Receiver<Outcome>),
    Lead(watch::Sender<Outcome>),
}

/// Removes the in-flight entry however the leader exits
struct InFlightGuard<'a> {
    in_flight: &'a DashMap<KeySlot, watch::Receiver<Outcome>>,
    slot: KeySlot,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.slot);
    }
}

/// Session-scoped viewing key cache, created at wallet connect
pub struct ViewingKeySession {
    registry: Arc<TokenRegistry>,
    broadcaster: Arc<dyn Broadcaster>,
    options: SessionOptions,
    keys: DashMap<KeySlot, String>,
    in_flight: DashMap<KeySlot, watch::Receiver<Outcome>>,
    epochs: DashMap<String, u64>,
}

impl ViewingKeySession {
    pub fn new(
        registry: Arc<TokenRegistry>,
        broadcaster: Arc<dyn Broadcaster>,
        options: SessionOptions,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            options,
            keys: DashMap::new(),
            in_flight: DashMap::new(),
            epochs: DashMap::new(),
        }
    }

    /// Return the cached key, or issue one on chain
    ///
    /// Concurrent calls for the same slot share a single submission and its
    /// outcome. Failures are returned as reported and never retried.
    pub async fn request(&self, token: &str, account: &str) -> Result<String> {
        let token_info = self.registry.get(token)?.clone();
        let slot = KeySlot::new(token, account);
        let epoch = self.epoch(account);

        if let Some(key) = self.keys.get(&slot) {
            debug!(token, account, "Viewing key cache hit");
            return Ok(key.clone());
        }

        let sender = match self.claim(&slot) {
            Role::Cached(key) => return Ok(key),
            Role::Wait(rx) => {
                debug!(token, account, "Viewing key request already in flight, waiting");
                return wait_for_outcome(rx, token).await;
            }
            Role::Lead(tx) => tx,
        };

        let guard = InFlightGuard {
            in_flight: &self.in_flight,
            slot: slot.clone(),
        };

        let result = self.issue(&token_info, account).await;
        if let Ok(key) = &result {
            if !self.cache_in_epoch(slot, key, epoch) {
                warn!(token, account, "Account disconnected during issuance, key not cached");
            }
        }
        drop(guard);
        // Waiters may all have gone away; nothing to do then
        let _ = sender.send(Some(result.clone()));
        result
    }

    fn epoch(&self, account: &str) -> u64 {
        self.epochs.get(account).map(|e| *e).unwrap_or(0)
    }

    /// Cache `key` unless `disconnect` ran since `epoch` was read
    fn cache_in_epoch(&self, slot: KeySlot, key: &str, epoch: u64) -> bool {
        // Holding the epoch entry orders this insert against disconnect
        let current = self.epochs.entry(slot.account.clone()).or_insert(0);
        if *current != epoch {
            return false;
        }
        self.keys.insert(slot, key.to_string());
        true
    }

    /// Decide under the shard lock whether this caller leads or waits
    fn claim(&self, slot: &KeySlot) -> Role {
        match self.in_flight.entry(slot.clone()) {
            Entry::Occupied(entry) => Role::Wait(entry.get().clone()),
            Entry::Vacant(entry) => {
                // The previous leader may have finished between the cache check and here
                if let Some(key) = self.keys.get(slot) {
                    return Role::Cached(key.clone());
                }
                let (tx, rx) = watch::channel(None);
                entry.insert(rx);
                Role::Lead(tx)
            }
        }
    }

    /// Cached key; never triggers issuance
    pub fn get(&self, token: &str, account: &str) -> Result<String> {
        self.keys
            .get(&KeySlot::new(token, account))
            .map(|key| key.clone())
            .ok_or_else(|| LbError::KeyNotFound {
                token: token.to_string(),
                account: account.to_string(),
            })
    }

    pub fn state(&self, token: &str, account: &str) -> KeyState {
        let slot = KeySlot::new(token, account);
        if self.keys.contains_key(&slot) {
            KeyState::Cached
        } else if self.in_flight.contains_key(&slot) {
            KeyState::Requested
        } else {
            KeyState::Unissued
        }
    }

    /// Seed a key obtained outside the session, e.g. from the wallet extension
    pub fn import_key(&self, token: &str, account: &str, key: &str) -> Result<()> {
        self.registry.get(token)?;
        if !is_valid_viewing_key(key) {
            return Err(LbError::SchemaViolation(format!(
                "viewing key must be {} hex characters",
                lb_types::VIEWING_KEY_HEX_LEN
            )));
        }
        self.keys.insert(KeySlot::new(token, account), key.to_string());
        debug!(token, account, "Imported viewing key");
        Ok(())
    }

    /// Forget every key held for `account`
    ///
    /// Requests already in flight are not cancelled; drop their futures to do
    /// so. A key they still obtain is returned to their caller but not cached.
    pub fn disconnect(&self, account: &str) -> usize {
        *self.epochs.entry(account.to_string()).or_insert(0) += 1;
        let before = self.keys.len();
        self.keys.retain(|slot, _| slot.account != account);
        let dropped = before.saturating_sub(self.keys.len());
        info!(account, dropped, "Viewing keys cleared on disconnect");
        dropped
    }

    /// Human-unit balance of `account`, read with its cached viewing key
    ///
    /// A key the token contract refuses is evicted and reported as
    /// [`LbError::KeyNotFound`] so the caller can request a fresh one.
    pub async fn balance(&self, token: &str, account: &str, querier: &dyn QueryClient) -> Result<String> {
        let token_info = self.registry.get(token)?;
        let key = self.get(token, account)?;
        let query = ContractMessageBuilder::balance_query(account, &key)?;

        let raw = querier.query(&token_info.contract(), &query).await?;
        let answer: QueryAnswer = serde_json::from_value(raw)
            .map_err(|e| LbError::SchemaViolation(format!("unexpected balance answer: {}", e)))?;

        match answer {
            QueryAnswer::Balance { amount } => {
                FixedPointConverter::to_human(&amount, token_info.decimals, None)
            }
            QueryAnswer::ViewingKeyError { msg } => {
                warn!(token, account, %msg, "Token contract refused viewing key");
                self.keys.remove(&KeySlot::new(token, account));
                Err(LbError::KeyNotFound {
                    token: token.to_string(),
                    account: account.to_string(),
                })
            }
        }
    }

    async fn issue(&self, token: &Token, account: &str) -> Result<String> {
        let key = generate_key();
        let msg = ContractMessageBuilder::set_viewing_key(&key, &self.options.padding)?;
        let request = TxRequest {
            sender: account.to_string(),
            contract: token.contract(),
            msg,
            gas_limit: self.options.gas_limit,
        };

        info!(token = %token, account, "Requesting viewing key");
        submit_checked(self.broadcaster.as_ref(), request).await?;
        info!(token = %token, account, "Viewing key issued");
        Ok(key)
    }
}

async fn wait_for_outcome(mut rx: watch::Receiver<Outcome>, token: &str) -> Result<String> {
    let outcome = match rx.wait_for(Option::is_some).await {
        Ok(value) => value.clone(),
        Err(_) => None,
    };
    outcome.unwrap_or_else(|| {
        warn!(token, "Viewing key request abandoned by its leader");
        Err(LbError::RequestAbandoned {
            token: token.to_string(),
        })
    })
}

/// 32 bytes from the OS CSPRNG, hex-encoded
fn generate_key() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
