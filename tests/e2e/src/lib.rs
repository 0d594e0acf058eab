//! End-to-End Test Fixtures for the liquidity book client core
//!
//! In-memory stand-ins for the external signer/broadcaster and query
//! transport, so scenarios can drive the full path from a user intent to the
//! submitted message without a chain.

use async_trait::async_trait;
use lb_config::Settings;
use lb_contracts::{Broadcaster, ExecuteMsg, QueryClient, QueryMsg, TxRequest, TxResponse};
use lb_types::{ContractRef, LbError, Pair, Result, TokenRegistry, TokenType};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Records every submission and replays scripted responses
///
/// When the script runs out every further submission succeeds.
#[derive(Default)]
pub struct RecordingBroadcaster {
    submitted: Mutex<Vec<TxRequest>>,
    script: Mutex<VecDeque<Result<TxResponse>>>,
    latency: Duration,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every submission, widening race windows
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn push_response(&self, response: Result<TxResponse>) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(response);
    }

    pub fn reject_next(&self, code: u32, raw_log: &str) {
        self.push_response(Ok(TxResponse {
            code,
            raw_log: raw_log.to_string(),
            gas_used: 50_000,
            tx_hash: None,
        }));
    }

    pub fn submitted(&self) -> Vec<TxRequest> {
        self.submitted.lock().expect("submitted lock poisoned").clone()
    }

    /// Submitted messages of one schema kind
    pub fn count(&self, kind: &str) -> usize {
        self.submitted()
            .iter()
            .filter(|r| r.msg.kind() == kind)
            .count()
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn submit(&self, request: TxRequest) -> Result<TxResponse> {
        debug!(kind = request.msg.kind(), "Recording submission");
        self.submitted
            .lock()
            .expect("submitted lock poisoned")
            .push(request);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let scripted = self.script.lock().expect("script lock poisoned").pop_front();
        scripted.unwrap_or_else(|| {
            Ok(TxResponse {
                code: 0,
                raw_log: String::new(),
                gas_used: 100_000,
                tx_hash: Some("E2E".into()),
            })
        })
    }
}

/// SNIP-20 balances keyed by (token address, account); any viewing key is
/// accepted unless it was revoked. Also answers factory pair lookups.
#[derive(Default)]
pub struct StaticLedger {
    balances: HashMap<(String, String), String>,
    revoked: Mutex<Vec<String>>,
    pairs: HashMap<(String, String, u16), ContractRef>,
}

impl StaticLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, token: &str, account: &str, amount: &str) -> Self {
        self.balances
            .insert((token.to_string(), account.to_string()), amount.to_string());
        self
    }

    /// Register the pair contract the factory reports for `pair`
    pub fn with_pair(mut self, pair: &Pair, contract: ContractRef) -> Self {
        self.pairs.insert(
            (
                pair.token_x.address.clone(),
                pair.token_y.address.clone(),
                pair.bin_step,
            ),
            contract,
        );
        self
    }

    pub fn revoke(&self, key: &str) {
        self.revoked.lock().expect("revoked lock poisoned").push(key.to_string());
    }
}

#[async_trait]
impl QueryClient for StaticLedger {
    async fn query(&self, contract: &ContractRef, msg: &QueryMsg) -> Result<serde_json::Value> {
        match msg {
            QueryMsg::Balance { address, key } => {
                if self.revoked.lock().expect("revoked lock poisoned").contains(key) {
                    return Ok(serde_json::json!({
                        "viewing_key_error": { "msg": "Wrong viewing key for this address or viewing key not set" }
                    }));
                }
                let amount = self
                    .balances
                    .get(&(contract.address.clone(), address.clone()))
                    .cloned()
                    .unwrap_or_else(|| "0".to_string());
                Ok(serde_json::json!({ "balance": { "amount": amount } }))
            }
            QueryMsg::GetLbPairInformation {
                token_a,
                token_b,
                bin_step,
            } => {
                let (TokenType::CustomToken { contract_addr: a, .. }, TokenType::CustomToken { contract_addr: b, .. }) =
                    (token_a, token_b);
                let pair_contract = self
                    .pairs
                    .get(&(a.clone(), b.clone(), *bin_step))
                    .ok_or_else(|| LbError::ContractRejected {
                        code: 3,
                        raw_log: format!("LB pair not found: {} {} {}", a, b, bin_step),
                        gas_used: 0,
                    })?;
                Ok(serde_json::json!({
                    "lb_pair_information": {
                        "bin_step": bin_step,
                        "lb_pair": {
                            "token_x": token_a,
                            "token_y": token_b,
                            "bin_step": bin_step,
                            "contract": pair_contract
                        },
                        "created_by_owner": true,
                        "ignored_for_routing": false
                    }
                }))
            }
            QueryMsg::GetPreset { .. } => Err(LbError::Transport("no presets configured".into())),
        }
    }
}

/// Built-in settings and their registry, isolated from the caller's environment
pub fn fixture_settings() -> (Settings, TokenRegistry) {
    let settings = Settings::load_with_prefix(None, "LB_E2E").expect("built-in settings load");
    let registry = settings.token_registry().expect("built-in token list is valid");
    (settings, registry)
}

/// Pull the execute message out of a recorded request as JSON
pub fn msg_json(msg: &ExecuteMsg) -> serde_json::Value {
    serde_json::to_value(msg).expect("execute messages serialize")
}

/// Transport failure helper
pub fn transport_error(detail: &str) -> Result<TxResponse> {
    Err(LbError::Transport(detail.to_string()))
}
