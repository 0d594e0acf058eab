//! Signer / broadcaster and query collaborator boundary
//!
//! The core never signs or retries. It hands a [`TxRequest`] to a
//! [`Broadcaster`] exactly once and reports what came back.

use crate::msg::{ExecuteMsg, QueryMsg};
use async_trait::async_trait;
use lb_types::{ContractRef, LbError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One execute message addressed to one contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxRequest {
    pub sender: String,
    pub contract: ContractRef,
    pub msg: ExecuteMsg,
    pub gas_limit: u64,
}

/// What the chain reported for a broadcast transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub code: u32,
    pub raw_log: String,
    pub gas_used: u64,
    pub tx_hash: Option<String>,
}

/// Structured result for callers that present transactions to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TxOutcome {
    Success {
        tx_hash: Option<String>,
        gas_used: u64,
    },
    Failed {
        code: u32,
        raw_log: String,
        gas_used: u64,
    },
}

impl TxResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    pub fn into_outcome(self) -> TxOutcome {
        if self.is_success() {
            TxOutcome::Success {
                tx_hash: self.tx_hash,
                gas_used: self.gas_used,
            }
        } else {
            TxOutcome::Failed {
                code: self.code,
                raw_log: self.raw_log,
                gas_used: self.gas_used,
            }
        }
    }

    /// Non-zero status code as [`LbError::ContractRejected`]
    pub fn into_result(self) -> Result<TxResponse> {
        if self.is_success() {
            return Ok(self);
        }
        Err(LbError::ContractRejected {
            code: self.code,
            raw_log: self.raw_log,
            gas_used: self.gas_used,
        })
    }
}

/// Signs and broadcasts a single message
///
/// Transport failures are `Err(LbError::Transport)`. A transaction that
/// executed and failed is `Ok` with a non-zero `code`.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn submit(&self, request: TxRequest) -> Result<TxResponse>;
}

/// Encrypted smart-contract queries
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn query(&self, contract: &ContractRef, msg: &QueryMsg) -> Result<serde_json::Value>;
}

/// Submit once and turn a non-zero status code into an error
pub async fn submit_checked(broadcaster: &dyn Broadcaster, request: TxRequest) -> Result<TxResponse> {
    let kind = request.msg.kind();
    let contract = request.contract.address.clone();

    let response = broadcaster.submit(request).await?;
    if response.is_success() {
        debug!(kind, %contract, gas_used = response.gas_used, "Transaction succeeded");
    } else {
        warn!(
            kind,
            %contract,
            code = response.code,
            raw_log = %response.raw_log,
            "Contract rejected transaction"
        );
    }
    response.into_result()
}
