//! Contract message schema
//!
//! Field names are fixed by the pair, factory and SNIP-20 contracts. Every
//! 256-bit amount and every 1e18 distribution weight travels as a decimal
//! string.

use lb_types::{ContractRef, TokenType};
use serde::{Deserialize, Serialize};

/// Execute messages understood by the pair, router, factory and token contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    AddLiquidity {
        liquidity_parameters: LiquidityParameters,
    },
    RemoveLiquidity {
        remove_liquidity_params: RemoveLiquidityParams,
    },
    Swap {
        swap_for_y: bool,
        to: String,
        amount_received: String,
    },
    CreateLbPair {
        token_x: TokenType,
        token_y: TokenType,
        active_id: u32,
        bin_step: u16,
    },
    SetViewingKey {
        key: String,
        padding: String,
    },
}

impl ExecuteMsg {
    /// Schema name of the message, used for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ExecuteMsg::AddLiquidity { .. } => "add_liquidity",
            ExecuteMsg::RemoveLiquidity { .. } => "remove_liquidity",
            ExecuteMsg::Swap { .. } => "swap",
            ExecuteMsg::CreateLbPair { .. } => "create_lb_pair",
            ExecuteMsg::SetViewingKey { .. } => "set_viewing_key",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityParameters {
    pub token_x: TokenType,
    pub token_y: TokenType,
    pub bin_step: u16,
    pub amount_x: String,
    pub amount_y: String,
    pub amount_x_min: String,
    pub amount_y_min: String,
    pub active_id_desired: u32,
    pub id_slippage: u32,
    pub delta_ids: Vec<i32>,
    pub distribution_x: Vec<String>,
    pub distribution_y: Vec<String>,
    pub deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityParams {
    pub token_x: TokenType,
    pub token_y: TokenType,
    pub bin_step: u16,
    pub amount_x_min: String,
    pub amount_y_min: String,
    pub ids: Vec<u32>,
    pub amounts: Vec<String>,
    pub deadline: u64,
}

/// Authenticated SNIP-20 and factory queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Balance {
        address: String,
        key: String,
    },
    GetLbPairInformation {
        token_a: TokenType,
        token_b: TokenType,
        bin_step: u16,
    },
    GetPreset {
        bin_step: u16,
    },
}

impl QueryMsg {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryMsg::Balance { .. } => "balance",
            QueryMsg::GetLbPairInformation { .. } => "get_lb_pair_information",
            QueryMsg::GetPreset { .. } => "get_preset",
        }
    }
}

/// SNIP-20 query answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryAnswer {
    Balance { amount: String },
    ViewingKeyError { msg: String },
}

/// Factory answer to `get_lb_pair_information`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LbPairInformationResponse {
    pub lb_pair_information: LbPairInformation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LbPairInformation {
    pub bin_step: u16,
    pub lb_pair: LbPair,
    pub created_by_owner: bool,
    pub ignored_for_routing: bool,
}

/// A deployed pair as the factory registers it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LbPair {
    pub token_x: TokenType,
    pub token_y: TokenType,
    pub bin_step: u16,
    pub contract: ContractRef,
}

/// Fee and volatility parameters the factory applies to a bin step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetResponse {
    pub base_factor: u16,
    pub filter_period: u16,
    pub decay_period: u16,
    pub reduction_factor: u16,
    pub variable_fee_control: u32,
    pub protocol_share: u16,
    pub max_volatility_accumulator: u32,
    pub is_open: bool,
}
