//! ContractMessageBuilder - Pure Message Assembly
//!
//! Maps compiled plans onto the exact execute/query shapes in [`crate::msg`].
//! No I/O happens here; the only failure is a [`LbError::SchemaViolation`]
//! when the input lacks something the schema requires.

use crate::msg::{ExecuteMsg, LiquidityParameters, QueryMsg, RemoveLiquidityParams};
use lb_amm::{AllocationPlan, RemovalPlan, U256};
use lb_types::{is_valid_viewing_key, BinId, LbError, Pair, Result};
use tracing::debug;

pub struct ContractMessageBuilder;

impl ContractMessageBuilder {
    /// `add_liquidity` for a compiled allocation plan
    pub fn add_liquidity(plan: &AllocationPlan, deadline: u64) -> Result<ExecuteMsg> {
        if plan.bins.is_empty() {
            return Err(LbError::SchemaViolation(
                "add_liquidity requires at least one bin".into(),
            ));
        }
        check_deadline(deadline)?;

        let params = LiquidityParameters {
            token_x: plan.pair.token_x.to_token_type(),
            token_y: plan.pair.token_y.to_token_type(),
            bin_step: plan.pair.bin_step,
            amount_x: plan.amount_x.to_string(),
            amount_y: plan.amount_y.to_string(),
            amount_x_min: plan.amount_x_min.to_string(),
            amount_y_min: plan.amount_y_min.to_string(),
            active_id_desired: plan.desired_active_id.value(),
            id_slippage: plan.id_slippage,
            delta_ids: plan.delta_ids(),
            distribution_x: plan.bins.iter().map(|b| b.distribution_x.to_string()).collect(),
            distribution_y: plan.bins.iter().map(|b| b.distribution_y.to_string()).collect(),
            deadline,
        };

        debug!(
            bins = params.delta_ids.len(),
            active_id = params.active_id_desired,
            "Built add_liquidity message"
        );
        Ok(ExecuteMsg::AddLiquidity {
            liquidity_parameters: params,
        })
    }

    /// `remove_liquidity` for a compiled removal plan
    pub fn remove_liquidity(plan: &RemovalPlan, deadline: u64) -> Result<ExecuteMsg> {
        if plan.ids.is_empty() {
            return Err(LbError::SchemaViolation(
                "remove_liquidity requires at least one bin id".into(),
            ));
        }
        if plan.ids.len() != plan.amounts.len() {
            return Err(LbError::SchemaViolation(format!(
                "remove_liquidity has {} ids but {} amounts",
                plan.ids.len(),
                plan.amounts.len()
            )));
        }
        check_deadline(deadline)?;

        Ok(ExecuteMsg::RemoveLiquidity {
            remove_liquidity_params: RemoveLiquidityParams {
                token_x: plan.pair.token_x.to_token_type(),
                token_y: plan.pair.token_y.to_token_type(),
                bin_step: plan.pair.bin_step,
                amount_x_min: plan.amount_x_min.to_string(),
                amount_y_min: plan.amount_y_min.to_string(),
                ids: plan.ids.iter().map(|id| id.value()).collect(),
                amounts: plan.amounts.iter().map(U256::to_string).collect(),
                deadline,
            },
        })
    }

    /// `swap`; the recipient is mandatory
    pub fn swap(swap_for_y: bool, to: Option<&str>, amount_received: U256) -> Result<ExecuteMsg> {
        let to = to
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| LbError::SchemaViolation("swap requires a recipient address".into()))?;

        Ok(ExecuteMsg::Swap {
            swap_for_y,
            to: to.to_string(),
            amount_received: amount_received.to_string(),
        })
    }

    pub fn create_lb_pair(pair: &Pair, active_id: BinId) -> ExecuteMsg {
        ExecuteMsg::CreateLbPair {
            token_x: pair.token_x.to_token_type(),
            token_y: pair.token_y.to_token_type(),
            active_id: active_id.value(),
            bin_step: pair.bin_step,
        }
    }

    pub fn set_viewing_key(key: &str, padding: &str) -> Result<ExecuteMsg> {
        if !is_valid_viewing_key(key) {
            // Never echo the key itself
            return Err(LbError::SchemaViolation(format!(
                "viewing key must be {} hex characters",
                lb_types::VIEWING_KEY_HEX_LEN
            )));
        }
        Ok(ExecuteMsg::SetViewingKey {
            key: key.to_string(),
            padding: padding.to_string(),
        })
    }

    pub fn balance_query(address: &str, key: &str) -> Result<QueryMsg> {
        if address.trim().is_empty() {
            return Err(LbError::SchemaViolation("balance query requires an address".into()));
        }
        if key.is_empty() {
            return Err(LbError::SchemaViolation("balance query requires a viewing key".into()));
        }
        Ok(QueryMsg::Balance {
            address: address.to_string(),
            key: key.to_string(),
        })
    }

    /// Factory lookup of the pair contract serving `pair`
    pub fn lb_pair_information_query(pair: &Pair) -> QueryMsg {
        QueryMsg::GetLbPairInformation {
            token_a: pair.token_x.to_token_type(),
            token_b: pair.token_y.to_token_type(),
            bin_step: pair.bin_step,
        }
    }

    pub fn preset_query(bin_step: u16) -> Result<QueryMsg> {
        if bin_step == 0 {
            return Err(LbError::InvalidBinStep(bin_step));
        }
        Ok(QueryMsg::GetPreset { bin_step })
    }
}

fn check_deadline(deadline: u64) -> Result<()> {
    if deadline == 0 {
        return Err(LbError::SchemaViolation("deadline must be non-zero".into()));
    }
    Ok(())
}
