//! Liquidity allocation compiler
//!
//! Turns a human-level deposit intent into the per-bin distribution and the
//! slippage floors an `add_liquidity` message carries, and a withdrawal intent
//! into the floors of a `remove_liquidity` message.
//!
//! Compilation is a pure function of its inputs: the same intent, active id and
//! slippage always produce an identical plan, so a plan can be rebuilt and
//! resubmitted after a network failure without risk of drift.
//!
//! ## Rounding
//!
//! Every amount is truncated towards zero. Per-bin deposits never exceed the
//! desired total, and the floors are `floor(amount * (10000 - bps) / 10000)`.

use crate::distribution::{self, BinWeight, PRECISION};
use crate::fixed_point::FixedPointConverter;
use lb_types::{BinId, LbError, Pair, Result};
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Tolerance on the sum of a side's weights
pub const WEIGHT_EPSILON: Decimal = dec!(0.000001);

/// Slippage denominator (100%)
pub const BASIS_POINT_MAX: u16 = 10_000;

/// What the user wants to deposit, in human units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityIntent {
    pub pair: Pair,
    pub amount_x: String,
    pub amount_y: String,
    pub spread: Vec<BinWeight>,
    /// Allowed drift of the on-chain active bin at execution time
    pub id_slippage: u32,
}

/// Deposit into a single bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinAllocation {
    pub offset: i32,
    pub bin_id: BinId,
    /// Weight on the 1e18 scale
    pub distribution_x: u128,
    pub distribution_y: u128,
    pub deposit_x: U256,
    pub deposit_y: U256,
}

/// Compiled `add_liquidity` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub pair: Pair,
    pub bins: Vec<BinAllocation>,
    pub amount_x: U256,
    pub amount_y: U256,
    pub amount_x_min: U256,
    pub amount_y_min: U256,
    pub desired_active_id: BinId,
    pub id_slippage: u32,
}

impl AllocationPlan {
    pub fn delta_ids(&self) -> Vec<i32> {
        self.bins.iter().map(|b| b.offset).collect()
    }

    /// Sum of per-bin deposits; at most `amount_x` / `amount_y`
    pub fn total_deposits(&self) -> (U256, U256) {
        self.bins.iter().fold((U256::zero(), U256::zero()), |(x, y), b| {
            (x + b.deposit_x, y + b.deposit_y)
        })
    }
}

/// LB-token balance held in one bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinPosition {
    pub bin_id: BinId,
    pub amount: U256,
}

/// What the user wants to withdraw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalIntent {
    pub pair: Pair,
    pub positions: Vec<BinPosition>,
    /// Machine amounts the caller expects back, from a reserves query
    pub expected_x: U256,
    pub expected_y: U256,
}

/// Compiled `remove_liquidity` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalPlan {
    pub pair: Pair,
    pub ids: Vec<BinId>,
    pub amounts: Vec<U256>,
    pub amount_x_min: U256,
    pub amount_y_min: U256,
}

pub struct LiquidityAllocationCompiler;

impl LiquidityAllocationCompiler {
    /// Compile a deposit intent against the active bin
    pub fn compile(
        intent: &LiquidityIntent,
        active_id: BinId,
        slippage_bps: u16,
    ) -> Result<AllocationPlan> {
        check_slippage(slippage_bps)?;
        if intent.spread.is_empty() {
            return Err(LbError::SpreadEmpty);
        }

        let amount_x = FixedPointConverter::to_machine(&intent.amount_x, intent.pair.token_x.decimals)?;
        let amount_y = FixedPointConverter::to_machine(&intent.amount_y, intent.pair.token_y.decimals)?;
        if amount_x.is_zero() && amount_y.is_zero() {
            return Err(LbError::EmptyIntent);
        }

        check_unique_offsets(&intent.spread)?;
        check_side('x', intent.spread.iter().map(|w| w.weight_x), !amount_x.is_zero())?;
        check_side('y', intent.spread.iter().map(|w| w.weight_y), !amount_y.is_zero())?;

        let mut dist_x = intent
            .spread
            .iter()
            .map(|w| distribution::to_fixed(w.weight_x))
            .collect::<Result<Vec<_>>>()?;
        let mut dist_y = intent
            .spread
            .iter()
            .map(|w| distribution::to_fixed(w.weight_y))
            .collect::<Result<Vec<_>>>()?;
        normalize_to_unit(&mut dist_x);
        normalize_to_unit(&mut dist_y);

        let bins = intent
            .spread
            .iter()
            .zip(dist_x.iter().zip(dist_y.iter()))
            .map(|(w, (&dx, &dy))| -> Result<BinAllocation> {
                Ok(BinAllocation {
                    offset: w.offset,
                    bin_id: active_id.offset(w.offset)?,
                    distribution_x: dx,
                    distribution_y: dy,
                    deposit_x: share_of(amount_x, dx),
                    deposit_y: share_of(amount_y, dy),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let plan = AllocationPlan {
            pair: intent.pair.clone(),
            bins,
            amount_x,
            amount_y,
            amount_x_min: slippage_floor(amount_x, slippage_bps),
            amount_y_min: slippage_floor(amount_y, slippage_bps),
            desired_active_id: active_id,
            id_slippage: intent.id_slippage,
        };

        debug!(
            active_id = %active_id,
            bins = plan.bins.len(),
            amount_x = %plan.amount_x,
            amount_y = %plan.amount_y,
            "Compiled allocation plan"
        );
        Ok(plan)
    }

    /// Compile a withdrawal intent
    pub fn compile_removal(intent: &RemovalIntent, slippage_bps: u16) -> Result<RemovalPlan> {
        check_slippage(slippage_bps)?;
        if intent.positions.is_empty() {
            return Err(LbError::SpreadEmpty);
        }
        if intent.positions.iter().all(|p| p.amount.is_zero()) {
            return Err(LbError::EmptyIntent);
        }

        let mut seen = HashSet::new();
        for position in &intent.positions {
            if !seen.insert(position.bin_id) {
                return Err(LbError::SchemaViolation(format!(
                    "bin {} listed more than once",
                    position.bin_id
                )));
            }
        }

        debug!(bins = intent.positions.len(), "Compiled removal plan");
        Ok(RemovalPlan {
            pair: intent.pair.clone(),
            ids: intent.positions.iter().map(|p| p.bin_id).collect(),
            amounts: intent.positions.iter().map(|p| p.amount).collect(),
            amount_x_min: slippage_floor(intent.expected_x, slippage_bps),
            amount_y_min: slippage_floor(intent.expected_y, slippage_bps),
        })
    }
}

/// floor(amount * (10000 - bps) / 10000) without overflowing 256 bits
pub fn slippage_floor(amount: U256, slippage_bps: u16) -> U256 {
    let max = U256::from(BASIS_POINT_MAX);
    let keep = U256::from(BASIS_POINT_MAX.saturating_sub(slippage_bps));
    (amount / max) * keep + (amount % max) * keep / max
}

/// floor(amount * weight / 1e18) without overflowing 256 bits
fn share_of(amount: U256, weight: u128) -> U256 {
    let precision = U256::from(PRECISION);
    let weight = U256::from(weight);
    (amount / precision) * weight + (amount % precision) * weight / precision
}

fn check_slippage(slippage_bps: u16) -> Result<()> {
    if slippage_bps > BASIS_POINT_MAX {
        return Err(LbError::InvalidSlippage(slippage_bps as u32));
    }
    Ok(())
}

fn check_unique_offsets(spread: &[BinWeight]) -> Result<()> {
    let mut seen = HashSet::with_capacity(spread.len());
    for w in spread {
        if !seen.insert(w.offset) {
            return Err(LbError::DuplicateBinOffset(w.offset));
        }
    }
    Ok(())
}

/// A funded side must sum to one; an unfunded side to zero or one
fn check_side(side: char, weights: impl Iterator<Item = Decimal>, funded: bool) -> Result<()> {
    let mut sum = Decimal::ZERO;
    for w in weights {
        if w < Decimal::ZERO || w > Decimal::ONE {
            return Err(LbError::weight_mismatch(side, format!("weight {} is outside [0, 1]", w)));
        }
        sum += w;
    }

    let is_unit = (sum - Decimal::ONE).abs() <= WEIGHT_EPSILON;
    if is_unit || (!funded && sum.is_zero()) {
        return Ok(());
    }
    Err(LbError::weight_mismatch(
        side,
        format!("weights sum to {}, expected 1 within {}", sum, WEIGHT_EPSILON),
    ))
}

/// Make a non-zero distribution sum to exactly 1e18
///
/// Excess is trimmed from the last non-zero weights; a deficit left by
/// weights inside the epsilon below one goes to the last non-zero weight.
fn normalize_to_unit(distribution: &mut [u128]) {
    let total: u128 = distribution.iter().sum();
    if total == 0 {
        return;
    }

    if total < PRECISION {
        if let Some(last) = distribution.iter_mut().rev().find(|d| **d > 0) {
            *last += PRECISION - total;
        }
        return;
    }

    let mut excess = total - PRECISION;
    for d in distribution.iter_mut().rev() {
        if excess == 0 {
            break;
        }
        let cut = excess.min(*d);
        *d -= cut;
        excess -= cut;
    }
}
