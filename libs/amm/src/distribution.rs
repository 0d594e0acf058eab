//! Liquidity distribution weights
//!
//! Weights are fractions of a side's total deposit assigned to each bin
//! offset. On the wire they travel as integers on a 1e18 scale
//! (`1.0` → `"1000000000000000000"`), converted here without floating point.

use lb_types::{LbError, Result, REAL_ID_SHIFT};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed-point scale of a distribution weight (1e18 = 100%)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Weight of one bin offset for each side of the pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinWeight {
    /// Signed distance from the active bin
    pub offset: i32,
    pub weight_x: Decimal,
    pub weight_y: Decimal,
}

impl BinWeight {
    pub fn new(offset: i32, weight_x: Decimal, weight_y: Decimal) -> Self {
        Self {
            offset,
            weight_x,
            weight_y,
        }
    }
}

/// Convert a weight in [0, 1] to the 1e18 scale, truncating sub-unit digits
pub fn to_fixed(weight: Decimal) -> Result<u128> {
    if weight < Decimal::ZERO || weight > Decimal::ONE {
        return Err(LbError::SchemaViolation(format!(
            "weight {} is outside [0, 1]",
            weight
        )));
    }
    (weight * Decimal::from(PRECISION))
        .trunc()
        .to_u128()
        .ok_or_else(|| LbError::SchemaViolation(format!("weight {} cannot be scaled", weight)))
}

/// Exact inverse of [`to_fixed`] for values on the 1e18 grid
pub fn from_fixed(value: u128) -> Result<Decimal> {
    if value > PRECISION {
        return Err(LbError::SchemaViolation(format!(
            "distribution {} exceeds {}",
            value, PRECISION
        )));
    }
    Ok(Decimal::from_i128_with_scale(value as i128, 18).normalize())
}

/// Parse a distribution string as sent in `distribution_x` / `distribution_y`
pub fn parse_fixed(value: &str) -> Result<Decimal> {
    let raw: u128 = value
        .parse()
        .map_err(|_| LbError::SchemaViolation(format!("distribution '{}' is not an integer", value)))?;
    from_fixed(raw)
}

/// Predefined spread shapes around the active bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum Shape {
    /// Everything in the active bin
    Spot,
    /// Flat: Y below the active bin, X above, half a share of each in the active bin
    Uniform { radius: u32 },
    /// Gaussian falloff with standard deviation `sigma` bins
    Curve { radius: u32, sigma: f64 },
}

impl Shape {
    /// Per-offset weights; each side sums to exactly one
    pub fn weights(&self) -> Result<Vec<BinWeight>> {
        match *self {
            Shape::Spot => Ok(vec![BinWeight::new(0, Decimal::ONE, Decimal::ONE)]),
            Shape::Uniform { radius } => {
                let radius = checked_radius(radius)?;
                let share = Decimal::TWO / Decimal::from(2 * radius + 1);
                let side: Vec<Decimal> = (1..=radius).map(|_| share).collect();
                Ok(mirror(&side))
            }
            Shape::Curve { radius, sigma } => {
                if !sigma.is_finite() || sigma <= 0.0 {
                    return Err(LbError::SchemaViolation(format!(
                        "curve sigma {} must be finite and positive",
                        sigma
                    )));
                }
                let radius = checked_radius(radius)?;
                let density = |d: i32| (-0.5 * (d as f64 / sigma).powi(2)).exp();
                // Active bin holds half a share per side, as in the uniform shape
                let total: f64 = density(0) / 2.0 + (1..=radius).map(density).sum::<f64>();
                let side = (1..=radius)
                    .map(|d| {
                        Decimal::from_f64(density(d) / total)
                            .map(|w| w.round_dp(18))
                            .ok_or_else(|| {
                                LbError::SchemaViolation(format!("curve weight at offset {} is not finite", d))
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(mirror(&side))
            }
        }
    }
}

/// A spread of `2r + 1` bins fits the id range only when `r < 2^23`
fn checked_radius(radius: u32) -> Result<i32> {
    if radius >= REAL_ID_SHIFT {
        return Err(LbError::SchemaViolation(format!(
            "spread radius {} must be below {}",
            radius, REAL_ID_SHIFT
        )));
    }
    Ok(radius as i32)
}

/// Build offsets `-r..=r` from one side's weights for offsets `1..=r`.
/// The active bin takes whatever remains so both sides sum to one.
fn mirror(side: &[Decimal]) -> Vec<BinWeight> {
    let radius = side.len() as i32;
    let center = Decimal::ONE - side.iter().copied().sum::<Decimal>();

    let below = side
        .iter()
        .enumerate()
        .rev()
        .map(|(i, w)| BinWeight::new(-(i as i32) - 1, Decimal::ZERO, *w));
    let above = side
        .iter()
        .enumerate()
        .map(|(i, w)| BinWeight::new(i as i32 + 1, *w, Decimal::ZERO));

    let mut weights = Vec::with_capacity(2 * radius as usize + 1);
    weights.extend(below);
    weights.push(BinWeight::new(0, center, center));
    weights.extend(above);
    weights
}
