//! Price ↔ bin id mapping
//!
//! Bin `id` covers the half-open price interval
//! `[base^(id - 2^23), base^(id - 2^23 + 1))` with `base = 1 + bin_step / 10_000`.
//! Prices here are ratios of machine units (token Y per token X); use the
//! `ui_*` variants for prices quoted in human units.
//!
//! The forward mapping takes the floor of `ln(price) / ln(base)`. Double
//! precision logs can land a hair below an exact bin edge, so the floor is
//! corrected against [`BinPriceCodec::id_to_price`] itself: the returned id
//! always satisfies `id_to_price(id) <= price < id_to_price(id + 1)`.
//!
//! The mapping is lossy. `id_to_price(price_to_id(p))` returns the lower edge
//! of the bin containing `p`, not `p`; callers display it as an approximation.

use lb_types::{BinId, LbError, Result, MAX_BIN_ID, REAL_ID_SHIFT};

/// Basis points in one unit
pub const BASIS_POINT_MAX: f64 = 10_000.0;

pub struct BinPriceCodec;

impl BinPriceCodec {
    /// Price multiplier between adjacent bins
    pub fn base(bin_step: u16) -> Result<f64> {
        if bin_step == 0 {
            return Err(LbError::InvalidBinStep(bin_step));
        }
        Ok(1.0 + bin_step as f64 / BASIS_POINT_MAX)
    }

    /// Bin containing `price`
    pub fn price_to_id(price: f64, bin_step: u16) -> Result<BinId> {
        let base = Self::base(bin_step)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(LbError::invalid_price(price));
        }

        let ratio = price.ln() / base.ln();
        let floor = ratio.floor();

        // Reject before the cast so huge ratios cannot saturate into range
        let min_exp = -(REAL_ID_SHIFT as f64) - 1.0;
        let max_exp = (MAX_BIN_ID - REAL_ID_SHIFT) as f64 + 1.0;
        if floor < min_exp || floor > max_exp {
            return Err(LbError::BinIdOutOfRange(floor as i64 + REAL_ID_SHIFT as i64));
        }

        let mut exponent = floor as i64;
        if price_at(base, exponent + 1) <= price {
            exponent += 1;
        } else if price_at(base, exponent) > price {
            exponent -= 1;
        }

        BinId::from_exponent(exponent)
    }

    /// Lower price edge of bin `id`
    pub fn id_to_price(id: BinId, bin_step: u16) -> Result<f64> {
        Ok(price_at(Self::base(bin_step)?, id.exponent()))
    }

    /// Price interval `[low, high)` covered by bin `id`
    pub fn bin_bounds(id: BinId, bin_step: u16) -> Result<(f64, f64)> {
        let base = Self::base(bin_step)?;
        Ok((price_at(base, id.exponent()), price_at(base, id.exponent() + 1)))
    }

    /// Bin for a price quoted in human units of Y per human unit of X
    pub fn ui_price_to_id(
        ui_price: f64,
        bin_step: u16,
        decimals_x: u8,
        decimals_y: u8,
    ) -> Result<BinId> {
        if !ui_price.is_finite() || ui_price <= 0.0 {
            return Err(LbError::invalid_price(ui_price));
        }
        Self::price_to_id(ui_price * decimal_shift(decimals_x, decimals_y), bin_step)
    }

    /// Lower edge of bin `id` in human units of Y per human unit of X
    pub fn id_to_ui_price(id: BinId, bin_step: u16, decimals_x: u8, decimals_y: u8) -> Result<f64> {
        Ok(Self::id_to_price(id, bin_step)? / decimal_shift(decimals_x, decimals_y))
    }
}

fn price_at(base: f64, exponent: i64) -> f64 {
    base.powf(exponent as f64)
}

/// Factor converting a human price into a machine price: 10^(dy - dx)
fn decimal_shift(decimals_x: u8, decimals_y: u8) -> f64 {
    10f64.powi(decimals_y as i32 - decimals_x as i32)
}
