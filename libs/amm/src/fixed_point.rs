//! Human ↔ machine token amount conversion
//!
//! Machine amounts are unsigned 256-bit integers (`machine = human * 10^decimals`).
//! Both directions work on the decimal digits directly with U256 arithmetic, so
//! amounts far beyond 2^53 (or the 28 significant digits of `Decimal`) convert
//! exactly.
//!
//! ## Conversion Rules
//!
//! - **to_machine**: truncates fractional digits beyond `decimals`, never rounds up
//! - **to_human**: minimal exact representation, or fixed `precision` digits
//!   rounded half-up
//!
//! ```rust
//! use lb_amm::FixedPointConverter;
//!
//! let machine = FixedPointConverter::to_machine("1.5", 6).unwrap();
//! assert_eq!(machine.to_string(), "1500000");
//!
//! let human = FixedPointConverter::to_human("1500000", 6, None).unwrap();
//! assert_eq!(human, "1.5");
//! ```

use lb_types::{LbError, Result};
use primitive_types::U256;

/// Stateless converter between human decimal strings and on-chain integers
pub struct FixedPointConverter;

impl FixedPointConverter {
    /// Convert a human decimal string to machine units, truncating excess digits
    pub fn to_machine(amount: &str, decimals: u8) -> Result<U256> {
        let (whole, fraction) = split_decimal(amount)?;
        let scale = pow10(decimals).ok_or_else(|| {
            LbError::invalid_amount(amount, format!("10^{} overflows 256 bits", decimals))
        })?;

        let whole_units = parse_digits(whole)
            .ok_or_else(|| LbError::invalid_amount(amount, "integer part overflows 256 bits"))?
            .checked_mul(scale)
            .ok_or_else(|| LbError::invalid_amount(amount, "amount overflows 256 bits"))?;

        // Keep at most `decimals` fractional digits, right-padded with zeros
        let kept: String = fraction.chars().take(decimals as usize).collect();
        let padded = format!("{:0<width$}", kept, width = decimals as usize);
        let fraction_units = parse_digits(&padded).unwrap_or_default();

        whole_units
            .checked_add(fraction_units)
            .ok_or_else(|| LbError::invalid_amount(amount, "amount overflows 256 bits"))
    }

    /// Convert a machine integer string to a human decimal string
    pub fn to_human(amount: &str, decimals: u8, precision: Option<u8>) -> Result<String> {
        if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LbError::invalid_amount(
                amount,
                "expected a non-negative integer string",
            ));
        }
        let value = parse_digits(amount)
            .ok_or_else(|| LbError::invalid_amount(amount, "amount overflows 256 bits"))?;
        Self::format_units(value, decimals, precision)
    }

    /// Format a machine amount already held as U256
    pub fn format_units(value: U256, decimals: u8, precision: Option<u8>) -> Result<String> {
        let scale = pow10(decimals).ok_or_else(|| {
            LbError::invalid_amount(&value.to_string(), format!("10^{} overflows 256 bits", decimals))
        })?;

        match precision {
            None => {
                let whole = value / scale;
                let rem = value % scale;
                if rem.is_zero() {
                    return Ok(whole.to_string());
                }
                let fraction = pad_left(rem, decimals);
                Ok(format!("{}.{}", whole, fraction.trim_end_matches('0')))
            }
            Some(p) if p >= decimals => {
                let whole = value / scale;
                let fraction = pad_left(value % scale, decimals);
                Ok(join_fixed(whole, &format!("{:0<width$}", fraction, width = p as usize)))
            }
            Some(p) => {
                // Drop (decimals - p) digits, rounding half-up
                let drop = pow10(decimals - p).unwrap_or_else(U256::one);
                let mut kept = value / drop;
                let rem = value % drop;
                if rem >= drop - rem {
                    kept += U256::one();
                }
                let unit = pow10(p).unwrap_or_else(U256::one);
                Ok(join_fixed(kept / unit, &pad_left(kept % unit, p)))
            }
        }
    }
}

/// 10^exp, or None when it does not fit in 256 bits
pub(crate) fn pow10(exp: u8) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

/// Validate a non-negative decimal string and split it at the point
fn split_decimal(amount: &str) -> Result<(&str, &str)> {
    if amount.starts_with('-') {
        return Err(LbError::invalid_amount(amount, "negative amounts are not allowed"));
    }
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let well_formed = whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
        && !(whole.is_empty() && fraction.is_empty());
    if !well_formed {
        return Err(LbError::invalid_amount(
            amount,
            "expected digits with at most one decimal point",
        ));
    }
    Ok((whole, fraction))
}

fn parse_digits(digits: &str) -> Option<U256> {
    if digits.is_empty() {
        return Some(U256::zero());
    }
    U256::from_dec_str(digits).ok()
}

fn pad_left(value: U256, width: u8) -> String {
    if width == 0 {
        return String::new();
    }
    format!("{:0>width$}", value.to_string(), width = width as usize)
}

fn join_fixed(whole: U256, fraction: &str) -> String {
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
