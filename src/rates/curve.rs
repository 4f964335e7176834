//! Utilization -> borrow/supply rate curves, evaluated on per-block parameters exactly
//! as the deployed models compute them (truncating 18-decimal fixed-point arithmetic).
//!
//! Jump:      util <= kink  : util*m/1e18 + base
//!            util >  kink  : kink*m/1e18 + base + (util-kink)*jump/1e18
//!
//! Two kinks: util <  kink1 : util*m/1e18 + base
//!            util <  kink2 : rate1 + (util-kink1)*m2/1e18 + base2
//!            otherwise     : rate1 + (kink2-kink1)*m2/1e18 + base2 + (util-kink2)*jump/1e18
//!            where rate1 = kink1*m/1e18 + base

use crate::error::ConfigError;
use crate::math::mantissa_one;
use crate::rates::params::{ParsedRateModelParams, RateModelParams};
use alloy::primitives::U256;

type CurveResult = Result<U256, ConfigError>;

fn overflow(op: &str) -> ConfigError {
    ConfigError::Overflow(format!("rate curve {op}"))
}

fn add(a: U256, b: U256) -> CurveResult {
    a.checked_add(b).ok_or_else(|| overflow("addition"))
}

fn sub(a: U256, b: U256) -> CurveResult {
    a.checked_sub(b).ok_or_else(|| overflow("subtraction"))
}

/// `a * b / 1e18`, truncating.
fn mul_exp(a: U256, b: U256) -> CurveResult {
    Ok(a.checked_mul(b).ok_or_else(|| overflow("multiplication"))? / mantissa_one())
}

/// `borrows / (cash + borrows - reserves)` as a mantissa; zero without borrows.
pub fn utilization_rate(cash: U256, borrows: U256, reserves: U256) -> CurveResult {
    if borrows.is_zero() {
        return Ok(U256::ZERO);
    }
    let denominator = sub(add(cash, borrows)?, reserves)?;
    if denominator.is_zero() {
        return Ok(U256::ZERO);
    }
    Ok(borrows
        .checked_mul(mantissa_one())
        .ok_or_else(|| overflow("multiplication"))?
        / denominator)
}

/// Per-block borrow rate for `per_block` parameters at utilization `util`.
pub fn borrow_rate(per_block: &ParsedRateModelParams, util: U256) -> CurveResult {
    match per_block {
        RateModelParams::Whitepaper {
            base_rate_per_year: base,
            multiplier_per_year: multiplier,
        } => add(mul_exp(util, *multiplier)?, *base),
        RateModelParams::Jump {
            base_rate_per_year: base,
            multiplier_per_year: multiplier,
            jump_multiplier_per_year: jump,
            kink,
        } => {
            if util <= *kink {
                return add(mul_exp(util, *multiplier)?, *base);
            }
            let normal = add(mul_exp(*kink, *multiplier)?, *base)?;
            add(normal, mul_exp(sub(util, *kink)?, *jump)?)
        }
        RateModelParams::TwoKinks {
            base_rate_per_year: base,
            multiplier_per_year: multiplier,
            kink1,
            base_rate_per_year2: base2,
            multiplier_per_year2: multiplier2,
            kink2,
            jump_multiplier_per_year: jump,
        } => {
            if util < *kink1 {
                return add(mul_exp(util, *multiplier)?, *base);
            }
            let rate1 = add(mul_exp(*kink1, *multiplier)?, *base)?;
            if util < *kink2 {
                let rate2 = add(mul_exp(sub(util, *kink1)?, *multiplier2)?, *base2)?;
                return add(rate1, rate2);
            }
            let rate2 = add(mul_exp(sub(*kink2, *kink1)?, *multiplier2)?, *base2)?;
            let jump_rate = mul_exp(sub(util, *kink2)?, *jump)?;
            add(add(rate1, rate2)?, jump_rate)
        }
    }
}

/// `util * (borrow_rate * (1e18 - reserve_factor) / 1e18) / 1e18`
pub fn supply_rate(util: U256, borrow_rate: U256, reserve_factor: U256) -> CurveResult {
    if reserve_factor > mantissa_one() {
        return Err(ConfigError::Invalid(format!(
            "reserve factor {reserve_factor} exceeds 1e18"
        )));
    }
    let one_minus_reserve_factor = mantissa_one() - reserve_factor;
    let rate_to_pool = mul_exp(borrow_rate, one_minus_reserve_factor)?;
    mul_exp(util, rate_to_pool)
}
