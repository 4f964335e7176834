//! Expected on-chain values for a configured rate model, and their comparison against
//! what the deployed contract reports.
//!
//! Yearly mantissas become per-block mantissas by integer floor division by the chain's
//! blocks-per-year constant. Kinks are utilization ratios and are compared unchanged.

use crate::chain::ChainReader;
use crate::error::{ConfigError, Result};
use crate::math::format_mantissa;
use crate::rates::curve::{borrow_rate, supply_rate, utilization_rate};
use crate::rates::params::{ParsedRateModelParams, RateModelKind, RateModelParams};
use alloy::primitives::{Address, U256};
use std::fmt;

/// Optional getter; contracts deployed before it existed revert on it.
pub const BLOCKS_PER_YEAR_GETTER: &str = "blocksPerYear";

/// Market getters feeding the observed-rate check, in read order.
const MARKET_STATE_GETTERS: [&str; 6] = [
    "getCash",
    "totalBorrows",
    "totalReserves",
    "reserveFactorMantissa",
    "borrowRatePerBlock",
    "supplyRatePerBlock",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedField {
    pub name: &'static str,
    pub value: U256,
}

/// One expected-vs-actual mismatch. Recorded, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrepancy {
    pub model: String,
    pub field: String,
    pub expected: U256,
    pub actual: U256,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} expected={} actual={}",
            self.model, self.field, self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCheck {
    pub label: String,
    pub contract: Address,
    pub kind: RateModelKind,
    pub fields_checked: usize,
    /// `None` when the contract predates the `blocksPerYear` getter.
    pub reported_blocks_per_year: Option<U256>,
    pub discrepancies: Vec<Discrepancy>,
}

impl ModelCheck {
    pub fn passed(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

pub fn per_block(yearly: U256, blocks_per_year: u64) -> std::result::Result<U256, ConfigError> {
    if blocks_per_year == 0 {
        return Err(ConfigError::Invalid(
            "blocks per year must be non-zero".to_string(),
        ));
    }
    Ok(yearly / U256::from(blocks_per_year))
}

/// Same variant with every yearly rate converted to its per-block value.
pub fn to_per_block(
    params: &ParsedRateModelParams,
    blocks_per_year: u64,
) -> std::result::Result<ParsedRateModelParams, ConfigError> {
    let pb = |v: &U256| per_block(*v, blocks_per_year);
    Ok(match params {
        RateModelParams::Whitepaper {
            base_rate_per_year,
            multiplier_per_year,
        } => RateModelParams::Whitepaper {
            base_rate_per_year: pb(base_rate_per_year)?,
            multiplier_per_year: pb(multiplier_per_year)?,
        },
        RateModelParams::Jump {
            base_rate_per_year,
            multiplier_per_year,
            jump_multiplier_per_year,
            kink,
        } => RateModelParams::Jump {
            base_rate_per_year: pb(base_rate_per_year)?,
            multiplier_per_year: pb(multiplier_per_year)?,
            jump_multiplier_per_year: pb(jump_multiplier_per_year)?,
            kink: *kink,
        },
        RateModelParams::TwoKinks {
            base_rate_per_year,
            multiplier_per_year,
            kink1,
            base_rate_per_year2,
            multiplier_per_year2,
            kink2,
            jump_multiplier_per_year,
        } => RateModelParams::TwoKinks {
            base_rate_per_year: pb(base_rate_per_year)?,
            multiplier_per_year: pb(multiplier_per_year)?,
            kink1: *kink1,
            base_rate_per_year2: pb(base_rate_per_year2)?,
            multiplier_per_year2: pb(multiplier_per_year2)?,
            kink2: *kink2,
            jump_multiplier_per_year: pb(jump_multiplier_per_year)?,
        },
    })
}

/// Getter name and expected value for every field the deployed contract exposes.
pub fn expected_fields(
    params: &ParsedRateModelParams,
    blocks_per_year: u64,
) -> std::result::Result<Vec<ExpectedField>, ConfigError> {
    let field = |name, value| ExpectedField { name, value };
    Ok(match to_per_block(params, blocks_per_year)? {
        RateModelParams::Whitepaper {
            base_rate_per_year,
            multiplier_per_year,
        } => vec![
            field("baseRatePerBlock", base_rate_per_year),
            field("multiplierPerBlock", multiplier_per_year),
        ],
        RateModelParams::Jump {
            base_rate_per_year,
            multiplier_per_year,
            jump_multiplier_per_year,
            kink,
        } => vec![
            field("baseRatePerBlock", base_rate_per_year),
            field("multiplierPerBlock", multiplier_per_year),
            field("jumpMultiplierPerBlock", jump_multiplier_per_year),
            field("kink", kink),
        ],
        RateModelParams::TwoKinks {
            base_rate_per_year,
            multiplier_per_year,
            kink1,
            base_rate_per_year2,
            multiplier_per_year2,
            kink2,
            jump_multiplier_per_year,
        } => vec![
            field("baseRatePerBlock", base_rate_per_year),
            field("multiplierPerBlock", multiplier_per_year),
            field("kink1", kink1),
            field("baseRate2PerBlock", base_rate_per_year2),
            field("multiplier2PerBlock", multiplier_per_year2),
            field("kink2", kink2),
            field("jumpMultiplierPerBlock", jump_multiplier_per_year),
        ],
    })
}

pub struct RateModelEvaluator<'a> {
    reader: &'a dyn ChainReader,
}

impl<'a> RateModelEvaluator<'a> {
    pub fn new(reader: &'a dyn ChainReader) -> Self {
        Self { reader }
    }

    /// Compare a deployed model against `params`.
    ///
    /// Every field is read and compared even after a mismatch. A failed read of a
    /// required field aborts this model with the read error.
    pub async fn verify_model(
        &self,
        contract: Address,
        params: &ParsedRateModelParams,
        blocks_per_year: u64,
        label: &str,
    ) -> Result<ModelCheck> {
        let expected = expected_fields(params, blocks_per_year)?;
        let mut discrepancies = Vec::new();

        let reported_blocks_per_year = match self
            .reader
            .read_field(contract, BLOCKS_PER_YEAR_GETTER)
            .await
        {
            Ok(reported) => {
                if reported != U256::from(blocks_per_year) {
                    discrepancies.push(Discrepancy {
                        model: label.to_string(),
                        field: BLOCKS_PER_YEAR_GETTER.to_string(),
                        expected: U256::from(blocks_per_year),
                        actual: reported,
                    });
                }
                Some(reported)
            }
            Err(err) => {
                tracing::warn!(
                    "[RATES] {} ({:#x}) has no readable {}(): {}; assuming {}",
                    label,
                    contract,
                    BLOCKS_PER_YEAR_GETTER,
                    err,
                    blocks_per_year
                );
                None
            }
        };

        for ExpectedField { name, value } in &expected {
            let actual = self.reader.read_field(contract, name).await?;
            if actual != *value {
                tracing::warn!(
                    "[RATES] {} {} mismatch: expected {} ({}), on-chain {}",
                    label,
                    name,
                    value,
                    format_mantissa(*value),
                    actual
                );
                discrepancies.push(Discrepancy {
                    model: label.to_string(),
                    field: (*name).to_string(),
                    expected: *value,
                    actual,
                });
            }
        }

        Ok(ModelCheck {
            label: label.to_string(),
            contract,
            kind: params.kind(),
            fields_checked: expected.len(),
            reported_blocks_per_year,
            discrepancies,
        })
    }

    /// Recompute the market's current borrow and supply rates from `params` and its
    /// cash, borrows, reserves and reserve factor, and compare them with what the market
    /// reports.
    ///
    /// Returns `None` when any market getter cannot be read; the parameter check has
    /// already covered the model itself.
    pub async fn check_observed_rates(
        &self,
        market: Address,
        params: &ParsedRateModelParams,
        blocks_per_year: u64,
        label: &str,
    ) -> Result<Option<ModelCheck>> {
        let per_block_params = to_per_block(params, blocks_per_year)?;
        let mut state = [U256::ZERO; MARKET_STATE_GETTERS.len()];
        for (slot, getter) in state.iter_mut().zip(MARKET_STATE_GETTERS) {
            match self.reader.read_field(market, getter).await {
                Ok(value) => *slot = value,
                Err(err) => {
                    tracing::debug!(
                        "[RATES] skipping observed rates for {} ({:#x}): {}(): {}",
                        label,
                        market,
                        getter,
                        err
                    );
                    return Ok(None);
                }
            }
        }
        let [cash, borrows, reserves, reserve_factor, observed_borrow, observed_supply] = state;

        let util = utilization_rate(cash, borrows, reserves)?;
        let expected_borrow = borrow_rate(&per_block_params, util)?;
        let expected_supply = supply_rate(util, expected_borrow, reserve_factor)?;

        let mut discrepancies = Vec::new();
        for (field, expected, actual) in [
            ("borrowRatePerBlock", expected_borrow, observed_borrow),
            ("supplyRatePerBlock", expected_supply, observed_supply),
        ] {
            if expected != actual {
                tracing::warn!(
                    "[RATES] {} {} at utilization {}: expected {}, on-chain {}",
                    label,
                    field,
                    format_mantissa(util),
                    expected,
                    actual
                );
                discrepancies.push(Discrepancy {
                    model: label.to_string(),
                    field: field.to_string(),
                    expected,
                    actual,
                });
            }
        }

        Ok(Some(ModelCheck {
            label: label.to_string(),
            contract: market,
            kind: params.kind(),
            fields_checked: 2,
            reported_blocks_per_year: None,
            discrepancies,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::params::RawRateModelParams;

    fn jump_params() -> ParsedRateModelParams {
        RawRateModelParams::Jump {
            base_rate_per_year: "0".to_string(),
            multiplier_per_year: "0.06875".to_string(),
            jump_multiplier_per_year: "2.5".to_string(),
            kink: "0.8".to_string(),
        }
        .parse()
        .unwrap()
    }

    #[test]
    fn test_per_block_is_floor_division() {
        let one = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(per_block(one, 10_512_000).unwrap(), U256::from(95_129_375_951u64));
        assert!(per_block(one, 0).is_err());
    }

    #[test]
    fn test_jump_expected_fields() {
        let fields = expected_fields(&jump_params(), 10_512_000).unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            ["baseRatePerBlock", "multiplierPerBlock", "jumpMultiplierPerBlock", "kink"]
        );
        assert_eq!(fields[0].value, U256::ZERO);
        assert_eq!(fields[1].value, U256::from(6_540_144_596u64));
        assert_eq!(fields[2].value, U256::from(237_823_439_878u64));
        assert_eq!(fields[3].value, U256::from(800_000_000_000_000_000u64));
    }

    #[test]
    fn test_two_kinks_field_order_and_kinks_untouched() {
        let params = RawRateModelParams::TwoKinks {
            base_rate_per_year: "0".to_string(),
            multiplier_per_year: "0.1".to_string(),
            kink1: "0.5".to_string(),
            base_rate_per_year2: "0.02".to_string(),
            multiplier_per_year2: "0.2".to_string(),
            kink2: "0.8".to_string(),
            jump_multiplier_per_year: "3".to_string(),
        }
        .parse()
        .unwrap();
        let fields = expected_fields(&params, 2_628_000).unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "baseRatePerBlock",
                "multiplierPerBlock",
                "kink1",
                "baseRate2PerBlock",
                "multiplier2PerBlock",
                "kink2",
                "jumpMultiplierPerBlock"
            ]
        );
        assert_eq!(fields[2].value, U256::from(500_000_000_000_000_000u64));
        assert_eq!(
            fields[3].value,
            U256::from(20_000_000_000_000_000u64 / 2_628_000)
        );
    }
}
