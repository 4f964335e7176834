use crate::error::ParseError;
use crate::math::{format_mantissa, mantissa_one, parse_mantissa};
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateModelKind {
    Whitepaper,
    Jump,
    TwoKinks,
}

impl RateModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Whitepaper => "whitepaper",
            Self::Jump => "jump",
            Self::TwoKinks => "two-kinks",
        }
    }

    /// Name of the contract family deployed for this kind.
    pub fn contract_name(self) -> &'static str {
        match self {
            Self::Whitepaper => "WhitePaperInterestRateModel",
            Self::Jump => "JumpRateModel",
            Self::TwoKinks => "TwoKinksInterestRateModel",
        }
    }
}

impl fmt::Display for RateModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yearly interest-rate model parameters.
///
/// `V` is `String` for the raw config form and `U256` (18-decimal mantissas) once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "kebab-case")]
pub enum RateModelParams<V> {
    #[serde(rename_all = "camelCase")]
    Whitepaper {
        base_rate_per_year: V,
        multiplier_per_year: V,
    },
    #[serde(rename_all = "camelCase")]
    Jump {
        base_rate_per_year: V,
        multiplier_per_year: V,
        jump_multiplier_per_year: V,
        kink: V,
    },
    #[serde(rename_all = "camelCase")]
    TwoKinks {
        base_rate_per_year: V,
        multiplier_per_year: V,
        kink1: V,
        base_rate_per_year2: V,
        multiplier_per_year2: V,
        kink2: V,
        jump_multiplier_per_year: V,
    },
}

pub type RawRateModelParams = RateModelParams<String>;
pub type ParsedRateModelParams = RateModelParams<U256>;

impl<V> RateModelParams<V> {
    pub fn kind(&self) -> RateModelKind {
        match self {
            Self::Whitepaper { .. } => RateModelKind::Whitepaper,
            Self::Jump { .. } => RateModelKind::Jump,
            Self::TwoKinks { .. } => RateModelKind::TwoKinks,
        }
    }

    pub fn try_map<W, E>(
        &self,
        mut f: impl FnMut(&V) -> Result<W, E>,
    ) -> Result<RateModelParams<W>, E> {
        Ok(match self {
            Self::Whitepaper {
                base_rate_per_year,
                multiplier_per_year,
            } => RateModelParams::Whitepaper {
                base_rate_per_year: f(base_rate_per_year)?,
                multiplier_per_year: f(multiplier_per_year)?,
            },
            Self::Jump {
                base_rate_per_year,
                multiplier_per_year,
                jump_multiplier_per_year,
                kink,
            } => RateModelParams::Jump {
                base_rate_per_year: f(base_rate_per_year)?,
                multiplier_per_year: f(multiplier_per_year)?,
                jump_multiplier_per_year: f(jump_multiplier_per_year)?,
                kink: f(kink)?,
            },
            Self::TwoKinks {
                base_rate_per_year,
                multiplier_per_year,
                kink1,
                base_rate_per_year2,
                multiplier_per_year2,
                kink2,
                jump_multiplier_per_year,
            } => RateModelParams::TwoKinks {
                base_rate_per_year: f(base_rate_per_year)?,
                multiplier_per_year: f(multiplier_per_year)?,
                kink1: f(kink1)?,
                base_rate_per_year2: f(base_rate_per_year2)?,
                multiplier_per_year2: f(multiplier_per_year2)?,
                kink2: f(kink2)?,
                jump_multiplier_per_year: f(jump_multiplier_per_year)?,
            },
        })
    }
}

impl RateModelParams<String> {
    /// Parse every decimal field into a mantissa and check the kink bounds.
    pub fn parse(&self) -> Result<RateModelParams<U256>, ParseError> {
        let parsed = self.try_map(|raw| parse_mantissa(raw))?;
        match &parsed {
            RateModelParams::Whitepaper { .. } => {}
            RateModelParams::Jump { kink, .. } => check_kink("kink", *kink)?,
            RateModelParams::TwoKinks { kink1, kink2, .. } => {
                check_kink("kink1", *kink1)?;
                check_kink("kink2", *kink2)?;
                if kink1 > kink2 {
                    return Err(ParseError::KinkOrder {
                        kink1: format_mantissa(*kink1),
                        kink2: format_mantissa(*kink2),
                    });
                }
            }
        }
        Ok(parsed)
    }
}

fn check_kink(field: &'static str, kink: U256) -> Result<(), ParseError> {
    if kink > mantissa_one() {
        return Err(ParseError::KinkOutOfRange {
            field,
            raw: format_mantissa(kink),
        });
    }
    Ok(())
}

impl fmt::Display for RateModelParams<U256> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = |v: &U256| format_mantissa(*v);
        match self {
            Self::Whitepaper {
                base_rate_per_year,
                multiplier_per_year,
            } => write!(
                f,
                "whitepaper(base={}, multiplier={})",
                m(base_rate_per_year),
                m(multiplier_per_year)
            ),
            Self::Jump {
                base_rate_per_year,
                multiplier_per_year,
                jump_multiplier_per_year,
                kink,
            } => write!(
                f,
                "jump(base={}, multiplier={}, jump={}, kink={})",
                m(base_rate_per_year),
                m(multiplier_per_year),
                m(jump_multiplier_per_year),
                m(kink)
            ),
            Self::TwoKinks {
                base_rate_per_year,
                multiplier_per_year,
                kink1,
                base_rate_per_year2,
                multiplier_per_year2,
                kink2,
                jump_multiplier_per_year,
            } => write!(
                f,
                "two-kinks(base={}, multiplier={}, kink1={}, base2={}, multiplier2={}, kink2={}, jump={})",
                m(base_rate_per_year),
                m(multiplier_per_year),
                m(kink1),
                m(base_rate_per_year2),
                m(multiplier_per_year2),
                m(kink2),
                m(jump_multiplier_per_year)
            ),
        }
    }
}
