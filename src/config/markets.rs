use crate::error::{ConfigError, Result};
use crate::math::{mantissa_one, parse_mantissa};
use crate::rates::params::{ParsedRateModelParams, RawRateModelParams};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const UNCAPPED: &str = "uncapped";

/// Supply or borrow cap: a decimal token amount, or no cap at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cap {
    Limit(String),
    Uncapped,
}

impl From<String> for Cap {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case(UNCAPPED) {
            Self::Uncapped
        } else {
            Self::Limit(raw)
        }
    }
}

impl From<Cap> for String {
    fn from(cap: Cap) -> Self {
        match cap {
            Cap::Limit(raw) => raw,
            Cap::Uncapped => UNCAPPED.to_string(),
        }
    }
}

impl Cap {
    /// `Uncapped` maps to the largest representable value.
    pub fn mantissa(&self) -> Result<U256> {
        match self {
            Self::Limit(raw) => Ok(parse_mantissa(raw)?),
            Self::Uncapped => Ok(U256::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskParameters {
    pub collateral_factor: String,
    pub reserve_factor: String,
    pub supply_cap: Cap,
    pub borrow_cap: Cap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRiskParameters {
    pub collateral_factor: U256,
    pub reserve_factor: U256,
    pub supply_cap: U256,
    pub borrow_cap: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSupply {
    pub amount: String,
    #[serde(default)]
    pub vtokens_to_burn: Option<String>,
    pub receiver: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDescriptor {
    pub name: String,
    pub symbol: String,
    /// Underlying asset: a deployment name or a token symbol.
    pub asset: String,
    /// Market contract; when absent it is looked up by `symbol` in the deployments book.
    #[serde(default)]
    pub address: Option<Address>,
    pub rate_model: RawRateModelParams,
    pub risk: RiskParameters,
    #[serde(default)]
    pub initial_supply: Option<InitialSupply>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMarket {
    pub rate_model: ParsedRateModelParams,
    pub risk: ParsedRiskParameters,
}

impl MarketDescriptor {
    pub fn validate(&self) -> Result<ValidatedMarket> {
        let rate_model = self.rate_model.parse()?;
        let risk = ParsedRiskParameters {
            collateral_factor: parse_mantissa(&self.risk.collateral_factor)?,
            reserve_factor: parse_mantissa(&self.risk.reserve_factor)?,
            supply_cap: self.risk.supply_cap.mantissa()?,
            borrow_cap: self.risk.borrow_cap.mantissa()?,
        };
        for (field, value) in [
            ("collateralFactor", risk.collateral_factor),
            ("reserveFactor", risk.reserve_factor),
        ] {
            if value > mantissa_one() {
                return Err(ConfigError::Invalid(format!(
                    "{} {field} {} exceeds 1.0",
                    self.symbol,
                    crate::math::format_mantissa(value)
                ))
                .into());
            }
        }
        Ok(ValidatedMarket { rate_model, risk })
    }
}

/// Market descriptors per chain identifier, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MarketTable {
    chains: BTreeMap<String, Vec<MarketDescriptor>>,
}

impl MarketTable {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| ConfigError::Invalid(format!("market table: {e}")).into())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Invalid(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn markets(&self, network: &str) -> &[MarketDescriptor] {
        self.chains
            .get(network)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }
}
