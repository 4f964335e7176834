//! Per-chain verification of every configured market's rate model.
//!
//! Markets are processed one at a time in declaration order. A failure in one market is
//! recorded in its report entry and never stops the others.

use crate::chain::{ChainReader, RateModelNamer};
use crate::config::chains::BlocksPerYearRegistry;
use crate::config::markets::MarketDescriptor;
use crate::error::{ConfigError, Result};
use crate::rates::evaluator::{Discrepancy, ModelCheck, RateModelEvaluator};
use crate::rates::params::ParsedRateModelParams;
use alloy::primitives::Address;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketOutcome {
    Passed,
    Mismatched(Vec<Discrepancy>),
    /// A check could not complete; mismatches found by earlier checks are kept.
    Errored {
        reason: String,
        discrepancies: Vec<Discrepancy>,
    },
}

impl MarketOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketReport {
    pub market: String,
    pub symbol: String,
    pub address: Option<Address>,
    pub checks: Vec<ModelCheck>,
    pub outcome: MarketOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub network: String,
    pub blocks_per_year: u64,
    pub markets: Vec<MarketReport>,
}

impl VerificationReport {
    pub fn all_passed(&self) -> bool {
        self.markets.iter().all(|m| m.outcome.passed())
    }

    pub fn failed_count(&self) -> usize {
        self.markets.iter().filter(|m| !m.outcome.passed()).count()
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Rate models on {} (blocksPerYear={}): {} market(s), {} failed",
            self.network,
            self.blocks_per_year,
            self.markets.len(),
            self.failed_count()
        )?;
        for market in &self.markets {
            let address = market
                .address
                .map(|a| format!("{a:#x}"))
                .unwrap_or_else(|| "unresolved".to_string());
            match &market.outcome {
                MarketOutcome::Passed => {
                    let fields: usize = market.checks.iter().map(|c| c.fields_checked).sum();
                    writeln!(f, "  PASS  {} ({address}) {fields} field(s)", market.symbol)?;
                }
                MarketOutcome::Mismatched(discrepancies) => {
                    writeln!(
                        f,
                        "  FAIL  {} ({address}) {} mismatch(es)",
                        market.symbol,
                        discrepancies.len()
                    )?;
                    for d in discrepancies {
                        writeln!(f, "        {d}")?;
                    }
                }
                MarketOutcome::Errored {
                    reason,
                    discrepancies,
                } => {
                    writeln!(f, "  ERROR {} ({address}) {reason}", market.symbol)?;
                    for d in discrepancies {
                        writeln!(f, "        {d}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

pub struct RateModelVerifier<'a> {
    reader: &'a dyn ChainReader,
    namer: &'a dyn RateModelNamer,
    network: String,
    blocks_per_year: u64,
}

impl<'a> RateModelVerifier<'a> {
    pub fn new(
        reader: &'a dyn ChainReader,
        namer: &'a dyn RateModelNamer,
        network: &str,
        registry: &BlocksPerYearRegistry,
    ) -> Result<Self> {
        Ok(Self {
            reader,
            namer,
            network: network.to_string(),
            blocks_per_year: registry.get(network)?,
        })
    }

    pub fn blocks_per_year(&self) -> u64 {
        self.blocks_per_year
    }

    pub async fn verify_markets(&self, markets: &[MarketDescriptor]) -> VerificationReport {
        tracing::info!(
            "[VERIFY] {} market(s) on {} (blocksPerYear={})",
            markets.len(),
            self.network,
            self.blocks_per_year
        );
        let mut reports = Vec::with_capacity(markets.len());
        for market in markets {
            let mut address = market.address;
            let mut checks = Vec::new();
            let result = self.verify_market(market, &mut address, &mut checks).await;
            let discrepancies: Vec<Discrepancy> = checks
                .iter()
                .flat_map(|c| c.discrepancies.iter().cloned())
                .collect();
            let outcome = match result {
                Ok(()) => {
                    if discrepancies.is_empty() {
                        tracing::info!("[VERIFY] {} ok", market.symbol);
                        MarketOutcome::Passed
                    } else {
                        tracing::warn!(
                            "[VERIFY] {} has {} mismatch(es)",
                            market.symbol,
                            discrepancies.len()
                        );
                        MarketOutcome::Mismatched(discrepancies)
                    }
                }
                Err(err) => {
                    tracing::error!(
                        "[VERIFY] {} failed after {} mismatch(es): {}",
                        market.symbol,
                        discrepancies.len(),
                        err
                    );
                    MarketOutcome::Errored {
                        reason: err.to_string(),
                        discrepancies,
                    }
                }
            };
            reports.push(MarketReport {
                market: market.name.clone(),
                symbol: market.symbol.clone(),
                address,
                checks,
                outcome,
            });
        }
        VerificationReport {
            network: self.network.clone(),
            blocks_per_year: self.blocks_per_year,
            markets: reports,
        }
    }

    async fn verify_market(
        &self,
        market: &MarketDescriptor,
        address: &mut Option<Address>,
        checks: &mut Vec<ModelCheck>,
    ) -> Result<()> {
        let params = market.rate_model.parse()?;
        let market_address = self.market_address(market).await?;
        *address = Some(market_address);

        let live = self.reader.resolve_market_rate_model(market_address).await?;
        let evaluator = RateModelEvaluator::new(self.reader);
        let label = format!("{} {}", market.symbol, params.kind().contract_name());
        let live_check = evaluator
            .verify_model(live, &params, self.blocks_per_year, &label)
            .await?;
        let live_passed = live_check.passed();
        checks.push(live_check);

        if live_passed {
            let label = format!("{} observed rates", market.symbol);
            if let Some(check) = evaluator
                .check_observed_rates(market_address, &params, self.blocks_per_year, &label)
                .await?
            {
                checks.push(check);
            }
        }

        if let Some(deployment) = self.named_deployment(&params).await? {
            let (name, deployed) = deployment;
            if deployed != live {
                tracing::warn!(
                    "[VERIFY] {} uses {:#x} but deployment {} is {:#x}",
                    market.symbol,
                    live,
                    name,
                    deployed
                );
                let label = format!("{name} (deployment)");
                checks.push(
                    evaluator
                        .verify_model(deployed, &params, self.blocks_per_year, &label)
                        .await?,
                );
            }
        }
        Ok(())
    }

    async fn market_address(&self, market: &MarketDescriptor) -> Result<Address> {
        if let Some(address) = market.address {
            return Ok(address);
        }
        self.reader
            .resolve_deployment(&market.symbol)
            .await?
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "market {} has no address and no deployment record",
                    market.symbol
                ))
                .into()
            })
    }

    async fn named_deployment(
        &self,
        params: &ParsedRateModelParams,
    ) -> Result<Option<(String, Address)>> {
        let Some(name) = self.namer.compute_name(params, self.blocks_per_year) else {
            return Ok(None);
        };
        match self.reader.resolve_deployment(&name).await? {
            Some(address) => Ok(Some((name, address))),
            None => {
                tracing::debug!("[VERIFY] no deployment record named {}", name);
                Ok(None)
            }
        }
    }
}
