#![allow(dead_code)]

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use lending_harness::chain::ChainReader;
use lending_harness::error::ChainReadError;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory chain: one word per (contract, getter), plus deployment and market wiring.
#[derive(Default)]
pub struct MockChain {
    words: Mutex<HashMap<(Address, String), U256>>,
    broken: HashSet<Address>,
    deployments: HashMap<String, Address>,
    rate_models: HashMap<Address, Address>,
    reads: Mutex<Vec<(Address, String)>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word(self, contract: Address, field: &str, value: U256) -> Self {
        self.set_word(contract, field, value);
        self
    }

    pub fn with_words(self, contract: Address, fields: &[(&str, u128)]) -> Self {
        for (field, value) in fields {
            self.set_word(contract, field, U256::from(*value));
        }
        self
    }

    /// Every read against `contract` fails with a transport error.
    pub fn with_broken(mut self, contract: Address) -> Self {
        self.broken.insert(contract);
        self
    }

    pub fn with_deployment(mut self, name: &str, address: Address) -> Self {
        self.deployments.insert(name.to_string(), address);
        self
    }

    pub fn with_market(mut self, market: Address, rate_model: Address) -> Self {
        self.rate_models.insert(market, rate_model);
        self
    }

    pub fn set_word(&self, contract: Address, field: &str, value: U256) {
        self.words
            .lock()
            .unwrap()
            .insert((contract, field.to_string()), value);
    }

    pub fn reads_of(&self, contract: Address) -> Vec<String> {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == contract)
            .map(|(_, f)| f.clone())
            .collect()
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn read_field(&self, contract: Address, field: &str) -> Result<U256, ChainReadError> {
        self.reads
            .lock()
            .unwrap()
            .push((contract, field.to_string()));
        if self.broken.contains(&contract) {
            return Err(ChainReadError::Transport(format!(
                "connection reset reading {field}"
            )));
        }
        self.words
            .lock()
            .unwrap()
            .get(&(contract, field.to_string()))
            .copied()
            .ok_or_else(|| ChainReadError::MissingField {
                contract,
                field: field.to_string(),
            })
    }

    async fn resolve_deployment(&self, name: &str) -> Result<Option<Address>, ChainReadError> {
        Ok(self.deployments.get(name).copied())
    }

    async fn resolve_market_rate_model(&self, market: Address) -> Result<Address, ChainReadError> {
        if self.broken.contains(&market) {
            return Err(ChainReadError::Transport(
                "connection reset reading interestRateModel".to_string(),
            ));
        }
        self.rate_models
            .get(&market)
            .copied()
            .ok_or_else(|| ChainReadError::MissingField {
                contract: market,
                field: "interestRateModel".to_string(),
            })
    }
}
