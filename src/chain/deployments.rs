use crate::error::ConfigError;
use alloy::primitives::Address;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Named deployment records, as exported by the deployment tooling.
///
/// Accepts both the nested export shape `{"contracts": {"Name": {"address": ..}}}` and a
/// flat `{"Name": {"address": ..}}` or `{"Name": "0x.."}` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentBook {
    records: BTreeMap<String, Address>,
}

impl DeploymentBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, address: Address) {
        self.records.insert(name.into(), address);
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.records.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let doc: Value = serde_json::from_str(raw)
            .map_err(|e| ConfigError::Invalid(format!("deployments export: {e}")))?;
        let contracts = doc.get("contracts").unwrap_or(&doc);
        let Some(entries) = contracts.as_object() else {
            return Err(ConfigError::Invalid(
                "deployments export must be a JSON object".to_string(),
            ));
        };

        let mut book = Self::new();
        for (name, entry) in entries {
            let raw_address = entry
                .get("address")
                .and_then(Value::as_str)
                .or_else(|| entry.as_str());
            let Some(raw_address) = raw_address else {
                tracing::debug!("[DEPLOY] skipping `{}`: no address field", name);
                continue;
            };
            let address = Address::from_str(raw_address.trim()).map_err(|e| {
                ConfigError::Invalid(format!(
                    "deployment `{name}` has invalid address `{raw_address}`: {e}"
                ))
            })?;
            book.insert(name.clone(), address);
        }
        Ok(book)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Invalid(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }
}
