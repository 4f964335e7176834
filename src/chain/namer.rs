use crate::error::ConfigError;
use crate::rates::params::{ParsedRateModelParams, RawRateModelParams};
use serde::Deserialize;
use std::path::Path;

/// Deterministic name of the deployment record expected for a rate model.
///
/// The naming scheme belongs to the deployment tooling; `None` means no record is
/// expected and the deployment cross-check is skipped.
pub trait RateModelNamer: Send + Sync {
    fn compute_name(&self, params: &ParsedRateModelParams, blocks_per_year: u64)
        -> Option<String>;
}

impl<F> RateModelNamer for F
where
    F: Fn(&ParsedRateModelParams, u64) -> Option<String> + Send + Sync,
{
    fn compute_name(
        &self,
        params: &ParsedRateModelParams,
        blocks_per_year: u64,
    ) -> Option<String> {
        self(params, blocks_per_year)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameEntry {
    name: String,
    blocks_per_year: u64,
    params: RawRateModelParams,
}

/// Names exported by the deployment tooling, matched on parsed parameters.
#[derive(Debug, Clone, Default)]
pub struct TableNamer {
    entries: Vec<(ParsedRateModelParams, u64, String)>,
}

impl TableNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        params: ParsedRateModelParams,
        blocks_per_year: u64,
        name: impl Into<String>,
    ) {
        self.entries.push((params, blocks_per_year, name.into()));
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let entries: Vec<NameEntry> = serde_json::from_str(raw)
            .map_err(|e| ConfigError::Invalid(format!("rate model name table: {e}")))?;
        let mut table = Self::new();
        for entry in entries {
            let params = entry.params.parse().map_err(|e| {
                ConfigError::Invalid(format!("rate model name `{}`: {e}", entry.name))
            })?;
            table.insert(params, entry.blocks_per_year, entry.name);
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Invalid(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RateModelNamer for TableNamer {
    fn compute_name(
        &self,
        params: &ParsedRateModelParams,
        blocks_per_year: u64,
    ) -> Option<String> {
        self.entries
            .iter()
            .find(|(p, bpy, _)| *bpy == blocks_per_year && p == params)
            .map(|(_, _, name)| name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"[
        {"name": "JumpRateModel_base0bps_slope688bps_jump25000bps_kink8000bps",
         "blocksPerYear": 10512000,
         "params": {"model": "jump", "baseRatePerYear": "0", "multiplierPerYear": "0.06875",
                    "jumpMultiplierPerYear": "2.5", "kink": "0.8"}}
    ]"#;

    #[test]
    fn test_table_namer_matches_on_params_and_blocks_per_year() {
        let namer = TableNamer::from_json(TABLE).unwrap();
        assert_eq!(namer.len(), 1);
        let params: RawRateModelParams = serde_json::from_str(
            r#"{"model": "jump", "baseRatePerYear": "0.0", "multiplierPerYear": "0.068750",
                "jumpMultiplierPerYear": "2.50", "kink": "0.80"}"#,
        )
        .unwrap();
        let parsed = params.parse().unwrap();
        assert_eq!(
            namer.compute_name(&parsed, 10_512_000).as_deref(),
            Some("JumpRateModel_base0bps_slope688bps_jump25000bps_kink8000bps")
        );
        assert_eq!(namer.compute_name(&parsed, 2_628_000), None);
    }

    #[test]
    fn test_closure_namer() {
        let namer = |params: &ParsedRateModelParams, bpy: u64| {
            Some(format!("{}_{bpy}", params.kind().contract_name()))
        };
        let parsed = RawRateModelParams::Whitepaper {
            base_rate_per_year: "0.02".to_string(),
            multiplier_per_year: "0.1".to_string(),
        }
        .parse()
        .unwrap();
        assert_eq!(
            namer.compute_name(&parsed, 42).as_deref(),
            Some("WhitePaperInterestRateModel_42")
        );
    }
}
