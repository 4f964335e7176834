use crate::error::ConfigError;
use std::collections::BTreeMap;

pub const SECONDS_PER_YEAR: u64 = 31_536_000;

const KNOWN_NETWORKS: &[&str] = &[
    "hardhat",
    "bscmainnet",
    "bsctestnet",
    "ethereum",
    "sepolia",
    "opbnbmainnet",
    "opbnbtestnet",
    "arbitrumone",
    "arbitrumsepolia",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub network: String,
    pub chain_id: u64,
    pub name: String,
    pub block_time_ms: u64,
    /// Rate models on time-based chains accrue per second, not per block.
    pub time_based: bool,
}

impl ChainConfig {
    pub fn get(network: &str) -> Result<Self, ConfigError> {
        match network.trim().to_ascii_lowercase().as_str() {
            "hardhat" => Ok(Self::hardhat()),
            "bscmainnet" => Ok(Self::bsc_mainnet()),
            "bsctestnet" => Ok(Self::bsc_testnet()),
            "ethereum" => Ok(Self::ethereum()),
            "sepolia" => Ok(Self::sepolia()),
            "opbnbmainnet" => Ok(Self::opbnb_mainnet()),
            "opbnbtestnet" => Ok(Self::opbnb_testnet()),
            "arbitrumone" => Ok(Self::arbitrum_one()),
            "arbitrumsepolia" => Ok(Self::arbitrum_sepolia()),
            other => Err(ConfigError::UnknownChain(other.to_string())),
        }
    }

    pub fn known_networks() -> &'static [&'static str] {
        KNOWN_NETWORKS
    }

    /// Blocks (or seconds, on time-based chains) per 365-day year.
    pub fn blocks_per_year(&self) -> u64 {
        if self.time_based || self.block_time_ms == 0 {
            return SECONDS_PER_YEAR;
        }
        SECONDS_PER_YEAR.saturating_mul(1_000) / self.block_time_ms
    }

    fn block_based(network: &str, chain_id: u64, name: &str, block_time_ms: u64) -> Self {
        Self {
            network: network.to_string(),
            chain_id,
            name: name.to_string(),
            block_time_ms,
            time_based: false,
        }
    }

    pub fn hardhat() -> Self {
        Self::block_based("hardhat", 31_337, "Hardhat", 3_000)
    }

    pub fn bsc_mainnet() -> Self {
        Self::block_based("bscmainnet", 56, "BNB Smart Chain", 3_000)
    }

    pub fn bsc_testnet() -> Self {
        Self::block_based("bsctestnet", 97, "BNB Smart Chain Testnet", 3_000)
    }

    pub fn ethereum() -> Self {
        Self::block_based("ethereum", 1, "Ethereum Mainnet", 12_000)
    }

    pub fn sepolia() -> Self {
        Self::block_based("sepolia", 11_155_111, "Sepolia", 12_000)
    }

    pub fn opbnb_mainnet() -> Self {
        Self::block_based("opbnbmainnet", 204, "opBNB", 1_000)
    }

    pub fn opbnb_testnet() -> Self {
        Self::block_based("opbnbtestnet", 5_611, "opBNB Testnet", 1_000)
    }

    pub fn arbitrum_one() -> Self {
        Self {
            network: "arbitrumone".to_string(),
            chain_id: 42_161,
            name: "Arbitrum One".to_string(),
            block_time_ms: 250,
            time_based: true,
        }
    }

    pub fn arbitrum_sepolia() -> Self {
        Self {
            network: "arbitrumsepolia".to_string(),
            chain_id: 421_614,
            name: "Arbitrum Sepolia".to_string(),
            block_time_ms: 250,
            time_based: true,
        }
    }
}

/// Chain identifier -> assumed blocks-per-year constant.
#[derive(Debug, Clone)]
pub struct BlocksPerYearRegistry {
    entries: BTreeMap<String, u64>,
}

impl Default for BlocksPerYearRegistry {
    fn default() -> Self {
        let entries = KNOWN_NETWORKS
            .iter()
            .filter_map(|network| ChainConfig::get(network).ok())
            .map(|chain| (chain.network.clone(), chain.blocks_per_year()))
            .collect();
        Self { entries }
    }
}

impl BlocksPerYearRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overrides an entry, e.g. for a local fork with a custom block time.
    pub fn register(&mut self, network: &str, blocks_per_year: u64) -> Result<(), ConfigError> {
        if blocks_per_year == 0 {
            return Err(ConfigError::Invalid(format!(
                "blocks per year for `{network}` must be non-zero"
            )));
        }
        self.entries
            .insert(network.trim().to_ascii_lowercase(), blocks_per_year);
        Ok(())
    }

    pub fn get(&self, network: &str) -> Result<u64, ConfigError> {
        self.entries
            .get(&network.trim().to_ascii_lowercase())
            .copied()
            .ok_or_else(|| ConfigError::UnknownChain(network.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_per_year_by_chain() {
        let registry = BlocksPerYearRegistry::new();
        assert_eq!(registry.get("bscmainnet").unwrap(), 10_512_000);
        assert_eq!(registry.get("bsctestnet").unwrap(), 10_512_000);
        assert_eq!(registry.get("hardhat").unwrap(), 10_512_000);
        assert_eq!(registry.get("ethereum").unwrap(), 2_628_000);
        assert_eq!(registry.get("opbnbmainnet").unwrap(), 31_536_000);
        assert_eq!(registry.get("arbitrumone").unwrap(), SECONDS_PER_YEAR);
    }

    #[test]
    fn test_unknown_chain_is_rejected() {
        let registry = BlocksPerYearRegistry::new();
        assert_eq!(
            registry.get("moonbase"),
            Err(ConfigError::UnknownChain("moonbase".to_string()))
        );
        assert!(ChainConfig::get("moonbase").is_err());
    }

    #[test]
    fn test_register_overrides_and_rejects_zero() {
        let mut registry = BlocksPerYearRegistry::new();
        registry.register("Hardhat", 42).unwrap();
        assert_eq!(registry.get("hardhat").unwrap(), 42);
        assert!(registry.register("local", 0).is_err());
    }
}
