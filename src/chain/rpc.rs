use crate::chain::{ChainReader, DeploymentBook};
use crate::error::{ChainReadError, ConfigError};
use crate::utils::error::classify_call_failure;
use crate::utils::rpc::{run_with_retry, RetryPolicy};
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::transports::http::Http;
use async_trait::async_trait;
use reqwest::Client;

pub type HttpProvider = RootProvider<Http<Client>>;

const RATE_MODEL_GETTER: &str = "interestRateModel";

/// First four bytes of `keccak256("<field>()")`.
pub fn field_selector(field: &str) -> [u8; 4] {
    let hash = keccak256(format!("{field}()").as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Decode the leading 32-byte word of an `eth_call` return.
pub fn decode_word(contract: Address, field: &str, raw: &[u8]) -> Result<U256, ChainReadError> {
    if raw.is_empty() {
        // Calls to absent selectors on contracts without a fallback come back empty.
        return Err(ChainReadError::MissingField {
            contract,
            field: field.to_string(),
        });
    }
    if raw.len() < 32 {
        return Err(ChainReadError::Decode {
            contract,
            field: field.to_string(),
            reason: format!("expected a 32-byte word, got {} byte(s)", raw.len()),
        });
    }
    Ok(U256::from_be_slice(&raw[..32]))
}

pub fn word_to_address(contract: Address, field: &str, word: U256) -> Result<Address, ChainReadError> {
    let bytes = B256::from(word.to_be_bytes::<32>());
    if bytes[..12].iter().any(|b| *b != 0) {
        return Err(ChainReadError::Decode {
            contract,
            field: field.to_string(),
            reason: format!("word {word:#x} is not an address"),
        });
    }
    Ok(Address::from_word(bytes))
}

/// `ChainReader` over a JSON-RPC HTTP endpoint plus an exported deployments book.
pub struct RpcChainReader {
    provider: HttpProvider,
    deployments: DeploymentBook,
    policy: RetryPolicy,
}

impl RpcChainReader {
    pub fn connect(
        rpc_url: &str,
        deployments: DeploymentBook,
        policy: RetryPolicy,
    ) -> Result<Self, ConfigError> {
        let url = rpc_url.parse::<reqwest::Url>().map_err(|e| {
            ConfigError::Invalid(format!("RPC_URL must be a valid URL, got `{rpc_url}`: {e}"))
        })?;
        let provider = ProviderBuilder::new().on_http(url);
        Ok(Self {
            provider,
            deployments,
            policy,
        })
    }

    async fn eth_call(&self, contract: Address, field: &str) -> Result<Bytes, ChainReadError> {
        let request = TransactionRequest::default()
            .to(contract)
            .input(TransactionInput::new(Bytes::from(field_selector(field).to_vec())));
        let context = format!("eth_call {field}() on {contract:#x}");
        run_with_retry(&self.policy, &context, || async {
            self.provider
                .call(&request)
                .await
                .map_err(|err| anyhow::anyhow!("{err}"))
        })
        .await
        .map_err(|err| classify_call_failure(contract, field, &err.to_string()))
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn read_field(&self, contract: Address, field: &str) -> Result<U256, ChainReadError> {
        let raw = self.eth_call(contract, field).await?;
        let word = decode_word(contract, field, raw.as_ref())?;
        tracing::trace!("[RPC] {:#x}.{}() = {}", contract, field, word);
        Ok(word)
    }

    async fn resolve_deployment(&self, name: &str) -> Result<Option<Address>, ChainReadError> {
        Ok(self.deployments.get(name))
    }

    async fn resolve_market_rate_model(&self, market: Address) -> Result<Address, ChainReadError> {
        let word = self.read_field(market, RATE_MODEL_GETTER).await?;
        word_to_address(market, RATE_MODEL_GETTER, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_field_selectors() {
        // interestRateModel() / totalSupply()
        assert_eq!(field_selector("interestRateModel"), [0xf3, 0xfd, 0xb1, 0x5a]);
        assert_eq!(field_selector("totalSupply"), [0x18, 0x16, 0x0d, 0xdd]);
    }

    #[test]
    fn test_decode_word() {
        let contract = Address::repeat_byte(0x22);
        let mut raw = vec![0u8; 32];
        raw[31] = 7;
        assert_eq!(decode_word(contract, "kink", &raw).unwrap(), U256::from(7u64));
        assert!(matches!(
            decode_word(contract, "kink", &[]),
            Err(ChainReadError::MissingField { .. })
        ));
        assert!(matches!(
            decode_word(contract, "kink", &[1, 2, 3]),
            Err(ChainReadError::Decode { .. })
        ));
    }

    #[test]
    fn test_word_to_address() {
        let market = Address::repeat_byte(0x33);
        let model = address!("9a1f6e1bd1b7d1ac8bc8de6ef3e0ad4f4a1e6b12");
        let word = U256::from_be_slice(model.into_word().as_slice());
        assert_eq!(word_to_address(market, "interestRateModel", word).unwrap(), model);
        assert!(word_to_address(market, "interestRateModel", U256::MAX).is_err());
    }
}
