//! Chain access seam.
//!
//! Everything that touches live chain state goes through `ChainReader`, so rate-model
//! verification and scenario resolution can run against an RPC node or an in-memory
//! double in tests.

pub mod deployments;
pub mod namer;
pub mod rpc;

use crate::error::ChainReadError;
use alloy::primitives::{Address, U256};
use async_trait::async_trait;

pub use deployments::DeploymentBook;
pub use namer::{RateModelNamer, TableNamer};
pub use rpc::RpcChainReader;

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Read a zero-argument view returning one 32-byte word.
    async fn read_field(&self, contract: Address, field: &str) -> Result<U256, ChainReadError>;

    /// Address of a named deployment record, if one exists.
    async fn resolve_deployment(&self, name: &str) -> Result<Option<Address>, ChainReadError>;

    /// Rate model currently wired into `market`.
    async fn resolve_market_rate_model(&self, market: Address) -> Result<Address, ChainReadError>;
}
