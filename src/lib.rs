//! Lending Harness library surface.
//!
//! Two pieces share the chain-access seam in [`chain`]:
//! - rate-model verification (`rates`): configured yearly parameters are converted to
//!   per-block values and compared, field by field, against deployed contracts;
//! - the scenario engine (`scenario`): declarative expectations and invariants checked
//!   against live state after every step.
//!
//! The operator entry point is `src/bin/verify_rate_models.rs`.

pub mod chain;
pub mod error;
pub mod math;
pub mod rates;
pub mod scenario;

pub mod config {
    pub mod chains;
    pub mod markets;
}

pub mod utils {
    pub mod config;
    pub mod env_guard;
    pub mod error;
    pub mod rpc;
}
