pub mod curve;
pub mod evaluator;
pub mod params;
pub mod verifier;

pub use evaluator::{Discrepancy, ModelCheck, RateModelEvaluator};
pub use params::{ParsedRateModelParams, RateModelKind, RateModelParams, RawRateModelParams};
pub use verifier::{MarketOutcome, MarketReport, RateModelVerifier, VerificationReport};
