use alloy::primitives::Address;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("chain read error: {0}")]
    ChainRead(#[from] ChainReadError),
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("scenario failed with {} failure(s):\n{}", .0.len(), .0.join("\n"))]
    ScenarioFailed(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid decimal literal `{0}`")]
    InvalidLiteral(String),
    #[error("negative value `{0}` cannot be represented as an unsigned mantissa")]
    Negative(String),
    #[error("value `{0}` overflows 256 bits at the requested scale")]
    Overflow(String),
    #[error("{field} must be within [0, 1], got `{raw}`")]
    KinkOutOfRange { field: &'static str, raw: String },
    #[error("kink1 ({kink1}) must not exceed kink2 ({kink2})")]
    KinkOrder { kink1: String, kink2: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainReadError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("field `{field}` not readable on {contract:#x}")]
    MissingField { contract: Address, field: String },
    #[error("could not decode `{field}` returned by {contract:#x}: {reason}")]
    Decode {
        contract: Address,
        field: String,
        reason: String,
    },
    #[error("call timed out after {waited_ms}ms: {context}")]
    Timeout { waited_ms: u64, context: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("unknown value path `{0}`")]
    UnknownPath(String),
    #[error("malformed expression `{expr}`: {reason}")]
    Malformed { expr: String, reason: String },
    #[error("read failed while resolving `{expr}`: {source}")]
    Read {
        expr: String,
        #[source]
        source: ChainReadError,
    },
    #[error("could not parse literal in `{expr}`: {source}")]
    Literal {
        expr: String,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("unknown chain `{0}`")]
    UnknownChain(String),
    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}
