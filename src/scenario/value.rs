use crate::math::{format_mantissa, mantissa_one};
use alloy::primitives::{Address, U256};
use std::fmt;

/// Typed result of resolving a scenario expression.
#[derive(Debug, Clone)]
pub enum Value {
    Nothing,
    Number(U256),
    /// 18-decimal fixed-point mantissa.
    Exp(U256),
    Bool(bool),
    Address(Address),
    String(String),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::Number(_) => "number",
            Self::Exp(_) => "exp",
            Self::Bool(_) => "bool",
            Self::Address(_) => "address",
            Self::String(_) => "string",
        }
    }

    /// Numeric value scaled to 18 decimals, for cross-representation comparison.
    fn as_mantissa(&self) -> Option<U256> {
        match self {
            Self::Number(n) => n.checked_mul(mantissa_one()),
            Self::Exp(m) => Some(*m),
            _ => None,
        }
    }

    pub fn checked_add(&self, delta: &Value) -> Option<Value> {
        match (self, delta) {
            (Self::Number(a), Self::Number(b)) => a.checked_add(*b).map(Self::Number),
            _ => self
                .as_mantissa()?
                .checked_add(delta.as_mantissa()?)
                .map(Self::Exp),
        }
    }

    pub fn checked_sub(&self, delta: &Value) -> Option<Value> {
        match (self, delta) {
            (Self::Number(a), Self::Number(b)) => a.checked_sub(*b).map(Self::Number),
            _ => self
                .as_mantissa()?
                .checked_sub(delta.as_mantissa()?)
                .map(Self::Exp),
        }
    }
}

/// Numbers compare by value across representations: `Number(1) == Exp(1e18)`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nothing, Self::Nothing) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Address(a), Self::Address(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Exp(a), Self::Exp(b)) => a == b,
            (Self::Number(_), Self::Exp(_)) | (Self::Exp(_), Self::Number(_)) => {
                match (self.as_mantissa(), other.as_mantissa()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nothing => f.write_str("Nothing"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Exp(m) => f.write_str(&format_mantissa(*m)),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Address(a) => write!(f, "{a}"),
            Self::String(s) => write!(f, "\"{s}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_ignores_representation() {
        assert_eq!(Value::Number(U256::from(2u64)), Value::Exp(mantissa_one() * U256::from(2u64)));
        assert_ne!(Value::Number(U256::from(2u64)), Value::Exp(mantissa_one()));
        assert_ne!(Value::Number(U256::MAX), Value::Exp(U256::MAX));
        assert_ne!(Value::Number(U256::ZERO), Value::Bool(false));
        assert_eq!(Value::Nothing, Value::Nothing);
    }

    #[test]
    fn test_arithmetic() {
        let five = Value::Number(U256::from(5u64));
        let two = Value::Number(U256::from(2u64));
        assert_eq!(five.checked_add(&two), Some(Value::Number(U256::from(7u64))));
        assert_eq!(two.checked_sub(&five), None);
        assert_eq!(
            five.checked_sub(&Value::Exp(mantissa_one() / U256::from(2u64))),
            Some(Value::Exp(U256::from(4_500_000_000_000_000_000u128)))
        );
        assert_eq!(Value::Bool(true).checked_add(&two), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Exp(mantissa_one() / U256::from(4u64)).to_string(), "0.25");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::String("x".to_string()).to_string(), "\"x\"");
    }
}
