//! Canonical location for decimal <-> mantissa conversion.
//! Rule: every human-authored rate or factor enters the crate through `parse_units`.

use crate::error::ParseError;
use alloy::primitives::U256;

/// Fixed-point scale used by every on-chain mantissa in the protocol.
pub const MANTISSA_DECIMALS: u32 = 18;

/// 10^18
pub fn mantissa_one() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

/// Parse a base-10 literal (`-?[0-9]+(\.[0-9]+)?`) into an unsigned integer scaled by
/// `10^scale`.
///
/// Fractional digits beyond `scale` are truncated, never rounded. A negative literal is
/// accepted only when it truncates to zero; anything else is rejected since the result is
/// unsigned.
pub fn parse_units(raw: &str, scale: u32) -> Result<U256, ParseError> {
    let trimmed = raw.trim();
    let invalid = || ParseError::InvalidLiteral(raw.to_string());

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (body, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let frac = match frac_part {
        Some(frac) if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(invalid());
        }
        Some(frac) => frac,
        None => "",
    };

    let scale = scale as usize;
    let kept = &frac[..frac.len().min(scale)];
    let nonzero = |digits: &str| digits.bytes().any(|b| b != b'0');
    if negative && (nonzero(int_part) || nonzero(kept)) {
        return Err(ParseError::Negative(raw.to_string()));
    }
    let padding = std::iter::repeat(b'0').take(scale - kept.len());
    let ten = U256::from(10u8);

    let mut value = U256::ZERO;
    for digit in int_part.bytes().chain(kept.bytes()).chain(padding) {
        value = value
            .checked_mul(ten)
            .and_then(|v| v.checked_add(U256::from(digit - b'0')))
            .ok_or_else(|| ParseError::Overflow(raw.to_string()))?;
    }
    Ok(value)
}

pub fn parse_mantissa(raw: &str) -> Result<U256, ParseError> {
    parse_units(raw, MANTISSA_DECIMALS)
}

/// Render a scaled integer back to its shortest decimal form: no trailing fractional
/// zeros, no dangling dot, always at least one integer digit.
pub fn format_units(value: U256, scale: u32) -> String {
    let digits = value.to_string();
    let scale = scale as usize;
    let (int_part, frac_part) = if digits.len() > scale {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        (int_part.to_string(), frac_part.to_string())
    } else {
        ("0".to_string(), format!("{digits:0>scale$}"))
    };
    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        int_part
    } else {
        format!("{int_part}.{frac}")
    }
}

pub fn format_mantissa(value: U256) -> String {
    format_units(value, MANTISSA_DECIMALS)
}
