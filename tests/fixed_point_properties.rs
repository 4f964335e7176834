use alloy::primitives::U256;
use lending_harness::math::{format_mantissa, mantissa_one, parse_mantissa};
use lending_harness::rates::evaluator::{expected_fields, per_block};
use lending_harness::rates::RawRateModelParams;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, TestCaseError, TestRunner};

fn runner(cases: u32) -> TestRunner {
    TestRunner::new(ProptestConfig {
        cases,
        ..ProptestConfig::default()
    })
}

#[test]
fn test_decimal_literal_parses_to_scaled_mantissa() {
    // Integer part and up to 18 fractional digits, so the literal is exactly representable.
    let strategy = (0u64..1_000_000_000, 0u64..1_000_000_000_000_000_000, 0usize..=18);
    let result = runner(5_000).run(&strategy, |(int_part, frac, digits)| {
        let frac = if digits == 0 {
            0
        } else {
            frac % 10u64.pow(digits as u32)
        };
        let literal = if digits == 0 {
            int_part.to_string()
        } else {
            format!("{int_part}.{frac:0width$}", width = digits)
        };
        let parsed = parse_mantissa(&literal).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let expected = U256::from(int_part) * mantissa_one()
            + U256::from(frac) * U256::from(10u64).pow(U256::from(18 - digits));
        prop_assert_eq!(parsed, expected, "literal {}", literal);

        let reparsed = parse_mantissa(&format_mantissa(parsed))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(reparsed, parsed);
        Ok(())
    });
    if let Err(err) = result {
        panic!("decimal parse proptest failed: {err}");
    }
}

#[test]
fn test_formatting_a_parsed_literal_gives_its_canonical_text() {
    // Fractional digits plus padding zeros stay within 18 places.
    let strategy = (
        0u64..1_000_000_000,
        0u64..1_000_000_000_000_000_000,
        0usize..=18,
        0usize..=6,
    );
    let result = runner(5_000).run(&strategy, |(int_part, frac, digits, zeros)| {
        let zeros = zeros.min(18 - digits);
        let mut fraction = if digits == 0 {
            String::new()
        } else {
            format!("{:0width$}", frac % 10u64.pow(digits as u32), width = digits)
        };
        fraction.push_str(&"0".repeat(zeros));
        let literal = if fraction.is_empty() {
            int_part.to_string()
        } else {
            format!("{int_part}.{fraction}")
        };
        let canonical = if literal.contains('.') {
            literal.trim_end_matches('0').trim_end_matches('.')
        } else {
            literal.as_str()
        };

        let parsed = parse_mantissa(&literal).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(format_mantissa(parsed), canonical, "literal {}", literal);
        Ok(())
    });
    if let Err(err) = result {
        panic!("canonical format proptest failed: {err}");
    }
}

#[test]
fn test_per_block_value_is_floor_division() {
    let strategy = (any::<u128>(), 1u64..100_000_000);
    let result = runner(5_000).run(&strategy, |(yearly, blocks_per_year)| {
        let yearly = U256::from(yearly);
        let value = per_block(yearly, blocks_per_year).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let bpy = U256::from(blocks_per_year);
        prop_assert!(value * bpy <= yearly);
        prop_assert!(yearly - value * bpy < bpy);
        prop_assert_eq!(per_block(yearly, blocks_per_year).ok(), Some(value));
        Ok(())
    });
    if let Err(err) = result {
        panic!("per-block proptest failed: {err}");
    }
}

#[test]
fn test_one_unit_per_year_on_bsc() {
    assert_eq!(
        per_block(mantissa_one(), 10_512_000).unwrap(),
        U256::from(95_129_375_951u64)
    );
}

#[test]
fn test_kinks_survive_conversion_unchanged() {
    let strategy = (0u64..=1_000_000, 0u64..=1_000_000, 1u64..50_000_000);
    let result = runner(2_000).run(&strategy, |(a, b, blocks_per_year)| {
        let (k1, k2) = if a <= b { (a, b) } else { (b, a) };
        let kink = |v: u64| format_mantissa(U256::from(v) * U256::from(1_000_000_000_000u64));
        let params = RawRateModelParams::TwoKinks {
            base_rate_per_year: "0.01".to_string(),
            multiplier_per_year: "0.15".to_string(),
            kink1: kink(k1),
            base_rate_per_year2: "0.02".to_string(),
            multiplier_per_year2: "0.4".to_string(),
            kink2: kink(k2),
            jump_multiplier_per_year: "3".to_string(),
        }
        .parse()
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let fields = expected_fields(&params, blocks_per_year)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let value_of = |name: &str| fields.iter().find(|f| f.name == name).map(|f| f.value);
        let scale = U256::from(1_000_000_000_000u64);
        prop_assert_eq!(value_of("kink1"), Some(U256::from(k1) * scale));
        prop_assert_eq!(value_of("kink2"), Some(U256::from(k2) * scale));
        Ok(())
    });
    if let Err(err) = result {
        panic!("kink proptest failed: {err}");
    }
}
