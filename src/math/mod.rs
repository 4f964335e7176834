pub mod fixed_point;

pub use fixed_point::{
    format_mantissa, format_units, mantissa_one, parse_mantissa, parse_units, MANTISSA_DECIMALS,
};
