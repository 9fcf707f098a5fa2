//! Numeric value generators.

use load_core::GeneratedValue;
use rand::Rng;

/// Integer digits above this would exceed what an `f64` holds exactly.
pub const MAX_INTEGER_DIGITS: u32 = 15;

/// Largest number of fractional digits ever generated.
pub const MAX_SCALE: u32 = 10;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> GeneratedValue {
    if min >= max {
        return GeneratedValue::Int(min);
    }
    GeneratedValue::Int(rng.random_range(min..=max))
}

/// Generate a non-negative fixed-point number that fits a column with
/// `integer_digits` digits before the decimal point and `scale` after it.
///
/// The integer and fractional parts are drawn separately so the rendered
/// literal never rounds up past `10^integer_digits - 10^-scale`.
pub fn generate_decimal<R: Rng + ?Sized>(
    rng: &mut R,
    integer_digits: u32,
    scale: u32,
) -> GeneratedValue {
    let integer_digits = integer_digits.min(MAX_INTEGER_DIGITS);
    // Keep the total number of significant digits inside f64 precision.
    let drawn_scale = scale.min(MAX_SCALE).min(MAX_INTEGER_DIGITS - integer_digits);

    let integer_part = if integer_digits == 0 {
        0
    } else {
        rng.random_range(0..10u64.pow(integer_digits))
    };
    let fraction_base = 10u64.pow(drawn_scale);
    let fraction_part = if drawn_scale == 0 {
        0
    } else {
        rng.random_range(0..fraction_base)
    };

    let value = integer_part as f64 + fraction_part as f64 / fraction_base as f64;
    GeneratedValue::Decimal {
        value,
        scale: scale.min(MAX_SCALE),
    }
}
