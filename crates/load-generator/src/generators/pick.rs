//! Generators choosing from a fixed list.

use load_core::GeneratedValue;
use rand::Rng;

/// Pick one of the declared enum/set values uniformly.
///
/// An empty list yields NULL; the registry never builds such a generator.
pub fn pick_string<R: Rng + ?Sized>(rng: &mut R, values: &[String]) -> GeneratedValue {
    if values.is_empty() {
        return GeneratedValue::Null;
    }
    let idx = rng.random_range(0..values.len());
    GeneratedValue::String(values[idx].clone())
}

/// Pick one of the sampled values uniformly.
pub fn pick_value<R: Rng + ?Sized>(rng: &mut R, values: &[GeneratedValue]) -> GeneratedValue {
    if values.is_empty() {
        return GeneratedValue::Null;
    }
    values[rng.random_range(0..values.len())].clone()
}
