//! Random byte strings.

use load_core::GeneratedValue;
use rand::Rng;

/// Generate between 1 and `max_len` random bytes (empty when `max_len` is 0).
pub fn generate_bytes<R: Rng + ?Sized>(rng: &mut R, max_len: usize) -> GeneratedValue {
    if max_len == 0 {
        return GeneratedValue::Bytes(Vec::new());
    }
    let len = rng.random_range(1..=max_len);
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    GeneratedValue::Bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_length_bounds() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            match generate_bytes(&mut rng, 16) {
                GeneratedValue::Bytes(b) => assert!((1..=16).contains(&b.len())),
                other => panic!("Expected Bytes, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_zero_length() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(generate_bytes(&mut rng, 0), GeneratedValue::Bytes(vec![]));
        assert_eq!(generate_bytes(&mut rng, 0).to_sql_literal(), "''");
    }
}
