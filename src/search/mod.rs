// ============================================================================
// Search Module
// Substring search over computed digit sequences
// ============================================================================

mod boyer_moore;
mod index;

pub use boyer_moore::{BoyerMoore, RADIX};
pub use index::{
    polynomial_hash, HashSearcher, InMemoryIndexRepository, IndexRepository, Positions, HASH_BASE,
};

use crate::numeric::BigDecimal;

/// Decimal digits of `value` with sign and decimal point removed.
///
/// `3.14159` becomes `"314159"`.
pub fn digit_string(value: &BigDecimal) -> String {
    value
        .to_string()
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_string() {
        let value: BigDecimal = "3.14159".parse().unwrap();
        assert_eq!(digit_string(&value), "314159");

        let value: BigDecimal = "-0.0042".parse().unwrap();
        assert_eq!(digit_string(&value), "00042");

        assert_eq!(digit_string(&BigDecimal::from(42)), "42");
    }

    #[test]
    fn test_searchers_agree_on_pi_digits() {
        let digits = "3141592653589793238462643383279502884197169399375105820974944";
        let hashed = HashSearcher::new(digits);

        for query in ["1415", "3383", "9375", "58209", "0000", "4944", ""] {
            assert_eq!(
                hashed.search(query),
                BoyerMoore::new(query).search(digits),
                "query {:?}",
                query
            );
        }
    }
}
