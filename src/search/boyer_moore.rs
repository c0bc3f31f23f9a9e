// ============================================================================
// Boyer-Moore Scanner
// Bad-character rule only, over bytes
// ============================================================================

/// Alphabet size: one slot per byte value
pub const RADIX: usize = 256;

/// Preprocessed pattern for repeated scans.
///
/// Uses only the bad-character skip table; the good-suffix rule is not
/// implemented, so worst case is O(n·m).
#[derive(Debug, Clone)]
pub struct BoyerMoore {
    pattern: Vec<u8>,
    /// Rightmost index of each byte in the pattern, -1 if absent
    right: [isize; RADIX],
}

impl BoyerMoore {
    pub fn new(pattern: &str) -> Self {
        Self::from_bytes(pattern.as_bytes())
    }

    pub fn from_bytes(pattern: &[u8]) -> Self {
        let mut right = [-1isize; RADIX];
        for (j, &byte) in pattern.iter().enumerate() {
            right[usize::from(byte)] = j as isize;
        }
        Self {
            pattern: pattern.to_vec(),
            right,
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// First byte offset of the pattern in `text`, or `text.len()` if absent.
    pub fn search(&self, text: &str) -> usize {
        self.search_bytes(text.as_bytes())
    }

    pub fn search_bytes(&self, text: &[u8]) -> usize {
        let m = self.pattern.len();
        let n = text.len();
        if m > n {
            return n;
        }

        let mut i = 0;
        while i <= n - m {
            let mut skip = 0;
            for j in (0..m).rev() {
                let byte = text[i + j];
                if self.pattern[j] != byte {
                    skip = (j as isize - self.right[usize::from(byte)]).max(1) as usize;
                    break;
                }
            }
            if skip == 0 {
                return i;
            }
            i += skip;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    const TEXT: &str = "abacadabrabracabracadabrabrabracad";

    #[test]
    fn test_classic_patterns() {
        assert_eq!(BoyerMoore::new("abracadabra").search(TEXT), 14);
        assert_eq!(BoyerMoore::new("rab").search(TEXT), 8);
        assert_eq!(BoyerMoore::new("rabrabracad").search(TEXT), 23);
        assert_eq!(BoyerMoore::new("abacad").search(TEXT), 0);
    }

    #[test]
    fn test_absent_pattern_returns_text_length() {
        assert_eq!(BoyerMoore::new("bcara").search(TEXT), TEXT.len());
        assert_eq!(BoyerMoore::new("longer than the text").search("short"), 5);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(BoyerMoore::new("").search(TEXT), 0);
        assert_eq!(BoyerMoore::new("").search(""), 0);
        assert_eq!(BoyerMoore::new("a").search(""), 0);
    }

    #[test]
    fn test_digit_text() {
        let digits = "14159265358979323846264338327950288419716939937510";
        assert_eq!(BoyerMoore::new("99375").search(digits), digits.find("99375").unwrap());
        assert_eq!(BoyerMoore::new("3832").search(digits), 24);
    }

    #[test]
    fn prop_agrees_with_find_on_small_alphabet() {
        fn agrees(text: Vec<u8>, pattern: Vec<u8>) -> TestResult {
            if pattern.len() > 5 {
                return TestResult::discard();
            }
            let text: String = text.into_iter().map(|b| char::from(b'a' + b % 3)).collect();
            let pattern: String = pattern.into_iter().map(|b| char::from(b'a' + b % 3)).collect();
            let expected = text.find(&pattern).unwrap_or(text.len());
            TestResult::from_bool(BoyerMoore::new(&pattern).search(&text) == expected)
        }
        quickcheck(agrees as fn(Vec<u8>, Vec<u8>) -> TestResult);
    }

    #[test]
    fn prop_agrees_with_find_on_unicode() {
        fn agrees(text: String, pattern: String) -> bool {
            let expected = text.find(&pattern).unwrap_or(text.len());
            BoyerMoore::new(&pattern).search(&text) == expected
        }
        quickcheck(agrees as fn(String, String) -> bool);
    }
}
