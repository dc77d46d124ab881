//! Short code generation.
//!
//! Codes are drawn from the thread-local RNG. They are not meant to be
//! unguessable; collisions are possible and are resolved by the storage layer.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Number of characters in a generated code.
pub const CODE_LENGTH: usize = 8;

/// Upper bound on attempts a backend makes to find an unused code.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Generates a random 8-character code over `a-z`, `A-Z` and `0-9`.
///
/// Each character is drawn independently and uniformly from the 62-symbol alphabet.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 8);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        let code = generate_code();
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_alphanumeric_characters() {
        for _ in 0..100 {
            let code = generate_code();
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{code}");
        }
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_code_uses_whole_alphabet() {
        let seen: HashSet<char> = (0..2000)
            .flat_map(|_| generate_code().into_bytes())
            .map(char::from)
            .collect();

        assert!(seen.iter().any(|c| c.is_ascii_lowercase()));
        assert!(seen.iter().any(|c| c.is_ascii_uppercase()));
        assert!(seen.iter().any(|c| c.is_ascii_digit()));
    }
}
