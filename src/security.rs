//! Security helpers (API key generation, constant-time compare)

use rand::Rng;
use subtle::ConstantTimeEq;

pub const DEFAULT_API_KEY_LENGTH: usize = 48;

/// Generate a random alphanumeric API key.
pub fn generate_api_key(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();

    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Constant-time byte equality.
///
/// Runs in time independent of where the inputs first differ; only the length
/// comparison short-circuits.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_api_key() {
        let key = generate_api_key(DEFAULT_API_KEY_LENGTH);

        assert_eq!(key.len(), 48);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(key, generate_api_key(DEFAULT_API_KEY_LENGTH));
    }

    #[test]
    fn test_ct_eq() {
        assert!(ct_eq(b"secret", b"secret"));
        assert!(!ct_eq(b"secret", b"secreT"));
        assert!(!ct_eq(b"secret", b"secret2"));
        assert!(!ct_eq(b"secret", b""));
        assert!(!ct_eq(b"secret", b"secre\xff"));
    }
}
