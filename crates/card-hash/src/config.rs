//! Fixed key-derivation parameters.
//!
//! These are compile-time constants rather than runtime settings: a record can
//! only be verified with the exact parameters that created it, so changing any
//! of them requires re-hashing every stored record.

/// Identifier of the key-derivation function.
pub const KDF_ALGORITHM: &str = "PBKDF2-HMAC-SHA256";

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Width of a derived digest in bytes (before base64 encoding).
pub const DIGEST_LEN: usize = 32;

/// Width of a salt in bytes (before base64 encoding).
pub const SALT_LEN: usize = 16;

/// The full parameter set, handy for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub algorithm: &'static str,
    pub iterations: u32,
    pub digest_len: usize,
    pub salt_len: usize,
}

impl KdfParams {
    /// Parameters every record in this codebase is created with.
    pub const CURRENT: KdfParams = KdfParams {
        algorithm: KDF_ALGORITHM,
        iterations: KDF_ITERATIONS,
        digest_len: DIGEST_LEN,
        salt_len: SALT_LEN,
    };
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::CURRENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = KdfParams::default();
        assert_eq!(params, KdfParams::CURRENT);
        assert_eq!(params.algorithm, "PBKDF2-HMAC-SHA256");
    }

    #[test]
    fn test_params_debug_names_algorithm_and_rounds() {
        let logged = format!("{:?}", KdfParams::CURRENT);
        assert!(logged.contains("PBKDF2-HMAC-SHA256"));
        assert!(logged.contains("100000"));
    }

    #[test]
    fn test_params_meet_minimums() {
        assert!(KDF_ITERATIONS >= 100_000);
        assert_eq!(DIGEST_LEN, 32);
        assert_eq!(SALT_LEN, 16);
    }
}
