//! Secure random source for salts and nonces.

use aes_gcm_siv::aead::{rand_core::RngCore, OsRng};

use super::error::CryptoError;

/// Source of cryptographically secure random bytes.
///
/// There is deliberately no fallback: a source that cannot deliver fails the
/// whole encryption call.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomnessUnavailable`] if the source fails.
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|_| CryptoError::RandomnessUnavailable)
    }
}
