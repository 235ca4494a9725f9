//! [`CryptoError`]: the failure kinds surfaced by every encryption operation.

use thiserror::Error;

/// Errors produced by the encryption subsystem.
///
/// Messages never contain plaintext, envelope contents, or key material, so
/// they are safe to log and to return to callers.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The master secret or the KDF parameters are missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An envelope could not be parsed or is missing a member.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Authentication failed: the envelope was tampered with, truncated, or
    /// sealed under a different master secret.
    #[error("integrity check failed")]
    Integrity,

    /// A field selected for encryption does not hold a string or null.
    #[error("validation error: {0}")]
    Validation(String),

    /// The OS secure random source could not produce bytes.
    #[error("secure random source unavailable")]
    RandomnessUnavailable,
}

impl CryptoError {
    /// Stable machine-readable name of the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            CryptoError::Configuration(_) => "configuration_error",
            CryptoError::MalformedEnvelope(_) => "malformed_envelope",
            CryptoError::Integrity => "integrity_error",
            CryptoError::Validation(_) => "validation_error",
            CryptoError::RandomnessUnavailable => "randomness_unavailable",
        }
    }
}
