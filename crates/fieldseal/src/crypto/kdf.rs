//! Argon2id derivation of a per-value AES-256 key from the master secret and a salt.
//!
//! The work parameters are fixed for the life of a deployment: a stored
//! envelope records only its salt, so decrypting it requires the same
//! parameters that sealed it.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use super::cipher::KEY_LEN;
use super::error::CryptoError;
use super::secret::MasterSecret;

/// Byte length of the per-value salt (128 bits).
pub const SALT_LEN: usize = 16;

/// Argon2id work parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 19456 = 19 MiB).
    pub memory_kib: u32,
    /// Number of passes over memory (default: 2).
    pub iterations: u32,
    /// Degree of parallelism (default: 1).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Check the parameters against Argon2's limits.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] if Argon2 rejects them.
    pub fn validate(&self) -> Result<(), CryptoError> {
        self.to_argon2().map(|_| ())
    }

    fn to_argon2(self) -> Result<Params, CryptoError> {
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| CryptoError::Configuration(format!("invalid KDF parameters: {e}")))
    }
}

/// Derive a 256-bit key from `secret` and `salt` using Argon2id.
///
/// Deterministic in `(secret, salt, params)`. The returned buffer is zeroed on drop.
///
/// # Errors
///
/// Returns [`CryptoError::Configuration`] if the secret is empty, the salt is
/// not [`SALT_LEN`] bytes, or the parameters are invalid.
pub fn derive_key(
    secret: &MasterSecret,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let password = secret.expose();
    if password.is_empty() {
        return Err(CryptoError::Configuration(
            "master secret is missing or empty".into(),
        ));
    }
    if salt.len() != SALT_LEN {
        return Err(CryptoError::Configuration(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, output.as_mut())
        .map_err(|e| CryptoError::Configuration(format!("key derivation failed: {e}")))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> KdfParams {
        KdfParams {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn secret(byte: u8) -> MasterSecret {
        MasterSecret::from_bytes(vec![byte; 32]).unwrap()
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let s = secret(7);
        let salt = [0x11u8; SALT_LEN];
        let k1 = derive_key(&s, &salt, &cheap()).unwrap();
        let k2 = derive_key(&s, &salt, &cheap()).unwrap();
        assert_eq!(*k1, *k2);
    }

    #[test]
    fn different_salts_different_keys() {
        let s = secret(7);
        let k1 = derive_key(&s, &[0x11u8; SALT_LEN], &cheap()).unwrap();
        let k2 = derive_key(&s, &[0x22u8; SALT_LEN], &cheap()).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn different_secrets_different_keys() {
        let salt = [0x11u8; SALT_LEN];
        let k1 = derive_key(&secret(1), &salt, &cheap()).unwrap();
        let k2 = derive_key(&secret(2), &salt, &cheap()).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn derived_key_is_not_the_secret() {
        let s = secret(7);
        let key = derive_key(&s, &[0x11u8; SALT_LEN], &cheap()).unwrap();
        assert_ne!(&key[..], s.expose());
    }

    #[test]
    fn rejects_wrong_salt_length() {
        let err = derive_key(&secret(7), &[0u8; 8], &cheap()).unwrap_err();
        assert!(matches!(err, CryptoError::Configuration(_)));
    }

    #[test]
    fn default_params_are_valid() {
        assert!(KdfParams::default().validate().is_ok());
    }

    #[test]
    fn zero_iterations_rejected() {
        let params = KdfParams {
            iterations: 0,
            ..cheap()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, CryptoError::Configuration(_)));
    }
}
