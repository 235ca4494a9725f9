//! AES-256-GCM-SIV encryption and decryption of individual string values.
//!
//! Every call draws a fresh salt and nonce, derives a one-off key from the
//! master secret, and discards the key before returning. No key outlives the
//! call that derived it.

use std::sync::Arc;

use aes_gcm_siv::{
    aead::{Aead, KeyInit},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::error::CryptoError;
use super::kdf::{derive_key, KdfParams, SALT_LEN};
use super::rng::{OsRandom, RandomSource};
use super::secret::MasterSecret;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Largest plaintext, in UTF-8 bytes, accepted by [`FieldCipher::encrypt`] (16 MiB).
pub const MAX_PLAINTEXT_LEN: usize = 16 * 1024 * 1024;

/// One encrypted value: ciphertext (with tag), nonce, and salt, each base64 encoded.
///
/// Member names are part of the persisted format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptedValue {
    /// Base64 ciphertext followed by the 16-byte authentication tag.
    pub encrypted: String,
    /// Base64 nonce ([`NONCE_LEN`] bytes).
    pub iv: String,
    /// Base64 KDF salt ([`SALT_LEN`] bytes).
    pub salt: String,
}

/// The cipher service: owns the master secret and seals or opens single values.
///
/// Cheap to share behind an [`Arc`]; every method takes `&self` and calls
/// never coordinate with one another.
pub struct FieldCipher {
    secret: MasterSecret,
    params: KdfParams,
    rng: Arc<dyn RandomSource>,
}

impl FieldCipher {
    /// Build a cipher drawing randomness from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] if `params` are invalid.
    pub fn new(secret: MasterSecret, params: KdfParams) -> Result<Self, CryptoError> {
        Self::with_random_source(secret, params, Arc::new(OsRandom))
    }

    /// Build a cipher with an explicit random source.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] if `params` are invalid.
    pub fn with_random_source(
        secret: MasterSecret,
        params: KdfParams,
        rng: Arc<dyn RandomSource>,
    ) -> Result<Self, CryptoError> {
        params.validate()?;
        Ok(Self {
            secret,
            params,
            rng,
        })
    }

    /// Public fingerprint of the master secret in use.
    pub fn key_id(&self) -> &str {
        self.secret.key_id()
    }

    /// Encrypt `plaintext`, or pass `None` straight through.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Validation`] if `plaintext` is longer than
    /// [`MAX_PLAINTEXT_LEN`] bytes, [`CryptoError::RandomnessUnavailable`] if
    /// no salt or nonce can be drawn, or [`CryptoError::Configuration`] if key
    /// derivation fails. Nothing is returned in plaintext on failure.
    pub fn encrypt(&self, plaintext: Option<&str>) -> Result<Option<EncryptedValue>, CryptoError> {
        let Some(plaintext) = plaintext else {
            return Ok(None);
        };
        if plaintext.len() > MAX_PLAINTEXT_LEN {
            return Err(oversized(plaintext.len()));
        }

        let mut salt = [0u8; SALT_LEN];
        self.rng.fill(&mut salt)?;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce_bytes)?;

        let cipher = self.build_cipher(&salt)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|_| oversized(plaintext.len()))?;

        Ok(Some(EncryptedValue {
            encrypted: STANDARD.encode(ciphertext),
            iv: STANDARD.encode(nonce_bytes),
            salt: STANDARD.encode(salt),
        }))
    }

    /// Decrypt `value`, or pass `None` straight through.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedEnvelope`] if a member is not valid
    /// base64 or has the wrong length, and [`CryptoError::Integrity`] if the
    /// authentication tag does not verify.
    pub fn decrypt(&self, value: Option<&EncryptedValue>) -> Result<Option<String>, CryptoError> {
        let Some(value) = value else {
            return Ok(None);
        };

        let salt = decode_fixed::<SALT_LEN>(&value.salt, "salt")?;
        let nonce_bytes = decode_fixed::<NONCE_LEN>(&value.iv, "iv")?;
        let ciphertext = decode_member(&value.encrypted, "encrypted")?;

        let cipher = self.build_cipher(&salt)?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|_| CryptoError::Integrity)?;

        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|_| CryptoError::MalformedEnvelope("decrypted payload is not UTF-8".into()))
    }

    fn build_cipher(&self, salt: &[u8]) -> Result<Aes256GcmSiv, CryptoError> {
        let key = derive_key(&self.secret, salt, &self.params)?;
        Aes256GcmSiv::new_from_slice(&key[..])
            .map_err(|_| CryptoError::Configuration("derived key has invalid length".into()))
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("key_id", &self.key_id())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn oversized(len: usize) -> CryptoError {
    CryptoError::Validation(format!(
        "plaintext is {len} bytes, limit is {MAX_PLAINTEXT_LEN}"
    ))
}

fn decode_member(encoded: &str, member: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(encoded)
        .map_err(|_| CryptoError::MalformedEnvelope(format!("`{member}` is not valid base64")))
}

fn decode_fixed<const N: usize>(encoded: &str, member: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode_member(encoded, member)?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        CryptoError::MalformedEnvelope(format!(
            "`{member}` must be {N} bytes, got {}",
            b.len()
        ))
    })
}
