//! [`MasterSecret`]: the process-wide credential every per-value key is derived from.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::error::CryptoError;

/// Minimum decoded length of the master secret (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Domain-separation label for the public key fingerprint.
const KEY_ID_LABEL: &[u8] = b"fieldseal/key-id/v1";

/// Number of HMAC output bytes kept in the fingerprint.
const KEY_ID_LEN: usize = 8;

/// Decoded master secret bytes.
///
/// Constructed once at startup and then only read. The bytes are zeroed when
/// the value is dropped and are never printed, not even by `Debug`.
pub struct MasterSecret {
    bytes: Zeroizing<Vec<u8>>,
    key_id: String,
}

impl MasterSecret {
    /// Parse a hex- or base64-encoded master secret.
    ///
    /// A value made only of hex digits with an even length is read as hex;
    /// anything else is read as standard base64.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] if the value is empty, cannot be
    /// decoded, or decodes to fewer than [`MIN_SECRET_LEN`] bytes.
    pub fn from_encoded(encoded: &str) -> Result<Self, CryptoError> {
        let trimmed = encoded.trim();
        if trimmed.is_empty() {
            return Err(CryptoError::Configuration(
                "master secret is missing or empty".into(),
            ));
        }
        Self::from_bytes(decode(trimmed)?)
    }

    /// Wrap already-decoded secret bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Configuration`] if fewer than [`MIN_SECRET_LEN`]
    /// bytes are supplied.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(bytes);
        if bytes.len() < MIN_SECRET_LEN {
            return Err(CryptoError::Configuration(format!(
                "master secret must decode to at least {MIN_SECRET_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let key_id = fingerprint(&bytes)?;
        Ok(Self { bytes, key_id })
    }

    /// Public fingerprint of this secret, safe to log.
    ///
    /// Hex of the first bytes of `HMAC-SHA256(secret, "fieldseal/key-id/v1")`.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterSecret")
            .field("bytes", &"[REDACTED]")
            .field("key_id", &self.key_id)
            .finish()
    }
}

fn decode(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    let looks_hex = encoded.len() % 2 == 0 && encoded.bytes().all(|b| b.is_ascii_hexdigit());
    if looks_hex {
        hex::decode(encoded)
            .map_err(|_| CryptoError::Configuration("master secret is not valid hex".into()))
    } else {
        STANDARD.decode(encoded).map_err(|_| {
            CryptoError::Configuration("master secret is neither valid hex nor valid base64".into())
        })
    }
}

fn fingerprint(secret: &[u8]) -> Result<String, CryptoError> {
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(secret)
        .map_err(|_| CryptoError::Configuration("master secret rejected by HMAC".into()))?;
    mac.update(KEY_ID_LABEL);
    let digest = mac.finalize().into_bytes();
    Ok(hex::encode(&digest[..KEY_ID_LEN]))
}
