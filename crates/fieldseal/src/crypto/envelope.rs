//! Text encoding of [`EncryptedValue`] for a single text-typed database column.
//!
//! # Format
//!
//! ```text
//! {"encrypted":"<base64 ciphertext+tag>","iv":"<base64 nonce>","salt":"<base64 salt>"}
//! ```
//!
//! Compact JSON with members in this fixed order. Rows already written in
//! this format must stay readable for the life of a deployment, so the member
//! names and encodings are frozen.

use serde_json::error::Category;

use super::cipher::{EncryptedValue, FieldCipher};
use super::error::CryptoError;

/// Encode an envelope to its persisted text form.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEnvelope`] if JSON encoding fails.
pub fn serialize(value: &EncryptedValue) -> Result<String, CryptoError> {
    serde_json::to_string(value)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("cannot encode envelope: {e}")))
}

/// Parse a persisted envelope.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedEnvelope`] on invalid JSON, a missing
/// member, a non-string member, or an unknown member. The message names
/// only the failure category and position, never the offending text.
pub fn deserialize(text: &str) -> Result<EncryptedValue, CryptoError> {
    serde_json::from_str(text).map_err(|e| {
        let kind = match e.classify() {
            Category::Syntax => "invalid JSON syntax",
            Category::Eof => "unexpected end of input",
            Category::Data => "not an envelope object",
            Category::Io => "unreadable input",
        };
        CryptoError::MalformedEnvelope(format!(
            "{kind} at line {} column {}",
            e.line(),
            e.column()
        ))
    })
}

impl FieldCipher {
    /// Encrypt `plaintext` and encode the envelope for storage; `None` stays `None`.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`FieldCipher::encrypt`].
    pub fn encrypt_for_database(&self, plaintext: Option<&str>) -> Result<Option<String>, CryptoError> {
        self.encrypt(plaintext)?.as_ref().map(serialize).transpose()
    }

    /// Parse a stored envelope and decrypt it; `None` stays `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedEnvelope`] if `stored` cannot be parsed
    /// and propagates any error from [`FieldCipher::decrypt`].
    pub fn decrypt_from_database(&self, stored: Option<&str>) -> Result<Option<String>, CryptoError> {
        let Some(stored) = stored else {
            return Ok(None);
        };
        let value = deserialize(stored)?;
        self.decrypt(Some(&value))
    }
}
