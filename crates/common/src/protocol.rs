//! Request and response types exchanged with the fieldseal HTTP service.
//!
//! All bodies are JSON. A `null` plaintext or envelope is carried through
//! unchanged: the service never encrypts or decrypts a missing value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Single values
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Text to protect. `null` (or an absent member) yields a `null` envelope.
    #[serde(default)]
    pub plaintext: Option<String>,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Serialized envelope suitable for a single text column.
    pub envelope: Option<String>,
}

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Envelope text previously returned by `POST /encrypt`.
    #[serde(default)]
    pub envelope: Option<String>,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Recovered plaintext.
    pub plaintext: Option<String>,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt-object` and `POST /decrypt-object`.
///
/// Only the members named in `fields` are transformed; every other member of
/// `record` is returned exactly as sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRequest {
    /// Flat JSON object holding the record's columns.
    pub record: Map<String, Value>,
    /// Names of the members to encrypt or decrypt.
    pub fields: Vec<String>,
}

/// Successful response body for the record endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectResponse {
    /// The transformed record.
    pub record: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, `"ok"` while the process is serving.
    pub status: String,
    /// Public fingerprint of the loaded master secret.
    pub key_id: String,
}
