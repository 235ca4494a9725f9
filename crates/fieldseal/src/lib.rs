//! `fieldseal` — field-level application encryption.
//!
//! Sensitive text values (names, emails, free-text notes) are sealed into
//! self-describing envelopes before they reach persistent storage:
//!
//! - [`crypto`]: key derivation, the value cipher, and the envelope codec.
//! - [`record`]: encryption of a caller-chosen subset of a record's fields.
//! - [`server`]: the HTTP surface used by the application's hosted functions.
//!
//! ```no_run
//! use fieldseal::crypto::{FieldCipher, KdfParams, MasterSecret};
//!
//! # fn main() -> Result<(), fieldseal::crypto::CryptoError> {
//! let secret = MasterSecret::from_encoded(&std::env::var("FIELDSEAL_MASTER_SECRET").unwrap_or_default())?;
//! let cipher = FieldCipher::new(secret, KdfParams::default())?;
//! let stored = cipher.encrypt_for_database(Some("john@example.com"))?;
//! let email = cipher.decrypt_from_database(stored.as_deref())?;
//! assert_eq!(email.as_deref(), Some("john@example.com"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod record;
pub mod server;
pub mod telemetry;

pub use crypto::{CryptoError, EncryptedValue, FieldCipher, KdfParams, MasterSecret};
pub use record::{decrypt_object, encrypt_object, Record};
