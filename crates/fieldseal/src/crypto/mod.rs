//! Per-value authenticated encryption of sensitive text.
//!
//! This module is free of HTTP and async dependencies. It provides the
//! in-memory API ([`FieldCipher::encrypt`] / [`FieldCipher::decrypt`]) and the
//! storage-facing API ([`FieldCipher::encrypt_for_database`] /
//! [`FieldCipher::decrypt_from_database`]).
//!
//! # Construction
//!
//! 1. A fresh 16-byte salt and 12-byte nonce are drawn from the OS CSPRNG.
//! 2. Argon2id derives a 256-bit key from the master secret and the salt.
//! 3. AES-256-GCM-SIV seals the UTF-8 plaintext (no associated data).
//! 4. Ciphertext+tag, nonce and salt are base64 encoded into an
//!    [`EncryptedValue`], which [`envelope::serialize`] turns into the stored
//!    column text.
//!
//! # Security invariants
//!
//! - Plaintext, derived keys and the master secret are never logged.
//! - Derived keys are zeroed as soon as the call that needed them returns.
//! - A failed tag check is always an error; no partially decrypted bytes escape.

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod rng;
pub mod secret;

pub use cipher::{EncryptedValue, FieldCipher, KEY_LEN, MAX_PLAINTEXT_LEN, NONCE_LEN};
pub use error::CryptoError;
pub use kdf::{KdfParams, SALT_LEN};
pub use rng::{OsRandom, RandomSource};
pub use secret::MasterSecret;
