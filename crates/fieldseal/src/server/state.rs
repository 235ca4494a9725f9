//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::FieldCipher;

/// Application state shared across all request handlers.
///
/// Cloning is cheap: the cipher is behind an [`Arc`] and is only ever read.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The cipher service holding the master secret.
    pub cipher: Arc<FieldCipher>,
}

impl AppState {
    /// Create a new [`AppState`] around `cipher`.
    pub fn new(cipher: FieldCipher) -> Self {
        Self {
            cipher: Arc::new(cipher),
        }
    }
}
