//! Axum HTTP server, routing, and request extraction.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Map [`crate::crypto::CryptoError`] kinds onto HTTP status codes.
//! - Answer unreadable request bodies with the same JSON error body.

pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;
