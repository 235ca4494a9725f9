//! Structured logging with optional OpenTelemetry trace export.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, envelope text, or key material** may appear in any span
//!   attribute or log field. The master secret is referred to only by its
//!   public `key_id`.
//! - Log level is configurable via `FIELDSEAL_LOG_LEVEL` (default: `info`);
//!   `RUST_LOG` takes precedence when set.

pub mod init;

pub use init::init_telemetry;
