//! `fieldseal` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP export).
//! 3. Build the [`FieldCipher`] from the master secret and run a self-test.
//! 4. Build the Axum router and start the HTTP server.

use anyhow::{Context, Result};
use tracing::info;

use fieldseal::config::Config;
use fieldseal::server::{router, state::AppState};
use fieldseal::{telemetry, FieldCipher};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "fieldseal starting"
    );

    // -----------------------------------------------------------------------
    // 3. Cipher
    // -----------------------------------------------------------------------
    let cipher = cfg.build_cipher()?;
    let cipher = tokio::task::spawn_blocking(move || self_test(&cipher).map(|()| cipher))
        .await
        .context("cipher self-test did not complete")??;
    info!(
        key_id = cipher.key_id(),
        kdf_memory_kib = cfg.kdf_memory_kib,
        kdf_iterations = cfg.kdf_iterations,
        kdf_parallelism = cfg.kdf_parallelism,
        "cipher ready"
    );

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let router = router::build(AppState::new(cipher));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Seal and reopen a probe value so a bad secret or KDF setting fails at startup.
fn self_test(cipher: &FieldCipher) -> Result<()> {
    const PROBE: &str = "fieldseal self-test";
    let stored = cipher
        .encrypt_for_database(Some(PROBE))
        .context("self-test encryption failed")?;
    let opened = cipher
        .decrypt_from_database(stored.as_deref())
        .context("self-test decryption failed")?;
    if opened.as_deref() != Some(PROBE) {
        anyhow::bail!("self-test round trip returned a different value");
    }
    Ok(())
}
