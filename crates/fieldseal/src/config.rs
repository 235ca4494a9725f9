//! Configuration loading and validation for the fieldseal service.
//!
//! All values are read from `FIELDSEAL_*` environment variables at startup.
//! The process exits with a clear error message if any required variable is
//! missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::{FieldCipher, KdfParams, MasterSecret};

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex- or base64-encoded master secret. **Required.**
    #[serde(default)]
    pub master_secret: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for trace export. Export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Argon2id memory cost in KiB. Fixed for the life of a deployment.
    #[serde(default = "default_kdf_memory_kib")]
    pub kdf_memory_kib: u32,

    /// Argon2id iteration count. Fixed for the life of a deployment.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism. Fixed for the life of a deployment.
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}
fn default_kdf_memory_kib() -> u32 {
    KdfParams::default().memory_kib
}
fn default_kdf_iterations() -> u32 {
    KdfParams::default().iterations
}
fn default_kdf_parallelism() -> u32 {
    KdfParams::default().parallelism
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("FIELDSEAL"))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The Argon2id parameters described by this configuration.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.kdf_memory_kib,
            iterations: self.kdf_iterations,
            parallelism: self.kdf_parallelism,
        }
    }

    /// Build the cipher service from the configured secret and parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the master secret cannot be decoded or the KDF
    /// parameters are rejected.
    pub fn build_cipher(&self) -> Result<FieldCipher> {
        let secret = MasterSecret::from_encoded(&self.master_secret)
            .context("FIELDSEAL_MASTER_SECRET is invalid")?;
        FieldCipher::new(secret, self.kdf_params()).context("KDF parameters are invalid")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.master_secret, "FIELDSEAL_MASTER_SECRET")?;
        ensure_non_empty(&self.log_level, "FIELDSEAL_LOG_LEVEL")?;

        if self.listen_port == 0 {
            anyhow::bail!("FIELDSEAL_LISTEN_PORT must be > 0");
        }
        if let Some(endpoint) = &self.otlp_endpoint {
            ensure_non_empty(endpoint, "FIELDSEAL_OTLP_ENDPOINT")?;
        }
        self.kdf_params()
            .validate()
            .context("FIELDSEAL_KDF_* parameters are invalid")?;
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("master_secret", &"[REDACTED]")
            .field("listen_port", &self.listen_port)
            .field("log_level", &self.log_level)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .field("kdf_memory_kib", &self.kdf_memory_kib)
            .field("kdf_iterations", &self.kdf_iterations)
            .field("kdf_parallelism", &self.kdf_parallelism)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn valid() -> Config {
        Config {
            master_secret: SECRET.into(),
            listen_port: default_listen_port(),
            log_level: default_log_level(),
            otlp_endpoint: None,
            kdf_memory_kib: 256,
            kdf_iterations: 1,
            kdf_parallelism: 1,
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_kdf_memory_kib(), 19_456);
        assert_eq!(default_kdf_iterations(), 2);
        assert_eq!(default_kdf_parallelism(), 1);
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_master_secret() {
        let cfg = Config {
            master_secret: "  ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let cfg = Config {
            listen_port: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_otlp_endpoint() {
        let cfg = Config {
            otlp_endpoint: Some(String::new()),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_kdf_params() {
        let cfg = Config {
            kdf_iterations: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn build_cipher_rejects_malformed_secret() {
        let cfg = Config {
            master_secret: "deadbeef".into(),
            ..valid()
        };
        assert!(cfg.build_cipher().is_err());
    }

    #[test]
    fn build_cipher_from_valid_config() {
        let cipher = valid().build_cipher().unwrap();
        assert_eq!(cipher.key_id().len(), 16);
    }

    #[test]
    fn debug_redacts_master_secret() {
        let printed = format!("{:?}", valid());
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains(SECRET));
    }
}
