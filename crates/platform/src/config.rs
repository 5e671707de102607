//! Aggregated configuration for the composed platform, loadable from TOML.
//!
//! Every field has a default matching the in-process component defaults, so
//! an empty config file (or none at all) boots the platform exactly as
//! `Platform::new()` would.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub ledger: LedgerConfig,
    pub webhook: WebhookConfig,
    pub logging: LoggingConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            webhook: WebhookConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PlatformConfig {
    /// Parses a TOML document. Missing sections and fields fall back to
    /// their defaults.
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Number of entries accumulated before a block auto-seals.
    pub block_threshold: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { block_threshold: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Multiplied by `2^retry_count` to compute each retry delay, in
    /// seconds. One real minute (60s) in production.
    pub retry_unit_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self { retry_unit_secs: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"info"` or
    /// `"platform=debug,warn"`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = PlatformConfig::from_toml("").unwrap();
        assert_eq!(config.ledger.block_threshold, 10);
        assert_eq!(config.webhook.retry_unit_secs, 60);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn partial_document_overrides_only_given_fields() {
        let config = PlatformConfig::from_toml(
            r#"
            [webhook]
            retry_unit_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.webhook.retry_unit_secs, 5);
        assert_eq!(config.ledger.block_threshold, 10);
    }
}
