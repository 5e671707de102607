//! Binary entry point: reads `PLATFORM_CONFIG` (a TOML file path) if set,
//! wires tracing, composes the platform, and reports a readiness summary.
//!
//! There is no bundled HTTP adapter -- this binary exists to prove the
//! composition root boots cleanly and to give operators a place to hang
//! one. Wire a web framework's router to the `Platform` handle's fields as
//! the outer interface needs.

use anyhow::{Context, Result};
use platform::{Platform, PlatformConfig};
use tracing_subscriber::EnvFilter;

fn load_config() -> Result<PlatformConfig> {
    match std::env::var("PLATFORM_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file at {path}"))?;
            PlatformConfig::from_toml(&raw).with_context(|| format!("parsing config file at {path}"))
        }
        Err(_) => Ok(PlatformConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.logging.filter.clone()))
        .init();

    let platform = Platform::with_config(&config);

    let ledger_stats = platform.ledger.stats();
    let compliance_status = platform.compliance.compliance_status();

    tracing::info!(
        ledger_entries = ledger_stats.total_entries,
        ledger_blocks = ledger_stats.total_blocks,
        compliance_score = compliance_status.compliance_score,
        "platform ready"
    );

    Ok(())
}
