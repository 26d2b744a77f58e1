//! Handler for the `config` command group.

use std::path::Path;

use crate::cli::output;
use crate::config::{Config, PRIVATE_KEY_ENV};
use crate::error::Result;

/// Execute `config validate`. Unlike the other commands this requires the
/// file to exist.
pub fn execute_validate(path: &Path) -> Result<()> {
    Config::load(path)?;
    output::ok(&format!("{} is valid", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(config: &Config) -> Result<()> {
    output::section("Effective Configuration");
    output::key_value("Log level", &config.logging.level);
    output::key_value("Log format", &config.logging.format);
    output::key_value("RPC", config.rpc_url().unwrap_or_default());
    output::key_value("Overlap", format!("{:?}", config.scheduler.overlap));
    output::key_value(
        "Wallet",
        if config.wallet.private_key.is_some() {
            "configured".to_string()
        } else {
            format!("not configured ({PRIVATE_KEY_ENV} unset)")
        },
    );
    Ok(())
}
