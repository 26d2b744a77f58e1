//! Handler for the `contracts` command.

use crate::app::{OverlapPolicy, DISPATCH_PERIOD};
use crate::cli::output;
use crate::config::Config;
use crate::domain::{ContractKind, TxOptions};
use crate::error::Result;

/// Execute `contracts`. Works offline.
pub fn execute(config: &Config) -> Result<()> {
    let target = config.target();
    let options = TxOptions::default();

    output::section("Contracts");
    for kind in ContractKind::ALL {
        output::key_value(&kind.to_string(), kind.address());
    }

    output::section("Network");
    output::key_value("Chain", format!("{} ({})", target.chain_name, target.hex_chain_id()));
    output::key_value("RPC", config.rpc_url().unwrap_or_default());

    output::section("Dispatch");
    output::key_value("Gas price", format!("{} gwei", options.gas_price / 1_000_000_000));
    output::key_value("Gas limit", options.gas_limit);
    output::key_value("Period", format!("{}s", DISPATCH_PERIOD.as_secs()));
    output::key_value(
        "Overlap",
        match config.scheduler.overlap {
            OverlapPolicy::Skip => "skip while busy",
            OverlapPolicy::Allow => "allow",
        },
    );
    Ok(())
}
