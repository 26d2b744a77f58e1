//! The fixed long/short contract pair and the transaction options used
//! to call it.

use std::fmt;

use alloy_primitives::{address, Address};

/// Deployed long-side flash-loan contract.
pub const LONG_CONTRACT: Address = address!("5f8b1c1a9e3d2b7c4a6e0f9d8c7b6a5e4d3c2b1a");

/// Deployed short-side flash-loan contract.
pub const SHORT_CONTRACT: Address = address!("2a7c9e4b1d3f5a6c8e0b2d4f6a8c0e2b4d6f8a0c");

/// 5 gwei.
pub const GAS_PRICE_WEI: u128 = 5_000_000_000;

pub const GAS_LIMIT: u64 = 500_000;

/// Which side of the pair a contract is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Long,
    Short,
}

impl ContractKind {
    pub const ALL: [ContractKind; 2] = [ContractKind::Long, ContractKind::Short];

    /// Compiled-in address for this side.
    #[must_use]
    pub const fn address(self) -> Address {
        match self {
            ContractKind::Long => LONG_CONTRACT,
            ContractKind::Short => SHORT_CONTRACT,
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Long => f.write_str("long"),
            ContractKind::Short => f.write_str("short"),
        }
    }
}

/// Gas settings attached to every `initiateFlashLoan` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    pub gas_price: u128,
    pub gas_limit: u64,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            gas_price: GAS_PRICE_WEI,
            gas_limit: GAS_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_fixed() {
        let opts = TxOptions::default();
        assert_eq!(opts.gas_price, 5_000_000_000);
        assert_eq!(opts.gas_limit, 500_000);
    }

    #[test]
    fn pair_addresses_differ() {
        assert_ne!(ContractKind::Long.address(), ContractKind::Short.address());
    }
}
