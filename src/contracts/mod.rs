//! Contract bindings used by the wallet providers.

pub mod erc20;
