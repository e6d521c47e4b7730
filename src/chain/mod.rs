//! Chain tables for the DLN-supported EVM networks.
//!
//! This module contains the chain enumeration with its wire names, EVM chain
//! ids, DLN-internal chain ids, and native-currency symbols, plus the DLN
//! contract addresses.

pub mod addresses;

use std::fmt;

/// EVM chains supported by the deBridge DLN order flow.
///
/// The wire name (what an agent passes in a tool call) follows deBridge's own
/// chain naming, e.g. `"bsc"` or `"cronoszkEVM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Abstract,
    Arbitrum,
    Avalanche,
    Base,
    Berachain,
    Bitrock,
    BnbChain,
    CronosZkEvm,
    CrossFi,
    Ethereum,
    Gnosis,
    HyperEvm,
    Linea,
    Metis,
    Neon,
    Optimism,
    Polygon,
    Sonic,
    Story,
}

impl Chain {
    /// All supported chains, in wire-name order.
    pub const ALL: [Chain; 19] = [
        Chain::Abstract,
        Chain::Arbitrum,
        Chain::Avalanche,
        Chain::Base,
        Chain::Berachain,
        Chain::Bitrock,
        Chain::BnbChain,
        Chain::CronosZkEvm,
        Chain::CrossFi,
        Chain::Ethereum,
        Chain::Gnosis,
        Chain::HyperEvm,
        Chain::Linea,
        Chain::Metis,
        Chain::Neon,
        Chain::Optimism,
        Chain::Polygon,
        Chain::Sonic,
        Chain::Story,
    ];

    /// Resolves a wire name (case-insensitive) to a chain.
    pub fn from_name(name: &str) -> Option<Chain> {
        Chain::ALL
            .into_iter()
            .find(|chain| chain.name().eq_ignore_ascii_case(name))
    }

    /// The wire name used in tool calls and API parameters.
    pub fn name(&self) -> &'static str {
        match self {
            Chain::Abstract => "abstract",
            Chain::Arbitrum => "arbitrum",
            Chain::Avalanche => "avalanche",
            Chain::Base => "base",
            Chain::Berachain => "berachain",
            Chain::Bitrock => "bitrock",
            Chain::BnbChain => "bsc",
            Chain::CronosZkEvm => "cronoszkEVM",
            Chain::CrossFi => "crossFi",
            Chain::Ethereum => "ethereum",
            Chain::Gnosis => "gnosis",
            Chain::HyperEvm => "hyperEVM",
            Chain::Linea => "linea",
            Chain::Metis => "metis",
            Chain::Neon => "neon",
            Chain::Optimism => "optimism",
            Chain::Polygon => "polygon",
            Chain::Sonic => "sonic",
            Chain::Story => "story",
        }
    }

    /// The EVM chain id (EIP-155).
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Abstract => 2741,
            Chain::Arbitrum => 42161,
            Chain::Avalanche => 43114,
            Chain::Base => 8453,
            Chain::Berachain => 80094,
            Chain::Bitrock => 7171,
            Chain::BnbChain => 56,
            Chain::CronosZkEvm => 388,
            Chain::CrossFi => 4158,
            Chain::Ethereum => 1,
            Chain::Gnosis => 100,
            Chain::HyperEvm => 999,
            Chain::Linea => 59144,
            Chain::Metis => 1088,
            Chain::Neon => 245022934,
            Chain::Optimism => 10,
            Chain::Polygon => 137,
            Chain::Sonic => 146,
            Chain::Story => 1514,
        }
    }

    /// The DLN-internal chain id used by the quote and token-list endpoints.
    ///
    /// For most chains this equals the EVM chain id; chains that exceed
    /// deBridge's original id space get a `1000000xx` identifier.
    ///
    /// See <https://docs.debridge.finance/the-debridge-messaging-protocol/fees-and-supported-chains>
    pub fn dln_chain_id(&self) -> u64 {
        match self {
            Chain::Abstract => 100000017,
            Chain::Arbitrum => 42161,
            Chain::Avalanche => 43114,
            Chain::Base => 8453,
            Chain::Berachain => 100000020,
            Chain::Bitrock => 100000005,
            Chain::BnbChain => 56,
            Chain::CronosZkEvm => 100000010,
            Chain::CrossFi => 100000006,
            Chain::Ethereum => 1,
            Chain::Gnosis => 100000002,
            Chain::HyperEvm => 100000022,
            Chain::Linea => 59144,
            Chain::Metis => 100000004,
            Chain::Neon => 100000001,
            Chain::Optimism => 10,
            Chain::Polygon => 137,
            Chain::Sonic => 100000014,
            Chain::Story => 100000013,
        }
    }

    /// Symbol of the chain's native currency.
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Abstract => "ETH",
            Chain::Arbitrum => "ETH",
            Chain::Avalanche => "AVAX",
            Chain::Base => "ETH",
            Chain::Berachain => "BERA",
            Chain::Bitrock => "BROCK",
            Chain::BnbChain => "BNB",
            Chain::CronosZkEvm => "zkCRO",
            Chain::CrossFi => "XFI",
            Chain::Ethereum => "ETH",
            Chain::Gnosis => "xDAI",
            Chain::HyperEvm => "HYPE",
            Chain::Linea => "ETH",
            Chain::Metis => "METIS",
            Chain::Neon => "NEON",
            Chain::Optimism => "ETH",
            Chain::Polygon => "POL",
            Chain::Sonic => "S",
            Chain::Story => "IP",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
