//! DLN contract addresses.
//!
//! deBridge deploys the DLN contracts at the same address on every supported
//! EVM chain, so a single constant per contract is enough.

use alloy_primitives::{address, Address};

/// DlnSource, the contract that takes orders on the give chain. Approvals for
/// non-native give tokens are granted to this address, and the prepared
/// order-creation transaction targets it.
///
/// <https://docs.debridge.finance/the-debridge-messaging-protocol/deployed-contracts>
pub const DLN_SOURCE_ADDRESS: Address = address!("eF4fB24aD0916217251F553c0596F8Edc630EB66");

/// DlnDestination, the contract that fulfills orders on the take chain.
///
/// <https://docs.debridge.finance/the-debridge-messaging-protocol/deployed-contracts>
pub const DLN_DESTINATION_ADDRESS: Address = address!("e7351fd770a37282b91d153ee690b63579d6dd7f");
