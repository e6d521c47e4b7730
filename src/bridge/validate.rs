//! Chain and route validation.
//!
//! Pure checks on a bridge request, re-executed on every turn before any
//! network call. Validation never reads or writes session state; the first
//! failing check wins.

use alloy_primitives::{Address, Bytes};

use super::adapter::BridgeRequest;
use super::config::BridgeConfig;
use crate::chain::Chain;
use crate::error::{Result, WalletError};

/// Validated, resolved form of a request's routing fields, derived fresh on
/// every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRouteInfo {
    pub src_chain: Chain,
    pub dst_chain: Chain,
    /// EVM chain id of the destination (take) chain.
    pub dst_chain_id: u64,
    /// Validated recipient on the destination chain.
    pub recipient: Address,
    /// Restriction on who may fulfill the order; empty = anyone.
    pub allowed_taker: Bytes,
    /// Payload executed on the destination after fulfillment; empty = none.
    pub external_call: Bytes,
    /// Referral code attached to the created order.
    pub referral_code: u32,
}

/// Validates a bridge request's chains, recipient, and amount.
///
/// Checks run in order: source chain supported, destination chain supported,
/// recipient well-formed, amount a positive decimal. The recipient is
/// expected to be populated (the orchestrator defaults it to the sender
/// before validating).
pub fn validate(request: &BridgeRequest, config: &BridgeConfig) -> Result<ChainRouteInfo> {
    let src_chain = Chain::from_name(&request.source_chain).ok_or_else(|| {
        WalletError::Validation(format!(
            "Unsupported source chain provided: {}",
            request.source_chain
        ))
    })?;

    let dst_chain = Chain::from_name(&request.destination_chain).ok_or_else(|| {
        WalletError::Validation(format!(
            "Unsupported destination chain provided: {}",
            request.destination_chain
        ))
    })?;

    let recipient = request
        .recipient
        .as_deref()
        .unwrap_or_default()
        .parse::<Address>()
        .map_err(|_| WalletError::Validation("Invalid recipient wallet address".to_string()))?;

    let amount_is_positive = request
        .amount
        .trim()
        .parse::<f64>()
        .map(|amount| amount.is_finite() && amount > 0.0)
        .unwrap_or(false);
    if !amount_is_positive {
        return Err(WalletError::Validation(
            "Enter a valid token amount to bridge".to_string(),
        ));
    }

    Ok(ChainRouteInfo {
        src_chain,
        dst_chain,
        dst_chain_id: dst_chain.chain_id(),
        recipient,
        allowed_taker: Bytes::new(),
        external_call: Bytes::new(),
        referral_code: config.referral_code,
    })
}
