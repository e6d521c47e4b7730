//! Core trait abstractions for wallet and bridge operations.
//!
//! This module defines the seams that enable dependency injection and testing
//! of the adapter logic. By abstracting the signing wallet, the deBridge DLN
//! HTTP service, and time behind traits, users can implement fake versions
//! for comprehensive testing including adversarial scenarios.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use std::time::Instant;

use crate::chain::Chain;
use crate::error::Result;
use crate::protocol::{OrderQuoteQuery, OrderQuoteResponse, TokenListResponse};

/// Minimal summary of a mined transaction.
///
/// The adapters only need to know whether a transaction landed and succeeded,
/// so the network-specific receipt type stays behind the [`Account`] seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptSummary {
    /// Hash of the mined transaction.
    pub tx_hash: TxHash,
    /// Execution status from the receipt (`true` = success).
    pub status: bool,
}

/// Trait for the signing wallet an agent operates through.
///
/// This is the collaborator that holds keys and talks to the chain. Adapters
/// never sign or encode calldata themselves; they sequence calls against this
/// interface.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Insufficient allowances and the resulting approval flow
/// - Reverted approval transactions
/// - RPC failures on reads and writes
#[async_trait]
pub trait Account: Send + Sync {
    /// Address of the wallet.
    fn address(&self) -> Address;

    /// Balance of the chain's native asset, in wei.
    async fn native_balance(&self) -> Result<U256>;

    /// Signs an arbitrary message, returning the 0x-prefixed signature hex.
    async fn sign_message(&self, message: &str) -> Result<String>;

    /// Reads the ERC-20 allowance granted by this wallet to `spender`.
    async fn allowance(&self, token: Address, spender: Address) -> Result<U256>;

    /// Submits an ERC-20 approval for exactly `amount` and returns the
    /// transaction hash without waiting for it to mine.
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash>;

    /// Signs and submits a transaction, returning its hash.
    async fn send_transaction(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash>;

    /// Blocks until the transaction is mined and returns its receipt summary.
    async fn wait_for_transaction_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary>;
}

/// Trait for the deBridge DLN HTTP service.
///
/// Covers the two endpoints the bridge adapter consumes: the per-chain token
/// list and the order/quote creation endpoint that returns a ready-to-sign
/// transaction.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Token lists per chain, including the zero-address native entry
/// - Quote responses with and without the protocol-fee cost entry
/// - Upstream timeouts and malformed responses
#[async_trait]
pub trait DlnApi: Send + Sync {
    /// Fetches the bridgeable token list for a chain.
    async fn token_list(&self, chain: Chain) -> Result<TokenListResponse>;

    /// Requests a quote and a prepared order-creation transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, times out, or the response
    /// cannot be parsed.
    async fn create_order_tx(&self, query: &OrderQuoteQuery) -> Result<OrderQuoteResponse>;
}

/// Trait for reading the current time.
///
/// Session expiry and abandonment are absolute deadlines evaluated at the top
/// of every bridge turn, so tests can drive time-dependent transitions by
/// advancing a fake clock instead of waiting.
pub trait Clock: Send + Sync {
    /// Returns the current instant in time.
    fn now(&self) -> Instant;
}
