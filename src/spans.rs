//! OpenTelemetry span helpers for wallet and bridge operations
//!
//! This module provides orthogonal span instrumentation following production
//! best practices: static span names, structured attributes, and separation
//! from business logic.
//!
//! These span helpers are used internally by the adapters but are exposed
//! publicly for advanced users who need custom instrumentation or want to
//! integrate with existing OpenTelemetry setups.

use alloy_primitives::{Address, TxHash, U256};
use tracing::Span;
use url::Url;

use crate::chain::Chain;

/// Create span for one turn of the bridge state machine.
///
/// Parent: Top-level tool invocation span (auto-attached by tracing)
/// Children: Token discovery, quote, approval, and submission spans
#[inline]
pub fn bridge_turn(source_chain: &str, destination_chain: &str, caller: Address) -> Span {
    tracing::info_span!(
        "agent_wallet.bridge_turn",
        source_chain = source_chain,
        destination_chain = destination_chain,
        caller = %caller,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for fetching and caching a chain's token list.
///
/// Parent: agent_wallet.bridge_turn
/// Children: HTTP client request spans (from reqwest instrumentation)
#[inline]
pub fn token_discovery(chain: &Chain) -> Span {
    tracing::debug_span!(
        "agent_wallet.token_discovery",
        chain = %chain,
    )
}

/// Create span for one quote request against the DLN order endpoint.
///
/// Parent: agent_wallet.bridge_turn
/// Children: HTTP client request spans (from reqwest instrumentation)
#[inline]
pub fn create_order_quote(url: &Url) -> Span {
    tracing::debug_span!(
        "agent_wallet.create_order_quote",
        url = %url,
    )
}

/// Create span for the ERC-20 approval flow ahead of order submission.
///
/// Parent: agent_wallet.bridge_turn
/// Children: Provider RPC calls (from alloy instrumentation)
#[inline]
pub fn ensure_approval(token: &Address, spender: &Address, amount: &U256) -> Span {
    tracing::info_span!(
        "agent_wallet.ensure_approval",
        token = %token,
        spender = %spender,
        amount = %amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for submitting the prepared order transaction.
///
/// Parent: agent_wallet.bridge_turn
/// Children: Provider RPC calls
#[inline]
pub fn submit_order(to: &Address, value: &U256, source_chain: &Chain) -> Span {
    tracing::info_span!(
        "agent_wallet.submit_order",
        to = %to,
        value = %value,
        source_chain = %source_chain,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for waiting on a transaction receipt.
///
/// Parent: submit_order or ensure_approval
/// Children: Provider RPC calls (polling)
#[inline]
pub fn wait_for_receipt(tx_hash: TxHash) -> Span {
    tracing::debug_span!(
        "agent_wallet.wait_for_receipt",
        tx_hash = %tx_hash,
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions for error tracking:
/// - error.type: The error type/variant
/// - error.message: Human-readable error message
/// - error.source: The underlying source error, when present
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    current_span.record(
        "error.type",
        error.to_string().split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", error.to_string());
    current_span.record("otel.status_code", "ERROR");

    // Record error chain if available
    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with custom context on the current span.
///
/// This variant allows adding additional context fields to the error.
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.source", context);
    }
}
