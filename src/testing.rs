//! Test utilities and fake implementations
//!
//! This module provides fake implementations of the [`Account`], [`DlnApi`],
//! and [`Clock`] traits that enable comprehensive testing of the bridge state
//! machine — including expiry, abandonment, and chain-failure scenarios —
//! without blockchain or HTTP interactions.
//!
//! The fakes are used by the crate's own integration tests and are exported
//! for downstream test suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use alloy_primitives::{keccak256, Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use crate::chain::addresses::DLN_SOURCE_ADDRESS;
use crate::chain::Chain;
use crate::error::{Result, WalletError};
use crate::protocol::{
    CostDetail, CostPayload, DestinationLegEstimate, OrderEstimation, OrderQuoteQuery,
    OrderQuoteResponse, OrderTx, SourceLegEstimate, TokenListEntry, TokenListResponse,
    DLN_PROTOCOL_FEE_KIND,
};
use crate::traits::{Account, Clock, DlnApi, ReceiptSummary};

// ============================================================================
// Fake Account
// ============================================================================

/// A transaction recorded by [`FakeAccount::send_transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// A fake signing wallet that records writes and serves configured reads.
///
/// This allows testing scenarios like:
/// - Sufficient vs. insufficient allowances
/// - Reverted approvals
/// - Failing reads and failing submissions
#[derive(Clone, Debug)]
pub struct FakeAccount {
    address: Address,
    balance: Arc<Mutex<U256>>,
    allowances: Arc<Mutex<HashMap<(Address, Address), U256>>>,
    approvals: Arc<Mutex<Vec<(Address, Address, U256)>>>,
    sent: Arc<Mutex<Vec<SentTransaction>>>,
    receipt_status: Arc<Mutex<bool>>,
    fail_allowance: Arc<Mutex<bool>>,
    fail_send: Arc<Mutex<bool>>,
    tx_counter: Arc<Mutex<u64>>,
}

impl FakeAccount {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balance: Arc::new(Mutex::new(U256::ZERO)),
            allowances: Arc::new(Mutex::new(HashMap::new())),
            approvals: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            receipt_status: Arc::new(Mutex::new(true)),
            fail_allowance: Arc::new(Mutex::new(false)),
            fail_send: Arc::new(Mutex::new(false)),
            tx_counter: Arc::new(Mutex::new(0)),
        }
    }

    /// Sets the native balance returned by `native_balance`.
    pub fn set_balance(&self, balance: U256) {
        *self.balance.lock().unwrap() = balance;
    }

    /// Pre-sets the allowance returned for `(token, spender)`.
    pub fn set_allowance(&self, token: Address, spender: Address, amount: U256) {
        self.allowances
            .lock()
            .unwrap()
            .insert((token, spender), amount);
    }

    /// Makes all receipts report a reverted transaction.
    pub fn set_receipt_status(&self, status: bool) {
        *self.receipt_status.lock().unwrap() = status;
    }

    /// Makes allowance reads fail with a chain error.
    pub fn fail_allowance_reads(&self) {
        *self.fail_allowance.lock().unwrap() = true;
    }

    /// Makes transaction submissions fail with a chain error.
    pub fn fail_sends(&self) {
        *self.fail_send.lock().unwrap() = true;
    }

    /// Every `(token, spender, amount)` triple passed to `approve`.
    pub fn approvals(&self) -> Vec<(Address, Address, U256)> {
        self.approvals.lock().unwrap().clone()
    }

    /// Every transaction passed to `send_transaction`.
    pub fn sent_transactions(&self) -> Vec<SentTransaction> {
        self.sent.lock().unwrap().clone()
    }

    fn next_tx_hash(&self) -> TxHash {
        let mut counter = self.tx_counter.lock().unwrap();
        *counter += 1;
        let mut bytes = [0u8; 32];
        bytes[0] = 0xfa;
        bytes[24..].copy_from_slice(&counter.to_be_bytes());
        TxHash::from(bytes)
    }
}

#[async_trait]
impl Account for FakeAccount {
    fn address(&self) -> Address {
        self.address
    }

    async fn native_balance(&self) -> Result<U256> {
        Ok(*self.balance.lock().unwrap())
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        // Deterministic stand-in for a real signature.
        Ok(format!("0x{}", alloy_primitives::hex::encode(keccak256(message.as_bytes()))))
    }

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256> {
        if *self.fail_allowance.lock().unwrap() {
            return Err(WalletError::Chain {
                reason: "simulated allowance read failure".to_string(),
            });
        }
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&(token, spender))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        if *self.fail_send.lock().unwrap() {
            return Err(WalletError::Chain {
                reason: "simulated approval submission failure".to_string(),
            });
        }
        self.approvals.lock().unwrap().push((token, spender, amount));
        self.allowances
            .lock()
            .unwrap()
            .insert((token, spender), amount);
        Ok(self.next_tx_hash())
    }

    async fn send_transaction(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash> {
        if *self.fail_send.lock().unwrap() {
            return Err(WalletError::Chain {
                reason: "simulated submission failure".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push(SentTransaction { to, data, value });
        Ok(self.next_tx_hash())
    }

    async fn wait_for_transaction_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary> {
        Ok(ReceiptSummary {
            tx_hash,
            status: *self.receipt_status.lock().unwrap(),
        })
    }
}

// ============================================================================
// Fake DLN API
// ============================================================================

/// A fake DLN API serving configured token lists and quote responses.
///
/// This allows testing scenarios like:
/// - Cache hits vs. refetches (via call counts)
/// - Upstream timeouts and malformed quotes
/// - Asserting the exact query the preparer built
#[derive(Clone, Debug, Default)]
pub struct FakeDlnApi {
    token_lists: Arc<Mutex<HashMap<Chain, Vec<TokenListEntry>>>>,
    quote: Arc<Mutex<Option<OrderQuoteResponse>>>,
    token_list_calls: Arc<Mutex<usize>>,
    quote_calls: Arc<Mutex<usize>>,
    last_query: Arc<Mutex<Option<OrderQuoteQuery>>>,
    fail_token_list: Arc<Mutex<bool>>,
    fail_quote: Arc<Mutex<bool>>,
}

impl FakeDlnApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the token list served for `chain`.
    pub fn add_tokens(&self, chain: Chain, entries: Vec<TokenListEntry>) {
        self.token_lists.lock().unwrap().insert(chain, entries);
    }

    /// Configures the response served by `create_order_tx`.
    pub fn set_quote(&self, response: OrderQuoteResponse) {
        *self.quote.lock().unwrap() = Some(response);
    }

    /// Makes token-list fetches fail with a timeout while set.
    pub fn set_token_list_failure(&self, fail: bool) {
        *self.fail_token_list.lock().unwrap() = fail;
    }

    /// Makes quote requests fail with a quote error while set.
    pub fn set_quote_failure(&self, fail: bool) {
        *self.fail_quote.lock().unwrap() = fail;
    }

    /// Number of `token_list` calls served so far.
    pub fn token_list_calls(&self) -> usize {
        *self.token_list_calls.lock().unwrap()
    }

    /// Number of `create_order_tx` calls served so far.
    pub fn quote_calls(&self) -> usize {
        *self.quote_calls.lock().unwrap()
    }

    /// The query of the most recent `create_order_tx` call.
    pub fn last_query(&self) -> Option<OrderQuoteQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl DlnApi for FakeDlnApi {
    async fn token_list(&self, chain: Chain) -> Result<TokenListResponse> {
        *self.token_list_calls.lock().unwrap() += 1;

        if *self.fail_token_list.lock().unwrap() {
            return Err(WalletError::Timeout);
        }

        let entries = self
            .token_lists
            .lock()
            .unwrap()
            .get(&chain)
            .cloned()
            .ok_or_else(|| WalletError::Chain {
                reason: format!("no fake token list configured for {chain}"),
            })?;

        Ok(TokenListResponse {
            tokens: entries
                .into_iter()
                .map(|entry| (entry.address.to_string(), entry))
                .collect(),
        })
    }

    async fn create_order_tx(&self, query: &OrderQuoteQuery) -> Result<OrderQuoteResponse> {
        *self.quote_calls.lock().unwrap() += 1;
        *self.last_query.lock().unwrap() = Some(query.clone());

        if *self.fail_quote.lock().unwrap() {
            return Err(WalletError::Quote {
                reason: "simulated quote failure".to_string(),
            });
        }

        self.quote
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WalletError::Quote {
                reason: "no fake quote configured".to_string(),
            })
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that only moves when advanced.
///
/// This allows driving expiry and abandonment deadlines deterministically
/// without waiting.
#[derive(Clone, Debug)]
pub struct FakeClock {
    now: Arc<Mutex<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builds an upstream token-list entry.
pub fn token_entry(symbol: &str, address: Address, decimals: u8) -> TokenListEntry {
    TokenListEntry {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        address,
        decimals,
        logo_uri: None,
    }
}

/// Builds a quote response with a single protocol-fee cost entry and a
/// prepared transaction targeting the DlnSource contract.
#[allow(clippy::too_many_arguments)]
pub fn quote_response(
    give_token: &TokenListEntry,
    give_amount: U256,
    give_usd: f64,
    take_token: &TokenListEntry,
    take_amount: U256,
    take_usd: f64,
    protocol_fee_usd: f64,
    fix_fee: U256,
    tx_value: U256,
) -> OrderQuoteResponse {
    OrderQuoteResponse {
        estimation: OrderEstimation {
            src_chain_token_in: SourceLegEstimate {
                address: give_token.address,
                symbol: give_token.symbol.clone(),
                decimals: give_token.decimals,
                amount: give_amount,
                approximate_usd_value: give_usd,
            },
            dst_chain_token_out: DestinationLegEstimate {
                address: take_token.address,
                symbol: take_token.symbol.clone(),
                decimals: take_token.decimals,
                recommended_amount: take_amount,
                recommended_approximate_usd_value: take_usd,
            },
            costs_details: vec![CostDetail {
                kind: DLN_PROTOCOL_FEE_KIND.to_string(),
                payload: Some(CostPayload {
                    fee_approximate_usd_value: Some(protocol_fee_usd),
                }),
            }],
        },
        fix_fee,
        tx: OrderTx {
            to: DLN_SOURCE_ADDRESS,
            data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
            value: tx_value,
        },
    }
}
