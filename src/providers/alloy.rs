//! Alloy-backed production implementation of the [`Account`] trait.

use std::time::Duration;

use alloy_network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{hex, Address, Bytes, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use async_trait::async_trait;
use bon::Builder;
use tracing::{debug, info, Instrument};

use crate::contracts::erc20::Erc20Contract;
use crate::error::{Result, WalletError};
use crate::traits::{Account, ReceiptSummary};

/// How often and how long to poll for a transaction receipt.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const RECEIPT_POLL_ATTEMPTS: u32 = 60;

/// Production [`Account`] implementation over an alloy provider and signer.
///
/// The provider is expected to carry a wallet layer for the same key as
/// `signer` (e.g. `ProviderBuilder::new().wallet(signer.clone()).connect(..)`),
/// so `send_transaction` signs locally before submission. The signer itself is
/// used for message signing and as the source of the wallet address.
///
/// # Example
///
/// ```rust,no_run
/// use agent_wallet::providers::AlloyAccount;
/// use alloy_provider::ProviderBuilder;
/// use alloy_signer_local::PrivateKeySigner;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer: PrivateKeySigner =
///     "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".parse()?;
/// let provider = ProviderBuilder::new()
///     .wallet(signer.clone())
///     .connect("http://localhost:8545")
///     .await?;
///
/// let account = AlloyAccount::builder()
///     .provider(provider)
///     .signer(signer)
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone, Debug)]
pub struct AlloyAccount<P: Provider<Ethereum> + Clone, S: Signer + Send + Sync> {
    provider: P,
    signer: S,
}

impl<P: Provider<Ethereum> + Clone, S: Signer + Send + Sync> AlloyAccount<P, S> {
    /// Returns the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn submit(&self, request: TransactionRequest) -> Result<TxHash> {
        let pending = self.provider.send_transaction(request).await?;
        let tx_hash = *pending.tx_hash();

        info!(
            tx_hash = %tx_hash,
            event = "transaction_sent"
        );

        Ok(tx_hash)
    }
}

#[async_trait]
impl<P: Provider<Ethereum> + Clone, S: Signer + Send + Sync> Account for AlloyAccount<P, S> {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn native_balance(&self) -> Result<U256> {
        Ok(self.provider.get_balance(self.address()).await?)
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| WalletError::Signer(e.to_string()))?;

        Ok(hex::encode_prefixed(signature.as_bytes()))
    }

    async fn allowance(&self, token: Address, spender: Address) -> Result<U256> {
        Erc20Contract::new(token, self.provider.clone())
            .allowance(self.address(), spender)
            .await
            .map_err(|e| WalletError::Contract(e.to_string()))
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let request = Erc20Contract::new(token, self.provider.clone()).approve_transaction(
            self.address(),
            spender,
            amount,
        );
        self.submit(request).await
    }

    async fn send_transaction(&self, to: Address, data: Bytes, value: U256) -> Result<TxHash> {
        let request = TransactionRequest::default()
            .with_from(self.address())
            .with_to(to)
            .with_input(data)
            .with_value(value);
        self.submit(request).await
    }

    async fn wait_for_transaction_receipt(&self, tx_hash: TxHash) -> Result<ReceiptSummary> {
        let span = crate::spans::wait_for_receipt(tx_hash);
        async move {
            for attempt in 1..=RECEIPT_POLL_ATTEMPTS {
                if let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? {
                    let status = receipt.status();
                    debug!(
                        tx_hash = %tx_hash,
                        status = status,
                        attempt = attempt,
                        event = "receipt_retrieved"
                    );
                    return Ok(ReceiptSummary { tx_hash, status });
                }
                tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
            }

            Err(WalletError::Chain {
                reason: format!("timed out waiting for receipt of transaction {tx_hash}"),
            })
        }
        .instrument(span)
        .await
    }
}
