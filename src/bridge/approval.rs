//! ERC-20 approval management.
//!
//! Ensures the DlnSource contract may pull the give token before an order is
//! submitted. Approvals are granted for exactly the give amount, never
//! unlimited.

use alloy_primitives::{Address, U256};
use tracing::{debug, info, Instrument};

use crate::error::{Result, WalletError};
use crate::traits::{Account, ReceiptSummary};

/// Makes sure `spender` holds an allowance of at least `amount` for `token`.
///
/// Returns `None` when the existing allowance was already sufficient, or the
/// receipt of the approval transaction it submitted and waited for.
///
/// # Errors
///
/// Any failure — allowance read, submission, or a reverted approval — is a
/// `WalletError::Chain`, which the orchestrator treats as fatal for the
/// current bridge attempt.
pub async fn ensure_approval(
    account: &dyn Account,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<Option<ReceiptSummary>> {
    let span = crate::spans::ensure_approval(&token, &spender, &amount);
    async move {
        let owner = account.address();
        let allowance = account
            .allowance(token, spender)
            .await
            .map_err(as_chain_error)?;

        if allowance >= amount {
            debug!(
                owner = %owner,
                token = %token,
                spender = %spender,
                allowance = %allowance,
                event = "allowance_sufficient"
            );
            return Ok(None);
        }

        let tx_hash = account
            .approve(token, spender, amount)
            .await
            .map_err(as_chain_error)?;

        let receipt = account
            .wait_for_transaction_receipt(tx_hash)
            .await
            .map_err(as_chain_error)?;

        if !receipt.status {
            return Err(WalletError::Chain {
                reason: format!("approval transaction {tx_hash} reverted"),
            });
        }

        info!(
            token = %token,
            spender = %spender,
            amount = %amount,
            tx_hash = %tx_hash,
            event = "approval_confirmed"
        );

        Ok(Some(receipt))
    }
    .instrument(span)
    .await
}

fn as_chain_error(error: WalletError) -> WalletError {
    match error {
        chain @ WalletError::Chain { .. } => chain,
        other => WalletError::Chain {
            reason: other.to_string(),
        },
    }
}
