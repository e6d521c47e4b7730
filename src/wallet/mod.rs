//! The wallet facade and its built-in tools.
//!
//! [`AgentWallet`] binds a signing account to a tool registry and is the
//! surface an agent runtime drives: list the tools, hand their schemas to the
//! model, and route tool calls through [`AgentWallet::invoke`].

use std::sync::Arc;

use alloy_primitives::{
    utils::{format_ether, parse_ether},
    Address, Bytes,
};
use bon::bon;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::registry::{ToolDescriptor, ToolOutcome, ToolRegistry, ToolRegistryBuilder};
use crate::traits::Account;

/// Registered name of the message-signing tool.
pub const SIGN_MESSAGE_TOOL_NAME: &str = "wallet_sign_message";

/// Registered name of the native-transfer tool.
pub const NATIVE_TRANSFER_TOOL_NAME: &str = "wallet_native_transfer";

/// Registered name of the balance tool.
pub const BALANCE_TOOL_NAME: &str = "wallet_balance";

/// Arguments of the `wallet_sign_message` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageRequest {
    /// The message to sign with the user's wallet.
    pub message: String,
}

/// Arguments of the `wallet_native_transfer` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransferRequest {
    /// Recipient address.
    pub to: String,
    /// Amount of native currency in decimal units, e.g. "0.5".
    pub amount: String,
}

/// Arguments of the `wallet_balance` tool (none).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BalanceRequest {}

/// Registers the built-in wallet tools on a registry builder.
pub fn register_wallet_tools(builder: ToolRegistryBuilder) -> ToolRegistryBuilder {
    builder
        .register::<SignMessageRequest, _, _>(
            SIGN_MESSAGE_TOOL_NAME,
            "Sign an arbitrary message with the user's wallet and return the \
             signature hash.",
            |account, request| async move {
                if request.message.is_empty() {
                    return ToolOutcome::error("There is no message to sign");
                }
                match account.sign_message(&request.message).await {
                    Ok(signature) => {
                        ToolOutcome::ok(format!("Message signed. Signature: {signature}"))
                    }
                    Err(signing) => ToolOutcome::error(signing.to_string()),
                }
            },
        )
        .register::<NativeTransferRequest, _, _>(
            NATIVE_TRANSFER_TOOL_NAME,
            "Transfer the chain's native currency from the user's wallet to \
             another address.",
            |account, request| async move {
                let Ok(to) = request.to.parse::<Address>() else {
                    return ToolOutcome::error("Invalid recipient wallet address");
                };
                let Ok(value) = parse_ether(request.amount.trim()) else {
                    return ToolOutcome::error("Enter a valid amount to transfer");
                };

                let tx_hash = match account.send_transaction(to, Bytes::new(), value).await {
                    Ok(tx_hash) => tx_hash,
                    Err(send) => return ToolOutcome::error(send.to_string()),
                };
                match account.wait_for_transaction_receipt(tx_hash).await {
                    Ok(receipt) if receipt.status => {
                        info!(tx_hash = %tx_hash, event = "native_transfer_confirmed");
                        ToolOutcome::ok(format!(
                            "Transfer confirmed. Transaction hash: {tx_hash}"
                        ))
                    }
                    Ok(_) => ToolOutcome::error(format!("Transaction {tx_hash} reverted")),
                    Err(wait) => ToolOutcome::error(wait.to_string()),
                }
            },
        )
        .register::<BalanceRequest, _, _>(
            BALANCE_TOOL_NAME,
            "Get the wallet's address and its balance of the chain's native \
             currency.",
            |account, _request| async move {
                match account.native_balance().await {
                    Ok(balance) => ToolOutcome::ok(format!(
                        "Wallet {} holds {} of the native currency",
                        account.address(),
                        format_ether(balance)
                    )),
                    Err(read) => ToolOutcome::error(read.to_string()),
                }
            },
        )
}

/// A signing account bound to a tool registry.
///
/// # Example
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// use agent_wallet::providers::{DlnHttpClient, SystemClock};
/// use agent_wallet::{register_wallet_tools, AgentWallet, DlnBridge, ToolRegistry};
///
/// # fn example(account: Arc<dyn agent_wallet::Account>) {
/// let bridge = Arc::new(
///     DlnBridge::builder()
///         .api(DlnHttpClient::production())
///         .clock(SystemClock::new())
///         .build(),
/// );
///
/// let registry = bridge
///     .register_tools(register_wallet_tools(ToolRegistry::builder()))
///     .build();
///
/// let wallet = AgentWallet::builder()
///     .account(account)
///     .registry(registry)
///     .build();
///
/// for tool in wallet.tools() {
///     println!("{}: {}", tool.name(), tool.description());
/// }
/// # }
/// ```
pub struct AgentWallet {
    account: Arc<dyn Account>,
    registry: ToolRegistry,
}

#[bon]
impl AgentWallet {
    #[builder]
    pub fn new(account: Arc<dyn Account>, registry: ToolRegistry) -> Self {
        Self { account, registry }
    }
}

impl AgentWallet {
    /// The bound signing account.
    pub fn account(&self) -> &Arc<dyn Account> {
        &self.account
    }

    /// The underlying registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Iterates the available tools in name order.
    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.registry.iter()
    }

    /// Invokes a tool by name with JSON arguments.
    ///
    /// Unknown names and malformed arguments come back as failed outcomes;
    /// nothing panics across this boundary.
    pub async fn invoke(&self, name: &str, args: Value) -> ToolOutcome {
        match self.registry.get(name) {
            Some(tool) => tool.invoke(Arc::clone(&self.account), args).await,
            None => ToolOutcome::error(format!("Unknown tool: {name}")),
        }
    }
}
