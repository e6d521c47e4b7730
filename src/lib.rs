//! # agent-wallet
//!
//! An agent tool-calling SDK for EVM wallets.
//!
//! This library exposes wallet operations — cross-chain token bridging over
//! deBridge DLN, message signing, native transfers — as JSON-schema-described
//! tools an LLM runtime can invoke. The bridge adapter drives a multi-turn
//! confirmation protocol: the agent re-invokes one operation per user turn
//! while the adapter tracks per-caller sessions, quote expiry, and
//! abandonment.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use agent_wallet::providers::{AlloyAccount, DlnHttpClient, SystemClock};
//! use agent_wallet::{register_wallet_tools, AgentWallet, DlnBridge, ToolRegistry};
//! use alloy_provider::ProviderBuilder;
//! use alloy_signer_local::PrivateKeySigner;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let signer: PrivateKeySigner =
//!     "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".parse()?;
//! let provider = ProviderBuilder::new()
//!     .wallet(signer.clone())
//!     .connect("http://localhost:8545")
//!     .await?;
//! let account = Arc::new(
//!     AlloyAccount::builder()
//!         .provider(provider)
//!         .signer(signer)
//!         .build(),
//! );
//!
//! // Build the tool table once at startup.
//! let bridge = Arc::new(
//!     DlnBridge::builder()
//!         .api(DlnHttpClient::production())
//!         .clock(SystemClock::new())
//!         .build(),
//! );
//! let registry = bridge
//!     .register_tools(register_wallet_tools(ToolRegistry::builder()))
//!     .build();
//!
//! let wallet = AgentWallet::builder()
//!     .account(account)
//!     .registry(registry)
//!     .build();
//!
//! // Hand the schemas to the agent runtime, route its tool calls back in.
//! for tool in wallet.tools() {
//!     println!("{}: {}", tool.name(), tool.description());
//! }
//! let outcome = wallet
//!     .invoke(
//!         "dln_bridge_token",
//!         serde_json::json!({
//!             "sourceChain": "bsc",
//!             "destinationChain": "sonic",
//!             "destinationToken": "USDC",
//!             "amount": "2",
//!         }),
//!     )
//!     .await;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Multi-turn bridge state machine** with lazy expiry and abandonment
//!   deadlines, per-caller sessions, and a confirmation-scrub rule that
//!   prevents stale `isConfirmed` flags from skipping confirmation
//! - **Explicit tool registry**: argument structs derive their JSON schema,
//!   and the same type validates incoming arguments
//! - **Trait seams** for the wallet, the DLN API, and time, with fakes in
//!   [`testing`] for deterministic tests
//!
//! ## Public API
//!
//! - [`AgentWallet`], [`ToolRegistry`], [`ToolDescriptor`], [`ToolOutcome`] -
//!   the tool surface
//! - [`DlnBridge`], [`BridgeRequest`], [`BridgeConfig`] - the bridge adapter
//! - [`Account`], [`DlnApi`], [`Clock`] - collaborator traits, with
//!   production implementations in [`providers`]
//! - [`Chain`] and [`chain::addresses`] - chain tables
//! - [`WalletError`] and [`Result`] - error handling

mod bridge;
mod error;
mod registry;
mod wallet;

pub mod chain;
pub mod contracts;
pub mod protocol;
pub mod providers;
pub mod testing;
pub mod traits;

pub use bridge::{
    ensure_approval, validate, BridgeConfig, BridgeRequest, BridgeSession, ChainRouteInfo,
    DlnBridge, FeeBreakdown, Phase, PreparedTransaction, Resolution, SessionStore, TokenDirectory,
    TokenRecord, BRIDGE_TOOL_NAME, DLN_API,
};
pub use chain::Chain;
pub use contracts::erc20::Erc20Contract;
pub use error::{Result, WalletError};
pub use registry::{ToolDescriptor, ToolOutcome, ToolRegistry, ToolRegistryBuilder};
pub use traits::{Account, Clock, DlnApi, ReceiptSummary};
pub use wallet::{
    register_wallet_tools, AgentWallet, BalanceRequest, NativeTransferRequest, SignMessageRequest,
    BALANCE_TOOL_NAME, NATIVE_TRANSFER_TOOL_NAME, SIGN_MESSAGE_TOOL_NAME,
};

// Public module for advanced users who need custom instrumentation
pub mod spans;
