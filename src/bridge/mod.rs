//! Cross-chain bridge adapter over deBridge DLN.
//!
//! This module provides the multi-turn bridge state machine and its
//! supporting components: the token directory cache, the chain/route
//! validator, the quote preparer, and the approval manager.

mod adapter;
mod approval;
mod config;
mod directory;
mod prepare;
mod session;
mod validate;

pub use adapter::{BridgeRequest, DlnBridge, BRIDGE_TOOL_NAME};
pub use approval::ensure_approval;
pub use config::{BridgeConfig, AFFILIATE_ADDRESS_ENV, DLN_API, REFERRAL_CODE_ENV};
pub use directory::{TokenDirectory, TokenRecord};
pub use prepare::{FeeBreakdown, PreparedTransaction, Resolution};
pub use session::{BridgeSession, Phase, SessionStore};
pub use validate::{validate, ChainRouteInfo};
