//! The DLN bridge adapter.
//!
//! One agent-callable operation, `bridge_token`, drives a per-caller state
//! machine across turns: token discovery, a confirmation step with an expiry
//! window, and on-chain order submission. The calling agent re-invokes the
//! operation once per user turn and keeps no state of its own; everything
//! durable lives in the [`SessionStore`].

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use bon::bon;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, Instrument};

use super::approval::ensure_approval;
use super::config::BridgeConfig;
use super::directory::{TokenDirectory, TokenRecord};
use super::prepare::{prepare, resolve_token, PreparedTransaction, QuoteFingerprint, Resolution};
use super::session::{Phase, SessionStore};
use super::validate::{validate, ChainRouteInfo};
use crate::chain::addresses::DLN_SOURCE_ADDRESS;
use crate::registry::{ToolOutcome, ToolRegistryBuilder};
use crate::spans;
use crate::traits::{Account, Clock, DlnApi};

/// Registered name of the bridge operation.
pub const BRIDGE_TOOL_NAME: &str = "dln_bridge_token";

const MSG_CANCELLED_INACTIVITY: &str =
    "Bridge request cancelled due to inactivity. Start again when you are ready.";
const MSG_CANCELLED_BY_USER: &str = "Bridge transaction cancelled. No order was submitted.";

/// Arguments of the `dln_bridge_token` tool.
///
/// Field descriptions are part of the JSON schema handed to the agent
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    /// Name of the chain the tokens are bridged from, e.g. "bsc".
    pub source_chain: String,
    /// Token to send: a contract address or a symbol. Leave unset to bridge
    /// the chain's native asset.
    #[serde(default)]
    pub source_token: Option<String>,
    /// Name of the chain the tokens are bridged to, e.g. "sonic".
    pub destination_chain: String,
    /// Token to receive: a contract address or a symbol. Leave unset for the
    /// destination chain's native asset.
    #[serde(default)]
    pub destination_token: Option<String>,
    /// Recipient address on the destination chain. Leave unset to send to the
    /// caller's own address.
    #[serde(default)]
    pub recipient: Option<String>,
    /// Amount of tokens in decimal format, e.g. "2" or "0.5".
    pub amount: String,
    /// Set to true only after the user has explicitly confirmed the quoted
    /// transaction details.
    #[serde(default)]
    pub is_confirmed: bool,
}

/// Cross-chain token bridge adapter over deBridge DLN.
///
/// The adapter owns a shared token directory and a session store; the signing
/// wallet is passed per call, so one adapter instance serves any number of
/// callers with isolated sessions.
///
/// # Example
///
/// ```rust,no_run
/// use agent_wallet::providers::{DlnHttpClient, SystemClock};
/// use agent_wallet::{BridgeConfig, DlnBridge};
///
/// let bridge = DlnBridge::builder()
///     .api(DlnHttpClient::production())
///     .clock(SystemClock::new())
///     .config(BridgeConfig::default())
///     .build();
/// ```
pub struct DlnBridge<A: DlnApi, C: Clock> {
    api: A,
    clock: C,
    config: BridgeConfig,
    directory: TokenDirectory,
    sessions: SessionStore,
}

#[bon]
impl<A: DlnApi, C: Clock> DlnBridge<A, C> {
    #[builder]
    pub fn new(api: A, clock: C, #[builder(default)] config: BridgeConfig) -> Self {
        let directory = TokenDirectory::new(config.token_cache_capacity, config.token_cache_ttl);
        Self {
            api,
            clock,
            config,
            directory,
            sessions: SessionStore::default(),
        }
    }
}

impl<A: DlnApi, C: Clock> DlnBridge<A, C> {
    /// Returns the adapter configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Runs one turn of the bridge conversation for `account`.
    ///
    /// Transition rules, evaluated in order:
    ///
    /// 1. An abandoned session reports the cancellation and resets.
    /// 2. A lapsed confirmation window demotes the session to re-confirmation
    ///    with fresh numbers.
    /// 3. An unconfirmed call while a confirmation is pending cancels.
    /// 4. A confirmation flag sent before any confirmation was shown is
    ///    ignored.
    /// 5. Unset recipients default to the caller.
    /// 6. Validation and token discovery run on every turn; the first turn
    ///    arms the abandonment window and may return a token listing.
    /// 7. The quote is reused while the request is unchanged, otherwise
    ///    refreshed.
    /// 8. The confirmation summary is shown once, then the confirmed call
    ///    approves (for ERC-20 give tokens) and submits the order.
    ///
    /// All failures surface as a `ToolOutcome` with `success == false`; no
    /// error crosses this boundary.
    pub async fn bridge_token(&self, account: &dyn Account, request: BridgeRequest) -> ToolOutcome {
        let span = spans::bridge_turn(
            &request.source_chain,
            &request.destination_chain,
            account.address(),
        );
        self.run_turn(account, request).instrument(span).await
    }

    async fn run_turn(&self, account: &dyn Account, request: BridgeRequest) -> ToolOutcome {
        let sender = account.address();
        let mut request = request;
        let now = self.clock.now();
        let mut session = self.sessions.load(sender);

        if session.abandoned(now) {
            info!(caller = %sender, event = "session_abandoned");
            self.sessions.reset(sender);
            return ToolOutcome::ok(MSG_CANCELLED_INACTIVITY);
        }

        if session.phase == Phase::Execution && session.expiry_elapsed(now) {
            debug!(caller = %sender, event = "confirmation_expired");
            session.phase = Phase::Confirmation;
            session.expired = true;
            session.prepared = None;
            session.expires_at = None;
        }

        if session.phase == Phase::Execution && !request.is_confirmed {
            info!(caller = %sender, event = "bridge_cancelled_by_user");
            self.sessions.reset(sender);
            return ToolOutcome::ok(MSG_CANCELLED_BY_USER);
        }

        // A confirmation flag is only meaningful while a confirmation has
        // actually been shown; anywhere else it is untrusted input.
        if request.is_confirmed && session.phase != Phase::Execution {
            debug!(caller = %sender, event = "stray_confirmation_scrubbed");
            request.is_confirmed = false;
        }

        if recipient_unset(&request) {
            request.recipient = Some(sender.to_string());
        }

        let route = match validate(&request, &self.config) {
            Ok(route) => route,
            Err(validation) => {
                self.sessions.put(sender, session);
                return ToolOutcome::error(validation.to_string());
            }
        };

        // Token discovery is cache-backed and re-run on every call, so the
        // machine can be re-entered after any failure without stale tokens.
        let src_tokens = match self
            .directory
            .get_tokens(&self.api, route.src_chain, now)
            .await
        {
            Ok(tokens) => tokens,
            Err(fetch) => {
                self.sessions.put(sender, session);
                return ToolOutcome::error(fetch.to_string());
            }
        };
        let dst_tokens = match self
            .directory
            .get_tokens(&self.api, route.dst_chain, now)
            .await
        {
            Ok(tokens) => tokens,
            Err(fetch) => {
                self.sessions.put(sender, session);
                return ToolOutcome::error(fetch.to_string());
            }
        };

        let resolved = (
            resolve_token(&src_tokens, request.source_token.as_deref()),
            resolve_token(&dst_tokens, request.destination_token.as_deref()),
        );
        let (give, take) = match resolved {
            (Ok(Resolution::Token(give)), Ok(Resolution::Token(take))) => (give, take),
            (Err(lookup), _) | (_, Err(lookup)) => {
                self.sessions.put(sender, session);
                return ToolOutcome::error(lookup.to_string());
            }
            _ => {
                if session.phase == Phase::Initial {
                    session.abandon_at = Some(now + self.config.abandonment_window);
                } else {
                    // A pending quote no longer matches an ambiguous request.
                    session.prepared = None;
                    session.expires_at = None;
                }
                session.phase = Phase::Confirmation;
                self.sessions.put(sender, session);
                return ToolOutcome::ok(listing_message(
                    &route,
                    &src_tokens,
                    &dst_tokens,
                    self.config.listing_limit,
                ));
            }
        };

        if session.phase == Phase::Initial {
            session.phase = Phase::Confirmation;
            session.abandon_at = Some(now + self.config.abandonment_window);
        }

        let fingerprint =
            QuoteFingerprint::new(give.address, take.address, &request.amount, route.recipient);

        // A confirmation only covers the numbers that were shown. If the
        // request changed underneath it, quote fresh and re-confirm.
        if session.phase == Phase::Execution
            && !session
                .prepared
                .as_ref()
                .is_some_and(|prepared| prepared.fingerprint == fingerprint)
        {
            debug!(caller = %sender, event = "request_changed_after_confirmation");
            session.phase = Phase::Confirmation;
            session.prepared = None;
            request.is_confirmed = false;
        }

        let prepared = match session
            .prepared
            .as_ref()
            .filter(|prepared| prepared.fingerprint == fingerprint)
        {
            Some(prepared) => prepared.clone(),
            None => {
                match prepare(
                    &self.api,
                    &self.config,
                    &route,
                    give,
                    take,
                    &request.amount,
                    sender,
                )
                .await
                {
                    Ok(prepared) => {
                        session.prepared = Some(prepared.clone());
                        prepared
                    }
                    Err(quote) => {
                        spans::record_error(&quote);
                        error!(error = %quote, event = "order_preparation_failed");
                        self.sessions.reset(sender);
                        return ToolOutcome::error(quote.to_string());
                    }
                }
            }
        };

        if session.phase == Phase::Confirmation && (session.expired || !request.is_confirmed) {
            let was_expired = session.expired;
            session.expired = false;
            session.phase = Phase::Execution;
            // Replaces any previous window; only one expiry deadline is live.
            session.expires_at = Some(now + self.config.expiry_window);
            self.sessions.put(sender, session);
            return ToolOutcome::ok(confirmation_message(
                &request,
                &route,
                &prepared,
                was_expired,
                self.config.expiry_window,
            ));
        }

        // Confirmed within the window: disarm deadlines and execute.
        session.expires_at = None;
        session.abandon_at = None;

        if prepared.give_token.address != Address::ZERO {
            if let Err(approval) = ensure_approval(
                account,
                prepared.give_token.address,
                DLN_SOURCE_ADDRESS,
                prepared.give_amount,
            )
            .await
            {
                spans::record_error(&approval);
                error!(error = %approval, event = "approval_failed");
                self.sessions.reset(sender);
                return ToolOutcome::error(approval.to_string());
            }
        }

        let submit_span = spans::submit_order(&prepared.to, &prepared.value, &route.src_chain);
        match account
            .send_transaction(prepared.to, prepared.data.clone(), prepared.value)
            .instrument(submit_span)
            .await
        {
            Ok(tx_hash) => {
                info!(
                    tx_hash = %tx_hash,
                    give_amount = %prepared.give_amount,
                    event = "bridge_order_submitted"
                );
                self.sessions.reset(sender);
                ToolOutcome::ok(format!(
                    "Bridge order submitted successfully. Transaction hash: {tx_hash}"
                ))
            }
            Err(submission) => {
                spans::record_error(&submission);
                error!(error = %submission, event = "bridge_submission_failed");
                self.sessions.reset(sender);
                ToolOutcome::error(submission.to_string())
            }
        }
    }
}

impl<A: DlnApi + 'static, C: Clock + 'static> DlnBridge<A, C> {
    /// Registers the adapter's tools on a registry builder.
    ///
    /// The adapter is shared with the registered handler; clone the `Arc`
    /// first if you also want to keep direct access to it.
    pub fn register_tools(self: Arc<Self>, builder: ToolRegistryBuilder) -> ToolRegistryBuilder {
        builder.register::<BridgeRequest, _, _>(
            BRIDGE_TOOL_NAME,
            "Bridge a token from one network chain to another. Walks the user \
             through token selection and a confirmation of the quoted amounts \
             and fees before submitting the order on-chain.",
            move |account, request| {
                let bridge = Arc::clone(&self);
                async move { bridge.bridge_token(account.as_ref(), request).await }
            },
        )
    }
}

fn recipient_unset(request: &BridgeRequest) -> bool {
    match request.recipient.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(value) => value
            .parse::<Address>()
            .map(|address| address == Address::ZERO)
            .unwrap_or(false),
    }
}

fn format_token_lines(tokens: &[TokenRecord], limit: usize) -> String {
    tokens
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, token)| format!("{}. {} - {}", index + 1, token.symbol, token.address))
        .collect::<Vec<_>>()
        .join("\n")
}

fn listing_message(
    route: &ChainRouteInfo,
    src_tokens: &[TokenRecord],
    dst_tokens: &[TokenRecord],
    limit: usize,
) -> String {
    format!(
        "Select the source and destination tokens to bridge from the lists below.\n\n\
         Source tokens ({src_chain}):\n{src_list}\n\n\
         Destination tokens ({dst_chain}):\n{dst_list}\n\n\
         If the token you want to bridge isn't listed, provide its contract address.",
        src_chain = route.src_chain,
        src_list = format_token_lines(src_tokens, limit),
        dst_chain = route.dst_chain,
        dst_list = format_token_lines(dst_tokens, limit),
    )
}

fn confirmation_message(
    request: &BridgeRequest,
    route: &ChainRouteInfo,
    prepared: &PreparedTransaction,
    was_expired: bool,
    expiry_window: Duration,
) -> String {
    let notice = if was_expired {
        "Your previous quote expired. Review and confirm the updated transaction details.\n\n"
            .to_string()
    } else {
        String::new()
    };
    let footer = if was_expired {
        String::new()
    } else {
        format!(
            "\n\nNote: this quote expires in {} seconds if not confirmed.",
            expiry_window.as_secs()
        )
    };

    format!(
        "{notice}Confirm the transaction details below to proceed with bridging.\n\n\
         Send:\n\
         - Amount: {amount} {give_symbol}\n\
         - USD value: {amount_usd:.2} USD\n\
         - Token: {give_address}\n\
         - Network: {src_chain}\n\
         Receive:\n\
         - Amount: {take_amount} {take_symbol}\n\
         - USD value: {take_usd:.2} USD\n\
         - Token: {take_address}\n\
         - Recipient: {recipient}\n\
         - Network: {dst_chain}\n\
         Fees:\n\
         - Protocol fee: {fixed_fee} {native_symbol} + {protocol_fee_usd} USD{footer}",
        amount = request.amount.trim(),
        give_symbol = prepared.give_token.symbol,
        amount_usd = prepared.amount_usd,
        give_address = prepared.give_token.address,
        src_chain = route.src_chain,
        take_amount = prepared.take_amount_decimal,
        take_symbol = prepared.take_token.symbol,
        take_usd = prepared.take_value_usd,
        take_address = prepared.take_token.address,
        recipient = route.recipient,
        dst_chain = route.dst_chain,
        fixed_fee = prepared.fees.fixed_fee_native,
        native_symbol = prepared.fees.native_symbol,
        protocol_fee_usd = prepared.fees.protocol_fee_usd,
    )
}
