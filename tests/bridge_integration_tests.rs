//! Integration tests for the DLN bridge state machine using fake
//! implementations
//!
//! These tests drive `DlnBridge` end-to-end across turns: token discovery,
//! the confirmation protocol with its expiry and abandonment windows, the
//! ERC-20 approval flow, and on-chain submission — all against fakes, with a
//! fake clock driving the deadlines deterministically.

use std::time::Duration;

use agent_wallet::testing::{quote_response, token_entry, FakeAccount, FakeClock, FakeDlnApi};
use agent_wallet::{chain::addresses::DLN_SOURCE_ADDRESS, BridgeRequest, Chain, DlnBridge};
use alloy_primitives::{address, Address, U256};

const SENDER: Address = address!("00000000000000000000000000000000000000aa");
const CAKE: Address = address!("0e09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82");
const SONIC_USDC: Address = address!("29219dd400f2Bf60E5a23d13Be72B486D4038894");

const GIVE_AMOUNT: u64 = 2_000_000_000_000_000_000; // 2 BNB
const FIX_FEE: u64 = 1_000_000_000_000_000; // 0.001 BNB

fn setup() -> (DlnBridge<FakeDlnApi, FakeClock>, FakeDlnApi, FakeClock, FakeAccount) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let api = FakeDlnApi::new();
    api.add_tokens(
        Chain::BnbChain,
        vec![
            token_entry("BNB", Address::ZERO, 18),
            token_entry("CAKE", CAKE, 18),
        ],
    );
    api.add_tokens(
        Chain::Sonic,
        vec![
            token_entry("S", Address::ZERO, 18),
            token_entry("USDC", SONIC_USDC, 6),
        ],
    );
    api.set_quote(quote_response(
        &token_entry("BNB", Address::ZERO, 18),
        U256::from(GIVE_AMOUNT),
        1196.4,
        &token_entry("USDC", SONIC_USDC, 6),
        U256::from(1_191_260_000u64),
        1191.26,
        0.96,
        U256::from(FIX_FEE),
        U256::from(GIVE_AMOUNT + FIX_FEE),
    ));

    let clock = FakeClock::new();
    let bridge = DlnBridge::builder()
        .api(api.clone())
        .clock(clock.clone())
        .build();
    let account = FakeAccount::new(SENDER);

    (bridge, api, clock, account)
}

fn request() -> BridgeRequest {
    BridgeRequest {
        source_chain: "bsc".to_string(),
        source_token: None,
        destination_chain: "sonic".to_string(),
        destination_token: Some("USDC".to_string()),
        recipient: None,
        amount: "2".to_string(),
        is_confirmed: false,
    }
}

fn confirmed() -> BridgeRequest {
    BridgeRequest {
        is_confirmed: true,
        ..request()
    }
}

#[tokio::test]
async fn test_full_happy_path_native_source() {
    let (bridge, api, _clock, account) = setup();

    // First turn: tokens resolve unambiguously, so the adapter falls through
    // to the confirmation summary with the recipient defaulted to the sender.
    let first = bridge.bridge_token(&account, request()).await;
    assert!(first.success, "{}", first.message);
    assert!(first.message.contains("Confirm the transaction details"));
    assert!(first.message.contains("2 BNB"));
    assert!(first.message.contains("1191.26 USDC"));
    assert!(first.message.contains(&SENDER.to_string()));
    assert!(first.message.contains("0.001 BNB + 0.96 USD"));
    assert_eq!(api.quote_calls(), 1);
    assert!(account.sent_transactions().is_empty());

    // Second turn: confirmed within the window. Native give token, so no
    // approval; the prepared transaction is submitted as quoted.
    let second = bridge.bridge_token(&account, confirmed()).await;
    assert!(second.success, "{}", second.message);
    assert!(second.message.contains("Transaction hash: 0x"));
    assert!(account.approvals().is_empty());

    let sent = account.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, DLN_SOURCE_ADDRESS);
    assert_eq!(sent[0].value, U256::from(GIVE_AMOUNT + FIX_FEE));

    // The confirmation and the submission quoted the same numbers.
    assert_eq!(api.quote_calls(), 1);

    // The session reset on completion; the next turn starts over.
    let third = bridge.bridge_token(&account, request()).await;
    assert!(third.message.contains("Confirm the transaction details"));
    assert_eq!(api.quote_calls(), 2);
}

#[tokio::test]
async fn test_confirmation_flag_is_scrubbed_outside_execution() {
    let (bridge, _api, _clock, account) = setup();

    // isConfirmed on the very first call must not skip the confirmation step.
    let outcome = bridge.bridge_token(&account, confirmed()).await;
    assert!(outcome.success);
    assert!(outcome.message.contains("Confirm the transaction details"));
    assert!(account.sent_transactions().is_empty());
    assert!(account.approvals().is_empty());
}

#[tokio::test]
async fn test_expiry_requotes_and_requires_fresh_confirmation() {
    let (bridge, api, clock, account) = setup();

    let first = bridge.bridge_token(&account, request()).await;
    assert!(first.message.contains("expires in 30 seconds"));
    assert_eq!(api.quote_calls(), 1);

    // The confirmation window lapses before the user answers. Even a
    // confirmed call must now re-quote and re-confirm.
    clock.advance(Duration::from_secs(31));
    let second = bridge.bridge_token(&account, confirmed()).await;
    assert!(second.success);
    assert!(
        second.message.starts_with("Your previous quote expired."),
        "{}",
        second.message
    );
    assert_eq!(api.quote_calls(), 2);
    assert!(account.sent_transactions().is_empty());

    // Confirming within the fresh window executes.
    let third = bridge.bridge_token(&account, confirmed()).await;
    assert!(third.message.contains("Transaction hash: 0x"));
    assert_eq!(api.quote_calls(), 2);
    assert_eq!(account.sent_transactions().len(), 1);
}

#[tokio::test]
async fn test_abandonment_cancels_the_session() {
    let (bridge, _api, clock, account) = setup();

    let first = bridge.bridge_token(&account, request()).await;
    assert!(first.message.contains("Confirm the transaction details"));

    clock.advance(Duration::from_secs(301));
    let second = bridge.bridge_token(&account, confirmed()).await;
    assert!(second.message.contains("cancelled due to inactivity"));
    assert!(account.sent_transactions().is_empty());

    // The session reset; the next turn starts a fresh flow.
    let third = bridge.bridge_token(&account, request()).await;
    assert!(third.message.contains("Confirm the transaction details"));
}

#[tokio::test]
async fn test_user_cancellation_resets_the_session() {
    let (bridge, _api, _clock, account) = setup();

    let first = bridge.bridge_token(&account, request()).await;
    assert!(first.message.contains("Confirm the transaction details"));

    // Declining while a confirmation is pending cancels immediately.
    let second = bridge.bridge_token(&account, request()).await;
    assert!(second.success);
    assert!(second.message.contains("cancelled"));
    assert!(account.sent_transactions().is_empty());

    let third = bridge.bridge_token(&account, request()).await;
    assert!(third.message.contains("Confirm the transaction details"));
}

#[tokio::test]
async fn test_validation_ordering_source_chain_error_wins() {
    let (bridge, _api, _clock, account) = setup();

    let mut bad = request();
    bad.source_chain = "dogechain".to_string();
    bad.recipient = Some("not-an-address".to_string());

    let outcome = bridge.bridge_token(&account, bad).await;
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Unsupported source chain provided: dogechain"
    );

    // Validation failures leave the session untouched; a corrected request
    // proceeds normally.
    let retry = bridge.bridge_token(&account, request()).await;
    assert!(retry.message.contains("Confirm the transaction details"));
}

#[tokio::test]
async fn test_erc20_source_runs_the_approval_flow() {
    let (bridge, api, _clock, account) = setup();

    let give_amount = U256::from(1_000_000_000_000_000_000u64); // 1 CAKE
    api.set_quote(quote_response(
        &token_entry("CAKE", CAKE, 18),
        give_amount,
        2.31,
        &token_entry("USDC", SONIC_USDC, 6),
        U256::from(2_250_000u64),
        2.25,
        0.04,
        U256::from(FIX_FEE),
        U256::from(FIX_FEE),
    ));

    let mut erc20_request = request();
    erc20_request.source_token = Some("CAKE".to_string());
    erc20_request.amount = "1".to_string();

    let first = bridge.bridge_token(&account, erc20_request.clone()).await;
    assert!(first.message.contains("Confirm the transaction details"));

    erc20_request.is_confirmed = true;
    let second = bridge.bridge_token(&account, erc20_request).await;
    assert!(second.success, "{}", second.message);
    assert!(second.message.contains("Transaction hash: 0x"));

    // The allowance was zero, so an approval for exactly the give amount
    // went to the DlnSource contract before the order submission.
    assert_eq!(
        account.approvals(),
        vec![(CAKE, DLN_SOURCE_ADDRESS, give_amount)]
    );
    let sent = account.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value, U256::from(FIX_FEE));
}

#[tokio::test]
async fn test_ambiguous_destination_symbol_lists_tokens() {
    let (bridge, api, _clock, account) = setup();
    let bridged_usdc = address!("1570200000000000000000000000000000000001");
    api.add_tokens(
        Chain::Sonic,
        vec![
            token_entry("S", Address::ZERO, 18),
            token_entry("USDC", SONIC_USDC, 6),
            token_entry("USDC", bridged_usdc, 6),
        ],
    );

    // Two USDC entries: the adapter asks the user to pick from a listing.
    let first = bridge.bridge_token(&account, request()).await;
    assert!(first.success);
    assert!(first.message.contains("Select the source and destination tokens"));
    assert!(first.message.contains(&SONIC_USDC.to_string()));
    assert!(first.message.contains(&bridged_usdc.to_string()));
    assert_eq!(api.quote_calls(), 0);

    // Picking an explicit address proceeds to confirmation, then execution.
    let mut picked = request();
    picked.destination_token = Some(SONIC_USDC.to_string());
    let second = bridge.bridge_token(&account, picked.clone()).await;
    assert!(second.message.contains("Confirm the transaction details"));

    picked.is_confirmed = true;
    let third = bridge.bridge_token(&account, picked).await;
    assert!(third.message.contains("Transaction hash: 0x"));
}

#[tokio::test]
async fn test_quote_failure_resets_the_session() {
    let (bridge, api, _clock, account) = setup();
    api.set_quote_failure(true);

    let outcome = bridge.bridge_token(&account, request()).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("Quote failed"));

    // Retrying after the upstream recovers starts clean and succeeds.
    api.set_quote_failure(false);
    let retry = bridge.bridge_token(&account, request()).await;
    assert!(retry.message.contains("Confirm the transaction details"));
}

#[tokio::test]
async fn test_token_fetch_timeout_is_retryable() {
    let (bridge, api, _clock, account) = setup();
    api.set_token_list_failure(true);

    let outcome = bridge.bridge_token(&account, request()).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("timed out"));

    api.set_token_list_failure(false);
    let retry = bridge.bridge_token(&account, request()).await;
    assert!(retry.success, "{}", retry.message);
    assert!(retry.message.contains("Confirm the transaction details"));
}

#[tokio::test]
async fn test_submission_failure_resets_the_session() {
    let (bridge, api, _clock, account) = setup();

    let first = bridge.bridge_token(&account, request()).await;
    assert!(first.message.contains("Confirm the transaction details"));

    account.fail_sends();
    let second = bridge.bridge_token(&account, confirmed()).await;
    assert!(!second.success);
    assert!(second.message.contains("Chain interaction failed"));

    // Fatal chain errors reset unconditionally: the next turn re-quotes from
    // the start instead of retrying the dead attempt.
    let third = bridge.bridge_token(&account, request()).await;
    assert!(third.message.contains("Confirm the transaction details"));
    assert_eq!(api.quote_calls(), 2);
}

#[tokio::test]
async fn test_changed_amount_after_confirmation_requotes() {
    let (bridge, api, _clock, account) = setup();

    let first = bridge.bridge_token(&account, request()).await;
    assert!(first.message.contains("Confirm the transaction details"));
    assert_eq!(api.quote_calls(), 1);

    // Confirming different numbers than were shown must not execute; the
    // adapter re-quotes and asks again.
    let mut changed = confirmed();
    changed.amount = "3".to_string();
    let second = bridge.bridge_token(&account, changed).await;
    assert!(second.message.contains("Confirm the transaction details"));
    assert!(account.sent_transactions().is_empty());
    assert_eq!(api.quote_calls(), 2);

    let query = api.last_query().expect("a fresh quote was requested");
    assert_eq!(
        query.src_chain_token_in_amount,
        U256::from(3_000_000_000_000_000_000u64)
    );
}

#[tokio::test]
async fn test_quote_query_carries_route_and_affiliate_parameters() {
    let (bridge, api, _clock, account) = setup();

    let recipient = address!("00000000000000000000000000000000000000bb");
    let mut routed = request();
    routed.recipient = Some(recipient.to_string());
    bridge.bridge_token(&account, routed).await;

    let query = api.last_query().expect("quote was requested");
    assert_eq!(query.src_chain_id, 56);
    assert_eq!(query.dst_chain_id, 100000014);
    assert_eq!(query.src_chain_token_in, Address::ZERO);
    assert_eq!(query.dst_chain_token_out, SONIC_USDC);
    assert_eq!(query.src_chain_order_authority_address, SENDER);
    assert_eq!(query.dst_chain_order_authority_address, recipient);
    assert_eq!(query.dst_chain_token_out_recipient, recipient);
    assert_eq!(query.affiliate_fee_percent, 0.5);
    assert_eq!(query.referral_code, 31565);
}

#[tokio::test]
async fn test_sessions_are_isolated_between_callers() {
    let (bridge, _api, _clock, alice) = setup();
    let bob = FakeAccount::new(address!("00000000000000000000000000000000000000bb"));

    let first = bridge.bridge_token(&alice, request()).await;
    assert!(first.message.contains("Confirm the transaction details"));

    // Bob's confirmed first call lands in his own fresh session, so the flag
    // is scrubbed; Alice's pending confirmation is untouched.
    let outcome = bridge.bridge_token(&bob, confirmed()).await;
    assert!(outcome.message.contains("Confirm the transaction details"));
    assert!(bob.sent_transactions().is_empty());

    let second = bridge.bridge_token(&alice, confirmed()).await;
    assert!(second.message.contains("Transaction hash: 0x"));
    assert_eq!(alice.sent_transactions().len(), 1);
}
