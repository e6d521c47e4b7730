//! Token resolution and quote/transaction preparation.
//!
//! Turns a validated request plus directory snapshots into a ready-to-sign
//! order-creation transaction with a fee breakdown and human-readable
//! amounts. Preparation issues exactly one quote call and has no side
//! effects, so calling it twice with identical inputs yields equivalent
//! output modulo upstream price drift.

use alloy_primitives::{
    utils::{format_ether, format_units, parse_units},
    Address, Bytes, U256,
};
use tracing::info;

use super::config::BridgeConfig;
use super::directory::TokenRecord;
use super::validate::ChainRouteInfo;
use crate::error::{Result, WalletError};
use crate::protocol::{OrderQuoteQuery, DLN_PROTOCOL_FEE_KIND};
use crate::traits::DlnApi;

/// Outcome of resolving a token reference against a directory snapshot.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Exactly one token matched.
    Token(TokenRecord),
    /// The reference was a symbol matching several tokens; the caller should
    /// present a selection listing.
    Ambiguous(Vec<TokenRecord>),
}

/// Resolves a token reference (contract address, symbol, or unset for the
/// chain's native asset) against a directory snapshot.
///
/// # Errors
///
/// Returns `WalletError::TokenNotFound` when nothing in the snapshot matches.
pub fn resolve_token(tokens: &[TokenRecord], reference: Option<&str>) -> Result<Resolution> {
    let reference = reference.map(str::trim).filter(|r| !r.is_empty());

    let Some(reference) = reference else {
        // Unset means the native asset, listed under the zero address.
        return find_by_address(tokens, Address::ZERO, "native token");
    };

    if let Ok(address) = reference.parse::<Address>() {
        return find_by_address(tokens, address, reference);
    }

    let symbol = reference.to_uppercase();
    let matches: Vec<TokenRecord> = tokens
        .iter()
        .filter(|token| token.symbol == symbol)
        .cloned()
        .collect();

    match matches.len() {
        0 => Err(WalletError::TokenNotFound {
            reference: reference.to_string(),
        }),
        1 => Ok(Resolution::Token(matches.into_iter().next().expect("one match"))),
        _ => Ok(Resolution::Ambiguous(matches)),
    }
}

fn find_by_address(
    tokens: &[TokenRecord],
    address: Address,
    reference: &str,
) -> Result<Resolution> {
    tokens
        .iter()
        .find(|token| token.address == address)
        .cloned()
        .map(Resolution::Token)
        .ok_or_else(|| WalletError::TokenNotFound {
            reference: reference.to_string(),
        })
}

/// Inputs a prepared transaction was quoted for. The orchestrator reuses a
/// cached transaction only while the fingerprint of the incoming request
/// still matches, so edited amounts or tokens always re-quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteFingerprint {
    give_token: Address,
    take_token: Address,
    amount: String,
    recipient: Address,
}

impl QuoteFingerprint {
    pub fn new(give_token: Address, take_token: Address, amount: &str, recipient: Address) -> Self {
        Self {
            give_token,
            take_token,
            amount: amount.trim().to_string(),
            recipient,
        }
    }
}

/// Fee breakdown of a quoted order, pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// Fixed native fee in whole units of the give chain's native currency.
    pub fixed_fee_native: String,
    /// DLN protocol fee estimate in USD, two decimal places.
    pub protocol_fee_usd: String,
    /// Symbol of the give chain's native currency.
    pub native_symbol: &'static str,
}

/// A quoted, ready-to-sign order-creation transaction.
///
/// Created from a fresh quote, cached in the session for the lifetime of one
/// confirmation window, and regenerated on expiry or whenever the request
/// fingerprint changes.
#[derive(Debug, Clone)]
pub struct PreparedTransaction {
    /// Contract to call (DlnSource on the give chain).
    pub to: Address,
    /// Raw call data from the quote service.
    pub data: Bytes,
    /// Native value to attach (give amount for native tokens, plus the fixed
    /// fee).
    pub value: U256,
    pub give_token: TokenRecord,
    pub take_token: TokenRecord,
    /// Give amount in base units of the give token.
    pub give_amount: U256,
    /// Recommended take amount in base units of the take token.
    pub take_amount: U256,
    /// USD estimate of the give leg.
    pub amount_usd: f64,
    /// USD estimate of the take leg.
    pub take_value_usd: f64,
    /// Recommended take amount in whole units, for display.
    pub take_amount_decimal: String,
    pub fees: FeeBreakdown,
    pub(crate) fingerprint: QuoteFingerprint,
}

/// Builds the order query, issues one quote call, and shapes the response.
///
/// # Errors
///
/// - `WalletError::Validation` when the amount does not scale to the give
///   token's precision.
/// - `WalletError::Quote` when the upstream response is malformed (e.g. the
///   protocol-fee entry is missing).
/// - Transport errors from the quote call itself.
pub async fn prepare<A: DlnApi + ?Sized>(
    api: &A,
    config: &BridgeConfig,
    route: &ChainRouteInfo,
    give_token: TokenRecord,
    take_token: TokenRecord,
    amount: &str,
    sender: Address,
) -> Result<PreparedTransaction> {
    let give_amount: U256 = parse_units(amount.trim(), give_token.decimals)
        .map_err(|_| WalletError::Validation("Enter a valid token amount to bridge".to_string()))?
        .get_absolute();

    let query = OrderQuoteQuery {
        src_chain_id: route.src_chain.dln_chain_id(),
        src_chain_token_in: give_token.address,
        src_chain_token_in_amount: give_amount,
        dst_chain_id: route.dst_chain.dln_chain_id(),
        dst_chain_token_out: take_token.address,
        src_chain_order_authority_address: sender,
        dst_chain_order_authority_address: route.recipient,
        dst_chain_token_out_recipient: route.recipient,
        affiliate_fee_percent: config.affiliate_fee_percent,
        affiliate_fee_recipient: config.affiliate_fee_recipient,
        referral_code: route.referral_code,
    };

    let response = api.create_order_tx(&query).await?;

    let estimation = &response.estimation;
    let protocol_fee_usd = estimation
        .costs_details
        .iter()
        .find(|cost| cost.kind == DLN_PROTOCOL_FEE_KIND)
        .and_then(|cost| cost.payload.as_ref())
        .and_then(|payload| payload.fee_approximate_usd_value)
        .ok_or_else(|| WalletError::Quote {
            reason: "quote response is missing the protocol fee entry".to_string(),
        })?;

    let take_amount = estimation.dst_chain_token_out.recommended_amount;
    let take_amount_decimal = format_units(take_amount, take_token.decimals)
        .map(|formatted| trim_decimal(&formatted))
        .map_err(|e| WalletError::Quote {
            reason: format!("quote response take amount does not format: {e}"),
        })?;

    let prepared = PreparedTransaction {
        to: response.tx.to,
        data: response.tx.data,
        value: response.tx.value,
        give_amount,
        take_amount,
        amount_usd: estimation.src_chain_token_in.approximate_usd_value,
        take_value_usd: estimation.dst_chain_token_out.recommended_approximate_usd_value,
        take_amount_decimal,
        fees: FeeBreakdown {
            fixed_fee_native: trim_decimal(&format_ether(response.fix_fee)),
            protocol_fee_usd: format!("{protocol_fee_usd:.2}"),
            native_symbol: route.src_chain.native_symbol(),
        },
        fingerprint: QuoteFingerprint::new(
            give_token.address,
            take_token.address,
            amount,
            route.recipient,
        ),
        give_token,
        take_token,
    };

    info!(
        give_amount = %prepared.give_amount,
        take_amount = %prepared.take_amount,
        amount_usd = prepared.amount_usd,
        take_value_usd = prepared.take_value_usd,
        event = "order_prepared"
    );

    Ok(prepared)
}

/// Drops trailing fractional zeros from a formatted decimal ("1.9950" →
/// "1.995", "2.000" → "2").
fn trim_decimal(formatted: &str) -> String {
    if !formatted.contains('.') {
        return formatted.to_string();
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn token(symbol: &str, address: Address, decimals: u8) -> TokenRecord {
        TokenRecord {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            address,
            decimals,
            logo_uri: None,
        }
    }

    fn snapshot() -> Vec<TokenRecord> {
        vec![
            token("BNB", Address::ZERO, 18),
            token("USDC", address!("8ac76a51cc950d9822d68b83fe1ad97b32cd580d"), 18),
            token("USDC", address!("d9ae5b42bbe9ee6b2664b04767d1b0c1e7e12ea9"), 6),
            token("CAKE", address!("0e09fabb73bd3ade0a17ecc321fd13a19e81ce82"), 18),
        ]
    }

    #[test]
    fn test_resolve_unset_reference_is_native() {
        let resolution = resolve_token(&snapshot(), None).unwrap();
        match resolution {
            Resolution::Token(token) => assert_eq!(token.address, Address::ZERO),
            Resolution::Ambiguous(_) => panic!("native resolution must be unique"),
        }
    }

    #[test]
    fn test_resolve_by_address() {
        let resolution = resolve_token(
            &snapshot(),
            Some("0x0e09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82"),
        )
        .unwrap();
        match resolution {
            Resolution::Token(token) => assert_eq!(token.symbol, "CAKE"),
            Resolution::Ambiguous(_) => panic!("address resolution must be unique"),
        }
    }

    #[test]
    fn test_resolve_by_unique_symbol_case_insensitive() {
        let resolution = resolve_token(&snapshot(), Some("cake")).unwrap();
        assert!(matches!(resolution, Resolution::Token(token) if token.symbol == "CAKE"));
    }

    #[test]
    fn test_resolve_ambiguous_symbol() {
        let resolution = resolve_token(&snapshot(), Some("USDC")).unwrap();
        match resolution {
            Resolution::Ambiguous(matches) => assert_eq!(matches.len(), 2),
            Resolution::Token(_) => panic!("two USDC entries should be ambiguous"),
        }
    }

    #[test]
    fn test_resolve_unknown_reference() {
        let error = resolve_token(&snapshot(), Some("DOGE")).unwrap_err();
        assert!(matches!(
            error,
            WalletError::TokenNotFound { reference } if reference == "DOGE"
        ));

        let error = resolve_token(
            &snapshot(),
            Some("0x9999999999999999999999999999999999999999"),
        )
        .unwrap_err();
        assert!(matches!(error, WalletError::TokenNotFound { .. }));
    }

    #[test]
    fn test_fingerprint_detects_changed_inputs() {
        let recipient = address!("1111111111111111111111111111111111111111");
        let base = QuoteFingerprint::new(Address::ZERO, Address::ZERO, "2", recipient);
        assert_eq!(
            base,
            QuoteFingerprint::new(Address::ZERO, Address::ZERO, " 2 ", recipient)
        );
        assert_ne!(
            base,
            QuoteFingerprint::new(Address::ZERO, Address::ZERO, "3", recipient)
        );
        assert_ne!(
            base,
            QuoteFingerprint::new(Address::ZERO, Address::ZERO, "2", Address::ZERO)
        );
    }

    #[test]
    fn test_trim_decimal() {
        assert_eq!(trim_decimal("1.995000000000000000"), "1.995");
        assert_eq!(trim_decimal("2.000000000000000000"), "2");
        assert_eq!(trim_decimal("1191.26"), "1191.26");
        assert_eq!(trim_decimal("42"), "42");
    }

    mod quoting {
        use super::*;
        use crate::bridge::validate::ChainRouteInfo;
        use crate::chain::Chain;
        use crate::testing::{quote_response, token_entry, FakeDlnApi};
        use alloy_primitives::Bytes;

        const SONIC_USDC: Address = address!("29219dd400f2Bf60E5a23d13Be72B486D4038894");
        const SENDER: Address = address!("1111111111111111111111111111111111111111");

        fn route() -> ChainRouteInfo {
            ChainRouteInfo {
                src_chain: Chain::BnbChain,
                dst_chain: Chain::Sonic,
                dst_chain_id: 146,
                recipient: SENDER,
                allowed_taker: Bytes::new(),
                external_call: Bytes::new(),
                referral_code: 31565,
            }
        }

        fn api_with_quote() -> FakeDlnApi {
            let api = FakeDlnApi::new();
            api.set_quote(quote_response(
                &token_entry("BNB", Address::ZERO, 18),
                U256::from(2_000_000_000_000_000_000u64),
                1196.4,
                &token_entry("USDC", SONIC_USDC, 6),
                U256::from(1_191_260_000u64),
                1191.26,
                0.96,
                U256::from(1_000_000_000_000_000u64),
                U256::from(2_001_000_000_000_000_000u64),
            ));
            api
        }

        #[tokio::test]
        async fn test_prepare_is_idempotent() {
            let api = api_with_quote();
            let config = BridgeConfig::default();
            let give = token("BNB", Address::ZERO, 18);
            let take = token("USDC", SONIC_USDC, 6);

            let first = prepare(
                &api,
                &config,
                &route(),
                give.clone(),
                take.clone(),
                "2",
                SENDER,
            )
            .await
            .unwrap();
            let second = prepare(&api, &config, &route(), give, take, "2", SENDER)
                .await
                .unwrap();

            assert_eq!(first.give_token.address, second.give_token.address);
            assert_eq!(first.take_token.address, second.take_token.address);
            assert_eq!(first.give_amount, second.give_amount);
            assert_eq!(first.take_amount, second.take_amount);
            assert_eq!(first.fingerprint, second.fingerprint);
            // One network call each, no other side effects.
            assert_eq!(api.quote_calls(), 2);
        }

        #[tokio::test]
        async fn test_missing_protocol_fee_is_a_quote_error() {
            let api = FakeDlnApi::new();
            let mut quote = quote_response(
                &token_entry("BNB", Address::ZERO, 18),
                U256::from(2_000_000_000_000_000_000u64),
                1196.4,
                &token_entry("USDC", SONIC_USDC, 6),
                U256::from(1_191_260_000u64),
                1191.26,
                0.96,
                U256::from(1_000_000_000_000_000u64),
                U256::from(2_001_000_000_000_000_000u64),
            );
            quote.estimation.costs_details.clear();
            api.set_quote(quote);

            let error = prepare(
                &api,
                &BridgeConfig::default(),
                &route(),
                token("BNB", Address::ZERO, 18),
                token("USDC", SONIC_USDC, 6),
                "2",
                SENDER,
            )
            .await
            .unwrap_err();

            assert!(matches!(error, WalletError::Quote { .. }));
            assert!(error.to_string().contains("protocol fee"));
        }

        #[tokio::test]
        async fn test_invalid_amount_precision_is_a_validation_error() {
            let api = api_with_quote();

            let error = prepare(
                &api,
                &BridgeConfig::default(),
                &route(),
                token("BNB", Address::ZERO, 18),
                token("USDC", SONIC_USDC, 6),
                "not-a-number",
                SENDER,
            )
            .await
            .unwrap_err();

            assert!(matches!(error, WalletError::Validation(_)));
            assert_eq!(api.quote_calls(), 0);
        }
    }
}
