use alloy_primitives::{Address, Bytes, U256};
use serde::Deserialize;
use url::Url;

use super::{f64_from_number_or_string, option_f64_from_number_or_string, u256_from_decimal};

/// Cost-detail type naming the DLN protocol fee in a quote's
/// `costsDetails` list.
pub const DLN_PROTOCOL_FEE_KIND: &str = "DlnProtocolFee";

/// Query parameters for the `dln/order/create-tx` endpoint.
///
/// Chain ids are DLN-internal ids, amounts are base units of the give token.
/// The output amount is always requested as `auto` with operating expenses
/// prepended, so the service picks the recommended take amount.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuoteQuery {
    pub src_chain_id: u64,
    pub src_chain_token_in: Address,
    pub src_chain_token_in_amount: U256,
    pub dst_chain_id: u64,
    pub dst_chain_token_out: Address,
    /// Order authority on the give chain, i.e. the sender.
    pub src_chain_order_authority_address: Address,
    /// Order authority and recipient on the take chain.
    pub dst_chain_order_authority_address: Address,
    pub dst_chain_token_out_recipient: Address,
    pub affiliate_fee_percent: f64,
    pub affiliate_fee_recipient: Option<Address>,
    pub referral_code: u32,
}

impl OrderQuoteQuery {
    /// Appends the query parameters to `url` in the API's camelCase naming.
    pub fn append_to(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("srcChainId", &self.src_chain_id.to_string())
            .append_pair("srcChainTokenIn", &self.src_chain_token_in.to_string())
            .append_pair(
                "srcChainTokenInAmount",
                &self.src_chain_token_in_amount.to_string(),
            )
            .append_pair("dstChainId", &self.dst_chain_id.to_string())
            .append_pair("dstChainTokenOut", &self.dst_chain_token_out.to_string())
            .append_pair("dstChainTokenOutAmount", "auto")
            .append_pair("prependOperatingExpense", "true")
            .append_pair(
                "srcChainOrderAuthorityAddress",
                &self.src_chain_order_authority_address.to_string(),
            )
            .append_pair(
                "dstChainOrderAuthorityAddress",
                &self.dst_chain_order_authority_address.to_string(),
            )
            .append_pair(
                "dstChainTokenOutRecipient",
                &self.dst_chain_token_out_recipient.to_string(),
            )
            .append_pair(
                "affiliateFeePercent",
                &self.affiliate_fee_percent.to_string(),
            )
            .append_pair("referralCode", &self.referral_code.to_string());
        if let Some(recipient) = self.affiliate_fee_recipient {
            pairs.append_pair("affiliateFeeRecipient", &recipient.to_string());
        }
    }
}

/// Response of the `dln/order/create-tx` endpoint: price estimation, fee
/// breakdown, and a ready-to-sign transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuoteResponse {
    pub estimation: OrderEstimation,
    /// Fixed native fee in wei, charged as transaction value on top of the
    /// give amount.
    #[serde(deserialize_with = "u256_from_decimal")]
    pub fix_fee: U256,
    pub tx: OrderTx,
}

/// Price estimation for both legs of an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEstimation {
    pub src_chain_token_in: SourceLegEstimate,
    pub dst_chain_token_out: DestinationLegEstimate,
    #[serde(default)]
    pub costs_details: Vec<CostDetail>,
}

/// Give-leg estimate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLegEstimate {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(deserialize_with = "u256_from_decimal")]
    pub amount: U256,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub approximate_usd_value: f64,
}

/// Take-leg estimate. `recommended_amount` is the output the service advises
/// quoting to the user after operating expenses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationLegEstimate {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(deserialize_with = "u256_from_decimal")]
    pub recommended_amount: U256,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub recommended_approximate_usd_value: f64,
}

/// One entry of the quote's cost breakdown.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostDetail {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<CostPayload>,
}

/// Payload of a cost-detail entry. Only the USD estimate is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostPayload {
    #[serde(default, deserialize_with = "option_f64_from_number_or_string")]
    pub fee_approximate_usd_value: Option<f64>,
}

/// The prepared order-creation transaction returned by the quote service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTx {
    pub to: Address,
    pub data: Bytes,
    #[serde(deserialize_with = "u256_from_decimal")]
    pub value: U256,
}
