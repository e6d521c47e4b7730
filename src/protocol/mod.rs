//! Wire types for the deBridge DLN HTTP API.
//!
//! This module models the two endpoints the bridge adapter consumes: the
//! per-chain token list and the order/quote creation endpoint. Numeric
//! amounts arrive as decimal strings, so the structs carry dedicated
//! deserializers.

mod order;
mod tokens;

pub use order::{
    CostDetail, CostPayload, DestinationLegEstimate, OrderEstimation, OrderQuoteQuery,
    OrderQuoteResponse, OrderTx, SourceLegEstimate, DLN_PROTOCOL_FEE_KIND,
};
pub use tokens::{TokenListEntry, TokenListResponse};

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer};

/// Deserializes a `U256` that the API may send as either a decimal string or
/// a JSON number.
pub(crate) fn u256_from_decimal<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(U256::from(value)),
        Raw::Text(text) => text.parse::<U256>().map_err(serde::de::Error::custom),
    }
}

/// Deserializes an `f64` that the API may send as either a number or a
/// numeric string.
pub(crate) fn f64_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Deserializes an optional `f64` that the API may send as either a number or
/// a numeric string, treating an absent or null value as `None`.
pub(crate) fn option_f64_from_number_or_string<'de, D>(
    deserializer: D,
) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => text
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
