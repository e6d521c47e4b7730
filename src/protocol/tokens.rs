use std::collections::HashMap;

use alloy_primitives::Address;
use serde::Deserialize;

/// Response of the `token-list` endpoint: a map of token address to token
/// metadata for one chain.
///
/// The native asset appears under the zero address.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenListResponse {
    pub tokens: HashMap<String, TokenListEntry>,
}

/// One upstream token-list entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListEntry {
    pub symbol: String,
    pub name: String,
    pub address: Address,
    pub decimals: u8,
    #[serde(default, rename = "logoURI")]
    pub logo_uri: Option<String>,
}
