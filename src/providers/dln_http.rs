//! deBridge DLN HTTP API provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, trace, Instrument};
use url::Url;

use crate::bridge::DLN_API;
use crate::chain::Chain;
use crate::error::{Result, WalletError};
use crate::protocol::{OrderQuoteQuery, OrderQuoteResponse, TokenListResponse};
use crate::traits::DlnApi;

/// Upstream request timeout; a fetch that exceeds it is aborted and surfaces
/// as [`WalletError::Timeout`].
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Production DLN API provider over deBridge's public endpoints.
///
/// # Examples
///
/// ```rust,no_run
/// use agent_wallet::providers::DlnHttpClient;
/// use agent_wallet::{Chain, DlnApi};
///
/// # async fn example() -> Result<(), agent_wallet::WalletError> {
/// let api = DlnHttpClient::production();
/// let tokens = api.token_list(Chain::BnbChain).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DlnHttpClient {
    base_url: Url,
    client: Client,
}

impl DlnHttpClient {
    /// Creates a new client against the given API base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref()).map_err(|e| WalletError::InvalidUrl {
            reason: format!("invalid DLN API base URL: {e}"),
        })?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WalletError::Network)?;

        Ok(Self { base_url, client })
    }

    /// Creates a client for deBridge's public production API.
    pub fn production() -> Self {
        Self::new(DLN_API).expect("production DLN API URL is valid")
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| WalletError::InvalidUrl {
            reason: format!("failed to construct {path} URL: {e}"),
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> WalletError {
    if error.is_timeout() {
        WalletError::Timeout
    } else {
        WalletError::Network(error)
    }
}

#[async_trait]
impl DlnApi for DlnHttpClient {
    async fn token_list(&self, chain: Chain) -> Result<TokenListResponse> {
        let mut url = self.endpoint("token-list")?;
        url.query_pairs_mut()
            .append_pair("chainId", &chain.dln_chain_id().to_string());

        trace!(url = %url, "requesting token list");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?
            .error_for_status()
            .map_err(WalletError::Network)?;

        let parsed = response
            .json::<TokenListResponse>()
            .await
            .map_err(map_transport_error)?;

        debug!(
            chain = %chain,
            token_count = parsed.tokens.len(),
            event = "token_list_fetched"
        );

        Ok(parsed)
    }

    async fn create_order_tx(&self, query: &OrderQuoteQuery) -> Result<OrderQuoteResponse> {
        let mut url = self.endpoint("dln/order/create-tx")?;
        query.append_to(&mut url);

        let span = crate::spans::create_order_quote(&url);
        async move {
            trace!(url = %url, "requesting order quote");

            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(map_transport_error)?;

            if !response.status().is_success() {
                return Err(WalletError::Quote {
                    reason: format!("quote service returned {}", response.status()),
                });
            }

            let parsed = response.json::<OrderQuoteResponse>().await.map_err(|e| {
                if e.is_timeout() {
                    WalletError::Timeout
                } else if e.is_decode() {
                    WalletError::Quote {
                        reason: format!("malformed quote response: {e}"),
                    }
                } else {
                    WalletError::Network(e)
                }
            })?;

            debug!(
                give_usd = parsed.estimation.src_chain_token_in.approximate_usd_value,
                take_usd = parsed
                    .estimation
                    .dst_chain_token_out
                    .recommended_approximate_usd_value,
                event = "order_quote_received"
            );

            Ok(parsed)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_base_url() {
        let api = DlnHttpClient::production();
        let url = api.endpoint("token-list").unwrap();
        insta::assert_snapshot!(url.as_str(), @"https://dln.debridge.finance/v1.0/token-list");
    }

    #[test]
    fn test_endpoint_preserves_version_path() {
        let api = DlnHttpClient::new("https://dln.example.invalid/v1.0/").unwrap();
        let url = api.endpoint("dln/order/create-tx").unwrap();
        insta::assert_snapshot!(url.as_str(), @"https://dln.example.invalid/v1.0/dln/order/create-tx");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = DlnHttpClient::new("not a url");
        assert!(matches!(result, Err(WalletError::InvalidUrl { .. })));
    }
}
