//! Token directory cache.
//!
//! A shared, read-mostly cache of the bridgeable tokens per chain. Entries
//! are immutable snapshots fetched from the DLN token-list endpoint, bounded
//! by an explicit capacity and time-to-live; an entry's age is refreshed on
//! access. Nothing session-specific is ever stored here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use alloy_primitives::Address;
use tracing::{debug, Instrument};

use crate::chain::Chain;
use crate::error::Result;
use crate::protocol::TokenListResponse;
use crate::traits::DlnApi;

/// A bridgeable token, normalized from the upstream token list.
///
/// Immutable once constructed. The native asset carries the zero address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Upper-cased ticker symbol.
    pub symbol: String,
    /// Human-readable display name.
    pub name: String,
    /// Contract address; [`Address::ZERO`] for the native asset.
    pub address: Address,
    /// Decimal precision.
    pub decimals: u8,
    /// Logo reference, when the upstream list provides one.
    pub logo_uri: Option<String>,
}

struct CacheEntry {
    tokens: Arc<Vec<TokenRecord>>,
    last_used: Instant,
}

/// Per-chain token cache with bounded capacity and TTL.
pub struct TokenDirectory {
    entries: Mutex<HashMap<Chain, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl TokenDirectory {
    /// Creates a directory holding at most `capacity` chains, each fresh for
    /// `ttl` after its last access.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Returns the token list for `chain`, fetching it on a miss.
    ///
    /// Concurrent misses for the same chain may fetch twice; entries are
    /// idempotent snapshots, so last-write-wins is harmless.
    pub async fn get_tokens<A: DlnApi + ?Sized>(
        &self,
        api: &A,
        chain: Chain,
        now: Instant,
    ) -> Result<Arc<Vec<TokenRecord>>> {
        if let Some(tokens) = self.lookup(chain, now) {
            return Ok(tokens);
        }

        let response = api
            .token_list(chain)
            .instrument(crate::spans::token_discovery(&chain))
            .await?;
        let tokens = Arc::new(normalize(response));
        debug!(
            chain = %chain,
            token_count = tokens.len(),
            event = "token_directory_filled"
        );
        self.insert(chain, Arc::clone(&tokens), now);

        Ok(tokens)
    }

    fn lookup(&self, chain: Chain, now: Instant) -> Option<Arc<Vec<TokenRecord>>> {
        let mut entries = self.entries.lock().expect("token directory lock poisoned");
        match entries.get_mut(&chain) {
            Some(entry) if now.duration_since(entry.last_used) < self.ttl => {
                entry.last_used = now;
                Some(Arc::clone(&entry.tokens))
            }
            Some(_) => {
                entries.remove(&chain);
                None
            }
            None => None,
        }
    }

    fn insert(&self, chain: Chain, tokens: Arc<Vec<TokenRecord>>, now: Instant) {
        let mut entries = self.entries.lock().expect("token directory lock poisoned");
        if entries.len() >= self.capacity && !entries.contains_key(&chain) {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(chain, _)| *chain)
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            chain,
            CacheEntry {
                tokens,
                last_used: now,
            },
        );
    }
}

/// Normalizes an upstream token list: symbols upper-cased, entries sorted by
/// symbol then address for stable listings.
fn normalize(response: TokenListResponse) -> Vec<TokenRecord> {
    let mut tokens: Vec<TokenRecord> = response
        .tokens
        .into_values()
        .map(|entry| TokenRecord {
            symbol: entry.symbol.to_uppercase(),
            name: entry.name,
            address: entry.address,
            decimals: entry.decimals,
            logo_uri: entry.logo_uri,
        })
        .collect();
    tokens.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.address.cmp(&b.address)));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDlnApi;
    use alloy_primitives::address;

    fn entry(symbol: &str, address: Address, decimals: u8) -> crate::protocol::TokenListEntry {
        crate::protocol::TokenListEntry {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            address,
            decimals,
            logo_uri: None,
        }
    }

    #[tokio::test]
    async fn test_miss_fetches_and_normalizes() {
        let api = FakeDlnApi::new();
        api.add_tokens(
            Chain::BnbChain,
            vec![
                entry("usdc", address!("8ac76a51cc950d9822d68b83fe1ad97b32cd580d"), 18),
                entry("bnb", Address::ZERO, 18),
            ],
        );
        let directory = TokenDirectory::new(4, Duration::from_secs(3600));
        let now = Instant::now();

        let tokens = directory
            .get_tokens(&api, Chain::BnbChain, now)
            .await
            .unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].symbol, "BNB");
        assert_eq!(tokens[1].symbol, "USDC");
        assert_eq!(api.token_list_calls(), 1);
    }

    #[tokio::test]
    async fn test_hit_skips_fetch_and_refreshes_age() {
        let api = FakeDlnApi::new();
        api.add_tokens(Chain::BnbChain, vec![entry("BNB", Address::ZERO, 18)]);
        let ttl = Duration::from_secs(60);
        let directory = TokenDirectory::new(4, ttl);
        let start = Instant::now();

        directory
            .get_tokens(&api, Chain::BnbChain, start)
            .await
            .unwrap();

        // Access at 40s keeps the entry alive past its original 60s deadline.
        let mid = start + Duration::from_secs(40);
        directory.get_tokens(&api, Chain::BnbChain, mid).await.unwrap();
        let late = start + Duration::from_secs(90);
        directory
            .get_tokens(&api, Chain::BnbChain, late)
            .await
            .unwrap();

        assert_eq!(api.token_list_calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let api = FakeDlnApi::new();
        api.add_tokens(Chain::BnbChain, vec![entry("BNB", Address::ZERO, 18)]);
        let directory = TokenDirectory::new(4, Duration::from_secs(60));
        let start = Instant::now();

        directory
            .get_tokens(&api, Chain::BnbChain, start)
            .await
            .unwrap();
        directory
            .get_tokens(&api, Chain::BnbChain, start + Duration::from_secs(61))
            .await
            .unwrap();

        assert_eq!(api.token_list_calls(), 2);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let api = FakeDlnApi::new();
        api.add_tokens(Chain::BnbChain, vec![entry("BNB", Address::ZERO, 18)]);
        api.add_tokens(Chain::Sonic, vec![entry("S", Address::ZERO, 18)]);
        api.add_tokens(Chain::Base, vec![entry("ETH", Address::ZERO, 18)]);
        let directory = TokenDirectory::new(2, Duration::from_secs(3600));
        let start = Instant::now();

        directory
            .get_tokens(&api, Chain::BnbChain, start)
            .await
            .unwrap();
        directory
            .get_tokens(&api, Chain::Sonic, start + Duration::from_secs(1))
            .await
            .unwrap();
        // Third chain evicts BnbChain, the least recently used.
        directory
            .get_tokens(&api, Chain::Base, start + Duration::from_secs(2))
            .await
            .unwrap();
        directory
            .get_tokens(&api, Chain::BnbChain, start + Duration::from_secs(3))
            .await
            .unwrap();

        assert_eq!(api.token_list_calls(), 4);
    }
}
