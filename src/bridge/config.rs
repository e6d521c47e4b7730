use std::time::Duration;

use alloy_primitives::Address;

use crate::error::{Result, WalletError};

/// deBridge DLN API base URL
///
/// See <https://docs.debridge.finance/dln-the-debridge-liquidity-network-protocol/integration-guidelines/api-quick-start-guide>
pub const DLN_API: &str = "https://dln.debridge.finance/v1.0/";

/// Environment variable naming the affiliate fee recipient address.
pub const AFFILIATE_ADDRESS_ENV: &str = "AFFILIATE_ADDRESS";

/// Environment variable naming the deBridge referral code.
pub const REFERRAL_CODE_ENV: &str = "REFERRAL_CODE";

/// Configuration for the bridge adapter's confirmation protocol and caches.
///
/// All windows are evaluated lazily against the injected clock at the top of
/// every `bridge_token` turn. Use the builder methods to customize, or
/// [`BridgeConfig::from_env`] to overlay affiliate parameters from the
/// environment.
///
/// # Examples
///
/// ```rust
/// use agent_wallet::BridgeConfig;
/// use std::time::Duration;
///
/// // Use defaults (30 second confirmation window, 5 minute abandonment)
/// let config = BridgeConfig::default();
///
/// // Customize the windows
/// let config = BridgeConfig::default()
///     .with_expiry_window(Duration::from_secs(60))
///     .with_abandonment_window(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// How long a quoted confirmation stays valid before it must be re-quoted
    /// and re-confirmed.
    pub expiry_window: Duration,
    /// How long a session may sit idle before it is cancelled outright.
    pub abandonment_window: Duration,
    /// Maximum number of chains kept in the token directory cache.
    pub token_cache_capacity: usize,
    /// How long a cached token list stays fresh; age is refreshed on access.
    pub token_cache_ttl: Duration,
    /// Maximum number of tokens shown per side in the selection listing.
    pub listing_limit: usize,
    /// Affiliate fee in percent, forwarded to the quote service.
    pub affiliate_fee_percent: f64,
    /// Affiliate fee recipient; omitted from quote queries when unset.
    pub affiliate_fee_recipient: Option<Address>,
    /// deBridge referral code attached to created orders.
    pub referral_code: u32,
}

impl Default for BridgeConfig {
    /// Creates the default adapter configuration.
    ///
    /// - `expiry_window`: 30 seconds
    /// - `abandonment_window`: 5 minutes
    /// - `token_cache_capacity`: 8 chains
    /// - `token_cache_ttl`: 1 hour
    /// - `listing_limit`: 10 tokens per side
    /// - `affiliate_fee_percent`: 0.5
    /// - `referral_code`: 31565
    fn default() -> Self {
        Self {
            expiry_window: Duration::from_secs(30),
            abandonment_window: Duration::from_secs(5 * 60),
            token_cache_capacity: 8,
            token_cache_ttl: Duration::from_secs(60 * 60),
            listing_limit: 10,
            affiliate_fee_percent: 0.5,
            affiliate_fee_recipient: None,
            referral_code: 31565,
        }
    }
}

impl BridgeConfig {
    /// Loads the default configuration with affiliate parameters overlaid
    /// from the environment (`AFFILIATE_ADDRESS`, `REFERRAL_CODE`).
    ///
    /// # Errors
    ///
    /// Returns `WalletError::InvalidConfig` when a set variable does not
    /// parse; unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(address) = std::env::var(AFFILIATE_ADDRESS_ENV) {
            let address = address.parse::<Address>().map_err(|e| {
                WalletError::InvalidConfig(format!("{AFFILIATE_ADDRESS_ENV}: {e}"))
            })?;
            config.affiliate_fee_recipient = Some(address);
        }

        if let Ok(code) = std::env::var(REFERRAL_CODE_ENV) {
            config.referral_code = code
                .parse::<u32>()
                .map_err(|e| WalletError::InvalidConfig(format!("{REFERRAL_CODE_ENV}: {e}")))?;
        }

        Ok(config)
    }

    /// Sets the confirmation expiry window.
    pub fn with_expiry_window(mut self, window: Duration) -> Self {
        self.expiry_window = window;
        self
    }

    /// Sets the session abandonment window.
    pub fn with_abandonment_window(mut self, window: Duration) -> Self {
        self.abandonment_window = window;
        self
    }

    /// Sets the token directory capacity and time-to-live.
    pub fn with_token_cache(mut self, capacity: usize, ttl: Duration) -> Self {
        self.token_cache_capacity = capacity;
        self.token_cache_ttl = ttl;
        self
    }

    /// Sets the affiliate fee parameters forwarded to the quote service.
    pub fn with_affiliate(mut self, percent: f64, recipient: Option<Address>) -> Self {
        self.affiliate_fee_percent = percent;
        self.affiliate_fee_recipient = recipient;
        self
    }
}
