//! Production implementations of the wallet, DLN API, and clock traits.

mod alloy;
mod dln_http;
mod system_clock;

pub use alloy::AlloyAccount;
pub use dln_http::DlnHttpClient;
pub use system_clock::SystemClock;
