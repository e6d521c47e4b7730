use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("{0}")]
    Validation(String),

    #[error("Token not found: {reference}")]
    TokenNotFound { reference: String },

    #[error("Quote failed: {reason}")]
    Quote { reason: String },

    #[error("Chain interaction failed: {reason}")]
    Chain { reason: String },

    #[error("Request timed out, please try again")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, WalletError>;
