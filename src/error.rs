use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketLensError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Upstream API returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed payload: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarketLensError>;
