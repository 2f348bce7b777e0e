use thiserror::Error;

#[derive(Error, Debug)]
pub enum TunnelError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad frame-time CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Bad JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration: {0}")]
    Config(String),

    #[error("Unknown quality tier '{name}', expected one of {expected}")]
    UnknownTier { name: String, expected: String },

    /// Board state carrying NaN or infinite coordinates.
    #[error("Non-finite board state: {0}")]
    NonFinite(String),
}

pub type TunnelResult<T> = Result<T, TunnelError>;
