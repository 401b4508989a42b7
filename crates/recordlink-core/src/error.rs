use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkError>;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("expiration is enabled but entry {id} carries no expiry instant")]
    MissingExpiry { id: i64 },

    #[error("invalid field weights: {0}")]
    InvalidWeights(String),

    #[error("matcher is not initialized")]
    NotInitialized,
}

impl LinkError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingExpiry { .. } => "MISSING_EXPIRY",
            Self::InvalidWeights(_) => "INVALID_WEIGHTS",
            Self::NotInitialized => "NOT_INITIALIZED",
        }
    }
}
