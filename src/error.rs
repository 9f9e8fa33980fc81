use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlashcardsError {
    #[error("invalid card: {0}")]
    InvalidCard(String),

    #[error("card not found: {0}")]
    CardNotFound(String),

    #[error("sentence generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlashcardsError>;
