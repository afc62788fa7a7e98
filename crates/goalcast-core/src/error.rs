//! Error types for Goalcast

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No transactions were available to aggregate or fit
    #[error("No transactions available")]
    EmptyInput,

    /// A transaction record lacks a usable date or amount
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Inference was attempted before any model was trained
    #[error("Trained model not found: {0}. Run training first")]
    ModelNotFound(String),

    /// The predicted monthly savings rate cannot reach the goal
    #[error("Insufficient savings rate: predicted {0:.2} per month")]
    InsufficientRate(f64),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
