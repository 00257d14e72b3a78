//! # AppError
//!
//! Centralized error handling for the wedding registry.
//! Only two things can go wrong: the store, and the sheet mirror.

use thiserror::Error;

/// The primary error type for all wr-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Record store failure (e.g. DB down, NOT NULL or CHECK violation).
    /// Missing required fields in a submission land here too.
    #[error("record store error: {0}")]
    Store(String),

    /// Ledger mirror failure (e.g. missing credentials, auth rejected, quota).
    /// Never surfaced to guests.
    #[error("ledger mirror error: {0}")]
    Mirror(String),
}

impl AppError {
    /// Keeps the full `anyhow` context chain in the message.
    pub fn store(err: anyhow::Error) -> Self {
        AppError::Store(format!("{err:#}"))
    }
}

/// A specialized Result type for registry logic.
pub type Result<T> = std::result::Result<T, AppError>;
