//! Error types for the core model.

use thiserror::Error;

/// Errors raised while building model values from raw input.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid column reference: {0:?}")]
    InvalidColumn(String),

    #[error("invalid balance value: {0}")]
    InvalidBalance(String),
}

pub type TypesResult<T> = Result<T, TypesError>;
