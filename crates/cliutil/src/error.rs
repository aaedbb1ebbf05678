//! Error types for cliutil operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Invalid numeric offset: {0}")]
    InvalidNumericOffset(String),

    #[error("Unrecognized month token: {0}")]
    UnrecognizedMonthToken(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, Error>;
