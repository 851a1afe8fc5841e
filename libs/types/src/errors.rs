//! Error types for the matching engine
//!
//! The matching path itself cannot fail, so errors are confined to
//! value construction from untrusted input.

use thiserror::Error;

/// Errors raised when constructing domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("not a decimal: {0}")]
    InvalidDecimal(String),
}
