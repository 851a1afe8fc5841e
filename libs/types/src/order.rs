//! Order types
//!
//! Orders are the fundamental unit of trading: an immutable identity plus
//! a remaining quantity that matching consumes.

use serde::{Deserialize, Serialize};

use crate::numeric::{Price, Quantity};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// A limit order
///
/// `qty` is the remaining quantity: matching decrements it, and an order
/// resting in a book always has it strictly positive. The identifier is
/// caller-supplied and assumed unique for the order's lifetime; the engine
/// does not enforce global uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Caller-supplied opaque identifier
    pub id: String,
    /// Direction of the order
    pub side: Side,
    /// Limit price per unit
    pub price: Price,
    /// Remaining quantity to trade
    pub qty: Quantity,
    /// Submission time, Unix seconds, caller-supplied
    pub timestamp: i64,
}

impl Order {
    /// Create a new order
    pub fn new(
        id: impl Into<String>,
        side: Side,
        price: Price,
        qty: Quantity,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            side,
            price,
            qty,
            timestamp,
        }
    }
}
