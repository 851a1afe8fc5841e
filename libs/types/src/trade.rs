//! Trade execution record
//!
//! A trade pairs one buy order with one sell order in a single execution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::PairId;
use crate::numeric::{Price, Quantity};

/// A successful match between a buy and a sell order
///
/// The execution price is always the price of the order that was resting
/// in the book when the match occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Engine-issued identifier of the form `T<n>`
    pub trade_id: String,
    /// Trading pair the orders belong to
    pub pair: PairId,
    /// Identifier of the buy order
    pub buy_order_id: String,
    /// Identifier of the sell order
    pub sell_order_id: String,
    /// Execution price (the resting order's price)
    pub price: Price,
    /// Executed quantity, always strictly positive
    pub qty: Quantity,
}

impl Trade {
    /// Trade notional value (qty × price)
    pub fn value(&self) -> Decimal {
        self.qty * self.price
    }
}
