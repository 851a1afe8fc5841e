//! Order fill events
//!
//! A fill is a status update for a single order caused by a single
//! matching event: either an execution against a counterparty or the
//! acceptance of an order that did not cross on entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::PairId;
use crate::numeric::{Price, Quantity};
use crate::order::Side;

/// Execution status of an order after a fill event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillStatus {
    /// Accepted without crossing; nothing executed yet
    New,
    /// Partially executed, remaining quantity still open
    PartiallyFilled,
    /// Completely executed, no remaining quantity
    Filled,
}

/// Execution details for one order in one matching event
///
/// `original_qty` is the order's quantity immediately before this event
/// (i.e. `executed_qty + remaining_qty`), not the quantity at submission.
/// Consumers that need the absolute submitted quantity must track it
/// themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFill {
    /// Identifier of the order being filled
    pub order_id: String,
    /// Trading pair
    pub pair: PairId,
    /// Direction of the order
    pub side: Side,
    /// Quantity immediately before this event
    pub original_qty: Quantity,
    /// Quantity executed in this event (zero for New)
    pub executed_qty: Quantity,
    /// Quantity remaining after this event
    pub remaining_qty: Quantity,
    /// Nominal order price: the resting order's price for matched fills,
    /// the order's own limit price for New fills
    pub price: Price,
    /// Actual execution price; zero for New fills
    pub fill_price: Decimal,
    /// Status after this event
    pub status: FillStatus,
    /// Unix seconds when the fill occurred
    pub timestamp: i64,
}

impl OrderFill {
    /// original = executed + remaining must hold within every fill
    pub fn check_invariant(&self) -> bool {
        self.original_qty.as_decimal()
            == self.executed_qty.as_decimal() + self.remaining_qty.as_decimal()
    }
}
