//! Events produced by a single matching pass
//!
//! A matching pass emits trades and fills in a strict order: each trade is
//! followed by the resting order's fill, then the incoming order's fill.
//! Keeping both kinds in one sequence preserves that order until the
//! engine forwards them onto the public streams.

use types::fill::OrderFill;
use types::trade::Trade;

/// One event emitted by [`OrderBook::match_order`](crate::book::OrderBook::match_order)
#[derive(Debug, Clone)]
pub enum BookEvent {
    /// Two orders crossed
    Trade(Trade),
    /// Status update for one of the parties, or a New acceptance
    Fill(OrderFill),
}
