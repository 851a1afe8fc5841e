//! Market data records
//!
//! Aggregated depth snapshots and best-price updates published by the
//! engine's periodic broadcasters. These are best-effort views: a record
//! may describe a book state that has since changed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::PairId;
use crate::numeric::{Price, Quantity};

/// A single price tier aggregate on one side of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Price of the tier
    pub price: Price,
    /// Total quantity resting at this price
    pub quantity: Quantity,
    /// Number of distinct resting orders at this price
    pub order_count: usize,
}

/// A snapshot of order book depth for one pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthUpdate {
    /// Trading pair
    pub pair: PairId,
    /// Bid tiers, highest price first
    pub bids: Vec<DepthLevel>,
    /// Ask tiers, lowest price first
    pub asks: Vec<DepthLevel>,
    /// Unix seconds when the snapshot was taken
    pub timestamp: i64,
    /// Cumulative number of trades executed for this pair
    pub trade_count: u64,
}

/// Best bid/ask prices and the volume-weighted average trade price
///
/// Prices are plain decimals because zero is the legal "absent" value:
/// no bids, no asks, or no trades yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// Trading pair
    pub pair: PairId,
    /// Highest resting bid price, 0 if the bid side is empty
    pub best_bid: Decimal,
    /// Lowest resting ask price, 0 if the ask side is empty
    pub best_ask: Decimal,
    /// Volume-weighted average trade price, 0 before the first trade
    pub avg_price: Decimal,
}
