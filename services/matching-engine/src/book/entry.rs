//! Heap ordering keys for resting orders
//!
//! Price-time priority is encoded explicitly: the comparison key is the
//! lexicographic pair (price, timestamp), so equal-priced orders trade in
//! ascending submission-time order even when they were inserted out of
//! timestamp order. Insertion order alone would not survive heap sifting.

use std::cmp::Ordering;

use types::order::Order;

/// Bid-side key: highest price wins, earliest timestamp breaks ties
#[derive(Debug, Clone)]
pub struct BidEntry(pub Order);

impl PartialEq for BidEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BidEntry {}

impl PartialOrd for BidEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BidEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .price
            .cmp(&other.0.price)
            .then_with(|| other.0.timestamp.cmp(&self.0.timestamp))
    }
}

/// Ask-side key: lowest price wins, earliest timestamp breaks ties
#[derive(Debug, Clone)]
pub struct AskEntry(pub Order);

impl PartialEq for AskEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AskEntry {}

impl PartialOrd for AskEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AskEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .price
            .cmp(&self.0.price)
            .then_with(|| other.0.timestamp.cmp(&self.0.timestamp))
    }
}
