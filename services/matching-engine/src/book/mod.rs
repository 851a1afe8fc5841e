//! Order book for a single trading pair
//!
//! Maintains price-time priority over resting orders on both sides and
//! executes one matching pass per incoming order. Matching consumes the
//! opposite side while prices cross; any residual rests on the order's
//! own side.

pub mod ask_queue;
pub mod bid_queue;
pub mod entry;

pub use ask_queue::AskQueue;
pub use bid_queue::BidQueue;

use rust_decimal::Decimal;

use types::fill::{FillStatus, OrderFill};
use types::ids::PairId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};
use types::trade::Trade;

use crate::clock::unix_timestamp;
use crate::events::BookEvent;

/// Order book for one trading pair
///
/// The book is not internally synchronized; the engine wraps each book in
/// a mutex and holds it across the whole matching pass, so all events of
/// one pass are produced before another pass on the same book can start.
#[derive(Debug)]
pub struct OrderBook {
    pair: PairId,
    bids: BidQueue,
    asks: AskQueue,
}

impl OrderBook {
    /// Create an empty order book for the given pair
    pub fn new(pair: PairId) -> Self {
        Self {
            pair,
            bids: BidQueue::new(),
            asks: AskQueue::new(),
        }
    }

    /// The pair this book serves
    pub fn pair(&self) -> &PairId {
        &self.pair
    }

    /// Match an incoming order against the book
    ///
    /// Consumes the opposite side until the order is exhausted or the best
    /// opposite price no longer crosses, then rests any residual. Returns
    /// the emitted events in order: each trade is followed by the resting
    /// order's fill and then the incoming order's fill. An order that did
    /// not cross at all gets a single New fill with nothing executed.
    ///
    /// `original_qty` is the incoming order's quantity as submitted; the
    /// caller passes it so the no-match case can be recognized. Trades are
    /// emitted with an empty `trade_id`; the engine assigns identifiers
    /// while forwarding. Zero-quantity orders are inert.
    pub fn match_order(&mut self, mut order: Order, original_qty: Quantity) -> Vec<BookEvent> {
        let mut events = Vec::new();
        let now = unix_timestamp();

        match order.side {
            Side::BUY => self.match_buy(&mut order, &mut events, now),
            Side::SELL => self.match_sell(&mut order, &mut events, now),
        }

        if !original_qty.is_zero() && order.qty == original_qty {
            events.push(BookEvent::Fill(OrderFill {
                order_id: order.id,
                pair: self.pair.clone(),
                side: order.side,
                original_qty,
                executed_qty: Quantity::zero(),
                remaining_qty: original_qty,
                price: order.price,
                fill_price: Decimal::ZERO,
                status: FillStatus::New,
                timestamp: now,
            }));
        }

        events
    }

    /// Match an incoming buy against the asks, lowest price first
    fn match_buy(&mut self, order: &mut Order, events: &mut Vec<BookEvent>, now: i64) {
        while !order.qty.is_zero() {
            let Some(mut resting) = self.asks.pop() else {
                break;
            };
            if resting.price > order.price {
                self.asks.push(resting);
                break;
            }

            let qty = order.qty.min(resting.qty);
            if qty.is_zero() {
                // A zero-quantity resting order trades nothing; drop it without emission
                continue;
            }

            events.push(BookEvent::Trade(Trade {
                trade_id: String::new(),
                pair: self.pair.clone(),
                buy_order_id: order.id.clone(),
                sell_order_id: resting.id.clone(),
                price: resting.price,
                qty,
            }));

            order.qty = order.qty - qty;
            resting.qty = resting.qty - qty;

            events.push(BookEvent::Fill(matched_fill(&self.pair, &resting, qty, resting.price, now)));
            events.push(BookEvent::Fill(matched_fill(&self.pair, order, qty, resting.price, now)));

            if !resting.qty.is_zero() {
                self.asks.push(resting);
            }
        }

        if !order.qty.is_zero() {
            self.bids.push(order.clone());
        }
    }

    /// Match an incoming sell against the bids, highest price first
    fn match_sell(&mut self, order: &mut Order, events: &mut Vec<BookEvent>, now: i64) {
        while !order.qty.is_zero() {
            let Some(mut resting) = self.bids.pop() else {
                break;
            };
            if resting.price < order.price {
                self.bids.push(resting);
                break;
            }

            let qty = order.qty.min(resting.qty);
            if qty.is_zero() {
                continue;
            }

            events.push(BookEvent::Trade(Trade {
                trade_id: String::new(),
                pair: self.pair.clone(),
                buy_order_id: resting.id.clone(),
                sell_order_id: order.id.clone(),
                price: resting.price,
                qty,
            }));

            order.qty = order.qty - qty;
            resting.qty = resting.qty - qty;

            events.push(BookEvent::Fill(matched_fill(&self.pair, &resting, qty, resting.price, now)));
            events.push(BookEvent::Fill(matched_fill(&self.pair, order, qty, resting.price, now)));

            if !resting.qty.is_zero() {
                self.bids.push(resting);
            }
        }

        if !order.qty.is_zero() {
            self.asks.push(order.clone());
        }
    }

    /// Highest resting bid price, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Lowest resting ask price, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Top `levels` aggregated bid tiers, highest price first
    pub fn bid_depth(&self, levels: usize) -> Vec<types::depth::DepthLevel> {
        self.bids.depth(levels)
    }

    /// Top `levels` aggregated ask tiers, lowest price first
    pub fn ask_depth(&self, levels: usize) -> Vec<types::depth::DepthLevel> {
        self.asks.depth(levels)
    }
}

/// Build the fill for one party of a match, after its quantity was
/// decremented. Both parties report the resting order's price: it is the
/// nominal price of the match and the actual execution price.
fn matched_fill(
    pair: &PairId,
    order: &Order,
    executed: Quantity,
    resting_price: Price,
    now: i64,
) -> OrderFill {
    let status = if order.qty.is_zero() {
        FillStatus::Filled
    } else {
        FillStatus::PartiallyFilled
    };

    OrderFill {
        order_id: order.id.clone(),
        pair: pair.clone(),
        side: order.side,
        // Quantity just before this event, reconstructed from the remainder
        original_qty: order.qty + executed,
        executed_qty: executed,
        remaining_qty: order.qty,
        price: resting_price,
        fill_price: resting_price.as_decimal(),
        status,
        timestamp: now,
    }
}
