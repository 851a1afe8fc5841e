//! Engine core
//!
//! Multiplexes orders across per-pair books, forwards matching events
//! onto the public streams, tracks per-pair statistics, and hosts the two
//! periodic broadcasters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, trace, warn};

use types::depth::{DepthUpdate, PriceUpdate};
use types::fill::OrderFill;
use types::ids::PairId;
use types::order::Order;
use types::trade::Trade;

use crate::book::OrderBook;
use crate::broadcast;
use crate::clock::unix_timestamp;
use crate::events::BookEvent;
use crate::stats::TradeStats;

/// Trade stream capacity; matching blocks when the stream is full
pub const TRADE_STREAM_CAPACITY: usize = 1000;
/// Fill stream capacity; matching blocks when the stream is full
pub const FILL_STREAM_CAPACITY: usize = 1000;
/// Price update stream capacity; the newest update is dropped when full
pub const PRICE_STREAM_CAPACITY: usize = 100;
/// Depth update stream capacity; the newest update is dropped when full
pub const DEPTH_STREAM_CAPACITY: usize = 100;

/// The four public event streams
pub(crate) struct Streams {
    pub(crate) trade_tx: Sender<Trade>,
    trade_rx: Receiver<Trade>,
    pub(crate) fill_tx: Sender<OrderFill>,
    fill_rx: Receiver<OrderFill>,
    pub(crate) price_tx: Sender<PriceUpdate>,
    price_rx: Receiver<PriceUpdate>,
    pub(crate) depth_tx: Sender<DepthUpdate>,
    depth_rx: Receiver<DepthUpdate>,
}

impl Streams {
    fn new() -> Self {
        let (trade_tx, trade_rx) = bounded(TRADE_STREAM_CAPACITY);
        let (fill_tx, fill_rx) = bounded(FILL_STREAM_CAPACITY);
        let (price_tx, price_rx) = bounded(PRICE_STREAM_CAPACITY);
        let (depth_tx, depth_rx) = bounded(DEPTH_STREAM_CAPACITY);
        Self {
            trade_tx,
            trade_rx,
            fill_tx,
            fill_rx,
            price_tx,
            price_rx,
            depth_tx,
            depth_rx,
        }
    }
}

/// Shared engine state
///
/// Lock discipline: the `books` map guard may be held while creating a
/// book, but a book's own guard is only ever taken after the map guard is
/// released (or, in `book_for`, nested map -> book is never needed since
/// only the `Arc` is cloned out). `stats` has its own guard so per-trade
/// updates inside a book's matching critical section never touch the map
/// guard.
pub(crate) struct EngineInner {
    pub(crate) books: Mutex<HashMap<PairId, Arc<Mutex<OrderBook>>>>,
    pub(crate) stats: Mutex<HashMap<PairId, TradeStats>>,
    trade_counter: AtomicU64,
    pub(crate) streams: Streams,
}

/// The trading engine
///
/// Cheap to clone; all clones share the same books, statistics and
/// streams. Books are created lazily on the first order for a pair and
/// live for the engine's lifetime.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Create a new engine with empty books and all four streams ready
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EngineInner {
                books: Mutex::new(HashMap::new()),
                stats: Mutex::new(HashMap::new()),
                trade_counter: AtomicU64::new(0),
                streams: Streams::new(),
            }),
        }
    }

    /// Get the book for a pair, creating it on first use
    fn book_for(&self, pair: &PairId) -> Arc<Mutex<OrderBook>> {
        let mut books = self.inner.books.lock().unwrap();
        if let Some(book) = books.get(pair) {
            return Arc::clone(book);
        }
        debug!(pair = %pair, "creating order book");
        let book = Arc::new(Mutex::new(OrderBook::new(pair.clone())));
        books.insert(pair.clone(), Arc::clone(&book));
        book
    }

    /// Submit an order for matching
    ///
    /// Routes the order to its pair's book (creating the book if needed),
    /// runs one matching pass, and forwards every resulting trade and
    /// fill onto the public streams in emission order. Statistics are
    /// updated before each trade becomes visible on the trade stream.
    ///
    /// The book's guard is held until all events are forwarded, so events
    /// of concurrent submissions to the same pair never interleave. If
    /// the trade or fill stream is full this call blocks until consumers
    /// catch up.
    pub fn submit_order(&self, pair: &str, order: Order) {
        let pair = PairId::new(pair);
        let book = self.book_for(&pair);
        let original_qty = order.qty;

        let mut book = book.lock().unwrap();
        let events = book.match_order(order, original_qty);

        for event in events {
            match event {
                BookEvent::Trade(mut trade) => {
                    trade.trade_id = self.next_trade_id();
                    self.record_trade(&trade);
                    trace!(pair = %trade.pair, trade_id = %trade.trade_id, "forwarding trade");
                    if self.inner.streams.trade_tx.send(trade).is_err() {
                        warn!("trade stream disconnected, dropping trade");
                    }
                }
                BookEvent::Fill(fill) => {
                    if self.inner.streams.fill_tx.send(fill).is_err() {
                        warn!("fill stream disconnected, dropping fill");
                    }
                }
            }
        }
    }

    /// Fold a trade into its pair's statistics, creating them on first use
    fn record_trade(&self, trade: &Trade) {
        let mut stats = self.inner.stats.lock().unwrap();
        stats
            .entry(trade.pair.clone())
            .or_default()
            .record(trade.qty, trade.price);
    }

    /// Synchronous depth snapshot for one pair
    ///
    /// Returns `None` if no order has ever been submitted for the pair.
    pub fn get_depth(&self, pair: &str, levels: usize) -> Option<DepthUpdate> {
        let pair = PairId::new(pair);
        let book = {
            let books = self.inner.books.lock().unwrap();
            books.get(&pair).map(Arc::clone)
        }?;
        let trade_count = self.trade_count(&pair);

        let book = book.lock().unwrap();
        Some(DepthUpdate {
            pair,
            bids: book.bid_depth(levels),
            asks: book.ask_depth(levels),
            timestamp: unix_timestamp(),
            trade_count,
        })
    }

    /// Issue the next trade identifier
    ///
    /// Identifiers are of the form `T<n>` with a 1-based counter, strictly
    /// increasing and duplicate-free under concurrent callers.
    pub fn next_trade_id(&self) -> String {
        let n = self.inner.trade_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("T{}", n)
    }

    /// Snapshot of a pair's statistics, `None` before its first trade
    pub fn stats(&self, pair: &str) -> Option<TradeStats> {
        let stats = self.inner.stats.lock().unwrap();
        stats.get(&PairId::new(pair)).cloned()
    }

    /// Number of trades executed for a pair so far
    fn trade_count(&self, pair: &PairId) -> u64 {
        let stats = self.inner.stats.lock().unwrap();
        stats.get(pair).map(|s| s.trade_count).unwrap_or(0)
    }

    /// All pairs with a book, in no particular order
    pub fn pairs(&self) -> Vec<PairId> {
        let books = self.inner.books.lock().unwrap();
        books.keys().cloned().collect()
    }

    /// Receiver for the trade stream
    pub fn trades(&self) -> Receiver<Trade> {
        self.inner.streams.trade_rx.clone()
    }

    /// Receiver for the fill stream
    pub fn fills(&self) -> Receiver<OrderFill> {
        self.inner.streams.fill_rx.clone()
    }

    /// Receiver for the best-price update stream
    pub fn price_updates(&self) -> Receiver<PriceUpdate> {
        self.inner.streams.price_rx.clone()
    }

    /// Receiver for the depth snapshot stream
    pub fn depth_updates(&self) -> Receiver<DepthUpdate> {
        self.inner.streams.depth_rx.clone()
    }

    /// Start the periodic best-price broadcaster
    ///
    /// Publishes a [`PriceUpdate`] per pair every 500ms. Call at most
    /// once; there is no way to stop the broadcaster.
    pub fn start_price_broadcaster(&self) {
        broadcast::spawn_price_broadcaster(Arc::clone(&self.inner));
    }

    /// Start the periodic depth broadcaster
    ///
    /// Publishes a [`DepthUpdate`] per pair with `levels` tiers per side
    /// every 100ms. Call at most once; there is no way to stop the
    /// broadcaster.
    pub fn start_depth_broadcaster(&self, levels: usize) {
        broadcast::spawn_depth_broadcaster(Arc::clone(&self.inner), levels);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
