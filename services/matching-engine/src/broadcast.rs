//! Periodic market data broadcasters
//!
//! Two detached background threads walk all books at fixed intervals and
//! publish best-price and depth snapshots. Both publish with `try_send`
//! and drop the update when the stream is full: a slow or absent consumer
//! must never stall a broadcaster.
//!
//! Guard discipline: the books map guard is taken only to snapshot the
//! list of books and released before any book guard is taken. A published
//! update may therefore describe a book state that has since changed.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use types::depth::{DepthUpdate, PriceUpdate};
use types::ids::PairId;

use crate::book::OrderBook;
use crate::clock::unix_timestamp;
use crate::engine::EngineInner;

/// Interval between best-price broadcasts
const PRICE_INTERVAL: Duration = Duration::from_millis(500);
/// Interval between depth broadcasts
const DEPTH_INTERVAL: Duration = Duration::from_millis(100);

type BookList = Vec<(PairId, Arc<std::sync::Mutex<OrderBook>>)>;

/// Snapshot the pair -> book list under the map guard, then release it
fn snapshot_books(inner: &EngineInner) -> BookList {
    let books = inner.books.lock().unwrap();
    books
        .iter()
        .map(|(pair, book)| (pair.clone(), Arc::clone(book)))
        .collect()
}

/// Spawn the best-price broadcaster thread
pub(crate) fn spawn_price_broadcaster(inner: Arc<EngineInner>) {
    debug!("starting price broadcaster");
    thread::spawn(move || loop {
        for (pair, book) in snapshot_books(&inner) {
            let (best_bid, best_ask) = {
                let book = book.lock().unwrap();
                (book.best_bid(), book.best_ask())
            };
            let avg_price = {
                let stats = inner.stats.lock().unwrap();
                stats.get(&pair).map(|s| s.vwap()).unwrap_or(Decimal::ZERO)
            };

            let update = PriceUpdate {
                pair,
                best_bid: best_bid.map(|p| p.as_decimal()).unwrap_or(Decimal::ZERO),
                best_ask: best_ask.map(|p| p.as_decimal()).unwrap_or(Decimal::ZERO),
                avg_price,
            };

            if inner.streams.price_tx.try_send(update).is_err() {
                trace!("price stream full, dropping update");
            }
        }

        thread::sleep(PRICE_INTERVAL);
    });
}

/// Spawn the depth broadcaster thread
pub(crate) fn spawn_depth_broadcaster(inner: Arc<EngineInner>, levels: usize) {
    debug!(levels, "starting depth broadcaster");
    thread::spawn(move || loop {
        for (pair, book) in snapshot_books(&inner) {
            let trade_count = {
                let stats = inner.stats.lock().unwrap();
                stats.get(&pair).map(|s| s.trade_count).unwrap_or(0)
            };

            let update = {
                let book = book.lock().unwrap();
                DepthUpdate {
                    pair,
                    bids: book.bid_depth(levels),
                    asks: book.ask_depth(levels),
                    timestamp: unix_timestamp(),
                    trade_count,
                }
            };

            if inner.streams.depth_tx.try_send(update).is_err() {
                trace!("depth stream full, dropping update");
            }
        }

        thread::sleep(DEPTH_INTERVAL);
    });
}
