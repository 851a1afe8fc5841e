//! Multi-asset limit-order matching engine with market data streaming
//!
//! Manages one order book per trading pair, matches limit orders under
//! price-time priority, and distributes executions over four bounded
//! streams: trades, fills, best-price updates, and depth snapshots.
//!
//! Trades and fills are the source of record; their streams block the
//! producer when full. Price and depth updates are best-effort snapshots
//! produced by periodic broadcasters; their streams drop the newest
//! update rather than ever blocking a broadcaster.
//!
//! # Example
//!
//! ```no_run
//! use matching_engine::Engine;
//! use types::prelude::*;
//!
//! let engine = Engine::new();
//! engine.start_price_broadcaster();
//! engine.start_depth_broadcaster(10);
//!
//! let trades = engine.trades();
//! std::thread::spawn(move || {
//!     for trade in trades.iter() {
//!         println!("trade: {:?}", trade);
//!     }
//! });
//!
//! let order = Order::new("order1", Side::BUY, Price::from_u64(50000), Quantity::from_u64(1), 1708123456);
//! engine.submit_order("BTC-USD", order);
//! ```

pub mod book;
pub mod engine;
pub mod events;
pub mod stats;

mod broadcast;
mod clock;

pub use engine::Engine;
