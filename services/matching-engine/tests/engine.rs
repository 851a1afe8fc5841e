//! Engine integration tests
//!
//! Exercises the public engine surface end to end: order routing, stream
//! delivery, statistics, depth queries, trade identifiers, and the two
//! broadcasters.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use rust_decimal::Decimal;

use matching_engine::Engine;
use types::prelude::*;

const RECV_TIMEOUT: Duration = Duration::from_millis(500);

fn order(id: &str, side: Side, price: u64, qty: &str, timestamp: i64) -> Order {
    Order::new(
        id,
        side,
        Price::from_u64(price),
        qty.parse().unwrap(),
        timestamp,
    )
}

#[test]
fn test_exact_cross_emits_trade_and_fills() {
    let engine = Engine::new();
    let trades = engine.trades();
    let fills = engine.fills();

    engine.submit_order("BTC-USD", order("sell1", Side::SELL, 50000, "1.0", 1));
    // Resting order announced as NEW
    let new_fill = fills.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(new_fill.status, FillStatus::New);
    assert_eq!(new_fill.order_id, "sell1");
    assert!(new_fill.executed_qty.is_zero());
    assert_eq!(new_fill.fill_price, Decimal::ZERO);

    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 50000, "1.0", 2));

    let trade = trades.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(trade.pair, PairId::new("BTC-USD"));
    assert_eq!(trade.buy_order_id, "buy1");
    assert_eq!(trade.sell_order_id, "sell1");
    assert_eq!(trade.price, Price::from_u64(50000));
    assert_eq!(trade.qty, "1.0".parse().unwrap());
    assert_eq!(trade.trade_id, "T1");

    // Resting order's fill first, then the incoming order's
    let sell_fill = fills.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(sell_fill.order_id, "sell1");
    assert_eq!(sell_fill.status, FillStatus::Filled);
    let buy_fill = fills.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(buy_fill.order_id, "buy1");
    assert_eq!(buy_fill.status, FillStatus::Filled);
    assert!(sell_fill.check_invariant());
    assert!(buy_fill.check_invariant());

    // Both sides fully consumed
    let depth = engine.get_depth("BTC-USD", 5).unwrap();
    assert!(depth.bids.is_empty());
    assert!(depth.asks.is_empty());

    let stats = engine.stats("BTC-USD").unwrap();
    assert_eq!(stats.total_qty, Decimal::from(1));
    assert_eq!(stats.total_value, Decimal::from(50000));
    assert_eq!(stats.trade_count, 1);
}

#[test]
fn test_partial_fill_leaves_remainder_resting() {
    let engine = Engine::new();
    let trades = engine.trades();
    let fills = engine.fills();

    engine.submit_order("BTC-USD", order("sell1", Side::SELL, 100, "5.0", 1));
    fills.recv_timeout(RECV_TIMEOUT).unwrap(); // NEW for sell1

    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 100, "2.0", 2));

    let trade = trades.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(trade.qty, "2.0".parse().unwrap());
    assert_eq!(trade.price, Price::from_u64(100));

    let sell_fill = fills.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(sell_fill.order_id, "sell1");
    assert_eq!(sell_fill.status, FillStatus::PartiallyFilled);
    assert_eq!(sell_fill.remaining_qty, "3.0".parse().unwrap());

    let buy_fill = fills.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(buy_fill.status, FillStatus::Filled);

    let depth = engine.get_depth("BTC-USD", 5).unwrap();
    assert_eq!(depth.asks.len(), 1);
    assert_eq!(depth.asks[0].price, Price::from_u64(100));
    assert_eq!(depth.asks[0].quantity, "3.0".parse().unwrap());
}

#[test]
fn test_execution_at_resting_price() {
    let engine = Engine::new();
    let trades = engine.trades();

    // Incoming seller undercuts the resting bid; resting price wins
    engine.submit_order("BTC-USD", order("BUY-1", Side::BUY, 2, "1", 1));
    engine.submit_order("BTC-USD", order("SELL-1", Side::SELL, 1, "1", 2));

    let trade = trades.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(trade.price, Price::from_u64(2));
    assert_eq!(trade.buy_order_id, "BUY-1");
    assert_eq!(trade.sell_order_id, "SELL-1");
}

#[test]
fn test_non_crossing_orders_produce_no_trades_or_stats() {
    let engine = Engine::new();
    let trades = engine.trades();
    let fills = engine.fills();

    engine.submit_order("BTC-USD", order("sell1", Side::SELL, 50100, "1.0", 1));
    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 49900, "1.0", 2));

    // Two NEW fills, nothing else
    for expected in ["sell1", "buy1"] {
        let fill = fills.recv_timeout(RECV_TIMEOUT).unwrap();
        assert_eq!(fill.order_id, expected);
        assert_eq!(fill.status, FillStatus::New);
    }
    assert!(trades.try_recv().is_err());
    assert!(engine.stats("BTC-USD").is_none());

    let depth = engine.get_depth("BTC-USD", 5).unwrap();
    assert_eq!(depth.bids.len(), 1);
    assert_eq!(depth.asks.len(), 1);
    assert_eq!(depth.trade_count, 0);
}

#[test]
fn test_resting_depth_sums_match_submissions() {
    let engine = Engine::new();

    engine.submit_order("BTC-USD", order("b1", Side::BUY, 100, "1.0", 1));
    engine.submit_order("BTC-USD", order("b2", Side::BUY, 100, "2.0", 2));
    engine.submit_order("BTC-USD", order("b3", Side::BUY, 99, "1.5", 3));

    let depth = engine.get_depth("BTC-USD", 5).unwrap();
    assert_eq!(depth.bids.len(), 2);
    assert_eq!(depth.bids[0].price, Price::from_u64(100));
    assert_eq!(depth.bids[0].quantity, "3.0".parse().unwrap());
    assert_eq!(depth.bids[0].order_count, 2);
    assert_eq!(depth.bids[1].price, Price::from_u64(99));
    assert_eq!(depth.bids[1].quantity, "1.5".parse().unwrap());
}

#[test]
fn test_depth_for_unknown_pair_is_absent() {
    let engine = Engine::new();
    assert!(engine.get_depth("NO-SUCH-PAIR", 5).is_none());
}

#[test]
fn test_multi_level_sweep_statistics_and_vwap() {
    let engine = Engine::new();
    let trades = engine.trades();

    engine.submit_order("BTC-USD", order("sell1", Side::SELL, 105, "1", 1));
    engine.submit_order("BTC-USD", order("sell2", Side::SELL, 104, "2", 2));
    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 110, "2.5", 3));

    let first = trades.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(first.price, Price::from_u64(104));
    assert_eq!(first.qty, "2".parse().unwrap());
    let second = trades.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(second.price, Price::from_u64(105));
    assert_eq!(second.qty, "0.5".parse().unwrap());

    let stats = engine.stats("BTC-USD").unwrap();
    assert_eq!(stats.trade_count, 2);
    assert_eq!(stats.total_qty, Decimal::from_str_exact("2.5").unwrap());
    // 2 * 104 + 0.5 * 105 = 260.5
    assert_eq!(stats.total_value, Decimal::from_str_exact("260.5").unwrap());
    assert_eq!(stats.vwap(), stats.total_value / stats.total_qty);
}

#[test]
fn test_multiple_pairs_are_isolated() {
    let engine = Engine::new();
    let trades = engine.trades();

    for (i, pair) in ["BTC-USD", "ETH-USD", "LTC-USD"].iter().enumerate() {
        let price = 1000 * (i as u64 + 1);
        engine.submit_order(pair, order(&format!("sell-{pair}"), Side::SELL, price, "1.0", 1));
        engine.submit_order(pair, order(&format!("buy-{pair}"), Side::BUY, price, "1.0", 2));
    }

    let mut seen = HashSet::new();
    for _ in 0..3 {
        let trade = trades.recv_timeout(RECV_TIMEOUT).unwrap();
        seen.insert(trade.pair.as_str().to_string());
    }
    assert_eq!(seen.len(), 3);

    for pair in ["BTC-USD", "ETH-USD", "LTC-USD"] {
        assert_eq!(engine.stats(pair).unwrap().trade_count, 1);
        assert!(engine.get_depth(pair, 5).is_some());
    }
}

#[test]
fn test_trade_ids_unique_under_concurrency() {
    let engine = Engine::new();
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 100;

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let engine = engine.clone();
            thread::spawn(move || {
                (0..IDS_PER_THREAD)
                    .map(|_| engine.next_trade_id())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all.insert(id.clone()), "duplicate trade id {id}");
        }
    }

    assert_eq!(all.len(), THREADS * IDS_PER_THREAD);
    // The ids cover exactly 1..=N*M
    for n in 1..=THREADS * IDS_PER_THREAD {
        assert!(all.contains(&format!("T{n}")));
    }
}

#[test]
fn test_concurrent_submissions_across_pairs() {
    let engine = Engine::new();
    let trades = engine.trades();
    const PAIRS: usize = 4;
    const ROUNDS: usize = 25;

    let handles: Vec<_> = (0..PAIRS)
        .map(|p| {
            let engine = engine.clone();
            thread::spawn(move || {
                let pair = format!("PAIR-{p}");
                for i in 0..ROUNDS {
                    let ts = i as i64;
                    engine.submit_order(
                        &pair,
                        order(&format!("s-{p}-{i}"), Side::SELL, 50000, "1.0", ts),
                    );
                    engine.submit_order(
                        &pair,
                        order(&format!("b-{p}-{i}"), Side::BUY, 50000, "1.0", ts + 1),
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut per_pair: Vec<u64> = Vec::new();
    for p in 0..PAIRS {
        let stats = engine.stats(&format!("PAIR-{p}")).unwrap();
        per_pair.push(stats.trade_count);
    }
    assert!(per_pair.iter().all(|&count| count == ROUNDS as u64));

    let mut delivered = 0;
    while trades.try_recv().is_ok() {
        delivered += 1;
    }
    assert_eq!(delivered, PAIRS * ROUNDS);
}

#[test]
fn test_price_broadcaster_publishes_best_prices() {
    let engine = Engine::new();
    let prices = engine.price_updates();

    engine.submit_order("BTC-USD", order("sell1", Side::SELL, 50100, "1.0", 1));
    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 49900, "1.0", 2));

    engine.start_price_broadcaster();

    let update = prices.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(update.pair, PairId::new("BTC-USD"));
    assert_eq!(update.best_bid, Decimal::from(49900));
    assert_eq!(update.best_ask, Decimal::from(50100));
    // No trades yet
    assert_eq!(update.avg_price, Decimal::ZERO);
}

#[test]
fn test_price_broadcaster_reports_vwap() {
    let engine = Engine::new();
    let prices = engine.price_updates();

    engine.submit_order("BTC-USD", order("sell1", Side::SELL, 50000, "2.0", 1));
    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 50000, "1.0", 2));

    engine.start_price_broadcaster();

    let update = prices.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(update.avg_price, Decimal::from(50000));
    // Half the sell is still resting
    assert_eq!(update.best_ask, Decimal::from(50000));
    assert_eq!(update.best_bid, Decimal::ZERO);
}

#[test]
fn test_depth_broadcaster_publishes_snapshots() {
    let engine = Engine::new();
    let depths = engine.depth_updates();

    engine.submit_order("BTC-USD", order("sell1", Side::SELL, 50000, "1.0", 1));
    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 49900, "1.0", 2));

    engine.start_depth_broadcaster(5);

    let update = depths.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(update.pair, PairId::new("BTC-USD"));
    assert_eq!(update.bids.len(), 1);
    assert_eq!(update.asks.len(), 1);
    assert!(update.timestamp > 0);
    assert_eq!(update.trade_count, 0);
}

#[test]
fn test_broadcasters_do_not_block_without_consumers() {
    let engine = Engine::new();

    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 100, "1.0", 1));
    engine.start_price_broadcaster();
    engine.start_depth_broadcaster(5);

    // Nothing consumes price/depth updates; submissions must keep working
    thread::sleep(Duration::from_millis(400));
    engine.submit_order("BTC-USD", order("buy2", Side::BUY, 101, "1.0", 2));

    let depth = engine.get_depth("BTC-USD", 5).unwrap();
    assert_eq!(depth.bids.len(), 2);
}

#[test]
fn test_fill_quantities_reconcile_per_order() {
    let engine = Engine::new();
    let fills = engine.fills();

    engine.submit_order("BTC-USD", order("sell1", Side::SELL, 100, "1", 1));
    engine.submit_order("BTC-USD", order("sell2", Side::SELL, 101, "2", 2));
    engine.submit_order("BTC-USD", order("buy1", Side::BUY, 101, "2.5", 3));

    let mut executed_for_buy = Decimal::ZERO;
    while let Ok(fill) = fills.try_recv() {
        assert!(fill.check_invariant());
        if fill.order_id == "buy1" {
            executed_for_buy += fill.executed_qty.as_decimal();
        }
    }
    assert_eq!(executed_for_buy, Decimal::from_str_exact("2.5").unwrap());
}
