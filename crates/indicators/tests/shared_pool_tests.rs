//! Shared-pool behavior under concurrency: one registry per symbol, and
//! at-most-once evaluation per tick while readers run alongside the
//! dispatch thread.

use std::sync::Arc;
use std::thread;

use chrono::{Duration, TimeZone, Utc};
use tickwise_core::TickSnapshot;
use tickwise_indicators::{Indicator, IndicatorConfig, SharedIndicatorPool};

fn tick_at(mid: f64, seq: i64) -> TickSnapshot {
    TickSnapshot {
        symbol: "TEST".into(),
        exchange: "SIM".into(),
        timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seq),
        bid_price: vec![mid - 0.5],
        bid_size: vec![100.0],
        ask_price: vec![mid + 0.5],
        ask_size: vec![100.0],
        last_price: mid,
        last_size: 1.0,
        total_volume: 1000.0 + seq as f64,
        turnover: 0.0,
    }
}

#[test]
fn concurrent_get_or_create_observes_one_registry() {
    let pool = Arc::new(SharedIndicatorPool::new());

    let registries: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                scope.spawn(move || pool.get_or_create("AAPL"))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = &registries[0];
    for other in &registries[1..] {
        assert!(Arc::ptr_eq(first, other));
    }
    assert_eq!(pool.symbols().len(), 1);
}

#[test]
fn one_evaluation_per_tick_with_concurrent_readers() {
    let pool = Arc::new(SharedIndicatorPool::new());
    pool.initialize_defaults("BTCUSDT", &IndicatorConfig::new())
        .unwrap();
    pool.get_or_create("BTCUSDT")
        .create("mid", "mid_price", &IndicatorConfig::new())
        .unwrap();

    const TICKS: usize = 200;

    thread::scope(|scope| {
        // Single dispatch thread: ticks for one symbol arrive serialized.
        let writer_pool = Arc::clone(&pool);
        scope.spawn(move || {
            for i in 0..TICKS {
                writer_pool.update_all("BTCUSDT", &tick_at(100.0 + i as f64 * 0.1, i as i64));
            }
        });

        // Strategy readers hammer the pool while the writer runs.
        for _ in 0..4 {
            let reader_pool = Arc::clone(&pool);
            scope.spawn(move || {
                for _ in 0..500 {
                    let lib = reader_pool.get_or_create("BTCUSDT");
                    let snapshot = lib.all_values();
                    // Values are never NaN, regardless of interleaving.
                    for (name, value) in snapshot {
                        assert!(value.is_finite(), "{name} produced a non-finite value");
                    }
                    if let Some(mid) = reader_pool.get_indicator("BTCUSDT", "mid") {
                        let _ = mid.read().value();
                    }
                }
            });
        }
    });

    // Exactly one history entry per dispatched tick: nothing duplicated,
    // nothing dropped.
    let mid = pool.get_indicator("BTCUSDT", "mid").unwrap();
    assert_eq!(mid.read().values().len(), TICKS);
}

#[test]
fn consumers_share_identical_computed_values() {
    let pool = SharedIndicatorPool::new();
    pool.initialize_defaults("ETHUSDT", &IndicatorConfig::new())
        .unwrap();

    for i in 0..50 {
        pool.update_all("ETHUSDT", &tick_at(2000.0 + i as f64, i));
    }

    // Two independent consumers resolve the same instance, not copies.
    let a = pool.get_indicator("ETHUSDT", "vwap").unwrap();
    let b = pool.get_indicator("ETHUSDT", "vwap").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.read().value(), b.read().value());
}
