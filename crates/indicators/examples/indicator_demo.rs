//! Feeds a synthetic tick stream through a shared pool and prints the
//! resulting indicator values.
//!
//! Run with `cargo run -p tickwise-indicators --example indicator_demo`.

use chrono::{Duration, TimeZone, Utc};
use tickwise_core::TickSnapshot;
use tickwise_indicators::{IndicatorConfig, SharedIndicatorPool};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pool = SharedIndicatorPool::new();
    pool.initialize_defaults("BTCUSDT", &IndicatorConfig::new())
        .expect("seed default indicators");

    let lib = pool.get_or_create("BTCUSDT");
    lib.create("sma_20", "sma", &IndicatorConfig::new().with("period", 20))
        .expect("create sma");
    lib.create("kama_10", "kama", &IndicatorConfig::new())
        .expect("create kama");
    lib.create("psar", "psar", &IndicatorConfig::new())
        .expect("create psar");

    let start = Utc.with_ymd_and_hms(2024, 3, 11, 9, 30, 0).unwrap();
    for i in 0..200i64 {
        let drift = i as f64 * 0.25;
        let wave = (i as f64 * 0.3).sin() * 10.0;
        let mid = 50_000.0 + drift + wave;
        let tick = TickSnapshot {
            symbol: "BTCUSDT".into(),
            exchange: "SIM".into(),
            timestamp: start + Duration::seconds(i),
            bid_price: vec![mid - 0.5, mid - 1.0],
            bid_size: vec![120.0, 80.0],
            ask_price: vec![mid + 0.5, mid + 1.0],
            ask_size: vec![100.0, 90.0],
            last_price: mid,
            last_size: 2.0,
            total_volume: 10_000.0 + i as f64 * 25.0,
            turnover: 0.0,
        };
        pool.update_all("BTCUSDT", &tick);
    }

    let mut values: Vec<_> = lib.all_values().into_iter().collect();
    values.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in values {
        println!("{name:>16}: {value:.4}");
    }

    for (symbol, count) in pool.stats() {
        println!("{symbol}: {count} shared indicators");
    }
}
