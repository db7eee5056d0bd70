pub mod config;
pub mod error;
pub mod history;
pub mod pool;
pub mod registry;
pub mod window;

pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ewma;
pub mod imbalance;
pub mod kama;
pub mod macd;
pub mod mid_price;
pub mod momentum;
pub mod psar;
pub mod quote_slope;
pub mod rsi;
pub mod sma;
pub mod spread;
pub mod stddev;
pub mod stochastic;
pub mod supertrend;
pub mod t3;
pub mod tema;
pub mod volatility;
pub mod vwap;
pub mod williams_r;
pub mod wma;

pub use config::IndicatorConfig;
pub use error::IndicatorError;
pub use history::History;
pub use pool::SharedIndicatorPool;
pub use registry::{IndicatorLibrary, SharedIndicator};

use tickwise_core::TickSnapshot;

/// Trait for streaming (incremental) indicators.
///
/// Feed one [`TickSnapshot`] at a time; the indicator maintains bounded
/// internal state and records each computed value in its history buffer.
pub trait Indicator: Send + Sync {
    /// Process the next tick and advance the recurrence state.
    ///
    /// Malformed ticks (empty book side, non-positive price where a price is
    /// required) are absorbed as a silent no-op so that a single feed glitch
    /// never propagates a failure into a live update loop.
    fn update(&mut self, tick: &TickSnapshot);

    /// The current value. Returns 0.0 until [`ready`](Indicator::ready).
    fn value(&self) -> f64;

    /// Snapshot of the retained value history, oldest first.
    fn values(&self) -> Vec<f64>;

    /// Whether enough observations have been absorbed to produce output.
    /// Once true, stays true until [`reset`](Indicator::reset).
    fn ready(&self) -> bool;

    /// Restore the freshly-constructed state, keeping configuration.
    fn reset(&mut self);

    /// The indicator type name (e.g. "EWMA"), shared by all instances of
    /// the same formula.
    fn name(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tickwise_core::TickSnapshot;

    pub fn base_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    /// A one-level book centred on `mid` with a one-unit spread.
    pub fn tick(mid: f64) -> TickSnapshot {
        tick_at(mid, base_time())
    }

    pub fn tick_at(mid: f64, timestamp: DateTime<Utc>) -> TickSnapshot {
        TickSnapshot {
            symbol: "TEST".into(),
            exchange: "SIM".into(),
            timestamp,
            bid_price: vec![mid - 0.5],
            bid_size: vec![100.0],
            ask_price: vec![mid + 0.5],
            ask_size: vec![100.0],
            last_price: mid,
            last_size: 1.0,
            total_volume: 1000.0,
            turnover: 0.0,
        }
    }

    /// A full book snapshot with explicit levels.
    pub fn book(bids: &[(f64, f64)], asks: &[(f64, f64)]) -> TickSnapshot {
        TickSnapshot {
            symbol: "TEST".into(),
            exchange: "SIM".into(),
            timestamp: base_time(),
            bid_price: bids.iter().map(|(p, _)| *p).collect(),
            bid_size: bids.iter().map(|(_, s)| *s).collect(),
            ask_price: asks.iter().map(|(p, _)| *p).collect(),
            ask_size: asks.iter().map(|(_, s)| *s).collect(),
            last_price: 0.0,
            last_size: 0.0,
            total_volume: 0.0,
            turnover: 0.0,
        }
    }

    /// A tick with no book at all, for malformed-input tests.
    pub fn empty_tick() -> TickSnapshot {
        book(&[], &[])
    }

    /// Sequential ticks walking through `mids`, one second apart.
    pub fn feed(indicator: &mut dyn super::Indicator, mids: &[f64]) {
        for (i, mid) in mids.iter().enumerate() {
            let ts = base_time() + Duration::seconds(i as i64);
            indicator.update(&tick_at(*mid, ts));
        }
    }
}
