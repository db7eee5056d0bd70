use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Market Data
// ---------------------------------------------------------------------------

/// A point-in-time view of one symbol's market state: the visible order book,
/// the last trade, and session volume totals.
///
/// Snapshots are produced by the feed-decoding layer and consumed read-only
/// by indicators; a snapshot is never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub symbol: String,
    pub exchange: String,
    pub timestamp: DateTime<Utc>,
    /// Bid price levels, index 0 = best bid.
    pub bid_price: Vec<f64>,
    /// Bid sizes, aligned with `bid_price`.
    pub bid_size: Vec<f64>,
    /// Ask price levels, index 0 = best ask.
    pub ask_price: Vec<f64>,
    /// Ask sizes, aligned with `ask_price`.
    pub ask_size: Vec<f64>,
    pub last_price: f64,
    pub last_size: f64,
    /// Cumulative session volume.
    pub total_volume: f64,
    /// Cumulative session turnover (price x volume).
    pub turnover: f64,
}

impl TickSnapshot {
    pub fn best_bid(&self) -> Option<f64> {
        self.bid_price.first().copied()
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.ask_price.first().copied()
    }

    /// Mid price from the best bid/ask; 0.0 when either book side is empty.
    pub fn mid_price(&self) -> f64 {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => (bid + ask) / 2.0,
            _ => 0.0,
        }
    }

    /// Bid-ask spread; 0.0 when either book side is empty.
    pub fn spread(&self) -> f64 {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => ask - bid,
            _ => 0.0,
        }
    }

    /// Size-weighted mid price. Falls back to the plain mid price when the
    /// top-of-book size is zero, and to 0.0 when either side is empty.
    pub fn weighted_mid_price(&self) -> f64 {
        let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) else {
            return 0.0;
        };
        let bid_size = self.bid_size.first().copied().unwrap_or(0.0);
        let ask_size = self.ask_size.first().copied().unwrap_or(0.0);
        let total = bid_size + ask_size;
        if total == 0.0 {
            return self.mid_price();
        }
        (bid * ask_size + ask * bid_size) / total
    }

    /// (high, low, close) proxy for a single tick: close = mid price,
    /// high = best ask, low = best bid, each clamped around the mid.
    ///
    /// `None` when the book does not yield a positive mid price.
    pub fn pseudo_hlc(&self) -> Option<(f64, f64, f64)> {
        let close = self.mid_price();
        if close <= 0.0 || !close.is_finite() {
            return None;
        }
        let high = self.best_ask().map_or(close, |a| a.max(close));
        let low = self.best_bid().map_or(close, |b| b.min(close));
        Some((high, low, close))
    }

    /// A one-level snapshot with bid = ask = `value` and no sizes.
    ///
    /// Cascaded smoothers feed each stage's output into the next stage
    /// through these synthesized ticks.
    pub fn synthetic(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol: String::new(),
            exchange: String::new(),
            timestamp,
            bid_price: vec![value],
            bid_size: Vec::new(),
            ask_price: vec![value],
            ask_size: Vec::new(),
            last_price: 0.0,
            last_size: 0.0,
            total_volume: 0.0,
            turnover: 0.0,
        }
    }
}
