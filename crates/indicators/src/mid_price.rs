use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Best-bid/ask mid price, recorded per tick.
#[derive(Debug, Clone)]
pub struct MidPrice {
    history: History,
}

impl MidPrice {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: History::new(max_history),
        }
    }

    /// Config keys: `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        Ok(Self::new(cfg.max_history()))
    }
}

impl Indicator for MidPrice {
    fn update(&mut self, tick: &TickSnapshot) {
        let mid = tick.mid_price();
        if mid <= 0.0 || !mid.is_finite() {
            return;
        }
        self.history.push(mid);
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        !self.history.is_empty()
    }

    fn reset(&mut self) {
        self.history.reset();
    }

    fn name(&self) -> &str {
        "MidPrice"
    }
}

/// Size-weighted mid price: the fair price implied by top-of-book
/// imbalance. Falls back to the plain mid when the book carries no size.
#[derive(Debug, Clone)]
pub struct WeightedMidPrice {
    history: History,
}

impl WeightedMidPrice {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: History::new(max_history),
        }
    }

    /// Config keys: `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        Ok(Self::new(cfg.max_history()))
    }
}

impl Indicator for WeightedMidPrice {
    fn update(&mut self, tick: &TickSnapshot) {
        let wmid = tick.weighted_mid_price();
        if wmid <= 0.0 || !wmid.is_finite() {
            return;
        }
        self.history.push(wmid);
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        !self.history.is_empty()
    }

    fn reset(&mut self) {
        self.history.reset();
    }

    fn name(&self) -> &str {
        "WeightedMidPrice"
    }
}
