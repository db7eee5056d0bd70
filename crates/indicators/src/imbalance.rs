use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Order book imbalance over the top `levels` levels, normalized to
/// [-1, 1]: +1 means all resting size is on the bid, -1 all on the ask.
///
/// Zero total volume resolves to the neutral 0.
#[derive(Debug, Clone)]
pub struct OrderImbalance {
    levels: usize,
    volume_weight: bool,
    history: History,
}

impl OrderImbalance {
    pub fn new(levels: usize, volume_weight: bool, max_history: usize) -> Self {
        Self {
            levels,
            volume_weight,
            history: History::new(max_history),
        }
    }

    /// Config keys: `levels` (default 5, must be positive),
    /// `volume_weight` (default true), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let levels = cfg.positive_usize("levels", 5)?;
        let volume_weight = cfg.bool_or("volume_weight", true);
        Ok(Self::new(levels, volume_weight, cfg.max_history()))
    }

    fn volume_imbalance(&self, tick: &TickSnapshot) -> f64 {
        let depth = self
            .levels
            .min(tick.bid_size.len())
            .min(tick.ask_size.len());
        let bid: f64 = tick.bid_size.iter().take(depth).sum();
        let ask: f64 = tick.ask_size.iter().take(depth).sum();
        let total = bid + ask;
        if total == 0.0 {
            return 0.0;
        }
        (bid - ask) / total
    }

    fn level_imbalance(&self, tick: &TickSnapshot) -> f64 {
        let bid = tick.bid_price.len().min(self.levels) as f64;
        let ask = tick.ask_price.len().min(self.levels) as f64;
        let total = bid + ask;
        if total == 0.0 {
            return 0.0;
        }
        (bid - ask) / total
    }
}

impl Indicator for OrderImbalance {
    fn update(&mut self, tick: &TickSnapshot) {
        if tick.bid_price.is_empty() || tick.ask_price.is_empty() {
            return;
        }
        let imbalance = if self.volume_weight {
            self.volume_imbalance(tick)
        } else {
            self.level_imbalance(tick)
        };
        self.history.push(imbalance);
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
        "OrderImbalance"
    }
}

/// Depth-weighted buy/sell pressure over the top `levels` levels.
///
/// Level weights decay geometrically with distance from the top of the
/// book; `value()` is the net pressure (buy - sell). The side pressures
/// and their ratio are exposed for concurrent readers.
#[derive(Debug, Clone)]
pub struct BookPressure {
    levels: usize,
    weight_decay: f64,
    use_volume: bool,
    buy_pressure: f64,
    sell_pressure: f64,
    history: History,
}

impl BookPressure {
    pub fn new(levels: usize, weight_decay: f64, use_volume: bool, max_history: usize) -> Self {
        let weight_decay = if weight_decay <= 0.0 || weight_decay > 1.0 {
            0.9
        } else {
            weight_decay
        };
        Self {
            levels,
            weight_decay,
            use_volume,
            buy_pressure: 0.0,
            sell_pressure: 0.0,
            history: History::new(max_history),
        }
    }

    /// Config keys: `levels` (default 5, non-positive clamps),
    /// `weight_decay` (default 0.9, out-of-range clamps), `use_volume`
    /// (default true), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let levels = cfg.clamped_usize("levels", 5);
        let weight_decay = cfg.f64_or("weight_decay", 0.9);
        let use_volume = cfg.bool_or("use_volume", true);
        Ok(Self::new(levels, weight_decay, use_volume, cfg.max_history()))
    }

    fn side_pressure(&self, sizes: &[f64]) -> f64 {
        let mut pressure = 0.0;
        let mut weight = 1.0;
        for size in sizes.iter().take(self.levels) {
            pressure += if self.use_volume { size * weight } else { weight };
            weight *= self.weight_decay;
        }
        pressure
    }

    pub fn buy_pressure(&self) -> f64 {
        self.buy_pressure
    }

    pub fn sell_pressure(&self) -> f64 {
        self.sell_pressure
    }

    pub fn net_pressure(&self) -> f64 {
        self.buy_pressure - self.sell_pressure
    }

    /// Buy/sell ratio; a one-sided book resolves to a large positive
    /// sentinel, an empty one to the neutral 1.
    pub fn pressure_ratio(&self) -> f64 {
        if self.sell_pressure > 0.0 {
            self.buy_pressure / self.sell_pressure
        } else if self.buy_pressure > 0.0 {
            999.0
        } else {
            1.0
        }
    }
}

impl Indicator for BookPressure {
    fn update(&mut self, tick: &TickSnapshot) {
        if tick.bid_size.is_empty() && tick.ask_size.is_empty() {
            return;
        }
        self.buy_pressure = self.side_pressure(&tick.bid_size);
        self.sell_pressure = self.side_pressure(&tick.ask_size);
        self.history.push(self.net_pressure());
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
        self.buy_pressure = 0.0;
        self.sell_pressure = 0.0;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "BookPressure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{book, empty_tick};

    #[test]
    fn balanced_book_is_neutral() {
        let mut oi = OrderImbalance::new(5, true, 100);
        oi.update(&book(&[(100.0, 50.0)], &[(101.0, 50.0)]));
        assert!(oi.value().abs() < 1e-12);
    }

    #[test]
    fn bid_heavy_book_is_positive() {
        let mut oi = OrderImbalance::new(5, true, 100);
        oi.update(&book(
            &[(100.0, 90.0), (99.0, 90.0)],
            &[(101.0, 10.0), (102.0, 10.0)],
        ));
        assert!((oi.value() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn zero_size_book_resolves_to_zero() {
        let mut oi = OrderImbalance::new(5, true, 100);
        oi.update(&book(&[(100.0, 0.0)], &[(101.0, 0.0)]));
        assert_eq!(oi.value(), 0.0);
        assert!(oi.ready());
    }

    #[test]
    fn empty_book_is_a_no_op() {
        let mut oi = OrderImbalance::new(5, true, 100);
        oi.update(&empty_tick());
        assert!(!oi.ready());
    }

    #[test]
    fn levels_must_be_positive() {
        let cfg = IndicatorConfig::new().with("levels", 0);
        assert!(OrderImbalance::from_config(&cfg).is_err());
    }

    #[test]
    fn pressure_weights_decay_with_depth() {
        let mut bp = BookPressure::new(2, 0.5, true, 100);
        bp.update(&book(
            &[(100.0, 100.0), (99.0, 100.0), (98.0, 999.0)],
            &[(101.0, 40.0), (102.0, 40.0)],
        ));
        // Bids: 100 + 100*0.5 = 150 (third level beyond `levels` ignored).
        // Asks: 40 + 40*0.5 = 60.
        assert!((bp.buy_pressure() - 150.0).abs() < 1e-9);
        assert!((bp.sell_pressure() - 60.0).abs() < 1e-9);
        assert!((bp.value() - 90.0).abs() < 1e-9);
        assert!((bp.pressure_ratio() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn one_sided_pressure_ratio_saturates() {
        let mut bp = BookPressure::new(5, 0.9, true, 100);
        bp.update(&book(&[(100.0, 10.0)], &[]));
        assert!((bp.pressure_ratio() - 999.0).abs() < 1e-12);
    }
}
