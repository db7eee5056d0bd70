use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Kaufman Adaptive Moving Average.
///
/// Each tick computes an efficiency ratio — net price change divided by
/// total absolute movement over the window — and maps it into a smoothing
/// constant between the slow and fast bounds:
///
/// `sc = (er * (fast_sc - slow_sc) + slow_sc)^2`
///
/// The recurrence then follows the usual exponential update with this
/// tick-varying constant: fast in trending markets, slow in choppy ones.
#[derive(Debug, Clone)]
pub struct Kama {
    period: usize,
    fast_sc: f64,
    slow_sc: f64,
    prices: RollingWindow,
    kama: f64,
    initialized: bool,
    history: History,
}

impl Kama {
    pub fn new(period: usize, fast_period: usize, slow_period: usize, max_history: usize) -> Self {
        Self {
            period,
            fast_sc: 2.0 / (fast_period as f64 + 1.0),
            slow_sc: 2.0 / (slow_period as f64 + 1.0),
            // period + 1 prices span `period` price changes.
            prices: RollingWindow::new(period + 1),
            kama: 0.0,
            initialized: false,
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (10), `fast_period` (2), `slow_period` (30) —
    /// non-positive values clamp to their defaults — and `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.clamped_usize("period", 10);
        let fast_period = cfg.clamped_usize("fast_period", 2);
        let slow_period = cfg.clamped_usize("slow_period", 30);
        Ok(Self::new(period, fast_period, slow_period, cfg.max_history()))
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Efficiency ratio over the current window, in [0, 1]. Zero total
    /// volatility resolves to 0 (maximally choppy).
    pub fn efficiency_ratio(&self) -> f64 {
        if !self.prices.is_full() {
            return 0.0;
        }
        let first = self.prices.first().unwrap_or(0.0);
        let last = self.prices.last().unwrap_or(0.0);
        let change = (last - first).abs();
        let volatility: f64 = self
            .prices
            .iter()
            .zip(self.prices.iter().skip(1))
            .map(|(a, b)| (b - a).abs())
            .sum();
        if volatility > 0.0 {
            change / volatility
        } else {
            0.0
        }
    }
}

impl Indicator for Kama {
    fn update(&mut self, tick: &TickSnapshot) {
        let price = tick.mid_price();
        if price <= 0.0 || !price.is_finite() {
            return;
        }

        self.prices.push(price);

        if !self.initialized {
            if !self.prices.is_full() {
                return;
            }
            self.kama = self.prices.first().unwrap_or(price);
            self.initialized = true;
        }

        let er = self.efficiency_ratio();
        let sc = er * (self.fast_sc - self.slow_sc) + self.slow_sc;
        let sc = sc * sc;
        self.kama += sc * (price - self.kama);
        self.history.push(self.kama);
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.initialized && self.prices.is_full()
    }

    fn reset(&mut self) {
        self.prices.clear();
        self.kama = 0.0;
        self.initialized = false;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "KAMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::feed;

    #[test]
    fn warm_up_needs_period_plus_one() {
        let mut kama = Kama::new(3, 2, 30, 100);
        feed(&mut kama, &[100.0, 101.0, 102.0]);
        assert!(!kama.ready());
        assert_eq!(kama.value(), 0.0);
        feed(&mut kama, &[103.0]);
        assert!(kama.ready());
    }

    #[test]
    fn efficiency_ratio_is_one_in_a_clean_trend() {
        let mut kama = Kama::new(4, 2, 30, 100);
        feed(&mut kama, &[100.0, 101.0, 102.0, 103.0, 104.0]);
        assert!((kama.efficiency_ratio() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_volatility_means_zero_ratio() {
        let mut kama = Kama::new(3, 2, 30, 100);
        feed(&mut kama, &[100.0; 6]);
        assert_eq!(kama.efficiency_ratio(), 0.0);
        // The recurrence still holds at the price level.
        assert!((kama.value() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn adapts_faster_in_trends_than_in_chop() {
        let trend: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let mut trending = Kama::new(5, 2, 30, 100);
        feed(&mut trending, &trend);

        let chop: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 100.0 } else { 130.0 })
            .collect();
        let mut choppy = Kama::new(5, 2, 30, 100);
        feed(&mut choppy, &chop);

        // In the trend KAMA stays close to the latest price; in chop it
        // barely moves away from its seed.
        assert!((trending.value() - 129.0).abs() < 5.0);
        let chop_mid = 115.0;
        assert!((choppy.value() - chop_mid).abs() > 5.0);
    }

    #[test]
    fn nonpositive_config_values_clamp() {
        let cfg = IndicatorConfig::new()
            .with("period", -5)
            .with("fast_period", 0);
        let kama = Kama::from_config(&cfg).unwrap();
        assert_eq!(kama.period(), 10);
        assert!((kama.fast_sc - 2.0 / 3.0).abs() < 1e-12);
    }
}
