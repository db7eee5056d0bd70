use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Weighted Moving Average of the mid price.
///
/// Weights rise linearly with recency: the oldest price in the window has
/// weight 1, the newest has weight `period`.
#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
    weight_sum: f64,
    window: RollingWindow,
    history: History,
}

impl Wma {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            period,
            // 1 + 2 + ... + period
            weight_sum: (period * (period + 1)) as f64 / 2.0,
            window: RollingWindow::new(period),
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 20, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 20)?;
        Ok(Self::new(period, cfg.max_history()))
    }

    pub fn period(&self) -> usize {
        self.period
    }

    fn weighted_mean(&self) -> f64 {
        let weighted: f64 = self
            .window
            .iter()
            .enumerate()
            .map(|(i, price)| price * (i + 1) as f64)
            .sum();
        weighted / self.weight_sum
    }
}

impl Indicator for Wma {
    fn update(&mut self, tick: &TickSnapshot) {
        let mid = tick.mid_price();
        if mid <= 0.0 || !mid.is_finite() {
            return;
        }
        self.window.push(mid);
        if self.window.is_full() {
            self.history.push(self.weighted_mean());
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.window.is_full()
    }

    fn reset(&mut self) {
        self.window.clear();
        self.history.reset();
    }

    fn name(&self) -> &str {
        "WMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::feed;

    #[test]
    fn weights_favour_recent_prices() {
        let mut wma = Wma::new(3, 100);
        feed(&mut wma, &[10.0, 20.0, 30.0]);
        // (10*1 + 20*2 + 30*3) / 6 = 23.333...
        assert!((wma.value() - 140.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn not_ready_until_window_filled() {
        let mut wma = Wma::new(4, 100);
        feed(&mut wma, &[10.0, 20.0, 30.0]);
        assert!(!wma.ready());
        assert_eq!(wma.value(), 0.0);
    }
}
