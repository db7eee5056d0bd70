use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Simple Moving Average of the mid price.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: RollingWindow,
    history: History,
}

impl Sma {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            period,
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
}

impl Indicator for Sma {
    fn update(&mut self, tick: &TickSnapshot) {
        let mid = tick.mid_price();
        if mid <= 0.0 || !mid.is_finite() {
            return;
        }
        self.window.push(mid);
        if self.window.is_full() {
            self.history.push(self.window.mean());
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
        "SMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{empty_tick, feed, tick};

    #[test]
    fn partial_window_produces_no_output() {
        let mut sma = Sma::new(3, 100);
        feed(&mut sma, &[100.0, 110.0]);
        assert!(!sma.ready());
        assert_eq!(sma.value(), 0.0);
        assert!(sma.values().is_empty());
    }

    #[test]
    fn full_window_mean() {
        let mut sma = Sma::new(3, 100);
        feed(&mut sma, &[100.0, 110.0, 120.0]);
        assert!(sma.ready());
        assert!((sma.value() - 110.0).abs() < 1e-9);

        // Window slides: [110, 120, 130].
        sma.update(&tick(130.0));
        assert!((sma.value() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_tick_is_a_no_op() {
        let mut sma = Sma::new(2, 100);
        feed(&mut sma, &[100.0, 102.0]);
        let before = sma.value();
        sma.update(&empty_tick());
        assert_eq!(sma.value(), before);
        assert!(sma.ready());
    }

    #[test]
    fn reset_then_refeed_reproduces_output() {
        let mut sma = Sma::new(3, 100);
        feed(&mut sma, &[100.0, 110.0, 120.0, 115.0]);
        let first_run = sma.values();
        sma.reset();
        assert!(!sma.ready());
        assert_eq!(sma.value(), 0.0);
        feed(&mut sma, &[100.0, 110.0, 120.0, 115.0]);
        assert_eq!(sma.values(), first_run);
    }

    #[test]
    fn config_validation() {
        let cfg = IndicatorConfig::new().with("period", -1);
        assert!(Sma::from_config(&cfg).is_err());

        let cfg = IndicatorConfig::new();
        assert_eq!(Sma::from_config(&cfg).unwrap().period(), 20);
    }
}
