use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Population standard deviation of the mid price over a rolling window.
#[derive(Debug, Clone)]
pub struct StdDev {
    window: RollingWindow,
    history: History,
}

impl StdDev {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            window: RollingWindow::new(period),
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 20, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 20)?;
        Ok(Self::new(period, cfg.max_history()))
    }
}

impl Indicator for StdDev {
    fn update(&mut self, tick: &TickSnapshot) {
        let mid = tick.mid_price();
        if mid <= 0.0 || !mid.is_finite() {
            return;
        }
        self.window.push(mid);
        if self.window.is_full() {
            self.history.push(self.window.std_dev());
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
        "StdDev"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::feed;

    #[test]
    fn known_std_dev() {
        let mut sd = StdDev::new(3, 100);
        feed(&mut sd, &[100.0, 110.0, 120.0]);
        assert!(sd.ready());
        assert!((sd.value() - 8.165).abs() < 0.01);
    }

    #[test]
    fn flat_prices_have_zero_deviation() {
        let mut sd = StdDev::new(4, 100);
        feed(&mut sd, &[50.0, 50.0, 50.0, 50.0]);
        assert!(sd.value().abs() < 1e-9);
    }
}
