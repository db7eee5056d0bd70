use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Momentum: difference between the current mid price and the mid price
/// `period` ticks ago.
#[derive(Debug, Clone)]
pub struct Momentum {
    window: RollingWindow,
    history: History,
}

impl Momentum {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            // period + 1 prices span exactly `period` intervals.
            window: RollingWindow::new(period + 1),
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 10, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 10)?;
        Ok(Self::new(period, cfg.max_history()))
    }
}

impl Indicator for Momentum {
    fn update(&mut self, tick: &TickSnapshot) {
        let mid = tick.mid_price();
        if mid <= 0.0 || !mid.is_finite() {
            return;
        }
        self.window.push(mid);
        if !self.window.is_full() {
            return;
        }
        if let (Some(oldest), Some(newest)) = (self.window.first(), self.window.last()) {
            self.history.push(newest - oldest);
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
        "Momentum"
    }
}

/// Rate of Change: percentage move between the current mid price and the
/// mid price `period` ticks ago.
#[derive(Debug, Clone)]
pub struct Roc {
    window: RollingWindow,
    history: History,
}

impl Roc {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            window: RollingWindow::new(period + 1),
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 12, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 12)?;
        Ok(Self::new(period, cfg.max_history()))
    }
}

impl Indicator for Roc {
    fn update(&mut self, tick: &TickSnapshot) {
        let mid = tick.mid_price();
        if mid <= 0.0 || !mid.is_finite() {
            return;
        }
        self.window.push(mid);
        if !self.window.is_full() {
            return;
        }
        let Some(oldest) = self.window.first() else {
            return;
        };
        let roc = if oldest == 0.0 {
            0.0
        } else {
            (mid - oldest) / oldest * 100.0
        };
        self.history.push(roc);
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
        "ROC"
    }
}
