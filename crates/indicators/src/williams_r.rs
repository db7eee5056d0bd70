use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Williams %R over tick pseudo-HLC data.
///
/// %R = -100 * (highest high - close) / (highest high - lowest low),
/// oscillating between -100 (oversold) and 0 (overbought). A flat range
/// resolves to the neutral -50.
#[derive(Debug, Clone)]
pub struct WilliamsR {
    highs: RollingWindow,
    lows: RollingWindow,
    history: History,
}

impl WilliamsR {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            highs: RollingWindow::new(period),
            lows: RollingWindow::new(period),
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 14, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 14)?;
        Ok(Self::new(period, cfg.max_history()))
    }
}

impl Indicator for WilliamsR {
    fn update(&mut self, tick: &TickSnapshot) {
        let Some((high, low, close)) = tick.pseudo_hlc() else {
            return;
        };
        self.highs.push(high);
        self.lows.push(low);
        if !self.highs.is_full() {
            return;
        }
        let (Some(highest), Some(lowest)) = (self.highs.max(), self.lows.min()) else {
            return;
        };

        let range = highest - lowest;
        let r = if range == 0.0 {
            -50.0
        } else {
            -100.0 * (highest - close) / range
        };
        self.history.push(r);
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.highs.is_full()
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.history.reset();
    }

    fn name(&self) -> &str {
        "Williams %R"
    }
}
