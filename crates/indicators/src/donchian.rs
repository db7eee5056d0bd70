use serde::Serialize;
use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Donchian Channel over tick pseudo-HLC data.
///
/// Upper band = highest high over N ticks, lower band = lowest low,
/// middle = their midpoint. `value()` returns the middle band.
#[derive(Debug, Clone)]
pub struct DonchianChannel {
    highs: RollingWindow,
    lows: RollingWindow,
    history: History,
}

/// Full channel output.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DonchianOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl DonchianChannel {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            highs: RollingWindow::new(period),
            lows: RollingWindow::new(period),
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 20, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 20)?;
        Ok(Self::new(period, cfg.max_history()))
    }

    pub fn output(&self) -> Option<DonchianOutput> {
        if !self.highs.is_full() {
            return None;
        }
        let upper = self.highs.max()?;
        let lower = self.lows.min()?;
        Some(DonchianOutput {
            upper,
            middle: (upper + lower) / 2.0,
            lower,
        })
    }
}

impl Indicator for DonchianChannel {
    fn update(&mut self, tick: &TickSnapshot) {
        let Some((high, low, _)) = tick.pseudo_hlc() else {
            return;
        };
        self.highs.push(high);
        self.lows.push(low);
        if let Some(out) = self.output() {
            self.history.push(out.middle);
        }
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
        "Donchian"
    }
}
