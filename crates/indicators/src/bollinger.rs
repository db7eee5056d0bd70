use serde::Serialize;
use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Bollinger Bands over the mid price.
///
/// `value()` returns the middle band (SMA); use [`BollingerBands::output`]
/// for the full band vector.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    num_std: f64,
    window: RollingWindow,
    history: History,
}

/// Full Bollinger output.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth: f64,
}

impl BollingerBands {
    pub fn new(period: usize, num_std: f64, max_history: usize) -> Self {
        let num_std = if num_std <= 0.0 { 2.0 } else { num_std };
        Self {
            num_std,
            window: RollingWindow::new(period),
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 20, must be positive), `num_std`
    /// (default 2.0, non-positive values clamp to the default),
    /// `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 20)?;
        let num_std = cfg.f64_or("num_std", 2.0);
        Ok(Self::new(period, num_std, cfg.max_history()))
    }

    /// The (upper, middle, lower, bandwidth) vector once the window is full.
    pub fn output(&self) -> Option<BollingerOutput> {
        if !self.window.is_full() {
            return None;
        }
        let middle = self.window.mean();
        let sd = self.window.std_dev();
        let upper = middle + self.num_std * sd;
        let lower = middle - self.num_std * sd;
        Some(BollingerOutput {
            upper,
            middle,
            lower,
            bandwidth: upper - lower,
        })
    }
}

impl Indicator for BollingerBands {
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
        "BollingerBands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::feed;

    #[test]
    fn bands_straddle_the_middle() {
        let mut bb = BollingerBands::new(3, 2.0, 100);
        feed(&mut bb, &[10.0, 11.0, 12.0]);
        let out = bb.output().unwrap();
        assert!((out.middle - 11.0).abs() < 1e-9);
        assert!(out.upper > out.middle);
        assert!(out.lower < out.middle);
        assert!((out.bandwidth - (out.upper - out.lower)).abs() < 1e-12);
    }

    #[test]
    fn flat_series_collapses_the_bands() {
        let mut bb = BollingerBands::new(4, 2.0, 100);
        feed(&mut bb, &[100.0; 4]);
        let out = bb.output().unwrap();
        assert!(out.bandwidth.abs() < 1e-9);
    }

    #[test]
    fn no_output_before_full_window() {
        let mut bb = BollingerBands::new(5, 2.0, 100);
        feed(&mut bb, &[10.0, 11.0]);
        assert!(bb.output().is_none());
        assert!(!bb.ready());
        assert_eq!(bb.value(), 0.0);
    }

    #[test]
    fn nonpositive_num_std_clamps_to_default() {
        let cfg = IndicatorConfig::new().with("num_std", -1.0);
        let bb = BollingerBands::from_config(&cfg).unwrap();
        assert!((bb.num_std - 2.0).abs() < 1e-12);
    }
}
