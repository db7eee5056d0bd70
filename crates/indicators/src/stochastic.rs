use serde::Serialize;
use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::window::RollingWindow;
use crate::Indicator;

/// Stochastic Oscillator (%K and %D) over tick pseudo-HLC data.
///
/// %K = (close - lowest low) / (highest high - lowest low) * 100
/// %D = SMA(%K, d_period)
///
/// A flat range resolves %K to the neutral 50.
#[derive(Debug, Clone)]
pub struct Stochastic {
    highs: RollingWindow,
    lows: RollingWindow,
    current_k: Option<f64>,
    k_window: RollingWindow,
    history: History,
}

/// Full stochastic output.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StochasticOutput {
    pub k: f64,
    pub d: f64,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize, max_history: usize) -> Self {
        Self {
            highs: RollingWindow::new(k_period),
            lows: RollingWindow::new(k_period),
            current_k: None,
            k_window: RollingWindow::new(d_period),
            history: History::new(max_history),
        }
    }

    /// Config keys: `k_period` (default 14), `d_period` (default 3), both
    /// strictly positive; `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let k_period = cfg.positive_usize("k_period", 14)?;
        let d_period = cfg.positive_usize("d_period", 3)?;
        Ok(Self::new(k_period, d_period, cfg.max_history()))
    }

    /// (%K, %D) once both are available.
    pub fn output(&self) -> Option<StochasticOutput> {
        if !self.k_window.is_full() {
            return None;
        }
        Some(StochasticOutput {
            k: self.current_k?,
            d: self.k_window.mean(),
        })
    }
}

impl Indicator for Stochastic {
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
        let k = if range == 0.0 {
            50.0
        } else {
            (close - lowest) / range * 100.0
        };

        self.current_k = Some(k);
        self.k_window.push(k);
        if self.k_window.is_full() {
            self.history.push(k);
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.k_window.is_full()
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.current_k = None;
        self.k_window.clear();
        self.history.reset();
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}
