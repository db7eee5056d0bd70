use serde::Serialize;
use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::ewma::Ewma;
use crate::history::History;
use crate::Indicator;

/// MACD (Moving Average Convergence Divergence) over the mid price.
///
/// Composed of a fast and a slow smoother plus a signal smoother over the
/// MACD line. `value()` returns the MACD line; use [`Macd::output`] for the
/// (macd, signal, histogram) vector.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ewma,
    slow: Ewma,
    signal: Ewma,
    macd_line: f64,
    history: History,
}

/// MACD output with all three components.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl Macd {
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
        max_history: usize,
    ) -> Self {
        Self {
            fast: Ewma::from_period(fast_period, max_history),
            slow: Ewma::from_period(slow_period, max_history),
            signal: Ewma::from_period(signal_period, max_history),
            macd_line: 0.0,
            history: History::new(max_history),
        }
    }

    /// Config keys: `fast_period` (12), `slow_period` (26), `signal_period`
    /// (9), all strictly positive with `fast_period < slow_period`;
    /// `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let fast = cfg.positive_usize("fast_period", 12)?;
        let slow = cfg.positive_usize("slow_period", 26)?;
        let signal = cfg.positive_usize("signal_period", 9)?;
        if fast >= slow {
            return Err(IndicatorError::invalid_parameter(format!(
                "fast_period ({fast}) must be less than slow_period ({slow})"
            )));
        }
        Ok(Self::new(fast, slow, signal, cfg.max_history()))
    }

    /// The (macd, signal, histogram) vector once the signal line exists.
    pub fn output(&self) -> Option<MacdOutput> {
        if !self.signal.ready() {
            return None;
        }
        let signal = self.signal.value();
        Some(MacdOutput {
            macd: self.macd_line,
            signal,
            histogram: self.macd_line - signal,
        })
    }
}

impl Indicator for Macd {
    fn update(&mut self, tick: &TickSnapshot) {
        self.fast.update(tick);
        self.slow.update(tick);
        if self.fast.ready() && self.slow.ready() {
            self.macd_line = self.fast.value() - self.slow.value();
            // The MACD line may be negative, so it bypasses tick validation.
            self.signal.smooth(self.macd_line);
            if self.signal.ready() {
                self.history.push(self.macd_line);
            }
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.signal.ready()
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
        self.macd_line = 0.0;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::feed;

    #[test]
    fn flat_series_has_zero_macd() {
        let mut macd = Macd::new(3, 6, 3, 100);
        feed(&mut macd, &[100.0; 10]);
        assert!(macd.ready());
        let out = macd.output().unwrap();
        assert!(out.macd.abs() < 1e-9);
        assert!(out.signal.abs() < 1e-9);
        assert!(out.histogram.abs() < 1e-9);
    }

    #[test]
    fn uptrend_turns_macd_positive() {
        let mut macd = Macd::new(3, 6, 3, 100);
        let ramp: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        feed(&mut macd, &ramp);
        let out = macd.output().unwrap();
        // The fast smoother sits above the slow one in an uptrend.
        assert!(out.macd > 0.0);
        assert!(out.signal > 0.0);
    }

    #[test]
    fn downtrend_turns_macd_negative() {
        let mut macd = Macd::new(3, 6, 3, 100);
        let ramp: Vec<f64> = (0..20).map(|i| 200.0 - i as f64).collect();
        feed(&mut macd, &ramp);
        assert!(macd.value() < 0.0);
    }

    #[test]
    fn fast_must_be_less_than_slow() {
        let cfg = IndicatorConfig::new()
            .with("fast_period", 26)
            .with("slow_period", 12);
        assert!(Macd::from_config(&cfg).is_err());
    }
}
