use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Exponentially Weighted Moving Average of the mid price.
///
/// The recurrence `state = alpha * input + (1 - alpha) * state` is seeded
/// with the first valid input rather than zero, avoiding warm-up bias.
#[derive(Debug, Clone)]
pub struct Ewma {
    alpha: f64,
    state: f64,
    initialized: bool,
    use_log_prices: bool,
    history: History,
}

impl Ewma {
    /// `alpha` is the decay factor in (0, 1]; out-of-range values clamp to
    /// 0.1 (roughly a 19-period average).
    pub fn new(alpha: f64, max_history: usize) -> Self {
        let alpha = if alpha > 0.0 && alpha <= 1.0 { alpha } else { 0.1 };
        Self {
            alpha,
            state: 0.0,
            initialized: false,
            use_log_prices: false,
            history: History::new(max_history),
        }
    }

    /// Derive alpha from an equivalent simple-moving-average period.
    pub fn from_period(period: usize, max_history: usize) -> Self {
        Self::new(2.0 / (period as f64 + 1.0), max_history)
    }

    /// Config keys: `alpha` (default 0.1), `period` (overrides alpha as
    /// 2/(period+1)), `use_log_prices` (default false), `max_history`.
    /// An alpha outside (0, 1] fails construction.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let mut alpha = cfg.f64_or("alpha", 0.1);
        if let Some(period) = cfg.f64("period") {
            alpha = 2.0 / (period + 1.0);
        }
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(IndicatorError::invalid_parameter(
                "alpha must be in (0, 1]",
            ));
        }
        let mut ewma = Self::new(alpha, cfg.max_history());
        ewma.use_log_prices = cfg.bool_or("use_log_prices", false);
        Ok(ewma)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Equivalent simple-moving-average period for the configured alpha.
    pub fn equivalent_period(&self) -> usize {
        (2.0 / self.alpha - 1.0).round() as usize
    }

    fn current(&self) -> f64 {
        if self.use_log_prices {
            self.state.exp()
        } else {
            self.state
        }
    }

    /// Advance the recurrence with an already-extracted input value.
    ///
    /// Composite indicators feed derived series (which may be negative,
    /// e.g. a MACD line) through this; `update` is the tick-validating
    /// front door.
    pub fn smooth(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        let input = if self.use_log_prices {
            if value <= 0.0 {
                return;
            }
            value.ln()
        } else {
            value
        };
        if self.initialized {
            self.state = self.alpha * input + (1.0 - self.alpha) * self.state;
        } else {
            self.state = input;
            self.initialized = true;
        }
        self.history.push(self.current());
    }
}

impl Indicator for Ewma {
    fn update(&mut self, tick: &TickSnapshot) {
        let mid = tick.mid_price();
        if mid <= 0.0 || !mid.is_finite() {
            return;
        }
        self.smooth(mid);
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.initialized
    }

    fn reset(&mut self) {
        self.state = 0.0;
        self.initialized = false;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "EWMA"
    }
}

/// Double Exponential Moving Average: `2 * e1 - e2`, where `e2` smooths
/// the output of `e1`.
///
/// The second stage is fed synthesized one-value ticks derived from the
/// first stage's output.
#[derive(Debug, Clone)]
pub struct Dema {
    e1: Ewma,
    e2: Ewma,
    history: History,
}

impl Dema {
    pub fn new(alpha: f64, max_history: usize) -> Self {
        Self {
            e1: Ewma::new(alpha, max_history),
            e2: Ewma::new(alpha, max_history),
            history: History::new(max_history),
        }
    }

    /// Config keys: same as [`Ewma::from_config`], minus `use_log_prices`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let mut alpha = cfg.f64_or("alpha", 0.1);
        if let Some(period) = cfg.f64("period") {
            alpha = 2.0 / (period + 1.0);
        }
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(IndicatorError::invalid_parameter(
                "alpha must be in (0, 1]",
            ));
        }
        Ok(Self::new(alpha, cfg.max_history()))
    }
}

impl Indicator for Dema {
    fn update(&mut self, tick: &TickSnapshot) {
        self.e1.update(tick);
        if self.e1.ready() {
            self.e2
                .update(&TickSnapshot::synthetic(self.e1.value(), tick.timestamp));
        }
        if self.e1.ready() && self.e2.ready() {
            self.history.push(2.0 * self.e1.value() - self.e2.value());
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.e1.ready() && self.e2.ready()
    }

    fn reset(&mut self) {
        self.e1.reset();
        self.e2.reset();
        self.history.reset();
    }

    fn name(&self) -> &str {
        "DEMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{feed, tick};

    #[test]
    fn seeded_by_first_input() {
        let mut ewma = Ewma::new(1.0 / 3.0, 100);
        ewma.update(&tick(22.0));
        assert!(ewma.ready());
        assert!((ewma.value() - 22.0).abs() < 1e-9);
    }

    #[test]
    fn known_sequence() {
        // alpha = 2/6, inputs 22, 24, 26, 24, 22.
        let mut ewma = Ewma::new(2.0 / 6.0, 100);
        feed(&mut ewma, &[22.0, 24.0, 26.0, 24.0, 22.0]);
        let expected = [22.0, 22.667, 23.778, 23.852, 23.235];
        let actual = ewma.values();
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 0.01, "got {a}, expected {e}");
        }
    }

    #[test]
    fn log_price_mode_round_trips() {
        let cfg = IndicatorConfig::new()
            .with("alpha", 0.5)
            .with("use_log_prices", true);
        let mut ewma = Ewma::from_config(&cfg).unwrap();
        ewma.update(&tick(100.0));
        assert!((ewma.value() - 100.0).abs() < 1e-9);
        ewma.update(&tick(100.0));
        assert!((ewma.value() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_alpha_fails_construction() {
        let cfg = IndicatorConfig::new().with("alpha", 1.5);
        assert!(Ewma::from_config(&cfg).is_err());
        let cfg = IndicatorConfig::new().with("period", -3);
        assert!(Ewma::from_config(&cfg).is_err());
    }

    #[test]
    fn period_key_overrides_alpha() {
        let cfg = IndicatorConfig::new().with("period", 19);
        let ewma = Ewma::from_config(&cfg).unwrap();
        assert!((ewma.alpha() - 0.1).abs() < 1e-12);
        assert_eq!(ewma.equivalent_period(), 19);
    }

    #[test]
    fn dema_tracks_trends_faster_than_its_stages() {
        let mut dema = Dema::new(0.2, 100);
        let ramp: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        feed(&mut dema, &ramp);
        assert!(dema.ready());
        // DEMA compensates smoothing lag: closer to the latest price than
        // the first-stage EWMA alone.
        assert!(dema.value() > dema.e1.value());
    }
}
