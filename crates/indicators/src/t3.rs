use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::ewma::Ewma;
use crate::history::History;
use crate::Indicator;

/// Tillson T3: a six-stage smoothing cascade whose output is a linear
/// combination of the stage values, with coefficients derived from a single
/// volume factor.
///
/// A higher `v_factor` trades responsiveness for smoothness.
#[derive(Debug, Clone)]
pub struct T3 {
    v_factor: f64,
    stages: [Ewma; 6],
    c1: f64,
    c2: f64,
    c3: f64,
    c4: f64,
    history: History,
}

impl T3 {
    pub fn new(period: usize, v_factor: f64, max_history: usize) -> Self {
        let mut v_factor = v_factor.clamp(0.0, 1.0);
        if v_factor == 0.0 {
            v_factor = 0.7;
        }
        let b = v_factor;
        let b2 = b * b;
        let b3 = b2 * b;
        Self {
            v_factor,
            stages: std::array::from_fn(|_| Ewma::from_period(period, max_history)),
            c1: -b3,
            c2: 3.0 * b2 + 3.0 * b3,
            c3: -6.0 * b2 - 3.0 * b - 3.0 * b3,
            c4: 1.0 + 3.0 * b + b3 + 3.0 * b2,
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 5, non-positive clamps to default),
    /// `v_factor` (default 0.7, clamped to [0, 1]), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.clamped_usize("period", 5);
        let v_factor = cfg.f64_or("v_factor", 0.7);
        Ok(Self::new(period, v_factor, cfg.max_history()))
    }

    pub fn v_factor(&self) -> f64 {
        self.v_factor
    }
}

impl Indicator for T3 {
    fn update(&mut self, tick: &TickSnapshot) {
        self.stages[0].update(tick);
        for i in 1..self.stages.len() {
            if self.stages[i - 1].ready() {
                let input = self.stages[i - 1].value();
                self.stages[i].update(&TickSnapshot::synthetic(input, tick.timestamp));
            }
        }
        if self.ready() {
            let e3 = self.stages[2].value();
            let e4 = self.stages[3].value();
            let e5 = self.stages[4].value();
            let e6 = self.stages[5].value();
            let t3 = self.c1 * e6 + self.c2 * e5 + self.c3 * e4 + self.c4 * e3;
            self.history.push(t3);
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.stages[5].ready()
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
        self.history.reset();
    }

    fn name(&self) -> &str {
        "T3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::feed;

    #[test]
    fn constant_series_is_a_fixed_point() {
        // The Tillson coefficients sum to 1, so a constant series must
        // reproduce that constant.
        let mut t3 = T3::new(5, 0.7, 100);
        feed(&mut t3, &[100.0; 15]);
        assert!(t3.ready());
        assert!((t3.value() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn v_factor_clamping() {
        assert!((T3::new(5, -0.5, 100).v_factor() - 0.7).abs() < 1e-12);
        assert!((T3::new(5, 2.0, 100).v_factor() - 1.0).abs() < 1e-12);
        assert!((T3::new(5, 0.4, 100).v_factor() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn follows_a_trend() {
        let mut t3 = T3::new(5, 0.7, 100);
        let ramp: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        feed(&mut t3, &ramp);
        let last = *ramp.last().unwrap();
        assert!((t3.value() - last).abs() < 5.0);
    }
}
