use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::ewma::Ewma;
use crate::history::History;
use crate::Indicator;

/// Triple Exponential Moving Average: `3*e1 - 3*e2 + e3` over a cascade of
/// three smoothers, each fed the previous stage's output through a
/// synthesized tick.
#[derive(Debug, Clone)]
pub struct Tema {
    e1: Ewma,
    e2: Ewma,
    e3: Ewma,
    history: History,
}

impl Tema {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            e1: Ewma::from_period(period, max_history),
            e2: Ewma::from_period(period, max_history),
            e3: Ewma::from_period(period, max_history),
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 20, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 20)?;
        Ok(Self::new(period, cfg.max_history()))
    }
}

impl Indicator for Tema {
    fn update(&mut self, tick: &TickSnapshot) {
        self.e1.update(tick);
        if self.e1.ready() {
            self.e2
                .update(&TickSnapshot::synthetic(self.e1.value(), tick.timestamp));
        }
        if self.e2.ready() {
            self.e3
                .update(&TickSnapshot::synthetic(self.e2.value(), tick.timestamp));
        }
        if self.ready() {
            let tema = 3.0 * self.e1.value() - 3.0 * self.e2.value() + self.e3.value();
            self.history.push(tema);
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.e3.ready()
    }

    fn reset(&mut self) {
        self.e1.reset();
        self.e2.reset();
        self.e3.reset();
        self.history.reset();
    }

    fn name(&self) -> &str {
        "TEMA"
    }
}
