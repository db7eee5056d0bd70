use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::ewma::Ewma;
use crate::history::History;
use crate::Indicator;

/// Bid-ask spread, absolute or as a percentage of the mid price, with
/// optional exponential smoothing.
#[derive(Debug, Clone)]
pub struct Spread {
    absolute: bool,
    smoother: Option<Ewma>,
    history: History,
}

impl Spread {
    pub fn new(absolute: bool, max_history: usize) -> Self {
        Self {
            absolute,
            smoother: None,
            history: History::new(max_history),
        }
    }

    /// A spread indicator whose output is smoothed with the given alpha.
    pub fn with_smoothing(absolute: bool, alpha: f64, max_history: usize) -> Self {
        let mut spread = Self::new(absolute, max_history);
        if alpha > 0.0 && alpha <= 1.0 {
            spread.smoother = Some(Ewma::new(alpha, max_history));
        }
        spread
    }

    /// Config keys: `absolute` (default true), `smoothing_alpha` (default
    /// off; out-of-range values silently disable smoothing), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let absolute = cfg.bool_or("absolute", true);
        let alpha = cfg.f64_or("smoothing_alpha", 0.0);
        Ok(Self::with_smoothing(absolute, alpha, cfg.max_history()))
    }
}

impl Indicator for Spread {
    fn update(&mut self, tick: &TickSnapshot) {
        if tick.bid_price.is_empty() || tick.ask_price.is_empty() {
            return;
        }
        let mut spread = tick.spread();
        if !self.absolute {
            let mid = tick.mid_price();
            if mid > 0.0 {
                spread = spread / mid * 100.0;
            }
        }
        match &mut self.smoother {
            Some(ewma) => {
                ewma.smooth(spread);
                self.history.push(ewma.value());
            }
            None => self.history.push(spread),
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        !self.history.is_empty()
    }

    fn reset(&mut self) {
        if let Some(ewma) = &mut self.smoother {
            ewma.reset();
        }
        self.history.reset();
    }

    fn name(&self) -> &str {
        "Spread"
    }
}
