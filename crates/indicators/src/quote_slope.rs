use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Slope of the price-impact curve: how quickly price moves as cumulative
/// depth is consumed, fitted per book side by least squares.
///
/// A steeper slope means a thinner book. `value()` is the average of the
/// absolute bid and ask slopes.
#[derive(Debug, Clone)]
pub struct QuoteSlope {
    levels: usize,
    bid_slope: f64,
    ask_slope: f64,
    history: History,
}

impl QuoteSlope {
    pub fn new(levels: usize, max_history: usize) -> Self {
        Self {
            levels,
            bid_slope: 0.0,
            ask_slope: 0.0,
            history: History::new(max_history),
        }
    }

    /// Config keys: `levels` (default 5, non-positive values clamp to the
    /// default), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let levels = cfg.clamped_usize("levels", 5);
        Ok(Self::new(levels, cfg.max_history()))
    }

    pub fn bid_slope(&self) -> f64 {
        self.bid_slope
    }

    pub fn ask_slope(&self) -> f64 {
        self.ask_slope
    }

    /// Least-squares slope of price against cumulative depth over the first
    /// `levels` book levels; 0.0 when the side is too shallow or carries no
    /// depth variance.
    fn side_slope(&self, prices: &[f64], sizes: &[f64]) -> f64 {
        let n = self.levels.min(prices.len()).min(sizes.len());
        if n < 2 {
            return 0.0;
        }
        let mut depth = 0.0;
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for i in 0..n {
            depth += sizes[i];
            xs.push(depth);
            ys.push(prices[i]);
        }
        match tickwise_stats::linear_regression(&xs, &ys) {
            Some(fit) => fit.slope,
            None => 0.0,
        }
    }
}

impl Indicator for QuoteSlope {
    fn update(&mut self, tick: &TickSnapshot) {
        if tick.bid_price.is_empty() && tick.ask_price.is_empty() {
            return;
        }
        self.bid_slope = self.side_slope(&tick.bid_price, &tick.bid_size);
        self.ask_slope = self.side_slope(&tick.ask_price, &tick.ask_size);
        let avg = (self.bid_slope.abs() + self.ask_slope.abs()) / 2.0;
        self.history.push(avg);
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
        self.bid_slope = 0.0;
        self.ask_slope = 0.0;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "QuoteSlope"
    }
}
