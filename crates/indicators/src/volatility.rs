use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Realized volatility: standard deviation of successive returns over a
/// rolling window. Returns are log returns by default.
///
/// Uses the last trade price when available, otherwise the mid price.
#[derive(Debug, Clone)]
pub struct Volatility {
    window: usize,
    use_log_returns: bool,
    returns: Vec<f64>,
    last_price: f64,
    history: History,
}

impl Volatility {
    pub fn new(window: usize, use_log_returns: bool, max_history: usize) -> Self {
        Self {
            window,
            use_log_returns,
            returns: Vec::with_capacity(window),
            last_price: 0.0,
            history: History::new(max_history),
        }
    }

    /// Config keys: `window` (default 20, must be positive),
    /// `use_log_returns` (default true), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let window = cfg.positive_usize("window", 20)?;
        let use_log_returns = cfg.bool_or("use_log_returns", true);
        Ok(Self::new(window, use_log_returns, cfg.max_history()))
    }

    /// Volatility scaled by sqrt(252) trading days.
    pub fn annualized(&self) -> f64 {
        self.value() * 252.0_f64.sqrt()
    }
}

impl Indicator for Volatility {
    fn update(&mut self, tick: &TickSnapshot) {
        let mut price = tick.last_price;
        if price <= 0.0 {
            price = tick.mid_price();
        }
        if price <= 0.0 || !price.is_finite() {
            return;
        }

        if self.last_price > 0.0 {
            let ret = if self.use_log_returns {
                (price / self.last_price).ln()
            } else {
                (price - self.last_price) / self.last_price
            };
            self.returns.push(ret);
            if self.returns.len() > self.window {
                self.returns.remove(0);
            }
            if self.returns.len() >= 2 {
                self.history.push(tickwise_stats::std_dev(&self.returns));
            }
        }

        self.last_price = price;
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.returns.len() >= 2
    }

    fn reset(&mut self) {
        self.returns.clear();
        self.last_price = 0.0;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "Volatility"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::feed;

    #[test]
    fn needs_two_returns() {
        let mut vol = Volatility::new(20, true, 100);
        feed(&mut vol, &[100.0, 101.0]);
        // Two prices produce one return: not ready yet.
        assert!(!vol.ready());
        assert_eq!(vol.value(), 0.0);

        feed(&mut vol, &[102.0]);
        assert!(vol.ready());
        assert!(vol.value() > 0.0);
    }

    #[test]
    fn constant_prices_have_zero_volatility() {
        let mut vol = Volatility::new(10, true, 100);
        feed(&mut vol, &[100.0; 12]);
        assert!(vol.ready());
        assert!(vol.value().abs() < 1e-12);
        assert!(vol.annualized().abs() < 1e-12);
    }

    #[test]
    fn simple_returns_mode() {
        let mut vol = Volatility::new(10, false, 100);
        feed(&mut vol, &[100.0, 110.0, 99.0]);
        // Returns: +0.10, -0.10; population stddev = 0.10.
        assert!((vol.value() - 0.10).abs() < 1e-9);
    }

    #[test]
    fn window_rejects_nonpositive() {
        let cfg = IndicatorConfig::new().with("window", 0);
        assert!(Volatility::from_config(&cfg).is_err());
    }
}
