use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Relative Strength Index over the mid price, using Wilder's smoothing.
///
/// The first `period` price changes seed the average gain/loss; afterwards
/// the averages are updated recursively.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_price: Option<f64>,
    seed_gains: Vec<f64>,
    seed_losses: Vec<f64>,
    avg_gain: Option<f64>,
    avg_loss: Option<f64>,
    history: History,
}

impl Rsi {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            period,
            prev_price: None,
            seed_gains: Vec::with_capacity(period),
            seed_losses: Vec::with_capacity(period),
            avg_gain: None,
            avg_loss: None,
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 14, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 14)?;
        Ok(Self::new(period, cfg.max_history()))
    }

    fn current(&self) -> Option<f64> {
        let (gain, loss) = (self.avg_gain?, self.avg_loss?);
        if loss == 0.0 {
            return Some(100.0);
        }
        let rs = gain / loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

impl Indicator for Rsi {
    fn update(&mut self, tick: &TickSnapshot) {
        let mid = tick.mid_price();
        if mid <= 0.0 || !mid.is_finite() {
            return;
        }
        let Some(prev) = self.prev_price.replace(mid) else {
            return;
        };
        let change = mid - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        match self.avg_gain {
            None => {
                self.seed_gains.push(gain);
                self.seed_losses.push(loss);
                if self.seed_gains.len() >= self.period {
                    let n = self.period as f64;
                    self.avg_gain = Some(self.seed_gains.iter().sum::<f64>() / n);
                    self.avg_loss = Some(self.seed_losses.iter().sum::<f64>() / n);
                }
            }
            Some(prev_gain) => {
                // Wilder's smoothing.
                let n = self.period as f64;
                let prev_loss = self.avg_loss.unwrap_or(0.0);
                self.avg_gain = Some((prev_gain * (n - 1.0) + gain) / n);
                self.avg_loss = Some((prev_loss * (n - 1.0) + loss) / n);
            }
        }

        if let Some(rsi) = self.current() {
            self.history.push(rsi);
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.avg_gain.is_some()
    }

    fn reset(&mut self) {
        self.prev_price = None;
        self.seed_gains.clear();
        self.seed_losses.clear();
        self.avg_gain = None;
        self.avg_loss = None;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::feed;

    #[test]
    fn needs_period_plus_one_prices() {
        let mut rsi = Rsi::new(3, 100);
        feed(&mut rsi, &[100.0, 101.0, 102.0]);
        // Three prices give only two changes.
        assert!(!rsi.ready());
        feed(&mut rsi, &[103.0]);
        assert!(rsi.ready());
    }

    #[test]
    fn all_gains_saturate_at_100() {
        let mut rsi = Rsi::new(3, 100);
        feed(&mut rsi, &[100.0, 101.0, 102.0, 103.0, 104.0]);
        assert!((rsi.value() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn all_losses_approach_zero() {
        let mut rsi = Rsi::new(3, 100);
        feed(&mut rsi, &[104.0, 103.0, 102.0, 101.0, 100.0]);
        assert!(rsi.value().abs() < 1e-9);
    }

    #[test]
    fn mixed_moves_stay_in_range() {
        let mut rsi = Rsi::new(5, 100);
        feed(
            &mut rsi,
            &[100.0, 102.0, 101.0, 103.0, 102.5, 104.0, 103.0, 105.0],
        );
        let v = rsi.value();
        assert!(v > 0.0 && v < 100.0);
    }
}
