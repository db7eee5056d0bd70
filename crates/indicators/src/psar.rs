use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Parabolic SAR (stop-and-reverse) over tick pseudo-HLC data.
///
/// Maintains a directional state, an extreme point, and an acceleration
/// factor that grows while the trend persists (capped at `af_max`) and
/// resets on reversal. The boundary trails price monotonically: while a
/// trend holds, the SAR never retreats against it.
#[derive(Debug, Clone)]
pub struct ParabolicSar {
    af_start: f64,
    af_step: f64,
    af_max: f64,
    sar: f64,
    ep: f64,
    af: f64,
    uptrend: bool,
    prev_high: f64,
    prev_low: f64,
    initialized: bool,
    history: History,
}

impl ParabolicSar {
    /// Non-positive factors clamp to the conventional 0.02 / 0.02 / 0.20.
    pub fn new(af_start: f64, af_step: f64, af_max: f64, max_history: usize) -> Self {
        Self {
            af_start: if af_start <= 0.0 { 0.02 } else { af_start },
            af_step: if af_step <= 0.0 { 0.02 } else { af_step },
            af_max: if af_max <= 0.0 { 0.20 } else { af_max },
            sar: 0.0,
            ep: 0.0,
            af: 0.0,
            uptrend: false,
            prev_high: 0.0,
            prev_low: 0.0,
            initialized: false,
            history: History::new(max_history),
        }
    }

    /// Config keys: `af_start` (0.02), `af_step` (0.02), `af_max` (0.20) —
    /// non-positive values clamp to defaults — and `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        Ok(Self::new(
            cfg.f64_or("af_start", 0.02),
            cfg.f64_or("af_step", 0.02),
            cfg.f64_or("af_max", 0.20),
            cfg.max_history(),
        ))
    }

    pub fn is_uptrend(&self) -> bool {
        self.uptrend
    }

    /// The extreme point of the current trend.
    pub fn extreme_point(&self) -> f64 {
        self.ep
    }

    pub fn acceleration(&self) -> f64 {
        self.af
    }
}

impl Indicator for ParabolicSar {
    fn update(&mut self, tick: &TickSnapshot) {
        let Some((high, low, _)) = tick.pseudo_hlc() else {
            return;
        };

        if !self.initialized {
            // First tick: assume an uptrend with the SAR at the low.
            self.sar = low;
            self.ep = high;
            self.af = self.af_start;
            self.uptrend = true;
            self.prev_high = high;
            self.prev_low = low;
            self.initialized = true;
            self.history.push(self.sar);
            return;
        }

        let mut candidate = self.sar + self.af * (self.ep - self.sar);

        if self.uptrend {
            if candidate > low {
                // Price crossed the boundary: flip to a downtrend.
                self.uptrend = false;
                self.sar = self.ep;
                self.ep = low;
                self.af = self.af_start;
            } else {
                // The SAR may not rise above the prior low.
                if candidate > self.prev_low {
                    candidate = self.prev_low;
                }
                self.sar = candidate;
                if high > self.ep {
                    self.ep = high;
                    self.af = (self.af + self.af_step).min(self.af_max);
                }
            }
        } else if candidate < high {
            // Price crossed the boundary: flip to an uptrend.
            self.uptrend = true;
            self.sar = self.ep;
            self.ep = high;
            self.af = self.af_start;
        } else {
            // The SAR may not fall below the prior high.
            if candidate < self.prev_high {
                candidate = self.prev_high;
            }
            self.sar = candidate;
            if low < self.ep {
                self.ep = low;
                self.af = (self.af + self.af_step).min(self.af_max);
            }
        }

        self.prev_high = high;
        self.prev_low = low;
        self.history.push(self.sar);
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
        self.sar = 0.0;
        self.ep = 0.0;
        self.af = 0.0;
        self.uptrend = false;
        self.prev_high = 0.0;
        self.prev_low = 0.0;
        self.initialized = false;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "ParabolicSAR"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{tick_at, base_time};
    use chrono::Duration;

    fn feed_trend(psar: &mut ParabolicSar, mids: &[f64]) -> Vec<bool> {
        let mut directions = Vec::with_capacity(mids.len());
        for (i, mid) in mids.iter().enumerate() {
            let ts = base_time() + Duration::seconds(i as i64);
            psar.update(&tick_at(*mid, ts));
            directions.push(psar.is_uptrend());
        }
        directions
    }

    #[test]
    fn single_flip_on_trend_reversal() {
        let mut psar = ParabolicSar::new(0.02, 0.02, 0.2, 500);
        let up: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let down: Vec<f64> = (1..20).map(|i| 119.0 - i as f64).collect();
        let mids: Vec<f64> = up.iter().chain(down.iter()).copied().collect();

        let directions = feed_trend(&mut psar, &mids);
        let flips = directions
            .windows(2)
            .filter(|pair| pair[0] != pair[1])
            .count();
        assert_eq!(flips, 1);
        // The flip happens after the reversal begins, never before.
        let flip_index = directions
            .windows(2)
            .position(|pair| pair[0] != pair[1])
            .unwrap()
            + 1;
        assert!(flip_index >= up.len());
        assert!(!psar.is_uptrend());
    }

    #[test]
    fn sar_trails_below_price_in_uptrend() {
        let mut psar = ParabolicSar::new(0.02, 0.02, 0.2, 500);
        let up: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        feed_trend(&mut psar, &up);
        assert!(psar.is_uptrend());
        assert!(psar.value() < 114.5);
        // The boundary never retreats while the trend holds.
        let values = psar.values();
        assert!(values.windows(2).all(|pair| pair[1] >= pair[0]));
    }

    #[test]
    fn acceleration_is_capped() {
        let mut psar = ParabolicSar::new(0.02, 0.02, 0.2, 500);
        let up: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        feed_trend(&mut psar, &up);
        assert!((psar.acceleration() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn nonpositive_factors_clamp_to_defaults() {
        let cfg = IndicatorConfig::new().with("af_start", -1.0);
        let psar = ParabolicSar::from_config(&cfg).unwrap();
        assert!((psar.af_start - 0.02).abs() < 1e-12);
    }
}
