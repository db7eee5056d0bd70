use tickwise_core::TickSnapshot;

use crate::atr::Atr;
use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Supertrend: an ATR-banded hysteresis indicator around the mid price.
///
/// Basic bands sit `multiplier * ATR` above and below the high/low average;
/// the final bands only tighten while a trend persists, and the supertrend
/// line snaps between them as price crosses.
#[derive(Debug, Clone)]
pub struct Supertrend {
    multiplier: f64,
    atr: Atr,
    prev_close: f64,
    prev_upper: f64,
    prev_lower: f64,
    upper: f64,
    lower: f64,
    line: f64,
    uptrend: bool,
    prev_uptrend: bool,
    history: History,
}

impl Supertrend {
    pub fn new(period: usize, multiplier: f64, max_history: usize) -> Self {
        let multiplier = if multiplier <= 0.0 { 3.0 } else { multiplier };
        Self {
            multiplier,
            atr: Atr::new(period, max_history),
            prev_close: 0.0,
            prev_upper: 0.0,
            prev_lower: 0.0,
            upper: 0.0,
            lower: 0.0,
            line: 0.0,
            uptrend: false,
            prev_uptrend: false,
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (10) and `multiplier` (3.0), both clamping
    /// non-positive values to defaults; `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.clamped_usize("period", 10);
        let multiplier = cfg.f64_or("multiplier", 3.0);
        Ok(Self::new(period, multiplier, cfg.max_history()))
    }

    pub fn is_uptrend(&self) -> bool {
        self.uptrend
    }

    /// True on the tick where the trend flipped from down to up.
    pub fn is_bullish_reversal(&self) -> bool {
        self.uptrend && !self.prev_uptrend
    }

    /// True on the tick where the trend flipped from up to down.
    pub fn is_bearish_reversal(&self) -> bool {
        !self.uptrend && self.prev_uptrend
    }

    pub fn upper_band(&self) -> f64 {
        self.upper
    }

    pub fn lower_band(&self) -> f64 {
        self.lower
    }
}

impl Indicator for Supertrend {
    fn update(&mut self, tick: &TickSnapshot) {
        let Some((high, low, close)) = tick.pseudo_hlc() else {
            return;
        };

        self.atr.update(tick);
        if !self.atr.ready() {
            self.prev_close = close;
            return;
        }

        let hl_avg = (high + low) / 2.0;
        let band = self.multiplier * self.atr.value();
        let basic_upper = hl_avg + band;
        let basic_lower = hl_avg - band;

        // Final bands only move with the trend unless price closed beyond
        // them on the previous tick.
        self.upper = if self.prev_upper == 0.0
            || basic_upper < self.prev_upper
            || self.prev_close > self.prev_upper
        {
            basic_upper
        } else {
            self.prev_upper
        };
        self.lower = if self.prev_lower == 0.0
            || basic_lower > self.prev_lower
            || self.prev_close < self.prev_lower
        {
            basic_lower
        } else {
            self.prev_lower
        };

        self.prev_uptrend = self.uptrend;
        if close > self.upper {
            self.uptrend = true;
        } else if close < self.lower {
            self.uptrend = false;
        }
        self.line = if self.uptrend { self.lower } else { self.upper };

        self.prev_close = close;
        self.prev_upper = self.upper;
        self.prev_lower = self.lower;
        self.history.push(self.line);
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.atr.ready() && self.line > 0.0
    }

    fn reset(&mut self) {
        self.atr.reset();
        self.prev_close = 0.0;
        self.prev_upper = 0.0;
        self.prev_lower = 0.0;
        self.upper = 0.0;
        self.lower = 0.0;
        self.line = 0.0;
        self.uptrend = false;
        self.prev_uptrend = false;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "Supertrend"
    }
}
