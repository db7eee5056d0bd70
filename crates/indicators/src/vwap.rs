use chrono::{DateTime, Datelike, Timelike, Utc};
use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Session volume-weighted average price.
///
/// Accumulates price x volume over the session; optionally resets when the
/// tick stream crosses the configured session-start hour or rolls to a new
/// calendar day.
#[derive(Debug, Clone)]
pub struct Vwap {
    reset_daily: bool,
    reset_hour: u32,
    cumulative_value: f64,
    cumulative_volume: f64,
    last_reset: Option<DateTime<Utc>>,
    history: History,
}

impl Vwap {
    pub fn new(reset_daily: bool, reset_hour: u32, max_history: usize) -> Self {
        Self {
            reset_daily,
            reset_hour,
            cumulative_value: 0.0,
            cumulative_volume: 0.0,
            last_reset: None,
            history: History::new(max_history),
        }
    }

    /// Config keys: `reset_daily` (default true), `reset_hour` (default 9,
    /// must lie in 0..=23), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let reset_daily = cfg.bool_or("reset_daily", true);
        let reset_hour = cfg.f64_or("reset_hour", 9.0);
        if !(0.0..=23.0).contains(&reset_hour) {
            return Err(IndicatorError::invalid_parameter(
                "reset_hour must be between 0 and 23",
            ));
        }
        Ok(Self::new(reset_daily, reset_hour as u32, cfg.max_history()))
    }

    pub fn cumulative_volume(&self) -> f64 {
        self.cumulative_volume
    }

    fn should_reset(&self, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_reset else {
            return true;
        };
        // Crossed the session-start hour, or rolled to a new day.
        (now.hour() >= self.reset_hour && last.hour() < self.reset_hour)
            || now.day() != last.day()
    }
}

impl Indicator for Vwap {
    fn update(&mut self, tick: &TickSnapshot) {
        let now = tick.timestamp;
        if self.reset_daily && self.should_reset(now) {
            self.cumulative_value = 0.0;
            self.cumulative_volume = 0.0;
            self.last_reset = Some(now);
        }

        let mut price = tick.last_price;
        if price <= 0.0 {
            price = tick.mid_price();
        }
        if price <= 0.0 || !price.is_finite() {
            return;
        }
        let volume = tick.total_volume;
        if volume <= 0.0 {
            return;
        }

        self.cumulative_value += price * volume;
        self.cumulative_volume += volume;
        self.history
            .push(self.cumulative_value / self.cumulative_volume);
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.cumulative_volume > 0.0
    }

    fn reset(&mut self) {
        self.cumulative_value = 0.0;
        self.cumulative_volume = 0.0;
        self.last_reset = None;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}

/// Session cumulative volume, derived from the feed's running total.
///
/// A drop in the feed total (overnight reset, feed glitch) restarts the
/// delta from the reported total instead of going negative.
#[derive(Debug, Clone)]
pub struct CumulativeVolume {
    cumulative: f64,
    last_total: f64,
    history: History,
}

impl CumulativeVolume {
    pub fn new(max_history: usize) -> Self {
        Self {
            cumulative: 0.0,
            last_total: 0.0,
            history: History::new(max_history),
        }
    }

    /// Config keys: `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        Ok(Self::new(cfg.max_history()))
    }
}

impl Indicator for CumulativeVolume {
    fn update(&mut self, tick: &TickSnapshot) {
        let total = tick.total_volume;
        if total < 0.0 || !total.is_finite() {
            return;
        }
        let delta = if self.last_total > 0.0 {
            let d = total - self.last_total;
            if d < 0.0 {
                total
            } else {
                d
            }
        } else {
            total
        };
        self.last_total = total;
        self.cumulative += delta;
        self.history.push(self.cumulative);
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
        self.cumulative = 0.0;
        self.last_total = 0.0;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "CumulativeVolume"
    }
}
