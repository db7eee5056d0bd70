use std::collections::VecDeque;

use tickwise_core::TickSnapshot;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::history::History;
use crate::Indicator;

/// Average True Range over tick pseudo-HLC data.
///
/// The first `period` true ranges seed the average; afterwards Wilder's
/// smoothing applies.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    seed_trs: VecDeque<f64>,
    current: Option<f64>,
    history: History,
}

impl Atr {
    pub fn new(period: usize, max_history: usize) -> Self {
        Self {
            period,
            prev_close: None,
            seed_trs: VecDeque::with_capacity(period),
            current: None,
            history: History::new(max_history),
        }
    }

    /// Config keys: `period` (default 14, must be positive), `max_history`.
    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let period = cfg.positive_usize("period", 14)?;
        Ok(Self::new(period, cfg.max_history()))
    }
}

impl Indicator for Atr {
    fn update(&mut self, tick: &TickSnapshot) {
        let Some((high, low, close)) = tick.pseudo_hlc() else {
            return;
        };
        let tr = match self.prev_close {
            Some(prev) => (high - low)
                .max((high - prev).abs())
                .max((low - prev).abs()),
            None => high - low,
        };
        self.prev_close = Some(close);

        match self.current {
            None => {
                self.seed_trs.push_back(tr);
                if self.seed_trs.len() >= self.period {
                    let seed = self.seed_trs.iter().sum::<f64>() / self.period as f64;
                    self.current = Some(seed);
                }
            }
            Some(prev_atr) => {
                // Wilder's smoothing.
                let n = self.period as f64;
                self.current = Some((prev_atr * (n - 1.0) + tr) / n);
            }
        }

        if let Some(atr) = self.current {
            self.history.push(atr);
        }
    }

    fn value(&self) -> f64 {
        self.history.last().unwrap_or(0.0)
    }

    fn values(&self) -> Vec<f64> {
        self.history.values()
    }

    fn ready(&self) -> bool {
        self.current.is_some()
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.seed_trs.clear();
        self.current = None;
        self.history.reset();
    }

    fn name(&self) -> &str {
        "ATR"
    }
}
