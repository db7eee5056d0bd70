use serde_json::{Map, Value};

use crate::error::IndicatorError;
use crate::history::DEFAULT_MAX_HISTORY;

/// Untyped key/value parameter bag handed to indicator constructors.
///
/// Lookup policy: unknown keys are ignored, missing keys fall back to the
/// caller-supplied default, and type mismatches also fall back to the
/// default. Semantically-required values (e.g. a strictly positive window
/// length) are validated by the accessors below or by the constructor
/// itself and rejected with [`IndicatorError::InvalidParameter`].
#[derive(Debug, Clone, Default)]
pub struct IndicatorConfig(Map<String, Value>);

impl IndicatorConfig {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Builder-style insert, mainly for seeding defaults and tests.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.f64(key).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Nested configuration sub-map, e.g. the pool's per-indicator blocks.
    pub fn sub(&self, key: &str) -> Option<IndicatorConfig> {
        self.0.get(key).and_then(Value::as_object).cloned().map(Self)
    }

    /// A strictly-positive integer parameter. Missing or mismatched keys
    /// fall back to `default`; an explicit non-positive value is rejected.
    pub fn positive_usize(&self, key: &str, default: usize) -> Result<usize, IndicatorError> {
        match self.f64(key) {
            None => Ok(default),
            Some(v) if v >= 1.0 => Ok(v as usize),
            Some(v) => Err(IndicatorError::invalid_parameter(format!(
                "{key} must be positive, got {v}"
            ))),
        }
    }

    /// An integer parameter where non-positive values silently clamp to
    /// `default` (the policy some formulas use instead of failing).
    pub fn clamped_usize(&self, key: &str, default: usize) -> usize {
        match self.f64(key) {
            Some(v) if v >= 1.0 => v as usize,
            _ => default,
        }
    }

    /// History capacity: absent, mismatched, or non-positive values clamp
    /// to [`DEFAULT_MAX_HISTORY`].
    pub fn max_history(&self) -> usize {
        match self.f64("max_history") {
            Some(h) if h >= 1.0 => h as usize,
            _ => DEFAULT_MAX_HISTORY,
        }
    }
}
