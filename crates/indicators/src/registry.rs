use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tickwise_core::TickSnapshot;
use tracing::debug;

use crate::atr::Atr;
use crate::bollinger::BollingerBands;
use crate::config::IndicatorConfig;
use crate::donchian::DonchianChannel;
use crate::error::IndicatorError;
use crate::ewma::{Dema, Ewma};
use crate::imbalance::{BookPressure, OrderImbalance};
use crate::kama::Kama;
use crate::macd::Macd;
use crate::mid_price::{MidPrice, WeightedMidPrice};
use crate::momentum::{Momentum, Roc};
use crate::psar::ParabolicSar;
use crate::quote_slope::QuoteSlope;
use crate::rsi::Rsi;
use crate::sma::Sma;
use crate::spread::Spread;
use crate::stddev::StdDev;
use crate::stochastic::Stochastic;
use crate::supertrend::Supertrend;
use crate::t3::T3;
use crate::tema::Tema;
use crate::volatility::Volatility;
use crate::vwap::{CumulativeVolume, Vwap};
use crate::williams_r::WilliamsR;
use crate::wma::Wma;
use crate::Indicator;

/// A live indicator instance shared between the update path and readers.
///
/// The per-instance lock guarantees a reader sees either the pre- or
/// post-update state of a tick, never a partially applied one.
pub type SharedIndicator = Arc<RwLock<Box<dyn Indicator>>>;

type Factory =
    Box<dyn Fn(&IndicatorConfig) -> Result<Box<dyn Indicator>, IndicatorError> + Send + Sync>;

/// Name → instance map with insertion order retained, so bulk operations
/// iterate deterministically.
#[derive(Default)]
struct Instances {
    by_name: HashMap<String, SharedIndicator>,
    order: Vec<String>,
}

/// A named collection of live indicators plus the type-name → constructor
/// catalog used to build them from untyped configuration.
///
/// Readers (`get`, `all_values`) run concurrently; `register` and `create`
/// take the write lock. One registry typically serves one symbol.
pub struct IndicatorLibrary {
    factories: RwLock<HashMap<String, Factory>>,
    instances: RwLock<Instances>,
}

impl IndicatorLibrary {
    /// An empty library with no registered types.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
            instances: RwLock::new(Instances::default()),
        }
    }

    /// A library pre-loaded with the built-in formula catalog.
    pub fn with_builtins() -> Self {
        let lib = Self::new();
        lib.register_builtins();
        lib
    }

    fn register_builtins(&self) {
        // A fresh library cannot collide on names.
        let reg = |name: &str,
                   factory: fn(&IndicatorConfig) -> Result<Box<dyn Indicator>, IndicatorError>| {
            self.register(name, factory)
                .expect("builtin catalog registers each type once");
        };

        // Moving averages
        reg("sma", |cfg| Ok(Box::new(Sma::from_config(cfg)?)));
        reg("wma", |cfg| Ok(Box::new(Wma::from_config(cfg)?)));
        reg("ewma", |cfg| Ok(Box::new(Ewma::from_config(cfg)?)));
        reg("dema", |cfg| Ok(Box::new(Dema::from_config(cfg)?)));
        reg("tema", |cfg| Ok(Box::new(Tema::from_config(cfg)?)));
        reg("t3", |cfg| Ok(Box::new(T3::from_config(cfg)?)));
        reg("kama", |cfg| Ok(Box::new(Kama::from_config(cfg)?)));
        reg("macd", |cfg| Ok(Box::new(Macd::from_config(cfg)?)));

        // Oscillators
        reg("rsi", |cfg| Ok(Box::new(Rsi::from_config(cfg)?)));
        reg("stochastic", |cfg| Ok(Box::new(Stochastic::from_config(cfg)?)));
        reg("williams_r", |cfg| Ok(Box::new(WilliamsR::from_config(cfg)?)));
        reg("momentum", |cfg| Ok(Box::new(Momentum::from_config(cfg)?)));
        reg("roc", |cfg| Ok(Box::new(Roc::from_config(cfg)?)));

        // Volatility and bands
        reg("stddev", |cfg| Ok(Box::new(StdDev::from_config(cfg)?)));
        reg("volatility", |cfg| Ok(Box::new(Volatility::from_config(cfg)?)));
        reg("bollinger_bands", |cfg| {
            Ok(Box::new(BollingerBands::from_config(cfg)?))
        });
        reg("atr", |cfg| Ok(Box::new(Atr::from_config(cfg)?)));
        reg("donchian", |cfg| Ok(Box::new(DonchianChannel::from_config(cfg)?)));

        // Trend-following
        reg("psar", |cfg| Ok(Box::new(ParabolicSar::from_config(cfg)?)));
        reg("supertrend", |cfg| Ok(Box::new(Supertrend::from_config(cfg)?)));

        // Order book and microstructure
        reg("mid_price", |cfg| Ok(Box::new(MidPrice::from_config(cfg)?)));
        reg("weighted_mid_price", |cfg| {
            Ok(Box::new(WeightedMidPrice::from_config(cfg)?))
        });
        reg("spread", |cfg| Ok(Box::new(Spread::from_config(cfg)?)));
        reg("order_imbalance", |cfg| {
            Ok(Box::new(OrderImbalance::from_config(cfg)?))
        });
        reg("book_pressure", |cfg| {
            Ok(Box::new(BookPressure::from_config(cfg)?))
        });
        reg("quote_slope", |cfg| Ok(Box::new(QuoteSlope::from_config(cfg)?)));

        // Volume
        reg("vwap", |cfg| Ok(Box::new(Vwap::from_config(cfg)?)));
        reg("cumulative_volume", |cfg| {
            Ok(Box::new(CumulativeVolume::from_config(cfg)?))
        });
    }

    /// Associate `type_name` with a constructor. Fails if the name is
    /// already taken; replacing a registered type is never implicit.
    pub fn register<F>(&self, type_name: &str, factory: F) -> Result<(), IndicatorError>
    where
        F: Fn(&IndicatorConfig) -> Result<Box<dyn Indicator>, IndicatorError>
            + Send
            + Sync
            + 'static,
    {
        let mut factories = self.factories.write();
        if factories.contains_key(type_name) {
            return Err(IndicatorError::DuplicateType(type_name.to_string()));
        }
        factories.insert(type_name.to_string(), Box::new(factory));
        Ok(())
    }

    /// Build an instance of `type_name` from `config` and store it under
    /// `instance_name`. Re-creating an existing instance name replaces the
    /// instance in place, keeping its position in the update order.
    pub fn create(
        &self,
        instance_name: &str,
        type_name: &str,
        config: &IndicatorConfig,
    ) -> Result<(), IndicatorError> {
        let instance = {
            let factories = self.factories.read();
            let factory = factories
                .get(type_name)
                .ok_or_else(|| IndicatorError::UnknownType(type_name.to_string()))?;
            factory(config)?
        };

        let mut instances = self.instances.write();
        let shared: SharedIndicator = Arc::new(RwLock::new(instance));
        if instances
            .by_name
            .insert(instance_name.to_string(), shared)
            .is_none()
        {
            instances.order.push(instance_name.to_string());
        }
        debug!(instance = instance_name, kind = type_name, "created indicator");
        Ok(())
    }

    pub fn get(&self, instance_name: &str) -> Option<SharedIndicator> {
        self.instances.read().by_name.get(instance_name).cloned()
    }

    /// Feed the same tick to every instance, in registration order. A
    /// failure inside one indicator cannot occur by contract (per-tick
    /// anomalies are absorbed), so iteration always completes.
    pub fn update_all(&self, tick: &TickSnapshot) {
        let instances = self.instances.read();
        for name in &instances.order {
            if let Some(instance) = instances.by_name.get(name) {
                instance.write().update(tick);
            }
        }
    }

    /// Reset every instance to its pristine state.
    pub fn reset_all(&self) {
        let instances = self.instances.read();
        for instance in instances.by_name.values() {
            instance.write().reset();
        }
    }

    /// Current value of every instance, keyed by instance name.
    pub fn all_values(&self) -> HashMap<String, f64> {
        let instances = self.instances.read();
        instances
            .by_name
            .iter()
            .map(|(name, instance)| (name.clone(), instance.read().value()))
            .collect()
    }

    /// Instance names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.instances.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.instances.read().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IndicatorLibrary {
    fn default() -> Self {
        Self::with_builtins()
    }
}
