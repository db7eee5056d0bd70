use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tickwise_core::TickSnapshot;
use tracing::info;

use crate::config::IndicatorConfig;
use crate::error::IndicatorError;
use crate::registry::{IndicatorLibrary, SharedIndicator};

/// One indicator registry per symbol, shared by every consumer.
///
/// Many strategies observing the same symbol want the same base signals;
/// routing every tick through this pool evaluates each indicator at most
/// once per tick, and every consumer reads the identical computed value.
#[derive(Default)]
pub struct SharedIndicatorPool {
    pools: RwLock<HashMap<String, Arc<IndicatorLibrary>>>,
}

impl SharedIndicatorPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry for `symbol`, created with the built-in catalog on
    /// first access. Concurrent callers racing on a new symbol observe
    /// exactly one registry.
    pub fn get_or_create(&self, symbol: &str) -> Arc<IndicatorLibrary> {
        if let Some(lib) = self.pools.read().get(symbol) {
            return Arc::clone(lib);
        }
        let mut pools = self.pools.write();
        // Re-check under the write lock: another thread may have won.
        Arc::clone(pools.entry(symbol.to_string()).or_insert_with(|| {
            info!(%symbol, "created shared indicator registry");
            Arc::new(IndicatorLibrary::with_builtins())
        }))
    }

    /// Seed (or re-seed) `symbol` with the standard instrument-level set:
    /// VWAP, spread, order imbalance, and windowed volatility. Each entry
    /// can be parameterized through a same-named sub-map of `config`.
    pub fn initialize_defaults(
        &self,
        symbol: &str,
        config: &IndicatorConfig,
    ) -> Result<(), IndicatorError> {
        let lib = self.get_or_create(symbol);
        lib.create("vwap", "vwap", &config.sub("vwap").unwrap_or_default())?;
        lib.create("spread", "spread", &config.sub("spread").unwrap_or_default())?;
        lib.create(
            "order_imbalance",
            "order_imbalance",
            &config.sub("order_imbalance").unwrap_or_default(),
        )?;
        let volatility_cfg = config
            .sub("volatility")
            .unwrap_or_else(|| IndicatorConfig::new().with("window", 20));
        lib.create("volatility", "volatility", &volatility_cfg)?;
        info!(%symbol, "initialized default shared indicators");
        Ok(())
    }

    /// Feed a tick to every indicator registered for `symbol`. Unknown
    /// symbols are a no-op: registries are created only through
    /// `get_or_create` / `initialize_defaults`, never implicitly here.
    pub fn update_all(&self, symbol: &str, tick: &TickSnapshot) {
        let lib = self.pools.read().get(symbol).cloned();
        if let Some(lib) = lib {
            lib.update_all(tick);
        }
    }

    pub fn get(&self, symbol: &str) -> Option<Arc<IndicatorLibrary>> {
        self.pools.read().get(symbol).cloned()
    }

    /// A single indicator instance for `symbol`, if both exist.
    pub fn get_indicator(&self, symbol: &str, instance_name: &str) -> Option<SharedIndicator> {
        self.get(symbol)?.get(instance_name)
    }

    pub fn symbols(&self) -> Vec<String> {
        self.pools.read().keys().cloned().collect()
    }

    /// Indicator count per symbol.
    pub fn stats(&self) -> HashMap<String, usize> {
        self.pools
            .read()
            .iter()
            .map(|(symbol, lib)| (symbol.clone(), lib.len()))
            .collect()
    }

    pub fn remove(&self, symbol: &str) {
        if self.pools.write().remove(symbol).is_some() {
            info!(%symbol, "removed shared indicator registry");
        }
    }

    pub fn clear(&self) {
        self.pools.write().clear();
        info!("cleared shared indicator pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::tick;
    use crate::Indicator;

    #[test]
    fn get_or_create_returns_the_same_registry() {
        let pool = SharedIndicatorPool::new();
        let first = pool.get_or_create("AAPL");
        let second = pool.get_or_create("AAPL");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(pool.symbols(), vec!["AAPL".to_string()]);
    }

    #[test]
    fn defaults_are_seeded_once_per_symbol() {
        let pool = SharedIndicatorPool::new();
        pool.initialize_defaults("BTCUSDT", &IndicatorConfig::new())
            .unwrap();
        let lib = pool.get_or_create("BTCUSDT");
        assert_eq!(lib.len(), 4);
        for name in ["vwap", "spread", "order_imbalance", "volatility"] {
            assert!(lib.get(name).is_some(), "missing default {name}");
        }
    }

    #[test]
    fn update_all_ignores_unknown_symbols() {
        let pool = SharedIndicatorPool::new();
        pool.update_all("UNKNOWN", &tick(100.0));
        assert!(pool.symbols().is_empty());
    }

    #[test]
    fn per_symbol_updates_are_isolated() {
        let pool = SharedIndicatorPool::new();
        pool.initialize_defaults("A", &IndicatorConfig::new()).unwrap();
        pool.initialize_defaults("B", &IndicatorConfig::new()).unwrap();

        pool.update_all("A", &tick(100.0));
        let spread_a = pool.get_indicator("A", "spread").unwrap();
        let spread_b = pool.get_indicator("B", "spread").unwrap();
        assert!(spread_a.read().ready());
        assert!(!spread_b.read().ready());
    }

    #[test]
    fn stats_remove_and_clear() {
        let pool = SharedIndicatorPool::new();
        pool.initialize_defaults("A", &IndicatorConfig::new()).unwrap();
        pool.get_or_create("B");

        let stats = pool.stats();
        assert_eq!(stats["A"], 4);
        assert_eq!(stats["B"], 0);

        pool.remove("A");
        assert!(pool.get("A").is_none());

        pool.clear();
        assert!(pool.symbols().is_empty());
    }

    #[test]
    fn volatility_window_is_configurable() {
        let pool = SharedIndicatorPool::new();
        let cfg = IndicatorConfig::new().with(
            "volatility",
            serde_json::json!({ "window": 5, "use_log_returns": false }),
        );
        pool.initialize_defaults("ETHUSDT", &cfg).unwrap();
        assert!(pool.get_indicator("ETHUSDT", "volatility").is_some());
    }
}
