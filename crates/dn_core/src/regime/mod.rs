//! Regime catalog
//!
//! A regime decides how many tokens of each kind a new week starts with.
//! Built-in regimes are embedded YAML; the single `custom` regime takes its
//! deck from the user and is always listed last.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::cards::RegimePool;
use crate::error::GameError;

pub const CUSTOM_REGIME_ID: &str = "custom";

/// Regime active on first run.
pub const DEFAULT_REGIME_ID: &str = "lowcarb";

/// Deck of the custom regime until the user supplies one.
pub const FALLBACK_POOL: RegimePool = RegimePool::new(10, 8, 3);

/// Built-in regimes (compile-time embedded)
pub const REGIMES_YAML: &str = include_str!("../../data/regimes.yaml");

static BUILTIN_REGIMES: OnceLock<Vec<RegimeDefinition>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Starting pool of every week provisioned under this regime
    #[serde(rename = "deck")]
    pub pool: RegimePool,
}

impl RegimeDefinition {
    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_REGIME_ID
    }

    fn custom(pool: RegimePool) -> Self {
        Self {
            id: CUSTOM_REGIME_ID.to_string(),
            name: "Custom".to_string(),
            description: "Your own weekly deck".to_string(),
            pool,
        }
    }
}

/// Built-in regime definitions in catalog order.
///
/// # Panics
///
/// Panics if the embedded YAML does not parse. The data is compiled in, so a
/// normal build never hits this.
pub fn builtin_regimes() -> &'static [RegimeDefinition] {
    BUILTIN_REGIMES.get_or_init(|| {
        serde_yaml::from_str(REGIMES_YAML).expect("Failed to parse regimes.yaml")
    })
}

#[derive(Debug, Clone)]
pub struct RegimeCatalog {
    builtins: Vec<RegimeDefinition>,
    custom: RegimeDefinition,
}

impl Default for RegimeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl RegimeCatalog {
    pub fn new() -> Self {
        Self::with_regimes(builtin_regimes().to_vec())
    }

    /// Catalog with a caller-provided set of fixed regimes.
    /// An entry using the reserved `custom` id is ignored.
    pub fn with_regimes(builtins: Vec<RegimeDefinition>) -> Self {
        let builtins = builtins.into_iter().filter(|r| !r.is_custom()).collect();
        Self { builtins, custom: RegimeDefinition::custom(FALLBACK_POOL) }
    }

    /// Fixed order, custom last
    pub fn list_regimes(&self) -> Vec<&RegimeDefinition> {
        self.builtins.iter().chain(std::iter::once(&self.custom)).collect()
    }

    pub fn get(&self, id: &str) -> Result<&RegimeDefinition, GameError> {
        if id == CUSTOM_REGIME_ID {
            return Ok(&self.custom);
        }
        self.builtins
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| GameError::UnknownRegime { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }

    pub fn pool_template(&self, id: &str) -> Result<RegimePool, GameError> {
        self.get(id).map(|r| r.pool)
    }

    /// Replaces the custom deck wholesale. Weeks already provisioned keep
    /// their own pools.
    pub fn set_custom_pool_template(&mut self, pool: RegimePool) {
        self.custom.pool = pool;
    }

    pub fn custom_pool_template(&self) -> RegimePool {
        self.custom.pool
    }

    /// Id used when the stored one is missing or unknown
    pub fn default_regime_id(&self) -> &str {
        if self.contains(DEFAULT_REGIME_ID) {
            DEFAULT_REGIME_ID
        } else {
            self.builtins.first().map_or(CUSTOM_REGIME_ID, |r| r.id.as_str())
        }
    }
}
