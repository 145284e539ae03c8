//! Configuration Loader
//!
//! Loads and validates the engine configuration from TOML:
//!
//! ```toml
//! [session]
//! tick_interval = 100
//! final_timestamp = 99900
//!
//! [position_limits]
//! PEARLS = 20
//!
//! [[mean_reversion]]
//! product = "PEARLS"
//! true_price = 10000
//! ```
//!
//! Every strategy table takes the product names it trades plus any of its
//! parameters; omitted parameters keep their defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{PositionLimit, Product, SessionSettings};
use crate::strategy::{
    BandBreakoutParams, BandBreakoutStrategy, IndicatorMomentumParams, IndicatorMomentumStrategy,
    MeanReversionParams, MeanReversionStrategy, PairsArbitrageParams, PairsArbitrageStrategy,
};

/// Environment variable naming the config file when no path is given
pub const CONFIG_ENV_VAR: &str = "TICKSMITH_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionSettings,
    /// Symmetric position limit per product
    #[serde(default)]
    pub position_limits: BTreeMap<Product, PositionLimit>,
    #[serde(default)]
    pub band_breakout: Vec<BandBreakoutSection>,
    #[serde(default)]
    pub mean_reversion: Vec<MeanReversionSection>,
    #[serde(default)]
    pub pairs_arbitrage: Vec<PairsArbitrageSection>,
    #[serde(default)]
    pub indicator_momentum: Vec<IndicatorMomentumSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandBreakoutSection {
    pub product: Product,
    #[serde(flatten)]
    pub params: BandBreakoutParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanReversionSection {
    pub product: Product,
    #[serde(flatten)]
    pub params: MeanReversionParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairsArbitrageSection {
    /// Product sized in `lot_size_a` units
    pub product_a: Product,
    /// Product sized in `lot_size_b` units
    pub product_b: Product,
    #[serde(flatten)]
    pub params: PairsArbitrageParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorMomentumSection {
    pub product: Product,
    /// Observation key of the exogenous indicator
    pub indicator: String,
    #[serde(flatten)]
    pub params: IndicatorMomentumParams,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Pick the config path: an explicit argument wins, then `TICKSMITH_CONFIG`.
/// A leading `~` and `$VARS` are expanded.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    let raw = match explicit {
        Some(path) => path.to_string(),
        None => std::env::var(CONFIG_ENV_VAR).ok()?,
    };
    let expanded = shellexpand::full(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw);
    Some(PathBuf::from(expanded))
}

impl Default for Config {
    /// The competition round: one product per decision family
    fn default() -> Self {
        let position_limits = [
            ("BANANAS", 20),
            ("PEARLS", 20),
            ("COCONUTS", 600),
            ("PINA_COLADAS", 300),
            ("DIVING_GEAR", 50),
        ]
        .into_iter()
        .filter_map(|(product, limit)| {
            PositionLimit::new(limit)
                .ok()
                .map(|limit| (product.to_string(), limit))
        })
        .collect();

        Self {
            session: SessionSettings::default(),
            position_limits,
            band_breakout: vec![BandBreakoutSection {
                product: "BANANAS".to_string(),
                params: BandBreakoutParams::default(),
            }],
            mean_reversion: vec![MeanReversionSection {
                product: "PEARLS".to_string(),
                params: MeanReversionParams::default(),
            }],
            pairs_arbitrage: vec![PairsArbitrageSection {
                product_a: "COCONUTS".to_string(),
                product_b: "PINA_COLADAS".to_string(),
                params: PairsArbitrageParams::default(),
            }],
            indicator_momentum: vec![IndicatorMomentumSection {
                product: "DIVING_GEAR".to_string(),
                indicator: "DOLPHIN_SIGHTINGS".to_string(),
                params: IndicatorMomentumParams::default(),
            }],
        }
    }
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate session
        if self.session.tick_interval == 0 {
            return Err(ConfigError::ValidationError(
                "session.tick_interval must be > 0".to_string(),
            ));
        }

        if self.session.own_trader_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "session.own_trader_id cannot be empty".to_string(),
            ));
        }

        // Validate strategy tables
        for (i, section) in self.band_breakout.iter().enumerate() {
            section.params.validate().map_err(|e| {
                ConfigError::ValidationError(format!("band_breakout[{i}] ({}): {e}", section.product))
            })?;
            self.require_limit("band_breakout", &section.product)?;
        }

        for (i, section) in self.mean_reversion.iter().enumerate() {
            section.params.validate().map_err(|e| {
                ConfigError::ValidationError(format!("mean_reversion[{i}] ({}): {e}", section.product))
            })?;
            self.require_limit("mean_reversion", &section.product)?;
        }

        for (i, section) in self.pairs_arbitrage.iter().enumerate() {
            if section.product_a == section.product_b {
                return Err(ConfigError::ValidationError(format!(
                    "pairs_arbitrage[{i}]: product_a and product_b are both {}",
                    section.product_a
                )));
            }
            section.params.validate().map_err(|e| {
                ConfigError::ValidationError(format!(
                    "pairs_arbitrage[{i}] ({}/{}): {e}",
                    section.product_a, section.product_b
                ))
            })?;
            self.require_limit("pairs_arbitrage", &section.product_a)?;
            self.require_limit("pairs_arbitrage", &section.product_b)?;
        }

        for (i, section) in self.indicator_momentum.iter().enumerate() {
            if section.indicator.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "indicator_momentum[{i}] ({}): indicator cannot be empty",
                    section.product
                )));
            }
            section.params.validate().map_err(|e| {
                ConfigError::ValidationError(format!(
                    "indicator_momentum[{i}] ({}): {e}",
                    section.product
                ))
            })?;
            self.require_limit("indicator_momentum", &section.product)?;
        }

        Ok(())
    }

    fn require_limit(&self, table: &str, product: &str) -> Result<(), ConfigError> {
        if self.position_limits.contains_key(product) {
            Ok(())
        } else {
            Err(ConfigError::ValidationError(format!(
                "{table}: no position limit for {product}"
            )))
        }
    }

    /// Number of configured strategy instances
    pub fn strategy_count(&self) -> usize {
        self.band_breakout.len()
            + self.mean_reversion.len()
            + self.pairs_arbitrage.len()
            + self.indicator_momentum.len()
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// Conversions from config tables to strategies
impl From<&BandBreakoutSection> for BandBreakoutStrategy {
    fn from(section: &BandBreakoutSection) -> Self {
        BandBreakoutStrategy::new(section.product.clone(), section.params.clone())
    }
}

impl From<&MeanReversionSection> for MeanReversionStrategy {
    fn from(section: &MeanReversionSection) -> Self {
        MeanReversionStrategy::new(section.product.clone(), section.params.clone())
    }
}

impl From<&PairsArbitrageSection> for PairsArbitrageStrategy {
    fn from(section: &PairsArbitrageSection) -> Self {
        PairsArbitrageStrategy::new(
            section.product_a.clone(),
            section.product_b.clone(),
            section.params.clone(),
        )
    }
}

impl From<&IndicatorMomentumSection> for IndicatorMomentumStrategy {
    fn from(section: &IndicatorMomentumSection) -> Self {
        IndicatorMomentumStrategy::new(
            section.product.clone(),
            section.indicator.clone(),
            section.params.clone(),
        )
    }
}
