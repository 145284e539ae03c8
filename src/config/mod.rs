//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    load_config, resolve_config_path, BandBreakoutSection, Config, ConfigError,
    IndicatorMomentumSection, MeanReversionSection, PairsArbitrageSection, CONFIG_ENV_VAR,
};
