//! Configuration: TOML file, environment overrides, startup validation

pub mod defaults;
mod loading;
mod types;
mod validation;

pub use loading::{load_config, load_config_with_fallback, ConfigSource};
pub use types::{BleConfig, Config, MonitorConfig, SerialConfig};
pub use validation::validate;
