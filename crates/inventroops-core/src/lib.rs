//! Inventroops Core — error type, configuration and depot status tiers.

pub mod config;
pub mod error;
pub mod status;

pub use config::{AppConfig, DepotConfig, ReconfigureConfig, StatusThresholds, ZeroStockFallback};
pub use error::{Error, Result};
pub use status::DepotStatus;
