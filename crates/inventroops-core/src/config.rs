//! Configuration: environment-driven app settings and the depot plan.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::status::DepotStatus;
use crate::{Error, Result};

/// Top-level Inventroops configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root data directory (e.g., `data/`).
    pub data_dir: PathBuf,
    /// Base URL of the inventory REST API.
    pub api_url: String,
    /// Base URL of the forecasting (ML) REST API.
    pub ml_api_url: String,
    /// Products per bulk-upload request.
    pub bulk_chunk_size: usize,
}

impl AppConfig {
    pub const DEFAULT_API_URL: &'static str = "http://localhost:5000/api";
    pub const DEFAULT_ML_API_URL: &'static str = "http://localhost:5001/api";
    pub const DEFAULT_BULK_CHUNK_SIZE: usize = 50;

    /// Create configuration from environment and defaults. Creates the data directory.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let api_url = std::env::var("INVENTROOPS_API_URL")
            .unwrap_or_else(|_| Self::DEFAULT_API_URL.to_string());
        let ml_api_url = std::env::var("INVENTROOPS_ML_API_URL")
            .unwrap_or_else(|_| Self::DEFAULT_ML_API_URL.to_string());
        let bulk_chunk_size = std::env::var("INVENTROOPS_BULK_CHUNK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(Self::DEFAULT_BULK_CHUNK_SIZE);

        Ok(Self {
            data_dir,
            api_url: api_url.trim_end_matches('/').to_string(),
            ml_api_url: ml_api_url.trim_end_matches('/').to_string(),
            bulk_chunk_size,
        })
    }
}

/// One target depot of a reconfiguration plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotConfig {
    /// Depot name, also written into each assigned product's `location`.
    pub name: String,
    /// Human-readable city or site.
    pub location: String,
    /// Fraction of capacity the assigned stock should occupy, in (0, 1].
    pub target_pct: f64,
}

impl DepotConfig {
    pub fn new(name: impl Into<String>, location: impl Into<String>, target_pct: f64) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            target_pct,
        }
    }
}

/// Target-utilization cut-offs for the status tiers. Boundaries belong to the higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusThresholds {
    pub warning: f64,
    pub critical: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            warning: 0.60,
            critical: 0.80,
        }
    }
}

impl StatusThresholds {
    pub fn classify(&self, target_pct: f64) -> DepotStatus {
        if target_pct >= self.critical {
            DepotStatus::Critical
        } else if target_pct >= self.warning {
            DepotStatus::Warning
        } else {
            DepotStatus::Normal
        }
    }
}

/// Values substituted when a depot's products carry no stock at all.
///
/// The aggregate sizes the depot; the per-product value is written back to
/// every product of the group, so the store's stock changes as a side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZeroStockFallback {
    pub aggregate_units: i64,
    pub per_product_stock: i64,
}

impl Default for ZeroStockFallback {
    fn default() -> Self {
        Self {
            aggregate_units: 1000,
            per_product_stock: 50,
        }
    }
}

/// Full reconfiguration plan, passed explicitly into the reconfigurer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigureConfig {
    pub depots: Vec<DepotConfig>,
    #[serde(default)]
    pub thresholds: StatusThresholds,
    #[serde(default)]
    pub zero_stock: ZeroStockFallback,
    /// `createdAt` for depots whose first product has none.
    #[serde(default = "default_created_at")]
    pub default_created_at: String,
}

fn default_created_at() -> String {
    "2024-01-01".to_string()
}

impl Default for ReconfigureConfig {
    fn default() -> Self {
        Self {
            depots: vec![
                DepotConfig::new("North Depot", "New Delhi", 0.40),
                DepotConfig::new("South Depot", "Chennai", 0.50),
                DepotConfig::new("East Depot", "Kolkata", 0.60),
                DepotConfig::new("West Depot", "Mumbai", 0.80),
            ],
            thresholds: StatusThresholds::default(),
            zero_stock: ZeroStockFallback::default(),
            default_created_at: default_created_at(),
        }
    }
}

impl ReconfigureConfig {
    /// Load a plan from a JSON file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(
            "Loaded reconfiguration plan from {} ({} depots)",
            path.display(),
            config.depots.len()
        );
        Ok(config)
    }

    /// Reject plans that would produce undefined capacities or ambiguous locations.
    pub fn validate(&self) -> Result<()> {
        if self.depots.is_empty() {
            return Err(Error::Config("at least one depot is required".into()));
        }

        let mut seen = HashSet::new();
        for depot in &self.depots {
            if depot.name.trim().is_empty() {
                return Err(Error::Config("depot name must not be empty".into()));
            }
            if !seen.insert(depot.name.as_str()) {
                return Err(Error::Config(format!("duplicate depot name: {}", depot.name)));
            }
            if !in_unit_interval(depot.target_pct) {
                return Err(Error::Config(format!(
                    "target_pct for {} must be in (0, 1], got {}",
                    depot.name, depot.target_pct
                )));
            }
        }

        let t = &self.thresholds;
        if !in_unit_interval(t.warning) || !in_unit_interval(t.critical) {
            return Err(Error::Config(format!(
                "status thresholds must be in (0, 1], got warning={} critical={}",
                t.warning, t.critical
            )));
        }
        if t.warning > t.critical {
            return Err(Error::Config(format!(
                "warning threshold {} exceeds critical threshold {}",
                t.warning, t.critical
            )));
        }

        if self.zero_stock.aggregate_units < 0 || self.zero_stock.per_product_stock < 0 {
            return Err(Error::Config("zero-stock fallback values must be non-negative".into()));
        }

        Ok(())
    }
}

fn in_unit_interval(v: f64) -> bool {
    v > 0.0 && v <= 1.0
}
