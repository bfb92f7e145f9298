//! Reconfiguration types.

use inventroops_core::DepotConfig;
use inventroops_store::{Depot, NewDepot};
use serde::Serialize;

/// What a single configured depot will receive.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepotPlan {
    pub config: DepotConfig,
    /// Products moving into this depot, in ID order.
    pub product_ids: Vec<i64>,
    /// Stock summed over the group before any fallback.
    pub raw_stock: i64,
    /// Set when the group had products but no stock; their stock gets overwritten.
    pub zero_stock_fallback: bool,
    /// Depot document to insert.
    pub depot: NewDepot,
}

/// A full reconfiguration, computed without touching the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigurationPlan {
    pub product_count: usize,
    pub group_size: usize,
    pub depots: Vec<DepotPlan>,
}

impl ReconfigurationPlan {
    pub fn total_utilization(&self) -> i64 {
        self.depots.iter().map(|d| d.depot.current_utilization).sum()
    }

    /// Depots that receive no products because the groups ran out first.
    pub fn empty_depots(&self) -> Vec<String> {
        self.depots
            .iter()
            .filter(|d| d.product_ids.is_empty())
            .map(|d| d.depot.name.clone())
            .collect()
    }
}

/// Result of a completed reconfiguration run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigureReport {
    pub depots_removed: usize,
    pub products_reassigned: usize,
    pub products_restocked: usize,
    /// Depots created with no products, zero utilization and zero capacity.
    pub empty_depots: Vec<String>,
    pub depots: Vec<Depot>,
    pub duration_ms: u64,
}

/// Outcome of [`crate::DepotReconfigurer::run`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconfigureOutcome {
    /// The product collection was empty; nothing was changed.
    NothingToDistribute,
    Completed(ReconfigureReport),
}
