//! Applies a reconfiguration plan to the store.

use inventroops_core::{ReconfigureConfig, Result};
use inventroops_store::SqliteStore;
use tracing::{debug, info, warn};

use crate::plan::build_plan;
use crate::types::*;

/// Rebuilds the depot collection from the current product collection.
pub struct DepotReconfigurer;

impl DepotReconfigurer {
    /// Compute the plan for the current products without writing anything.
    /// Returns `None` when there are no products.
    pub fn preview(store: &SqliteStore, config: &ReconfigureConfig) -> Result<Option<ReconfigurationPlan>> {
        config.validate()?;
        let products = store.get_all_products()?;
        if products.is_empty() {
            return Ok(None);
        }
        let now = chrono::Utc::now().to_rfc3339();
        Ok(Some(build_plan(&products, config, &now)))
    }

    /// Redistribute all products across the configured depots.
    ///
    /// Deletes every existing depot, moves each product group to its depot,
    /// applies the zero-stock fallback and inserts one depot per config, all in
    /// one transaction. Running it again recomputes from the locations and
    /// stock written by the previous run.
    pub fn run(store: &SqliteStore, config: &ReconfigureConfig) -> Result<ReconfigureOutcome> {
        let start = std::time::Instant::now();
        config.validate()?;

        let products = store.get_all_products()?;
        if products.is_empty() {
            info!("No products found to distribute");
            return Ok(ReconfigureOutcome::NothingToDistribute);
        }

        info!(
            "Distributing {} products among {} depots",
            products.len(),
            config.depots.len()
        );

        let now = chrono::Utc::now().to_rfc3339();
        let plan = build_plan(&products, config, &now);
        let restock = config.zero_stock.per_product_stock;

        let (depots_removed, products_reassigned, products_restocked) = store.transaction(|tx| {
            let removed = tx.delete_all_depots()?;
            debug!("Cleared {} existing depots", removed);

            let mut reassigned = 0;
            let mut restocked = 0;
            for depot_plan in &plan.depots {
                reassigned += tx.update_product_locations(&depot_plan.product_ids, &depot_plan.depot.name)?;
                if depot_plan.zero_stock_fallback {
                    restocked += tx.set_product_stock(&depot_plan.product_ids, restock)?;
                }
                tx.insert_depot(&depot_plan.depot)?;
            }
            Ok((removed, reassigned, restocked))
        })?;

        for depot_plan in &plan.depots {
            let d = &depot_plan.depot;
            info!(
                "Created {} with {} products. Total Units: {}, Capacity: {} ({}%)",
                d.name,
                depot_plan.product_ids.len(),
                d.current_utilization,
                d.capacity,
                depot_plan.config.target_pct * 100.0
            );
            if depot_plan.zero_stock_fallback {
                info!(
                    "{} had no stock: sized for {} units, restocked {} products to {}",
                    d.name,
                    d.current_utilization,
                    depot_plan.product_ids.len(),
                    restock
                );
            }
        }

        let empty_depots = plan.empty_depots();
        if !empty_depots.is_empty() {
            warn!(
                "{} depots received no products (group size {} over {} products): {}",
                empty_depots.len(),
                plan.group_size,
                plan.product_count,
                empty_depots.join(", ")
            );
        }

        let depots = store.get_all_depots()?;
        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Reconfiguration complete: depots={}, reassigned={}, restocked={}, duration={}ms",
            depots.len(),
            products_reassigned,
            products_restocked,
            duration_ms
        );

        Ok(ReconfigureOutcome::Completed(ReconfigureReport {
            depots_removed,
            products_reassigned,
            products_restocked,
            empty_depots,
            depots,
            duration_ms,
        }))
    }
}
