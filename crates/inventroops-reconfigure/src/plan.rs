//! Pure planning: partition products and derive each depot's figures.

use inventroops_core::{DepotConfig, ReconfigureConfig};
use inventroops_store::{NewDepot, Product};

use crate::types::{DepotPlan, ReconfigurationPlan};

/// Size of every group except possibly the last: `ceil(len / group_count)`.
pub fn group_size(len: usize, group_count: usize) -> usize {
    if group_count == 0 {
        return 0;
    }
    len.div_ceil(group_count)
}

/// Split `items` into exactly `group_count` contiguous groups.
///
/// Groups hold `group_size` items each; the final non-empty group takes the
/// remainder and any groups past it are empty.
pub fn partition<T>(items: &[T], group_count: usize) -> Vec<&[T]> {
    let size = group_size(items.len(), group_count);
    (0..group_count)
        .map(|i| {
            let start = (i * size).min(items.len());
            let end = ((i + 1) * size).min(items.len());
            &items[start..end]
        })
        .collect()
}

/// Capacity at which `total_stock` fills exactly `target_pct` of the depot.
pub fn capacity_for(total_stock: i64, target_pct: f64) -> i64 {
    (total_stock as f64 / target_pct).floor() as i64
}

/// Compute the reconfiguration for `products` under `config`.
///
/// Products are ordered by ID before partitioning so the same collection
/// always yields the same groups. `now` becomes every depot's `updatedAt`.
pub fn build_plan(products: &[Product], config: &ReconfigureConfig, now: &str) -> ReconfigurationPlan {
    let mut ordered: Vec<&Product> = products.iter().collect();
    ordered.sort_by_key(|p| p.id);

    let groups = partition(&ordered, config.depots.len());
    let depots = config
        .depots
        .iter()
        .zip(groups)
        .map(|(depot_config, group)| plan_depot(depot_config, group, config, now))
        .collect();

    ReconfigurationPlan {
        product_count: ordered.len(),
        group_size: group_size(ordered.len(), config.depots.len()),
        depots,
    }
}

fn plan_depot(
    depot_config: &DepotConfig,
    group: &[&Product],
    config: &ReconfigureConfig,
    now: &str,
) -> DepotPlan {
    let raw_stock: i64 = group.iter().map(|p| p.stock).sum();
    let zero_stock_fallback = !group.is_empty() && raw_stock == 0;
    let total_stock = if zero_stock_fallback {
        config.zero_stock.aggregate_units
    } else {
        raw_stock
    };

    let created_at = group
        .first()
        .and_then(|p| p.created_at.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_created_at.clone());

    DepotPlan {
        config: depot_config.clone(),
        product_ids: group.iter().map(|p| p.id).collect(),
        raw_stock,
        zero_stock_fallback,
        depot: NewDepot {
            name: depot_config.name.clone(),
            location: depot_config.location.clone(),
            capacity: capacity_for(total_stock, depot_config.target_pct),
            current_utilization: total_stock,
            items_stored: total_stock,
            status: config.thresholds.classify(depot_config.target_pct),
            manager: None,
            created_at,
            updated_at: now.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventroops_core::DepotStatus;
    use proptest::prelude::*;

    fn product(id: i64, stock: i64) -> Product {
        Product {
            id,
            sku: format!("SKU{:03}", id),
            name: format!("Item {}", id),
            category: "Electronics".into(),
            stock,
            reorder_point: 10,
            supplier: "TechSource".into(),
            price: 10.0,
            location: "North Zone".into(),
            daily_sales: None,
            weekly_sales: None,
            brand: None,
            lead_time: None,
            created_at: Some(format!("2024-03-{:02}", id.clamp(1, 28))),
            updated_at: None,
        }
    }

    #[test]
    fn test_partition_even_split() {
        let items: Vec<i32> = (0..100).collect();
        let groups = partition(&items, 4);
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|g| g.len() == 25));
        assert_eq!(groups[1][0], 25);
    }

    #[test]
    fn test_partition_remainder_in_last_group() {
        let items: Vec<i32> = (0..10).collect();
        let sizes: Vec<_> = partition(&items, 4).iter().map(|g| g.len()).collect();
        assert_eq!(sizes, [3, 3, 3, 1]);
    }

    #[test]
    fn test_partition_more_groups_than_items() {
        let items = [1, 2, 3];
        let sizes: Vec<_> = partition(&items, 4).iter().map(|g| g.len()).collect();
        assert_eq!(sizes, [1, 1, 1, 0]);

        let items: Vec<i32> = (0..5).collect();
        let sizes: Vec<_> = partition(&items, 4).iter().map(|g| g.len()).collect();
        assert_eq!(sizes, [2, 2, 1, 0]);
    }

    #[test]
    fn test_capacity_floors() {
        assert_eq!(capacity_for(40, 0.40), 100);
        assert_eq!(capacity_for(60, 0.50), 120);
        assert_eq!(capacity_for(80, 0.60), 133);
        assert_eq!(capacity_for(100, 0.80), 125);
        assert_eq!(capacity_for(0, 0.50), 0);
    }

    #[test]
    fn test_plan_orders_by_id() {
        let products = vec![product(4, 1), product(2, 1), product(3, 1), product(1, 1)];
        let config = ReconfigureConfig::default();
        let plan = build_plan(&products, &config, "2024-12-19");
        let ids: Vec<_> = plan.depots.iter().map(|d| d.product_ids.clone()).collect();
        assert_eq!(ids, [vec![1], vec![2], vec![3], vec![4]]);
    }

    #[test]
    fn test_plan_figures_and_statuses() {
        let mut products: Vec<Product> = (1..=100).map(|id| product(id, 0)).collect();
        // Group sums 40, 60, 80, 100 carried by the first product of each group.
        for (i, sum) in [40, 60, 80, 100].into_iter().enumerate() {
            products[i * 25].stock = sum;
        }

        let plan = build_plan(&products, &ReconfigureConfig::default(), "2024-12-19");
        let capacities: Vec<_> = plan.depots.iter().map(|d| d.depot.capacity).collect();
        let statuses: Vec<_> = plan.depots.iter().map(|d| d.depot.status).collect();
        assert_eq!(capacities, [100, 120, 133, 125]);
        assert_eq!(
            statuses,
            [
                DepotStatus::Normal,
                DepotStatus::Normal,
                DepotStatus::Warning,
                DepotStatus::Critical
            ]
        );
        assert_eq!(plan.total_utilization(), 280);
        assert_eq!(plan.group_size, 25);
        assert!(plan.depots.iter().all(|d| !d.zero_stock_fallback));
        assert!(plan
            .depots
            .iter()
            .all(|d| d.depot.items_stored == d.depot.current_utilization));
    }

    #[test]
    fn test_zero_stock_group_uses_fallback() {
        let products: Vec<Product> = (1..=8)
            .map(|id| product(id, if id <= 2 { 0 } else { 3 }))
            .collect();
        let plan = build_plan(&products, &ReconfigureConfig::default(), "now");

        let first = &plan.depots[0];
        assert!(first.zero_stock_fallback);
        assert_eq!(first.raw_stock, 0);
        assert_eq!(first.depot.current_utilization, 1000);
        assert_eq!(first.depot.capacity, 2500);
        assert!(!plan.depots[1].zero_stock_fallback);
        assert_eq!(plan.depots[1].depot.current_utilization, 6);
    }

    #[test]
    fn test_empty_group_has_no_fallback() {
        let products = vec![product(1, 0), product(2, 4), product(3, 4)];
        let plan = build_plan(&products, &ReconfigureConfig::default(), "now");

        let last = &plan.depots[3];
        assert!(last.product_ids.is_empty());
        assert!(!last.zero_stock_fallback);
        assert_eq!(last.depot.current_utilization, 0);
        assert_eq!(last.depot.capacity, 0);
        assert_eq!(last.depot.created_at, "2024-01-01");
        assert_eq!(plan.empty_depots(), ["West Depot"]);
    }

    #[test]
    fn test_created_at_inherited_from_first_product() {
        let mut products = vec![product(5, 1), product(6, 1), product(7, 1), product(8, 1)];
        products[1].created_at = None;
        let plan = build_plan(&products, &ReconfigureConfig::default(), "2024-12-19T00:00:00Z");
        assert_eq!(plan.depots[0].depot.created_at, "2024-03-05");
        assert_eq!(plan.depots[1].depot.created_at, "2024-01-01");
        assert_eq!(plan.depots[0].depot.updated_at, "2024-12-19T00:00:00Z");
        assert_eq!(plan.depots[2].depot.location, "Kolkata");
    }

    proptest! {
        #[test]
        fn prop_partition_covers_every_item_once(len in 0usize..500, groups in 1usize..12) {
            let items: Vec<usize> = (0..len).collect();
            let parts = partition(&items, groups);
            prop_assert_eq!(parts.len(), groups);

            let flattened: Vec<usize> = parts.iter().flat_map(|g| g.iter().copied()).collect();
            prop_assert_eq!(&flattened, &items);

            let size = group_size(len, groups);
            prop_assert!(parts.iter().all(|g| g.len() <= size));
        }

        #[test]
        fn prop_utilization_matches_group_stock(stocks in prop::collection::vec(1i64..200, 1..120)) {
            let products: Vec<Product> = stocks
                .iter()
                .enumerate()
                .map(|(i, s)| product(i as i64 + 1, *s))
                .collect();
            let config = ReconfigureConfig::default();
            let plan = build_plan(&products, &config, "now");

            prop_assert_eq!(plan.total_utilization(), stocks.iter().sum::<i64>());
            for d in &plan.depots {
                prop_assert_eq!(d.depot.capacity, capacity_for(d.depot.current_utilization, d.config.target_pct));
            }
        }
    }
}
