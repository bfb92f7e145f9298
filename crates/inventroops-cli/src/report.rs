//! Console rendering of command results.

use serde::Serialize;

use inventroops_reconfigure::{ReconfigurationPlan, ReconfigureReport};
use inventroops_seed::{ApiReport, SeedDepotsReport, StoreReport, UploadSummary};

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_plan(plan: &ReconfigurationPlan, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(plan);
    }
    println!(
        "Plan for {} products ({} per depot):",
        plan.product_count, plan.group_size
    );
    for d in &plan.depots {
        println!(
            "  {:<16} {:<12} products={:<4} units={:<6} capacity={:<6} target={:.0}% status={}{}",
            d.depot.name,
            d.depot.location,
            d.product_ids.len(),
            d.depot.current_utilization,
            d.depot.capacity,
            d.config.target_pct * 100.0,
            d.depot.status,
            if d.zero_stock_fallback { " (zero-stock fallback)" } else { "" }
        );
    }
    Ok(())
}

pub fn print_reconfigure(report: &ReconfigureReport, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    println!(
        "Removed {} depots, reassigned {} products, restocked {}",
        report.depots_removed, report.products_reassigned, report.products_restocked
    );
    for d in &report.depots {
        println!(
            "  {:<16} {:<12} utilization={}/{} status={}",
            d.name, d.location, d.current_utilization, d.capacity, d.status
        );
    }
    if !report.empty_depots.is_empty() {
        println!("No products assigned to: {}", report.empty_depots.join(", "));
    }
    println!("\nReconfiguration complete!");
    Ok(())
}

pub fn print_upload(summary: &UploadSummary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(summary);
    }
    println!(
        "Uploaded {} chunks: success={}, failed={}, failed chunks={}",
        summary.chunks_sent, summary.success, summary.failed, summary.chunks_failed
    );
    Ok(())
}

pub fn print_seed_depots(report: &SeedDepotsReport, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    for name in &report.created {
        println!("Created {}", name);
    }
    for name in &report.skipped {
        println!("Depot {} already exists.", name);
    }
    for (name, err) in &report.failed {
        println!("Failed to create {}: {}", name, err);
    }
    Ok(())
}

pub fn print_store(report: &StoreReport, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    println!("Database: {} ({:.2} MB)", report.stats.db_path, report.stats.db_size_mb);
    println!("Collections: {}", report.stats.tables.join(", "));
    println!("Product count: {}", report.stats.total_products);
    println!("Depot count: {}", report.stats.total_depots);
    match &report.sample {
        Some(p) => {
            println!("Sample product:");
            println!("Name: {}, Location: {}", p.name, p.location);
            println!("{}", serde_json::to_string(p)?);
        }
        None => println!("No products found in 'products' collection."),
    }
    Ok(())
}

pub fn print_api(report: &ApiReport, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    let inv = &report.inventory;
    println!("Checking inventory API ({})...", inv.url);
    match (&inv.status, &inv.error) {
        (Some(status), _) => {
            println!("Status: {}", status);
            println!("Response: {}", inv.body_preview);
        }
        (None, Some(err)) => println!("Error: {}", err),
        (None, None) => println!("No response"),
    }

    let ml = &report.forecast;
    println!("\nChecking forecasting API ({})...", ml.url);
    if let Some(status) = ml.status {
        println!("Status: {}", status);
    }
    if let Some(err) = &ml.error {
        println!("Error: {}", err);
    } else {
        println!("Success: {:?}", ml.success);
        println!("Count: {:?}", ml.count);
        println!("Products length: {:?}", ml.products_len);
    }
    Ok(())
}
