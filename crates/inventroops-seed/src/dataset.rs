//! Synthetic product datasets and CSV import.
//!
//! The generated CSV is the interchange format for every seeding path: it can
//! be bulk-uploaded to the inventory API or imported straight into the store.

use std::path::Path;

use inventroops_core::{Error, Result};
use inventroops_store::{NewProduct, SqliteStore};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_DEPOTS: [&str; 5] = [
    "North Zone",
    "South Zone",
    "East Zone",
    "West Zone",
    "Central Zone",
];

pub const CATEGORIES: [&str; 5] = [
    "Electronics",
    "Furniture",
    "Stationery",
    "Pantry",
    "Accessories",
];

pub const SUPPLIERS: [&str; 5] = ["TechSource", "OfficePro", "WriteWell", "EcoWare", "CleanCo"];

pub const BRANDS: [&str; 5] = ["TechPro", "EcoLife", "SmartHome", "OfficeReady", "PurePlus"];

fn item_names(category: &str) -> [&'static str; 10] {
    match category {
        "Electronics" => [
            "Mouse", "Keyboard", "Monitor", "Cable", "Headset", "Webcam", "Speaker", "Drive",
            "Charger", "Hub",
        ],
        "Furniture" => [
            "Chair", "Desk", "Lamp", "Shelf", "Cabinet", "Mat", "Bin", "Stool", "Stand", "Divider",
        ],
        "Stationery" => [
            "Pen", "Paper", "Notebook", "Stapler", "Glue", "Tape", "Scissors", "Marker", "Folder",
            "Binder",
        ],
        "Pantry" => [
            "Coffee", "Tea", "Sugar", "Milk", "Biscuits", "Cups", "Napkins", "Water", "Snacks",
            "Soda",
        ],
        _ => [
            "Pad", "Cleaner", "Sleeve", "Ties", "Rest", "Holder", "Stand", "Lock", "Cover", "Cloth",
        ],
    }
}

/// Stock and reorder point for the `index`-th item of a depot.
///
/// Items fall into four bands so every depot has out-of-stock, under-stocked,
/// in-stock and over-stocked products.
pub fn stock_band(index: usize) -> (i64, i64) {
    match index {
        0..=12 => (0, 10),
        13..=24 => (5, 15),
        25..=37 => (25, 10),
        _ => (100, 10),
    }
}

/// Shape of a generated dataset.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    pub depots: Vec<String>,
    pub items_per_depot: usize,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            depots: DEFAULT_DEPOTS.iter().map(|d| d.to_string()).collect(),
            items_per_depot: 50,
        }
    }
}

/// Build the synthetic product list. Prices are the only random field.
pub fn generate_products<R: Rng + ?Sized>(spec: &DatasetSpec, rng: &mut R) -> Vec<NewProduct> {
    let mut products = Vec::with_capacity(spec.depots.len() * spec.items_per_depot);
    let mut sku_counter = 1;

    for depot in &spec.depots {
        let depot_word = depot.split_whitespace().next().unwrap_or(depot.as_str());
        for i in 0..spec.items_per_depot {
            let category = CATEGORIES[i % CATEGORIES.len()];
            let base_name = item_names(category)[i % 10];
            let (stock, reorder_point) = stock_band(i);
            let price: f64 = rng.gen_range(5.0..=500.0);

            products.push(NewProduct {
                sku: format!("SKU{:03}", sku_counter),
                name: format!("{} {} {}", base_name, depot_word, i + 1),
                category: category.to_string(),
                stock,
                reorder_point,
                supplier: SUPPLIERS[i % SUPPLIERS.len()].to_string(),
                price: (price * 100.0).round() / 100.0,
                location: depot.clone(),
                ..Default::default()
            });
            sku_counter += 1;
        }
    }

    products
}

/// One CSV line. Column order is the dataset header.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    sku: String,
    name: String,
    category: Option<String>,
    stock: Option<String>,
    reorder_point: Option<String>,
    supplier: Option<String>,
    price: Option<String>,
    location: Option<String>,
}

/// Write products as a dataset CSV. Returns the number of rows written.
pub fn write_csv(path: impl AsRef<Path>, products: &[NewProduct]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::Csv(e.to_string()))?;
    for p in products {
        writer
            .serialize(CsvRow {
                sku: p.sku.clone(),
                name: p.name.clone(),
                category: Some(p.category.clone()),
                stock: Some(p.stock.to_string()),
                reorder_point: Some(p.reorder_point.to_string()),
                supplier: Some(p.supplier.clone()),
                price: Some(format!("{:.2}", p.price)),
                location: Some(p.location.clone()),
            })
            .map_err(|e| Error::Csv(e.to_string()))?;
    }
    writer.flush()?;

    info!("Generated {} ({} products)", path.display(), products.len());
    Ok(products.len())
}

/// Generate a dataset and write it to `path`.
pub fn generate_dataset<R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    spec: &DatasetSpec,
    rng: &mut R,
) -> Result<usize> {
    let products = generate_products(spec, rng);
    write_csv(path, &products)
}

/// Read a dataset CSV, coercing numeric columns and filling blanks with defaults.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<NewProduct>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(format!("CSV file {}", path.display())));
    }
    info!("Reading data from {}", path.display());

    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::Csv(e.to_string()))?;
    let mut products = Vec::new();
    for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = record.map_err(|e| Error::Csv(format!("line {}: {}", line, e)))?;
        products.push(row_to_product(row, line)?);
    }

    debug!("Parsed {} products from {}", products.len(), path.display());
    Ok(products)
}

fn row_to_product(row: CsvRow, line: usize) -> Result<NewProduct> {
    let defaults = NewProduct::default();
    Ok(NewProduct {
        sku: row.sku,
        name: row.name,
        category: non_blank(row.category).unwrap_or(defaults.category),
        stock: parse_int(row.stock.as_deref(), "stock", line)?.unwrap_or(defaults.stock),
        reorder_point: parse_int(row.reorder_point.as_deref(), "reorderPoint", line)?
            .unwrap_or(defaults.reorder_point),
        supplier: non_blank(row.supplier).unwrap_or(defaults.supplier),
        price: parse_float(row.price.as_deref(), "price", line)?.unwrap_or(defaults.price),
        location: non_blank(row.location).unwrap_or(defaults.location),
        ..defaults
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_float(value: Option<&str>, column: &str, line: usize) -> Result<Option<f64>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .map(Some)
            .map_err(|_| Error::Csv(format!("line {}: {} is not a number: {:?}", line, column, v))),
    }
}

/// Integers may arrive as `25` or `25.0`; fractional parts are truncated.
fn parse_int(value: Option<&str>, column: &str, line: usize) -> Result<Option<i64>> {
    let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(n) = v.parse::<i64>() {
        return Ok(Some(n));
    }
    match parse_float(Some(v), column, line)? {
        Some(f) if f.is_finite() => Ok(Some(f.trunc() as i64)),
        _ => Err(Error::Csv(format!("line {}: {} is not a number: {:?}", line, column, v))),
    }
}

/// Add the sales and lead-time fields the forecasting service reads.
pub fn enrich_for_forecasting<R: Rng + ?Sized>(products: &mut [NewProduct], rng: &mut R) {
    for p in products.iter_mut() {
        let daily = rng.gen_range(2..=15);
        p.daily_sales = Some(daily);
        p.weekly_sales = Some(daily * rng.gen_range(5..=8));
        p.brand = BRANDS.choose(rng).map(|b| b.to_string());
        p.lead_time = Some(rng.gen_range(3..=14));
    }
}

/// Load a dataset CSV straight into the store. Returns the number of products inserted.
pub fn import_into_store(store: &SqliteStore, path: impl AsRef<Path>) -> Result<usize> {
    let products = read_csv(path)?;
    let inserted = store.add_products(&products)?;
    info!("Imported {} products into {}", inserted, store.db_path().display());
    Ok(inserted)
}
