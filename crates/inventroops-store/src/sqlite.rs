//! SQLite-backed product and depot collections.
//!
//! One connection behind a mutex. Multi-step writes go through
//! [`SqliteStore::transaction`], which commits only if every step succeeds.

use std::path::{Path, PathBuf};

use inventroops_core::{DepotStatus, Error, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

use crate::schema::SCHEMA_SQL;
use crate::types::*;

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "inventroops.db";

/// SQLite store holding the `products` and `depots` collections.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the SQLite store.
    ///
    /// `data_dir` is the directory (e.g., `data/`). The file will be `data_dir/inventroops.db`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = data_dir.join(DB_FILE_NAME);

        let conn = Self::create_connection(&db_path)?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        info!(
            "SqliteStore initialized: {} products, {} depots, path={}",
            store.count_products()?,
            store.count_depots()?,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` inside a single transaction. Any error rolls back every write made through it.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreTransaction<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;
        let scope = StoreTransaction { tx };
        let out = f(&scope)?;
        scope
            .tx
            .commit()
            .map_err(|e| Error::Database(format!("Commit failed: {}", e)))?;
        Ok(out)
    }

    // ---------------------------------------------------------------
    // Products
    // ---------------------------------------------------------------

    /// Insert a single product. Returns the new product ID.
    pub fn add_product(&self, product: &NewProduct) -> Result<i64> {
        self.transaction(|tx| tx.insert_product(product))
    }

    /// Insert many products atomically. Returns the number inserted.
    pub fn add_products(&self, products: &[NewProduct]) -> Result<usize> {
        let inserted = self.transaction(|tx| {
            for p in products {
                tx.insert_product(p)?;
            }
            Ok(products.len())
        })?;
        debug!("Inserted {} products", inserted);
        Ok(inserted)
    }

    /// Get a product by ID.
    pub fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM products WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id], |row| Ok(Self::row_to_product(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// First product by ID, used as a diagnostic sample.
    pub fn first_product(&self) -> Result<Option<Product>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM products ORDER BY id ASC LIMIT 1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row([], |row| Ok(Self::row_to_product(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// Get all products, ordered by ID so callers see a stable order.
    pub fn get_all_products(&self) -> Result<Vec<Product>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT * FROM products ORDER BY id ASC")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| Ok(Self::row_to_product(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Products currently assigned to a location.
    pub fn get_products_by_location(&self, location: &str) -> Result<Vec<Product>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached("SELECT * FROM products WHERE location = ?1 ORDER BY id ASC")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![location], |row| Ok(Self::row_to_product(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Count total products.
    pub fn count_products(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Depots
    // ---------------------------------------------------------------

    /// Get all depots in insertion order.
    pub fn get_all_depots(&self) -> Result<Vec<Depot>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT * FROM depots ORDER BY id ASC")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| Ok(Self::row_to_depot(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Count total depots.
    pub fn count_depots(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM depots", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    /// Collection names, counts and file size.
    pub fn get_stats(&self) -> Result<StoreStats> {
        let total_products = self.count_products()?;
        let total_depots = self.count_depots()?;

        let conn = self.conn.lock();
        let total_stock: i64 = conn
            .query_row("SELECT COALESCE(SUM(stock), 0) FROM products", [], |row| {
                row.get(0)
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' \
                 AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;
        drop(stmt);
        drop(conn);

        let db_size = std::fs::metadata(&self.db_path)
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(StoreStats {
            tables,
            total_products,
            total_depots,
            total_stock,
            db_path: self.db_path.to_string_lossy().to_string(),
            db_size_mb: db_size as f64 / (1024.0 * 1024.0),
        })
    }

    // ---------------------------------------------------------------
    // Row Mapping Helpers
    // ---------------------------------------------------------------

    fn row_to_product(row: &rusqlite::Row<'_>) -> Product {
        Product {
            id: row.get("id").unwrap_or(0),
            sku: row.get("sku").unwrap_or_default(),
            name: row.get("name").unwrap_or_default(),
            category: row.get("category").unwrap_or_default(),
            stock: row.get("stock").unwrap_or(0),
            reorder_point: row.get("reorder_point").unwrap_or(0),
            supplier: row.get("supplier").unwrap_or_default(),
            price: row.get("price").unwrap_or(0.0),
            location: row.get("location").unwrap_or_default(),
            daily_sales: row.get("daily_sales").ok().flatten(),
            weekly_sales: row.get("weekly_sales").ok().flatten(),
            brand: row.get("brand").ok().flatten(),
            lead_time: row.get("lead_time").ok().flatten(),
            created_at: row.get("created_at").ok().flatten(),
            updated_at: row.get("updated_at").ok().flatten(),
        }
    }

    fn row_to_depot(row: &rusqlite::Row<'_>) -> Depot {
        Depot {
            id: row.get("id").unwrap_or(0),
            name: row.get("name").unwrap_or_default(),
            location: row.get("location").unwrap_or_default(),
            capacity: row.get("capacity").unwrap_or(0),
            current_utilization: row.get("current_utilization").unwrap_or(0),
            items_stored: row.get("items_stored").unwrap_or(0),
            status: row
                .get::<_, String>("status")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DepotStatus::Normal),
            manager: row.get("manager").ok().flatten(),
            created_at: row.get("created_at").unwrap_or_default(),
            updated_at: row.get("updated_at").unwrap_or_default(),
        }
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Write operations available inside [`SqliteStore::transaction`].
pub struct StoreTransaction<'a> {
    tx: Transaction<'a>,
}

impl StoreTransaction<'_> {
    /// Insert a product. `createdAt` defaults to now.
    pub fn insert_product(&self, product: &NewProduct) -> Result<i64> {
        let now = now_rfc3339();
        let created_at = product.created_at.clone().unwrap_or_else(|| now.clone());
        self.tx
            .prepare_cached(
                "INSERT INTO products (sku, name, category, stock, reorder_point, supplier, \
                 price, location, daily_sales, weekly_sales, brand, lead_time, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                product.sku,
                product.name,
                product.category,
                product.stock,
                product.reorder_point,
                product.supplier,
                product.price,
                product.location,
                product.daily_sales,
                product.weekly_sales,
                product.brand,
                product.lead_time,
                created_at,
                now,
            ])
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Delete every depot document. Returns the number removed.
    pub fn delete_all_depots(&self) -> Result<usize> {
        self.tx
            .execute("DELETE FROM depots", [])
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Set `location` on every listed product. Returns the number of rows changed.
    pub fn update_product_locations(&self, ids: &[i64], location: &str) -> Result<usize> {
        let now = now_rfc3339();
        let mut stmt = self
            .tx
            .prepare_cached("UPDATE products SET location = ?1, updated_at = ?2 WHERE id = ?3")
            .map_err(|e| Error::Database(e.to_string()))?;
        let mut changed = 0;
        for id in ids {
            changed += stmt
                .execute(params![location, now, id])
                .map_err(|e| Error::Database(e.to_string()))?;
        }
        Ok(changed)
    }

    /// Overwrite `stock` on every listed product. Returns the number of rows changed.
    pub fn set_product_stock(&self, ids: &[i64], stock: i64) -> Result<usize> {
        let now = now_rfc3339();
        let mut stmt = self
            .tx
            .prepare_cached("UPDATE products SET stock = ?1, updated_at = ?2 WHERE id = ?3")
            .map_err(|e| Error::Database(e.to_string()))?;
        let mut changed = 0;
        for id in ids {
            changed += stmt
                .execute(params![stock, now, id])
                .map_err(|e| Error::Database(e.to_string()))?;
        }
        Ok(changed)
    }

    /// Insert a depot document. Returns the new depot ID.
    pub fn insert_depot(&self, depot: &NewDepot) -> Result<i64> {
        self.tx
            .prepare_cached(
                "INSERT INTO depots (name, location, capacity, current_utilization, items_stored, \
                 status, manager, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                depot.name,
                depot.location,
                depot.capacity,
                depot.current_utilization,
                depot.items_stored,
                depot.status.as_str(),
                depot.manager,
                depot.created_at,
                depot.updated_at,
            ])
            .map_err(|e| Error::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn product(sku: &str, stock: i64, location: &str) -> NewProduct {
        NewProduct {
            sku: sku.into(),
            name: format!("Item {}", sku),
            stock,
            location: location.into(),
            ..Default::default()
        }
    }

    fn depot(name: &str) -> NewDepot {
        NewDepot {
            name: name.into(),
            location: "Pune".into(),
            capacity: 200,
            current_utilization: 100,
            items_stored: 100,
            status: DepotStatus::Normal,
            manager: None,
            created_at: "2024-01-01".into(),
            updated_at: "2024-01-02".into(),
        }
    }

    #[test]
    fn test_add_and_get_product() {
        let (store, _dir) = test_store();

        let id = store.add_product(&product("SKU001", 25, "North Zone")).unwrap();
        let p = store.get_product(id).unwrap().unwrap();
        assert_eq!(p.sku, "SKU001");
        assert_eq!(p.stock, 25);
        assert_eq!(p.location, "North Zone");
        assert_eq!(p.category, "Uncategorized");
        assert!(p.created_at.is_some());
    }

    #[test]
    fn test_products_listed_in_id_order() {
        let (store, _dir) = test_store();
        let batch: Vec<_> = (1..=5)
            .map(|i| product(&format!("SKU{:03}", i), i, "Unknown"))
            .collect();
        assert_eq!(store.add_products(&batch).unwrap(), 5);

        let all = store.get_all_products().unwrap();
        let skus: Vec<_> = all.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, ["SKU001", "SKU002", "SKU003", "SKU004", "SKU005"]);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(store.first_product().unwrap().unwrap().sku, "SKU001");
    }

    #[test]
    fn test_negative_stock_rejected() {
        let (store, _dir) = test_store();
        let result = store.add_product(&product("SKU001", -1, "Unknown"));
        assert!(matches!(result, Err(Error::Database(_))));
    }

    #[test]
    fn test_update_locations_and_stock() {
        let (store, _dir) = test_store();
        let a = store.add_product(&product("A", 0, "Unknown")).unwrap();
        let b = store.add_product(&product("B", 0, "Unknown")).unwrap();
        let c = store.add_product(&product("C", 7, "Unknown")).unwrap();

        let changed = store
            .transaction(|tx| {
                let n = tx.update_product_locations(&[a, b], "East Depot")?;
                tx.set_product_stock(&[a, b], 50)?;
                Ok(n)
            })
            .unwrap();
        assert_eq!(changed, 2);

        let east = store.get_products_by_location("East Depot").unwrap();
        assert_eq!(east.len(), 2);
        assert!(east.iter().all(|p| p.stock == 50));
        assert_eq!(store.get_product(c).unwrap().unwrap().location, "Unknown");
    }

    #[test]
    fn test_depot_insert_and_delete_all() {
        let (store, _dir) = test_store();
        store
            .transaction(|tx| {
                tx.insert_depot(&depot("North Depot"))?;
                tx.insert_depot(&NewDepot {
                    status: DepotStatus::Critical,
                    ..depot("West Depot")
                })?;
                Ok(())
            })
            .unwrap();

        let depots = store.get_all_depots().unwrap();
        assert_eq!(depots.len(), 2);
        assert_eq!(depots[1].name, "West Depot");
        assert_eq!(depots[1].status, DepotStatus::Critical);

        let removed = store.transaction(|tx| tx.delete_all_depots()).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count_depots().unwrap(), 0);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let (store, _dir) = test_store();
        let id = store.add_product(&product("A", 3, "Unknown")).unwrap();
        store
            .transaction(|tx| tx.insert_depot(&depot("Old Depot")))
            .unwrap();

        let result: Result<()> = store.transaction(|tx| {
            tx.delete_all_depots()?;
            tx.update_product_locations(&[id], "North Depot")?;
            Err(Error::Internal("simulated failure".into()))
        });
        assert!(result.is_err());

        assert_eq!(store.get_product(id).unwrap().unwrap().location, "Unknown");
        let depots = store.get_all_depots().unwrap();
        assert_eq!(depots.len(), 1);
        assert_eq!(depots[0].name, "Old Depot");
    }

    #[test]
    fn test_stats() {
        let (store, _dir) = test_store();
        store
            .add_products(&[product("A", 5, "X"), product("B", 20, "Y")])
            .unwrap();

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_depots, 0);
        assert_eq!(stats.total_stock, 25);
        assert!(stats.tables.contains(&"products".to_string()));
        assert!(stats.tables.contains(&"depots".to_string()));
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        {
            let store = SqliteStore::open(dir.path()).unwrap();
            store.add_product(&product("A", 1, "X")).unwrap();
        }
        let store = SqliteStore::open(dir.path()).unwrap();
        assert_eq!(store.count_products().unwrap(), 1);
    }
}
