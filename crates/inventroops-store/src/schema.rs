//! Database schema SQL.

/// Product and depot collections. Depots reference products only through
/// the shared `location` string, so there is no foreign key between them.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sku TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'Uncategorized',
    stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
    reorder_point INTEGER NOT NULL DEFAULT 10,
    supplier TEXT NOT NULL DEFAULT 'Unknown',
    price REAL NOT NULL DEFAULT 0,
    location TEXT NOT NULL DEFAULT 'Unknown',
    daily_sales INTEGER,
    weekly_sales INTEGER,
    brand TEXT,
    lead_time INTEGER,
    created_at TEXT,
    updated_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_products_location ON products(location);
CREATE INDEX IF NOT EXISTS idx_products_sku ON products(sku);

CREATE TABLE IF NOT EXISTS depots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    location TEXT NOT NULL,
    capacity INTEGER NOT NULL,
    current_utilization INTEGER NOT NULL,
    items_stored INTEGER NOT NULL,
    status TEXT NOT NULL,
    manager TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
