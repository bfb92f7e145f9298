//! Inventroops Seed — synthetic datasets, CSV import, bulk upload to the
//! inventory API, depot seeding and diagnostics.

pub mod dataset;
pub mod depots;
pub mod diagnostics;
pub mod upload;

pub use dataset::{
    enrich_for_forecasting, generate_dataset, import_into_store, read_csv, write_csv, DatasetSpec,
};
pub use depots::{default_depot_seeds, DepotSeed, DepotSeeder, SeedDepotsReport};
pub use diagnostics::{check_apis, check_store, ApiReport, StoreReport};
pub use upload::{BulkUploader, UploadSummary};
