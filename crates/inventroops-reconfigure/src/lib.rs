//! Depot reconfiguration — redistribute products across depots and derive
//! capacity, utilization and status from target utilization ratios.

pub mod plan;
pub mod reconfigurer;
pub mod types;

pub use reconfigurer::DepotReconfigurer;
pub use types::*;
