//! Inventroops — depot reconfiguration and seeding tool for the inventory app.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inventroops_core::{AppConfig, ReconfigureConfig};
use inventroops_reconfigure::{DepotReconfigurer, ReconfigureOutcome};
use inventroops_seed::{
    check_apis, check_store, default_depot_seeds, enrich_for_forecasting, generate_dataset,
    import_into_store, read_csv, BulkUploader, DatasetSpec, DepotSeeder,
};
use inventroops_store::SqliteStore;

mod report;

const DEFAULT_DATASET: &str = "data/trial_250_depot_dataset.csv";

#[derive(Parser)]
#[command(name = "inventroops", about = "Depot reconfiguration and seeding for the inventory app")]
struct Cli {
    /// Data directory holding inventroops.db.
    #[arg(long, env = "INVENTROOPS_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Print reports as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a synthetic product dataset CSV.
    GenerateDataset {
        #[arg(long, default_value = DEFAULT_DATASET)]
        output: PathBuf,
        #[arg(long, default_value_t = 50)]
        items_per_depot: usize,
        /// Seed for reproducible prices.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Load a dataset CSV into the local store.
    Import {
        #[arg(long, default_value = DEFAULT_DATASET)]
        csv: PathBuf,
    },
    /// Upload a dataset CSV to the inventory API in bulk.
    SeedProducts {
        #[arg(long, default_value = DEFAULT_DATASET)]
        csv: PathBuf,
        /// Add sales and lead-time fields for the forecasting service.
        #[arg(long)]
        enrich: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Create the default zone depots through the inventory API.
    SeedDepots,
    /// Redistribute products across depots and rebuild the depot collection.
    Reconfigure {
        /// JSON depot plan; the built-in four-depot plan is used otherwise.
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Compute and print the plan without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show collections, counts and a sample product from the store.
    CheckDb,
    /// Probe the inventory and forecasting APIs.
    CheckApi,
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

fn open_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    SqliteStore::open(&config.data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env(&cli.data_dir)
        .with_context(|| format!("Failed to prepare data directory {}", cli.data_dir.display()))?;
    info!("Data directory: {}", config.data_dir.display());

    match cli.command {
        Command::GenerateDataset {
            output,
            items_per_depot,
            seed,
        } => {
            let spec = DatasetSpec {
                items_per_depot,
                ..Default::default()
            };
            let rows = generate_dataset(&output, &spec, &mut rng_from(seed))?;
            println!("Generated {} ({} products)", output.display(), rows);
        }
        Command::Import { csv } => {
            let store = open_store(&config)?;
            let inserted = import_into_store(&store, &csv)?;
            println!("Imported {} products", inserted);
        }
        Command::SeedProducts { csv, enrich, seed } => {
            let mut products = read_csv(&csv)?;
            if enrich {
                enrich_for_forecasting(&mut products, &mut rng_from(seed));
            }
            let uploader =
                BulkUploader::new(reqwest::Client::new(), &config.api_url, config.bulk_chunk_size);
            let summary = uploader.upload(&products).await;
            report::print_upload(&summary, cli.json)?;
            if summary.chunks_failed > 0 {
                anyhow::bail!("{} of {} chunks failed", summary.chunks_failed, summary.chunks_sent);
            }
        }
        Command::SeedDepots => {
            let seeder = DepotSeeder::new(reqwest::Client::new(), &config.api_url);
            let seeded = seeder.seed(&default_depot_seeds()).await;
            report::print_seed_depots(&seeded, cli.json)?;
            if !seeded.failed.is_empty() {
                anyhow::bail!("{} depots could not be created", seeded.failed.len());
            }
        }
        Command::Reconfigure { plan, dry_run } => {
            let plan_config = match plan {
                Some(path) => ReconfigureConfig::from_file(&path)
                    .with_context(|| format!("Invalid depot plan {}", path.display()))?,
                None => ReconfigureConfig::default(),
            };
            let store = open_store(&config)?;

            if dry_run {
                match DepotReconfigurer::preview(&store, &plan_config)? {
                    Some(p) => report::print_plan(&p, cli.json)?,
                    None => println!("No products found to distribute"),
                }
            } else {
                match DepotReconfigurer::run(&store, &plan_config)? {
                    ReconfigureOutcome::Completed(r) => report::print_reconfigure(&r, cli.json)?,
                    ReconfigureOutcome::NothingToDistribute => {
                        println!("No products found to distribute")
                    }
                }
            }
        }
        Command::CheckDb => {
            let store = open_store(&config)?;
            let db = check_store(&store)?;
            report::print_store(&db, cli.json)?;
        }
        Command::CheckApi => {
            let client = reqwest::Client::new();
            let api = check_apis(&client, &config.api_url, &config.ml_api_url).await;
            report::print_api(&api, cli.json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reconfigure_flags() {
        let cli = Cli::parse_from([
            "inventroops",
            "reconfigure",
            "--plan",
            "plan.json",
            "--dry-run",
            "--data-dir",
            "/tmp/inv",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/inv"));
        match cli.command {
            Command::Reconfigure { plan, dry_run } => {
                assert_eq!(plan, Some(PathBuf::from("plan.json")));
                assert!(dry_run);
            }
            _ => panic!("expected reconfigure"),
        }
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::parse_from(["inventroops", "generate-dataset"]);
        match cli.command {
            Command::GenerateDataset {
                output,
                items_per_depot,
                seed,
            } => {
                assert_eq!(output, PathBuf::from(DEFAULT_DATASET));
                assert_eq!(items_per_depot, 50);
                assert!(seed.is_none());
            }
            _ => panic!("expected generate-dataset"),
        }
    }
}
