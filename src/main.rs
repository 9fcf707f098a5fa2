//! Command-line interface for random-data-load
//!
//! # Usage Examples
//!
//! ```bash
//! # Insert 100000 rows into shop.orders
//! random-data-load run \
//!   --host 127.0.0.1 --port 3306 --user root --password secret \
//!   --database shop --table orders --rows 100000
//!
//! # Same, with a DSN and 8 statements in flight
//! random-data-load run --dsn h=127.0.0.1,u=root,p=secret,D=shop,t=orders \
//!   --rows 100000 --bulk-size 500 --concurrency 8
//!
//! # Print the statements for a table described in YAML, without a server
//! random-data-load run --dry-run --table-definition orders.yaml --rows 10 --seed 42
//! ```
//!
//! Logs go to stderr at `info` (`warn` with `--quiet`); `RUST_LOG` overrides.

use anyhow::Context;
use clap::{Parser, Subcommand};
use load_core::Table;
use load_populate_mysql::{MySQLPopulateArgs, MySQLPopulator, PopulateReport};
use random_data_load::{populate_options, resolve_target, spawn_progress_reporter};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "random-data-load")]
#[command(about = "Load random data into MySQL tables")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert random rows into a table
    Run {
        #[command(flatten)]
        args: MySQLPopulateArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let quiet = match &cli.command {
        Commands::Run { args } => args.common.quiet,
    };
    let default_level = if quiet { "warn" } else { "info" };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { args } => run_load(args).await,
    }
}

async fn run_load(args: MySQLPopulateArgs) -> anyhow::Result<()> {
    let options = populate_options(&args.common);
    info!(
        "Loading {} rows (bulk size {}, concurrency {}, seed={})",
        options.rows, options.bulk_size, options.concurrency, options.seed
    );

    let (populator, table) = match &args.common.table_definition {
        Some(path) => {
            let table = Table::from_file(path)
                .with_context(|| format!("Failed to load table definition from {path:?}"))?;
            (MySQLPopulator::offline(), table)
        }
        None => {
            let target = resolve_target(&args)?;
            let populator = MySQLPopulator::connect(&target.connection);
            let table = populator
                .load_table(&target.database, &target.table)
                .await
                .with_context(|| {
                    format!(
                        "Failed to read the layout of {}.{} from {}",
                        target.database, target.table, target.connection
                    )
                })?;
            (populator, table)
        }
    };

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let (populator, reporter) = if args.common.quiet {
        (populator, None)
    } else {
        (
            populator.with_progress(progress_tx),
            Some(spawn_progress_reporter(options.rows, progress_rx)),
        )
    };

    let report = if args.common.dry_run {
        populator
            .dry_run(&table, &options, Box::new(std::io::stdout()))
            .await
            .context("Dry run failed")?
    } else {
        populator
            .run(&table, &options)
            .await
            .with_context(|| format!("Failed to load {}.{}", table.schema, table.name))?
    };

    populator.disconnect().await?;
    if let Some(reporter) = reporter {
        reporter.await?;
    }

    print_report(&report, args.common.dry_run);
    Ok(())
}

fn print_report(report: &PopulateReport, dry_run: bool) {
    if !report.excluded_columns.is_empty() {
        info!(
            "Columns left to their defaults: {}",
            report.excluded_columns.join(", ")
        );
    }
    info!(
        "Total rows inserted: {} ({} retries, {:?})",
        report.inserted, report.retries, report.elapsed
    );
    if !dry_run {
        println!("Total rows inserted: {}", report.inserted);
    }

    if let Some(message) = report.shortfall_message() {
        eprintln!("{message}");
    }
}
