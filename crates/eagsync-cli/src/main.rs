use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod compare;
mod report;
mod scrape;
mod stories;
mod sync;

#[derive(Debug, Parser)]
#[command(name = "eagsync-cli")]
#[command(about = "Scrape dealership listings and sync them to the content store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Current,
    Sold,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Console,
    Json,
    Html,
    All,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the vehicle inventory into a local snapshot file
    Scrape {
        /// Only scrape the first N vehicles
        #[arg(long)]
        limit: Option<usize>,
        /// Filter the inventory index by sale status
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
    },
    /// Scrape blog stories into a local snapshot file
    Stories {
        /// Only scrape the first N stories
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Push the vehicle snapshot to the content store
    Sync {
        /// Preview create/update decisions without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Only sync vehicles with this chassis code
        #[arg(long)]
        chassis: Option<String>,
        /// Only sync these slugs (comma-separated)
        #[arg(long)]
        slugs: Option<String>,
        /// Only sync the first N vehicles after filtering
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Compare the vehicle snapshot against the content store
    Compare {
        /// Report output format
        #[arg(long, value_enum, default_value_t = FormatArg::Console)]
        format: FormatArg,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = eagsync_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { limit, status } => scrape::run_scrape(&config, limit, status).await,
        Commands::Stories { limit } => stories::run_stories(&config, limit).await,
        Commands::Sync {
            dry_run,
            chassis,
            slugs,
            limit,
        } => sync::run_sync(&config, dry_run, chassis.as_deref(), slugs.as_deref(), limit).await,
        Commands::Compare { format } => compare::run_compare(&config, format).await,
    }
}
