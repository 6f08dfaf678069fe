//! apbd-scraper - Regional budget realization (APBD) scraper for the DJPK portal
//!
//! Without a subcommand, runs the default export (DI Yogyakarta, 2015, January).

use anyhow::{Context, Result};
use apbd_scraper::commands::{ExportCommand, PemdaCommand, ProvincesCommand};
use apbd_scraper::config::{Config, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "apbd-scraper",
    version,
    about = "Regional budget realization (APBD) scraper for the DJPK portal",
    long_about = "Discovers provinces and their regencies/cities on the DJPK portal and \
                  exports the APBD realization table of each one as CSV."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "APBD_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, global = true, env = "APBD_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format for listings
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export APBD tables as CSV (all three stages)
    #[command(alias = "e")]
    Export {
        /// Province codes (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        province: Option<Vec<String>>,

        /// Budget years (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        year: Option<Vec<String>>,

        /// Reporting periods, 1 = January (comma-separated)
        #[arg(long, value_delimiter = ',')]
        period: Option<Vec<String>>,

        /// Directory receiving the CSV files
        #[arg(short, long, env = "APBD_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
    },

    /// List provinces
    Provinces,

    /// List regencies/cities of provinces for years
    Pemda {
        /// Province codes (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        province: Option<Vec<String>>,

        /// Budget years (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        year: Option<Vec<String>>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        None => run_export(config).await?,

        Some(Commands::Export { province, year, period, output_dir }) => {
            if let Some(province) = province {
                config.provinces = province;
            }
            if let Some(year) = year {
                config.years = year;
            }
            if let Some(period) = period {
                config.periods = period;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            run_export(config).await?;
        }

        Some(Commands::Provinces) => {
            let output = ProvincesCommand::new(config)
                .execute()
                .await
                .context("Failed to fetch province list")?;
            println!("{}", output);
        }

        Some(Commands::Pemda { province, year }) => {
            if let Some(province) = province {
                config.provinces = province;
            }
            if let Some(year) = year {
                config.years = year;
            }
            let output = PemdaCommand::new(config).execute().await?;
            println!("{}", output);
        }
    }

    Ok(())
}

async fn run_export(config: Config) -> Result<()> {
    let summary = ExportCommand::new(config).execute().await.context("Export aborted")?;

    for path in &summary.written {
        info!("Written: {}", path.display());
    }
    if !summary.skipped.is_empty() {
        warn!("{} queries skipped", summary.skipped.len());
    }

    Ok(())
}
