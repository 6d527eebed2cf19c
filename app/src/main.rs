#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use roadwatch_config::Config;
use roadwatch_core::MergePolicy;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, FetchInput, FetchStrategy, InfoStrategy,
    InitStrategy, RunOptions, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "roadwatch")]
#[command(about = "Turn traffic advisories into per-road incident records", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/roadwatch/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the incident page and export its records
    Fetch {
        /// Page to fetch instead of the configured one
        #[arg(short, long)]
        url: Option<String>,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Extract records from a file with one sentence per line
    Extract {
        /// Input file, or '-' for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Show the effective configuration
    Info,
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[derive(clap::Args)]
struct RunArgs {
    /// CSV output path, or '-' for stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How repeated roads are merged: last-wins or first-wins
    #[arg(short, long)]
    policy: Option<MergePolicy>,

    /// Do not print the per-road summary
    #[arg(short, long)]
    quiet: bool,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        Self {
            output: args.output,
            policy: args.policy,
            quiet: args.quiet,
        }
    }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Fetch { url, run } => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            FetchStrategy
                .execute(FetchInput {
                    config,
                    url,
                    options: run.into(),
                })
                .await?;
        }
        Commands::Extract { input, run } => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            ExtractStrategy
                .execute(ExtractInput {
                    config,
                    input,
                    options: run.into(),
                })
                .await?;
        }
        Commands::Info => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            InfoStrategy.execute(config).await?;
        }
        Commands::Init => InitStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}
