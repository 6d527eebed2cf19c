//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input type. The
//! fetch and extract commands differ only in where sentences come from, so
//! both hand their batch to [`run_pipeline`].

use anyhow::Context;
use roadwatch_config::Config;
use roadwatch_core::{MergePolicy, RecordSet, SentenceExtractor, process_batch};
use roadwatch_tools::{export_to_path, write_records};
use std::path::{Path, PathBuf};
use tracing::info;

mod extract;
mod fetch;
mod info;
mod init;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use fetch::{FetchInput, FetchStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Options shared by the commands that produce a CSV.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides `output.path`; `-` writes the CSV to stdout.
    pub output: Option<PathBuf>,
    /// Overrides `extraction.merge_policy`.
    pub policy: Option<MergePolicy>,
    pub quiet: bool,
}

/// Extract, merge and export one batch of sentences.
fn run_pipeline(
    config: &Config,
    sentences: &[String],
    options: &RunOptions,
) -> anyhow::Result<RecordSet> {
    let extractor =
        SentenceExtractor::new(&config.extraction).context("Failed to build sentence extractor")?;
    let policy = options.policy.unwrap_or(config.extraction.merge_policy);

    let records = process_batch(&extractor, sentences, policy);

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| config.output.path.clone());

    if output == Path::new("-") {
        write_records(&records, std::io::stdout().lock()).context("Failed to write CSV")?;
    } else {
        export_to_path(&records, &output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Wrote {} roads to {}", records.len(), output.display());

        if !options.quiet {
            print_records(&records);
        }
    }

    Ok(records)
}

fn print_records(records: &RecordSet) {
    if records.is_empty() {
        println!("No incidents found.");
        return;
    }

    for record in records {
        println!();
        println!("Roadway: {}", record.road_id);
        println!("Incidents: {}", record.incidents_summary());
        println!("Reason: {}", record.cause);
        println!("Location: {}", record.location);
        println!("Time: {}", record.time);
    }
}
