use roadwatch_config::Config;
use roadwatch_tools::SourceFetcher;
use tracing::{info, warn};

use super::RunOptions;

/// Input parameters for the Fetch command strategy.
#[derive(Debug, Clone)]
pub struct FetchInput {
    pub config: Config,
    /// Optional page override
    pub url: Option<String>,
    pub options: RunOptions,
}

/// Strategy for the fetch command.
///
/// Downloads the incident page, slices it into sentences and runs the
/// extraction pipeline over them.
#[derive(Debug, Clone, Copy)]
pub struct FetchStrategy;

impl super::CommandStrategy for FetchStrategy {
    type Input = FetchInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut source = input.config.source.clone();
        if let Some(url) = input.url {
            source.url = url;
        }

        info!("Fetching advisories from {}", source.url);
        let fetcher = SourceFetcher::new(source)?;
        let sentences = fetcher.fetch_sentences().await?;

        if sentences.is_empty() {
            warn!("Page contained no advisory sentences");
        }

        super::run_pipeline(&input.config, &sentences, &input.options)?;
        Ok(())
    }
}
