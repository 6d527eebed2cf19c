use anyhow::Context;
use roadwatch_config::Config;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::info;

use super::RunOptions;

/// Input parameters for the Extract command strategy.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    pub config: Config,
    /// Sentence file, `-` for stdin
    pub input: PathBuf,
    pub options: RunOptions,
}

/// Strategy for extracting records from already-fetched sentences.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let sentences = if input.input == Path::new("-") {
            read_sentences(std::io::stdin().lock()).context("Failed to read stdin")?
        } else {
            let file = std::fs::File::open(&input.input)
                .with_context(|| format!("Failed to open {}", input.input.display()))?;
            read_sentences(file)
                .with_context(|| format!("Failed to read {}", input.input.display()))?
        };
        info!("Read {} sentences", sentences.len());

        super::run_pipeline(&input.config, &sentences, &input.options)?;
        Ok(())
    }
}

/// One sentence per non-blank line, trimmed.
fn read_sentences(reader: impl Read) -> std::io::Result<Vec<String>> {
    let mut sentences = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            sentences.push(line.to_string());
        }
    }
    Ok(sentences)
}
