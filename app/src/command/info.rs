use roadwatch_config::Config;
use roadwatch_core::{OverrideRule, PatternKind, PatternTable};
use tracing::info;

/// Strategy for displaying the effective configuration.
///
/// Prints every section and compiles the pattern table so rule mistakes
/// show up before a fetch is attempted.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = Config;

    async fn execute(&self, config: Self::Input) -> anyhow::Result<()> {
        println!("=== roadwatch Configuration ===\n");

        println!("Source:");
        println!("  URL: {}", config.source.url);
        println!("  Timeout: {}s", config.source.timeout);
        println!("  Max Size: {} bytes", config.source.max_size);
        println!("  User-Agent: {}", truncate(&config.source.user_agent, 60));
        println!();

        let extraction = &config.extraction;
        println!("Extraction:");
        println!("  Prefixes: {}", format_prefixes(&extraction.prefixes));
        let directions: String = extraction.directions.iter().collect();
        println!("  Directions: {directions}");
        println!("  Merge Policy: {}", extraction.merge_policy.as_str());
        println!("  Vocabulary ({} phrases):", extraction.vocabulary.len());
        for rule in &extraction.vocabulary {
            if rule.phrase == rule.tag {
                println!("    - {}", rule.phrase);
            } else {
                println!("    - {} -> {}", rule.phrase, rule.tag);
            }
        }
        println!("  Override Rules:");
        for rule in &extraction.overrides {
            println!("    - {}", format_override(rule));
        }
        println!();

        info!("Compiling pattern table");
        match PatternTable::new(extraction) {
            Ok(table) => {
                println!("Patterns:");
                for kind in PatternKind::ALL {
                    println!("  {}: {}", kind.as_str(), table.regex(kind).as_str());
                }
            }
            Err(e) => {
                println!("Patterns: failed to compile");
                println!("  Error: {e}");
            }
        }
        println!();

        println!("Output:");
        println!("  Path: {}", config.output.path.display());

        Ok(())
    }
}

fn format_prefixes(prefixes: &[String]) -> String {
    prefixes
        .iter()
        .map(|p| format!("{p:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_override(rule: &OverrideRule) -> String {
    let branches = rule
        .branches
        .iter()
        .map(|b| format!("[{}] -> {}", b.triggers.join(" | "), b.tag))
        .collect::<Vec<_>>()
        .join("; else ");
    format!("{}: {branches}", rule.name)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}
