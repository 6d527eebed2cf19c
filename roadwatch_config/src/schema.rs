use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// Section types live next to the code that consumes them
use roadwatch_core::ExtractionConfig;
use roadwatch_tools::SourceConfig;

const CONFIG_DIR: &str = "roadwatch";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl OutputConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("traffic_data.csv")
    }
}

impl Config {
    /// `~/roadwatch/config.json`
    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    /// Load from the default location, failing if the file is missing.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::default_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'roadwatch init' to create config.",
                config_path.display()
            );
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config
            .extraction
            .validate()
            .with_context(|| format!("Invalid extraction rules in {}", path.display()))?;

        Ok(config)
    }

    /// Load `path` (or the default location), falling back to built-in
    /// defaults when no file exists there.
    ///
    /// An explicitly given path that does not exist is an error.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let default_path = Self::default_path()?;
        if default_path.exists() {
            info!("Loaded config from {}", default_path.display());
            Self::load_from(&default_path)
        } else {
            warn!(
                "No config file at {}, using built-in defaults",
                default_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Write the default config to `~/roadwatch/config.json`.
    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE);
        Self::create_config_at(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("🔧 Configuration options:");
        println!("   - source.url: Incident page to fetch");
        println!("   - extraction.vocabulary: Phrases recognized as incident tags");
        println!("   - extraction.prefixes: Road prefixes recognized after \"On \"");
        println!("   - extraction.merge_policy: last_wins or first_wins for repeated roads");
        println!("   - output.path: Where the CSV is written");
        println!();
        Ok(config_path)
    }

    /// Write the default config to `path`, refusing to overwrite.
    pub fn create_config_at(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        let template = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(path, template)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadwatch_core::MergePolicy;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").expect("empty config should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.output.path, PathBuf::from("traffic_data.csv"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_partial_sections() {
        let json = r#"{
            "source": { "timeout": 30 },
            "extraction": { "merge_policy": "first_wins" },
            "output": { "path": "/tmp/out.csv" }
        }"#;
        let config: Config = serde_json::from_str(json).expect("partial config should parse");

        assert_eq!(config.source.timeout, 30);
        assert_eq!(config.source.url, SourceConfig::default().url);
        assert_eq!(config.extraction.merge_policy, MergePolicy::FirstWins);
        assert_eq!(config.extraction.prefixes.len(), 4);
        assert_eq!(config.output.path, PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_create_then_load() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("config.json");

        Config::create_config_at(&path).expect("config should be written");
        let loaded = Config::load_from(&path).expect("written config should load");
        assert_eq!(loaded, Config::default());

        assert!(Config::create_config_at(&path).is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_invalid_rules_rejected() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"prefixes": []}}"#)
            .expect("config should be written");

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let path = Path::new("/nonexistent/roadwatch/config.json");
        assert!(Config::load_or_default(Some(path)).is_err());
    }
}
