//! Rule tables for incident tagging and road recognition.
//!
//! The defaults reproduce the phrase list used for Virginia 511 advisories,
//! but every table can be overridden from configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::merger::MergePolicy;

/// A vocabulary entry: when `phrase` occurs in a sentence, `tag` is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRule {
    /// Exact, case-sensitive phrase to look for.
    pub phrase: String,

    /// Tag appended to the record when the phrase matches.
    pub tag: String,
}

impl PhraseRule {
    #[must_use]
    pub fn new(phrase: &str, tag: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            tag: tag.to_string(),
        }
    }

    /// Rule whose tag is the phrase itself.
    #[must_use]
    pub fn literal(phrase: &str) -> Self {
        Self::new(phrase, phrase)
    }
}

/// One branch of an [`OverrideRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideBranch {
    /// The branch fires if any of these phrases occurs.
    pub triggers: Vec<String>,

    pub tag: String,
}

impl OverrideBranch {
    #[must_use]
    pub fn new(triggers: &[&str], tag: &str) -> Self {
        Self {
            triggers: triggers.iter().map(ToString::to_string).collect(),
            tag: tag.to_string(),
        }
    }

    fn fires(&self, sentence: &str) -> bool {
        self.triggers.iter().any(|t| sentence.contains(t.as_str()))
    }
}

/// Ordered if/else-if chain evaluated after the generic phrase scan.
///
/// At most one branch contributes a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub name: String,
    pub branches: Vec<OverrideBranch>,
}

impl OverrideRule {
    #[must_use]
    pub fn new(name: &str, branches: Vec<OverrideBranch>) -> Self {
        Self {
            name: name.to_string(),
            branches,
        }
    }

    /// Tag of the first branch that fires, if any.
    #[must_use]
    pub fn evaluate(&self, sentence: &str) -> Option<&str> {
        self.branches
            .iter()
            .find(|b| b.fires(sentence))
            .map(|b| b.tag.as_str())
    }
}

/// Configuration for the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Generic phrase vocabulary, scanned in order.
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<PhraseRule>,

    /// Specialized closure rules, evaluated after the vocabulary.
    #[serde(default = "default_overrides")]
    pub overrides: Vec<OverrideRule>,

    /// Road prefixes recognized after "On ", e.g. `I-` or `Rt. `.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Direction letters allowed after the route number.
    #[serde(default = "default_directions")]
    pub directions: Vec<char>,

    /// How repeated roads within a batch are merged.
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            overrides: default_overrides(),
            prefixes: default_prefixes(),
            directions: default_directions(),
            merge_policy: MergePolicy::default(),
        }
    }
}

impl ExtractionConfig {
    /// Check the tables before patterns are compiled from them.
    pub fn validate(&self) -> Result<()> {
        if self.prefixes.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one road prefix is required".to_string(),
            ));
        }
        if let Some(prefix) = self.prefixes.iter().find(|p| p.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "road prefix must not be blank: {prefix:?}"
            )));
        }
        if let Some(d) = self.directions.iter().find(|d| !d.is_ascii_alphabetic()) {
            return Err(Error::InvalidConfig(format!(
                "direction must be a single ASCII letter, got {d:?}"
            )));
        }
        if let Some(rule) = self
            .vocabulary
            .iter()
            .find(|r| r.phrase.is_empty() || r.tag.is_empty())
        {
            return Err(Error::InvalidConfig(format!(
                "vocabulary entry has an empty phrase or tag: {rule:?}"
            )));
        }
        for rule in &self.overrides {
            let empty_branch = rule.branches.iter().any(|b| {
                b.tag.is_empty() || b.triggers.is_empty() || b.triggers.iter().any(String::is_empty)
            });
            if rule.branches.is_empty() || empty_branch {
                return Err(Error::InvalidConfig(format!(
                    "override rule '{}' has an empty branch",
                    rule.name
                )));
            }
        }
        Ok(())
    }
}

/// Phrases recognized in 511 advisories.
#[must_use]
pub fn default_vocabulary() -> Vec<PhraseRule> {
    [
        "crash",
        "delay",
        "backup",
        "alternating closure",
        "ramp is closed",
        "detour",
        "All north lanes are closed",
        "All south lanes are closed",
        "All east lanes are closed",
        "All west lanes are closed",
    ]
    .into_iter()
    .map(PhraseRule::literal)
    .collect()
}

/// Lane and shoulder closure rules.
///
/// Advisories say "1 of 2 lane are closed" as often as "lanes are closed",
/// so both spellings map to the plural tag.
#[must_use]
pub fn default_overrides() -> Vec<OverrideRule> {
    vec![
        OverrideRule::new(
            "lane_closure",
            vec![
                OverrideBranch::new(&["lane are closed", "lanes are closed"], "lanes closed"),
                OverrideBranch::new(&["lane is closed"], "lane closed"),
            ],
        ),
        OverrideRule::new(
            "shoulder_closure",
            vec![
                OverrideBranch::new(
                    &["shoulder are closed", "shoulders are closed"],
                    "shoulders closed",
                ),
                OverrideBranch::new(&["shoulder is closed"], "shoulder closed"),
            ],
        ),
    ]
}

#[must_use]
pub fn default_prefixes() -> Vec<String> {
    ["VA-", "I-", "US-", "Rt. "]
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

#[must_use]
pub fn default_directions() -> Vec<char> {
    vec!['N', 'E', 'S', 'W']
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_vocabulary_order() {
        let vocab = default_vocabulary();
        assert_eq!(vocab[0].tag, "crash");
        assert_eq!(vocab[1].tag, "delay");
        assert_eq!(vocab.len(), 10);
    }

    #[test]
    fn test_override_plural_beats_singular() {
        let rules = default_overrides();
        let lane = &rules[0];
        assert_eq!(
            lane.evaluate("1 of 2 lane are closed and 1 lane is closed"),
            Some("lanes closed")
        );
        assert_eq!(lane.evaluate("The right lane is closed."), Some("lane closed"));
        assert_eq!(lane.evaluate("Traffic is moving."), None);
    }

    #[test]
    fn test_shoulder_override() {
        let rules = default_overrides();
        let shoulder = &rules[1];
        assert_eq!(
            shoulder.evaluate("The right shoulder is closed."),
            Some("shoulder closed")
        );
        assert_eq!(
            shoulder.evaluate("Both shoulders are closed."),
            Some("shoulders closed")
        );
    }

    #[test]
    fn test_empty_prefixes_rejected() {
        let config = ExtractionConfig {
            prefixes: vec![],
            ..ExtractionConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_non_letter_direction_rejected() {
        let config = ExtractionConfig {
            directions: vec!['N', '9'],
            ..ExtractionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_override_branch_rejected() {
        let config = ExtractionConfig {
            overrides: vec![OverrideRule::new("broken", vec![])],
            ..ExtractionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_partial_json_uses_defaults() {
        let config: ExtractionConfig = serde_json::from_str(r#"{"prefixes": ["SR-"]}"#)
            .expect("partial config should deserialize");
        assert_eq!(config.prefixes, vec!["SR-"]);
        assert_eq!(config.vocabulary, default_vocabulary());
        assert_eq!(config.directions, default_directions());
        assert_eq!(config.merge_policy, MergePolicy::LastWins);
    }
}
