//! Sentence extractor.
//!
//! Applies the pattern table and vocabulary to one advisory sentence and
//! returns a partial record for each road the sentence names.

use tracing::{debug, trace};

use crate::error::Result;
use crate::patterns::PatternTable;
use crate::record::{PartialRecord, RoadKey};
use crate::vocabulary::{ExtractionConfig, OverrideRule, PhraseRule};

/// Extraction engine for turning advisory sentences into partial records.
#[derive(Debug, Clone)]
pub struct SentenceExtractor {
    patterns: PatternTable,
    vocabulary: Vec<PhraseRule>,
    overrides: Vec<OverrideRule>,
}

impl SentenceExtractor {
    /// Create an extractor from configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a pattern fails
    /// to compile.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let patterns = PatternTable::new(config)?;
        debug!(
            vocabulary = config.vocabulary.len(),
            overrides = config.overrides.len(),
            prefixes = ?config.prefixes,
            "Sentence extractor ready"
        );

        Ok(Self {
            patterns,
            vocabulary: config.vocabulary.clone(),
            overrides: config.overrides.clone(),
        })
    }

    /// Create an extractor with the default Virginia 511 rules.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&ExtractionConfig::default())
    }

    #[must_use]
    pub const fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Extract one partial record per road named in `sentence`.
    ///
    /// The tag, cause, location and time fields describe the whole sentence,
    /// so every road in it receives the same partial record. A sentence with
    /// no recognized road yields an empty list.
    #[must_use]
    pub fn extract(&self, sentence: &str) -> Vec<(RoadKey, PartialRecord)> {
        let roads = self.roads(sentence);
        if roads.is_empty() {
            trace!(sentence, "No road identifier");
            return Vec::new();
        }

        let partial = self.partial_record(sentence);
        roads
            .into_iter()
            .map(|road| (road, partial.clone()))
            .collect()
    }

    /// Road keys named in the sentence, deduplicated, in order of appearance.
    #[must_use]
    pub fn roads(&self, sentence: &str) -> Vec<RoadKey> {
        let mut roads: Vec<RoadKey> = Vec::new();

        for road_id in self.patterns.road_ids(sentence) {
            if !sentence.contains(road_id) {
                debug!(road_id, "Road id not found in sentence, dropping");
                continue;
            }
            if roads.iter().any(|r| r.as_str() == road_id) {
                continue;
            }
            roads.push(RoadKey::new(road_id));
        }

        roads
    }

    /// All sentence-scoped fields.
    #[must_use]
    pub fn partial_record(&self, sentence: &str) -> PartialRecord {
        PartialRecord {
            incident_tags: self.incident_tags(sentence),
            cause: self.patterns.cause(sentence).unwrap_or_default(),
            location: self.location(sentence),
            time: self.patterns.clock_time(sentence).unwrap_or_default(),
        }
    }

    /// Vocabulary phrases first, in table order, then override rules.
    #[must_use]
    pub fn incident_tags(&self, sentence: &str) -> Vec<String> {
        let mut tags: Vec<String> = self
            .vocabulary
            .iter()
            .filter(|rule| sentence.contains(rule.phrase.as_str()))
            .map(|rule| rule.tag.clone())
            .collect();

        for rule in &self.overrides {
            if let Some(tag) = rule.evaluate(sentence) {
                trace!(rule = %rule.name, tag, "Override rule fired");
                tags.push(tag.to_string());
            }
        }

        tags
    }

    /// Range, then point, then county/city; empty if none fires.
    #[must_use]
    pub fn location(&self, sentence: &str) -> String {
        self.patterns
            .mile_marker_range(sentence)
            .or_else(|| self.patterns.mile_marker_point(sentence))
            .or_else(|| self.patterns.admin_area(sentence))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn extractor() -> SentenceExtractor {
        SentenceExtractor::with_defaults().expect("default extractor should build")
    }

    #[test]
    fn test_extract_full_sentence() {
        let results = extractor().extract(
            "On I-95 N, a crash is blocking a lane due to debris. \
             Expect delays from mile marker 52 to mile marker 58 at 3:15 PM.",
        );

        assert_eq!(results.len(), 1);
        let (road, partial) = &results[0];
        assert_eq!(road.as_str(), "I-95 N");
        assert_eq!(partial.incident_tags, vec!["crash", "delay"]);
        assert_eq!(partial.cause, "Debris");
        assert_eq!(partial.location, "From mile marker 52 to mile marker 58");
        assert_eq!(partial.time, "3:15 PM");
    }

    #[test]
    fn test_extract_without_optional_fields() {
        let results = extractor().extract("On US-1 S, a detour is in effect.");

        assert_eq!(results.len(), 1);
        let (road, partial) = &results[0];
        assert_eq!(road.as_str(), "US-1 S");
        assert_eq!(partial.incident_tags, vec!["detour"]);
        assert!(partial.cause.is_empty());
        assert!(partial.location.is_empty());
        assert!(partial.time.is_empty());
    }

    #[test]
    fn test_extract_no_road() {
        assert!(extractor().extract("A crash is blocking a lane.").is_empty());
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn test_attached_direction_preserved() {
        let results = extractor().extract("On VA-123N, a backup.");
        assert_eq!(results[0].0.as_str(), "VA-123N");
    }

    #[test]
    fn test_lane_closed_override() {
        let tags = extractor().incident_tags("On I-66 E, a crash. The right lane is closed.");
        assert_eq!(tags, vec!["crash", "lane closed"]);
    }

    #[test]
    fn test_lanes_and_shoulders_closed() {
        let tags = extractor()
            .incident_tags("On I-81 S, 2 of 3 lanes are closed and the shoulders are closed.");
        assert_eq!(tags, vec!["lanes closed", "shoulders closed"]);
    }

    #[test]
    fn test_generic_phrase_with_override() {
        let tags = extractor().incident_tags("All north lanes are closed due to a crash.");
        assert_eq!(
            tags,
            vec!["crash", "All north lanes are closed", "lanes closed"]
        );
    }

    #[test]
    fn test_vocabulary_is_case_sensitive() {
        assert!(extractor().incident_tags("Crash reported.").is_empty());
    }

    #[test]
    fn test_location_range_beats_admin_area() {
        let location = extractor().location(
            "In the County of Fairfax, delays from mile marker 5 to mile marker 9.",
        );
        assert_eq!(location, "From mile marker 5 to mile marker 9");
    }

    #[test]
    fn test_location_range_keeps_three_digit_markers() {
        let location =
            extractor().location("On I-95 N, delays from mile marker 152 to mile marker 158.");
        assert_eq!(location, "From mile marker 152 to mile marker 158");
    }

    #[test]
    fn test_location_point_beats_admin_area() {
        let location =
            extractor().location("In the City of Salem, a crash at mile marker 140, lanes closed.");
        assert_eq!(location, "At mile marker 140");
    }

    #[test]
    fn test_location_admin_area() {
        let location = extractor().location("On Rt. 7 W in the County of Loudoun, a backup.");
        assert_eq!(location, "County of Loudoun");
    }

    #[test]
    fn test_malformed_range_falls_through() {
        let location = extractor().location("A backup from mile marker 5, near the exit.");
        assert!(location.is_empty());
    }

    #[test]
    fn test_cause_without_period_is_empty() {
        let partial = extractor().partial_record("On I-64 W, a delay due to weather");
        assert!(partial.cause.is_empty());
        assert_eq!(partial.incident_tags, vec!["delay"]);
    }

    #[test]
    fn test_multiple_roads_share_fields() {
        let results =
            extractor().extract("On I-95 S and On I-295 S, a backup due to a crash. At 7:40 AM.");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.as_str(), "I-95 S");
        assert_eq!(results[1].0.as_str(), "I-295 S");
        assert_eq!(results[0].1, results[1].1);
        assert_eq!(results[0].1.time, "7:40 AM");
    }

    #[test]
    fn test_repeated_road_in_sentence_emitted_once() {
        let results = extractor().extract("On I-95 N, a crash. On I-95 N, a backup.");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1.incident_tags, vec!["crash", "backup"]);
    }
}
