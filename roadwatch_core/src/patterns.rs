//! Named regex patterns used by the sentence extractor.
//!
//! Each pattern has a dedicated extraction method on [`PatternTable`] so the
//! pattern syntax can be tested in isolation from tagging and merging.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::capitalize_first;
use crate::vocabulary::ExtractionConfig;

const CAUSE: &str = r"due to ([^.]*)\.";
const MILE_MARKER_RANGE: &str =
    r"from mile marker \d{1,3}(?:\.\d{1,2})?\s+to mile marker \d{1,3}(?:\.\d{1,2})?\b";
const MILE_MARKER_POINT: &str = r"at mile marker [^,]*,";
const ADMIN_AREA: &str = r"((?:County|City) of [^,]*),";
const CLOCK_TIME: &str = r"\b\d{1,2}:\d{2}\s(?:AM|PM)\b";

/// Identifies one entry of the pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    RoadId,
    Cause,
    MileMarkerRange,
    MileMarkerPoint,
    AdminArea,
    ClockTime,
}

impl PatternKind {
    pub const ALL: [Self; 6] = [
        Self::RoadId,
        Self::Cause,
        Self::MileMarkerRange,
        Self::MileMarkerPoint,
        Self::AdminArea,
        Self::ClockTime,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoadId => "road_id",
            Self::Cause => "cause",
            Self::MileMarkerRange => "mile_marker_range",
            Self::MileMarkerPoint => "mile_marker_point",
            Self::AdminArea => "admin_area",
            Self::ClockTime => "clock_time",
        }
    }
}

/// Compiled patterns.
#[derive(Debug, Clone)]
pub struct PatternTable {
    road_id: Regex,
    cause: Regex,
    mile_marker_range: Regex,
    mile_marker_point: Regex,
    admin_area: Regex,
    clock_time: Regex,
}

impl PatternTable {
    /// Compile the table, building the road pattern from the configured
    /// prefixes and directions.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        config.validate()?;
        let road_id = road_id_pattern(&config.prefixes, &config.directions);

        Ok(Self {
            road_id: compile(PatternKind::RoadId, &road_id)?,
            cause: compile(PatternKind::Cause, CAUSE)?,
            mile_marker_range: compile(PatternKind::MileMarkerRange, MILE_MARKER_RANGE)?,
            mile_marker_point: compile(PatternKind::MileMarkerPoint, MILE_MARKER_POINT)?,
            admin_area: compile(PatternKind::AdminArea, ADMIN_AREA)?,
            clock_time: compile(PatternKind::ClockTime, CLOCK_TIME)?,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(&ExtractionConfig::default())
    }

    #[must_use]
    pub const fn regex(&self, kind: PatternKind) -> &Regex {
        match kind {
            PatternKind::RoadId => &self.road_id,
            PatternKind::Cause => &self.cause,
            PatternKind::MileMarkerRange => &self.mile_marker_range,
            PatternKind::MileMarkerPoint => &self.mile_marker_point,
            PatternKind::AdminArea => &self.admin_area,
            PatternKind::ClockTime => &self.clock_time,
        }
    }

    /// All road ids named in the sentence, "On " stripped, in order of
    /// appearance.
    #[must_use]
    pub fn road_ids<'s>(&self, sentence: &'s str) -> Vec<&'s str> {
        self.road_id
            .captures_iter(sentence)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Text between "due to " and the next period, capitalized.
    ///
    /// Returns `None` when the sentence has no terminating period after
    /// "due to".
    #[must_use]
    pub fn cause(&self, sentence: &str) -> Option<String> {
        let caps = self.cause.captures(sentence)?;
        let text = caps.get(1)?.as_str().trim_end();
        Some(capitalize_first(text))
    }

    /// "From mile marker X to mile marker Y".
    #[must_use]
    pub fn mile_marker_range(&self, sentence: &str) -> Option<String> {
        self.mile_marker_range
            .find(sentence)
            .map(|m| capitalize_first(m.as_str()))
    }

    /// "At mile marker X", ending at the next comma.
    #[must_use]
    pub fn mile_marker_point(&self, sentence: &str) -> Option<String> {
        self.mile_marker_point.find(sentence).map(|m| {
            let text = m.as_str().trim_end_matches(',').trim();
            capitalize_first(text)
        })
    }

    /// "County of X" or "City of X", whichever occurs first.
    #[must_use]
    pub fn admin_area(&self, sentence: &str) -> Option<String> {
        self.admin_area
            .captures(sentence)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end().to_string())
    }

    /// First `H:MM AM` / `H:MM PM` literal.
    #[must_use]
    pub fn clock_time(&self, sentence: &str) -> Option<String> {
        self.clock_time
            .find(sentence)
            .map(|m| m.as_str().to_string())
    }
}

fn compile(kind: PatternKind, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Pattern {
        name: kind.as_str(),
        source: Box::new(e),
    })
}

/// Build `\bOn\s(<prefix>\d+(?:\s?[<dirs>]\b)?)` from the rule tables.
///
/// Spaces inside a prefix match any single whitespace character, so `Rt. `
/// also matches a non-breaking or tab separator.
#[must_use]
pub fn road_id_pattern(prefixes: &[String], directions: &[char]) -> String {
    let alternatives = prefixes
        .iter()
        .map(|p| regex::escape(p).replace(' ', r"\s"))
        .collect::<Vec<_>>()
        .join("|");

    let suffix = if directions.is_empty() {
        String::new()
    } else {
        let letters: String = directions.iter().collect();
        format!(r"(?:\s?[{letters}]\b)?")
    };

    format!(r"\bOn\s((?:{alternatives})\d+{suffix})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn table() -> PatternTable {
        PatternTable::with_defaults().expect("default patterns should compile")
    }

    #[test]
    fn test_road_id_pattern_shape() {
        let pattern = road_id_pattern(&["Rt. ".to_string()], &['N', 'S']);
        assert_eq!(pattern, r"\bOn\s((?:Rt\.\s)\d+(?:\s?[NS]\b)?)");
    }

    #[test]
    fn test_road_ids_all_prefixes() {
        let t = table();
        assert_eq!(t.road_ids("On VA-7 E, a crash."), vec!["VA-7 E"]);
        assert_eq!(t.road_ids("On I-95 N, a crash."), vec!["I-95 N"]);
        assert_eq!(t.road_ids("On US-29, a backup."), vec!["US-29"]);
        assert_eq!(t.road_ids("On Rt. 15 S, a detour."), vec!["Rt. 15 S"]);
    }

    #[test]
    fn test_road_id_attached_direction() {
        assert_eq!(table().road_ids("On VA-123N at exit 4"), vec!["VA-123N"]);
    }

    #[test]
    fn test_road_id_ignores_spelled_out_direction() {
        assert_eq!(table().road_ids("On I-81 North, a crash."), vec!["I-81"]);
    }

    #[test]
    fn test_road_ids_multiple() {
        assert_eq!(
            table().road_ids("On I-64 W and On I-264 E, delays."),
            vec!["I-64 W", "I-264 E"]
        );
    }

    #[test]
    fn test_road_ids_unknown_prefix() {
        assert!(table().road_ids("On SR-12 N, a crash.").is_empty());
        assert!(table().road_ids("I-95 N has a crash.").is_empty());
    }

    #[test]
    fn test_cause() {
        let t = table();
        assert_eq!(
            t.cause("Lanes closed due to road work. Expect delays."),
            Some("Road work".to_string())
        );
        assert_eq!(t.cause("Lanes closed due to debris"), None);
        assert_eq!(t.cause("No reason given."), None);
    }

    #[test]
    fn test_mile_marker_range() {
        let t = table();
        assert_eq!(
            t.mile_marker_range("Delays from mile marker 52.5 to mile marker 58."),
            Some("From mile marker 52.5 to mile marker 58".to_string())
        );
        assert_eq!(
            t.mile_marker_range("On I-81 S, delays from mile marker 52 to mile marker 158 due to a crash."),
            Some("From mile marker 52 to mile marker 158".to_string())
        );
        assert_eq!(
            t.mile_marker_range("On I-95 N, delays from mile marker 152 to mile marker 158.7."),
            Some("From mile marker 152 to mile marker 158.7".to_string())
        );
        assert_eq!(t.mile_marker_range("Delays from mile marker 52 to mile marker 1580."), None);
        assert_eq!(t.mile_marker_range("at mile marker 52, a crash"), None);
    }

    #[test]
    fn test_mile_marker_point() {
        let t = table();
        assert_eq!(
            t.mile_marker_point("A crash at mile marker 118.4, the left lane is closed."),
            Some("At mile marker 118.4".to_string())
        );
        assert_eq!(
            t.mile_marker_point("A crash at mile marker 12 , lanes blocked"),
            Some("At mile marker 12".to_string())
        );
        assert_eq!(t.mile_marker_point("A crash at mile marker 12."), None);
    }

    #[test]
    fn test_admin_area() {
        let t = table();
        assert_eq!(
            t.admin_area("In the County of Fairfax, a crash."),
            Some("County of Fairfax".to_string())
        );
        assert_eq!(
            t.admin_area("In the City of Richmond, near the County of Henrico, delays."),
            Some("City of Richmond".to_string())
        );
        assert_eq!(t.admin_area("In the County of Fairfax."), None);
    }

    #[test]
    fn test_clock_time() {
        let t = table();
        assert_eq!(
            t.clock_time("Reported at 3:15 PM, cleared at 4:00 PM."),
            Some("3:15 PM".to_string())
        );
        assert_eq!(t.clock_time("Reported at 11:05 AM."), Some("11:05 AM".to_string()));
        assert_eq!(t.clock_time("Reported this AM."), None);
    }

    #[test]
    fn test_pattern_kind_names() {
        let names: Vec<_> = PatternKind::ALL.iter().map(PatternKind::as_str).collect();
        assert_eq!(
            names,
            vec![
                "road_id",
                "cause",
                "mile_marker_range",
                "mile_marker_point",
                "admin_area",
                "clock_time"
            ]
        );
    }

    #[test]
    fn test_custom_prefix_and_directions() {
        let config = ExtractionConfig {
            prefixes: vec!["SR-".to_string()],
            directions: vec![],
            ..ExtractionConfig::default()
        };
        let Ok(t) = PatternTable::new(&config) else {
            panic!("custom patterns should compile");
        };
        assert_eq!(t.road_ids("On SR-12 N, a crash."), vec!["SR-12"]);
        assert!(t.road_ids("On I-95 N, a crash.").is_empty());
    }
}
