//! Incident record types.
//!
//! A [`PartialRecord`] is what one sentence says about the roads it names;
//! an [`IncidentRecord`] is the merged result for one road across a batch.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Mapping key for a road, identical to the road id after the "On " prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoadKey(String);

impl RoadKey {
    #[must_use]
    pub fn new(road_id: impl Into<String>) -> Self {
        Self(road_id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RoadKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoadKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Fields derived from a single sentence.
///
/// Absent fields are empty strings, never `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRecord {
    /// Tags in the order the rules recognized them.
    pub incident_tags: Vec<String>,
    pub cause: String,
    pub location: String,
    pub time: String,
}

/// One record per distinct road in a processed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub road_id: String,
    pub incident_tags: Vec<String>,
    pub cause: String,
    pub location: String,
    pub time: String,
}

impl IncidentRecord {
    #[must_use]
    pub fn from_partial(key: &RoadKey, partial: PartialRecord) -> Self {
        Self {
            road_id: key.as_str().to_string(),
            incident_tags: partial.incident_tags,
            cause: partial.cause,
            location: partial.location,
            time: partial.time,
        }
    }

    /// Tags joined with ", " and the first letter capitalized, as shown in
    /// the Incidents column of the export.
    #[must_use]
    pub fn incidents_summary(&self) -> String {
        capitalize_first(&self.incident_tags.join(", "))
    }
}

/// Uppercase the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Finished mapping from road to record, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: IndexMap<RoadKey, IncidentRecord>,
}

impl RecordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn from_map(records: IndexMap<RoadKey, IncidentRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, road_id: &str) -> Option<&IncidentRecord> {
        self.records.get(road_id)
    }

    #[must_use]
    pub fn contains(&self, road_id: &str) -> bool {
        self.records.contains_key(road_id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RoadKey> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IncidentRecord> {
        self.records.values()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a IncidentRecord;
    type IntoIter = indexmap::map::Values<'a, RoadKey, IncidentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}
