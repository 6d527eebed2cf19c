//! Record merger.
//!
//! Folds per-sentence partial records into one record per road. The merge
//! is order dependent, so partials must be applied in sentence order.

use indexmap::IndexMap;
use indexmap::map::Entry;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

use crate::extractor::SentenceExtractor;
use crate::record::{IncidentRecord, PartialRecord, RecordSet, RoadKey};

/// How a partial record for an already-seen road is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The latest sentence naming a road replaces the stored record.
    #[default]
    LastWins,
    /// The first sentence naming a road is kept; later ones are ignored.
    FirstWins,
}

impl MergePolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LastWins => "last_wins",
            Self::FirstWins => "first_wins",
        }
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "last_wins" | "last" => Ok(Self::LastWins),
            "first_wins" | "first" => Ok(Self::FirstWins),
            other => Err(format!("unknown merge policy: {other}")),
        }
    }
}

/// What a single merge did to the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First record for this road.
    Inserted,
    /// An existing record was overwritten.
    Replaced,
    /// The road was already seen and the partial was discarded.
    Kept,
}

/// Accumulates partial records into an ordered road → record mapping.
///
/// Keys keep their first-insertion position under both policies; with
/// `FirstWins` the key set doubles as the seen-roads guard.
#[derive(Debug, Clone, Default)]
pub struct RecordMerger {
    policy: MergePolicy,
    records: IndexMap<RoadKey, IncidentRecord>,
}

impl RecordMerger {
    #[must_use]
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            records: IndexMap::new(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> MergePolicy {
        self.policy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply one partial record.
    pub fn merge(&mut self, key: RoadKey, partial: PartialRecord) -> MergeOutcome {
        match self.records.entry(key) {
            Entry::Vacant(slot) => {
                let record = IncidentRecord::from_partial(slot.key(), partial);
                debug!(road = %slot.key(), "New road");
                slot.insert(record);
                MergeOutcome::Inserted
            }
            Entry::Occupied(mut slot) => match self.policy {
                MergePolicy::LastWins => {
                    let record = IncidentRecord::from_partial(slot.key(), partial);
                    debug!(road = %slot.key(), "Replacing record with later sentence");
                    slot.insert(record);
                    MergeOutcome::Replaced
                }
                MergePolicy::FirstWins => {
                    debug!(road = %slot.key(), "Road already seen, keeping first record");
                    MergeOutcome::Kept
                }
            },
        }
    }

    /// Apply every partial from one sentence, in order.
    pub fn merge_all(&mut self, partials: impl IntoIterator<Item = (RoadKey, PartialRecord)>) {
        for (key, partial) in partials {
            self.merge(key, partial);
        }
    }

    #[must_use]
    pub fn finish(self) -> RecordSet {
        RecordSet::from_map(self.records)
    }
}

/// Extract and merge a whole batch of sentences.
///
/// Extraction runs in parallel; the results are collected in sentence order
/// and merged sequentially, so the outcome matches a serial run.
pub fn process_batch<S>(
    extractor: &SentenceExtractor,
    sentences: &[S],
    policy: MergePolicy,
) -> RecordSet
where
    S: AsRef<str> + Sync,
{
    let extracted: Vec<Vec<(RoadKey, PartialRecord)>> = sentences
        .par_iter()
        .map(|s| extractor.extract(s.as_ref()))
        .collect();

    let matched = extracted.iter().filter(|partials| !partials.is_empty()).count();

    let mut merger = RecordMerger::new(policy);
    for partials in extracted {
        merger.merge_all(partials);
    }

    let records = merger.finish();
    info!(
        sentences = sentences.len(),
        matched,
        roads = records.len(),
        policy = policy.as_str(),
        "Processed sentence batch"
    );
    records
}
