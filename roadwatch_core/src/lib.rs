#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Sentence-to-record extraction for traffic advisories.
//!
//! A batch of advisory sentences flows through the [`SentenceExtractor`],
//! which produces per-road [`PartialRecord`]s, and then through the
//! [`RecordMerger`], which folds them into one [`IncidentRecord`] per road.

mod error;
pub mod extractor;
pub mod merger;
pub mod patterns;
pub mod record;
pub mod vocabulary;

pub use error::{Error, Result};
pub use extractor::SentenceExtractor;
pub use merger::{MergeOutcome, MergePolicy, RecordMerger, process_batch};
pub use patterns::{PatternKind, PatternTable};
pub use record::{IncidentRecord, PartialRecord, RecordSet, RoadKey, capitalize_first};
pub use vocabulary::{ExtractionConfig, OverrideBranch, OverrideRule, PhraseRule};
