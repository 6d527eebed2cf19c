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

//! I/O around the extraction core: fetching advisory pages and writing the
//! merged records out as CSV.

mod error;
pub mod export;
pub mod fetch;

pub use error::{Error, Result};
pub use export::{HEADER, export_to_path, write_records};
pub use fetch::{SourceConfig, SourceFetcher, split_sentences};
