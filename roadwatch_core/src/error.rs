use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {name} pattern: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("invalid extraction config: {0}")]
    InvalidConfig(String),
}
