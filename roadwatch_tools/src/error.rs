use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Only http and https URLs are supported, got '{0}'")]
    UnsupportedScheme(String),

    #[error("Source returned HTTP {0}")]
    Status(u16),

    #[error("Response too large: {size} bytes (max: {max})")]
    ResponseTooLarge { size: usize, max: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
