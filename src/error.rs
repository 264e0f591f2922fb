//! Error type shared by every fallible operation of the library.

use thiserror::Error;

use crate::model::Language;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A metadata file could not be fetched while provisioning the index.
    #[error("download index {file} of {language} failed")]
    IndexDownload { file: String, language: Language },

    /// A cached metadata file exists but could not be read or parsed.
    #[error("failed to load index file {file}: {source}")]
    IndexLoad {
        file: String,
        #[source]
        source: Box<Error>,
    },

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be built (bad proxy URL, TLS backend...).
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
