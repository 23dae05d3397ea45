use itertools::Itertools;
use reqwest::StatusCode;
use std::io::Error as IoError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error("{} sheet(s) failed to publish: {}", .0.len(), .0.iter().join("; "))]
    Publish(Vec<PublishError>),
}

impl From<PublishError> for Error {
    fn from(err: PublishError) -> Self {
        Error::Publish(vec![err])
    }
}

/// Failure to fetch, decode, or validate records from the league provider.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("Request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    #[error("Malformed {kind} records from {url}: {source}")]
    Decode {
        url: String,
        kind: &'static str,
        source: serde_json::Error,
    },

    #[error("Invalid {kind} record: {reason}")]
    Invalid { kind: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Not authorized to write '{sheet}' ({status})")]
    Unauthorized { sheet: String, status: StatusCode },

    #[error("Quota exceeded while writing '{sheet}'")]
    Quota { sheet: String },

    #[error("Writing '{sheet}' returned status {status}")]
    Status { sheet: String, status: StatusCode },

    #[error("Request for '{sheet}' failed: {source}")]
    Http { sheet: String, source: reqwest::Error },

    #[error("Missing access token: environment variable {0} is not set")]
    MissingToken(String),

    #[error("Writing '{sheet}' failed: {source}")]
    Io { sheet: String, source: IoError },

    #[error("CSV error writing '{sheet}': {source}")]
    Csv { sheet: String, source: csv::Error },
}

impl PublishError {
    /// Maps a non-success Sheets API status to the matching error.
    pub(crate) fn from_status(sheet: &str, status: StatusCode) -> Self {
        let sheet = sheet.to_string();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                PublishError::Unauthorized { sheet, status }
            }
            StatusCode::TOO_MANY_REQUESTS => PublishError::Quota { sheet },
            _ => PublishError::Status { sheet, status },
        }
    }
}
