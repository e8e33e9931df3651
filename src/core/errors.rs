// @file: kline_downloader/src/core/errors.rs
// @description: Single error type covering every way a download run can fail.
// @author: LAS.

use std::io;
use std::path::PathBuf;
use thiserror::Error;


//
// ERROR DEFINITIONS
//

#[derive(Debug, Error)]
pub enum FetchError {
    // Raised before any network call
    #[error("invalid input: {0}")]
    Input(String),

    #[error("Error {status}: {body}")]
    ExternalService { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed kline data: {0}")]
    MalformedData(String),

    #[error("pagination stalled: {0}")]
    StalledPagination(String),

    #[error("cannot write {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type FetchResult<T> = Result<T, FetchError>;

impl FetchError {
    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FetchError::Filesystem { path: path.into(), source }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_service_message_carries_status_and_body() {
        let err: FetchError = FetchError::ExternalService {
            status: 400,
            body: "{\"code\":-1121,\"msg\":\"Invalid symbol.\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error 400: {\"code\":-1121,\"msg\":\"Invalid symbol.\"}"
        );
    }

    #[test]
    fn filesystem_message_names_path() {
        let err: FetchError = FetchError::filesystem(
            "/nope/out.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/nope/out.csv"));
        assert!(err.to_string().contains("denied"));
    }
}
