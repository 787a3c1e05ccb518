// talk-api/src/error.rs
use crate::http::HttpError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No transport session registered for the account
    #[error("No session for account {0}")]
    NoSession(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Token could not be encoded into a path segment
    #[error("Invalid token: {0:?}")]
    InvalidToken(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] HttpError),

    /// Envelope meta reported a failure on a 2xx response
    #[error("OCS error {statuscode}: {message}")]
    Ocs { statuscode: u16, message: String },

    #[error("Invalid envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode {entity}: {source}")]
    Decode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Single-object endpoint returned no `data` object
    #[error("Response carried no data")]
    MissingData,
}

impl Error {
    /// True when the operation stopped before any request was sent
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NoSession(_) | Self::AccountNotFound(_) | Self::InvalidToken(_)
        )
    }

    /// HTTP status of a transport failure, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status,
            Self::Ocs { statuscode, .. } => Some(*statuscode),
            _ => None,
        }
    }
}
