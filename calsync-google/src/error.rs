//! Errors raised while talking to the Google Calendar API.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoogleError {
    #[error("Google API returned {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("Google API rejected the access token {attempts} times in a row")]
    Unauthorized { attempts: u32 },

    #[error("Request to Google failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid JSON from Google: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Google returned page token {0:?} twice in a row")]
    RepeatedPageToken(String),

    #[error("Unknown attendee response status: {0:?}")]
    UnknownResponseStatus(String),

    #[error("Missing field in Google response: {0}")]
    MissingField(&'static str),

    #[error("Invalid timestamp in Google response: {0}")]
    InvalidTimestamp(String),

    #[error("Could not obtain an access token: {0}")]
    Auth(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Config(#[from] calsync_core::CalsyncError),
}

impl GoogleError {
    /// The HTTP status, when the remote answered with a non-2xx response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GoogleError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type GoogleResult<T> = Result<T, GoogleError>;
