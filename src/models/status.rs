use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    /// The transport could not reach the host
    NoConnection,

    /// The server answered with a 5xx it could not recover from
    ServerError,

    /// The request or the gateway timed out
    Timeout,

    /// Credentials missing or rejected
    Unauthorized,

    /// The resource does not exist
    NotFound,

    /// Decoding failures and unmapped codes
    Unknown,

    /// The caller handed over a malformed attachment
    InvalidInput,
}

/// Numeric HTTP status to classification. Codes absent here are `Unknown`.
const STATUS_TABLE: &[(u16, StatusCode)] = &[
    (401, StatusCode::Unauthorized),
    (403, StatusCode::Unauthorized),
    (404, StatusCode::NotFound),
    (408, StatusCode::Timeout),
    (410, StatusCode::NotFound),
    (500, StatusCode::ServerError),
    (502, StatusCode::ServerError),
    (503, StatusCode::ServerError),
    (504, StatusCode::Timeout),
];

impl StatusCode {
    /// Looks a numeric HTTP status up in the classification table
    pub fn lookup(code: u16) -> Option<StatusCode> {
        STATUS_TABLE
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, status)| *status)
    }

    /// Like [`StatusCode::lookup`], but unmapped codes land in `Unknown`
    pub fn from_http(code: u16) -> StatusCode {
        Self::lookup(code).unwrap_or(StatusCode::Unknown)
    }

    /// Classifies a transport-level failure
    pub fn from_transport(err: &reqwest::Error) -> StatusCode {
        if err.is_timeout() {
            StatusCode::Timeout
        } else if err.is_connect() {
            StatusCode::NoConnection
        } else if let Some(status) = err.status() {
            Self::from_http(status.as_u16())
        } else {
            StatusCode::Unknown
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StatusCode::NoConnection => "The internet connection appears to be offline.",
            StatusCode::ServerError => "Something went wrong with the server.",
            StatusCode::Timeout => "The request timed out.",
            StatusCode::Unauthorized => "You are not authorized to access this resource.",
            StatusCode::NotFound => "The requested resource could not be found.",
            StatusCode::Unknown => "An unknown error occurred.",
            StatusCode::InvalidInput => "Invalid file attributes",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A failed request: its classification plus an optional detail message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}")]
pub struct ClassifiedError {
    pub status: StatusCode,
    pub detail: Option<String>,
}

impl ClassifiedError {
    pub fn new(status: StatusCode) -> Self {
        Self { status, detail: None }
    }

    pub fn with_detail(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: Some(detail.into()),
        }
    }

    /// Classification for a non-success HTTP status
    pub fn from_http(code: u16) -> Self {
        Self::with_detail(StatusCode::from_http(code), format!("HTTP status {}", code))
    }

    pub fn from_transport(err: &reqwest::Error) -> Self {
        Self::with_detail(StatusCode::from_transport(err), err.to_string())
    }

    /// Human-readable description of the classification
    pub fn description(&self) -> &'static str {
        self.status.description()
    }
}
