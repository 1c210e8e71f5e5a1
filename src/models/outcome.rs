use serde::{Deserialize, Serialize};
use crate::models::status::{ClassifiedError, StatusCode};

/// Result of a single request: the decoded value or a classified error.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome<T> {
    Success(T),
    Failure(ClassifiedError),
}

impl<T> RequestOutcome<T> {
    pub fn failure(status: StatusCode) -> Self {
        RequestOutcome::Failure(ClassifiedError::new(status))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        match self {
            RequestOutcome::Success(_) => None,
            RequestOutcome::Failure(err) => Some(err),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RequestOutcome<U> {
        match self {
            RequestOutcome::Success(value) => RequestOutcome::Success(f(value)),
            RequestOutcome::Failure(err) => RequestOutcome::Failure(err),
        }
    }

    pub fn into_result(self) -> Result<T, ClassifiedError> {
        self.into()
    }
}

impl<T> From<Result<T, ClassifiedError>> for RequestOutcome<T> {
    fn from(result: Result<T, ClassifiedError>) -> Self {
        match result {
            Ok(value) => RequestOutcome::Success(value),
            Err(err) => RequestOutcome::Failure(err),
        }
    }
}

impl<T> From<RequestOutcome<T>> for Result<T, ClassifiedError> {
    fn from(outcome: RequestOutcome<T>) -> Self {
        match outcome {
            RequestOutcome::Success(value) => Ok(value),
            RequestOutcome::Failure(err) => Err(err),
        }
    }
}

/// What the upload endpoint answered. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub status: u16,
    pub body: String,
}

/// Notification emitted while an upload runs.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// Fraction of the file handed to the transport, in `[0.0, 1.0]`
    Progress(f64),

    Success(UploadReceipt),

    Failure(ClassifiedError),
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadEvent::Progress(_))
    }
}

impl From<RequestOutcome<UploadReceipt>> for UploadEvent {
    fn from(outcome: RequestOutcome<UploadReceipt>) -> Self {
        match outcome {
            RequestOutcome::Success(receipt) => UploadEvent::Success(receipt),
            RequestOutcome::Failure(err) => UploadEvent::Failure(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_conversions() {
        let ok: RequestOutcome<u32> = Ok(7).into();
        assert!(ok.is_success());
        assert_eq!(ok.clone().map(|v| v * 2), RequestOutcome::Success(14));
        assert_eq!(ok.into_result(), Ok(7));

        let failed: RequestOutcome<u32> = RequestOutcome::failure(StatusCode::Timeout);
        assert!(failed.is_failure());
        assert_eq!(failed.error().map(|e| e.status), Some(StatusCode::Timeout));
        assert!(failed.into_result().is_err());
    }

    #[test]
    fn test_upload_event_terminal() {
        assert!(!UploadEvent::Progress(0.5).is_terminal());

        let receipt = UploadReceipt { status: 200, body: String::new() };
        let event: UploadEvent = RequestOutcome::Success(receipt).into();
        assert!(event.is_terminal());

        let event: UploadEvent = RequestOutcome::<UploadReceipt>::failure(StatusCode::InvalidInput).into();
        assert!(matches!(event, UploadEvent::Failure(ref e) if e.status == StatusCode::InvalidInput));
    }
}
