use bytes::Bytes;
use serde::de::DeserializeOwned;
use crate::models::outcome::RequestOutcome;
use crate::models::status::{ClassifiedError, StatusCode};

/// What the transport handed back for one request.
#[derive(Debug)]
pub(crate) struct RawResponse {
    /// HTTP status, `None` when no response arrived
    pub status: Option<u16>,

    pub body: Option<Bytes>,

    pub transport_error: Option<reqwest::Error>,
}

impl RawResponse {
    pub fn new(status: u16, body: Option<Bytes>) -> Self {
        Self {
            status: Some(status),
            body,
            transport_error: None,
        }
    }

    pub fn failed(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            body: None,
            transport_error: Some(err),
        }
    }

    /// Buffers the response body. A failure while reading the body is kept
    /// as the transport error next to the status that was already received.
    pub async fn read(result: Result<reqwest::Response, reqwest::Error>) -> Self {
        let response = match result {
            Ok(response) => response,
            Err(err) => return Self::failed(err),
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => Self::new(status, Some(body)),
            Err(err) => Self {
                status: Some(status),
                body: None,
                transport_error: Some(err),
            },
        }
    }
}

/// Turns a raw transport result into the outcome handed to the caller.
pub(crate) fn translate<T: DeserializeOwned>(raw: RawResponse) -> RequestOutcome<T> {
    if let Some(err) = raw.transport_error {
        return RequestOutcome::Failure(ClassifiedError::from_transport(&err));
    }

    let status = match raw.status {
        Some(status) => status,
        None => {
            return RequestOutcome::Failure(ClassifiedError::with_detail(
                StatusCode::Unknown,
                "No response received",
            ))
        }
    };

    if !(200..300).contains(&status) {
        return RequestOutcome::Failure(ClassifiedError::from_http(status));
    }

    match raw.body {
        Some(body) if !body.is_empty() => RequestOutcome::from(decode::<T>(&body)),
        _ => RequestOutcome::Failure(ClassifiedError::with_detail(
            StatusCode::from_http(status),
            format!("Empty response body (HTTP status {})", status),
        )),
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClassifiedError> {
    serde_json::from_slice(body)
        .map_err(|e| ClassifiedError::with_detail(StatusCode::Unknown, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct StatusPayload {
        status: String,
        uptime: u64,
    }

    fn body(json: &str) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(json.as_bytes()))
    }

    #[test]
    fn test_decodes_successful_body() {
        let raw = RawResponse::new(200, body(r#"{"status":"ok","uptime":42}"#));
        let outcome: RequestOutcome<StatusPayload> = translate(raw);
        assert_eq!(
            outcome,
            RequestOutcome::Success(StatusPayload { status: "ok".into(), uptime: 42 })
        );
    }

    #[test]
    fn test_mapped_status_uses_table_description() {
        let raw = RawResponse::new(500, body("Internal Server Error"));
        let outcome: RequestOutcome<StatusPayload> = translate(raw);
        let err = outcome.error().unwrap();
        assert_eq!(err.status, StatusCode::ServerError);
        assert_eq!(err.to_string(), "Something went wrong with the server.");
    }

    #[test]
    fn test_unmapped_status_is_unknown() {
        let raw = RawResponse::new(418, body("{}"));
        let outcome: RequestOutcome<StatusPayload> = translate(raw);
        assert_eq!(outcome.error().unwrap().status, StatusCode::Unknown);
    }

    #[test]
    fn test_empty_body_is_failure() {
        for raw in [RawResponse::new(200, None), RawResponse::new(204, Some(Bytes::new()))] {
            let outcome: RequestOutcome<StatusPayload> = translate(raw);
            let err = outcome.error().unwrap();
            assert_eq!(err.status, StatusCode::Unknown);
            assert!(err.detail.as_deref().unwrap().contains("Empty response body"));
        }
    }

    #[test]
    fn test_decode_failure_carries_decoder_message() {
        let raw = RawResponse::new(200, body(r#"{"status":"ok"}"#));
        let outcome: RequestOutcome<StatusPayload> = translate(raw);
        let err = outcome.error().unwrap();
        assert_eq!(err.status, StatusCode::Unknown);
        assert!(err.detail.as_deref().unwrap().contains("uptime"));
    }

    #[test]
    fn test_missing_status_is_unknown() {
        let raw = RawResponse { status: None, body: None, transport_error: None };
        let outcome: RequestOutcome<StatusPayload> = translate(raw);
        assert_eq!(outcome.error().unwrap().status, StatusCode::Unknown);
    }
}
