use std::collections::HashMap;
use std::str::FromStr;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use crate::config::ClientConfig;
use crate::error::{NetError, NetResult};
use crate::models::outcome::RequestOutcome;
use crate::models::request::{RequestRecord, RequestState};
use crate::models::status::{ClassifiedError, StatusCode};

pub(crate) mod translate;

use translate::{translate, RawResponse};

/// HTTP helper for JSON GETs and multipart uploads.
///
/// Construct one and share it; clones reuse the same connection pool.
/// Requests are independent of each other: nothing is cached, retried or
/// deduplicated, and in-flight requests cannot be cancelled.
#[derive(Debug, Clone)]
pub struct NetworkClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ClientConfig,
}

impl NetworkClient {
    pub fn new(config: ClientConfig) -> NetResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .default_headers(header_map(&config.headers)?);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    /// Client with the transport's default settings
    pub fn with_defaults() -> NetResult<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GETs `url` and decodes the JSON body into `T`.
    ///
    /// Transport failures, non-success statuses, empty bodies and bodies
    /// that do not decode all resolve to [`RequestOutcome::Failure`].
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> RequestOutcome<T> {
        let mut record = RequestRecord::new("GET", url);

        let request = match self.build_get(url, headers) {
            Ok(request) => request,
            Err(err) => {
                let outcome = RequestOutcome::Failure(
                    ClassifiedError::with_detail(StatusCode::Unknown, err.to_string())
                );
                settle(&mut record, &outcome);
                return outcome;
            }
        };

        record.advance(RequestState::InFlight);
        tracing::debug!(request_id = %record.id, url = %url, "dispatching GET");

        let raw = RawResponse::read(request.send().await).await;
        let outcome = translate::<T>(raw);

        settle(&mut record, &outcome);
        outcome
    }

    fn build_get(
        &self,
        url: &str,
        headers: Option<&HashMap<String, String>>,
    ) -> NetResult<reqwest::RequestBuilder> {
        let url = parse_url(url)?;
        let mut request = self.http.get(url);

        if let Some(headers) = headers {
            request = request.headers(header_map(headers)?);
        }

        Ok(request)
    }
}

pub(crate) fn parse_url(url: &str) -> NetResult<Url> {
    Url::parse(url).map_err(|e| NetError::InvalidUrl(format!("{}: {}", url, e)))
}

pub(crate) fn header_map(headers: &HashMap<String, String>) -> NetResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (k, v) in headers {
        let name = HeaderName::from_str(k)
            .map_err(|e| NetError::InvalidHeader(format!("{}: {}", k, e)))?;
        let value = HeaderValue::from_str(v)
            .map_err(|e| NetError::InvalidHeader(format!("{}: {}", k, e)))?;
        map.insert(name, value);
    }

    Ok(map)
}

/// Moves the record into its terminal state and logs the result
pub(crate) fn settle<T>(record: &mut RequestRecord, outcome: &RequestOutcome<T>) {
    match outcome.error() {
        None => {
            record.advance(RequestState::Succeeded);
            tracing::debug!(
                request_id = %record.id,
                elapsed_ms = record.elapsed_ms(),
                "request succeeded"
            );
        }
        Some(err) => {
            record.advance(RequestState::Failed);
            tracing::debug!(
                request_id = %record.id,
                elapsed_ms = record.elapsed_ms(),
                status = ?err.status,
                detail = ?err.detail,
                "request failed"
            );
        }
    }
}
