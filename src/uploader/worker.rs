use std::collections::HashMap;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use crate::client::{parse_url, settle, NetworkClient};
use crate::models::attachment::{FileAttachment, MimeType};
use crate::models::outcome::{RequestOutcome, UploadEvent, UploadReceipt};
use crate::models::request::{RequestRecord, RequestState};
use crate::models::status::{ClassifiedError, StatusCode};

/// Receiving end of [`NetworkClient::spawn_upload`]
pub type UploadEvents = UnboundedReceiver<UploadEvent>;

impl NetworkClient {
    /// Sends `file` as a multipart POST to `url`, with every entry of
    /// `params` as an extra text field.
    ///
    /// `on_progress` is called on the awaiting task with the fraction of the
    /// file handed to the transport, never after the returned future
    /// resolves. The server's answer is not interpreted: once the transport
    /// reports completion the outcome is a success carrying the raw
    /// [`UploadReceipt`].
    pub async fn upload<F>(
        &self,
        url: &str,
        params: Option<&HashMap<String, String>>,
        file: FileAttachment,
        mut on_progress: F,
    ) -> RequestOutcome<UploadReceipt>
    where
        F: FnMut(f64),
    {
        let mut record = RequestRecord::new("POST", url);

        let (name, data) = match file.parts() {
            Some((name, data)) => (name.to_string(), data.clone()),
            None => {
                let outcome = RequestOutcome::Failure(ClassifiedError::with_detail(
                    StatusCode::InvalidInput,
                    "Attachment needs a non-empty name and data",
                ));
                settle(&mut record, &outcome);
                return outcome;
            }
        };

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let request = match self.build_upload(url, params, name, data, &file.mime_type, progress_tx) {
            Ok(request) => request,
            Err(err) => {
                let outcome = RequestOutcome::Failure(err);
                settle(&mut record, &outcome);
                return outcome;
            }
        };

        record.advance(RequestState::InFlight);
        tracing::debug!(
            request_id = %record.id,
            url = %url,
            bytes = file.len(),
            "dispatching upload"
        );

        let send = request.send();
        tokio::pin!(send);

        let result = loop {
            tokio::select! {
                biased;
                Some(fraction) = progress_rx.recv() => {
                    record.advance(RequestState::InFlight);
                    on_progress(fraction);
                }
                result = &mut send => break result,
            }
        };

        // the body is fully consumed by now; flush what is still queued
        while let Ok(fraction) = progress_rx.try_recv() {
            on_progress(fraction);
        }

        let outcome = match result {
            Ok(response) => match read_receipt(response).await {
                Ok(receipt) => RequestOutcome::Success(receipt),
                Err(err) => RequestOutcome::Failure(ClassifiedError::from_transport(&err)),
            },
            Err(err) => RequestOutcome::Failure(ClassifiedError::from_transport(&err)),
        };

        settle(&mut record, &outcome);
        outcome
    }

    /// Runs [`NetworkClient::upload`] on the tokio runtime and reports it as
    /// a stream of events: progress first, then exactly one terminal event,
    /// then the channel closes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_upload(
        &self,
        url: impl Into<String>,
        params: Option<HashMap<String, String>>,
        file: FileAttachment,
    ) -> UploadEvents {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let client = self.clone();
        let url = url.into();

        tokio::spawn(async move {
            let progress_tx = events_tx.clone();
            let outcome = client
                .upload(&url, params.as_ref(), file, move |fraction| {
                    let _ = progress_tx.send(UploadEvent::Progress(fraction));
                })
                .await;

            if events_tx.send(outcome.into()).is_err() {
                tracing::debug!(url = %url, "upload finished after its listener went away");
            }
        });

        events_rx
    }

    fn build_upload(
        &self,
        url: &str,
        params: Option<&HashMap<String, String>>,
        name: String,
        data: Bytes,
        mime_type: &MimeType,
        progress_tx: UnboundedSender<f64>,
    ) -> Result<reqwest::RequestBuilder, ClassifiedError> {
        let url = parse_url(url)
            .map_err(|e| ClassifiedError::with_detail(StatusCode::Unknown, e.to_string()))?;

        let length = data.len() as u64;
        let body = super::body::progress_body(data, self.config.progress_chunk_size, progress_tx);
        let part = Part::stream_with_length(body, length)
            .file_name(name)
            .mime_str(mime_type.as_str())
            .map_err(|e| ClassifiedError::with_detail(StatusCode::InvalidInput, e.to_string()))?;

        let mut form = Form::new();
        if let Some(params) = params {
            for (k, v) in params {
                form = form.text(k.clone(), v.clone());
            }
        }
        form = form.part(self.config.upload_field_name.clone(), part);

        Ok(self.http.post(url).multipart(form))
    }
}

/// Status and raw text of the upload response. The transport has not
/// completed until the whole body is read.
async fn read_receipt(response: reqwest::Response) -> Result<UploadReceipt, reqwest::Error> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(UploadReceipt { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NetworkClient {
        NetworkClient::with_defaults().unwrap()
    }

    #[tokio::test]
    async fn test_invalid_attachment_fails_before_dispatch() {
        let file = FileAttachment { name: Some("x".into()), data: None, mime_type: MimeType::Gif };
        let mut calls = 0;

        // unroutable on purpose: a dispatched request would not come back as InvalidInput
        let outcome = client()
            .upload("http://127.0.0.1:9/upload", None, file, |_| calls += 1)
            .await;

        let err = outcome.error().unwrap();
        assert_eq!(err.status, StatusCode::InvalidInput);
        assert_eq!(err.to_string(), "Invalid file attributes");
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_bad_mime_type_is_encoding_failure() {
        let file = FileAttachment::new("x.bin", vec![1u8, 2, 3], MimeType::Other("not a mime".into()));

        let outcome = client()
            .upload("http://127.0.0.1:9/upload", None, file, |_| {})
            .await;

        let err = outcome.error().unwrap();
        assert_eq!(err.status, StatusCode::InvalidInput);
        assert!(err.detail.is_some());
    }

    #[tokio::test]
    async fn test_invalid_url_is_unknown_failure() {
        let file = FileAttachment::new("x.gif", vec![1u8], MimeType::Gif);
        let outcome = client().upload("::not a url::", None, file, |_| {}).await;
        assert_eq!(outcome.error().unwrap().status, StatusCode::Unknown);
    }

    #[tokio::test]
    async fn test_spawned_invalid_upload_emits_single_failure() {
        let file = FileAttachment { name: None, data: Some(Bytes::from_static(b"gif")), mime_type: MimeType::Gif };
        let mut events = client().spawn_upload("http://127.0.0.1:9/upload", None, file);

        let first = events.recv().await.unwrap();
        assert!(matches!(first, UploadEvent::Failure(ref e) if e.status == StatusCode::InvalidInput));
        assert!(events.recv().await.is_none());
    }
}
