use std::io;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use crate::models::progress::UploadProgress;

/// Splits `data` into `chunk_size` slices. Every slice pulled by the
/// transport reports the new completed fraction on `progress_tx`.
pub(crate) fn progress_stream(
    data: Bytes,
    chunk_size: usize,
    progress_tx: UnboundedSender<f64>,
) -> impl Stream<Item = io::Result<Bytes>> + Send + Sync + 'static {
    let mut progress = UploadProgress::new(data.len() as u64);
    let chunk_size = chunk_size.max(1);

    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect();

    stream::iter(chunks).map(move |chunk| {
        progress.update(chunk.len() as u64);
        // receiver dropped: nobody listens for progress anymore, keep sending the body
        let _ = progress_tx.send(progress.fraction());
        Ok::<_, io::Error>(chunk)
    })
}

/// Request body for the file part of a multipart upload
pub(crate) fn progress_body(
    data: Bytes,
    chunk_size: usize,
    progress_tx: UnboundedSender<f64>,
) -> reqwest::Body {
    reqwest::Body::wrap_stream(progress_stream(data, chunk_size, progress_tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_stream_reports_each_chunk() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let data = Bytes::from_static(b"0123456789");

        let chunks: Vec<Bytes> = progress_stream(data, 4, tx)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), b"0123456789".to_vec());

        let mut fractions = Vec::new();
        while let Some(fraction) = rx.recv().await {
            fractions.push(fraction);
        }
        assert_eq!(fractions, vec![0.4, 0.8, 1.0]);
    }

    #[tokio::test]
    async fn test_stream_survives_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let chunks: Vec<io::Result<Bytes>> = progress_stream(Bytes::from_static(b"abc"), 2, tx)
            .collect()
            .await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.is_ok()));
    }
}
