use std::path::Path;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use crate::error::{NetError, NetResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MimeType {
    Gif,
    Png,
    Jpeg,
    Pdf,
    Json,
    PlainText,
    OctetStream,
    Other(String),
}

impl MimeType {
    pub fn as_str(&self) -> &str {
        match self {
            MimeType::Gif => "image/gif",
            MimeType::Png => "image/png",
            MimeType::Jpeg => "image/jpeg",
            MimeType::Pdf => "application/pdf",
            MimeType::Json => "application/json",
            MimeType::PlainText => "text/plain",
            MimeType::OctetStream => "application/octet-stream",
            MimeType::Other(mime) => mime,
        }
    }

    /// Maps a MIME string onto the named variants where one exists
    pub fn parse(mime: &str) -> MimeType {
        match mime.to_ascii_lowercase().as_str() {
            "image/gif" => MimeType::Gif,
            "image/png" => MimeType::Png,
            "image/jpeg" | "image/jpg" => MimeType::Jpeg,
            "application/pdf" => MimeType::Pdf,
            "application/json" => MimeType::Json,
            "text/plain" => MimeType::PlainText,
            "application/octet-stream" => MimeType::OctetStream,
            _ => MimeType::Other(mime.to_string()),
        }
    }

    /// Guesses from the file extension, `OctetStream` when unknown
    pub fn from_path(path: impl AsRef<Path>) -> MimeType {
        mime_guess::from_path(path)
            .first()
            .map(|mime| MimeType::parse(mime.essence_str()))
            .unwrap_or(MimeType::OctetStream)
    }
}

/// A file to send with [`NetworkClient::upload`](crate::NetworkClient::upload).
///
/// Name and data are optional so that incomplete attachments can be
/// represented; the upload rejects them before touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub name: Option<String>,
    pub data: Option<Bytes>,
    pub mime_type: MimeType,
}

impl FileAttachment {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>, mime_type: MimeType) -> Self {
        Self {
            name: Some(name.into()),
            data: Some(data.into()),
            mime_type,
        }
    }

    /// Reads a file from disk, naming it after the path's file name
    pub async fn from_path(path: impl AsRef<Path>) -> NetResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| NetError::Config("Invalid file name".to_string()))?
            .to_string();
        let data = tokio::fs::read(path).await?;

        Ok(Self {
            name: Some(name),
            data: Some(Bytes::from(data)),
            mime_type: MimeType::from_path(path),
        })
    }

    /// Name and bytes, if both are present and non-empty
    pub fn parts(&self) -> Option<(&str, &Bytes)> {
        let name = self.name.as_deref().filter(|n| !n.trim().is_empty())?;
        let data = self.data.as_ref().filter(|d| !d.is_empty())?;
        Some((name, data))
    }

    pub fn is_valid(&self) -> bool {
        self.parts().is_some()
    }

    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_strings() {
        assert_eq!(MimeType::Gif.as_str(), "image/gif");
        assert_eq!(MimeType::parse("IMAGE/PNG"), MimeType::Png);
        assert_eq!(
            MimeType::parse("video/mp4"),
            MimeType::Other("video/mp4".to_string())
        );
        assert_eq!(MimeType::Other("video/mp4".into()).as_str(), "video/mp4");
    }

    #[test]
    fn test_mime_from_path() {
        assert_eq!(MimeType::from_path("cat.gif"), MimeType::Gif);
        assert_eq!(MimeType::from_path("report.pdf"), MimeType::Pdf);
        assert_eq!(MimeType::from_path("no_extension"), MimeType::OctetStream);
    }

    #[test]
    fn test_attachment_validation() {
        let valid = FileAttachment::new("x.gif", vec![1u8, 2, 3], MimeType::Gif);
        assert!(valid.is_valid());
        assert_eq!(valid.len(), 3);

        let no_data = FileAttachment { name: Some("x".into()), data: None, mime_type: MimeType::Gif };
        assert!(!no_data.is_valid());

        let no_name = FileAttachment { name: None, data: Some(Bytes::from_static(b"gif")), mime_type: MimeType::Gif };
        assert!(!no_name.is_valid());

        let empty = FileAttachment::new("x.gif", Vec::<u8>::new(), MimeType::Gif);
        assert!(!empty.is_valid());
        assert!(empty.is_empty());

        let blank_name = FileAttachment::new("  ", vec![1u8], MimeType::Gif);
        assert!(!blank_name.is_valid());
    }

    #[tokio::test]
    async fn test_attachment_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not really a png").unwrap();

        let attachment = FileAttachment::from_path(&path).await.unwrap();
        assert_eq!(attachment.name.as_deref(), Some("photo.png"));
        assert_eq!(attachment.mime_type, MimeType::Png);
        assert_eq!(attachment.len(), 16);
    }

    #[tokio::test]
    async fn test_attachment_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileAttachment::from_path(dir.path().join("missing.gif")).await;
        assert!(matches!(result, Err(NetError::IOError(_))));
    }
}
