use std::collections::HashMap;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use crate::error::{NetError, NetResult};

/// Configuration for a [`NetworkClient`](crate::NetworkClient).
///
/// Everything is optional. Timeouts left at `None` inherit the transport's
/// own defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Headers sent with every request, overridden by per-request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Value for the `User-Agent` header
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Total request timeout
    #[serde(default)]
    pub timeout: Option<Duration>,

    /// Connection establishment timeout
    #[serde(default)]
    pub connect_timeout: Option<Duration>,

    /// Multipart field name the uploaded file is attached under
    #[serde(default = "default_upload_field_name")]
    pub upload_field_name: String,

    /// Size of the slices the upload body is streamed in.
    /// One progress notification is emitted per slice.
    #[serde(default = "default_progress_chunk_size")]
    pub progress_chunk_size: usize,
}

fn default_upload_field_name() -> String { "file".to_string() }
fn default_progress_chunk_size() -> usize { 64 * 1024 } // 64KB

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            user_agent: None,
            timeout: None,
            connect_timeout: None,
            upload_field_name: default_upload_field_name(),
            progress_chunk_size: default_progress_chunk_size(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> NetResult<()> {
        if self.upload_field_name.trim().is_empty() {
            return Err(NetError::Config("Upload field name cannot be empty".into()));
        }

        if self.progress_chunk_size == 0 {
            return Err(NetError::Config("Progress chunk size must be greater than 0".into()));
        }
        if self.progress_chunk_size > 16 * 1024 * 1024 {
            return Err(NetError::Config("Progress chunk size cannot be larger than 16MB".into()));
        }

        if matches!(self.timeout, Some(t) if t.is_zero()) {
            return Err(NetError::Config("Timeout must be greater than 0".into()));
        }
        if matches!(self.connect_timeout, Some(t) if t.is_zero()) {
            return Err(NetError::Config("Connect timeout must be greater than 0".into()));
        }

        for name in self.headers.keys() {
            if name.trim().is_empty() {
                return Err(NetError::InvalidHeader("Header name cannot be empty".into()));
            }
        }

        Ok(())
    }

    /// Builder method to add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Builder method to merge several default headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Builder method to set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builder method to set the total request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builder method to set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builder method to set the multipart field name of uploaded files
    pub fn with_upload_field_name(mut self, name: impl Into<String>) -> Self {
        self.upload_field_name = name.into();
        self
    }

    /// Builder method to set the upload progress granularity
    pub fn with_progress_chunk_size(mut self, size: usize) -> Self {
        self.progress_chunk_size = size;
        self
    }
}
