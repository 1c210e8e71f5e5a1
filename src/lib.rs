mod client;
mod config;
mod error;
mod models;
mod uploader;

pub use client::NetworkClient;
pub use config::ClientConfig;
pub use error::{NetError, NetResult};
pub use models::attachment::{FileAttachment, MimeType};
pub use models::outcome::{RequestOutcome, UploadEvent, UploadReceipt};
pub use models::progress::UploadProgress;
pub use models::request::{RequestRecord, RequestState};
pub use models::status::{ClassifiedError, StatusCode};
pub use uploader::worker::UploadEvents;
