pub mod attachment;
pub mod outcome;
pub mod progress;
pub mod request;
pub mod status;
