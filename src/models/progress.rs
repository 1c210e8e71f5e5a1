#[derive(Debug, Clone)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far
    pub bytes_transferred: u64,

    pub total_bytes: u64,
}

impl UploadProgress {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes,
            bytes_transferred: 0,
        }
    }

    pub fn update(&mut self, new_bytes: u64) {
        self.bytes_transferred = self
            .bytes_transferred
            .saturating_add(new_bytes)
            .min(self.total_bytes);
    }

    /// Completed fraction in `[0.0, 1.0]`. An empty payload counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            1.0
        } else {
            (self.bytes_transferred as f64 / self.total_bytes as f64).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_transferred >= self.total_bytes
    }
}
