use serde::Serialize;
use std::path::Path;

/// Outcome of one generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    /// Descriptors written by this request
    pub created: Vec<String>,
    /// Descriptors that already existed and were left untouched
    pub skipped: Vec<String>,
    /// Human-readable failure descriptions
    pub errors: Vec<String>,
}

impl GenerationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&mut self, path: &Path) {
        self.created.push(path.display().to_string());
    }

    pub fn record_skipped(&mut self, path: &Path) {
        self.skipped.push(path.display().to_string());
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn counts(&self) -> GenerationCounts {
        GenerationCounts {
            created_count: self.created.len(),
            skipped_count: self.skipped.len(),
            error_count: self.errors.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationCounts {
    pub created_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
}
