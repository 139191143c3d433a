//! Status line shown in place of the chart when the forecast is unavailable

use std::path::PathBuf;

use tracing::warn;

use crate::output::print_status;

/// Fixed text reported when the forecast could not be fetched or decoded
pub const UNAVAILABLE_MESSAGE: &str = "Carbon intensity forecast unavailable";

/// Destination for status text: stderr, plus an optional file whose content
/// is replaced on every update
#[derive(Debug, Default)]
pub struct StatusSink {
    file: Option<PathBuf>,
}

impl StatusSink {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    /// Replace the status text
    pub fn set_text(&self, text: &str) {
        if !text.is_empty() {
            print_status(text);
        }
        if let Some(path) = &self.file
            && let Err(e) = std::fs::write(path, text)
        {
            warn!(path = %path.display(), error = %e, "failed to write status file");
        }
    }

    pub fn report_unavailable(&self) {
        self.set_text(UNAVAILABLE_MESSAGE);
    }

    /// Drop any earlier failure text once a forecast is available
    pub fn clear(&self) {
        self.set_text("");
    }
}
