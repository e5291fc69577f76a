//! Secondary error channel.
//!
//! Failures inside the capture loop are written here instead of being
//! propagated. Reporting is itself infallible from the caller's point of
//! view: if the error file cannot be written the report is dropped.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::logger::open_append;

pub trait ErrorReporter {
    fn report(&self, message: &str, cause: &dyn fmt::Display);
}

impl<T: ErrorReporter + ?Sized> ErrorReporter for &T {
    fn report(&self, message: &str, cause: &dyn fmt::Display) {
        (**self).report(message, cause)
    }
}

/// Appends timestamped lines to a file next to the clipboard log and mirrors
/// each one as a `tracing` warning.
#[derive(Debug, Clone)]
pub struct FileReporter {
    path: PathBuf,
}

impl FileReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ErrorReporter for FileReporter {
    fn report(&self, message: &str, cause: &dyn fmt::Display) {
        tracing::warn!("{message}: {cause}");
        let line = format!(
            "[{}] {message}: {cause}\n",
            Local::now().fixed_offset().to_rfc3339()
        );
        if let Ok(mut file) = open_append(&self.path) {
            let _ = file.write_all(line.as_bytes());
        }
    }
}
