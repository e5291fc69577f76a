//! Cross-platform clipboard reading.
//
//! This module wraps the `arboard` crate behind the [`ClipboardSource`]
//! trait so the capture loop can be driven by a scripted source in tests.
//! Every failure the backend reports is treated as transient: the loop skips
//! the tick and samples again on the next one.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard is locked by another process")]
    Locked,
    #[error("no text content available")]
    NoText,
    #[error("clipboard backend error: {0}")]
    Backend(String),
}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        match err {
            arboard::Error::ClipboardOccupied => ClipboardError::Locked,
            arboard::Error::ContentNotAvailable => ClipboardError::NoText,
            other => ClipboardError::Backend(other.to_string()),
        }
    }
}

/// Something that can be asked for the current clipboard text.
pub trait ClipboardSource {
    fn read(&mut self) -> Result<String, ClipboardError>;
}

impl<T: ClipboardSource + ?Sized> ClipboardSource for &mut T {
    fn read(&mut self) -> Result<String, ClipboardError> {
        (**self).read()
    }
}

/// The system clipboard, accessed through `arboard`.
///
/// A fresh backend handle is opened for every read. Initialisation failures
/// (no display, clipboard held by another process) then surface as a
/// transient read error instead of poisoning a long-lived handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArboardSource;

impl ArboardSource {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSource for ArboardSource {
    fn read(&mut self) -> Result<String, ClipboardError> {
        get()
    }
}

/// Read the clipboard as a `String`.
pub fn get() -> Result<String, ClipboardError> {
    let mut cb = arboard::Clipboard::new()?;
    cb.get_text().map_err(ClipboardError::from)
}

/// Try to create a clipboard instance to detect availability.
pub fn available() -> bool {
    arboard::Clipboard::new().is_ok()
}
