//! On-disk record format for the clipboard log.
//!
//! Each record is a bracketed RFC3339 header carrying the content length in
//! bytes, the raw content, and a separator line:
//!
//! ```text
//! [2026-10-16T09:30:00+02:00] 11
//! hello
//! world
//! --
//! ```
//!
//! The length makes a record self-delimiting, so content may contain
//! newlines, brackets or lines that look like separators.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::constants::{DISPLAY_LIMIT, TRUNCATION_MARKER};

const SEPARATOR: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub content: String,
    pub truncated_for_display: bool,
}

impl LogEntry {
    pub fn new(timestamp: DateTime<FixedOffset>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            timestamp: timestamp.to_rfc3339(),
            truncated_for_display: content.chars().count() > DISPLAY_LIMIT,
            content,
        }
    }

    /// The record as written to the log.
    pub fn render(&self) -> String {
        render_parts(&self.timestamp, &self.content)
    }

    /// The content as echoed to the console, capped at [`DISPLAY_LIMIT`]
    /// characters.
    pub fn display(&self) -> String {
        summarize(&self.content)
    }

    pub fn parsed_timestamp(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.timestamp)
    }
}

/// Renders one record from a timestamp and content.
pub fn render(timestamp: DateTime<FixedOffset>, content: &str) -> String {
    render_parts(&timestamp.to_rfc3339(), content)
}

fn render_parts(timestamp: &str, content: &str) -> String {
    format!("[{timestamp}] {}\n{content}\n{SEPARATOR}\n", content.len())
}

/// Caps `content` at [`DISPLAY_LIMIT`] characters, appending
/// [`TRUNCATION_MARKER`] when anything was cut.
pub fn summarize(content: &str) -> String {
    match content.char_indices().nth(DISPLAY_LIMIT) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cut]),
        None => content.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed header at byte {offset}")]
    Header { offset: usize },
    #[error("record at byte {offset} is shorter than its declared length")]
    Truncated { offset: usize },
    #[error("missing separator after record at byte {offset}")]
    Separator { offset: usize },
}

/// Entries read from a log, along with the damage skipped over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedLog {
    pub entries: Vec<LogEntry>,
    pub damaged: Vec<ParseError>,
}

/// Parses a whole log back into entries, in file order. Fails on the first
/// damaged record; use [`scan_log`] to read past damage.
pub fn parse_log(text: &str) -> Result<Vec<LogEntry>, ParseError> {
    let mut entries = Vec::new();
    let mut offset = 0;
    while offset < text.len() {
        let (entry, next) = parse_record(text, offset)?;
        entries.push(entry);
        offset = next;
    }
    Ok(entries)
}

/// Like [`parse_log`], but a damaged record (for example one torn by the
/// process being killed mid-write) is recorded in
/// [`ScannedLog::damaged`] and reading resumes at the next complete record.
pub fn scan_log(text: &str) -> ScannedLog {
    let mut scanned = ScannedLog::default();
    let mut offset = 0;
    while offset < text.len() {
        match parse_record(text, offset) {
            Ok((entry, next)) => {
                scanned.entries.push(entry);
                offset = next;
            }
            Err(err) => {
                scanned.damaged.push(err);
                let skip = text[offset..].chars().next().map_or(1, char::len_utf8);
                offset = next_record_start(text, offset + skip).unwrap_or(text.len());
            }
        }
    }
    scanned
}

/// Finds the first offset at or after `from` where a complete record starts.
fn next_record_start(text: &str, from: usize) -> Option<usize> {
    let mut at = from;
    while let Some(found) = text.get(at..)?.find('[') {
        let candidate = at + found;
        if parse_record(text, candidate).is_ok() {
            return Some(candidate);
        }
        at = candidate + 1;
    }
    None
}

/// Parses the record starting at `offset`, returning it and the offset just
/// past its separator.
fn parse_record(text: &str, offset: usize) -> Result<(LogEntry, usize), ParseError> {
    let rest = &text[offset..];
    let header_end = rest.find('\n').ok_or(ParseError::Header { offset })?;
    let (timestamp, len) =
        parse_header(&rest[..header_end]).ok_or(ParseError::Header { offset })?;

    let body_start = header_end + 1;
    let body_end = body_start
        .checked_add(len)
        .ok_or(ParseError::Truncated { offset })?;
    let content = rest
        .get(body_start..body_end)
        .ok_or(ParseError::Truncated { offset })?;

    let trailer = format!("\n{SEPARATOR}\n");
    if !rest[body_end..].starts_with(&trailer) {
        return Err(ParseError::Separator { offset });
    }

    let entry = LogEntry {
        timestamp: timestamp.to_string(),
        truncated_for_display: content.chars().count() > DISPLAY_LIMIT,
        content: content.to_string(),
    };
    Ok((entry, offset + body_end + trailer.len()))
}

fn parse_header(header: &str) -> Option<(&str, usize)> {
    let inner = header.strip_prefix('[')?;
    let (timestamp, len) = inner.split_once("] ")?;
    DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some((timestamp, len.parse().ok()?))
}
