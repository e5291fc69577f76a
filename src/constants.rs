//! Shared crate-wide constants.

use std::time::Duration;

/// Period between two clipboard samples.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(10);

/// File name of the clipboard log, placed directly in the home directory.
pub const LOG_FILE_NAME: &str = ".clipboard_capture";

/// File name of the secondary error log, kept next to the clipboard log.
pub const ERROR_LOG_FILE_NAME: &str = ".clipboard_capture.err";

/// Maximum number of characters echoed to the console for one entry.
///
/// Only the transient display is capped. The log always receives the full
/// content.
pub const DISPLAY_LIMIT: usize = 300;

/// Suffix appended to a display echo that was cut at [`DISPLAY_LIMIT`].
pub const TRUNCATION_MARKER: &str = "...(truncated)";

/// Name the scheduled task is registered under.
pub const TASK_NAME: &str = "ClipboardCapture";

/// Description stored on the startup shortcut.
pub const SHORTCUT_DESCRIPTION: &str = "Clipboard capture agent";

/// Per-user startup folder, relative to `%APPDATA%`.
pub const STARTUP_DIR_SEGMENTS: [&str; 5] =
    ["Microsoft", "Windows", "Start Menu", "Programs", "Startup"];
