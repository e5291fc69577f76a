use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::entry::LogEntry;

/// Appends one record to the clipboard log at `path`.
///
/// No handle is kept between calls: the file is opened, written with a
/// single `write_all` and closed again before returning, on every path.
pub fn append(path: &Path, entry: &LogEntry) -> io::Result<()> {
    let mut file = open_append(path)?;
    file.write_all(entry.render().as_bytes())?;
    file.flush()
}

/// Opens `path` for appending, creating it owner-only if absent.
pub(crate) fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
