//! Marks files hidden on platforms that have such an attribute.

use std::io;
use std::path::Path;

pub trait VisibilityBackend {
    /// Marks `path` hidden. Best effort; callers log failures and move on.
    fn hide(&self, path: &Path) -> io::Result<()>;
}

/// Does nothing. Used where there is no hidden attribute, and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopVisibility;

impl VisibilityBackend for NoopVisibility {
    fn hide(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Sets `FILE_ATTRIBUTE_HIDDEN`, keeping the file's other attributes.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenAttribute;

#[cfg(windows)]
impl VisibilityBackend for HiddenAttribute {
    fn hide(&self, path: &Path) -> io::Result<()> {
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Storage::FileSystem::{
            FILE_ATTRIBUTE_HIDDEN, GetFileAttributesW, INVALID_FILE_ATTRIBUTES, SetFileAttributesW,
        };

        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();
        // SAFETY: `wide` is a NUL-terminated UTF-16 buffer that outlives both calls.
        let attrs = unsafe { GetFileAttributesW(wide.as_ptr()) };
        if attrs == INVALID_FILE_ATTRIBUTES {
            return Err(io::Error::last_os_error());
        }
        if attrs & FILE_ATTRIBUTE_HIDDEN != 0 {
            return Ok(());
        }
        let ok = unsafe { SetFileAttributesW(wide.as_ptr(), attrs | FILE_ATTRIBUTE_HIDDEN) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(windows)]
pub type PlatformVisibility = HiddenAttribute;

#[cfg(not(windows))]
pub type PlatformVisibility = NoopVisibility;
