//! Scheduled-task registration through the `schtasks` command.
//!
//! Argument lists are built separately from running the command so they can
//! be checked on any platform.

use std::ffi::OsString;
use std::path::Path;

pub const PROGRAM: &str = "schtasks";

/// Arguments that query a task by name. The command succeeds only if the
/// task exists.
pub fn query_args(name: &str) -> Vec<OsString> {
    ["/Query", "/TN", name].iter().map(OsString::from).collect()
}

/// Arguments that create a task starting `executable` at system start with
/// the highest available privilege. No `/F`: an existing task is never
/// overwritten.
pub fn create_args(name: &str, executable: &Path) -> Vec<OsString> {
    let mut quoted = OsString::from("\"");
    quoted.push(executable.as_os_str());
    quoted.push("\"");

    let mut args: Vec<OsString> = ["/Create", "/TN", name, "/TR"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(quoted);
    args.extend(
        ["/SC", "ONSTART", "/RL", "HIGHEST"]
            .iter()
            .map(OsString::from),
    );
    args
}

#[cfg(windows)]
pub(crate) fn run(args: &[OsString]) -> Result<std::process::Output, super::InstallError> {
    use std::os::windows::process::CommandExt;
    use windows_sys::Win32::System::Threading::CREATE_NO_WINDOW;

    std::process::Command::new(PROGRAM)
        .args(args)
        .creation_flags(CREATE_NO_WINDOW)
        .output()
        .map_err(|source| super::InstallError::Io {
            path: PROGRAM.into(),
            source,
        })
}
