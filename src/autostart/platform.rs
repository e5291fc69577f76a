use std::path::{Path, PathBuf};

use super::{InstallError, Mechanism, PersistenceBackend, ShortcutSpec, schtasks, shortcut};
use crate::constants::STARTUP_DIR_SEGMENTS;

/// Task Scheduler, the per-user startup folder and shell links.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsBackend;

impl PersistenceBackend for WindowsBackend {
    fn supports(&self, _mechanism: Mechanism) -> bool {
        true
    }

    fn startup_dir(&mut self) -> Result<PathBuf, InstallError> {
        let app_data = std::env::var_os("APPDATA")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                InstallError::StartupDirUnavailable("APPDATA environment variable not set".into())
            })?;
        let dir = STARTUP_DIR_SEGMENTS
            .iter()
            .fold(PathBuf::from(app_data), |acc, seg| acc.join(seg));
        std::fs::create_dir_all(&dir).map_err(|source| InstallError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    fn task_exists(&mut self, name: &str) -> Result<bool, InstallError> {
        Ok(schtasks::run(&schtasks::query_args(name))?.status.success())
    }

    fn create_task(&mut self, name: &str, executable: &Path) -> Result<(), InstallError> {
        let output = schtasks::run(&schtasks::create_args(name, executable))?;
        if output.status.success() {
            return Ok(());
        }
        Err(InstallError::Command {
            program: schtasks::PROGRAM.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn create_shortcut(&mut self, spec: &ShortcutSpec) -> Result<(), InstallError> {
        shortcut::create(spec)
    }
}
