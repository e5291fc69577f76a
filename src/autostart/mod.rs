//! Registration of the running executable for launch at system startup.
//!
//! Three mechanisms are tried in priority order, each one independently:
//!
//! 1. a scheduled task that runs at system start with the highest available
//!    privilege,
//! 2. a shortcut in the per-user startup folder,
//! 3. a copy of the executable in the same folder.
//!
//! Every mechanism first checks whether it is already in place and only
//! installs when it is absent, so repeated runs leave exactly one
//! registration per mechanism. Failures are reported and never stop the
//! remaining mechanisms. The OS side lives behind [`PersistenceBackend`].

pub mod schtasks;
#[cfg(windows)]
mod platform;
#[cfg(windows)]
mod shortcut;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::constants::{SHORTCUT_DESCRIPTION, TASK_NAME};
use crate::reporter::ErrorReporter;

#[cfg(windows)]
pub use self::platform::WindowsBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mechanism {
    ScheduledTask,
    StartupShortcut,
    StartupBinaryCopy,
}

impl Mechanism {
    /// All mechanisms, in the order they are attempted.
    pub const ALL: [Mechanism; 3] = [
        Mechanism::ScheduledTask,
        Mechanism::StartupShortcut,
        Mechanism::StartupBinaryCopy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mechanism::ScheduledTask => "scheduled task",
            Mechanism::StartupShortcut => "startup shortcut",
            Mechanism::StartupBinaryCopy => "startup binary copy",
        }
    }
}

/// Where a mechanism ended up after one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MechanismState {
    NotChecked,
    /// Already registered before this run; left untouched.
    Present,
    /// Registered by this run.
    Installed,
    Failed(String),
    /// The platform has no such mechanism.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutostartRegistration {
    pub mechanism: Mechanism,
    pub target_path: PathBuf,
    pub installed: bool,
    pub state: MechanismState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStyle {
    Normal,
    Minimized,
}

/// Fields of the startup shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSpec {
    pub link_path: PathBuf,
    pub target_path: PathBuf,
    pub working_directory: PathBuf,
    pub window_style: WindowStyle,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("startup folder unavailable: {0}")]
    StartupDirUnavailable(String),
    #[error("executable path has no file name: {}", .0.display())]
    InvalidExecutable(PathBuf),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("shell link error: {0}")]
    Shell(String),
}

/// OS operations the installer needs.
///
/// Filesystem checks and the binary copy have `std::fs` defaults; platform
/// backends only implement task and shortcut handling.
pub trait PersistenceBackend {
    fn supports(&self, mechanism: Mechanism) -> bool;

    /// Resolves the per-user startup folder, creating it if missing.
    fn startup_dir(&mut self) -> Result<PathBuf, InstallError>;

    fn task_exists(&mut self, name: &str) -> Result<bool, InstallError>;

    fn create_task(&mut self, name: &str, executable: &Path) -> Result<(), InstallError>;

    fn create_shortcut(&mut self, shortcut: &ShortcutSpec) -> Result<(), InstallError>;

    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn copy_binary(&mut self, from: &Path, to: &Path) -> Result<(), InstallError> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|source| InstallError::Io {
                path: to.to_path_buf(),
                source,
            })
    }
}

/// Backend for platforms without any of the supported mechanisms.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBackend;

impl PersistenceBackend for NoopBackend {
    fn supports(&self, _mechanism: Mechanism) -> bool {
        false
    }

    fn startup_dir(&mut self) -> Result<PathBuf, InstallError> {
        Err(InstallError::StartupDirUnavailable(
            "not supported on this platform".to_string(),
        ))
    }

    fn task_exists(&mut self, _name: &str) -> Result<bool, InstallError> {
        Ok(false)
    }

    fn create_task(&mut self, _name: &str, _executable: &Path) -> Result<(), InstallError> {
        Ok(())
    }

    fn create_shortcut(&mut self, _shortcut: &ShortcutSpec) -> Result<(), InstallError> {
        Ok(())
    }
}

#[cfg(windows)]
pub type PlatformBackend = WindowsBackend;

#[cfg(not(windows))]
pub type PlatformBackend = NoopBackend;

pub struct AutostartInstaller<'a, B: ?Sized, R> {
    backend: &'a mut B,
    reporter: R,
    task_name: String,
}

impl<'a, B, R> AutostartInstaller<'a, B, R>
where
    B: PersistenceBackend + ?Sized,
    R: ErrorReporter,
{
    pub fn new(backend: &'a mut B, reporter: R) -> Self {
        Self {
            backend,
            reporter,
            task_name: TASK_NAME.to_string(),
        }
    }

    pub fn with_task_name(mut self, name: impl Into<String>) -> Self {
        self.task_name = name.into();
        self
    }

    /// Runs every supported mechanism against `executable`.
    ///
    /// Never fails: per-mechanism failures are reported and recorded in the
    /// returned registrations. Returns an empty list when the platform
    /// supports none of the mechanisms.
    pub fn install(&mut self, executable: &Path) -> Vec<AutostartRegistration> {
        if !Mechanism::ALL.iter().any(|m| self.backend.supports(*m)) {
            debug!("autostart not supported on this platform");
            return Vec::new();
        }

        let needs_folder = [Mechanism::StartupShortcut, Mechanism::StartupBinaryCopy]
            .iter()
            .any(|m| self.backend.supports(*m));
        let startup_dir = if needs_folder {
            self.backend.startup_dir().map_err(|err| err.to_string())
        } else {
            Err("startup folder not needed".to_string())
        };

        Mechanism::ALL
            .iter()
            .map(|&mechanism| self.install_one(mechanism, executable, &startup_dir))
            .collect()
    }

    fn install_one(
        &mut self,
        mechanism: Mechanism,
        executable: &Path,
        startup_dir: &Result<PathBuf, String>,
    ) -> AutostartRegistration {
        let mut registration = AutostartRegistration {
            mechanism,
            target_path: PathBuf::new(),
            installed: false,
            state: MechanismState::NotChecked,
        };
        if !self.backend.supports(mechanism) {
            registration.state = MechanismState::Unsupported;
            return registration;
        }

        let result = target_path(mechanism, executable, startup_dir).and_then(|target| {
            registration.target_path = target;
            self.ensure(mechanism, executable, &registration.target_path)
        });

        registration.state = match result {
            Ok(state) => state,
            Err(err) => {
                self.reporter
                    .report(&format!("autostart {} failed", mechanism.label()), &err);
                MechanismState::Failed(err.to_string())
            }
        };
        registration.installed = matches!(
            registration.state,
            MechanismState::Present | MechanismState::Installed
        );
        registration
    }

    fn ensure(
        &mut self,
        mechanism: Mechanism,
        executable: &Path,
        target: &Path,
    ) -> Result<MechanismState, InstallError> {
        let present = match mechanism {
            Mechanism::ScheduledTask => self.backend.task_exists(&self.task_name)?,
            Mechanism::StartupShortcut | Mechanism::StartupBinaryCopy => {
                self.backend.path_exists(target)
            }
        };
        if present {
            debug!("{} already present at {}", mechanism.label(), target.display());
            return Ok(MechanismState::Present);
        }

        match mechanism {
            Mechanism::ScheduledTask => self.backend.create_task(&self.task_name, executable)?,
            Mechanism::StartupShortcut => {
                let shortcut = shortcut_spec(executable, target);
                self.backend.create_shortcut(&shortcut)?
            }
            Mechanism::StartupBinaryCopy => self.backend.copy_binary(executable, target)?,
        }
        info!("installed {} at {}", mechanism.label(), target.display());
        Ok(MechanismState::Installed)
    }
}

/// True when at least one registration is in place after a run.
pub fn any_installed(registrations: &[AutostartRegistration]) -> bool {
    registrations.iter().any(|r| r.installed)
}

fn target_path(
    mechanism: Mechanism,
    executable: &Path,
    startup_dir: &Result<PathBuf, String>,
) -> Result<PathBuf, InstallError> {
    if mechanism == Mechanism::ScheduledTask {
        return Ok(executable.to_path_buf());
    }
    let dir = startup_dir
        .as_ref()
        .map_err(|reason| InstallError::StartupDirUnavailable(reason.clone()))?;
    let invalid = || InstallError::InvalidExecutable(executable.to_path_buf());
    match mechanism {
        Mechanism::StartupShortcut => {
            let stem = executable.file_stem().ok_or_else(invalid)?;
            let mut name = stem.to_os_string();
            name.push(".lnk");
            Ok(dir.join(name))
        }
        _ => Ok(dir.join(executable.file_name().ok_or_else(invalid)?)),
    }
}

fn shortcut_spec(executable: &Path, link_path: &Path) -> ShortcutSpec {
    ShortcutSpec {
        link_path: link_path.to_path_buf(),
        target_path: executable.to_path_buf(),
        working_directory: executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        window_style: WindowStyle::Minimized,
        description: SHORTCUT_DESCRIPTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::fmt;

    /// In-memory task registry plus a real scratch startup folder.
    struct FakeBackend {
        startup: PathBuf,
        tasks: BTreeSet<String>,
        task_creations: usize,
        shortcut_creations: usize,
        fail_task: bool,
        fail_startup_dir: bool,
        supported: bool,
    }

    impl FakeBackend {
        fn new(startup: PathBuf) -> Self {
            Self {
                startup,
                tasks: BTreeSet::new(),
                task_creations: 0,
                shortcut_creations: 0,
                fail_task: false,
                fail_startup_dir: false,
                supported: true,
            }
        }
    }

    impl PersistenceBackend for FakeBackend {
        fn supports(&self, _mechanism: Mechanism) -> bool {
            self.supported
        }

        fn startup_dir(&mut self) -> Result<PathBuf, InstallError> {
            if self.fail_startup_dir {
                return Err(InstallError::StartupDirUnavailable("APPDATA unset".into()));
            }
            std::fs::create_dir_all(&self.startup).unwrap();
            Ok(self.startup.clone())
        }

        fn task_exists(&mut self, name: &str) -> Result<bool, InstallError> {
            Ok(self.tasks.contains(name))
        }

        fn create_task(&mut self, name: &str, _executable: &Path) -> Result<(), InstallError> {
            if self.fail_task {
                return Err(InstallError::Command {
                    program: "schtasks".into(),
                    status: "exit code: 1".into(),
                    stderr: "Access is denied.".into(),
                });
            }
            self.task_creations += 1;
            self.tasks.insert(name.to_string());
            Ok(())
        }

        fn create_shortcut(&mut self, shortcut: &ShortcutSpec) -> Result<(), InstallError> {
            self.shortcut_creations += 1;
            std::fs::write(&shortcut.link_path, "lnk").unwrap();
            Ok(())
        }
    }

    #[derive(Default)]
    struct Collect(RefCell<Vec<String>>);

    impl ErrorReporter for Collect {
        fn report(&self, message: &str, cause: &dyn fmt::Display) {
            self.0.borrow_mut().push(format!("{message}: {cause}"));
        }
    }

    fn fake_exe(dir: &Path) -> PathBuf {
        let exe = dir.join("bin").join("clip-capture.exe");
        std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
        std::fs::write(&exe, b"binary").unwrap();
        exe
    }

    fn states(regs: &[AutostartRegistration]) -> Vec<MechanismState> {
        regs.iter().map(|r| r.state.clone()).collect()
    }

    #[test]
    fn second_run_finds_everything_present() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_exe(dir.path());
        let mut backend = FakeBackend::new(dir.path().join("Startup"));
        let reporter = Collect::default();

        let first = AutostartInstaller::new(&mut backend, &reporter).install(&exe);
        assert_eq!(states(&first), vec![MechanismState::Installed; 3]);
        assert!(any_installed(&first));

        let second = AutostartInstaller::new(&mut backend, &reporter).install(&exe);
        assert_eq!(states(&second), vec![MechanismState::Present; 3]);

        assert_eq!(backend.task_creations, 1);
        assert_eq!(backend.tasks.len(), 1);
        assert_eq!(backend.shortcut_creations, 1);
        let entries: Vec<_> = std::fs::read_dir(&backend.startup)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            std::fs::read(backend.startup.join("clip-capture.exe")).unwrap(),
            b"binary"
        );
        assert!(reporter.0.borrow().is_empty());
    }

    #[test]
    fn registrations_point_at_expected_targets() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_exe(dir.path());
        let mut backend = FakeBackend::new(dir.path().join("Startup"));

        let regs = AutostartInstaller::new(&mut backend, Collect::default()).install(&exe);
        let mechanisms: Vec<Mechanism> = regs.iter().map(|r| r.mechanism).collect();
        assert_eq!(mechanisms, Mechanism::ALL);
        assert_eq!(regs[0].target_path, exe);
        assert_eq!(regs[1].target_path, dir.path().join("Startup/clip-capture.lnk"));
        assert_eq!(regs[2].target_path, dir.path().join("Startup/clip-capture.exe"));
    }

    #[test]
    fn failing_task_does_not_block_other_mechanisms() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_exe(dir.path());
        let mut backend = FakeBackend::new(dir.path().join("Startup"));
        backend.fail_task = true;
        let reporter = Collect::default();

        let regs = AutostartInstaller::new(&mut backend, &reporter).install(&exe);
        assert!(matches!(regs[0].state, MechanismState::Failed(_)));
        assert!(!regs[0].installed);
        assert_eq!(regs[1].state, MechanismState::Installed);
        assert_eq!(regs[2].state, MechanismState::Installed);
        assert!(any_installed(&regs));

        let reports = reporter.0.borrow();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].starts_with("autostart scheduled task failed"));
    }

    #[test]
    fn missing_startup_folder_still_attempts_task() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_exe(dir.path());
        let mut backend = FakeBackend::new(dir.path().join("Startup"));
        backend.fail_startup_dir = true;
        let reporter = Collect::default();

        let regs = AutostartInstaller::new(&mut backend, &reporter)
            .with_task_name("Custom")
            .install(&exe);
        assert_eq!(regs[0].state, MechanismState::Installed);
        assert!(backend.tasks.contains("Custom"));
        assert!(matches!(regs[1].state, MechanismState::Failed(_)));
        assert!(matches!(regs[2].state, MechanismState::Failed(_)));
        assert_eq!(reporter.0.borrow().len(), 2);
    }

    #[test]
    fn preexisting_task_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_exe(dir.path());
        let mut backend = FakeBackend::new(dir.path().join("Startup"));
        backend.tasks.insert(TASK_NAME.to_string());

        let regs = AutostartInstaller::new(&mut backend, Collect::default()).install(&exe);
        assert_eq!(regs[0].state, MechanismState::Present);
        assert!(regs[0].installed);
        assert_eq!(backend.task_creations, 0);
    }

    #[test]
    fn unsupported_platform_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_exe(dir.path());
        let mut backend = FakeBackend::new(dir.path().join("Startup"));
        backend.supported = false;
        let reporter = Collect::default();

        let regs = AutostartInstaller::new(&mut backend, &reporter).install(&exe);
        assert!(regs.is_empty());
        assert!(!backend.startup.exists());
        assert!(reporter.0.borrow().is_empty());

        let mut noop = NoopBackend;
        assert!(AutostartInstaller::new(&mut noop, &reporter).install(&exe).is_empty());
    }

    #[test]
    fn shortcut_spec_uses_executable_directory_and_minimized_style() {
        let exe = Path::new("/opt/agent/clip-capture.exe");
        let spec = shortcut_spec(exe, Path::new("/startup/clip-capture.lnk"));
        assert_eq!(spec.target_path, exe);
        assert_eq!(spec.working_directory, Path::new("/opt/agent"));
        assert_eq!(spec.window_style, WindowStyle::Minimized);
        assert_eq!(spec.description, SHORTCUT_DESCRIPTION);
    }
}
