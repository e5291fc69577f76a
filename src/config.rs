use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_TICK_INTERVAL, ERROR_LOG_FILE_NAME, LOG_FILE_NAME, TASK_NAME};
use crate::detector::EmptyPolicy;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("cannot resolve the user's home directory")]
    HomeDirUnavailable,
}

/// Runtime settings of the agent.
///
/// There is no config file or command line: everything derives from the
/// home directory and the defaults in [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub log_path: PathBuf,
    pub error_log_path: PathBuf,
    pub tick_interval: Duration,
    pub empty_policy: EmptyPolicy,
    pub task_name: String,
}

impl AgentConfig {
    pub fn for_home(home: &Path) -> Self {
        Self {
            log_path: home.join(LOG_FILE_NAME),
            error_log_path: home.join(ERROR_LOG_FILE_NAME),
            tick_interval: DEFAULT_TICK_INTERVAL,
            empty_policy: EmptyPolicy::default(),
            task_name: TASK_NAME.to_string(),
        }
    }

    /// Builds the configuration for the current user. Failing to find a home
    /// directory is the one unrecoverable startup error.
    pub fn resolve() -> Result<Self, InitError> {
        dirs::home_dir()
            .map(|home| Self::for_home(&home))
            .ok_or(InitError::HomeDirUnavailable)
    }
}
