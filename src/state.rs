use std::path::{Path, PathBuf};

/// Process-wide capture state.
///
/// Owned by the capture loop and threaded through each cycle by value. The
/// only mutation is recording a newly accepted clipboard value; nothing here
/// outlives the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    last_accepted_content: String,
    log_path: PathBuf,
}

impl AgentState {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            last_accepted_content: String::new(),
            log_path: log_path.into(),
        }
    }

    pub fn last_accepted_content(&self) -> &str {
        &self.last_accepted_content
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Returns the state with `content` recorded as the last accepted value.
    pub fn accept(self, content: impl Into<String>) -> Self {
        Self {
            last_accepted_content: content.into(),
            ..self
        }
    }

    pub fn is_same_as_last(&self, content: &str) -> bool {
        self.last_accepted_content == content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_accepts_new_content() {
        let s = AgentState::new("/tmp/log");
        assert_eq!(s.last_accepted_content(), "");
        assert!(s.is_same_as_last(""));
        let s = s.accept("abc");
        assert_eq!(s.last_accepted_content(), "abc");
        assert!(s.is_same_as_last("abc"));
        assert!(!s.is_same_as_last("abd"));
        // the path is carried along untouched
        assert_eq!(s.log_path(), Path::new("/tmp/log"));
    }
}
