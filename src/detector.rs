//! Change detection: decides which clipboard samples become log entries.
//!
//! The detector is a pure step over [`AgentState`]. It never touches the
//! filesystem; the capture loop turns its [`Effect`] into writes and reports.

use chrono::{DateTime, FixedOffset};

use crate::clipboard::ClipboardError;
use crate::state::AgentState;

/// One successful clipboard read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSample {
    pub content: String,
    pub captured_at: DateTime<FixedOffset>,
}

impl ClipboardSample {
    pub fn new(content: impl Into<String>, captured_at: DateTime<FixedOffset>) -> Self {
        Self {
            content: content.into(),
            captured_at,
        }
    }
}

/// What to do when the clipboard changes to an empty value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Record the empty value as seen but write nothing.
    #[default]
    Suppress,
    /// Write an entry for the empty value like any other change.
    Log,
}

/// The side effect a cycle asks the loop to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do this tick.
    None,
    /// The clipboard could not be read.
    ReportReadFailure(ClipboardError),
    /// A new value was accepted and must be written.
    Log(ClipboardSample),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ChangeDetector {
    policy: EmptyPolicy,
}

impl ChangeDetector {
    pub fn new(policy: EmptyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> EmptyPolicy {
        self.policy
    }

    /// Evaluates one read against the state and returns the next state along
    /// with the effect to perform.
    ///
    /// A failed read leaves the state untouched. An accepted value advances
    /// the state before any write happens, so a failed write is not retried
    /// on the next tick.
    pub fn evaluate(
        &self,
        state: AgentState,
        read: Result<ClipboardSample, ClipboardError>,
    ) -> (AgentState, Effect) {
        let sample = match read {
            Ok(sample) => sample,
            Err(err) => return (state, Effect::ReportReadFailure(err)),
        };

        if state.is_same_as_last(&sample.content) {
            return (state, Effect::None);
        }

        let state = state.accept(sample.content.as_str());
        if sample.content.is_empty() && self.policy == EmptyPolicy::Suppress {
            return (state, Effect::None);
        }
        (state, Effect::Log(sample))
    }
}

/// Free-function form of [`ChangeDetector::evaluate`].
pub fn step(
    state: AgentState,
    read: Result<ClipboardSample, ClipboardError>,
    policy: EmptyPolicy,
) -> (AgentState, Effect) {
    ChangeDetector::new(policy).evaluate(state, read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .timestamp_opt(1_700_000_000 + secs, 0)
            .unwrap()
    }

    fn logged(samples: &[&str], policy: EmptyPolicy) -> Vec<String> {
        let mut state = AgentState::new("log");
        let mut out = Vec::new();
        for (i, s) in samples.iter().enumerate() {
            let (next, effect) = step(state, Ok(ClipboardSample::new(*s, at(i as i64))), policy);
            state = next;
            if let Effect::Log(sample) = effect {
                out.push(sample.content);
            }
        }
        out
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        assert_eq!(
            logged(&["a", "a", "a", "b", "b", "a"], EmptyPolicy::Suppress),
            vec!["a", "b", "a"]
        );
    }

    #[test]
    fn empty_transition_resets_distinctness() {
        assert_eq!(
            logged(&["a", "a", "b", "", "b"], EmptyPolicy::Suppress),
            vec!["a", "b", "b"]
        );
    }

    #[test]
    fn leading_empty_reads_log_nothing() {
        assert!(logged(&["", "", ""], EmptyPolicy::Suppress).is_empty());
    }

    #[test]
    fn log_policy_records_empty_transitions() {
        assert_eq!(
            logged(&["a", "", "", "a"], EmptyPolicy::Log),
            vec!["a", "", "a"]
        );
    }

    #[test]
    fn suppressed_empty_still_advances_state() {
        let state = AgentState::new("log").accept("a");
        let (state, effect) = step(
            state,
            Ok(ClipboardSample::new("", at(0))),
            EmptyPolicy::Suppress,
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(state.last_accepted_content(), "");
    }

    #[test]
    fn read_failure_keeps_state() {
        let state = AgentState::new("log").accept("keep");
        let (state, effect) = step(state, Err(ClipboardError::Locked), EmptyPolicy::Suppress);
        assert_eq!(effect, Effect::ReportReadFailure(ClipboardError::Locked));
        assert_eq!(state.last_accepted_content(), "keep");
    }
}
