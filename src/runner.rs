use std::path::Path;

use chrono::{DateTime, FixedOffset, Local};
use tracing::{debug, info, warn};

use crate::clipboard::{ClipboardError, ClipboardSource};
use crate::config::AgentConfig;
use crate::detector::{ChangeDetector, ClipboardSample, Effect};
use crate::entry::LogEntry;
use crate::event_loop::{self, Ticker};
use crate::logger;
use crate::reporter::ErrorReporter;
use crate::state::AgentState;
use crate::visibility::VisibilityBackend;

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Unchanged,
    ReadFailed(ClipboardError),
    Logged(LogEntry),
    /// The entry was accepted but could not be written.
    WriteFailed(LogEntry),
}

/// The capture agent: one clipboard source, one log, one error channel.
///
/// The agent itself holds no capture state. [`AgentState`] is passed into
/// every [`cycle`](Self::cycle) and returned from it.
pub struct Agent<S, V, R, C = SystemClock> {
    source: S,
    visibility: V,
    reporter: R,
    clock: C,
    detector: ChangeDetector,
    last_timestamp: Option<DateTime<FixedOffset>>,
    /// Read failure already reported; repeats are only logged at debug level.
    last_read_failure: Option<ClipboardError>,
}

impl<S, V, R> Agent<S, V, R, SystemClock>
where
    S: ClipboardSource,
    V: VisibilityBackend,
    R: ErrorReporter,
{
    pub fn new(config: &AgentConfig, source: S, visibility: V, reporter: R) -> Self {
        Self {
            source,
            visibility,
            reporter,
            clock: SystemClock,
            detector: ChangeDetector::new(config.empty_policy),
            last_timestamp: None,
            last_read_failure: None,
        }
    }
}

impl<S, V, R, C> Agent<S, V, R, C>
where
    S: ClipboardSource,
    V: VisibilityBackend,
    R: ErrorReporter,
    C: Clock,
{
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Agent<S, V, R, C2> {
        Agent {
            source: self.source,
            visibility: self.visibility,
            reporter: self.reporter,
            clock,
            detector: self.detector,
            last_timestamp: self.last_timestamp,
            last_read_failure: self.last_read_failure,
        }
    }

    /// Samples the clipboard once and logs the value if it changed.
    ///
    /// Never fails: read and write errors go to the error reporter and the
    /// returned state is always usable for the next cycle. A read failure
    /// identical to the previous tick's is not reported again until a read
    /// succeeds or the failure changes.
    pub fn cycle(&mut self, state: AgentState) -> (AgentState, CycleOutcome) {
        let read = self
            .source
            .read()
            .map(|content| ClipboardSample::new(content, self.clock.now()));
        let (state, effect) = self.detector.evaluate(state, read);
        if !matches!(effect, Effect::ReportReadFailure(_)) {
            self.last_read_failure = None;
        }

        let outcome = match effect {
            Effect::None => {
                debug!("clipboard unchanged");
                CycleOutcome::Unchanged
            }
            Effect::ReportReadFailure(err) => {
                if self.last_read_failure.as_ref() == Some(&err) {
                    debug!("clipboard read still failing: {err}");
                } else {
                    self.reporter.report("clipboard read failed", &err);
                    self.last_read_failure = Some(err.clone());
                }
                CycleOutcome::ReadFailed(err)
            }
            Effect::Log(sample) => self.write(state.log_path(), sample),
        };
        (state, outcome)
    }

    /// Runs cycles until `ticker` quits and returns the final state.
    pub fn run<T: Ticker>(&mut self, ticker: T, state: AgentState) -> AgentState {
        event_loop::run(ticker, state, |state| self.cycle(state).0)
    }

    /// Hides the log file if it already exists. Called once at startup.
    pub fn hide_existing_log(&self, state: &AgentState) {
        if state.log_path().exists() {
            self.hide(state.log_path());
        }
    }

    fn write(&mut self, path: &Path, sample: ClipboardSample) -> CycleOutcome {
        let timestamp = self.monotonic(sample.captured_at);
        let entry = LogEntry::new(timestamp, sample.content);
        info!("[{}]: {:?}", entry.timestamp, entry.display());

        if let Err(err) = logger::append(path, &entry) {
            self.reporter.report(
                &format!("failed to append to {}", path.display()),
                &err,
            );
            return CycleOutcome::WriteFailed(entry);
        }
        self.hide(path);
        CycleOutcome::Logged(entry)
    }

    fn hide(&self, path: &Path) {
        if let Err(err) = self.visibility.hide(path) {
            warn!("could not hide {}: {err}", path.display());
        }
    }

    /// Clamps `at` so entry timestamps never go backwards, even when the
    /// wall clock is stepped back between two writes.
    fn monotonic(&mut self, at: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let at = match self.last_timestamp {
            Some(last) if last > at => last,
            _ => at,
        };
        self.last_timestamp = Some(at);
        at
    }
}
