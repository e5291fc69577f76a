use std::thread;
use std::time::{Duration, Instant};

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Source of tick events for the capture loop.
///
/// `wait` blocks until the next tick is due and reports whether the loop
/// should keep going. Production code uses [`IntervalTicker`], which never
/// quits; tests drive the loop with [`CountdownTicker`].
pub trait Ticker {
    fn wait(&mut self) -> ControlFlow;
}

impl<T: Ticker + ?Sized> Ticker for &mut T {
    fn wait(&mut self) -> ControlFlow {
        (**self).wait()
    }
}

/// Fixed-period ticker backed by `thread::sleep`.
///
/// The first tick fires immediately. If a cycle overruns the period the next
/// tick fires at once and the schedule restarts from there; missed ticks are
/// dropped rather than replayed.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    next_due: Option<Instant>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Ticker for IntervalTicker {
    fn wait(&mut self) -> ControlFlow {
        let now = Instant::now();
        let fired_at = match self.next_due {
            Some(due) if due > now => {
                thread::sleep(due - now);
                due
            }
            _ => now,
        };
        self.next_due = Some(fired_at + self.period);
        ControlFlow::Continue
    }
}

/// Fires a fixed number of ticks without waiting, then quits.
#[derive(Debug, Clone, Copy)]
pub struct CountdownTicker {
    remaining: usize,
}

impl CountdownTicker {
    pub fn new(ticks: usize) -> Self {
        Self { remaining: ticks }
    }
}

impl Ticker for CountdownTicker {
    fn wait(&mut self) -> ControlFlow {
        if self.remaining == 0 {
            return ControlFlow::Quit;
        }
        self.remaining -= 1;
        ControlFlow::Continue
    }
}

/// Runs `cycle` once per tick, threading `state` through every call.
///
/// Cycles never overlap: the next wait starts only after `cycle` returns.
/// Returns the final state once the ticker quits.
pub fn run<T, S, F>(mut ticker: T, mut state: S, mut cycle: F) -> S
where
    T: Ticker,
    F: FnMut(S) -> S,
{
    while let ControlFlow::Continue = ticker.wait() {
        state = cycle(state);
    }
    state
}
