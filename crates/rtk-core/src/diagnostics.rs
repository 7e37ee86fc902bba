//! Diagnostics sink.
//!
//! Recoverable conditions (depth exhaustion, degenerate intercepts) and hard
//! failures are reported here instead of through process-wide flags. The sink
//! is shared by reference across worker threads, so implementations must be
//! `Send + Sync`.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagLevel {
    Trace,
    Debug,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagEvent {
    /// Subdivision hit its depth bound and fell back to an approximation.
    DepthExhausted { stage: &'static str, depth: usize },
    /// A line/ray intercept had a near-zero denominator and was dropped.
    DegenerateIntercept { stage: &'static str },
    /// A closed convex solid produced an impossible number of crossings.
    HitCount { solid: &'static str, distances: Vec<f64> },
    /// Prep refused a solid.
    PrepRejected { solid: &'static str, reason: String },
}

impl DiagEvent {
    pub fn level(&self) -> DiagLevel {
        match self {
            DiagEvent::DepthExhausted { .. } => DiagLevel::Debug,
            DiagEvent::DegenerateIntercept { .. } => DiagLevel::Trace,
            DiagEvent::HitCount { .. } => DiagLevel::Error,
            DiagEvent::PrepRejected { .. } => DiagLevel::Warn,
        }
    }
}

impl fmt::Display for DiagEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagEvent::DepthExhausted { stage, depth } => {
                write!(f, "{stage}: depth bound {depth} reached, using approximation")
            }
            DiagEvent::DegenerateIntercept { stage } => {
                write!(f, "{stage}: near-zero intercept denominator, no contribution")
            }
            DiagEvent::HitCount { solid, distances } => {
                write!(f, "{solid}: {} hits {distances:?}", distances.len())
            }
            DiagEvent::PrepRejected { solid, reason } => write!(f, "{solid}: {reason}"),
        }
    }
}

pub trait Diagnostics: Send + Sync {
    fn record(&self, event: &DiagEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Diagnostics for Silent {
    fn record(&self, _event: &DiagEvent) {}
}

/// Writes events at or above `min_level` to stderr.
#[derive(Debug, Clone, Copy)]
pub struct StderrDiagnostics {
    pub min_level: DiagLevel,
}

impl StderrDiagnostics {
    pub fn new(min_level: DiagLevel) -> Self {
        Self { min_level }
    }

    pub fn accepts(&self, event: &DiagEvent) -> bool {
        event.level() >= self.min_level
    }
}

impl Default for StderrDiagnostics {
    fn default() -> Self {
        Self::new(DiagLevel::Warn)
    }
}

impl Diagnostics for StderrDiagnostics {
    fn record(&self, event: &DiagEvent) {
        if self.accepts(event) {
            eprintln!("[{:?}] {event}", event.level());
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectDiagnostics {
    events: Mutex<Vec<DiagEvent>>,
}

impl CollectDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<DiagEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count_where(&self, pred: impl Fn(&DiagEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Diagnostics for CollectDiagnostics {
    fn record(&self, event: &DiagEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
