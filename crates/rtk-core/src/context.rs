use std::fmt;

use crate::diagnostics::{DiagEvent, Diagnostics, Silent};
use crate::tolerance::Tolerance;

/// Default bound on Bézier and trim-curve subdivision depth.
pub const MAX_DEPTH: usize = 64;

static SILENT: Silent = Silent;

/// Per-call configuration: tolerance, diagnostics sink and subdivision bound.
///
/// Cheap to copy; every field is a shared reference or a scalar, so one
/// context can be handed to any number of worker threads.
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub tol: &'a Tolerance,
    pub diagnostics: &'a dyn Diagnostics,
    pub max_depth: usize,
}

impl<'a> QueryContext<'a> {
    pub fn new(tol: &'a Tolerance) -> Self {
        Self {
            tol,
            diagnostics: &SILENT,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: &'a dyn Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn record(&self, event: DiagEvent) {
        self.diagnostics.record(&event);
    }
}

impl fmt::Debug for QueryContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("tol", self.tol)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
