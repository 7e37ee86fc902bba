//! rtk core: tolerances, errors, and the diagnostics sink threaded through
//! every query.

pub mod context;
pub mod diagnostics;
pub mod error;
pub mod tolerance;
pub mod traits;

pub use context::{QueryContext, MAX_DEPTH};
pub use diagnostics::{CollectDiagnostics, DiagEvent, DiagLevel, Diagnostics, Silent, StderrDiagnostics};
pub use error::{PrepError, Result, RtkError};
pub use tolerance::Tolerance;
