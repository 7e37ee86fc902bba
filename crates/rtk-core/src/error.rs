use thiserror::Error;

/// Reasons a solid is refused by prep before any ray is shot at it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepError {
    #[error("zero length height vector H (|H| = {0})")]
    ZeroLengthAxis(f64),

    #[error("degenerate cross-section: {0}")]
    DegenerateCrossSection(String),

    #[error("{first} not perpendicular to {second}, cos = {cos}")]
    NotPerpendicular {
        first: &'static str,
        second: &'static str,
        cos: f64,
    },

    #[error("{first} not parallel to {second}, 1 - cos = {deviation}")]
    NotParallel {
        first: &'static str,
        second: &'static str,
        deviation: f64,
    },

    #[error("H lies in the A-B plane")]
    AxisInCrossSection,

    #[error("too general for the fast path: {0}")]
    TooGeneral(String),
}

#[derive(Debug, Error)]
pub enum RtkError {
    #[error("Prep rejected: {0}")]
    Prep(#[from] PrepError),

    #[error("Hit count {count} not in {{0, 2}}, candidate distances {distances:?}")]
    HitCount { count: usize, distances: Vec<f64> },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Tolerance violation: {0}")]
    Tolerance(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, RtkError>;
