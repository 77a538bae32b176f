//! Protocol errors for the time integrators.

use thiserror::Error;

/// Misuse of an integrator's call protocol.
///
/// These signal a programming error in the caller, not a transient
/// condition. The offending call returns before touching the solution and
/// nothing is retried; the solver should be discarded or [`reset`] before
/// further use.
///
/// [`reset`]: crate::time::RkTvd::reset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolViolation {
    /// Runge-Kutta order outside {1, 2, 3}.
    #[error("Invalid RK-TVD order: {0} (supported: 1, 2, 3)")]
    InvalidOrder(usize),

    /// Solution length differs from the one the solver was initialized with.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Step size that can never reach the output time.
    #[error("Invalid step size: {0} (must be finite, > 0 and resolvable at the current time)")]
    InvalidStepSize(f64),

    /// Seeded history with the wrong number of slots.
    #[error("History depth mismatch for {kind}: expected {expected} slots, got {actual}")]
    HistoryDepth {
        kind: HistoryKind,
        expected: usize,
        actual: usize,
    },

    /// Seeded history slot whose length differs from the solution.
    #[error("History slot {slot} has length {actual}, expected {expected}")]
    HistoryLength {
        slot: usize,
        expected: usize,
        actual: usize,
    },
}

/// Which history buffer a [`ProtocolViolation::HistoryDepth`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryKind {
    /// Past solution values.
    Solution,
    /// Past time derivatives.
    Derivative,
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryKind::Solution => write!(f, "u"),
            HistoryKind::Derivative => write!(f, "du/dt"),
        }
    }
}

impl ProtocolViolation {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}
