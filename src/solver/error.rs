//! Error types for grid construction, configuration and the march.

use std::fmt;

/// Errors surfaced by the solver.
///
/// Degenerate normalizations and non-finite rate values are handled where
/// they occur and never reach this type. Length mismatches between arrays
/// are programmer errors and panic instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Grid bounds or counts cannot produce a strictly increasing grid.
    InvalidGridSpec {
        /// What went wrong.
        reason: String,
    },
    /// A physical or numerical parameter is out of its valid range.
    InvalidConfiguration {
        /// What went wrong.
        reason: String,
    },
    /// A selector string does not name a known variant.
    UnknownSelector {
        /// Which selector was being parsed (e.g. "time integrator").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The field picked up NaN or infinite values during the march.
    NumericalInstability {
        /// Index of the step that produced the bad field.
        step: usize,
        /// Coordinate reached by that step.
        x: f64,
    },
}

impl SolverError {
    pub(crate) fn grid(reason: impl Into<String>) -> Self {
        Self::InvalidGridSpec { reason: reason.into() }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGridSpec { reason } => write!(f, "invalid grid specification: {reason}"),
            Self::InvalidConfiguration { reason } => write!(f, "invalid configuration: {reason}"),
            Self::UnknownSelector { kind, value } => {
                write!(f, "unknown {kind} '{value}'")
            }
            Self::NumericalInstability { step, x } => write!(
                f,
                "non-finite field at step {step} (x = {x:e}); try more time points"
            ),
        }
    }
}

impl std::error::Error for SolverError {}
