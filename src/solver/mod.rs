//! Finite-volume march in momentum space
//!
//! This module provides the numerics of the freeze-in solver: grids, face
//! reconstruction, explicit integrators, snapshot bookkeeping and the march
//! that ties them together.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Transport model (right-hand side and yield diagnostics)
//!    - Time marks and switch coordinate
//!    - Snapshot requests
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Grid bounds and resolutions
//!    - Reconstruction scheme, integrator, transport form
//!
//! 3. **Solver** (`PdeSolver`) - The march
//!    - Analytic pre-integration up to the switch
//!    - One `Integrator` step per pair of time marks
//!    - Returns the `SimulationResult`
//!
//! # Module Organization
//!
//! - **`grid`**: `MomentumGrid`, `TimeGrid` and their builders
//! - **`quadrature`**: trapezoidal rule and `p²`-moments
//! - **`reconstruction`**: first-order and MUSCL (minmod) upwind faces
//! - **`traits`**: `TransportModel`, `Integrator`, configuration and result
//! - **`methods`**: `EulerIntegrator`, `Rk2Integrator`
//! - **`snapshot`**: sorted worklist of snapshot requests
//! - **`scenario`**: `Scenario`
//! - **`pde`**: `PdeSolver`, `pre_integrate`, `march_pde`
//! - **`error`**: `SolverError`
//!
//! # Quick Start Example
//!
//! ```rust
//! use freezein_rs::solver::{march_pde, SolverConfiguration, TimeIntegrator};
//!
//! let config = SolverConfiguration::default()
//!     .momentum_grid(1e-6, 1e3, 100)
//!     .time_grid(1e-3, 1e3, 500)
//!     .integrator(TimeIntegrator::Euler);
//!
//! let result = march_pde(&config)?;
//! println!("Y_final = {:e}", result.final_yield);
//! # Ok::<(), freezein_rs::solver::SolverError>(())
//! ```
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────────┐   ┌────────────────────┐
//! │ Rate functions   │   │ SolverConfiguration│
//! └────────┬─────────┘   └─────────┬──────────┘
//!          │                       │
//!          └──────────┬────────────┘
//!                     │
//!            ┌────────▼────────┐
//!            │ Scenario        │ ← grids + transport model
//!            └────────┬────────┘
//!                     │
//!            ┌────────▼────────┐
//!            │ PdeSolver       │ ← pre-integration + march
//!            │ (Euler, Heun)   │
//!            └────────┬────────┘
//!                     │
//!            ┌────────▼────────────┐
//!            │ SimulationResult    │ ← histories + snapshots
//!            └─────────────────────┘
//! ```
//!
//! # Step Size
//!
//! The march is explicit. The drift CFL number on a logarithmic grid is
//!
//! ```text
//! |v| Δx / Δp = (Δx / x) / (Δp / p)
//! ```
//!
//! i.e. the ratio of the relative time step to the relative cell width. Keep
//! it below one; the default grids give about 0.13.
//!
//! # Error Handling
//!
//! Fallible operations return `Result<T, SolverError>`:
//! - Invalid grid bounds or counts
//! - Invalid physical parameters or switch coordinate
//! - Unknown selector strings
//! - Numerical instability (NaN/Inf in the field)

// =================================================================================================
// Module Declarations
// =================================================================================================

mod error;
mod traits;
mod scenario;
mod methods;

pub mod grid;
pub mod quadrature;
pub mod reconstruction;
pub mod snapshot;
pub mod pde;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Per-cell kernels are elementwise maps, so sequential and parallel runs give
// bit-identical fields. The threshold only decides when Rayon's dispatch cost
// is worth paying. Relaxed ordering is enough: the value is a performance
// hint, not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::DVector;

/// Default number of cells above which per-cell kernels run on Rayon.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// Only consulted when the crate is compiled with the `parallel` feature.
///
/// ```rust
/// use freezein_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// Evaluate `kernel` on every cell index `0..cells`
///
/// Runs on Rayon above the threshold when the `parallel` feature is on.
pub(crate) fn map_cells<F>(cells: usize, kernel: F) -> DVector<f64>
where
    F: Fn(usize) -> f64 + Send + Sync,
{
    #[cfg(feature = "parallel")]
    if cells > parallel_threshold() {
        use rayon::prelude::*;

        let values: Vec<f64> = (0..cells).into_par_iter().map(&kernel).collect();
        return DVector::from_vec(values);
    }

    DVector::from_fn(cells, |i, _| kernel(i))
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use error::SolverError;

pub use traits::{
    FieldRate,
    Integrator,
    SimulationResult,
    SolverConfiguration,
    StepOutcome,
    TimeIntegrator,
    TransportModel,
};

pub use grid::{GridSpacing, MomentumGrid, TimeGrid, build_momentum_grid, build_time_grid};
pub use reconstruction::{
    ReconstructionScheme,
    limited_slopes,
    minmod,
    reconstruct_first_order,
    reconstruct_muscl,
};
pub use snapshot::{Snapshot, SnapshotSchedule};
pub use scenario::Scenario;
pub use methods::{EulerIntegrator, Rk2Integrator};
pub use pde::{PdeSolver, march_pde, march_pde_with_rates, pre_integrate};

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Check the field for NaN or infinite values
///
/// # Arguments
///
/// * `field` - Field after the step
/// * `step` - Index of the step that produced it
/// * `x` - Coordinate the step reached
pub(crate) fn validate_field(field: &DVector<f64>, step: usize, x: f64) -> Result<(), SolverError> {
    if field.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(SolverError::NumericalInstability { step, x })
    }
}

// =================================================================================================
// Tests
// =================================================================================================
