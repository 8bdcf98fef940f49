//! freezein-rs: Momentum-space freeze-in solver
//!
//! Tracks the momentum distribution `f(p, x)` of a relic produced out of
//! equilibrium by decays of a heavy mediator, with `x = m / T` as the time
//! coordinate. Momenta redshift as `p ∝ 1/x`, so the kinetic equation is an
//! advection in momentum space with a narrow spectral source:
//!
//! ```text
//! ∂f/∂x = -∂(v f)/∂p + S(p, x),    v(p, x) = -p / x
//! ```
//!
//! # Architecture
//!
//! freezein-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Rate functions and transport models define equations (what to solve)
//!    - Grids, reconstruction and integrators provide methods (how to solve)
//!
//! 2. **Two independent yield diagnostics**
//!    - The yield integrated from the field, `g/(2π² s) ∫ p² f dp`
//!    - The yield accumulated from the source alone
//!
//!    Their agreement measures the transport error of a run.
//!
//! # Quick Start
//!
//! ```rust
//! use freezein_rs::prelude::*;
//!
//! // 1. Configure the run (defaults: m = 10, muscl, rk2, x_switch = 1e-2)
//! let config = SolverConfiguration::default()
//!     .momentum_grid(1e-6, 1e3, 150)
//!     .time_grid(1e-3, 1e3, 800)
//!     .snapshots_at(vec![1e-1, 1.0]);
//!
//! // 2. March
//! let result = march_pde(&config)?;
//!
//! // 3. Compare with the reduced equation
//! let reference = solve_reference(&StandardCosmology::default(), config.mass, config.x_switch, config.x_max, 400)?;
//!
//! println!("Y_final = {:e}, Y_ref = {:e}", result.final_yield, reference.final_yield());
//! # Ok::<(), SolverError>(())
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Rate functions of the thermal background
//! - [`models`]: Source term and freeze-in transport model
//! - [`solver`]: Grids, reconstruction, integrators, the march
//! - [`reference`]: RK4 integration of the reduced yield equation
//! - [`output`]: CSV export

// Core modules
pub mod physics;

pub mod models;
pub mod solver;
pub mod reference;

pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use freezein_rs::prelude::*;
    //! ```
    pub use crate::physics::{RateFunctions, StandardCosmology, CosmologyParameters};
    pub use crate::models::{FreezeInTransport, SpectralInjection, TransportForm};
    pub use crate::solver::{
        march_pde,
        march_pde_with_rates,
        PdeSolver,
        ReconstructionScheme,
        Scenario,
        SimulationResult,
        SolverConfiguration,
        SolverError,
        TimeIntegrator,
    };
    pub use crate::reference::{solve_reference, ReferenceSolution};
}
