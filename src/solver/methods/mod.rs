//! Explicit steps for the momentum-space march
//!
//! This module contains the concrete implementations of the
//! [`Integrator`](crate::solver::Integrator) trait.
//!
//! # Available Methods
//!
//! - **[`EulerIntegrator`]**: Forward Euler
//!   - Order: first-order O(Δx)
//!   - Cost: 1 right-hand side evaluation per step
//!   - Source-only yield: left-point rule
//!
//! - **[`Rk2Integrator`]**: Heun's method
//!   - Order: second-order O(Δx²)
//!   - Cost: 2 right-hand side evaluations per step
//!   - Source-only yield: trapezoidal rule
//!
//! Both are stateless unit structs and can be reused for any number of runs.
//!
//! # Example
//!
//! ```rust
//! use freezein_rs::solver::{Integrator, TimeIntegrator};
//!
//! let integrator = TimeIntegrator::Rk2.integrator();
//! assert_eq!(integrator.order(), 2);
//! ```
//!
//! The march itself (pre-integration, snapshots, diagnostics) lives in
//! [`PdeSolver`](crate::solver::PdeSolver); an integrator only advances the
//! field and the source-only yield by one step.

pub mod euler;
pub mod rk2;

pub use euler::EulerIntegrator;
pub use rk2::Rk2Integrator;
