//! Transport models for freeze-in production
//!
//! All models implement the [`TransportModel`](crate::solver::TransportModel)
//! trait. The solver calls `evaluate` once per integrator stage. Models are
//! responsible for the physics (redshift drift, injection), the solver for
//! the time integration.
//!
//! # Available Models
//!
//! ## [`FreezeInTransport`]
//!
//! The momentum-space distribution of a relic produced by decays of a heavy
//! mediator. Momenta redshift as `p ∝ 1/x`; new particles enter through a
//! narrow spectral source. Face values come from first-order upwind or
//! MUSCL reconstruction, and the operator can be written in
//! [`TransportForm::Conservative`] or [`TransportForm::Liouville`] form.
//!
//! # Injection
//!
//! [`SpectralInjection`] builds the source `S(p, x)` so that its
//! `p²`-moment reproduces the reduced yield equation exactly at every `x`.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod injection;
pub mod freeze_in;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use injection::{SourceTerm, SpectralInjection};
pub use freeze_in::{FreezeInTransport, TransportForm};
