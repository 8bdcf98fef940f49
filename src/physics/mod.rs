//! Thermal background and production rates
//!
//! The transport solver never hard-codes the cosmology. It queries the
//! [`RateFunctions`] trait for:
//!
//! - the entropy density `s(T)`, which converts number densities to yields,
//! - the expansion rate `H(T)`, which converts time to the coordinate
//!   `x = m / T`,
//! - the production rate `C(T)` feeding the relic species,
//! - the injection momentum of the produced particles.
//!
//! # Architecture
//!
//! Rate functions are **separate from numerical solvers**:
//! - The rate functions provide the **physics** (background and sources)
//! - The solver provides the **method** (grids, fluxes, time stepping)
//!
//! [`StandardCosmology`] implements a radiation-dominated universe with a
//! mediator decaying into the relic. Its constants live in
//! [`CosmologyParameters`], never in globals.
//!
//! # Example
//!
//! ```rust
//! use freezein_rs::physics::{RateFunctions, StandardCosmology};
//!
//! let rates = StandardCosmology::default();
//! let temperature = 10.0 / 0.5;    // m / x
//! assert!(rates.entropy_density(temperature) > 0.0);
//! assert!(rates.production_rate(temperature) > 0.0);
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod traits;
pub mod cosmology;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{RateFunctions, TEMPERATURE_FLOOR, finite_or_zero};
pub use cosmology::{CosmologyParameters, StandardCosmology};
