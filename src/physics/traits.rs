//! Rate function traits
//!
//! This module defines the core API between the thermal background and the
//! transport solver:
//! - `RateFunctions`: entropy density, expansion rate, equilibrium density
//!   and production rate as functions of temperature
//! - `TEMPERATURE_FLOOR`: the clamp applied before any evaluation

use std::f64::consts::PI;

/// Smallest temperature any rate function is evaluated at.
///
/// `T = m / x` is clamped to this value so that late-time evaluations never
/// divide by zero.
pub const TEMPERATURE_FLOOR: f64 = 1e-300;

// =================================================================================================
// Rate Functions Trait
// =================================================================================================

/// Thermodynamic background and production rate of a freeze-in scenario
///
/// Every method is a pure function of its arguments. Implementations must
/// never return NaN or infinity: values that would be non-finite are
/// reported as zero.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that a solver can share them
/// with per-cell kernels when the `parallel` feature is enabled.
///
/// # Example
///
/// ```rust
/// use freezein_rs::physics::{RateFunctions, StandardCosmology};
///
/// let rates = StandardCosmology::default();
/// let rhs = rates.reduced_rhs(0.3, 10.0);
/// assert!(rhs.is_finite() && rhs > 0.0);
/// ```
pub trait RateFunctions: Send + Sync {
    /// Entropy density s(T)
    fn entropy_density(&self, temperature: f64) -> f64;

    /// Hubble expansion rate H(T)
    fn expansion_rate(&self, temperature: f64) -> f64;

    /// Equilibrium number density of a species of `mass` with `dof`
    /// internal degrees of freedom
    fn equilibrium_number_density(&self, mass: f64, temperature: f64, dof: f64) -> f64;

    /// Volumetric production rate C(T) feeding the relic species
    fn production_rate(&self, temperature: f64) -> f64;

    /// Momentum at which produced particles are injected
    ///
    /// For a two-body decay of a heavy mediator into light daughters this is
    /// half the mediator mass.
    fn injection_momentum(&self) -> f64;

    /// Short identifier used in logs and result metadata
    fn name(&self) -> &str;

    /// Right-hand side of the reduced yield equation
    ///
    /// ```text
    /// dY/dx = C(T) / (s(T) · H(T) · x),    T = max(m / x, 1e-300)
    /// ```
    fn reduced_rhs(&self, x: f64, mass: f64) -> f64 {
        let temperature = (mass / x).max(TEMPERATURE_FLOOR);
        let rate = self.production_rate(temperature)
            / (self.entropy_density(temperature) * self.expansion_rate(temperature) * x);

        finite_or_zero(rate)
    }

    /// Conversion factor from the `p²`-moment of a distribution to a yield
    ///
    /// ```text
    /// Y = g / (2π² s(T)) · ∫ p² f dp
    /// ```
    fn moment_to_yield(&self, temperature: f64, dof: f64) -> f64 {
        let temperature = temperature.max(TEMPERATURE_FLOOR);
        finite_or_zero(dof / (2.0 * PI * PI * self.entropy_density(temperature)))
    }
}

/// Replace NaN and infinities by zero.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

// =================================================================================================
// Tests
// =================================================================================================
