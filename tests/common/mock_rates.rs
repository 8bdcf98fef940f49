//! Mock rate functions for testing
//!
//! These backgrounds have closed-form reduced yields, which makes them
//! ideal for measuring the integrators' order of accuracy.

use freezein_rs::physics::RateFunctions;

// =================================================================================================
// Radiation-like scaling: dY/dx = c / x
// =================================================================================================

/// Power-law background with `s = T³`, `H = T²`, `C = c · T⁵`
///
/// The reduced equation becomes `dY/dx = c / x` for any mass, with exact
/// solution `Y(x) = c · ln(x / x₀)`. Entropy scales like a real radiation
/// bath, so a Liouville-form march keeps the field-integrated yield equal to
/// the source-only yield up to discretization error.
pub struct ScalingRates {
    pub c: f64,
    pub injection_momentum: f64,
}

impl ScalingRates {
    pub fn new(c: f64) -> Self {
        Self { c, injection_momentum: 1.0 }
    }

    /// Exact reduced yield accumulated from `x_start` to `x_end`
    pub fn analytical_yield(&self, x_start: f64, x_end: f64) -> f64 {
        self.c * (x_end / x_start).ln()
    }
}

impl RateFunctions for ScalingRates {
    fn entropy_density(&self, temperature: f64) -> f64 {
        temperature.powi(3)
    }

    fn expansion_rate(&self, temperature: f64) -> f64 {
        temperature.powi(2)
    }

    fn equilibrium_number_density(&self, _mass: f64, _temperature: f64, _dof: f64) -> f64 {
        0.0
    }

    fn production_rate(&self, temperature: f64) -> f64 {
        self.c * temperature.powi(5)
    }

    fn injection_momentum(&self) -> f64 {
        self.injection_momentum
    }

    fn name(&self) -> &str {
        "Scaling"
    }
}
