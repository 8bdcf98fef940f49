//! Radiation-dominated background with a decaying heavy mediator
//!
//! # Mathematical Background
//!
//! During radiation domination with `g*` relativistic degrees of freedom
//! (and `g*s` for entropy):
//!
//! ```text
//! s(T) = (2π² / 45) · g*s · T³
//! H(T) = sqrt(4π³ g* / 45) · T² / M_pl
//! ```
//!
//! A heavy mediator `A` of mass `m_A`, kept in equilibrium by the bath,
//! decays into a pair of relic particles with width `Γ_A`. In the
//! Maxwell–Boltzmann limit its equilibrium number density is
//!
//! ```text
//! n_eq(m, T, g) = g · (m T / 2π)^{3/2} · exp(-m / T)
//! ```
//!
//! and the relic production rate per unit volume is
//!
//! ```text
//! C(T) = 2 · n_eq(m_A, T, g_A) · Γ_A
//! ```
//!
//! the factor 2 counting the two daughters of each decay.
//!
//! # Example
//!
//! ```rust
//! use freezein_rs::physics::{CosmologyParameters, RateFunctions, StandardCosmology};
//!
//! let rates = StandardCosmology::new(CosmologyParameters {
//!     mediator_width: 1e-20,
//!     ..Default::default()
//! });
//! assert_eq!(rates.injection_momentum(), 50.0);
//! ```

use std::f64::consts::PI;

use crate::physics::traits::{RateFunctions, TEMPERATURE_FLOOR, finite_or_zero};

// =================================================================================================
// Parameters
// =================================================================================================

/// Physical constants of the background and the mediator
///
/// Immutable once handed to [`StandardCosmology`]. All masses and
/// temperatures share the same energy unit (GeV by default).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosmologyParameters {
    /// Reduced Planck mass
    pub planck_mass: f64,

    /// Mediator mass `m_A`
    pub mediator_mass: f64,

    /// Mediator decay width `Γ_A`
    pub mediator_width: f64,

    /// Mediator internal degrees of freedom `g_A`
    pub mediator_dof: f64,

    /// Relativistic degrees of freedom in energy `g*`
    pub g_star: f64,

    /// Relativistic degrees of freedom in entropy `g*s`
    pub g_star_s: f64,
}

impl Default for CosmologyParameters {
    fn default() -> Self {
        Self {
            planck_mass: 2.435e18,
            mediator_mass: 100.0,
            mediator_width: 1e-22,
            mediator_dof: 2.0,
            g_star: 100.0,
            g_star_s: 100.0,
        }
    }
}

impl CosmologyParameters {
    /// Check that every constant is finite and strictly positive
    pub fn validate(&self) -> Result<(), String> {
        let named = [
            ("planck_mass", self.planck_mass),
            ("mediator_mass", self.mediator_mass),
            ("mediator_width", self.mediator_width),
            ("mediator_dof", self.mediator_dof),
            ("g_star", self.g_star),
            ("g_star_s", self.g_star_s),
        ];

        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be finite and positive, got {value}"));
            }
        }

        Ok(())
    }
}

// =================================================================================================
// Standard Cosmology
// =================================================================================================

/// Rate functions of a radiation-dominated universe with a decaying mediator
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCosmology {
    parameters: CosmologyParameters,
}

impl StandardCosmology {
    /// Create the background from explicit constants
    ///
    /// # Panics
    ///
    /// Panics if any constant is non-finite or non-positive.
    pub fn new(parameters: CosmologyParameters) -> Self {
        if let Err(message) = parameters.validate() {
            panic!("Invalid cosmology parameters: {message}");
        }
        Self { parameters }
    }

    /// Constants this background was built with
    #[inline]
    pub fn parameters(&self) -> &CosmologyParameters {
        &self.parameters
    }
}

impl RateFunctions for StandardCosmology {
    fn entropy_density(&self, temperature: f64) -> f64 {
        let t = temperature.max(TEMPERATURE_FLOOR);
        finite_or_zero(2.0 * PI * PI / 45.0 * self.parameters.g_star_s * t.powi(3))
    }

    fn expansion_rate(&self, temperature: f64) -> f64 {
        let t = temperature.max(TEMPERATURE_FLOOR);
        let prefactor = (4.0 * PI.powi(3) * self.parameters.g_star / 45.0).sqrt();
        finite_or_zero(prefactor * t * t / self.parameters.planck_mass)
    }

    fn equilibrium_number_density(&self, mass: f64, temperature: f64, dof: f64) -> f64 {
        let t = temperature.max(TEMPERATURE_FLOOR);
        let density = dof * (mass * t / (2.0 * PI)).powf(1.5) * (-mass / t).exp();
        finite_or_zero(density)
    }

    fn production_rate(&self, temperature: f64) -> f64 {
        let p = &self.parameters;
        let n_eq = self.equilibrium_number_density(p.mediator_mass, temperature, p.mediator_dof);
        finite_or_zero(2.0 * n_eq * p.mediator_width)
    }

    #[inline]
    fn injection_momentum(&self) -> f64 {
        0.5 * self.parameters.mediator_mass
    }

    fn name(&self) -> &str {
        "Standard radiation-dominated cosmology"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
