//! Spectral injection of freshly produced particles
//!
//! Defines WHERE in momentum the production rate deposits new particles and
//! how much it deposits per unit `x`.
//!
//! # Normalization
//!
//! The number density of the relic is `n = g / (2π²) · ∫ p² f dp`. For the
//! injected source `S(p, x)` to reproduce the reduced yield equation,
//!
//! ```text
//! g / (2π²) · ∫ p² S dp = C(T) / (H(T) · x)
//! ```
//!
//! so a unit-area profile `φ(p)` is rescaled by its own (trapezoidal)
//! `p²`-moment:
//!
//! ```text
//! S(p, x) = (2π² / g) · C / (H · x) · φ(p) / (∫ p² φ dp + 1e-300)
//! ```
//!
//! # Profile
//!
//! A narrow Gaussian centred on the injection momentum `p*` reported by the
//! rate functions, with standard deviation `max(width_fraction · p*, 1e-30)`.
//!
//! # Example
//!
//! ```rust
//! use freezein_rs::models::SpectralInjection;
//! use freezein_rs::physics::StandardCosmology;
//! use freezein_rs::solver::build_momentum_grid;
//!
//! let grid = build_momentum_grid(1e-6, 1e3, 600, true)?;
//! let rates = StandardCosmology::default();
//! let injection = SpectralInjection::new(0.02);
//!
//! let source = injection.build(0.3, &grid, &rates, 10.0, 2.0);
//! assert_eq!(source.center, 50.0);
//! assert!(source.values.iter().all(|s| s.is_finite() && *s >= 0.0));
//! # Ok::<(), freezein_rs::solver::SolverError>(())
//! ```

use std::f64::consts::PI;

use nalgebra::DVector;

use crate::physics::{RateFunctions, TEMPERATURE_FLOOR, finite_or_zero};
use crate::solver::quadrature::momentum_moment;
use crate::solver::{MomentumGrid, map_cells};

/// Lower bound on the profile width
pub const WIDTH_FLOOR: f64 = 1e-30;

/// Added to the profile moment before dividing by it
pub const NORMALIZATION_FLOOR: f64 = 1e-300;

// =================================================================================================
// Source Term
// =================================================================================================

/// Source evaluated at one coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTerm {
    /// `S(p_i, x)` at every cell center
    pub values: DVector<f64>,

    /// Injection momentum `p*`
    pub center: f64,

    /// Entropy density `s(T)` at the evaluation temperature
    pub entropy: f64,
}

impl SourceTerm {
    /// Yield production rate carried by this source alone
    ///
    /// ```text
    /// dY_src/dx = g / (2π² s) · ∫ p² S dp
    /// ```
    pub fn yield_rate(&self, momenta: &DVector<f64>, dof: f64) -> f64 {
        let moment = momentum_moment(self.values.as_slice(), momenta.as_slice());
        finite_or_zero(dof / (2.0 * PI * PI * self.entropy) * moment)
    }
}

// =================================================================================================
// Spectral Injection
// =================================================================================================

/// Builder of the normalized injection source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralInjection {
    width_fraction: f64,
}

impl SpectralInjection {
    /// Create an injection whose width is `width_fraction · p*`
    ///
    /// # Panics
    ///
    /// Panics if `width_fraction` is negative or not finite.
    pub fn new(width_fraction: f64) -> Self {
        assert!(
            width_fraction.is_finite() && width_fraction >= 0.0,
            "Injection width fraction must be finite and non-negative, got {}",
            width_fraction
        );
        Self { width_fraction }
    }

    #[inline]
    pub fn width_fraction(&self) -> f64 {
        self.width_fraction
    }

    /// Standard deviation of the profile around `center`
    #[inline]
    pub fn width(&self, center: f64) -> f64 {
        (self.width_fraction * center).max(WIDTH_FLOOR)
    }

    /// Unit-area Gaussian sampled at `momenta`
    pub fn profile(&self, momenta: &DVector<f64>, center: f64) -> DVector<f64> {
        let sigma = self.width(center);
        let amplitude = 1.0 / (sigma * (2.0 * PI).sqrt());

        map_cells(momenta.len(), |i| {
            let z = (momenta[i] - center) / sigma;
            finite_or_zero(amplitude * (-0.5 * z * z).exp())
        })
    }

    /// Source at coordinate `x` for a relic of `mass` with `dof` degrees
    /// of freedom
    pub fn build(
        &self,
        x: f64,
        grid: &MomentumGrid,
        rates: &dyn RateFunctions,
        mass: f64,
        dof: f64,
    ) -> SourceTerm {

        // ====== Step 1: Background ======

        let temperature = (mass / x).max(TEMPERATURE_FLOOR);
        let entropy = finite_or_zero(rates.entropy_density(temperature));
        let hubble = finite_or_zero(rates.expansion_rate(temperature));
        let production = finite_or_zero(rates.production_rate(temperature));

        // ====== Step 2: Normalized profile ======

        let center = rates.injection_momentum();
        let profile = self.profile(grid.centers(), center);
        let moment = momentum_moment(profile.as_slice(), grid.centers().as_slice());

        // ====== Step 3: Scale to the production rate ======

        let scale = finite_or_zero(
            2.0 * PI * PI / dof * production / (hubble * x) / (moment + NORMALIZATION_FLOOR),
        );

        SourceTerm {
            values: profile * scale,
            center,
            entropy,
        }
    }
}

impl Default for SpectralInjection {
    fn default() -> Self {
        Self::new(0.02)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::StandardCosmology;
    use crate::solver::build_momentum_grid;
    use approx::assert_relative_eq;

    #[test]
    fn test_profile_peaks_at_center() {
        let momenta = DVector::from_vec(vec![40.0, 49.0, 50.0, 51.0, 60.0]);
        let profile = SpectralInjection::new(0.02).profile(&momenta, 50.0);
        let peak = profile.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(profile[2], peak);
        assert_relative_eq!(profile[1], profile[3], max_relative = 1e-12);
    }

    #[test]
    fn test_profile_has_unit_area() {
        let momenta = DVector::from_fn(4001, |i, _| 40.0 + 0.005 * i as f64);
        let profile = SpectralInjection::new(0.02).profile(&momenta, 50.0);
        let area: f64 = profile.as_slice().windows(2).map(|w| 0.5 * (w[0] + w[1]) * 0.005).sum();
        assert_relative_eq!(area, 1.0, max_relative = 1e-6);
    }

    #[test]
    fn test_source_moment_matches_reduced_rate() {
        let grid = build_momentum_grid(1e-6, 1e3, 600, true).unwrap();
        let rates = StandardCosmology::default();
        let (mass, dof, x) = (10.0, 2.0, 0.3);

        let source = SpectralInjection::new(0.02).build(x, &grid, &rates, mass, dof);

        assert_relative_eq!(
            source.yield_rate(grid.centers(), dof),
            rates.reduced_rhs(x, mass),
            max_relative = 1e-10
        );
        assert_relative_eq!(source.entropy, rates.entropy_density(mass / x), max_relative = 1e-14);
    }

    #[test]
    fn test_zero_width_stays_finite() {
        let grid = build_momentum_grid(1e-6, 1e3, 50, true).unwrap();
        let rates = StandardCosmology::default();

        let source = SpectralInjection::new(0.0).build(0.3, &grid, &rates, 10.0, 2.0);

        assert!(source.values.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_no_production_gives_zero_source() {
        let grid = build_momentum_grid(1e-6, 1e3, 100, true).unwrap();
        let rates = StandardCosmology::default();

        // T = 1e-2: the mediator is Boltzmann suppressed to exactly zero
        let source = SpectralInjection::new(0.02).build(1e3, &grid, &rates, 10.0, 2.0);

        assert!(source.values.iter().all(|&s| s == 0.0));
        assert_eq!(source.yield_rate(grid.centers(), 2.0), 0.0);
    }

    #[test]
    #[should_panic(expected = "Injection width fraction")]
    fn test_negative_width_panics() {
        SpectralInjection::new(-0.1);
    }
}
