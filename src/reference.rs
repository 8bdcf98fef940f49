//! Reduced yield equation, integrated independently of the PDE march
//!
//! # Mathematical Background
//!
//! Integrating the Boltzmann equation over momentum gives one ODE for the
//! yield `Y = n / s`:
//!
//! ```text
//! dY/dx = C(T) / (s(T) · H(T) · x),    T = m / x,    Y(x_start) = 0
//! ```
//!
//! The right-hand side depends on `x` only. It is integrated in `u = ln x`
//! (`dY/du = x · dY/dx`) with fixed-step classical Runge-Kutta 4:
//!
//! ```text
//! k1 = g(u_n,          Y_n)
//! k2 = g(u_n + h/2,    Y_n + h/2 · k1)
//! k3 = g(u_n + h/2,    Y_n + h/2 · k2)
//! k4 = g(u_n + h,      Y_n + h · k3)
//! Y_{n+1} = Y_n + h/6 · (k1 + 2 k2 + 2 k3 + k4)
//! ```
//!
//! Each interval between two output points is split into
//! [`REFERENCE_SUBSTEPS`] RK4 steps, which puts the truncation error far
//! below any discretization error of the march.
//!
//! # Example
//!
//! ```rust
//! use freezein_rs::physics::StandardCosmology;
//! use freezein_rs::reference::solve_reference;
//!
//! let reference = solve_reference(&StandardCosmology::default(), 10.0, 1e-3, 1e3, 800)?;
//! assert_eq!(reference.x.len(), 800);
//! assert_eq!(reference.yield_values[0], 0.0);
//! assert!(reference.final_yield() > 0.0);
//! # Ok::<(), freezein_rs::solver::SolverError>(())
//! ```

use crate::physics::RateFunctions;
use crate::solver::{SolverError, build_time_grid};

/// RK4 steps per output interval
pub const REFERENCE_SUBSTEPS: usize = 64;

/// Dense yield curve of the reduced equation
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSolution {
    /// Output coordinates, geometric from `x_start` to `x_end`
    pub x: Vec<f64>,

    /// Yield at each output coordinate
    pub yield_values: Vec<f64>,
}

impl ReferenceSolution {
    /// Yield at `x_end`
    pub fn final_yield(&self) -> f64 {
        self.yield_values.last().copied().unwrap_or(0.0)
    }

    /// Yield at `x`, linear in `ln x` between output points
    ///
    /// Returns `None` outside `[x_start, x_end]`.
    pub fn yield_at(&self, x: f64) -> Option<f64> {
        let (first, last) = (*self.x.first()?, *self.x.last()?);
        if !(first..=last).contains(&x) {
            return None;
        }

        let k = self.x.partition_point(|&mark| mark < x);
        if k == 0 {
            return Some(self.yield_values[0]);
        }

        let (x0, x1) = (self.x[k - 1], self.x[k]);
        let (y0, y1) = (self.yield_values[k - 1], self.yield_values[k]);
        let t = (x / x0).ln() / (x1 / x0).ln();

        Some(y0 + t * (y1 - y0))
    }
}

/// Integrate the reduced equation for a relic of `mass`
///
/// # Errors
///
/// `InvalidGridSpec` unless `0 < x_start < x_end` and `points ≥ 2`.
pub fn solve_reference(
    rates: &dyn RateFunctions,
    mass: f64,
    x_start: f64,
    x_end: f64,
    points: usize,
) -> Result<ReferenceSolution, SolverError> {
    let marks = build_time_grid(x_start, x_end, points)?;

    // dY/du with u = ln x
    let rhs = |u: f64, _y: f64| {
        let x = u.exp();
        x * rates.reduced_rhs(x, mass)
    };

    let mut yield_values = Vec::with_capacity(points);
    let mut y = 0.0;
    yield_values.push(y);

    for pair in marks.marks().windows(2) {
        let (u0, u1) = (pair[0].ln(), pair[1].ln());
        let h = (u1 - u0) / REFERENCE_SUBSTEPS as f64;

        for n in 0..REFERENCE_SUBSTEPS {
            let u = u0 + h * n as f64;

            let k1 = rhs(u, y);
            let k2 = rhs(u + 0.5 * h, y + 0.5 * h * k1);
            let k3 = rhs(u + 0.5 * h, y + 0.5 * h * k2);
            let k4 = rhs(u + h, y + h * k3);

            y += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        }

        yield_values.push(y);
    }

    Ok(ReferenceSolution {
        x: marks.marks().to_vec(),
        yield_values,
    })
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// dY/dx = 1/x² for any mass
    struct InverseSquare;

    impl RateFunctions for InverseSquare {
        fn entropy_density(&self, _t: f64) -> f64 { 1.0 }
        fn expansion_rate(&self, _t: f64) -> f64 { 1.0 }
        fn equilibrium_number_density(&self, _m: f64, _t: f64, _g: f64) -> f64 { 0.0 }
        // C = T / m with m = 1 gives C / x = 1 / x²
        fn production_rate(&self, temperature: f64) -> f64 { temperature }
        fn injection_momentum(&self) -> f64 { 1.0 }
        fn name(&self) -> &str { "inverse square" }
    }

    #[test]
    fn test_matches_closed_form() {
        let reference = solve_reference(&InverseSquare, 1.0, 1.0, 100.0, 50).unwrap();

        for (x, y) in reference.x.iter().zip(&reference.yield_values) {
            assert_relative_eq!(*y, 1.0 - 1.0 / x, epsilon = 1e-12);
        }
        assert_relative_eq!(reference.final_yield(), 0.99, max_relative = 1e-12);
    }

    #[test]
    fn test_yield_is_monotone_for_positive_rate() {
        let reference = solve_reference(&InverseSquare, 1.0, 1e-2, 1e2, 100).unwrap();
        assert!(reference.yield_values.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_yield_at_interpolates() {
        let reference = solve_reference(&InverseSquare, 1.0, 1.0, 100.0, 201).unwrap();

        assert_eq!(reference.yield_at(1.0), Some(0.0));
        assert_relative_eq!(reference.yield_at(3.0).unwrap(), 1.0 - 1.0 / 3.0, max_relative = 1e-3);
        assert!(reference.yield_at(0.5).is_none());
        assert!(reference.yield_at(200.0).is_none());
    }

    #[test]
    fn test_rejects_bad_range() {
        assert!(solve_reference(&InverseSquare, 1.0, 0.0, 1.0, 10).is_err());
        assert!(solve_reference(&InverseSquare, 1.0, 1.0, 1.0, 10).is_err());
        assert!(solve_reference(&InverseSquare, 1.0, 1.0, 2.0, 1).is_err());
    }
}
