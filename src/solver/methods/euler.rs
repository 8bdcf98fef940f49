//! Forward Euler step
//!
//! # Mathematical Background
//!
//! For the semi-discrete system `df/dx = R(f, x)` the Forward Euler step
//! from `x_n` to `x_{n+1} = x_n + Δx` is
//!
//! ```text
//! f_{n+1} = f_n + Δx · R(f_n, x_n)
//! ```
//!
//! The source-only yield follows the same left-point rule:
//!
//! ```text
//! Y_src += Δx · dY_src(x_n)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: first-order accurate (error ~ O(Δx))
//! - **Stability**: conditionally stable, needs `|v| Δx / Δp ≲ 1`
//! - **Complexity**: 1 right-hand side evaluation per step
//!
//! # When to Use
//!
//! - Quick exploratory runs
//! - Checking that a refinement study really is first order
//!
//! For production yields prefer [`Rk2Integrator`](super::Rk2Integrator).

use nalgebra::DVector;

use crate::solver::{Integrator, StepOutcome, TransportModel};

// =================================================================================================
// Forward Euler Integrator
// =================================================================================================

/// Forward Euler step
///
/// # Example
///
/// ```rust
/// use freezein_rs::solver::{EulerIntegrator, Integrator};
///
/// let integrator = EulerIntegrator::new();
/// assert_eq!(integrator.name(), "Forward Euler");
/// assert_eq!(integrator.order(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerIntegrator;

impl EulerIntegrator {
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for EulerIntegrator {
    fn step(&self, model: &dyn TransportModel, field: &DVector<f64>, x: f64, x_next: f64) -> StepOutcome {
        let dx = x_next - x;
        let k = model.evaluate(field, x);

        StepOutcome {
            field: field + k.rate * dx,
            source_yield_increment: k.source_yield_rate * dx,
        }
    }

    fn name(&self) -> &'static str {
        "Forward Euler"
    }

    fn evaluations_per_step(&self) -> usize {
        1
    }

    fn order(&self) -> usize {
        1
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::FieldRate;

    /// df/dx = -k f, dY_src/dx = c
    struct Decay {
        momentum: DVector<f64>,
        k: f64,
        c: f64,
    }

    impl TransportModel for Decay {
        fn cells(&self) -> usize { self.momentum.len() }
        fn momentum(&self) -> &DVector<f64> { &self.momentum }
        fn evaluate(&self, field: &DVector<f64>, _x: f64) -> FieldRate {
            FieldRate { rate: field * -self.k, source_yield_rate: self.c }
        }
        fn integrated_yield(&self, field: &DVector<f64>, _x: f64) -> f64 { field.sum() }
        fn reduced_rhs(&self, _x: f64) -> f64 { self.c }
        fn name(&self) -> &str { "Decay" }
    }

    #[test]
    fn test_euler_single_step() {
        let model = Decay { momentum: DVector::from_element(3, 1.0), k: 0.5, c: 2.0 };
        let field = DVector::from_element(3, 4.0);

        let out = EulerIntegrator::new().step(&model, &field, 1.0, 1.1);

        // 4 + 0.1 · (-0.5 · 4) = 3.8
        for value in out.field.iter() {
            assert!((value - 3.8).abs() < 1e-12);
        }
        assert!((out.source_yield_increment - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_euler_convergence() {
        // f(x) = exp(-k (x - x0)); halving Δx should halve the error
        let model = Decay { momentum: DVector::from_element(1, 1.0), k: 0.5, c: 0.0 };
        let exact = (-0.5f64 * 5.0).exp();

        let errors: Vec<f64> = [100usize, 200, 400, 800]
            .iter()
            .map(|&steps| {
                let dx = 5.0 / steps as f64;
                let mut field = DVector::from_element(1, 1.0);
                for n in 0..steps {
                    let x = n as f64 * dx;
                    field = EulerIntegrator::new().step(&model, &field, x, x + dx).field;
                }
                (field[0] - exact).abs()
            })
            .collect();

        for pair in errors.windows(2) {
            let ratio = pair[0] / pair[1];
            assert!(ratio > 1.8 && ratio < 2.2, "Convergence ratio {} not first order", ratio);
        }
    }
}
