//! Second-order Runge-Kutta (Heun) step
//!
//! # Mathematical Background
//!
//! Heun's method averages the slope at both ends of the step:
//!
//! ```text
//! k1 = R(f_n, x_n)
//! f* = f_n + Δx · k1
//! k2 = R(f*, x_{n+1})
//! f_{n+1} = ½ (f_n + f* + Δx · k2)  =  f_n + Δx/2 · (k1 + k2)
//! ```
//!
//! The source-only yield uses the matching trapezoidal rule:
//!
//! ```text
//! Y_src += ½ (dY1 + dY2) · Δx
//! ```
//!
//! # Characteristics
//!
//! - **Order**: second-order accurate (error ~ O(Δx²))
//! - **Stability**: SSP, so with a minmod-limited MUSCL flux it stays
//!   total-variation diminishing under the same step restriction as Euler
//! - **Complexity**: 2 right-hand side evaluations per step
//!
//! # Example
//!
//! ```rust
//! use freezein_rs::solver::{Integrator, Rk2Integrator};
//!
//! let integrator = Rk2Integrator::new();
//! assert_eq!(integrator.evaluations_per_step(), 2);
//! ```

use nalgebra::DVector;

use crate::solver::{Integrator, StepOutcome, TransportModel};

/// Heun (explicit trapezoidal) step
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk2Integrator;

impl Rk2Integrator {
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for Rk2Integrator {
    fn step(&self, model: &dyn TransportModel, field: &DVector<f64>, x: f64, x_next: f64) -> StepOutcome {
        let dx = x_next - x;

        // ====== Predictor ======

        let k1 = model.evaluate(field, x);
        let predicted = field + &k1.rate * dx;

        // ====== Corrector ======

        let k2 = model.evaluate(&predicted, x_next);
        let corrected = (field + predicted + k2.rate * dx) * 0.5;

        StepOutcome {
            field: corrected,
            source_yield_increment: 0.5 * (k1.source_yield_rate + k2.source_yield_rate) * dx,
        }
    }

    fn name(&self) -> &'static str {
        "Runge-Kutta 2 (Heun)"
    }

    fn evaluations_per_step(&self) -> usize {
        2
    }

    fn order(&self) -> usize {
        2
    }
}

// =================================================================================================
// Tests
// =================================================================================================
