//! Momentum-space PDE march with analytic pre-integration
//!
//! # Phases
//!
//! ```text
//! Pre-integration ──(x reaches x_switch)──▶ Discretized march ──(last mark)──▶ Complete
//! ```
//!
//! ## Pre-integration
//!
//! Before `x_switch` the relic abundance is tiny and its spectrum is
//! irrelevant, so only the reduced equation `dY/dx = C / (s H x)` is
//! integrated, trapezoidally over the time marks. The interval straddling
//! `x_switch` is closed with a left-point rectangle. The result `Y0` seeds
//! both yield histories; the field itself starts at zero.
//!
//! ## Discretized march
//!
//! From the first mark at or after `x_switch` to the last mark, each step
//!
//! 1. captures due snapshots at the current mark,
//! 2. advances the field and the source-only yield with the integrator,
//! 3. rejects a non-finite field,
//! 4. records `x_{n+1}`, the field-integrated yield and the source-only
//!    yield.
//!
//! The source-only yield starts at `Y0` and accumulates; the integrated
//! yield is recomputed from the field and does not include `Y0`.
//!
//! # Example
//!
//! ```rust
//! use freezein_rs::solver::{march_pde, SolverConfiguration};
//!
//! let config = SolverConfiguration::default()
//!     .momentum_grid(1e-6, 1e3, 120)
//!     .time_grid(1e-3, 1e3, 600)
//!     .snapshots_at(vec![0.1, 1.0]);
//!
//! let result = march_pde(&config)?;
//! assert_eq!(result.snapshots.len(), 2);
//! assert!(result.final_yield > 0.0);
//! # Ok::<(), freezein_rs::solver::SolverError>(())
//! ```

use std::sync::Arc;

use log::{debug, info};
use nalgebra::DVector;

use crate::physics::{RateFunctions, StandardCosmology};
use crate::solver::snapshot::{Snapshot, SnapshotSchedule};
use crate::solver::{
    Integrator, Scenario, SimulationResult, SolverConfiguration, SolverError, TimeIntegrator,
    TransportModel, validate_field,
};

// =================================================================================================
// Pre-integration
// =================================================================================================

/// Reduced yield accumulated from the first mark up to `x_switch`
///
/// Returns 0 when `x_switch` does not exceed the first mark.
pub fn pre_integrate(model: &dyn TransportModel, marks: &[f64], x_switch: f64) -> f64 {
    let mut yield_value = 0.0;

    for pair in marks.windows(2) {
        let (x, x_next) = (pair[0], pair[1]);

        if x_next > x_switch {
            if x < x_switch {
                yield_value += model.reduced_rhs(x) * (x_switch - x);
            }
            break;
        }

        yield_value += 0.5 * (model.reduced_rhs(x) + model.reduced_rhs(x_next)) * (x_next - x);
    }

    yield_value
}

// =================================================================================================
// PDE Solver
// =================================================================================================

/// Marches a [`Scenario`] with one integrator
pub struct PdeSolver {
    integrator: Box<dyn Integrator>,
}

impl PdeSolver {
    /// Create a solver for one of the built-in integrators
    pub fn new(integrator: TimeIntegrator) -> Self {
        Self { integrator: integrator.integrator() }
    }

    /// Create a solver around any integrator
    pub fn with_integrator(integrator: Box<dyn Integrator>) -> Self {
        Self { integrator }
    }

    pub fn name(&self) -> &'static str {
        self.integrator.name()
    }

    pub fn solve(&self, scenario: &Scenario) -> Result<SimulationResult, SolverError> {

        // ====== Step 1: Validation ======

        scenario.validate()?;

        let model = scenario.model.as_ref();
        let marks = scenario.marks.marks();
        let x_switch = scenario.x_switch;

        // ====== Step 2: Pre-integration ======

        let y0 = pre_integrate(model, marks, x_switch);
        let start = scenario.start_index();
        let steps = (marks.len() - 1).saturating_sub(start);

        debug!(
            "pre-integration to x = {:e}: Y0 = {:e}, march starts at mark {} ({} steps)",
            x_switch, y0, start, steps
        );

        // ====== Step 3: Setup ======

        let mut schedule = SnapshotSchedule::new(&scenario.snapshots, &scenario.marks);
        let mut snapshots = Vec::with_capacity(schedule.pending());

        let mut field = DVector::zeros(model.cells());
        let mut source_yield = y0;

        let mut x_history = Vec::with_capacity(steps + 1);
        let mut integrated_history = Vec::with_capacity(steps + 1);
        let mut source_history = Vec::with_capacity(steps + 1);

        x_history.push(x_switch);
        integrated_history.push(y0);
        source_history.push(y0);

        // ====== Step 4: March ======

        for i in start..marks.len() - 1 {
            let (x, x_next) = (marks[i], marks[i + 1]);

            for requested in schedule.take_due(i) {
                debug!("snapshot for x = {:e} taken at x = {:e}", requested, x);
                snapshots.push(Snapshot::capture(requested, x, model.momentum(), &field));
            }

            let outcome = self.integrator.step(model, &field, x, x_next);
            field = outcome.field;
            source_yield += outcome.source_yield_increment;

            validate_field(&field, i, x_next)?;

            x_history.push(x_next);
            integrated_history.push(model.integrated_yield(&field, x_next));
            source_history.push(source_yield);
        }

        if !schedule.is_empty() {
            debug!("snapshot requests never reached: {:?}", schedule.remaining());
        }

        // ====== Step 5: Build Result ======

        let mut result = SimulationResult::new(
            model.momentum().clone(),
            x_history,
            field,
            integrated_history,
            source_history,
            snapshots,
        );

        info!(
            "{} march complete: {} steps, Y = {:e}, Y_src = {:e}",
            self.integrator.name(),
            steps,
            result.final_yield,
            result.final_source_yield()
        );

        result.add_metadata("model", model.name());
        result.add_metadata("integrator", self.integrator.name());
        result.add_metadata("steps", &steps.to_string());
        result.add_metadata(
            "evaluations",
            &(steps * self.integrator.evaluations_per_step()).to_string(),
        );
        result.add_metadata("x switch", &x_switch.to_string());
        result.add_metadata("Y0", &y0.to_string());

        Ok(result)
    }
}

impl std::fmt::Debug for PdeSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdeSolver")
            .field("integrator", &self.integrator.name())
            .finish()
    }
}

// =================================================================================================
// Entry Points
// =================================================================================================

/// Run a march for the standard cosmology
pub fn march_pde(config: &SolverConfiguration) -> Result<SimulationResult, SolverError> {
    march_pde_with_rates(config, Arc::new(StandardCosmology::default()))
}

/// Run a march for any rate functions
pub fn march_pde_with_rates(
    config: &SolverConfiguration,
    rates: Arc<dyn RateFunctions>,
) -> Result<SimulationResult, SolverError> {
    let scenario = Scenario::from_configuration(config, rates)?;
    let mut result = PdeSolver::new(config.integrator).solve(&scenario)?;

    result.add_metadata("scheme", config.scheme.name());
    result.add_metadata("transport", config.transport.name());
    result.add_metadata("mass", &config.mass.to_string());

    Ok(result)
}

// =================================================================================================
// Tests
// =================================================================================================
