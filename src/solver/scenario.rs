//! Simulation scenario definition
//!
//! A scenario combines a transport model with the time marks it is marched
//! over, the hand-over coordinate and the snapshot requests.

use std::sync::Arc;

use crate::models::{FreezeInTransport, SpectralInjection};
use crate::physics::RateFunctions;
use crate::solver::{MomentumGrid, SolverConfiguration, SolverError, TimeGrid, TransportModel};

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Transport model (equations)
/// - Time marks of the march
/// - Switch coordinate between pre-integration and march
/// - Snapshot requests
///
/// # Design
///
/// The same scenario can be solved with different integrators.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// # Examples
///
/// ```rust,ignore
/// let scenario = Scenario::from_configuration(&config, Arc::new(StandardCosmology::default()))?;
///
/// let euler = PdeSolver::new(TimeIntegrator::Euler).solve(&scenario)?;
/// let heun = PdeSolver::new(TimeIntegrator::Rk2).solve(&scenario)?;
/// ```
pub struct Scenario {
    /// Transport model (equations)
    pub model: Box<dyn TransportModel>,

    /// Time marks
    pub marks: TimeGrid,

    /// End of the analytic pre-integration
    pub x_switch: f64,

    /// Requested snapshot coordinates
    pub snapshots: Vec<f64>,
}

impl Scenario {

    /// Create a scenario without snapshot requests
    pub fn new(model: Box<dyn TransportModel>, marks: TimeGrid, x_switch: f64) -> Self {
        Self { model, marks, x_switch, snapshots: Vec::new() }
    }

    /// Builder pattern: request snapshots
    pub fn with_snapshots(mut self, snapshots: Vec<f64>) -> Self {
        self.snapshots = snapshots;
        self
    }

    /// Build grids and the freeze-in transport model from a configuration
    ///
    /// Checks run in order: physical parameters, momentum grid, time grid,
    /// then the switch coordinate and snapshot requests against the marks.
    pub fn from_configuration(
        config: &SolverConfiguration,
        rates: Arc<dyn RateFunctions>,
    ) -> Result<Self, SolverError> {
        config.validate()?;

        let grid = MomentumGrid::new(
            config.p_min,
            config.p_max,
            config.momentum_cells,
            Default::default(),
        )?;
        let marks = TimeGrid::new(config.x_min, config.x_max, config.time_points)?;

        let model = FreezeInTransport::new(
            grid,
            rates,
            SpectralInjection::new(config.injection_width),
            config.mass,
            config.dof,
        )
        .with_scheme(config.scheme)
        .with_transport(config.transport);

        let scenario = Self::new(Box::new(model), marks, config.x_switch)
            .with_snapshots(config.snapshots.clone());
        scenario.validate()?;

        Ok(scenario)
    }

    /// Check that the switch lies on the time grid and requests are finite
    pub fn validate(&self) -> Result<(), SolverError> {
        let (first, last) = (self.marks.first(), self.marks.last());

        if !self.x_switch.is_finite() || self.x_switch < first || self.x_switch > last {
            return Err(SolverError::configuration(format!(
                "switch coordinate {} outside the time grid [{first}, {last}]",
                self.x_switch
            )));
        }
        if let Some(bad) = self.snapshots.iter().find(|x| !x.is_finite()) {
            return Err(SolverError::configuration(format!(
                "snapshot coordinate must be finite, got {bad}"
            )));
        }

        Ok(())
    }

    /// Get model name
    pub fn get_model_name(&self) -> &str {
        self.model.name()
    }

    /// Index of the first mark the march starts from
    pub fn start_index(&self) -> usize {
        self.marks.index_at_or_after(self.x_switch)
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
        .field("name", &self.get_model_name())
        .field("cells", &self.model.cells())
        .field("time marks", &self.marks.len())
        .field("x switch", &self.x_switch)
        .field("snapshots", &self.snapshots)
        .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
