//! Solver traits and types
//!
//! # Design Philosophy
//!
//! - `TransportModel` is WHAT is advanced: a right-hand side in momentum
//!   space plus the two yield diagnostics
//! - `Integrator` is HOW one step is taken (Euler, Heun)
//! - `SolverConfiguration` carries every numerical and physical knob of a
//!   run, with defaults matching the reference freeze-in setup
//! - `SimulationResult` carries the march output plus string metadata
//!
//! Selectors (`TimeIntegrator`, `ReconstructionScheme`, `TransportForm`)
//! parse from strings through `FromStr`; an unknown name is an error, never
//! a silent fallback.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use nalgebra::DVector;

use crate::models::TransportForm;
use crate::solver::methods::{EulerIntegrator, Rk2Integrator};
use crate::solver::{ReconstructionScheme, Snapshot, SolverError};

// =================================================================================================
// Transport Model
// =================================================================================================

/// Rate of change of the field and of the source-only yield
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRate {
    /// `df/dx` on every momentum cell
    pub rate: DVector<f64>,

    /// `dY_src/dx`, the yield rate carried by the source alone
    pub source_yield_rate: f64,
}

/// Momentum-space equation advanced by the PDE stepper
///
/// # Thread Safety
///
/// `Send + Sync` like every model in the crate, so that a scenario can be
/// moved to a worker thread.
pub trait TransportModel: Send + Sync {
    /// Number of momentum cells `Np`
    fn cells(&self) -> usize;

    /// Momentum cell centers, used for snapshots and moments
    fn momentum(&self) -> &DVector<f64>;

    /// Right-hand side at `(field, x)`
    fn evaluate(&self, field: &DVector<f64>, x: f64) -> FieldRate;

    /// Yield integrated from the field at coordinate `x`
    fn integrated_yield(&self, field: &DVector<f64>, x: f64) -> f64;

    /// `dY/dx` of the reduced (momentum-integrated) equation
    fn reduced_rhs(&self, x: f64) -> f64;

    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }
}

// =================================================================================================
// Integrators
// =================================================================================================

/// Outcome of one integrator step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Field at the end of the step
    pub field: DVector<f64>,

    /// Source-only yield accumulated over the step
    pub source_yield_increment: f64,
}

/// One explicit step of the march from `x` to `x_next`
pub trait Integrator: Send + Sync {
    fn step(&self, model: &dyn TransportModel, field: &DVector<f64>, x: f64, x_next: f64) -> StepOutcome;

    fn name(&self) -> &'static str;

    /// Right-hand side evaluations per step
    fn evaluations_per_step(&self) -> usize;

    /// Global order of accuracy in the step size
    fn order(&self) -> usize;
}

/// Time integrator selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeIntegrator {
    /// Forward Euler, first order
    Euler,

    /// Heun's method, second order
    #[default]
    Rk2,
}

impl TimeIntegrator {
    /// Concrete integrator for this selector
    pub fn integrator(self) -> Box<dyn Integrator> {
        match self {
            Self::Euler => Box::new(EulerIntegrator::new()),
            Self::Rk2 => Box::new(Rk2Integrator::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::Rk2 => "rk2",
        }
    }
}

impl fmt::Display for TimeIntegrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeIntegrator {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" | "forward-euler" => Ok(Self::Euler),
            "rk2" | "heun" => Ok(Self::Rk2),
            _ => Err(SolverError::UnknownSelector {
                kind: "time integrator",
                value: s.to_string(),
            }),
        }
    }
}

// =================================================================================================
// Configuration
// =================================================================================================

/// Every parameter of a freeze-in march
///
/// # Example
///
/// ```rust
/// use freezein_rs::solver::{ReconstructionScheme, SolverConfiguration, TimeIntegrator};
///
/// let config = SolverConfiguration::default()
///     .mass(10.0)
///     .momentum_grid(1e-6, 1e3, 300)
///     .time_grid(1e-3, 1e3, 1500)
///     .scheme(ReconstructionScheme::Muscl)
///     .integrator(TimeIntegrator::Rk2)
///     .snapshots_at(vec![1e-1, 1.0]);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfiguration {
    /// Relic particle mass `m` (sets `x = m / T`)
    pub mass: f64,

    /// Relic internal degrees of freedom `g`
    pub dof: f64,

    /// Number of momentum cells `Np`
    pub momentum_cells: usize,

    /// Lower momentum bound
    pub p_min: f64,

    /// Upper momentum bound
    pub p_max: f64,

    /// Number of time marks `Nx`
    pub time_points: usize,

    /// First time mark
    pub x_min: f64,

    /// Last time mark
    pub x_max: f64,

    /// Injection width as a fraction of the injection momentum
    pub injection_width: f64,

    pub scheme: ReconstructionScheme,

    pub integrator: TimeIntegrator,

    pub transport: TransportForm,

    /// Coordinate where the analytic pre-integration hands over to the march
    pub x_switch: f64,

    /// Requested snapshot coordinates
    pub snapshots: Vec<f64>,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            mass: 10.0,
            dof: 2.0,
            momentum_cells: 600,
            p_min: 1e-6,
            p_max: 1e3,
            time_points: 3000,
            x_min: 1e-3,
            x_max: 1e3,
            injection_width: 0.02,
            scheme: ReconstructionScheme::Muscl,
            integrator: TimeIntegrator::Rk2,
            transport: TransportForm::Liouville,
            x_switch: 1e-2,
            snapshots: Vec::new(),
        }
    }
}

impl SolverConfiguration {
    /// Builder pattern: set the relic mass
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Builder pattern: set the relic degrees of freedom
    pub fn dof(mut self, dof: f64) -> Self {
        self.dof = dof;
        self
    }

    /// Builder pattern: set momentum bounds and cell count
    pub fn momentum_grid(mut self, p_min: f64, p_max: f64, cells: usize) -> Self {
        self.p_min = p_min;
        self.p_max = p_max;
        self.momentum_cells = cells;
        self
    }

    /// Builder pattern: set time bounds and mark count
    pub fn time_grid(mut self, x_min: f64, x_max: f64, points: usize) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self.time_points = points;
        self
    }

    pub fn injection_width(mut self, width_fraction: f64) -> Self {
        self.injection_width = width_fraction;
        self
    }

    pub fn scheme(mut self, scheme: ReconstructionScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn integrator(mut self, integrator: TimeIntegrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn transport(mut self, transport: TransportForm) -> Self {
        self.transport = transport;
        self
    }

    /// Builder pattern: set the hand-over coordinate
    pub fn switch_at(mut self, x_switch: f64) -> Self {
        self.x_switch = x_switch;
        self
    }

    /// Builder pattern: request snapshots
    pub fn snapshots_at(mut self, snapshots: Vec<f64>) -> Self {
        self.snapshots = snapshots;
        self
    }

    /// Check the physical parameters
    ///
    /// Grid bounds and counts are checked by the grid builders, the switch
    /// coordinate and snapshot requests by [`Scenario::validate`] once the
    /// time grid exists.
    ///
    /// [`Scenario::validate`]: crate::solver::Scenario::validate
    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(SolverError::configuration(format!(
                "mass must be finite and positive, got {}",
                self.mass
            )));
        }
        if !self.dof.is_finite() || self.dof <= 0.0 {
            return Err(SolverError::configuration(format!(
                "degrees of freedom must be finite and positive, got {}",
                self.dof
            )));
        }
        if !self.injection_width.is_finite() || self.injection_width < 0.0 {
            return Err(SolverError::configuration(format!(
                "injection width must be finite and non-negative, got {}",
                self.injection_width
            )));
        }
        Ok(())
    }
}

// =================================================================================================
// Simulation Result
// =================================================================================================

/// Output of a march
///
/// The three histories share one index: entry 0 is the switch coordinate
/// with the pre-integrated yield, entry `k` the state after step `k`.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Momentum cell centers
    pub momentum: DVector<f64>,

    /// Recorded coordinates
    pub x: Vec<f64>,

    /// Field after the last step
    pub field: DVector<f64>,

    /// Yield integrated from the field
    pub integrated_yield: Vec<f64>,

    /// Yield accumulated from the source alone
    pub source_yield: Vec<f64>,

    /// Last integrated yield
    pub final_yield: f64,

    /// Captured snapshots, ordered by requested coordinate
    pub snapshots: Vec<Snapshot>,

    /// Free-form diagnostics (integrator, scheme, step count, ...)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    pub fn new(
        momentum: DVector<f64>,
        x: Vec<f64>,
        field: DVector<f64>,
        integrated_yield: Vec<f64>,
        source_yield: Vec<f64>,
        snapshots: Vec<Snapshot>,
    ) -> Self {
        assert_eq!(x.len(), integrated_yield.len(), "integrated yield history length");
        assert_eq!(x.len(), source_yield.len(), "source yield history length");

        let final_yield = integrated_yield.last().copied().unwrap_or(0.0);

        Self {
            momentum,
            x,
            field,
            integrated_yield,
            source_yield,
            final_yield,
            snapshots,
            metadata: HashMap::new(),
        }
    }

    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Number of recorded coordinates
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Number of steps actually marched
    #[inline]
    pub fn steps(&self) -> usize {
        self.x.len().saturating_sub(1)
    }

    /// Last source-only yield
    pub fn final_source_yield(&self) -> f64 {
        self.source_yield.last().copied().unwrap_or(0.0)
    }

    /// Relative gap between the two yield diagnostics at the end of the run
    pub fn yield_discrepancy(&self) -> f64 {
        let source = self.final_source_yield();
        if source == 0.0 {
            return self.final_yield.abs();
        }
        (self.final_yield - source).abs() / source.abs()
    }

    /// Snapshot captured for the requested coordinate `x`
    pub fn snapshot(&self, x: f64) -> Option<&Snapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.requested_x == x)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
