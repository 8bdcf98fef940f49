//! Freeze-in transport in momentum space
//!
//! # Mathematical Background
//!
//! In the time-like coordinate `x = m / T` the collisionless Boltzmann
//! equation of a relic produced by decays reads
//!
//! ```text
//! ∂f/∂x = (p / x) ∂f/∂p + S(p, x)
//! ```
//!
//! Momenta redshift along `dp/dx = v(p, x) = -p / x`.
//!
//! # Conservative Form
//!
//! Flux form on momentum cells `[p_k, p_{k+1}]`:
//!
//! ```text
//! df_i/dx = -(F_{i+1} - F_i) / Δp_i + S_i
//! F_k     = v_k · f_face_k,          v_k = -p_k / x
//! ```
//!
//! [`TransportForm::Conservative`] drops the phase-space compression
//! `f ∂v/∂p`. It conserves `Σ Δp_i f_i` exactly, which is not the conserved
//! quantity of the physical equation: the `p²`-moment then decays like `x⁻²`
//! instead of `x⁻³`, so the yield integrated from the field grows linearly
//! in `x` once production stops.
//!
//! # Liouville Form
//!
//! [`TransportForm::Liouville`] transports the density per unit `ln p`,
//! `ρ = p³ f`, which drifts at the uniform speed `-1/x` and dilutes like the
//! entropy:
//!
//! ```text
//! ∂ρ/∂x = -∂(-ρ/x)/∂ln p - 3ρ/x + p³ S
//! ```
//!
//! Cell contents are measured with the same trapezoidal weights `w_i` as
//! every yield, `M = Σ w_i p_i² f_i`, so the update of cell `i` is
//!
//! ```text
//! df_i/dx = -(G_{i+1} - G_i) / (w_i p_i²) - 3 f_i / x + S_i
//! G_k     = -ρ_face_k / x
//! ```
//!
//! Summed over cells the fluxes telescope:
//!
//! ```text
//! dM/dx = -(G_Np - G_0) - 3M/x + Σ w_i p_i² S_i
//! ```
//!
//! With `s ∝ T³` the field-integrated yield `∝ x³ M` then follows the
//! source-only yield up to the boundary fluxes and the time-integration
//! error, for either reconstruction.
//!
//! # Face Values
//!
//! Face values of `f` (conservative) or `ρ` (Liouville) come from
//! [`ReconstructionScheme`]: first-order upwind or MUSCL with a minmod
//! limiter. Every face velocity is negative, so the
//! upper boundary face is an inflow face fed by zero-gradient extrapolation
//! and the lower boundary face is an outflow face.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use nalgebra::DVector;
//! use freezein_rs::models::{FreezeInTransport, SpectralInjection};
//! use freezein_rs::physics::StandardCosmology;
//! use freezein_rs::solver::{build_momentum_grid, TransportModel};
//!
//! let grid = build_momentum_grid(1e-6, 1e3, 200, true)?;
//! let model = FreezeInTransport::new(
//!     grid,
//!     Arc::new(StandardCosmology::default()),
//!     SpectralInjection::new(0.02),
//!     10.0,
//!     2.0,
//! );
//!
//! let field = DVector::zeros(model.cells());
//! let rate = model.evaluate(&field, 0.3);
//! assert!(rate.source_yield_rate > 0.0);
//! # Ok::<(), freezein_rs::solver::SolverError>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use nalgebra::DVector;

use crate::models::injection::{SourceTerm, SpectralInjection};
use crate::physics::{RateFunctions, TEMPERATURE_FLOOR};
use crate::solver::quadrature::{momentum_moment, trapezoid_weights};
use crate::solver::{
    FieldRate, MomentumGrid, ReconstructionScheme, SolverError, TransportModel, map_cells,
};

// =================================================================================================
// Transport Form
// =================================================================================================

/// Form of the momentum-space transport operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportForm {
    /// `-divergence + source`
    Conservative,

    /// `-divergence` of the log-momentum density, dilution and source
    #[default]
    Liouville,
}

impl TransportForm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Liouville => "liouville",
        }
    }
}

impl fmt::Display for TransportForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransportForm {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" | "flux" => Ok(Self::Conservative),
            "liouville" | "advective" => Ok(Self::Liouville),
            _ => Err(SolverError::UnknownSelector {
                kind: "transport form",
                value: s.to_string(),
            }),
        }
    }
}

// =================================================================================================
// Freeze-in Transport Model
// =================================================================================================

/// Right-hand side of the momentum-space freeze-in equation
#[derive(Clone)]
pub struct FreezeInTransport {
    grid: MomentumGrid,
    rates: Arc<dyn RateFunctions>,
    injection: SpectralInjection,
    scheme: ReconstructionScheme,
    transport: TransportForm,
    mass: f64,
    dof: f64,
    /// Trapezoidal `p²`-moment weight `w_i p_i²` of every cell
    moment_weights: DVector<f64>,
}

impl FreezeInTransport {
    /// Create the operator with MUSCL faces and the Liouville form
    ///
    /// # Panics
    ///
    /// Panics if `mass` or `dof` is not finite and positive.
    pub fn new(
        grid: MomentumGrid,
        rates: Arc<dyn RateFunctions>,
        injection: SpectralInjection,
        mass: f64,
        dof: f64,
    ) -> Self {
        assert!(mass.is_finite() && mass > 0.0, "Particle mass must be positive, got {}", mass);
        assert!(dof.is_finite() && dof > 0.0, "Degrees of freedom must be positive, got {}", dof);

        let centers = grid.centers();
        let weights = if grid.cells() > 1 {
            DVector::from_vec(trapezoid_weights(centers.as_slice()))
        } else {
            // A single node has no trapezoid; its cell width stands in
            grid.widths().clone()
        };
        let moment_weights = weights.zip_map(centers, |w, p| w * p * p);

        Self {
            grid,
            rates,
            injection,
            scheme: ReconstructionScheme::default(),
            transport: TransportForm::default(),
            mass,
            dof,
            moment_weights,
        }
    }

    /// Builder pattern: set the face reconstruction
    pub fn with_scheme(mut self, scheme: ReconstructionScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Builder pattern: set the operator form
    pub fn with_transport(mut self, transport: TransportForm) -> Self {
        self.transport = transport;
        self
    }

    #[inline]
    pub fn grid(&self) -> &MomentumGrid {
        &self.grid
    }

    #[inline]
    pub fn rates(&self) -> &dyn RateFunctions {
        self.rates.as_ref()
    }

    #[inline]
    pub fn scheme(&self) -> ReconstructionScheme {
        self.scheme
    }

    #[inline]
    pub fn transport(&self) -> TransportForm {
        self.transport
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn dof(&self) -> f64 {
        self.dof
    }

    /// Weights `w_i p_i²` with `Σ w_i p_i² f_i` the trapezoidal `p²`-moment
    #[inline]
    pub fn moment_weights(&self) -> &DVector<f64> {
        &self.moment_weights
    }

    /// Source term at coordinate `x`
    pub fn source(&self, x: f64) -> SourceTerm {
        self.injection
            .build(x, &self.grid, self.rates.as_ref(), self.mass, self.dof)
    }

    /// Upwind fluxes on all `Np + 1` faces
    ///
    /// `v_k · f_face_k` in the conservative form, `-ρ_face_k / x` with
    /// `ρ = p³ f` in the Liouville form.
    ///
    /// # Panics
    ///
    /// Panics if `field` does not have one value per cell.
    pub fn face_fluxes(&self, field: &DVector<f64>, x: f64) -> DVector<f64> {
        self.check_field(field);
        let velocities = self.grid.face_velocities(x);

        match self.transport {
            TransportForm::Conservative => {
                let faces = self.scheme.reconstruct(field, &velocities);
                velocities.component_mul(&faces)
            }
            TransportForm::Liouville => {
                let density = self.grid.centers().zip_map(field, |p, f| p * p * p * f);
                self.scheme.reconstruct(&density, &velocities) * (-1.0 / x)
            }
        }
    }

    fn check_field(&self, field: &DVector<f64>) {
        assert_eq!(
            field.len(),
            self.grid.cells(),
            "field has {} values for {} momentum cells",
            field.len(),
            self.grid.cells()
        );
    }
}

impl TransportModel for FreezeInTransport {
    fn cells(&self) -> usize {
        self.grid.cells()
    }

    fn momentum(&self) -> &DVector<f64> {
        self.grid.centers()
    }

    fn evaluate(&self, field: &DVector<f64>, x: f64) -> FieldRate {

        // ====== Step 1: Fluxes ======

        let flux = self.face_fluxes(field, x);

        // ====== Step 2: Source ======

        let source = self.source(x);

        // ====== Step 3: Assemble per cell ======

        let rate = match self.transport {
            TransportForm::Conservative => {
                let widths = self.grid.widths();
                map_cells(field.len(), |i| -(flux[i + 1] - flux[i]) / widths[i] + source.values[i])
            }
            TransportForm::Liouville => {
                let weights = &self.moment_weights;
                map_cells(field.len(), |i| {
                    -(flux[i + 1] - flux[i]) / weights[i] - 3.0 * field[i] / x + source.values[i]
                })
            }
        };

        FieldRate {
            rate,
            source_yield_rate: source.yield_rate(self.grid.centers(), self.dof),
        }
    }

    fn integrated_yield(&self, field: &DVector<f64>, x: f64) -> f64 {
        self.check_field(field);
        let temperature = (self.mass / x).max(TEMPERATURE_FLOOR);
        let moment = momentum_moment(field.as_slice(), self.grid.centers().as_slice());
        self.rates.moment_to_yield(temperature, self.dof) * moment
    }

    fn reduced_rhs(&self, x: f64) -> f64 {
        self.rates.reduced_rhs(x, self.mass)
    }

    fn name(&self) -> &str {
        "Freeze-in momentum transport"
    }

    fn description(&self) -> Option<&str> {
        Some("Redshift drift in log-spaced momentum cells with a decay source")
    }
}

impl fmt::Debug for FreezeInTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreezeInTransport")
            .field("cells", &self.grid.cells())
            .field("rates", &self.rates.name())
            .field("injection", &self.injection)
            .field("scheme", &self.scheme)
            .field("transport", &self.transport)
            .field("mass", &self.mass)
            .field("dof", &self.dof)
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
