//! Momentum and time-marching grids
//!
//! # Momentum Grid
//!
//! `Np` finite-volume cells bounded by `Np + 1` edges. Edges are geometric
//! by default so that every decade of momentum gets the same resolution:
//!
//! ```text
//! edge_k = 10^(log10(pmin) + k · (log10(pmax) - log10(pmin)) / Np),   k = 0..=Np
//! center_i = (edge_i + edge_{i+1}) / 2
//! width_i  = edge_{i+1} - edge_i
//! ```
//!
//! # Time Grid
//!
//! `Nx` geometrically spaced marks in `x = m / T`, first and last values
//! pinned exactly to `xmin` and `xmax`.
//!
//! # Example
//!
//! ```rust
//! use freezein_rs::solver::{build_momentum_grid, build_time_grid};
//!
//! let grid = build_momentum_grid(1e-6, 1e3, 600, true)?;
//! assert_eq!(grid.edges().len(), 601);
//! assert_eq!(grid.centers().len(), 600);
//!
//! let marks = build_time_grid(1e-3, 1e3, 3000)?;
//! assert_eq!(marks.first(), 1e-3);
//! assert_eq!(marks.last(), 1e3);
//! # Ok::<(), freezein_rs::solver::SolverError>(())
//! ```

use nalgebra::DVector;

use crate::solver::SolverError;

// =================================================================================================
// Spacing
// =================================================================================================

/// Placement of the grid edges between the two bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridSpacing {
    /// Equal ratio between consecutive edges
    #[default]
    Logarithmic,

    /// Equal difference between consecutive edges
    Linear,
}

impl GridSpacing {
    /// `n + 1` points from `lower` to `upper` inclusive, endpoints exact
    fn points(self, lower: f64, upper: f64, intervals: usize) -> Vec<f64> {
        let n = intervals as f64;
        let mut values: Vec<f64> = match self {
            Self::Logarithmic => {
                let (a, b) = (lower.log10(), upper.log10());
                (0..=intervals)
                    .map(|k| 10f64.powf(a + (b - a) * k as f64 / n))
                    .collect()
            }
            Self::Linear => (0..=intervals)
                .map(|k| lower + (upper - lower) * k as f64 / n)
                .collect(),
        };

        values[0] = lower;
        values[intervals] = upper;
        values
    }
}

fn ensure_strictly_increasing(values: &[f64], what: &str) -> Result<(), SolverError> {
    match values.windows(2).position(|w| w[1] <= w[0]) {
        Some(k) => Err(SolverError::grid(format!(
            "{what} collapse at index {k}: {} is not below {}",
            values[k],
            values[k + 1]
        ))),
        None => Ok(()),
    }
}

// =================================================================================================
// Momentum Grid
// =================================================================================================

/// Finite-volume cells in momentum space
///
/// Immutable once built. Accessors return borrowed slices of the
/// underlying `DVector`s.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumGrid {
    edges: DVector<f64>,
    centers: DVector<f64>,
    widths: DVector<f64>,
    spacing: GridSpacing,
}

impl MomentumGrid {
    /// Build `cells` cells between `p_min` and `p_max`
    ///
    /// # Errors
    ///
    /// `InvalidGridSpec` unless `0 < p_min < p_max` (both finite) and
    /// `cells ≥ 1`, or if rounding would make two edges coincide.
    pub fn new(p_min: f64, p_max: f64, cells: usize, spacing: GridSpacing) -> Result<Self, SolverError> {

        // ====== Step 1: Validation ======

        if !p_min.is_finite() || !p_max.is_finite() {
            return Err(SolverError::grid(format!(
                "momentum bounds must be finite, got [{p_min}, {p_max}]"
            )));
        }
        if p_min <= 0.0 {
            return Err(SolverError::grid(format!("pmin must be positive, got {p_min}")));
        }
        if p_max <= p_min {
            return Err(SolverError::grid(format!(
                "pmax ({p_max}) must exceed pmin ({p_min})"
            )));
        }
        if cells == 0 {
            return Err(SolverError::grid("momentum grid needs at least one cell"));
        }

        // ====== Step 2: Edges ======

        let edges = spacing.points(p_min, p_max, cells);
        ensure_strictly_increasing(&edges, "momentum edges")?;

        // ====== Step 3: Cell geometry ======

        let centers: Vec<f64> = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        let widths: Vec<f64> = edges.windows(2).map(|w| w[1] - w[0]).collect();

        Ok(Self {
            edges: DVector::from_vec(edges),
            centers: DVector::from_vec(centers),
            widths: DVector::from_vec(widths),
            spacing,
        })
    }

    /// Cell boundaries (`Np + 1` values)
    #[inline]
    pub fn edges(&self) -> &DVector<f64> {
        &self.edges
    }

    /// Arithmetic cell midpoints (`Np` values)
    #[inline]
    pub fn centers(&self) -> &DVector<f64> {
        &self.centers
    }

    /// Cell widths (`Np` values, all positive)
    #[inline]
    pub fn widths(&self) -> &DVector<f64> {
        &self.widths
    }

    /// Number of cells `Np`
    #[inline]
    pub fn cells(&self) -> usize {
        self.centers.len()
    }

    #[inline]
    pub fn spacing(&self) -> GridSpacing {
        self.spacing
    }

    /// Face velocities `v_k = -edge_k / x` of the redshift drift
    pub fn face_velocities(&self, x: f64) -> DVector<f64> {
        self.edges.map(|edge| -edge / x)
    }
}

/// Build a momentum grid from bounds and a cell count
///
/// `log = true` gives geometric edges, `false` arithmetic edges.
pub fn build_momentum_grid(p_min: f64, p_max: f64, cells: usize, log: bool) -> Result<MomentumGrid, SolverError> {
    let spacing = if log { GridSpacing::Logarithmic } else { GridSpacing::Linear };
    MomentumGrid::new(p_min, p_max, cells, spacing)
}

// =================================================================================================
// Time Grid
// =================================================================================================

/// Geometrically spaced marks of the time-like coordinate `x`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    marks: Vec<f64>,
}

impl TimeGrid {
    /// Build `points` marks from `x_min` to `x_max` inclusive
    ///
    /// # Errors
    ///
    /// `InvalidGridSpec` unless `0 < x_min < x_max` (both finite) and
    /// `points ≥ 2`.
    pub fn new(x_min: f64, x_max: f64, points: usize) -> Result<Self, SolverError> {
        if !x_min.is_finite() || !x_max.is_finite() {
            return Err(SolverError::grid(format!(
                "time bounds must be finite, got [{x_min}, {x_max}]"
            )));
        }
        if x_min <= 0.0 {
            return Err(SolverError::grid(format!("xmin must be positive, got {x_min}")));
        }
        if x_max <= x_min {
            return Err(SolverError::grid(format!(
                "xmax ({x_max}) must exceed xmin ({x_min})"
            )));
        }
        if points < 2 {
            return Err(SolverError::grid(format!(
                "time grid needs at least two points, got {points}"
            )));
        }

        let marks = GridSpacing::Logarithmic.points(x_min, x_max, points - 1);
        ensure_strictly_increasing(&marks, "time marks")?;

        Ok(Self { marks })
    }

    #[inline]
    pub fn marks(&self) -> &[f64] {
        &self.marks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Always false: a valid grid holds at least two marks
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    #[inline]
    pub fn first(&self) -> f64 {
        self.marks[0]
    }

    #[inline]
    pub fn last(&self) -> f64 {
        self.marks[self.marks.len() - 1]
    }

    /// Index of the first mark `≥ x` (left-sided sorted search)
    ///
    /// Returns `len()` when every mark is below `x`.
    pub fn index_at_or_after(&self, x: f64) -> usize {
        self.marks.partition_point(|&mark| mark < x)
    }
}

/// Build the time-marching grid
pub fn build_time_grid(x_min: f64, x_max: f64, points: usize) -> Result<TimeGrid, SolverError> {
    TimeGrid::new(x_min, x_max, points)
}

// =================================================================================================
// Tests
// =================================================================================================
