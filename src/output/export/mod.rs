//! Export module for march results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module; adding
//! a format means adding a file.
//!
//! # Usage example
//!
//! ```rust,ignore
//! use freezein_rs::output::export::{CsvExporter, Exporter};
//!
//! let exporter = CsvExporter::default();
//!
//! // Every recorded coordinate
//! exporter.export_yields(&result, None, "yield.csv")?;
//!
//! // Downsampled to 500 rows
//! exporter.export_yields(&result, Some(500), "yield_light.csv")?;
//!
//! // One block of rows per snapshot
//! exporter.export_snapshots(&result, "spectra.csv")?;
//! ```

pub mod csv;

pub use csv::{
    export_reference_csv,
    export_snapshots_csv,
    export_yield_csv,
    CsvConfig,
    CsvError,
    CsvExporter,
    CsvMetadata,
};

use crate::solver::SimulationResult;

/// Abstraction trait for all export formats.
///
/// # Parameter `n_points`
///
/// - `None`: exports every recorded coordinate
/// - `Some(n)`: uniformly downsamples to `n` rows, always keeping the first
///   and the last coordinate (the final yield must survive downsampling)
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Exports both yield histories.
    ///
    /// Columns: `x`, integrated yield, source-only yield.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or `result` contains no
    /// data.
    fn export_yields(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &str,
    ) -> Result<(), Self::Error>;

    /// Exports every captured snapshot.
    ///
    /// Columns: requested `x`, reached `x`, momentum, field, `p² f`.
    fn export_snapshots(&self, result: &SimulationResult, path: &str) -> Result<(), Self::Error>;
}

/// Indices of `n_points` rows spread evenly over `0..len`
///
/// Always contains `0` and `len - 1`. Returns every index when `n_points`
/// is `None` or not smaller than `len`.
pub(crate) fn downsample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    match n_points {
        Some(n) if n >= 2 && n < len => {
            let last = len - 1;
            let mut indices: Vec<usize> = (0..n)
                .map(|k| ((k as f64) * last as f64 / (n - 1) as f64).round() as usize)
                .collect();
            indices.dedup();
            indices
        }
        Some(1) if len > 0 => vec![len - 1],
        _ => (0..len).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsample_keeps_endpoints() {
        let indices = downsample_indices(1000, Some(7));
        assert_eq!(indices.len(), 7);
        assert_eq!(indices[0], 0);
        assert_eq!(*indices.last().unwrap(), 999);
        assert!(indices.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_downsample_passthrough() {
        assert_eq!(downsample_indices(4, None), vec![0, 1, 2, 3]);
        assert_eq!(downsample_indices(4, Some(10)), vec![0, 1, 2, 3]);
        assert_eq!(downsample_indices(4, Some(1)), vec![3]);
        assert!(downsample_indices(0, Some(3)).is_empty());
    }
}
