//! Output module for march results
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── export/             ← Data export
//!     ├── mod.rs          ← Exporter trait
//!     └── csv.rs          ← CSV writer
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use freezein_rs::output::export::{export_yield_csv, CsvConfig};
//!
//! export_yield_csv(&result.x, &result.integrated_yield, &result.source_yield, "yield.csv", None)?;
//! ```
//!
//! The free functions accept plain slices; [`CsvExporter`] works on a whole
//! [`SimulationResult`](crate::solver::SimulationResult) and fills the
//! metadata header from the result.

pub mod export;

pub use export::{
    export_reference_csv,
    export_snapshots_csv,
    export_yield_csv,
    CsvConfig,
    CsvError,
    CsvExporter,
    CsvMetadata,
    Exporter,
};
