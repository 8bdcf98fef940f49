//! CSV export for freeze-in march results
//!
//! Writes yield histories, momentum spectra and reference curves as
//! comma-separated values, readable by pandas, gnuplot, spreadsheet tools.
//!
//! # Features
//!
//! - **Simple interface**: Export with `&[f64]` slices
//! - **Metadata support**: Optional `#` header with the run parameters
//! - **Customizable**: Delimiter, decimal separator, precision
//! - **Validation**: Checks for empty data, mismatched lengths, NaN
//!
//! Values are written in scientific notation. Yields are of order `1e-11`
//! and spectra span many decades; fixed notation would flatten them to zero.
//!
//! # Quick Examples
//!
//! ```rust,ignore
//! use freezein_rs::output::export::export_yield_csv;
//!
//! export_yield_csv(&result.x, &result.integrated_yield, &result.source_yield, "yield.csv", None)?;
//! ```
//!
//! **Output** (`yield.csv`):
//! ```csv
//! x,Y_integrated,Y_source
//! 1.000000e-2,3.141593e-16,3.141593e-16
//! 1.004616e-2,3.162118e-16,3.162118e-16
//! ...
//! ```
//!
//! ## With Metadata
//!
//! ```rust,ignore
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_result(&result));
//! export_yield_csv(&result.x, &result.integrated_yield, &result.source_yield, "yield.csv", Some(&config))?;
//! ```
//!
//! ```csv
//! # Freeze-in Simulation Data
//! # Generated: 2026-10-19T09:30:00+00:00
//! # Model: Freeze-in momentum transport
//! # Integrator: Runge-Kutta 2 (Heun)
//! # Scheme: muscl
//! # Steps: 2664
//! #
//! x,Y_integrated,Y_source
//! ...
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::output::export::{Exporter, downsample_indices};
use crate::reference::ReferenceSolution;
use crate::solver::{SimulationResult, Snapshot};

// =============================================================================
// Errors
// =============================================================================

/// Failure while writing a CSV file
#[derive(Debug)]
pub enum CsvError {
    /// Nothing to write
    EmptyData,

    /// Two columns of different length
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// NaN or infinite value in a column
    NonFinite { column: String },

    /// File creation or write failure
    Io(io::Error),
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvError::EmptyData => write!(f, "Empty data: nothing to export"),
            CsvError::LengthMismatch { column, expected, found } => write!(
                f,
                "Data length mismatch: column '{}' has {} values, expected {}",
                column, found, expected
            ),
            CsvError::NonFinite { column } => {
                write!(f, "Invalid data: NaN or Inf detected in column '{}'", column)
            }
            CsvError::Io(error) => write!(f, "I/O error: {}", error),
        }
    }
}

impl std::error::Error for CsvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CsvError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for CsvError {
    fn from(error: io::Error) -> Self {
        CsvError::Io(error)
    }
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use freezein_rs::output::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.decimal_separator, '.');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Digits after the decimal point of the mantissa (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the coordinate column (default: "x")
    pub x_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            x_header: "x".to_string(),
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// 12 digits in the mantissa
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only fields that are set appear in the header.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Transport model name
    pub model_name: Option<String>,

    /// Integrator name (e.g. "Forward Euler")
    pub integrator_name: Option<String>,

    /// Reconstruction scheme
    pub scheme: Option<String>,

    /// Transport form
    pub transport: Option<String>,

    /// Relic mass
    pub mass: Option<f64>,

    /// Coordinate where the march took over
    pub x_switch: Option<f64>,

    /// Number of marched steps
    pub steps: Option<usize>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Collect metadata from a march result
    pub fn from_result(result: &SimulationResult) -> Self {
        let text = |key: &str| result.metadata.get(key).cloned();
        let number = |key: &str| result.metadata.get(key).and_then(|value| value.parse().ok());

        Self {
            model_name: text("model"),
            integrator_name: text("integrator"),
            scheme: text("scheme"),
            transport: text("transport"),
            mass: number("mass"),
            x_switch: number("x switch"),
            steps: Some(result.steps()),
            custom: Vec::new(),
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header<W: Write>(writer: &mut W, metadata: &CsvMetadata) -> io::Result<()> {
    writeln!(writer, "# Freeze-in Simulation Data")?;

    let now = chrono::Utc::now();
    writeln!(writer, "# Generated: {}", now.to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(writer, "# Model: {}", model)?;
    }
    if let Some(integrator) = &metadata.integrator_name {
        writeln!(writer, "# Integrator: {}", integrator)?;
    }
    if let Some(scheme) = &metadata.scheme {
        writeln!(writer, "# Scheme: {}", scheme)?;
    }
    if let Some(transport) = &metadata.transport {
        writeln!(writer, "# Transport: {}", transport)?;
    }
    if let Some(mass) = metadata.mass {
        writeln!(writer, "# Mass: {}", mass)?;
    }
    if let Some(x_switch) = metadata.x_switch {
        writeln!(writer, "# x switch: {:e}", x_switch)?;
    }
    if let Some(steps) = metadata.steps {
        writeln!(writer, "# Steps: {}", steps)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(writer, "# {}: {}", key, value)?;
    }

    writeln!(writer, "#")?;

    Ok(())
}

/// Format number in scientific notation with the configured separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$e}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

/// Reject empty, ragged or non-finite columns
fn validate_columns(columns: &[(&str, &[f64])]) -> Result<(), CsvError> {
    let expected = match columns.first() {
        Some((_, values)) if !values.is_empty() => values.len(),
        _ => return Err(CsvError::EmptyData),
    };

    for (name, values) in columns {
        if values.len() != expected {
            return Err(CsvError::LengthMismatch {
                column: name.to_string(),
                expected,
                found: values.len(),
            });
        }
        if values.iter().any(|value| !value.is_finite()) {
            return Err(CsvError::NonFinite { column: name.to_string() });
        }
    }

    Ok(())
}

/// Open `path` and write the optional metadata header
fn create_writer(path: &str, config: &CsvConfig) -> Result<BufWriter<File>, CsvError> {
    let mut writer = BufWriter::new(File::create(path)?);

    if config.include_metadata {
        if let Some(metadata) = &config.metadata {
            write_metadata_header(&mut writer, metadata)?;
        }
    }

    Ok(writer)
}

/// Write `columns` restricted to `rows`, header first
fn write_columns(
    path: &str,
    columns: &[(&str, &[f64])],
    rows: &[usize],
    config: &CsvConfig,
) -> Result<(), CsvError> {
    validate_columns(columns)?;

    let mut writer = create_writer(path, config)?;
    let delimiter = config.delimiter.to_string();

    let header: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    writeln!(writer, "{}", header.join(&delimiter))?;

    for &row in rows {
        let line: Vec<String> = columns
            .iter()
            .map(|(_, values)| format_number(values[row], config))
            .collect();
        writeln!(writer, "{}", line.join(&delimiter))?;
    }

    writer.flush()?;
    Ok(())
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export both yield histories to CSV
///
/// # Arguments
///
/// * `x` - Recorded coordinates
/// * `integrated_yield` - Yield integrated from the field
/// * `source_yield` - Yield accumulated from the source alone
/// * `output_path` - Output file path
/// * `config` - Optional CSV configuration (uses default if None)
///
/// # Errors
///
/// - Empty data
/// - Mismatched lengths
/// - NaN or Inf values
/// - File creation errors
pub fn export_yield_csv(
    x: &[f64],
    integrated_yield: &[f64],
    source_yield: &[f64],
    output_path: &str,
    config: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    let binding = CsvConfig::default();
    let config = config.unwrap_or(&binding);

    let rows: Vec<usize> = (0..x.len()).collect();
    write_columns(
        output_path,
        &[
            (config.x_header.as_str(), x),
            ("Y_integrated", integrated_yield),
            ("Y_source", source_yield),
        ],
        &rows,
        config,
    )
}

/// Export snapshots to CSV in long format
///
/// One row per snapshot and momentum cell: requested `x`, reached `x`,
/// momentum, field and the number-density integrand `p² f`.
pub fn export_snapshots_csv(
    snapshots: &[Snapshot],
    output_path: &str,
    config: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    let binding = CsvConfig::default();
    let config = config.unwrap_or(&binding);

    if snapshots.is_empty() {
        return Err(CsvError::EmptyData);
    }

    for snapshot in snapshots {
        validate_columns(&[
            ("p", snapshot.momentum.as_slice()),
            ("f", snapshot.field.as_slice()),
        ])?;
    }

    let mut writer = create_writer(output_path, config)?;
    let d = config.delimiter;

    writeln!(writer, "x_requested{d}x_actual{d}p{d}f{d}p2f")?;

    for snapshot in snapshots {
        let requested = format_number(snapshot.requested_x, config);
        let reached = format_number(snapshot.x, config);

        for (p, f) in snapshot.momentum.iter().zip(snapshot.field.iter()) {
            writeln!(
                writer,
                "{requested}{d}{reached}{d}{}{d}{}{d}{}",
                format_number(*p, config),
                format_number(*f, config),
                format_number(p * p * f, config)
            )?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Export the reduced-equation reference curve to CSV
pub fn export_reference_csv(
    reference: &ReferenceSolution,
    output_path: &str,
    config: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    let binding = CsvConfig::default();
    let config = config.unwrap_or(&binding);

    let rows: Vec<usize> = (0..reference.x.len()).collect();
    write_columns(
        output_path,
        &[
            (config.x_header.as_str(), reference.x.as_slice()),
            ("Y_reference", reference.yield_values.as_slice()),
        ],
        &rows,
        config,
    )
}

// =============================================================================
// Exporter
// =============================================================================

/// [`Exporter`] writing CSV files
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,

    /// Fill the metadata header from the result
    pub with_result_metadata: bool,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config, with_result_metadata: false }
    }

    /// Builder pattern: header from the result metadata
    pub fn with_result_metadata(mut self) -> Self {
        self.with_result_metadata = true;
        self
    }

    fn config_for(&self, result: &SimulationResult) -> CsvConfig {
        if self.with_result_metadata {
            self.config.clone().with_metadata(CsvMetadata::from_result(result))
        } else {
            self.config.clone()
        }
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export_yields(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &str,
    ) -> Result<(), Self::Error> {
        let config = self.config_for(result);
        let rows = downsample_indices(result.len(), n_points);

        write_columns(
            path,
            &[
                (config.x_header.as_str(), result.x.as_slice()),
                ("Y_integrated", result.integrated_yield.as_slice()),
                ("Y_source", result.source_yield.as_slice()),
            ],
            &rows,
            &config,
        )
    }

    fn export_snapshots(&self, result: &SimulationResult, path: &str) -> Result<(), Self::Error> {
        let config = self.config_for(result);
        export_snapshots_csv(&result.snapshots, path, Some(&config))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
