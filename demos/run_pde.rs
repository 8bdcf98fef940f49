//! Example: Freeze-in production of a light relic from mediator decays
//!
//! Marches the momentum distribution of a relic of mass m = 10 produced by
//! decays A → χχ of a mediator with m_A = 100, and compares the resulting
//! yield with the reduced (momentum-integrated) equation.
//!
//! **Usage**:
//! ```bash
//! cargo run --example run_pde -- [integrator] [scheme]
//! cargo run --example run_pde -- euler first-order
//! ```
//!
//! Integrators: `euler`, `rk2` (default). Schemes: `first-order`, `muscl`
//! (default).

use std::time::Instant;

use freezein_rs::{
    output::{export_reference_csv, CsvConfig, CsvExporter, CsvMetadata, Exporter},
    physics::StandardCosmology,
    reference::solve_reference,
    solver::{march_pde, ReconstructionScheme, SolverConfiguration, TimeIntegrator},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {

    println!("═══════════════════════════════════════════════════════");
    println!("  Freeze-in March - Momentum-space Transport");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Selectors from the command line ======

    let mut args = std::env::args().skip(1);
    let integrator: TimeIntegrator = match args.next() {
        Some(name) => name.parse()?,
        None => TimeIntegrator::default(),
    };
    let scheme: ReconstructionScheme = match args.next() {
        Some(name) => name.parse()?,
        None => ReconstructionScheme::default(),
    };

    let config = SolverConfiguration::default()
        .integrator(integrator)
        .scheme(scheme);

    println!("Configuration:");
    println!("  mass            : {}", config.mass);
    println!("  momentum cells  : {} in [{:e}, {:e}]", config.momentum_cells, config.p_min, config.p_max);
    println!("  time marks      : {} in [{:e}, {:e}]", config.time_points, config.x_min, config.x_max);
    println!("  x switch        : {:e}", config.x_switch);
    println!("  integrator      : {}", config.integrator);
    println!("  scheme          : {}", config.scheme);
    println!("  transport       : {}\n", config.transport);

    // ====== March ======

    let start = Instant::now();
    let result = march_pde(&config)?;
    let elapsed = start.elapsed().as_secs_f64();

    // ====== Reference ======

    let rates = StandardCosmology::default();
    let reference = solve_reference(&rates, config.mass, config.x_min, config.x_max, 800)?;

    println!("Results ({:.2} s):", elapsed);
    println!("  steps              : {}", result.steps());
    println!("  Y integrated       : {:.6e}", result.final_yield);
    println!("  Y source only      : {:.6e}", result.final_source_yield());
    println!("  Y reference        : {:.6e}", reference.final_yield());
    println!("  transport error    : {:.3}%", 100.0 * result.yield_discrepancy());
    println!(
        "  vs reference       : {:.3}%\n",
        100.0 * (result.final_yield - reference.final_yield()).abs() / reference.final_yield()
    );

    // ====== Export ======

    let tmp_dir = std::env::temp_dir();
    let yield_path = tmp_dir.join("freezein_yield.csv");
    let reference_path = tmp_dir.join("freezein_reference.csv");

    let exporter = CsvExporter::default().with_result_metadata();
    exporter.export_yields(&result, Some(1000), &yield_path.to_string_lossy())?;

    let mut metadata = CsvMetadata::default();
    metadata.add_custom("Rates".to_string(), "standard cosmology".to_string());
    metadata.add_custom("Integrator".to_string(), "RK4 in ln x".to_string());
    export_reference_csv(
        &reference,
        &reference_path.to_string_lossy(),
        Some(&CsvConfig::default().with_metadata(metadata)),
    )?;

    println!("Exported:");
    println!("  {}", yield_path.display());
    println!("  {}", reference_path.display());

    Ok(())
}
