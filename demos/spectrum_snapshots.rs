//! Example: Evolution of the relic momentum spectrum
//!
//! Requests snapshots of `f(p, x)` across the production era and prints,
//! for each, the momentum of the spectral peak and the yield carried by the
//! field at that time. Particles are injected at p = m_A / 2 and redshift as
//! `p ∝ 1/x`, so the peak drifts towards low momenta once production stops.
//!
//! Also compares the conservative and Liouville transport forms on the same
//! grid.

use std::sync::Arc;

use freezein_rs::{
    models::TransportForm,
    output::{CsvExporter, Exporter},
    physics::{RateFunctions, StandardCosmology},
    solver::{march_pde_with_rates, SimulationResult, SolverConfiguration},
};

fn peak_momentum(momentum: &[f64], field: &[f64]) -> f64 {
    momentum
        .iter()
        .zip(field)
        .max_by(|a, b| (a.0.powi(2) * a.1).total_cmp(&(b.0.powi(2) * b.1)))
        .map(|(p, _)| *p)
        .unwrap_or(0.0)
}

fn print_spectra(result: &SimulationResult, rates: &dyn RateFunctions, config: &SolverConfiguration) {
    println!("{:>12} {:>12} {:>14} {:>14}", "x requested", "x reached", "peak p", "Y(field)");
    println!("{:-<56}", "");

    for snapshot in &result.snapshots {
        let peak = peak_momentum(snapshot.momentum.as_slice(), snapshot.field.as_slice());

        let temperature = config.mass / snapshot.x;
        let integrand: Vec<f64> = snapshot
            .momentum
            .iter()
            .zip(snapshot.field.iter())
            .map(|(p, f)| p * p * f)
            .collect();
        let moment = freezein_rs::solver::quadrature::trapezoid(&integrand, snapshot.momentum.as_slice());
        let yield_value = rates.moment_to_yield(temperature, config.dof) * moment;

        println!(
            "{:>12.3e} {:>12.3e} {:>14.4e} {:>14.4e}",
            snapshot.requested_x, snapshot.x, peak, yield_value
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {

    println!("═══════════════════════════════════════════════════════");
    println!("  Freeze-in Spectra - Snapshots of f(p, x)");
    println!("═══════════════════════════════════════════════════════\n");

    let rates = Arc::new(StandardCosmology::default());

    let config = SolverConfiguration::default()
        .momentum_grid(1e-6, 1e3, 300)
        .time_grid(1e-3, 1e3, 1500)
        .snapshots_at(vec![0.03, 0.1, 0.3, 1.0, 3.0, 10.0, 100.0, 1000.0]);

    for transport in [TransportForm::Liouville, TransportForm::Conservative] {
        let config = config.clone().transport(transport);
        let result = march_pde_with_rates(&config, rates.clone())?;

        println!("Transport form: {}", transport);
        print_spectra(&result, rates.as_ref(), &config);
        println!(
            "\n  Y integrated = {:.4e}, Y source = {:.4e}\n",
            result.final_yield,
            result.final_source_yield()
        );

        let path = std::env::temp_dir().join(format!("freezein_spectra_{}.csv", transport));
        CsvExporter::default()
            .with_result_metadata()
            .export_snapshots(&result, &path.to_string_lossy())?;
        println!("  Spectra exported to {}\n", path.display());
    }

    println!("The request at x = 1000 hits the last mark and is never captured:");
    println!("snapshots are taken before each step.");

    Ok(())
}
