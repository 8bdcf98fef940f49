//! Performance benchmarks for the freeze-in march
//!
//! # What We're Measuring
//!
//! 1. **Right-hand side** (`FreezeInTransport::evaluate`):
//!    - reconstruction, fluxes, source term, per-cell assembly
//!    - first-order vs MUSCL on the same field
//!
//! 2. **Full march** (`PdeSolver::solve`):
//!    - Forward Euler: 1 evaluation per step
//!    - Heun (RK2): 2 evaluations per step
//!
//! # Expected Results
//!
//! **Performance ratio**: RK2 ≈ 2× slower than Euler
//! - RK2 does 2 evaluations vs Euler's 1
//! - Linear scaling with momentum cells and with time marks
//!
//! MUSCL costs one extra pass over the cells (slopes) compared with
//! first-order reconstruction; the source term, with one `exp` per cell,
//! usually dominates both.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench --bench solver_performance
//!
//! # Right-hand side only
//! cargo bench --bench solver_performance "Right-hand side"
//!
//! # With Rayon above the parallel threshold
//! cargo bench --bench solver_performance --features parallel
//! ```

use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nalgebra::DVector;

use freezein_rs::models::{FreezeInTransport, SpectralInjection};
use freezein_rs::physics::{RateFunctions, StandardCosmology};
use freezein_rs::solver::{
    build_momentum_grid, PdeSolver, ReconstructionScheme, Scenario, SolverConfiguration,
    TimeIntegrator, TransportModel,
};

// =================================================================================================
// Setup Helpers
// =================================================================================================

fn rates() -> Arc<dyn RateFunctions> {
    Arc::new(StandardCosmology::default())
}

/// Transport model on the default momentum range with `cells` cells
fn transport(cells: usize, scheme: ReconstructionScheme) -> FreezeInTransport {
    let config = SolverConfiguration::default();
    let grid = build_momentum_grid(config.p_min, config.p_max, cells, true).unwrap();

    FreezeInTransport::new(grid, rates(), SpectralInjection::default(), config.mass, config.dof)
        .with_scheme(scheme)
}

/// Smooth, strictly positive field resembling a redshifted spectrum
fn sample_field(model: &FreezeInTransport) -> DVector<f64> {
    model.momentum().map(|p| 1e-7 * (-(p.ln() - 1.0).powi(2) / 4.0).exp())
}

// =================================================================================================
// Benchmark Functions
// =================================================================================================

/// One right-hand side evaluation, first-order vs MUSCL
///
/// # Expected Scaling
///
/// Linear in the number of cells:
///
/// ```text
/// cells=150:   baseline
/// cells=600:   ~4×
/// cells=2400:  ~16× (Rayon takes over above the threshold with `parallel`)
/// ```
fn benchmark_right_hand_side(c: &mut Criterion) {
    let mut group = c.benchmark_group("Right-hand side");

    for cells in [150, 600, 2400] {
        group.throughput(Throughput::Elements(cells as u64));

        for scheme in [ReconstructionScheme::FirstOrder, ReconstructionScheme::Muscl] {
            let model = transport(cells, scheme);
            let field = sample_field(&model);

            group.bench_with_input(BenchmarkId::new(scheme.name(), cells), &cells, |b, _| {
                b.iter(|| model.evaluate(black_box(&field), black_box(0.3)));
            });
        }
    }

    group.finish();
}

/// Complete march, Euler vs RK2
///
/// # Test Strategy
///
/// Configurations from quick exploration to the reference resolution:
///
/// 1. **Small** (150 cells, 750 marks)
/// 2. **Medium** (300 cells, 1500 marks)
/// 3. **Reference** (600 cells, 3000 marks)
///
/// Throughput is reported as cell updates (cells × steps × evaluations), so
/// both integrators should show about the same Melem/s.
fn benchmark_march(c: &mut Criterion) {
    let mut group = c.benchmark_group("March");

    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    let configurations = [(150, 750, "small"), (300, 1500, "medium"), (600, 3000, "reference")];

    for (cells, marks, label) in configurations {
        let config = SolverConfiguration::default()
            .momentum_grid(1e-6, 1e3, cells)
            .time_grid(1e-3, 1e3, marks);
        let scenario = Scenario::from_configuration(&config, rates()).unwrap();
        let steps = marks - 1 - scenario.start_index();

        for integrator in [TimeIntegrator::Euler, TimeIntegrator::Rk2] {
            let solver = PdeSolver::new(integrator);
            let evaluations = if integrator == TimeIntegrator::Euler { 1 } else { 2 };

            group.throughput(Throughput::Elements((cells * steps * evaluations) as u64));
            group.bench_function(
                format!("{} {} ({} cells & {} marks)", solver.name(), label, cells, marks),
                |b| {
                    b.iter(|| solver.solve(black_box(&scenario)).unwrap());
                },
            );
        }
    }

    group.finish();
}

// =================================================================================================
// Criterion Configuration
// =================================================================================================

criterion_group!(benches, benchmark_right_hand_side, benchmark_march);
criterion_main!(benches);
