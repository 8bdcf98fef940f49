//! Integration tests: rate functions + transport model + march
//!
//! These tests run complete marches through the public API and check the
//! physical contracts of the result.

use std::sync::Arc;

use approx::assert_relative_eq;
use nalgebra::DVector;

use freezein_rs::models::{FreezeInTransport, SpectralInjection, TransportForm};
use freezein_rs::physics::StandardCosmology;
use freezein_rs::reference::solve_reference;
use freezein_rs::solver::{
    build_momentum_grid, build_time_grid, march_pde, march_pde_with_rates, ReconstructionScheme,
    SimulationResult, SolverConfiguration, SolverError, TimeIntegrator, TransportModel,
};

mod common;
use common::{assert_monotone_non_decreasing, relative_error, scaling_configuration, ScalingRates};

/// Full-resolution run: m = 10, Np = 600, Nx = 3000, MUSCL, RK2, x_switch = 1e-2
fn default_run(snapshots: Vec<f64>) -> SimulationResult {
    let config = SolverConfiguration::default().snapshots_at(snapshots);
    march_pde(&config).unwrap()
}

// =================================================================================================
// End-to-end
// =================================================================================================

#[test]
fn test_default_run_matches_reduced_equation() {
    let config = SolverConfiguration::default();
    let result = default_run(Vec::new());
    let reference = solve_reference(
        &StandardCosmology::default(),
        config.mass,
        config.x_min,
        config.x_max,
        config.time_points,
    )
    .unwrap();

    println!(
        "Y_final = {:e}, Y_src = {:e}, Y_ref = {:e}",
        result.final_yield,
        result.final_source_yield(),
        reference.final_yield()
    );

    assert!(result.final_yield.is_finite());
    assert!(result.final_yield > 0.0);
    assert!(relative_error(result.final_source_yield(), reference.final_yield()) < 1e-3);
    assert!(relative_error(result.final_yield, reference.final_yield()) < 1e-2);
    assert!(result.yield_discrepancy() < 1e-2);
}

#[test]
fn test_default_run_histories() {
    let result = default_run(Vec::new());

    assert_eq!(result.x[0], 1e-2);
    assert_eq!(*result.x.last().unwrap(), 1e3);
    assert_eq!(result.len(), result.integrated_yield.len());
    assert_eq!(result.len(), result.source_yield.len());
    assert_eq!(result.final_yield, *result.integrated_yield.last().unwrap());

    // Source-only yield is a sum of non-negative increments
    assert_monotone_non_decreasing(&result.source_yield, 0.0, "source yield");
    assert!(result.field.iter().all(|f| f.is_finite()));

    assert_eq!(result.metadata.get("integrator").unwrap(), "Runge-Kutta 2 (Heun)");
    assert_eq!(result.metadata.get("scheme").unwrap(), "muscl");
    assert_eq!(result.metadata.get("transport").unwrap(), "liouville");
}

// =================================================================================================
// Snapshots
// =================================================================================================

#[test]
fn test_snapshot_contract() {
    let requested = vec![1.0, 1e-2, 1e-1];
    let result = default_run(requested);

    assert_eq!(result.snapshots.len(), 3);

    let taken: Vec<f64> = result.snapshots.iter().map(|s| s.requested_x).collect();
    assert_eq!(taken, vec![1e-2, 1e-1, 1.0]);

    for snapshot in &result.snapshots {
        assert!(snapshot.x >= snapshot.requested_x);
        assert_eq!(snapshot.momentum.len(), 600);
        assert_eq!(snapshot.field.len(), 600);
        assert_eq!(&snapshot.momentum, &result.momentum);
    }

    // The march starts from an empty field
    assert!(result.snapshot(1e-2).unwrap().field.iter().all(|&f| f == 0.0));

    // Independent copies, not views of the evolving field
    let early = &result.snapshot(1e-1).unwrap().field;
    let late = &result.snapshot(1.0).unwrap().field;
    assert_ne!(early, late);
    assert_ne!(late, &result.field);
}

#[test]
fn test_snapshot_requests_beyond_grid_are_dropped() {
    let config = scaling_configuration(101, TimeIntegrator::Rk2, ReconstructionScheme::Muscl)
        .snapshots_at(vec![10.0, 1e6]);
    let result = march_pde_with_rates(&config, Arc::new(ScalingRates::new(1.0))).unwrap();

    assert_eq!(result.snapshots.len(), 1);
    assert!(result.snapshot(10.0).is_some());
    assert!(result.snapshot(1e6).is_none());
}

// =================================================================================================
// Pre-integration
// =================================================================================================

#[test]
fn test_switch_at_first_mark_skips_pre_integration() {
    let config = scaling_configuration(101, TimeIntegrator::Euler, ReconstructionScheme::FirstOrder);
    let result = march_pde_with_rates(&config, Arc::new(ScalingRates::new(1.0))).unwrap();

    assert_eq!(result.integrated_yield[0], 0.0);
    assert_eq!(result.source_yield[0], 0.0);
    assert_eq!(result.steps(), 100);
}

#[test]
fn test_pre_integration_seeds_source_yield() {
    // dY/dx = c/x: trapezoids up to the mark before the switch, then a
    // left-point rectangle; close to c ln(x_switch) on a fine grid
    let config = scaling_configuration(2001, TimeIntegrator::Rk2, ReconstructionScheme::Muscl)
        .switch_at(10.0);
    let result = march_pde_with_rates(&config, Arc::new(ScalingRates::new(1.0))).unwrap();

    assert_eq!(result.x[0], 10.0);
    assert_relative_eq!(result.source_yield[0], 10f64.ln(), max_relative = 1e-3);
    assert_eq!(result.integrated_yield[0], result.source_yield[0]);
    assert!(result.integrated_yield[1] < result.integrated_yield[0]);
}

// =================================================================================================
// Grids and transport
// =================================================================================================

#[test]
fn test_default_momentum_grid_invariants() {
    let grid = build_momentum_grid(1e-6, 1e3, 600, true).unwrap();

    assert_eq!(grid.edges().len(), 601);
    assert_eq!(grid.centers().len(), 600);
    assert_eq!(grid.widths().len(), 600);
    assert_eq!(grid.edges()[0], 1e-6);
    assert_eq!(grid.edges()[600], 1e3);

    for i in 0..600 {
        assert!(grid.edges()[i + 1] > grid.edges()[i]);
        assert!(grid.widths()[i] > 0.0);
        assert!(grid.centers()[i] > grid.edges()[i] && grid.centers()[i] < grid.edges()[i + 1]);
    }
    assert_relative_eq!(grid.widths().sum(), 1e3 - 1e-6, max_relative = 1e-12);
}

#[test]
fn test_invalid_grids_are_rejected() {
    assert!(matches!(build_momentum_grid(0.0, 1e3, 10, true), Err(SolverError::InvalidGridSpec { .. })));
    assert!(matches!(build_momentum_grid(1.0, 1.0, 10, true), Err(SolverError::InvalidGridSpec { .. })));
    assert!(matches!(build_time_grid(1e-3, 1e3, 1), Err(SolverError::InvalidGridSpec { .. })));

    let config = SolverConfiguration::default().momentum_grid(1e3, 1e-6, 600);
    assert!(matches!(march_pde(&config), Err(SolverError::InvalidGridSpec { .. })));

    // The default switch 1e-2 is outside these bounds too; the grid error comes first
    let config = SolverConfiguration::default().time_grid(1e3, 1e-3, 3000);
    assert!(matches!(march_pde(&config), Err(SolverError::InvalidGridSpec { .. })));
}

#[test]
fn test_conservative_form_conserves_cell_sum() {
    // No production: Σ w·rate equals the net boundary flux
    let grid = build_momentum_grid(1e-3, 1e2, 80, true).unwrap();
    let widths = grid.widths().clone();
    let field = grid.centers().map(|p| (-(p.ln() - 0.5).powi(2)).exp());

    for scheme in [ReconstructionScheme::FirstOrder, ReconstructionScheme::Muscl] {
        let model = FreezeInTransport::new(
            grid.clone(),
            Arc::new(ScalingRates::new(0.0)),
            SpectralInjection::default(),
            1.0,
            2.0,
        )
        .with_scheme(scheme)
        .with_transport(TransportForm::Conservative);

        let x = 3.0;
        let rate = model.evaluate(&field, x).rate;
        let flux = model.face_fluxes(&field, x);

        let total: f64 = rate.iter().zip(widths.iter()).map(|(r, w)| r * w).sum();
        assert_relative_eq!(total, flux[0] - flux[80], epsilon = 1e-12);
    }
}

#[test]
fn test_empty_field_receives_source_only() {
    let config = SolverConfiguration::default();
    let grid = build_momentum_grid(config.p_min, config.p_max, 200, true).unwrap();
    let model = FreezeInTransport::new(
        grid,
        Arc::new(StandardCosmology::default()),
        SpectralInjection::default(),
        config.mass,
        config.dof,
    );

    let x = 0.2;
    let rate = model.evaluate(&DVector::zeros(200), x);
    let source = model.source(x);

    assert_eq!(rate.rate, source.values);
    assert_relative_eq!(rate.source_yield_rate, model.reduced_rhs(x), max_relative = 1e-12);
}

// =================================================================================================
// Selectors
// =================================================================================================

#[test]
fn test_unknown_selectors_are_rejected() {
    assert_eq!(
        "rk4".parse::<TimeIntegrator>(),
        Err(SolverError::UnknownSelector { kind: "time integrator", value: "rk4".to_string() })
    );
    assert!(matches!(
        "weno".parse::<ReconstructionScheme>(),
        Err(SolverError::UnknownSelector { kind: "reconstruction scheme", .. })
    ));
    assert!(matches!(
        "eulerian".parse::<TransportForm>(),
        Err(SolverError::UnknownSelector { kind: "transport form", .. })
    ));

    let error = "rk4".parse::<TimeIntegrator>().unwrap_err();
    assert_eq!(error.to_string(), "unknown time integrator 'rk4'");
}

#[test]
fn test_known_selectors_parse() {
    assert_eq!("RK2".parse::<TimeIntegrator>().unwrap(), TimeIntegrator::Rk2);
    assert_eq!("euler".parse::<TimeIntegrator>().unwrap(), TimeIntegrator::Euler);
    assert_eq!("first-order".parse::<ReconstructionScheme>().unwrap(), ReconstructionScheme::FirstOrder);
    assert_eq!("muscl".parse::<ReconstructionScheme>().unwrap(), ReconstructionScheme::Muscl);
    assert_eq!("conservative".parse::<TransportForm>().unwrap(), TransportForm::Conservative);
}
