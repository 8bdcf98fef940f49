//! Helper functions for integration tests

use freezein_rs::solver::{ReconstructionScheme, SolverConfiguration, TimeIntegrator};

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-300 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Configuration for [`ScalingRates`](super::ScalingRates) runs
///
/// Unit mass, march from `x = 1` to `x = 100` without pre-integration, so
/// injected particles at `p = 1` stay well inside `[1e-4, 1e2]`.
pub fn scaling_configuration(
    time_points: usize,
    integrator: TimeIntegrator,
    scheme: ReconstructionScheme,
) -> SolverConfiguration {
    SolverConfiguration::default()
        .mass(1.0)
        .momentum_grid(1e-4, 1e2, 100)
        .time_grid(1.0, 100.0, time_points)
        .injection_width(0.2)
        .switch_at(1.0)
        .scheme(scheme)
        .integrator(integrator)
}

/// Assert that `values` never decreases (up to a relative `slack`)
pub fn assert_monotone_non_decreasing(values: &[f64], slack: f64, message: &str) {
    for (i, pair) in values.windows(2).enumerate() {
        assert!(
            pair[1] >= pair[0] - slack * pair[0].abs(),
            "{}: value {} at index {} drops to {}",
            message, pair[0], i, pair[1]
        );
    }
}
