//! Trapezoidal quadrature on non-uniform nodes
//!
//! Every yield in the crate is a trapezoidal `p²`-moment over the momentum
//! cell centers. Using one routine for the source normalization and for the
//! diagnostics keeps them consistent with each other.

/// Trapezoidal integral of `y` sampled at the nodes `x`
///
/// Returns 0 for fewer than two nodes.
///
/// # Panics
///
/// Panics if `y` and `x` differ in length.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    assert_eq!(
        y.len(),
        x.len(),
        "trapezoid: {} samples for {} nodes",
        y.len(),
        x.len()
    );

    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (ys[0] + ys[1]) * (xs[1] - xs[0]))
        .sum()
}

/// Per-node weights of the trapezoidal rule on the nodes `x`
///
/// `Σ w_i y_i` equals [`trapezoid`]`(y, x)`. Interior nodes carry half the
/// distance between their neighbours, the two end nodes half their single
/// interval. All weights are zero for fewer than two nodes.
pub fn trapezoid_weights(x: &[f64]) -> Vec<f64> {
    let mut weights = vec![0.0; x.len()];

    for (i, pair) in x.windows(2).enumerate() {
        let half = 0.5 * (pair[1] - pair[0]);
        weights[i] += half;
        weights[i + 1] += half;
    }

    weights
}

/// Trapezoidal integral of `p² · values(p)` over the nodes `momenta`
///
/// # Panics
///
/// Panics if the two slices differ in length.
pub fn momentum_moment(values: &[f64], momenta: &[f64]) -> f64 {
    assert_eq!(
        values.len(),
        momenta.len(),
        "momentum_moment: {} values for {} momenta",
        values.len(),
        momenta.len()
    );

    let weighted: Vec<f64> = values
        .iter()
        .zip(momenta)
        .map(|(value, p)| p * p * value)
        .collect();

    trapezoid(&weighted, momenta)
}
