//! Property tests for face reconstruction
//!
//! Minmod-limited MUSCL must never create new extrema: every face value lies
//! between the two cells it separates, whatever the velocity signs.

use approx::assert_relative_eq;
use nalgebra::DVector;
use proptest::prelude::*;

use freezein_rs::solver::{limited_slopes, minmod, reconstruct_first_order, reconstruct_muscl};

/// Field values and one velocity sign per face
fn arb_field_and_signs() -> impl Strategy<Value = (Vec<f64>, Vec<bool>)> {
    prop::collection::vec(-1e3f64..1e3, 1..40).prop_flat_map(|field| {
        let faces = field.len() + 1;
        (Just(field), prop::collection::vec(any::<bool>(), faces))
    })
}

fn velocities(signs: &[bool]) -> DVector<f64> {
    DVector::from_iterator(signs.len(), signs.iter().map(|&up| if up { 1.0 } else { -1.0 }))
}

fn between(value: f64, a: f64, b: f64) -> bool {
    value >= a.min(b) && value <= a.max(b)
}

proptest! {
    #[test]
    fn minmod_is_symmetric_and_bounded(a in -1e6f64..1e6, b in -1e6f64..1e6) {
        let m = minmod(a, b);

        prop_assert_eq!(m, minmod(b, a));
        prop_assert!(m.abs() <= a.abs().min(b.abs()));
        if a * b <= 0.0 {
            prop_assert_eq!(m, 0.0);
        } else {
            prop_assert!(m == a || m == b);
            prop_assert_eq!(m.signum(), a.signum());
        }
    }

    #[test]
    fn muscl_faces_stay_between_neighbours((field, signs) in arb_field_and_signs()) {
        let n = field.len();
        let field = DVector::from_vec(field);
        let faces = reconstruct_muscl(&field, &velocities(&signs));

        prop_assert_eq!(faces.len(), n + 1);
        prop_assert_eq!(faces[0], field[0]);
        prop_assert_eq!(faces[n], field[n - 1]);

        for k in 1..n {
            prop_assert!(
                between(faces[k], field[k - 1], field[k]),
                "face {} = {} outside [{}, {}]", k, faces[k], field[k - 1], field[k]
            );
        }
    }

    #[test]
    fn first_order_faces_copy_upwind_cell((field, signs) in arb_field_and_signs()) {
        let n = field.len();
        let field = DVector::from_vec(field);
        let faces = reconstruct_first_order(&field, &velocities(&signs));

        prop_assert_eq!(faces[0], field[0]);
        prop_assert_eq!(faces[n], field[n - 1]);

        for k in 1..n {
            let expected = if signs[k] { field[k - 1] } else { field[k] };
            prop_assert_eq!(faces[k], expected);
        }
    }

    #[test]
    fn muscl_preserves_monotone_profiles(
        mut field in prop::collection::vec(0.0f64..1e3, 3..40),
        upwind in any::<bool>(),
    ) {
        field.sort_by(f64::total_cmp);
        let n = field.len();
        let field = DVector::from_vec(field);
        let faces = reconstruct_muscl(&field, &velocities(&vec![upwind; n + 1]));

        for k in 0..n {
            prop_assert!(faces[k + 1] >= faces[k]);
        }
    }

    #[test]
    fn slopes_vanish_at_extrema_and_boundaries(field in prop::collection::vec(-1e3f64..1e3, 3..40)) {
        let n = field.len();
        let slopes = limited_slopes(&DVector::from_vec(field.clone()));

        prop_assert_eq!(slopes[0], 0.0);
        prop_assert_eq!(slopes[n - 1], 0.0);

        for i in 1..n - 1 {
            let local_extremum = (field[i] - field[i - 1]) * (field[i + 1] - field[i]) <= 0.0;
            if local_extremum {
                prop_assert_eq!(slopes[i], 0.0);
            }
        }
    }
}

#[test]
fn muscl_is_exact_for_linear_profiles() {
    let field = DVector::from_fn(12, |i, _| 2.0 + 0.5 * i as f64);

    for sign in [1.0, -1.0] {
        let faces = reconstruct_muscl(&field, &DVector::from_element(13, sign));
        // Faces next to a boundary cell see its zero slope
        for k in 2..11 {
            assert_relative_eq!(faces[k], 0.5 * (field[k - 1] + field[k]), epsilon = 1e-12);
        }
    }
}

#[test]
fn short_fields_fall_back_to_first_order() {
    let field = DVector::from_vec(vec![1.0, 4.0]);
    let v = DVector::from_vec(vec![1.0, 1.0, 1.0]);

    assert_eq!(reconstruct_muscl(&field, &v), reconstruct_first_order(&field, &v));
}
