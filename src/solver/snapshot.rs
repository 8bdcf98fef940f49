//! Field snapshots at requested coordinates
//!
//! Requests are sorted, de-duplicated and mapped once to the first time mark
//! at or after them. The march then pops requests off the front of the
//! worklist as the step index reaches them, so checking for due snapshots
//! costs O(1) per step.
//!
//! A request beyond the last step is never met and is dropped silently.

use std::collections::VecDeque;

use nalgebra::DVector;

use crate::solver::TimeGrid;

/// Copy of the field taken during the march
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Coordinate the caller asked for
    pub requested_x: f64,

    /// Coordinate actually reached (`≥ requested_x` unless the request
    /// precedes the start of the march)
    pub x: f64,

    /// Momentum cell centers
    pub momentum: DVector<f64>,

    /// Field at `x`
    pub field: DVector<f64>,
}

impl Snapshot {
    /// Capture independent copies of `momentum` and `field`
    pub fn capture(requested_x: f64, x: f64, momentum: &DVector<f64>, field: &DVector<f64>) -> Self {
        Self {
            requested_x,
            x,
            momentum: momentum.clone(),
            field: field.clone(),
        }
    }
}

/// Sorted worklist of pending snapshot requests
#[derive(Debug, Clone, Default)]
pub struct SnapshotSchedule {
    pending: VecDeque<(usize, f64)>,
}

impl SnapshotSchedule {
    /// Map every distinct request to its time-mark index
    ///
    /// Indices are clipped to the last mark.
    pub fn new(requested: &[f64], marks: &TimeGrid) -> Self {
        let mut sorted: Vec<f64> = requested.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();

        let last = marks.len() - 1;
        let pending = sorted
            .into_iter()
            .map(|x| (marks.index_at_or_after(x).min(last), x))
            .collect();

        Self { pending }
    }

    /// Requests not captured yet
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return, in order, every request due at step `step`
    pub fn take_due(&mut self, step: usize) -> impl Iterator<Item = f64> + '_ {
        std::iter::from_fn(move || {
            let (index, _) = *self.pending.front()?;
            if index <= step {
                self.pending.pop_front().map(|(_, x)| x)
            } else {
                None
            }
        })
    }

    /// Requests still pending, in order
    pub fn remaining(&self) -> Vec<f64> {
        self.pending.iter().map(|&(_, x)| x).collect()
    }
}
