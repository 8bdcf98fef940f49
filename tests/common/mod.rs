//! Common utilities for integration tests

pub mod mock_rates;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_rates::ScalingRates;
pub use test_helpers::{
    assert_monotone_non_decreasing,
    relative_error,
    scaling_configuration,
};
