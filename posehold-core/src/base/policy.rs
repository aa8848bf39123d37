//! Policy.
use ndarray::{Array1, ArrayView1};

/// A policy on an environment.
///
/// Policy is a mapping from an observation to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy {
    /// Sample an action given an observation.
    fn sample(&mut self, obs: ArrayView1<f32>) -> Array1<f32>;
}
