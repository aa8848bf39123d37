//! Environment.
use super::EnvState;
use crate::config::ConfigOverrides;
use anyhow::Result;
use ndarray::ArrayView1;

/// Represents an environment, typically an MDP.
///
/// Unlike a stateful simulator wrapper, an [`Env`] holds only what is fixed
/// at construction (model, configuration, task constants). Episode state
/// travels in [`EnvState`] values: [`Env::reset`] creates one and
/// [`Env::step`] consumes one and returns its replacement.
///
/// The trait is object safe, so environments with different concrete types
/// but the same associated types can be stored behind `Box<dyn Env<..>>`,
/// as done by [`Registry`](crate::Registry).
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Simulation data carried in [`EnvState`].
    type Data: Clone;

    /// Information carried in [`EnvState`].
    type Info: Clone;

    /// Builds an environment from a configuration and optional overrides.
    fn build(config: &Self::Config, overrides: Option<&ConfigOverrides>) -> Result<Self>
    where
        Self: Sized;

    /// Creates the initial state of an episode.
    ///
    /// `rng` is a seed value. Stochastic environments use it to randomize the
    /// initial state; deterministic ones only keep it in the info.
    fn reset(&self, rng: u64) -> Result<EnvState<Self::Data, Self::Info>>;

    /// Performs an environment step, consuming the current state.
    fn step(
        &self,
        state: EnvState<Self::Data, Self::Info>,
        action: ArrayView1<f32>,
    ) -> Result<EnvState<Self::Data, Self::Info>>;

    /// Dimension of observation vectors.
    fn observation_size(&self) -> usize;

    /// Dimension of action vectors.
    fn action_size(&self) -> usize;
}
