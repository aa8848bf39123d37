//! Environment state.
use crate::record::Record;
use ndarray::Array1;

/// The state of an episode at one point in time.
///
/// An environment emits a fresh [`EnvState`] from [`Env::reset`] and replaces
/// it at every call of [`Env::step`].
///
/// [`Env::reset`]: crate::Env::reset
/// [`Env::step`]: crate::Env::step
#[derive(Clone, Debug)]
pub struct EnvState<D, I> {
    /// Simulation data.
    pub data: D,

    /// Observation.
    pub obs: Array1<f32>,

    /// Reward of the last transition, zero right after reset.
    pub reward: f32,

    /// Flag denoting if episode is terminated.
    pub done: i8,

    /// Scalar metrics for observability.
    pub metrics: Record,

    /// Information defined by the environment.
    pub info: I,
}

impl<D, I> EnvState<D, I> {
    /// Constructs an [`EnvState`] object.
    pub fn new(data: D, obs: Array1<f32>, reward: f32, done: i8, metrics: Record, info: I) -> Self {
        Self {
            data,
            obs,
            reward,
            done,
            metrics,
            info,
        }
    }

    #[inline]
    /// Terminated.
    pub fn is_done(&self) -> bool {
        self.done == 1
    }
}
