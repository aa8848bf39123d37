//! Utilities for interaction of policies and environments.
use crate::{
    record::{NullRecorder, RecordValue, Recorder},
    Env, Policy,
};
use anyhow::Result;
use log::{debug, trace};

/// Runs one episode and returns the sum of rewards.
///
/// The episode starts from `env.reset(seed)` and ends when the environment
/// reports `done` or after `max_steps` steps. At every step a record with the
/// step index, the reward and the metrics of the environment is written to
/// `recorder`.
pub fn rollout<E, P, R>(
    env: &E,
    policy: &mut P,
    seed: u64,
    max_steps: usize,
    recorder: &mut R,
) -> Result<f32>
where
    E: Env + ?Sized,
    P: Policy + ?Sized,
    R: Recorder + ?Sized,
{
    let mut state = env.reset(seed)?;
    let mut episode_return = 0f32;

    for ix in 0..max_steps {
        let act = policy.sample(state.obs.view());
        state = env.step(state, act.view())?;
        episode_return += state.reward;
        trace!("step = {}, reward = {}", ix, state.reward);

        let mut record = state.metrics.clone();
        record.insert("step", RecordValue::Scalar(ix as f32));
        record.insert("reward", RecordValue::Scalar(state.reward));
        recorder.write(record);

        if state.is_done() {
            debug!("Episode terminated at step {}", ix);
            break;
        }
    }

    Ok(episode_return)
}

/// Runs `n_episodes` episodes with seeds `0..n_episodes` and returns their returns.
pub fn eval<E, P>(env: &E, policy: &mut P, n_episodes: usize, max_steps: usize) -> Result<Vec<f32>>
where
    E: Env + ?Sized,
    P: Policy + ?Sized,
{
    let mut recorder = NullRecorder {};
    (0..n_episodes)
        .map(|ix| rollout(env, policy, ix as u64, max_steps, &mut recorder))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::{BufferedRecorder, Record},
        ConfigOverrides, EnvState,
    };
    use ndarray::{array, Array1, ArrayView1};

    /// A point on a line that is pushed by the action; reward is 1 - |x|.
    struct LineEnv {
        limit: f32,
    }

    impl Env for LineEnv {
        type Config = f32;
        type Data = f32;
        type Info = u64;

        fn build(config: &Self::Config, _overrides: Option<&ConfigOverrides>) -> Result<Self> {
            Ok(Self { limit: *config })
        }

        fn reset(&self, rng: u64) -> Result<EnvState<f32, u64>> {
            Ok(EnvState::new(0.0, array![0.0], 0.0, 0, Record::empty(), rng))
        }

        fn step(
            &self,
            state: EnvState<f32, u64>,
            action: ArrayView1<f32>,
        ) -> Result<EnvState<f32, u64>> {
            let x = state.data + action[0];
            let done = if x.abs() >= self.limit { 1 } else { 0 };
            let metrics = Record::from_scalar("x", x);
            Ok(EnvState::new(x, array![x], 1.0 - x.abs(), done, metrics, state.info))
        }

        fn observation_size(&self) -> usize {
            1
        }

        fn action_size(&self) -> usize {
            1
        }
    }

    struct ConstantPolicy(f32);

    impl Policy for ConstantPolicy {
        fn sample(&mut self, _obs: ArrayView1<f32>) -> Array1<f32> {
            array![self.0]
        }
    }

    #[test]
    fn test_rollout_stops_when_done() -> Result<()> {
        let env = LineEnv::build(&1.0, None)?;
        let mut recorder = BufferedRecorder::new();
        let ret = rollout(&env, &mut ConstantPolicy(0.25), 0, 100, &mut recorder)?;

        // x = 0.25, 0.5, 0.75, 1.0
        assert_eq!(recorder.len(), 4);
        assert!((ret - (0.75 + 0.5 + 0.25 + 0.0)).abs() < 1e-6);
        let last = recorder.iter().last().unwrap();
        assert_eq!(last.get_scalar("step")?, 3.0);
        assert_eq!(last.get_scalar("x")?, 1.0);
        Ok(())
    }

    #[test]
    fn test_eval_respects_max_steps() -> Result<()> {
        let env = LineEnv::build(&10.0, None)?;
        let returns = eval(&env, &mut ConstantPolicy(0.0), 3, 5)?;
        assert_eq!(returns, vec![5.0, 5.0, 5.0]);
        Ok(())
    }
}
