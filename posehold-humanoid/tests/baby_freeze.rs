use anyhow::Result;
use ndarray::Array1;
use posehold_core::{
    record::{BufferedRecorder, RecordValue},
    util::rollout,
    ConfigOverrides, Env, Policy, PoseholdError, Registry,
};
use posehold_humanoid::{
    baby_freeze::default_config, register_environments, HumanoidBabyFreeze, HumanoidEnv,
    ENV_NAME, METRIC_POSE, METRIC_SMALL_CONTROL,
};
use serde_yaml::Value;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct ZeroPolicy(usize);

impl Policy for ZeroPolicy {
    fn sample(&mut self, _obs: ndarray::ArrayView1<f32>) -> Array1<f32> {
        Array1::zeros(self.0)
    }
}

struct RandomPolicy {
    n: usize,
    scale: f32,
}

impl Policy for RandomPolicy {
    fn sample(&mut self, _obs: ndarray::ArrayView1<f32>) -> Array1<f32> {
        (0..self.n)
            .map(|_| (fastrand::f32() * 2.0 - 1.0) * self.scale)
            .collect()
    }
}

#[test]
fn test_reset_then_reward_at_reset_pose() -> Result<()> {
    init_logger();
    let env: HumanoidBabyFreeze = HumanoidBabyFreeze::build(&default_config(), None)?;
    let state = env.reset(7)?;
    assert_eq!(state.done, 0);
    assert_eq!(state.reward, 0.0);
    assert_eq!(state.obs.len(), env.observation_size());

    let mut metrics = state.metrics.clone();
    let action = Array1::zeros(env.action_size());
    let r = env.compute_reward(&state.data, action.view(), &mut metrics);
    assert!((r - 1.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_registry() -> Result<()> {
    init_logger();
    let mut registry = Registry::<HumanoidEnv>::new();
    register_environments(&mut registry);
    assert_eq!(registry.names(), vec![ENV_NAME]);
    assert_eq!(registry.default_config(ENV_NAME)?, default_config());

    let env = registry.load(ENV_NAME, None, None)?;
    assert_eq!(env.action_size(), 21);
    let state = env.reset(0)?;
    let state = env.step(state, Array1::zeros(21).view())?;
    assert_eq!(state.done, 0);
    assert!(state.reward > 0.0 && state.reward <= 1.0);

    let err = registry.load("HumanoidBackflip", None, None).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<PoseholdError>(),
        Some(PoseholdError::UnknownEnvironment(_))
    ));
    Ok(())
}

#[test]
fn test_registry_with_overrides() -> Result<()> {
    let mut registry = Registry::<HumanoidEnv>::new();
    register_environments(&mut registry);

    let mut overrides = ConfigOverrides::new();
    overrides.insert("ctrl_dt".to_string(), Value::from(0.05f64));
    let env = registry.load(ENV_NAME, None, Some(&overrides))?;
    let state = env.step(env.reset(0)?, Array1::zeros(21).view())?;
    assert!((state.data.time - 0.05).abs() < 1e-5);

    overrides.insert("vision".to_string(), Value::from(true));
    assert!(registry.load(ENV_NAME, None, Some(&overrides)).is_err());
    Ok(())
}

#[test]
fn test_holding_still_beats_flailing() -> Result<()> {
    init_logger();
    fastrand::seed(42);
    let env: HumanoidBabyFreeze = HumanoidBabyFreeze::build(&default_config(), None)?;
    let max_steps = 40;

    let mut recorder = BufferedRecorder::new();
    let still = rollout(&env, &mut ZeroPolicy(21), 0, max_steps, &mut recorder)?;
    assert_eq!(recorder.len(), max_steps);
    for record in recorder.iter() {
        assert!(matches!(record.get(METRIC_POSE), Some(RecordValue::Scalar(_))));
        assert_eq!(record.get_scalar(METRIC_SMALL_CONTROL)?, 1.0);
    }

    let mut policy = RandomPolicy { n: 21, scale: 1.0 };
    let flailing = rollout(&env, &mut policy, 0, max_steps, &mut recorder)?;
    assert!(still > flailing, "{} <= {}", still, flailing);

    let summary = recorder.into_storage().aggregate();
    assert!(summary.get_scalar("reward_mean").is_ok());
    Ok(())
}
