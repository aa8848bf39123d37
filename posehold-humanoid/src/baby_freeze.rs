//! Humanoid holding a static "baby freeze" pose.
use crate::{
    base::{HumanoidBase, HumanoidInfo, HumanoidState},
    config::{self, HumanoidConfig},
    sim::{JointSpaceSimulator, SimData, Simulator},
};
use anyhow::Result;
use log::debug;
use ndarray::{Array1, ArrayView1};
use posehold_core::{
    record::{Record, RecordValue},
    reward::{Sigmoid, Tolerance},
    ConfigOverrides, Env, EnvState,
};

/// Name under which the environment is registered.
pub const ENV_NAME: &str = "HumanoidBabyFreeze";

/// Metric key of the pose term of the reward.
pub const METRIC_POSE: &str = "reward/pose";

/// Metric key of the control term of the reward.
pub const METRIC_SMALL_CONTROL: &str = "reward/small_control";

/// Root position of the target pose.
pub const TARGET_POS: [f32; 3] = [0.0, 0.0, 0.3];

/// Root orientation `(w, x, y, z)` of the target pose: lying on the side,
/// rotated by -90 degrees about the y axis.
pub const TARGET_QUAT: [f32; 4] = [
    std::f32::consts::FRAC_1_SQRT_2,
    0.0,
    -std::f32::consts::FRAC_1_SQRT_2,
    0.0,
];

/// Default configuration of [`HumanoidBabyFreeze`].
pub fn default_config() -> HumanoidConfig {
    config::default_config()
}

/// Target coordinates: the root at [`TARGET_POS`] and [`TARGET_QUAT`],
/// all joints at zero.
pub fn target_qpos(nq: usize) -> Array1<f32> {
    let mut qpos = Array1::zeros(nq);
    for (i, v) in TARGET_POS.iter().chain(TARGET_QUAT.iter()).enumerate() {
        qpos[i] = *v;
    }
    qpos
}

/// A humanoid rewarded for holding the baby freeze pose with as little
/// actuation as possible.
///
/// The reward is the product of a pose term and a control term:
///
/// * pose: tolerance of the mean squared error between `qpos` and the target
///   pose, 1 up to an error of 0.01, decaying quadratically to 0 at 1.01.
/// * small control: mean over actuators of `max(0, 1 - a^2)`.
///
/// Episodes always start exactly at the target pose.
pub struct HumanoidBabyFreeze<S = JointSpaceSimulator> {
    base: HumanoidBase<S>,
    target_qpos: Array1<f32>,
    pose_tolerance: Tolerance,
    control_tolerance: Tolerance,
}

impl<S: Simulator> HumanoidBabyFreeze<S> {
    /// Constructs the environment.
    ///
    /// [`default_config`] is used if `config` is `None`.
    pub fn new(
        config: Option<HumanoidConfig>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self> {
        let config = config.unwrap_or_else(default_config);
        let base = HumanoidBase::new(config, overrides, 0.0)?;
        Self::from_base(base)
    }

    /// Constructs the environment on an existing base.
    pub fn from_base(base: HumanoidBase<S>) -> Result<Self> {
        let target_qpos = target_qpos(base.model().nq());
        let pose_tolerance = Tolerance::new((0.0, 0.01), 1.0, Sigmoid::Quadratic, 0.0)?;
        let control_tolerance = Tolerance::new((0.0, 0.0), 1.0, Sigmoid::Quadratic, 0.0)?;

        Ok(Self {
            base,
            target_qpos,
            pose_tolerance,
            control_tolerance,
        })
    }

    /// The base environment.
    pub fn base(&self) -> &HumanoidBase<S> {
        &self.base
    }

    /// The target generalized coordinates.
    pub fn target_qpos(&self) -> &Array1<f32> {
        &self.target_qpos
    }

    /// Mean squared deviation of `qpos` from the target pose.
    pub fn pose_error(&self, qpos: ArrayView1<f32>) -> f32 {
        let diff = &qpos - &self.target_qpos;
        diff.mapv(|v| v * v).mean().unwrap_or(0.0)
    }

    /// Computes the reward of `data` reached with `action`.
    ///
    /// Writes the pose and control terms to `metrics` under [`METRIC_POSE`]
    /// and [`METRIC_SMALL_CONTROL`].
    pub fn compute_reward(
        &self,
        data: &SimData,
        action: ArrayView1<f32>,
        metrics: &mut Record,
    ) -> f32 {
        let pose_reward = self.pose_tolerance.eval(self.pose_error(data.qpos.view()));
        metrics.insert(METRIC_POSE, RecordValue::Scalar(pose_reward));

        let small_control = self.control_tolerance.eval_mean(action);
        metrics.insert(METRIC_SMALL_CONTROL, RecordValue::Scalar(small_control));

        pose_reward * small_control
    }
}

impl<S: Simulator> Env for HumanoidBabyFreeze<S> {
    type Config = HumanoidConfig;
    type Data = SimData;
    type Info = HumanoidInfo;

    fn build(config: &Self::Config, overrides: Option<&ConfigOverrides>) -> Result<Self> {
        Self::new(Some(config.clone()), overrides)
    }

    /// Starts an episode at the target pose.
    ///
    /// The pose does not depend on `rng`, which is only kept in the info.
    fn reset(&self, rng: u64) -> Result<HumanoidState> {
        let mut data = self.base.init_data();
        data.qpos.assign(&self.target_qpos);

        let metrics = Record::from_slice(&[
            (METRIC_POSE, RecordValue::Scalar(0.0)),
            (METRIC_SMALL_CONTROL, RecordValue::Scalar(0.0)),
        ]);
        let info = HumanoidInfo { rng };
        let obs = self.base.get_obs(&data, &info);
        debug!("Reset {} with rng = {}", ENV_NAME, rng);

        Ok(EnvState::new(data, obs, 0.0, 0, metrics, info))
    }

    fn step(&self, state: HumanoidState, action: ArrayView1<f32>) -> Result<HumanoidState> {
        self.base.step(state, action, |data, action, metrics| {
            self.compute_reward(data, action, metrics)
        })
    }

    fn observation_size(&self) -> usize {
        self.base.observation_size()
    }

    fn action_size(&self) -> usize {
        self.base.model().nu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HumanoidModel, ROOT_NQ};

    fn env() -> Result<HumanoidBabyFreeze> {
        HumanoidBabyFreeze::new(None, None)
    }

    fn data_with_qpos(env: &HumanoidBabyFreeze, qpos: Array1<f32>) -> SimData {
        let mut data = env.base().init_data();
        data.qpos = qpos;
        data
    }

    #[test]
    fn test_target_pose() -> Result<()> {
        let env = env()?;
        let target = env.target_qpos();
        let h = 0.5f32.sqrt();
        assert_eq!(target.len(), 28);
        assert_eq!(target.slice(ndarray::s![0..3]), ndarray::array![0.0f32, 0.0, 0.3]);
        assert!((target[3] - h).abs() < 1e-7);
        assert_eq!(target[4], 0.0);
        assert!((target[5] + h).abs() < 1e-7);
        assert_eq!(target[6], 0.0);
        assert!(target.slice(ndarray::s![ROOT_NQ..]).iter().all(|&v| v == 0.0));
        let norm = target.slice(ndarray::s![3..7]).mapv(|v| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_target_pose_follows_model() -> Result<()> {
        let mut model = HumanoidModel::builtin()?;
        model.joints.truncate(5);
        let sim = JointSpaceSimulator::build(model, 0.005)?;
        let base = HumanoidBase::with_simulator(default_config(), sim, 0.0)?;
        let env = HumanoidBabyFreeze::from_base(base)?;
        assert_eq!(env.target_qpos().len(), 12);
        assert_eq!(env.target_qpos()[2], 0.3);
        Ok(())
    }

    #[test]
    fn test_reward_at_target_is_one() -> Result<()> {
        let env = env()?;
        let data = data_with_qpos(&env, env.target_qpos().clone());
        let mut metrics = Record::empty();
        let r = env.compute_reward(&data, Array1::zeros(21).view(), &mut metrics);
        assert_eq!(r, 1.0);
        assert_eq!(metrics.get_scalar(METRIC_POSE)?, 1.0);
        assert_eq!(metrics.get_scalar(METRIC_SMALL_CONTROL)?, 1.0);
        Ok(())
    }

    #[test]
    fn test_reward_vanishes_beyond_margin() -> Result<()> {
        let env = env()?;
        // error = 28 * 1.01^2 / 28 > 1.01
        let qpos = env.target_qpos() + 1.01;
        let data = data_with_qpos(&env, qpos);
        assert!(env.pose_error(data.qpos.view()) >= 1.01);
        for a in [0.0f32, 0.3, 1.0].iter() {
            let mut metrics = Record::empty();
            let action = Array1::from_elem(21, *a);
            assert_eq!(env.compute_reward(&data, action.view(), &mut metrics), 0.0);
            assert_eq!(metrics.get_scalar(METRIC_POSE)?, 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_reward_is_monotone() -> Result<()> {
        let env = env()?;
        let mut metrics = Record::empty();

        // pose error grows with the offset for a fixed action
        let action = Array1::from_elem(21, 0.2);
        let mut prev = f32::INFINITY;
        for i in 0..60 {
            let data = data_with_qpos(&env, env.target_qpos() + i as f32 * 0.02);
            let r = env.compute_reward(&data, action.view(), &mut metrics);
            assert!(r <= prev);
            prev = r;
        }
        assert_eq!(prev, 0.0);

        // action magnitude grows for a fixed pose error
        let data = data_with_qpos(&env, env.target_qpos() + 0.2);
        let mut prev = f32::INFINITY;
        for i in 0..=12 {
            let a = i as f32 * 0.1;
            for sign in [1.0f32, -1.0].iter() {
                let action = Array1::from_elem(21, sign * a);
                let r = env.compute_reward(&data, action.view(), &mut metrics);
                assert!(r <= prev + 1e-7);
                assert!((0.0..=1.0).contains(&r));
            }
            prev = env.compute_reward(&data, Array1::from_elem(21, a).view(), &mut metrics);
        }
        assert_eq!(prev, 0.0);
        Ok(())
    }

    #[test]
    fn test_small_control_is_mean_over_actuators() -> Result<()> {
        let env = env()?;
        let data = data_with_qpos(&env, env.target_qpos().clone());
        let mut action = Array1::zeros(21);
        action[0] = 0.5;
        action[1] = -2.0;
        let mut metrics = Record::empty();
        let r = env.compute_reward(&data, action.view(), &mut metrics);
        let expected = (19.0 + 0.75 + 0.0) / 21.0;
        assert!((r - expected).abs() < 1e-6);
        assert!((metrics.get_scalar(METRIC_SMALL_CONTROL)? - expected).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_metrics_keys() -> Result<()> {
        let env = env()?;
        let mut state = env.reset(3)?;
        let action = Array1::from_elem(21, 0.1);
        for _ in 0..5 {
            state = env.step(state, action.view())?;
            let mut keys: Vec<_> = state.metrics.keys().cloned().collect();
            keys.sort();
            assert_eq!(keys, vec![METRIC_POSE, METRIC_SMALL_CONTROL]);
            for k in keys.iter() {
                let v = state.metrics.get_scalar(k)?;
                assert!((0.0..=1.0).contains(&v));
            }
        }
        Ok(())
    }

    #[test]
    fn test_reset_is_deterministic() -> Result<()> {
        let env = env()?;
        let s1 = env.reset(1)?;
        let s2 = env.reset(12345)?;
        assert_eq!(s1.data.qpos, s2.data.qpos);
        assert_eq!(&s1.data.qpos, env.target_qpos());
        assert_eq!(s1.obs, s2.obs);
        assert_eq!(s1.info.rng, 1);
        assert_eq!(s2.info.rng, 12345);
        assert!(s1.data.qvel.iter().all(|&v| v == 0.0));
        assert_eq!(s1.metrics.get_scalar(METRIC_POSE)?, 0.0);
        assert_eq!(s1.metrics.get_scalar(METRIC_SMALL_CONTROL)?, 0.0);
        Ok(())
    }
}
