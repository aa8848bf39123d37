//! Humanoid base environment.
use crate::{
    config::HumanoidConfig,
    model::{HumanoidModel, ROOT_NQ},
    sim::{JointSpaceSimulator, SimData, Simulator},
};
use anyhow::Result;
use log::{info, trace};
use ndarray::{s, Array1, ArrayView1};
use posehold_core::{
    config::{apply_overrides, ConfigOverrides},
    record::Record,
    EnvState, PoseholdError,
};

/// Upper bound of simulation steps per environment step.
pub const MAX_SUBSTEPS: u32 = 100_000;

/// Information carried in the state of humanoid environments.
#[derive(Debug, Clone, PartialEq)]
pub struct HumanoidInfo {
    /// The seed given at reset.
    pub rng: u64,
}

/// State of humanoid environments.
pub type HumanoidState = EnvState<SimData, HumanoidInfo>;

/// Parts of a humanoid environment shared by its tasks.
///
/// It owns the configuration and the simulator, and provides observation,
/// the step loop and termination. A task composes a [`HumanoidBase`] with its
/// own initial state and reward function.
pub struct HumanoidBase<S = JointSpaceSimulator> {
    config: HumanoidConfig,
    sim: S,
    move_speed: f32,
    n_substeps: usize,
}

impl<S: Simulator> HumanoidBase<S> {
    /// Builds the base environment.
    ///
    /// `overrides` are applied to `config` before anything else. The model is
    /// loaded from `config.model_path` or the built-in humanoid.
    /// `move_speed` is the target speed of the task, 0 for static tasks.
    pub fn new(
        config: HumanoidConfig,
        overrides: Option<&ConfigOverrides>,
        move_speed: f32,
    ) -> Result<Self> {
        let config = match overrides {
            Some(overrides) => apply_overrides(&config, overrides)?,
            None => config,
        };
        let model = HumanoidModel::load_or_builtin(config.model_path.as_deref())?;
        let sim = S::build(model, config.sim_dt)?;
        Self::with_simulator(config, sim, move_speed)
    }

    /// Builds the base environment on an existing simulator.
    pub fn with_simulator(config: HumanoidConfig, sim: S, move_speed: f32) -> Result<Self> {
        let (ctrl_dt, sim_dt) = (config.ctrl_dt, config.sim_dt);
        if !(ctrl_dt.is_finite() && sim_dt > 0.0 && ctrl_dt >= sim_dt) {
            return Err(PoseholdError::InvalidConfig(format!(
                "ctrl_dt ({}) must be finite and at least sim_dt ({}) > 0",
                ctrl_dt, sim_dt
            ))
            .into());
        }
        let ratio = (ctrl_dt / sim_dt).round();
        if !(ratio <= MAX_SUBSTEPS as f32) {
            return Err(PoseholdError::InvalidConfig(format!(
                "ctrl_dt / sim_dt ({}) exceeds {} substeps",
                ratio, MAX_SUBSTEPS
            ))
            .into());
        }
        let n_substeps = ratio as usize;

        let model = sim.model();
        info!(
            "Build humanoid env: model = {}, nq = {}, nu = {}, n_substeps = {}, move_speed = {}",
            model.name,
            model.nq(),
            model.nu(),
            n_substeps,
            move_speed
        );

        Ok(Self {
            config,
            sim,
            move_speed,
            n_substeps,
        })
    }

    /// Configuration after overrides.
    pub fn config(&self) -> &HumanoidConfig {
        &self.config
    }

    /// The simulated model.
    pub fn model(&self) -> &HumanoidModel {
        self.sim.model()
    }

    /// Target speed of the task.
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Simulation steps per environment step.
    pub fn n_substeps(&self) -> usize {
        self.n_substeps
    }

    /// Default simulation data of the simulator.
    pub fn init_data(&self) -> SimData {
        self.sim.init()
    }

    /// Dimension of the observation.
    pub fn observation_size(&self) -> usize {
        let model = self.model();
        (model.nq() - ROOT_NQ) + 1 + 3 + model.nv()
    }

    /// Observation of `data`.
    ///
    /// Concatenation of the joint angles, the height of the torso, the
    /// vertical axis of the torso frame and the generalized velocities.
    pub fn get_obs(&self, data: &SimData, _info: &HumanoidInfo) -> Array1<f32> {
        let mut obs = Vec::with_capacity(self.observation_size());
        obs.extend(data.qpos.slice(s![ROOT_NQ..]).iter());
        obs.push(data.qpos[2]);
        obs.extend(torso_vertical(data.qpos.slice(s![3..7])).iter());
        obs.extend(data.qvel.iter());
        Array1::from(obs)
    }

    /// Advances `state` with `action` and evaluates the step with `reward_fn`.
    ///
    /// `reward_fn` receives the new simulation data, the action and the
    /// metrics of the state, which it may update. The episode terminates when
    /// the simulation diverges (NaN in `qpos` or `qvel`).
    pub fn step<F>(
        &self,
        state: HumanoidState,
        action: ArrayView1<f32>,
        reward_fn: F,
    ) -> Result<HumanoidState>
    where
        F: FnOnce(&SimData, ArrayView1<f32>, &mut Record) -> f32,
    {
        let nu = self.model().nu();
        if action.len() != nu {
            return Err(PoseholdError::ActionDimension {
                expected: nu,
                actual: action.len(),
            }
            .into());
        }

        let EnvState {
            data,
            mut metrics,
            info,
            ..
        } = state;
        let data = self.sim.step(&data, action, self.n_substeps);
        let reward = reward_fn(&data, action, &mut metrics);
        let obs = self.get_obs(&data, &info);
        let done = if is_diverged(&data) { 1 } else { 0 };
        trace!("t = {:.3}, reward = {}, done = {}", data.time, reward, done);

        Ok(EnvState::new(data, obs, reward, done, metrics, info))
    }
}

/// Third row of the rotation matrix of the quaternion `(w, x, y, z)`.
fn torso_vertical(quat: ArrayView1<f32>) -> [f32; 3] {
    let (w, x, y, z) = (quat[0], quat[1], quat[2], quat[3]);
    [
        2.0 * (x * z - w * y),
        2.0 * (y * z + w * x),
        1.0 - 2.0 * (x * x + y * y),
    ]
}

fn is_diverged(data: &SimData) -> bool {
    data.qpos.iter().any(|v| v.is_nan()) || data.qvel.iter().any(|v| v.is_nan())
}
