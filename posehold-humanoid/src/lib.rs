#![warn(missing_docs)]
//! Humanoid environments for [`posehold_core`].
//!
//! [`HumanoidBase`] provides what every humanoid task shares: the model, the
//! simulator, observation, the step loop and termination. Tasks are composed
//! from a base and their own initial state and reward, like
//! [`HumanoidBabyFreeze`], where the humanoid is rewarded for lying still in
//! a "baby freeze" pose.
//!
//! Environments are usually instantiated by name through a
//! [`Registry`]:
//!
//! ```no_run
//! use anyhow::Result;
//! use ndarray::Array1;
//! use posehold_core::Registry;
//! use posehold_humanoid::{register_environments, HumanoidEnv};
//!
//! fn main() -> Result<()> {
//!     let mut registry = Registry::<HumanoidEnv>::new();
//!     register_environments(&mut registry);
//!
//!     let env = registry.load("HumanoidBabyFreeze", None, None)?;
//!     let state = env.reset(0)?;
//!     let action = Array1::zeros(env.action_size());
//!     let state = env.step(state, action.view())?;
//!     println!("reward = {}", state.reward);
//!     Ok(())
//! }
//! ```
pub mod baby_freeze;
mod base;
mod config;
mod model;
mod sim;

pub use baby_freeze::{HumanoidBabyFreeze, ENV_NAME, METRIC_POSE, METRIC_SMALL_CONTROL};
pub use base::{HumanoidBase, HumanoidInfo, HumanoidState, MAX_SUBSTEPS};
pub use config::{default_config, HumanoidConfig};
pub use model::{HumanoidModel, JointSpec, ROOT_NQ, ROOT_NV};
pub use sim::{JointSpaceSimulator, SimData, Simulator};

use posehold_core::{Env, Registry};

/// Humanoid environments behind a trait object.
pub type HumanoidEnv = dyn Env<Config = HumanoidConfig, Data = SimData, Info = HumanoidInfo>;

/// Registers the environments of this crate to `registry`.
///
/// Currently registers [`HumanoidBabyFreeze`] as `"HumanoidBabyFreeze"`.
pub fn register_environments(registry: &mut Registry<HumanoidEnv>) {
    registry.register(
        ENV_NAME,
        |config, overrides| {
            let env: Box<HumanoidEnv> =
                Box::new(HumanoidBabyFreeze::<JointSpaceSimulator>::new(Some(config), overrides)?);
            Ok(env)
        },
        baby_freeze::default_config,
    );
}
