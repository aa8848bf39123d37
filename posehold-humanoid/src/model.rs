//! Humanoid model description.
use anyhow::{Context, Result};
use log::info;
use posehold_core::{config::load_yaml, PoseholdError};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};

const BUILTIN_HUMANOID: &str = include_str!("../assets/humanoid.yaml");

/// Number of generalized coordinates of the free root joint (position + quaternion).
pub const ROOT_NQ: usize = 7;

/// Number of degrees of freedom of the free root joint.
pub const ROOT_NV: usize = 6;

/// An actuated hinge joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    /// Name of the joint.
    pub name: String,

    /// Actuator gear, the acceleration produced by a control of 1.
    pub gear: f32,

    /// Viscous damping.
    pub damping: f32,

    /// Joint limits in radians.
    pub range: [f32; 2],
}

/// Layout and physical constants of a humanoid.
///
/// The root is a free joint followed by one actuated hinge per entry of
/// `joints`, so `nq = 7 + joints`, `nv = 6 + joints` and `nu = joints`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanoidModel {
    /// Name of the model.
    pub name: String,

    /// Height of the root in the default configuration.
    pub root_height: f32,

    /// Lowest height the root can reach.
    pub floor_height: f32,

    /// Gravitational acceleration.
    pub gravity: f32,

    /// Viscous damping of the root degrees of freedom.
    pub root_damping: f32,

    /// Actuated joints in qpos order.
    pub joints: Vec<JointSpec>,
}

impl HumanoidModel {
    /// The built-in 21-hinge humanoid.
    pub fn builtin() -> Result<Self> {
        let model: Self =
            serde_yaml::from_str(BUILTIN_HUMANOID).context("Failed to parse the built-in model")?;
        model.validate()?;
        Ok(model)
    }

    /// Loads a model from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let model: Self =
            load_yaml(path).with_context(|| format!("Failed to load model from {:?}", path))?;
        model.validate()?;
        info!("Loaded model {} from {:?}", model.name, path);
        Ok(model)
    }

    /// Loads the model at `path`, or the built-in model if `path` is `None`.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Checks physical constants and joint specifications.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(PoseholdError::InvalidModel(msg).into()) };

        if !(self.gravity.is_finite() && self.root_damping >= 0.0) {
            return invalid(format!("{}: gravity and root damping must be finite", self.name));
        }
        if !(self.floor_height <= self.root_height) {
            return invalid(format!("{}: floor is above the root", self.name));
        }

        let mut names = HashSet::new();
        for joint in self.joints.iter() {
            if !names.insert(joint.name.as_str()) {
                return invalid(format!("{}: duplicated joint {}", self.name, joint.name));
            }
            if !joint.gear.is_finite() || !(joint.damping >= 0.0) {
                return invalid(format!("{}: bad gear or damping of {}", self.name, joint.name));
            }
            if !(joint.range[0] <= joint.range[1]) {
                return invalid(format!("{}: bad range of {}", self.name, joint.name));
            }
        }
        Ok(())
    }

    /// Number of generalized coordinates.
    pub fn nq(&self) -> usize {
        ROOT_NQ + self.joints.len()
    }

    /// Number of degrees of freedom.
    pub fn nv(&self) -> usize {
        ROOT_NV + self.joints.len()
    }

    /// Number of actuators.
    pub fn nu(&self) -> usize {
        self.joints.len()
    }
}
