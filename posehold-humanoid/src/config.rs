//! Configuration of humanoid environments.
use anyhow::Result;
use posehold_core::config::{load_yaml, save_yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration of [`HumanoidBase`](crate::HumanoidBase) and the tasks built on it.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct HumanoidConfig {
    /// Control timestep, the time advanced by one environment step.
    pub ctrl_dt: f32,

    /// Simulation timestep.
    pub sim_dt: f32,

    /// The number of environment steps in an episode.
    pub episode_length: usize,

    /// YAML model description. The built-in humanoid is used if `None`.
    pub model_path: Option<PathBuf>,
}

impl Default for HumanoidConfig {
    fn default() -> Self {
        Self {
            ctrl_dt: 0.025,
            sim_dt: 0.005,
            episode_length: 1000,
            model_path: None,
        }
    }
}

impl HumanoidConfig {
    /// Sets the control timestep.
    pub fn ctrl_dt(mut self, v: f32) -> Self {
        self.ctrl_dt = v;
        self
    }

    /// Sets the simulation timestep.
    pub fn sim_dt(mut self, v: f32) -> Self {
        self.sim_dt = v;
        self
    }

    /// Sets the number of steps in an episode.
    pub fn episode_length(mut self, v: usize) -> Self {
        self.episode_length = v;
        self
    }

    /// Sets the path of the model description.
    pub fn model_path(mut self, v: impl Into<PathBuf>) -> Self {
        self.model_path = Some(v.into());
        self
    }

    /// Constructs [`HumanoidConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`HumanoidConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

/// Default configuration of humanoid environments.
pub fn default_config() -> HumanoidConfig {
    HumanoidConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_humanoid_config() -> Result<()> {
        let config = HumanoidConfig::default()
            .ctrl_dt(0.02)
            .episode_length(200)
            .model_path("models/humanoid.yaml");

        let dir = TempDir::new("humanoid_config")?;
        let path = dir.path().join("humanoid_config.yaml");
        config.save(&path)?;
        let config_ = HumanoidConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
