//! Simulation of humanoid dynamics.
use crate::model::{HumanoidModel, ROOT_NQ, ROOT_NV};
use anyhow::Result;
use ndarray::{Array1, ArrayView1};
use posehold_core::PoseholdError;

/// Simulation state of a humanoid.
#[derive(Debug, Clone, PartialEq)]
pub struct SimData {
    /// Generalized coordinates: root position, root quaternion `(w, x, y, z)`
    /// and joint angles.
    pub qpos: Array1<f32>,

    /// Generalized velocities: root linear and angular velocity and joint
    /// velocities.
    pub qvel: Array1<f32>,

    /// Controls applied in the last step.
    pub ctrl: Array1<f32>,

    /// Simulation time.
    pub time: f32,
}

/// Advances the physical state of a humanoid.
pub trait Simulator {
    /// Builds a simulator of `model` integrating with the given timestep.
    fn build(model: HumanoidModel, timestep: f32) -> Result<Self>
    where
        Self: Sized;

    /// The simulated model.
    fn model(&self) -> &HumanoidModel;

    /// Default simulation data: the root standing at `root_height` with
    /// identity orientation, zero joint angles, zero velocities and controls.
    fn init(&self) -> SimData {
        let model = self.model();
        let mut qpos = Array1::zeros(model.nq());
        qpos[2] = model.root_height;
        qpos[3] = 1.0;
        SimData {
            qpos,
            qvel: Array1::zeros(model.nv()),
            ctrl: Array1::zeros(model.nu()),
            time: 0.0,
        }
    }

    /// Applies `ctrl` for `n_substeps` integration steps and returns the new data.
    fn step(&self, data: &SimData, ctrl: ArrayView1<f32>, n_substeps: usize) -> SimData;
}

/// Semi-implicit Euler integration in joint space.
///
/// Each hinge accelerates with `gear * ctrl - damping * qvel` and stops at its
/// limits. The root falls under gravity onto a floor at `floor_height`, its
/// velocities are damped by `root_damping`, and its quaternion follows the
/// angular velocity. There are no contacts between bodies.
#[derive(Debug, Clone)]
pub struct JointSpaceSimulator {
    model: HumanoidModel,
    timestep: f32,
}

impl JointSpaceSimulator {
    fn substep(&self, data: &mut SimData) {
        let model = &self.model;
        let dt = self.timestep;

        // Root translation
        data.qvel[2] -= model.gravity * dt;
        for i in 0..3 {
            data.qvel[i] -= model.root_damping * data.qvel[i] * dt;
            data.qpos[i] += data.qvel[i] * dt;
        }
        if data.qpos[2] < model.floor_height {
            data.qpos[2] = model.floor_height;
            data.qvel[2] = data.qvel[2].max(0.0);
        }

        // Root rotation, dq = 0.5 * q * (0, w)
        for i in 3..6 {
            data.qvel[i] -= model.root_damping * data.qvel[i] * dt;
        }
        let (w, x, y, z) = (data.qpos[3], data.qpos[4], data.qpos[5], data.qpos[6]);
        let (wx, wy, wz) = (data.qvel[3], data.qvel[4], data.qvel[5]);
        let q = [
            w - 0.5 * dt * (x * wx + y * wy + z * wz),
            x + 0.5 * dt * (w * wx + y * wz - z * wy),
            y + 0.5 * dt * (w * wy - x * wz + z * wx),
            z + 0.5 * dt * (w * wz + x * wy - y * wx),
        ];
        let norm = q.iter().map(|v| v * v).sum::<f32>().sqrt();
        for (i, v) in q.iter().enumerate() {
            data.qpos[3 + i] = v / norm;
        }

        // Hinges
        for (j, joint) in model.joints.iter().enumerate() {
            let (iq, iv) = (ROOT_NQ + j, ROOT_NV + j);
            let qacc = joint.gear * data.ctrl[j] - joint.damping * data.qvel[iv];
            data.qvel[iv] += qacc * dt;
            data.qpos[iq] += data.qvel[iv] * dt;

            let [lo, hi] = joint.range;
            if data.qpos[iq] < lo || data.qpos[iq] > hi {
                data.qpos[iq] = data.qpos[iq].max(lo).min(hi);
                data.qvel[iv] = 0.0;
            }
        }

        data.time += dt;
    }
}

impl Simulator for JointSpaceSimulator {
    fn build(model: HumanoidModel, timestep: f32) -> Result<Self> {
        if !(timestep > 0.0) {
            return Err(
                PoseholdError::InvalidConfig(format!("timestep must be positive: {}", timestep))
                    .into(),
            );
        }
        model.validate()?;
        Ok(Self { model, timestep })
    }

    fn model(&self) -> &HumanoidModel {
        &self.model
    }

    fn step(&self, data: &SimData, ctrl: ArrayView1<f32>, n_substeps: usize) -> SimData {
        let mut data = data.clone();
        data.ctrl = ctrl.mapv(|c| if c.is_nan() { c } else { c.max(-1.0).min(1.0) });
        for _ in 0..n_substeps {
            self.substep(&mut data);
        }
        data
    }
}
