//! Tolerance reward curves.
//!
//! A [`Tolerance`] maps a scalar to a bounded reward in `[0, 1]`: the reward
//! is 1 when the input lies inside `bounds` and decays over `margin` outside
//! of them following a [`Sigmoid`]. The sigmoid is scaled so that its value
//! at a distance of exactly one margin equals `value_at_margin`.
#![allow(clippy::float_cmp)]
use crate::error::PoseholdError;
use anyhow::Result;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Shape of the decay outside of the bounds of a [`Tolerance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sigmoid {
    /// `exp(-(x s)^2 / 2)`.
    Gaussian,

    /// `1 / cosh(x s)`.
    Hyperbolic,

    /// `1 / ((x s)^2 + 1)`.
    LongTail,

    /// `1 / (|x| s + 1)`.
    Reciprocal,

    /// `(1 + cos(pi x s)) / 2`, zero beyond `|x s| = 1`.
    Cosine,

    /// `1 - x s`, zero beyond `|x s| = 1`.
    Linear,

    /// `1 - (x s)^2`, zero beyond `|x s| = 1`.
    Quadratic,

    /// `1 - tanh(x s)^2`.
    TanhSquared,
}

impl Sigmoid {
    /// Sigmoids that reach zero at a finite distance and accept a value of 0
    /// at the margin.
    fn is_compact(&self) -> bool {
        matches!(self, Sigmoid::Cosine | Sigmoid::Linear | Sigmoid::Quadratic)
    }

    /// Scale factor `s` such that the sigmoid evaluates to `value_at_1` at `x = 1`.
    fn scale(&self, value_at_1: f32) -> f32 {
        match self {
            Sigmoid::Gaussian => (-2.0 * value_at_1.ln()).sqrt(),
            Sigmoid::Hyperbolic => (1.0 / value_at_1).acosh(),
            Sigmoid::LongTail => (1.0 / value_at_1 - 1.0).sqrt(),
            Sigmoid::Reciprocal => 1.0 / value_at_1 - 1.0,
            Sigmoid::Cosine => (2.0 * value_at_1 - 1.0).acos() / PI,
            Sigmoid::Linear => 1.0 - value_at_1,
            Sigmoid::Quadratic => (1.0 - value_at_1).sqrt(),
            Sigmoid::TanhSquared => (1.0 - value_at_1).sqrt().atanh(),
        }
    }

    fn eval(&self, x: f32, scale: f32) -> f32 {
        let scaled_x = x * scale;
        match self {
            Sigmoid::Gaussian => (-0.5 * scaled_x * scaled_x).exp(),
            Sigmoid::Hyperbolic => 1.0 / scaled_x.cosh(),
            Sigmoid::LongTail => 1.0 / (scaled_x * scaled_x + 1.0),
            Sigmoid::Reciprocal => 1.0 / (scaled_x.abs() + 1.0),
            Sigmoid::Cosine => {
                if scaled_x.abs() < 1.0 {
                    (1.0 + (PI * scaled_x).cos()) / 2.0
                } else {
                    0.0
                }
            }
            Sigmoid::Linear => {
                if scaled_x.abs() < 1.0 {
                    1.0 - scaled_x
                } else {
                    0.0
                }
            }
            Sigmoid::Quadratic => {
                if scaled_x.abs() < 1.0 {
                    1.0 - scaled_x * scaled_x
                } else {
                    0.0
                }
            }
            Sigmoid::TanhSquared => 1.0 - scaled_x.tanh().powi(2),
        }
    }
}

/// A bounded reward curve.
///
/// Parameters are validated once in [`Tolerance::new`], after which
/// [`Tolerance::eval`] is a total function.
#[derive(Debug, Clone, PartialEq)]
pub struct Tolerance {
    lower: f32,
    upper: f32,
    margin: f32,
    sigmoid: Sigmoid,
    scale: f32,
}

impl Tolerance {
    /// Constructs a tolerance curve.
    ///
    /// * `bounds` - `(lower, upper)` interval in which the reward is 1.
    /// * `margin` - distance over which the reward decays outside of the bounds.
    ///   If zero, the reward is 0 everywhere outside of the bounds.
    /// * `sigmoid` - shape of the decay.
    /// * `value_at_margin` - reward at a distance of `margin` from the bounds.
    ///   Must be in `[0, 1)` for compact sigmoids (cosine, linear, quadratic)
    ///   and in `(0, 1)` otherwise.
    pub fn new(
        bounds: (f32, f32),
        margin: f32,
        sigmoid: Sigmoid,
        value_at_margin: f32,
    ) -> Result<Self> {
        let (lower, upper) = bounds;
        if !(lower.is_finite() && upper.is_finite() && margin.is_finite()) {
            return Err(PoseholdError::InvalidTolerance(format!(
                "bounds ({}, {}) and margin {} must be finite",
                lower, upper, margin
            ))
            .into());
        }
        if !(lower <= upper) {
            return Err(PoseholdError::InvalidTolerance(format!(
                "lower bound {} must be <= upper bound {}",
                lower, upper
            ))
            .into());
        }
        if !(margin >= 0.0) {
            return Err(PoseholdError::InvalidTolerance(format!(
                "margin {} must be non-negative",
                margin
            ))
            .into());
        }
        let valid = if sigmoid.is_compact() {
            (0.0..1.0).contains(&value_at_margin)
        } else {
            value_at_margin > 0.0 && value_at_margin < 1.0
        };
        if !valid {
            return Err(PoseholdError::InvalidTolerance(format!(
                "value_at_margin {} is out of range for {:?}",
                value_at_margin, sigmoid
            ))
            .into());
        }

        Ok(Self {
            lower,
            upper,
            margin,
            sigmoid,
            scale: sigmoid.scale(value_at_margin),
        })
    }

    /// Evaluates the curve at `x`.
    pub fn eval(&self, x: f32) -> f32 {
        if self.lower <= x && x <= self.upper {
            return 1.0;
        }
        if self.margin == 0.0 {
            return 0.0;
        }
        let distance = if x < self.lower {
            self.lower - x
        } else {
            x - self.upper
        };
        let d = distance / self.margin;
        self.sigmoid.eval(d, self.scale)
    }

    /// Mean of the curve over the elements of `xs`.
    ///
    /// Returns 1 for an empty input, the value of the curve for "no deviation".
    pub fn eval_mean(&self, xs: ArrayView1<f32>) -> f32 {
        if xs.is_empty() {
            return 1.0;
        }
        xs.iter().map(|&x| self.eval(x)).sum::<f32>() / xs.len() as f32
    }
}
