#![warn(missing_docs)]
//! Core traits and utilities for static-pose reinforcement-learning environments.
//!
//! Environments in this library are functional: [`Env::reset`] creates an
//! [`EnvState`] and [`Env::step`] consumes one and returns its replacement.
//! Nothing in an environment is mutated after construction, so a single
//! instance can be shared by any number of episodes.
//!
//! ```rust
//! use posehold_core::reward::{Sigmoid, Tolerance};
//!
//! let small_control = Tolerance::new((0.0, 0.0), 1.0, Sigmoid::Quadratic, 0.0).unwrap();
//! assert_eq!(small_control.eval(0.0), 1.0);
//! assert_eq!(small_control.eval(1.0), 0.0);
//! ```
pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod reward;
pub mod util;

mod base;
pub use base::{Env, EnvState, Policy};
pub use config::ConfigOverrides;
pub use error::PoseholdError;
pub use registry::Registry;
