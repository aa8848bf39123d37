//! Core functionalities.
mod env;
mod policy;
mod state;
pub use env::Env;
pub use policy::Policy;
pub use state::EnvState;
