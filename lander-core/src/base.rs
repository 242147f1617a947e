//! Core functionalities.
mod agent;
mod env;
mod policy;
mod regressor;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use regressor::Regressor;
pub use step::{Step, Transition};
