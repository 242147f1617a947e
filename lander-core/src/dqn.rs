//! DQN agent.
mod base;
mod config;
mod target;
pub use base::DqnAgent;
pub use config::DqnConfig;
pub use target::{argmax, overwrite_action_values, td_targets};
