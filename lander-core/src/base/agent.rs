//! Agent.
use super::{Policy, Transition};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
pub trait Agent: Policy {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// The number of actions the agent chooses from.
    fn n_actions(&self) -> usize;

    /// Dimension of observations the agent accepts.
    fn state_dim(&self) -> usize;

    /// Stores a transition for later optimization steps.
    ///
    /// Returns an error if the transition does not fit the agent, for
    /// example an action outside of `[0, n_actions)`.
    fn remember(&mut self, tr: Transition) -> Result<()>;

    /// Performs an optimization step.
    ///
    /// Returns `Ok(None)` if the step was skipped, for example because not
    /// enough transitions have been collected yet.
    fn learn(&mut self) -> Result<Option<Record>>;

    /// Save the parameters of the agent in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
