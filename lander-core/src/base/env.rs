//! Environment.
use super::Step;
use anyhow::Result;

/// Represents an environment, typically an MDP with a discrete action space.
///
/// Observations are vectors of length [`Env::state_dim`] and actions are
/// indices in `[0, n_actions)`.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    ///
    /// Two environments built with the same configuration and seed must
    /// produce the same sequence of steps for the same actions.
    fn build(config: &Self::Config, seed: u64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Vec<f32>>;

    /// Resets the environment with a given index.
    ///
    /// The index is used in an arbitrary way. For example, it can be used as a random seed,
    /// which is useful when evaluating a trained agent. This method is called by
    /// [`DefaultEvaluator`](crate::DefaultEvaluator).
    fn reset_with_index(&mut self, ix: usize) -> Result<Vec<f32>> {
        let _ = ix;
        self.reset()
    }

    /// Performes an environment step.
    fn step(&mut self, act: usize) -> Result<Step>;

    /// The number of discrete actions.
    fn n_actions(&self) -> usize;

    /// Dimension of observations.
    fn state_dim(&self) -> usize;
}
