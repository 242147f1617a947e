//! Function approximator of action values.
use anyhow::Result;
use std::path::Path;

/// Maps observations to vectors of action values.
///
/// Both methods work on batches: `states` is a slice of observations of
/// length `in_dim`, and each output row has length `out_dim`, one entry per
/// action.
pub trait Regressor {
    /// Configuration from which the regressor is constructed.
    type Config: Clone;

    /// Builds the regressor.
    ///
    /// * `in_dim` - dimension of observations.
    /// * `out_dim` - the number of actions.
    /// * `lr` - learning rate used by [`Regressor::fit`].
    fn build(config: &Self::Config, in_dim: usize, out_dim: usize, lr: f64) -> Result<Self>
    where
        Self: Sized;

    /// Predicts action values for a batch of observations.
    fn predict(&self, states: &[Vec<f32>]) -> Result<Vec<Vec<f32>>>;

    /// Fits the regressor for exactly one pass over `(states, targets)`
    /// with the mean squared error.
    ///
    /// Implementations may return
    /// [`LanderError::TrainingDivergence`](crate::error::LanderError::TrainingDivergence)
    /// when the loss is no longer finite.
    fn fit(&mut self, states: &[Vec<f32>], targets: &[Vec<f32>]) -> Result<()>;

    /// Saves parameters to the given path.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads parameters from the given path.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
