//! Policy.
use anyhow::Result;

/// A policy on a discrete action space.
///
/// Policy is a mapping from an observation to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy {
    /// Selects an action given an observation.
    fn select_action(&mut self, state: &[f32]) -> Result<usize>;
}
