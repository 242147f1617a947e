//! Evaluate [`Agent`](crate::Agent).
use crate::{Env, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluate a policy on an environment.
pub trait Evaluator<E: Env> {
    /// Returns the evaluation score of `policy`, the higher the better.
    ///
    /// The caller of this method needs to handle the internal state of the
    /// agent, like training/evaluation mode.
    fn evaluate<P: Policy>(&mut self, policy: &mut P) -> Result<f32>;
}
