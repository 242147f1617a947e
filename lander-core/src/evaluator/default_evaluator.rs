//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{Env, Policy};
use anyhow::Result;
use log::info;

/// Runs a fixed number of episodes and returns the average return.
///
/// Episode `ix` starts from [`Env::reset_with_index`]`(ix)`, so repeated
/// evaluations see the same initial states.
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// Step cap of each episode.
    max_steps: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`], building its own environment.
    pub fn new(config: &E::Config, seed: u64, n_episodes: usize, max_steps: usize) -> Result<Self> {
        Ok(Self::from_env(E::build(config, seed)?, n_episodes, max_steps))
    }

    /// Constructs a new [`DefaultEvaluator`] on an existing environment.
    pub fn from_env(env: E, n_episodes: usize, max_steps: usize) -> Self {
        Self {
            n_episodes,
            max_steps,
            env,
        }
    }
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy>(&mut self, policy: &mut P) -> Result<f32> {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut state = self.env.reset_with_index(ix)?;
            for _ in 0..self.max_steps {
                let act = policy.select_action(&state)?;
                let step = self.env.step(act)?;
                r_total += step.reward;
                if step.is_done {
                    break;
                }
                state = step.next_state;
            }
        }

        let r_mean = r_total / self.n_episodes.max(1) as f32;
        info!("Evaluation over {} episodes: {:.2}", self.n_episodes, r_mean);
        Ok(r_mean)
    }
}
