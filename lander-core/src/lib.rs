#![warn(missing_docs)]
//! Deep Q-learning for agents acting on discrete action spaces.
//!
//! The crate provides the pieces of a DQN training run: a fixed-capacity
//! [`ReplayBuffer`] of [`Transition`]s, the [`DqnAgent`] that selects actions
//! epsilon-greedily and learns from replayed batches, and the [`Trainer`]
//! driving episodes on an [`Env`]. The function approximator is left to
//! implementors of [`Regressor`]; [`LinearRegressor`] is a backend-free one.
pub mod error;
pub mod record;

mod base;
pub use base::{Agent, Env, Policy, Regressor, Step, Transition};

mod replay_buffer;
pub use replay_buffer::{ReplayBuffer, ReplayBufferConfig, TransitionBatch};

pub mod dqn;
pub use dqn::{DqnAgent, DqnConfig};

mod linear;
pub use linear::{LinearRegressor, LinearRegressorConfig};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{EpisodeRecord, TrainOutcome, Trainer, TrainerConfig};
