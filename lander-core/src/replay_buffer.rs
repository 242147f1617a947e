//! Replay buffer of transitions with uniform sampling.
mod base;
mod batch;
mod config;
pub use base::ReplayBuffer;
pub use batch::TransitionBatch;
pub use config::ReplayBufferConfig;
