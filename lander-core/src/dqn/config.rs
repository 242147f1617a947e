//! Configuration of DQN agent.
use crate::{error::LanderError, ReplayBufferConfig};
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`DqnAgent`](super::DqnAgent).
///
/// `C` is the configuration of the regressor approximating action values.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DqnConfig<C> {
    pub(super) n_actions: usize,
    pub(super) state_dim: usize,
    pub(super) epsilon: f64,
    pub(super) epsilon_min: f64,
    pub(super) epsilon_decay: f64,
    pub(super) gamma: f64,
    pub(super) batch_size: usize,
    pub(super) lr: f64,
    pub(super) replay_buffer_config: ReplayBufferConfig,
    pub(super) regressor_config: C,
    #[serde(default = "default_seed")]
    pub(super) seed: u64,
}

fn default_seed() -> u64 {
    42
}

fn invalid(msg: String) -> Result<()> {
    Err(LanderError::InvalidConfig(msg).into())
}

impl<C: Default> Default for DqnConfig<C> {
    fn default() -> Self {
        Self {
            n_actions: 0,
            state_dim: 0,
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.9,
            gamma: 0.99,
            batch_size: 32,
            lr: 0.001,
            replay_buffer_config: ReplayBufferConfig::default(),
            regressor_config: C::default(),
            seed: default_seed(),
        }
    }
}

impl<C> DqnConfig<C> {
    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the dimension of observations.
    pub fn state_dim(mut self, v: usize) -> Self {
        self.state_dim = v;
        self
    }

    /// Initial exploration rate.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Lower bound of the exploration rate.
    pub fn epsilon_min(mut self, v: f64) -> Self {
        self.epsilon_min = v;
        self
    }

    /// Multiplicative decay of the exploration rate per optimization step.
    pub fn epsilon_decay(mut self, v: f64) -> Self {
        self.epsilon_decay = v;
        self
    }

    /// Discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Learning rate, passed to the regressor when it is built.
    pub fn lr(mut self, v: f64) -> Self {
        self.lr = v;
        self
    }

    /// Configuration of the replay buffer.
    pub fn replay_buffer_config(mut self, v: ReplayBufferConfig) -> Self {
        self.replay_buffer_config = v;
        self
    }

    /// Configuration of the regressor.
    pub fn regressor_config(mut self, v: C) -> Self {
        self.regressor_config = v;
        self
    }

    /// Seed of the random number generator of the exploration.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Returns the number of actions.
    pub fn get_n_actions(&self) -> usize {
        self.n_actions
    }

    /// Returns the dimension of observations.
    pub fn get_state_dim(&self) -> usize {
        self.state_dim
    }

    /// Returns the configuration of the replay buffer.
    pub fn get_replay_buffer_config(&self) -> &ReplayBufferConfig {
        &self.replay_buffer_config
    }

    /// Checks ranges of the hyperparameters.
    pub fn check(&self) -> Result<()> {
        if self.n_actions == 0 {
            return invalid("n_actions must be positive".to_string());
        }
        if self.state_dim == 0 {
            return invalid("state_dim must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.gamma) {
            return invalid(format!("gamma must be in [0, 1), got {}", self.gamma));
        }
        if !(0.0..=1.0).contains(&self.epsilon) || !(0.0..=1.0).contains(&self.epsilon_min) {
            return invalid(format!(
                "epsilon ({}) and epsilon_min ({}) must be in [0, 1]",
                self.epsilon, self.epsilon_min
            ));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return invalid(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            ));
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be positive".to_string());
        }
        let capacity = self.replay_buffer_config.get_capacity();
        if capacity < self.batch_size {
            return invalid(format!(
                "replay buffer capacity ({}) must be at least batch_size ({})",
                capacity, self.batch_size
            ));
        }
        if !(self.lr > 0.0) {
            return invalid(format!("lr must be positive, got {}", self.lr));
        }
        Ok(())
    }
}

impl<C> DqnConfig<C>
where
    C: DeserializeOwned + Serialize,
{
    /// Constructs [`DqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DqnConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
