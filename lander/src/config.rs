//! Configuration of a training run.
use anyhow::Result;
use lander_candle_agent::MlpRegressorConfig;
use lander_core::{error::LanderError, DqnConfig, Env, TrainerConfig};
use lander_env::{Action, LanderConfig, LanderEnv};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

fn default_seed() -> u64 {
    42
}

/// Environment, agent and trainer configurations of a run.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LanderDqnConfig {
    /// Seed of the training environment. The evaluation environment uses
    /// `seed + 1`.
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub env: LanderConfig,
    pub agent: DqnConfig<MlpRegressorConfig>,
    pub trainer: TrainerConfig,
}

impl Default for LanderDqnConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            env: LanderConfig::default(),
            agent: DqnConfig::default()
                .n_actions(Action::N)
                .state_dim(LanderEnv::STATE_DIM),
            trainer: TrainerConfig::default()
                .max_episodes(400)
                .solved_threshold(200.0),
        }
    }
}

impl LanderDqnConfig {
    /// Constructs [`LanderDqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`LanderDqnConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    /// Seeds the environments, the agent and its replay buffer from `seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        let buffer_config = self.agent.get_replay_buffer_config().clone().seed(seed);
        self.seed = seed;
        self.agent = self.agent.seed(seed).replay_buffer_config(buffer_config);
        self
    }

    /// Checks that the agent fits the environment.
    pub fn check(&self) -> Result<()> {
        let env = LanderEnv::build(&self.env, self.seed)?;
        self.agent.check()?;
        for (what, expected, got) in [
            ("number of actions", env.n_actions(), self.agent.get_n_actions()),
            ("observation dimension", env.state_dim(), self.agent.get_state_dim()),
        ] {
            if expected != got {
                return Err(LanderError::DimensionMismatch {
                    what: what.to_string(),
                    expected,
                    got,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_bundled_config() -> Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/lander_dqn.yaml");
        let config = LanderDqnConfig::load(path)?;
        config.check()?;
        assert_eq!(config.trainer.solved_threshold, Some(200.0));
        assert_eq!(config.env, LanderConfig::default());
        Ok(())
    }

    #[test]
    fn test_default_and_roundtrip() -> Result<()> {
        let config = LanderDqnConfig::default().seed(7);
        config.check()?;
        assert_eq!(config.seed, 7);
        assert_eq!(config.agent.get_replay_buffer_config().get_capacity(), 1_000_000);

        let dir = TempDir::new("lander_dqn_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        assert_eq!(LanderDqnConfig::load(&path)?, config);
        Ok(())
    }
}
