//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The maximum number of episodes.
    pub max_episodes: usize,

    /// Step cap of an episode.
    pub max_steps: usize,

    /// Training stops as soon as the rolling mean of episode scores is
    /// strictly greater than this value. `None` disables early stopping.
    #[serde(default)]
    pub solved_threshold: Option<f32>,

    /// The number of most recent episodes in the rolling mean.
    pub rolling_window: usize,

    /// Interval of evaluation in episodes. `0` disables evaluation.
    #[serde(default)]
    pub eval_interval: usize,

    /// The number of episodes of an evaluation.
    pub n_episodes_per_eval: usize,

    /// Where to save the trained model.
    #[serde(default)]
    pub model_dir: Option<String>,

    /// If `true`, divergence of the regressor aborts training with an error.
    /// Otherwise training ends and the scores collected so far are returned.
    pub abort_on_divergence: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_episodes: 100,
            max_steps: 200,
            solved_threshold: None,
            rolling_window: 100,
            eval_interval: 0,
            n_episodes_per_eval: 5,
            model_dir: None,
            abort_on_divergence: true,
        }
    }
}

impl TrainerConfig {
    /// Sets the maximum number of episodes.
    pub fn max_episodes(mut self, v: usize) -> Self {
        self.max_episodes = v;
        self
    }

    /// Sets the step cap of an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the rolling mean score above which training stops.
    pub fn solved_threshold(mut self, v: f32) -> Self {
        self.solved_threshold = Some(v);
        self
    }

    /// Sets the window of the rolling mean.
    pub fn rolling_window(mut self, v: usize) -> Self {
        self.rolling_window = v;
        self
    }

    /// Sets the interval of evaluation in episodes.
    pub fn eval_interval(mut self, v: usize) -> Self {
        self.eval_interval = v;
        self
    }

    /// Sets the number of episodes of an evaluation.
    pub fn n_episodes_per_eval(mut self, v: usize) -> Self {
        self.n_episodes_per_eval = v;
        self
    }

    /// Sets the directory where models are saved.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Sets whether divergence aborts training.
    pub fn abort_on_divergence(mut self, v: bool) -> Self {
        self.abort_on_divergence = v;
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
