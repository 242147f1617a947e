//! Linear action-value regressor without any tensor backend.
use crate::{error::LanderError, Regressor};
use anyhow::Result;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`LinearRegressor`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LinearRegressorConfig {
    /// Weights are initialized uniformly in `[-init_std, init_std]`.
    pub init_std: f32,

    /// Seed of the weight initialization.
    pub seed: u64,
}

impl Default for LinearRegressorConfig {
    fn default() -> Self {
        Self {
            init_std: 0.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
struct Params {
    /// `out_dim x in_dim`, row-major.
    w: Vec<f32>,
    b: Vec<f32>,
}

/// Linear model `q(s) = W s + b`.
///
/// [`Regressor::fit`] performs a single full-batch gradient step on
/// `0.5 * mean_batch(sum_a (q(s)[a] - target[a])^2)`.
pub struct LinearRegressor {
    in_dim: usize,
    out_dim: usize,
    lr: f32,
    params: Params,
}

impl LinearRegressor {
    fn forward(&self, s: &[f32]) -> Vec<f32> {
        (0..self.out_dim)
            .map(|o| {
                let row = &self.params.w[o * self.in_dim..(o + 1) * self.in_dim];
                row.iter().zip(s.iter()).map(|(w, x)| w * x).sum::<f32>() + self.params.b[o]
            })
            .collect()
    }

    fn check_dim(&self, what: &str, expected: usize, got: usize) -> Result<()> {
        if expected == got {
            Ok(())
        } else {
            Err(LanderError::DimensionMismatch {
                what: what.to_string(),
                expected,
                got,
            }
            .into())
        }
    }
}

impl Regressor for LinearRegressor {
    type Config = LinearRegressorConfig;

    fn build(config: &Self::Config, in_dim: usize, out_dim: usize, lr: f64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let w = (0..in_dim * out_dim)
            .map(|_| {
                if config.init_std > 0.0 {
                    rng.gen_range(-config.init_std..=config.init_std)
                } else {
                    0.0
                }
            })
            .collect();

        Ok(Self {
            in_dim,
            out_dim,
            lr: lr as f32,
            params: Params {
                w,
                b: vec![0.0; out_dim],
            },
        })
    }

    fn predict(&self, states: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        states
            .iter()
            .map(|s| {
                self.check_dim("observation", self.in_dim, s.len())?;
                Ok(self.forward(s))
            })
            .collect()
    }

    fn fit(&mut self, states: &[Vec<f32>], targets: &[Vec<f32>]) -> Result<()> {
        self.check_dim("targets", states.len(), targets.len())?;
        if states.is_empty() {
            return Ok(());
        }

        let n = states.len() as f32;
        let mut grad_w = vec![0f32; self.params.w.len()];
        let mut grad_b = vec![0f32; self.out_dim];
        for (s, t) in states.iter().zip(targets.iter()) {
            self.check_dim("observation", self.in_dim, s.len())?;
            self.check_dim("target", self.out_dim, t.len())?;
            let q = self.forward(s);
            for o in 0..self.out_dim {
                let err = (q[o] - t[o]) / n;
                grad_b[o] += err;
                for (i, x) in s.iter().enumerate() {
                    grad_w[o * self.in_dim + i] += err * x;
                }
            }
        }

        for (w, g) in self.params.w.iter_mut().zip(grad_w.iter()) {
            *w -= self.lr * g;
        }
        for (b, g) in self.params.b.iter_mut().zip(grad_b.iter()) {
            *b -= self.lr * g;
        }

        if self
            .params
            .w
            .iter()
            .chain(self.params.b.iter())
            .all(|v| v.is_finite())
        {
            Ok(())
        } else {
            Err(LanderError::TrainingDivergence("non-finite linear weights".to_string()).into())
        }
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        let path = path.with_extension("yaml");
        let mut file = File::create(&path)?;
        file.write_all(serde_yaml::to_string(&self.params)?.as_bytes())?;
        info!("Save linear regressor to {:?}", path);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let path = path.with_extension("yaml");
        let rdr = BufReader::new(File::open(&path)?);
        let params: Params = serde_yaml::from_reader(rdr)?;
        self.check_dim("weights", self.params.w.len(), params.w.len())?;
        self.check_dim("biases", self.params.b.len(), params.b.len())?;
        self.params = params;
        info!("Load linear regressor from {:?}", path);
        Ok(())
    }
}
