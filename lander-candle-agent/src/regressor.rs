//! Action-value regressor backed by an [`Mlp`].
use crate::{
    mlp::{Mlp, MlpConfig},
    opt::{Optimizer, OptimizerConfig},
    Device,
};
use anyhow::Result;
use candle_core::{DType, Module, Tensor};
use candle_nn::{loss::mse, VarBuilder, VarMap};
use lander_core::{error::LanderError, Regressor};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryInto,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
/// Configuration of [`MlpRegressor`].
pub struct MlpRegressorConfig {
    pub(crate) mlp_config: MlpConfig,
    pub(crate) opt_config: OptimizerConfig,
    #[serde(default)]
    pub(crate) device: Device,
}

impl MlpRegressorConfig {
    /// Sets configurations of the network.
    pub fn mlp_config(mut self, v: MlpConfig) -> Self {
        self.mlp_config = v;
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
        self
    }

    /// Constructs [`MlpRegressorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MlpRegressorConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Action-value function represented by an [`Mlp`].
///
/// [`Regressor::fit`] performs a single optimizer step on the mean squared
/// error between the outputs and the targets.
pub struct MlpRegressor {
    device: candle_core::Device,
    varmap: VarMap,
    in_dim: usize,
    out_dim: usize,
    mlp: Mlp,
    opt: Optimizer,
}

impl MlpRegressor {
    fn check_dim(what: &str, expected: usize, got: usize) -> Result<()> {
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

    /// Stacks rows into a `(rows.len(), dim)` tensor.
    fn to_tensor(&self, rows: &[Vec<f32>], dim: usize, what: &str) -> Result<Tensor> {
        let mut data = Vec::with_capacity(rows.len() * dim);
        for row in rows.iter() {
            Self::check_dim(what, dim, row.len())?;
            data.extend_from_slice(row);
        }
        Ok(Tensor::from_vec(data, (rows.len(), dim), &self.device)?)
    }

    /// Mean squared error of the outputs against `targets`.
    pub fn loss(&self, states: &[Vec<f32>], targets: &[Vec<f32>]) -> Result<f32> {
        let xs = self.to_tensor(states, self.in_dim, "observation")?;
        let ys = self.to_tensor(targets, self.out_dim, "target")?;
        Ok(mse(&self.mlp.forward(&xs)?, &ys)?.to_scalar::<f32>()?)
    }
}

impl Regressor for MlpRegressor {
    type Config = MlpRegressorConfig;

    fn build(config: &Self::Config, in_dim: usize, out_dim: usize, lr: f64) -> Result<Self> {
        let device: candle_core::Device = config.device.try_into()?;
        let varmap = VarMap::new();
        let mlp = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Mlp::build(vb, &config.mlp_config, in_dim, out_dim)?
        };
        let opt = config
            .opt_config
            .clone()
            .learning_rate(lr)
            .build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            in_dim,
            out_dim,
            mlp,
            opt,
        })
    }

    fn predict(&self, states: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        if states.is_empty() {
            return Ok(vec![]);
        }
        let xs = self.to_tensor(states, self.in_dim, "observation")?;
        Ok(self.mlp.forward(&xs)?.to_vec2::<f32>()?)
    }

    fn fit(&mut self, states: &[Vec<f32>], targets: &[Vec<f32>]) -> Result<()> {
        Self::check_dim("targets", states.len(), targets.len())?;
        if states.is_empty() {
            return Ok(());
        }

        let xs = self.to_tensor(states, self.in_dim, "observation")?;
        let ys = self.to_tensor(targets, self.out_dim, "target")?;
        let loss = mse(&self.mlp.forward(&xs)?, &ys)?;

        let loss_value = loss.to_scalar::<f32>()?;
        if !loss_value.is_finite() {
            return Err(LanderError::TrainingDivergence(format!("loss = {}", loss_value)).into());
        }

        self.opt.backward_step(&loss)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        let path = path.with_extension("safetensors");
        self.varmap.save(&path)?;
        info!("Save mlp regressor to {:?}", path);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let path = path.with_extension("safetensors");
        self.varmap.load(&path)?;
        info!("Load mlp regressor from {:?}", path);
        Ok(())
    }
}
