//! Multilayer perceptron.
use anyhow::Result;
use candle_core::{Module, Tensor};
use candle_nn::{linear, Linear, VarBuilder};
use serde::{Deserialize, Serialize};
use std::iter::once;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`].
///
/// Input and output dimensions are given when the network is built, so only
/// the hidden layers are configured here.
pub struct MlpConfig {
    pub(crate) units: Vec<usize>,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            units: vec![150, 120],
        }
    }
}

impl MlpConfig {
    /// Creates configuration of MLP with the given numbers of hidden units.
    pub fn new(units: Vec<usize>) -> Self {
        Self { units }
    }
}

/// Multilayer perceptron with ReLU activation function in the hidden layers
/// and a linear output layer.
pub struct Mlp {
    layers: Vec<Linear>,
}

impl Mlp {
    /// Builds the layers `ln0, ln1, ...` under the prefix `mlp` of `vb`.
    pub fn build(vb: VarBuilder, config: &MlpConfig, in_dim: usize, out_dim: usize) -> Result<Self> {
        let dims: Vec<usize> = once(in_dim)
            .chain(config.units.iter().copied())
            .chain(once(out_dim))
            .collect();
        let vb = vb.pp("mlp");

        let layers = dims
            .windows(2)
            .enumerate()
            .map(|(i, d)| linear(d[0], d[1], vb.pp(format!("ln{}", i))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { layers })
    }

    /// The number of linear layers.
    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let n_layers = self.layers.len();
        let mut xs = xs.clone();

        for (i, layer) in self.layers.iter().enumerate() {
            xs = layer.forward(&xs)?;
            if i + 1 < n_layers {
                xs = xs.relu()?;
            }
        }

        Ok(xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_shapes() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let mlp = Mlp::build(vb, &MlpConfig::default(), 6, 4)?;
        assert_eq!(mlp.n_layers(), 3);
        assert_eq!(varmap.all_vars().len(), 6);

        let xs = Tensor::zeros((5, 6), DType::F32, &Device::Cpu)?;
        assert_eq!(mlp.forward(&xs)?.dims(), &[5, 4]);
        Ok(())
    }

    #[test]
    fn test_no_hidden_layer() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let mlp = Mlp::build(vb, &MlpConfig::new(vec![]), 3, 2)?;
        assert_eq!(mlp.n_layers(), 1);
        Ok(())
    }
}
