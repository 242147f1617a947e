//! Optimizers.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer of a regressor.
///
/// The learning rate given here is overridden by the one of the agent when
/// the regressor is built, see [`OptimizerConfig::learning_rate`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// AdamW optimizer.
    AdamW {
        /// Learning rate.
        lr: f64,
        #[serde(default = "default_beta1")]
        /// Decay of the first moment.
        beta1: f64,
        #[serde(default = "default_beta2")]
        /// Decay of the second moment.
        beta2: f64,
        #[serde(default = "default_eps")]
        /// Term added to the denominator.
        eps: f64,
        #[serde(default = "default_weight_decay")]
        /// Weight decay.
        weight_decay: f64,
    },

    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
    },
}

fn default_beta1() -> f64 {
    ParamsAdamW::default().beta1
}

fn default_beta2() -> f64 {
    ParamsAdamW::default().beta2
}

fn default_eps() -> f64 {
    ParamsAdamW::default().eps
}

fn default_weight_decay() -> f64 {
    ParamsAdamW::default().weight_decay
}

impl OptimizerConfig {
    /// Constructs an optimizer of the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            } => {
                let params = ParamsAdamW {
                    lr: *lr,
                    beta1: *beta1,
                    beta2: *beta2,
                    eps: *eps,
                    weight_decay: *weight_decay,
                };
                Ok(Optimizer::AdamW(AdamW::new(vars, params)?))
            }
            OptimizerConfig::Adam { lr } => {
                let params = ParamsAdam {
                    lr: *lr,
                    ..ParamsAdam::default()
                };
                Ok(Optimizer::Adam(Adam::new(vars, params)?))
            }
        }
    }

    /// Override learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::AdamW {
                lr: _,
                beta1,
                beta2,
                eps,
                weight_decay,
            } => Self::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            },
            Self::Adam { lr: _ } => Self::Adam { lr },
        }
    }

    /// Learning rate.
    pub fn get_learning_rate(&self) -> f64 {
        match self {
            Self::AdamW { lr, .. } | Self::Adam { lr } => *lr,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 0.001 }
    }
}

/// Optimizers.
pub enum Optimizer {
    /// AdamW optimizer.
    AdamW(AdamW),

    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Applies a backward step pass.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::AdamW(opt) => Ok(opt.backward_step(loss)?),
            Self::Adam(opt) => Ok(opt.backward_step(loss)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_rate() {
        let config = OptimizerConfig::default().learning_rate(0.01);
        assert_eq!(config, OptimizerConfig::Adam { lr: 0.01 });

        let config = OptimizerConfig::AdamW {
            lr: 0.1,
            beta1: 0.8,
            beta2: 0.9,
            eps: 1e-6,
            weight_decay: 0.0,
        }
        .learning_rate(0.5);
        assert_eq!(config.get_learning_rate(), 0.5);
        assert!(matches!(config, OptimizerConfig::AdamW { beta1, .. } if beta1 == 0.8));
    }

    #[test]
    fn test_adamw_defaults_from_yaml() -> Result<()> {
        let config: OptimizerConfig = serde_yaml::from_str("AdamW:\n  lr: 0.01\n")?;
        assert_eq!(config.get_learning_rate(), 0.01);
        assert!(
            matches!(config, OptimizerConfig::AdamW { eps, .. } if eps == ParamsAdamW::default().eps)
        );
        Ok(())
    }
}
