//! DQN agent.
use super::{
    config::DqnConfig,
    target::{argmax, overwrite_action_values, td_targets},
};
use crate::{
    error::LanderError,
    record::{Record, RecordValue},
    Agent, Policy, Regressor, ReplayBuffer, Transition,
};
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{fs, path::Path};

/// File name of the regressor parameters in a model directory.
const QNET_FILE: &str = "qnet";

fn check_finite(rows: &[Vec<f32>], what: &str) -> Result<()> {
    if rows.iter().flatten().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(LanderError::TrainingDivergence(format!("non-finite {}", what)).into())
    }
}

fn dim_mismatch<T>(what: &str, expected: usize, got: usize) -> Result<T> {
    Err(LanderError::DimensionMismatch {
        what: what.to_string(),
        expected,
        got,
    }
    .into())
}

/// Every row must hold one value per action.
fn check_widths(rows: &[Vec<f32>], n_actions: usize, what: &str) -> Result<()> {
    match rows.iter().find(|row| row.len() != n_actions) {
        Some(row) => dim_mismatch(what, n_actions, row.len()),
        None => Ok(()),
    }
}

/// DQN agent.
///
/// The same regressor `Q` is used both to select actions and to evaluate
/// the bootstrapped targets; there is no target network.
pub struct DqnAgent<Q: Regressor> {
    qnet: Q,
    buffer: ReplayBuffer,
    n_actions: usize,
    state_dim: usize,
    epsilon: f64,
    epsilon_min: f64,
    epsilon_decay: f64,
    gamma: f64,
    batch_size: usize,
    n_opts: usize,
    train: bool,
    rng: SmallRng,
}

impl<Q: Regressor> DqnAgent<Q> {
    /// Constructs DQN agent, building the regressor from the configuration.
    pub fn build(config: DqnConfig<Q::Config>) -> Result<Self> {
        config.check()?;
        let qnet = Q::build(
            &config.regressor_config,
            config.state_dim,
            config.n_actions,
            config.lr,
        )?;
        Self::with_regressor(config, qnet)
    }

    /// Constructs DQN agent with a given regressor.
    ///
    /// `config.regressor_config` and `config.lr` are not used.
    pub fn with_regressor(config: DqnConfig<Q::Config>, qnet: Q) -> Result<Self> {
        config.check()?;
        Ok(Self {
            qnet,
            buffer: ReplayBuffer::build(&config.replay_buffer_config),
            n_actions: config.n_actions,
            state_dim: config.state_dim,
            epsilon: config.epsilon,
            epsilon_min: config.epsilon_min,
            epsilon_decay: config.epsilon_decay,
            gamma: config.gamma,
            batch_size: config.batch_size,
            n_opts: 0,
            train: true,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Overrides the exploration rate.
    pub fn set_epsilon(&mut self, v: f64) {
        self.epsilon = v;
    }

    /// The number of optimization steps done so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Replay buffer of the agent.
    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    /// Regressor approximating action values.
    pub fn regressor(&self) -> &Q {
        &self.qnet
    }

    /// Action values predicted for a single observation.
    pub fn action_values(&self, state: &[f32]) -> Result<Vec<f32>> {
        if state.len() != self.state_dim {
            return dim_mismatch("observation", self.state_dim, state.len());
        }
        let mut q = self.qnet.predict(&[state.to_vec()])?;
        check_widths(&q, self.n_actions, "action values")?;
        check_finite(&q, "action values")?;
        Ok(q.remove(0))
    }

    fn greedy_action(&self, state: &[f32]) -> Result<usize> {
        Ok(argmax(&self.action_values(state)?))
    }

    fn decay_epsilon(&mut self) {
        if self.epsilon > self.epsilon_min {
            self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        }
    }

    fn learn_(&mut self) -> Result<Record> {
        let batch = self.buffer.sample(self.batch_size)?;

        let next_q = self.qnet.predict(&batch.next_states)?;
        check_widths(&next_q, self.n_actions, "action values of next observations")?;
        check_finite(&next_q, "action values of next observations")?;
        let targets = td_targets(&batch.rewards, &batch.is_done, &next_q, self.gamma);

        let mut targets_full = self.qnet.predict(&batch.states)?;
        check_widths(&targets_full, self.n_actions, "action values of observations")?;
        check_finite(&targets_full, "action values of observations")?;
        overwrite_action_values(&mut targets_full, &batch.actions, &targets);

        self.qnet.fit(&batch.states, &targets_full)?;

        self.decay_epsilon();
        self.n_opts += 1;

        let q_target_mean = targets.iter().sum::<f32>() / targets.len() as f32;
        debug!(
            "opt {}: epsilon = {:.4}, mean target = {:.4}",
            self.n_opts, self.epsilon, q_target_mean
        );

        Ok(Record::from_slice(&[
            ("epsilon", RecordValue::Scalar(self.epsilon as f32)),
            ("q_target_mean", RecordValue::Scalar(q_target_mean)),
            ("n_opts", RecordValue::Scalar(self.n_opts as f32)),
        ]))
    }
}

impl<Q: Regressor> Policy for DqnAgent<Q> {
    /// Epsilon-greedy in training mode, greedy in evaluation mode.
    fn select_action(&mut self, state: &[f32]) -> Result<usize> {
        if self.train && self.rng.gen::<f64>() < self.epsilon {
            let a = self.rng.gen_range(0..self.n_actions);
            trace!("random action {}", a);
            Ok(a)
        } else {
            self.greedy_action(state)
        }
    }
}

impl<Q: Regressor> Agent for DqnAgent<Q> {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn state_dim(&self) -> usize {
        self.state_dim
    }

    /// Rejects transitions with an action or observations that do not fit
    /// the agent.
    fn remember(&mut self, tr: Transition) -> Result<()> {
        if tr.action >= self.n_actions {
            return Err(LanderError::InvalidAction {
                action: tr.action,
                n_actions: self.n_actions,
            }
            .into());
        }
        if tr.state.len() != self.state_dim {
            return dim_mismatch("observation", self.state_dim, tr.state.len());
        }
        if tr.next_state.len() != self.state_dim {
            return dim_mismatch("next observation", self.state_dim, tr.next_state.len());
        }
        self.buffer.push(tr);
        Ok(())
    }

    fn learn(&mut self) -> Result<Option<Record>> {
        if self.buffer.len() < self.batch_size {
            Ok(None)
        } else {
            Ok(Some(self.learn_()?))
        }
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save_params(&path.join(QNET_FILE))
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load_params(&path.join(QNET_FILE))
    }
}
