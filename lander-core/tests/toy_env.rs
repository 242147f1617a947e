//! DQN on a two-state chain: the agent has to learn that leaving is better
//! than looping.
use anyhow::Result;
use lander_core::{
    error::LanderError, record::BufferedRecorder, Agent, DqnAgent, DqnConfig, Env,
    LinearRegressor, LinearRegressorConfig, Policy, ReplayBufferConfig, Step, Trainer,
    TrainerConfig,
};
use tempdir::TempDir;

const START: [f32; 2] = [1.0, 0.0];
const GOAL: [f32; 2] = [0.0, 1.0];

/// Action 0 ends the episode with `+1`; action 1 keeps the agent in the
/// starting state with `-1`.
struct ChainEnv;

impl Env for ChainEnv {
    type Config = ();

    fn build(_config: &Self::Config, _seed: u64) -> Result<Self> {
        Ok(Self)
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        Ok(START.to_vec())
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        match act {
            0 => Ok(Step::new(GOAL.to_vec(), 1.0, true)),
            1 => Ok(Step::new(START.to_vec(), -1.0, false)),
            _ => Err(LanderError::InvalidAction {
                action: act,
                n_actions: 2,
            }
            .into()),
        }
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn state_dim(&self) -> usize {
        2
    }
}

fn agent_config() -> DqnConfig<LinearRegressorConfig> {
    DqnConfig::default()
        .n_actions(2)
        .state_dim(2)
        .epsilon(1.0)
        .epsilon_min(0.01)
        .epsilon_decay(0.95)
        .gamma(0.5)
        .batch_size(8)
        .lr(0.1)
        .replay_buffer_config(ReplayBufferConfig::default().capacity(1000).seed(3))
        .regressor_config(LinearRegressorConfig {
            init_std: 0.1,
            seed: 5,
        })
        .seed(7)
}

fn train_agent() -> Result<DqnAgent<LinearRegressor>> {
    let mut env = ChainEnv::build(&(), 0)?;
    let mut agent = DqnAgent::<LinearRegressor>::build(agent_config())?;
    let mut recorder = BufferedRecorder::new();
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(300)
            .max_steps(20)
            .rolling_window(10),
    );
    let outcome = trainer.train(&mut env, &mut agent, &mut recorder)?;
    assert_eq!(outcome.episodes.len(), 300);
    assert!(!outcome.solved);
    assert!(!outcome.diverged);
    Ok(agent)
}

#[test]
fn test_learns_to_leave() -> Result<()> {
    let mut agent = train_agent()?;

    let q = agent.action_values(&START)?;
    assert!(q[0] > q[1], "q = {:?}", q);
    assert!((q[0] - 1.0).abs() < 0.1, "q = {:?}", q);

    // Epsilon reaches its floor long before the end of training.
    assert!((agent.epsilon() - 0.01).abs() < 1e-9);

    let n = 1000;
    let n_leave = (0..n)
        .map(|_| agent.select_action(&START))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .filter(|&a| a == 0)
        .count();
    assert!(n_leave as f32 / n as f32 >= 0.95, "{}/{}", n_leave, n);

    agent.eval();
    assert_eq!(agent.select_action(&START)?, 0);
    Ok(())
}

#[test]
fn test_save_and_load_agent() -> Result<()> {
    let agent = train_agent()?;
    let dir = TempDir::new("chain_dqn")?;
    agent.save_params(dir.path())?;

    let mut agent2 = DqnAgent::<LinearRegressor>::build(agent_config())?;
    agent2.load_params(dir.path())?;
    assert_eq!(agent.action_values(&START)?, agent2.action_values(&START)?);
    Ok(())
}
