use anyhow::Result;
use lander_candle_agent::{mlp::MlpConfig, opt::OptimizerConfig, MlpRegressor, MlpRegressorConfig};
use lander_core::{
    Agent, DqnAgent, DqnConfig, Policy, Regressor, ReplayBufferConfig, Transition,
};
use tempdir::TempDir;

fn data() -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
    let states = vec![
        vec![1.0, 0.0, 0.5],
        vec![0.0, 1.0, -0.5],
        vec![1.0, 1.0, 0.0],
        vec![-1.0, 0.5, 1.0],
    ];
    let targets = vec![
        vec![1.0, -1.0],
        vec![0.5, 0.0],
        vec![-0.5, 2.0],
        vec![0.0, 1.0],
    ];
    (states, targets)
}

#[test]
fn test_fit_reduces_loss() -> Result<()> {
    let config = MlpRegressorConfig::default().mlp_config(MlpConfig::new(vec![32, 32]));
    let mut q = MlpRegressor::build(&config, 3, 2, 0.01)?;
    let (states, targets) = data();

    let loss0 = q.loss(&states, &targets)?;
    for _ in 0..300 {
        q.fit(&states, &targets)?;
    }
    let loss1 = q.loss(&states, &targets)?;
    assert!(loss1 < 0.5 * loss0, "{} -> {}", loss0, loss1);
    Ok(())
}

#[test]
fn test_fit_with_adamw() -> Result<()> {
    let config = MlpRegressorConfig::default()
        .mlp_config(MlpConfig::new(vec![16]))
        .opt_config(OptimizerConfig::AdamW {
            lr: 1.0,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            weight_decay: 0.0,
        });
    // The learning rate of the optimizer configuration is overridden.
    let mut q = MlpRegressor::build(&config, 3, 2, 0.01)?;
    let (states, targets) = data();

    let loss0 = q.loss(&states, &targets)?;
    for _ in 0..300 {
        q.fit(&states, &targets)?;
    }
    assert!(q.loss(&states, &targets)? < loss0);
    Ok(())
}

#[test]
fn test_save_and_load() -> Result<()> {
    let config = MlpRegressorConfig::default().mlp_config(MlpConfig::new(vec![8]));
    let q1 = MlpRegressor::build(&config, 3, 2, 0.01)?;
    let mut q2 = MlpRegressor::build(&config, 3, 2, 0.01)?;

    let dir = TempDir::new("mlp_regressor")?;
    let path = dir.path().join("qnet");
    q1.save_params(&path)?;
    assert!(dir.path().join("qnet.safetensors").exists());
    q2.load_params(&path)?;

    let (states, _) = data();
    assert_eq!(q1.predict(&states)?, q2.predict(&states)?);
    Ok(())
}

#[test]
fn test_dqn_agent_with_mlp() -> Result<()> {
    let config = DqnConfig::<MlpRegressorConfig>::default()
        .n_actions(4)
        .state_dim(6)
        .batch_size(4)
        .replay_buffer_config(ReplayBufferConfig::default().capacity(100))
        .regressor_config(MlpRegressorConfig::default());
    let mut agent = DqnAgent::<MlpRegressor>::build(config)?;

    for i in 0..8 {
        let s = vec![i as f32 * 0.1; 6];
        let a = agent.select_action(&s)?;
        assert!(a < 4);
        agent.remember(Transition {
            state: s.clone(),
            action: a,
            reward: -1.0,
            next_state: s,
            is_done: i == 7,
        })?;
        assert!(agent.learn()?.is_some() == (i >= 3));
    }
    assert_eq!(agent.n_opts(), 5);

    let dir = TempDir::new("dqn_mlp")?;
    agent.save_params(dir.path())?;
    assert!(dir.path().join("qnet.safetensors").exists());
    Ok(())
}
