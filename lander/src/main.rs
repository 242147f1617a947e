//! Trains a DQN agent on the lander environment, or evaluates a trained one.
mod config;
mod scores;
use anyhow::Result;
use clap::Parser;
use config::LanderDqnConfig;
use lander_candle_agent::MlpRegressor;
use lander_core::{
    record::BufferedRecorder, Agent, DefaultEvaluator, DqnAgent, Env, Evaluator, TrainOutcome,
    Trainer,
};
use lander_env::LanderEnv;
use log::info;
use std::path::{Path, PathBuf};

type Dqn = DqnAgent<MlpRegressor>;

/// Train/eval DQN agent in the lander environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file with `env`, `agent` and `trainer` sections; built-in
    /// defaults are used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Random seed of the environments and the agent
    #[arg(long)]
    seed: Option<u64>,

    /// Directory where the trained models are saved
    #[arg(long)]
    model_dir: Option<String>,

    /// CSV file receiving the episode scores
    #[arg(long, default_value = "scores.csv")]
    scores: PathBuf,

    /// Evaluate the best model in the model directory, not train
    #[arg(short, long, default_value_t = false)]
    eval: bool,
}

fn load_config(args: &Args) -> Result<LanderDqnConfig> {
    let mut config = match &args.config {
        Some(path) => LanderDqnConfig::load(path)?,
        None => LanderDqnConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if let Some(episodes) = args.episodes {
        config.trainer = config.trainer.max_episodes(episodes);
    }
    if let Some(model_dir) = &args.model_dir {
        config.trainer = config.trainer.model_dir(model_dir.as_str());
    }
    config.check()?;
    Ok(config)
}

fn evaluator(config: &LanderDqnConfig) -> Result<DefaultEvaluator<LanderEnv>> {
    DefaultEvaluator::new(
        &config.env,
        config.seed.wrapping_add(1),
        config.trainer.n_episodes_per_eval,
        config.trainer.max_steps,
    )
}

fn train(config: &LanderDqnConfig, scores: &Path) -> Result<TrainOutcome> {
    let mut env = LanderEnv::build(&config.env, config.seed)?;
    let mut agent = Dqn::build(config.agent.clone())?;
    let mut recorder = BufferedRecorder::new();
    let mut trainer = Trainer::build(config.trainer.clone());

    let outcome = if config.trainer.eval_interval > 0 {
        let mut evaluator = evaluator(config)?;
        trainer.train_with_evaluator(&mut env, &mut agent, &mut recorder, &mut evaluator)?
    } else {
        trainer.train(&mut env, &mut agent, &mut recorder)?
    };

    scores::write_scores(scores, &outcome.episodes)?;
    info!(
        "Finished {} episodes (solved: {}, diverged: {}); scores written to {:?}",
        outcome.episodes.len(),
        outcome.solved,
        outcome.diverged,
        scores
    );
    Ok(outcome)
}

fn eval(config: &LanderDqnConfig, model_dir: &Path) -> Result<f32> {
    let mut agent = Dqn::build(config.agent.clone())?;
    agent.load_params(model_dir)?;
    agent.eval();
    evaluator(config)?.evaluate(&mut agent)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args)?;

    if args.eval {
        let model_dir = match &config.trainer.model_dir {
            Some(dir) => Path::new(dir).join("best"),
            None => anyhow::bail!("--eval needs a model directory"),
        };
        let score = eval(&config, &model_dir)?;
        info!("Average score of {:?}: {:.2}", model_dir, score);
    } else {
        train(&config, &args.scores)?;
    }

    Ok(())
}
