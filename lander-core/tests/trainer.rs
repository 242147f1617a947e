use anyhow::Result;
use lander_core::{
    error::LanderError,
    record::{BufferedRecorder, NullRecorder, Record, RecordValue},
    Agent, DefaultEvaluator, Env, Evaluator, Policy, Step, Trainer, TrainerConfig, Transition,
};
use std::path::Path;
use tempdir::TempDir;

/// Every episode lasts `len` steps; the reward of each step of episode `k`
/// is `k`.
#[derive(Clone)]
struct CountingEnv {
    len: usize,
    episode: i32,
    t: usize,
}

impl Env for CountingEnv {
    type Config = usize;

    fn build(config: &Self::Config, _seed: u64) -> Result<Self> {
        Ok(Self {
            len: *config,
            episode: -1,
            t: 0,
        })
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        self.episode += 1;
        self.t = 0;
        Ok(vec![0.0])
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Vec<f32>> {
        self.t = 0;
        Ok(vec![0.0])
    }

    fn step(&mut self, _act: usize) -> Result<Step> {
        self.t += 1;
        Ok(Step::new(
            vec![self.t as f32],
            self.episode as f32,
            self.t >= self.len,
        ))
    }

    fn n_actions(&self) -> usize {
        1
    }

    fn state_dim(&self) -> usize {
        1
    }
}

/// Always selects action 0 and reports a divergence on the `diverge_at`-th
/// call of `learn`.
#[derive(Default)]
struct ScriptedAgent {
    n_remembered: usize,
    n_learn: usize,
    diverge_at: Option<usize>,
    train: bool,
    n_saved: usize,
}

impl Policy for ScriptedAgent {
    fn select_action(&mut self, _state: &[f32]) -> Result<usize> {
        Ok(0)
    }
}

impl Agent for ScriptedAgent {
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
        1
    }

    fn state_dim(&self) -> usize {
        1
    }

    fn remember(&mut self, _tr: Transition) -> Result<()> {
        self.n_remembered += 1;
        Ok(())
    }

    fn learn(&mut self) -> Result<Option<Record>> {
        self.n_learn += 1;
        if Some(self.n_learn) == self.diverge_at {
            return Err(LanderError::TrainingDivergence("nan".to_string()).into());
        }
        Ok(Some(Record::from_slice(&[(
            "epsilon",
            RecordValue::Scalar(0.5),
        )])))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        std::fs::write(path.join("params"), b"scripted")?;
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_runs_all_episodes_without_threshold() -> Result<()> {
    let mut env = CountingEnv::build(&3, 0)?;
    let mut agent = ScriptedAgent::default();
    let mut recorder = BufferedRecorder::new();
    let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(4));

    let outcome = trainer.train(&mut env, &mut agent, &mut recorder)?;
    assert_eq!(outcome.scores(), vec![0.0, 3.0, 6.0, 9.0]);
    assert!(outcome.episodes.iter().all(|e| e.steps == 3));
    assert!(!outcome.solved);
    assert_eq!(agent.n_remembered, 12);
    assert_eq!(agent.n_learn, 12);

    assert_eq!(recorder.len(), 4);
    assert_eq!(recorder.scalars("score"), vec![0.0, 3.0, 6.0, 9.0]);
    assert_eq!(recorder.scalars("epsilon"), vec![0.5; 4]);
    assert_eq!(recorder.scalars("rolling_mean"), vec![0.0, 1.5, 3.0, 4.5]);
    Ok(())
}

#[test]
fn test_step_cap() -> Result<()> {
    let mut env = CountingEnv::build(&100, 0)?;
    let mut agent = ScriptedAgent::default();
    let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(2).max_steps(5));

    let outcome = trainer.train(&mut env, &mut agent, &mut NullRecorder::new())?;
    assert!(outcome.episodes.iter().all(|e| e.steps == 5));
    assert_eq!(outcome.scores(), vec![0.0, 5.0]);
    Ok(())
}

#[test]
fn test_early_stop_is_strict() -> Result<()> {
    // Scores are 0, 1, 2, 3, 4, ...; rolling means over 3 episodes are
    // 0, 0.5, 1, 2, 3, ...
    let mut env = CountingEnv::build(&1, 0)?;
    let mut agent = ScriptedAgent::default();
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(100)
            .rolling_window(3)
            .solved_threshold(2.0),
    );

    let outcome = trainer.train(&mut env, &mut agent, &mut NullRecorder::new())?;
    assert!(outcome.solved);
    assert_eq!(outcome.scores(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    Ok(())
}

#[test]
fn test_divergence_aborts() -> Result<()> {
    let mut env = CountingEnv::build(&2, 0)?;
    let mut agent = ScriptedAgent {
        diverge_at: Some(5),
        ..Default::default()
    };
    let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(10));

    let err = trainer
        .train(&mut env, &mut agent, &mut NullRecorder::new())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LanderError>(),
        Some(LanderError::TrainingDivergence(_))
    ));
    Ok(())
}

#[test]
fn test_divergence_ends_run() -> Result<()> {
    let mut env = CountingEnv::build(&2, 0)?;
    let mut agent = ScriptedAgent {
        diverge_at: Some(5),
        ..Default::default()
    };
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(10)
            .abort_on_divergence(false),
    );

    let outcome = trainer.train(&mut env, &mut agent, &mut NullRecorder::new())?;
    assert!(outcome.diverged);
    assert!(!outcome.solved);
    assert_eq!(outcome.scores(), vec![0.0, 2.0]);
    Ok(())
}

#[test]
fn test_diverged_run_skips_final_model() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let model_dir = dir.path().to_string_lossy().to_string();

    let mut env = CountingEnv::build(&2, 0)?;
    let mut agent = ScriptedAgent {
        diverge_at: Some(5),
        ..Default::default()
    };
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(10)
            .abort_on_divergence(false)
            .model_dir(model_dir),
    );

    let outcome = trainer.train(&mut env, &mut agent, &mut NullRecorder::new())?;
    assert!(outcome.diverged);
    assert!(!dir.path().join("final").join("params").exists());
    Ok(())
}

/// Evaluator whose `n`-th evaluation reports a divergence.
struct DivergingEvaluator {
    n_evals: usize,
    diverge_at: usize,
}

impl Evaluator<CountingEnv> for DivergingEvaluator {
    fn evaluate<P: Policy>(&mut self, _policy: &mut P) -> Result<f32> {
        self.n_evals += 1;
        if self.n_evals == self.diverge_at {
            return Err(LanderError::TrainingDivergence("non-finite".to_string()).into());
        }
        Ok(1.0)
    }
}

#[test]
fn test_evaluation_divergence_ends_run() -> Result<()> {
    let mut env = CountingEnv::build(&2, 0)?;
    let mut evaluator = DivergingEvaluator {
        n_evals: 0,
        diverge_at: 2,
    };
    let mut agent = ScriptedAgent::default();
    let mut recorder = BufferedRecorder::new();
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(10)
            .eval_interval(2)
            .abort_on_divergence(false),
    );

    let outcome =
        trainer.train_with_evaluator(&mut env, &mut agent, &mut recorder, &mut evaluator)?;
    assert!(outcome.diverged);
    assert!(agent.is_train());
    assert_eq!(outcome.scores(), vec![0.0, 2.0, 4.0, 6.0]);
    assert_eq!(recorder.scalars("score"), vec![0.0, 2.0, 4.0, 6.0]);
    assert_eq!(recorder.scalars("eval_reward"), vec![1.0]);
    Ok(())
}

#[test]
fn test_evaluation_divergence_aborts() -> Result<()> {
    let mut env = CountingEnv::build(&2, 0)?;
    let mut evaluator = DivergingEvaluator {
        n_evals: 0,
        diverge_at: 1,
    };
    let mut agent = ScriptedAgent::default();
    let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(10).eval_interval(2));

    let err = trainer
        .train_with_evaluator(
            &mut env,
            &mut agent,
            &mut NullRecorder::new(),
            &mut evaluator,
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LanderError>(),
        Some(LanderError::TrainingDivergence(_))
    ));
    Ok(())
}

#[test]
fn test_dimension_mismatch() -> Result<()> {
    struct WideEnv(CountingEnv);

    impl Env for WideEnv {
        type Config = usize;

        fn build(config: &Self::Config, seed: u64) -> Result<Self> {
            Ok(Self(CountingEnv::build(config, seed)?))
        }

        fn reset(&mut self) -> Result<Vec<f32>> {
            self.0.reset()
        }

        fn step(&mut self, act: usize) -> Result<Step> {
            self.0.step(act)
        }

        fn n_actions(&self) -> usize {
            1
        }

        fn state_dim(&self) -> usize {
            4
        }
    }

    let mut env = WideEnv::build(&2, 0)?;
    let mut agent = ScriptedAgent::default();
    let mut trainer = Trainer::build(TrainerConfig::default());

    let err = trainer
        .train(&mut env, &mut agent, &mut NullRecorder::new())
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<LanderError>(),
        Some(&LanderError::DimensionMismatch {
            what: "observation dimension".to_string(),
            expected: 1,
            got: 4,
        })
    );
    assert_eq!(agent.n_remembered, 0);
    Ok(())
}

#[test]
fn test_evaluation_and_model_dir() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let model_dir = dir.path().to_string_lossy().to_string();

    let mut env = CountingEnv::build(&2, 0)?;
    let mut evaluator = DefaultEvaluator::<CountingEnv>::new(&2, 0, 3, 10)?;
    let mut agent = ScriptedAgent::default();
    let mut recorder = BufferedRecorder::new();
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_episodes(4)
            .eval_interval(2)
            .model_dir(model_dir),
    );

    trainer.train_with_evaluator(&mut env, &mut agent, &mut recorder, &mut evaluator)?;
    assert_eq!(recorder.scalars("eval_reward").len(), 2);
    assert!(agent.is_train());
    assert!(dir.path().join("best").join("params").exists());
    assert!(dir.path().join("final").join("params").exists());
    Ok(())
}
