//! Train [`Agent`].
mod config;
use crate::{
    error::LanderError,
    record::{Record, RecordValue, Recorder},
    Agent, DefaultEvaluator, Env, Evaluator, Transition,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{info, warn};
use std::path::Path;

/// Score of a finished episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeRecord {
    /// Index of the episode, starting from 0.
    pub episode: usize,

    /// Sum of the rewards of the episode.
    pub score: f32,

    /// The number of environment steps of the episode.
    pub steps: usize,
}

/// Result of [`Trainer::train`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainOutcome {
    /// Finished episodes, in order.
    pub episodes: Vec<EpisodeRecord>,

    /// `true` if training stopped because the rolling mean exceeded the threshold.
    pub solved: bool,

    /// `true` if training ended because the regressor diverged.
    pub diverged: bool,
}

impl TrainOutcome {
    /// Episode scores in order.
    pub fn scores(&self) -> Vec<f32> {
        self.episodes.iter().map(|e| e.score).collect()
    }
}

/// Mean of the last `window` values, or of all of them if there are fewer.
pub(crate) fn rolling_mean(scores: &[f32], window: usize) -> f32 {
    let window = window.max(1);
    let tail = &scores[scores.len().saturating_sub(window)..];
    if tail.is_empty() {
        0.0
    } else {
        tail.iter().sum::<f32>() / tail.len() as f32
    }
}

fn is_divergence(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<LanderError>(),
        Some(LanderError::TrainingDivergence(_))
    )
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop.
///
/// # Training loop
///
/// For each episode `e` in `0..max_episodes`:
///
/// 1. Reset [`Env`].
/// 2. Up to `max_steps` times, or until the environment reports the end of
///    the episode:
///     1. The agent selects an action for the current observation.
///     2. The environment performs a step, and the reward is added to the
///        episode score.
///     3. The transition is handed to the agent with [`Agent::remember`].
///     4. The agent performs an optimization step with [`Agent::learn`],
///        which is skipped until enough transitions are collected.
/// 3. The episode score is stored and written to the [`Recorder`], together
///    with the rolling mean of the last `rolling_window` scores.
/// 4. If `eval_interval > 0` and `(e + 1) % eval_interval == 0`, the agent is
///    evaluated in evaluation mode and the best model so far is saved in
///    `(model_dir)/best`.
/// 5. If `solved_threshold` is set and the rolling mean is greater than it,
///    training stops.
///
/// When training ends, the model is saved in `(model_dir)/final`.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|action|B[Env]
///     B -->|Step|A
///     A -->|Transition|C[ReplayBuffer]
///     C -->|TransitionBatch|A
/// ```
pub struct Trainer {
    /// The maximum number of episodes.
    max_episodes: usize,

    /// Step cap of an episode.
    max_steps: usize,

    /// Early stopping threshold of the rolling mean.
    solved_threshold: Option<f32>,

    /// Window of the rolling mean.
    rolling_window: usize,

    /// Interval of evaluation in episodes.
    eval_interval: usize,

    /// Where to save the trained model.
    model_dir: Option<String>,

    /// Whether divergence aborts training.
    abort_on_divergence: bool,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            max_episodes: config.max_episodes,
            max_steps: config.max_steps,
            solved_threshold: config.solved_threshold,
            rolling_window: config.rolling_window,
            eval_interval: config.eval_interval,
            model_dir: config.model_dir,
            abort_on_divergence: config.abort_on_divergence,
        }
    }

    fn save_model<A: Agent>(agent: &A, model_dir: String) {
        match agent.save_params(Path::new(&model_dir)) {
            Ok(()) => info!("Saved the model in {:?}.", &model_dir),
            Err(e) => warn!("Failed to save model in {:?}: {}", &model_dir, e),
        }
    }

    fn check_dims<E: Env, A: Agent>(env: &E, agent: &A) -> Result<()> {
        for (what, expected, got) in [
            ("number of actions", agent.n_actions(), env.n_actions()),
            ("observation dimension", agent.state_dim(), env.state_dim()),
        ] {
            if expected != got {
                return Err(LanderError::DimensionMismatch {
                    what: what.to_string(),
                    expected,
                    got,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Runs a single episode: reset, steps, terminal.
    ///
    /// The returned record holds the last record of [`Agent::learn`], if any.
    pub fn run_episode<E: Env, A: Agent>(
        &self,
        env: &mut E,
        agent: &mut A,
        episode: usize,
    ) -> Result<(EpisodeRecord, Record)> {
        let mut state = env.reset()?;
        let mut score = 0f32;
        let mut steps = 0;
        let mut record = Record::empty();

        while steps < self.max_steps {
            let act = agent.select_action(&state)?;
            let step = env.step(act)?;
            steps += 1;
            score += step.reward;
            let is_done = step.is_done;
            let next_state = step.next_state.clone();
            agent.remember(Transition::from_step(state, act, &step))?;
            state = next_state;

            if let Some(r) = agent.learn()? {
                record = r;
            }
            if is_done {
                break;
            }
        }

        Ok((
            EpisodeRecord {
                episode,
                score,
                steps,
            },
            record,
        ))
    }

    /// Trains the agent without periodic evaluation.
    pub fn train<E, A, R>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        recorder: &mut R,
    ) -> Result<TrainOutcome>
    where
        E: Env,
        A: Agent,
        R: Recorder,
    {
        self.train_::<E, A, R, DefaultEvaluator<E>>(env, agent, recorder, None)
    }

    /// Trains the agent, evaluating it with `evaluator` every `eval_interval`
    /// episodes.
    pub fn train_with_evaluator<E, A, R, D>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        recorder: &mut R,
        evaluator: &mut D,
    ) -> Result<TrainOutcome>
    where
        E: Env,
        A: Agent,
        R: Recorder,
        D: Evaluator<E>,
    {
        self.train_(env, agent, recorder, Some(evaluator))
    }

    fn train_<E, A, R, D>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        recorder: &mut R,
        mut evaluator: Option<&mut D>,
    ) -> Result<TrainOutcome>
    where
        E: Env,
        A: Agent,
        R: Recorder,
        D: Evaluator<E>,
    {
        Self::check_dims(env, agent)?;
        let mut outcome = TrainOutcome::default();
        let mut scores = Vec::with_capacity(self.max_episodes);
        let mut max_eval_reward = f32::MIN;
        agent.train();

        for episode in 0..self.max_episodes {
            let (ep, mut record) = match self.run_episode(env, agent, episode) {
                Ok(v) => v,
                Err(e) if is_divergence(&e) && !self.abort_on_divergence => {
                    warn!("Stopped training at episode {}: {}", episode, e);
                    outcome.diverged = true;
                    break;
                }
                Err(e) => return Err(e),
            };

            scores.push(ep.score);
            let mean = rolling_mean(&scores, self.rolling_window);
            info!(
                "episode: {}/{}, score: {:.2}, rolling mean: {:.2}",
                episode, self.max_episodes, ep.score, mean
            );

            record.insert("episode", RecordValue::Scalar(episode as f32));
            record.insert("score", RecordValue::Scalar(ep.score));
            record.insert("rolling_mean", RecordValue::Scalar(mean));
            record.insert("steps", RecordValue::Scalar(ep.steps as f32));
            record.insert("datetime", RecordValue::DateTime(Local::now()));

            // Evaluation
            if let Some(evaluator) = evaluator.as_mut() {
                if self.eval_interval > 0 && (episode + 1) % self.eval_interval == 0 {
                    info!("Starts evaluation of the trained model");
                    agent.eval();
                    let eval_reward = evaluator.evaluate(agent);
                    agent.train();
                    let eval_reward = match eval_reward {
                        Ok(v) => v,
                        Err(e) if is_divergence(&e) && !self.abort_on_divergence => {
                            warn!("Stopped training at evaluation of episode {}: {}", episode, e);
                            outcome.diverged = true;
                            recorder.write(record);
                            outcome.episodes.push(ep);
                            break;
                        }
                        Err(e) => return Err(e),
                    };
                    record.insert("eval_reward", RecordValue::Scalar(eval_reward));

                    // Save the best model up to the current episode
                    if eval_reward > max_eval_reward {
                        max_eval_reward = eval_reward;
                        if let Some(model_dir) = &self.model_dir {
                            Self::save_model(agent, format!("{}/best", model_dir));
                        }
                    }
                }
            }

            recorder.write(record);
            outcome.episodes.push(ep);

            if let Some(threshold) = self.solved_threshold {
                if mean > threshold {
                    info!(
                        "Solved at episode {}: rolling mean {:.2} > {:.2}",
                        episode, mean, threshold
                    );
                    outcome.solved = true;
                    break;
                }
            }
        }

        recorder.flush();
        if let Some(model_dir) = &self.model_dir {
            if outcome.diverged {
                warn!("Skipped saving the final model of a diverged run");
            } else {
                Self::save_model(agent, format!("{}/final", model_dir));
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean() {
        assert_eq!(rolling_mean(&[], 100), 0.0);
        assert_eq!(rolling_mean(&[1.0, 2.0, 3.0], 100), 2.0);
        assert_eq!(rolling_mean(&[100.0, 1.0, 2.0, 3.0], 3), 2.0);
    }
}
