//! Environment step and transition.

/// Represents the outcome of an environment step `(o_t+1, r_t, is_done_t)`.
///
/// An environment emits a [`Step`] at every interaction. Together with the
/// observation and the action that produced it, it forms a [`Transition`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Observation after the step.
    pub next_state: Vec<f32>,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if the episode is terminated.
    pub is_done: bool,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(next_state: Vec<f32>, reward: f32, is_done: bool) -> Self {
        Self {
            next_state,
            reward,
            is_done,
        }
    }
}

/// A transition `(o_t, a_t, r_t, o_t+1, is_done_t)`.
///
/// Transitions are immutable once pushed into a
/// [`ReplayBuffer`](crate::ReplayBuffer).
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Observation `o_t`.
    pub state: Vec<f32>,

    /// Action `a_t`, in `[0, n_actions)`.
    pub action: usize,

    /// Reward `r_t`.
    pub reward: f32,

    /// Observation `o_t+1`.
    pub next_state: Vec<f32>,

    /// Whether `o_t+1` is terminal.
    pub is_done: bool,
}

impl Transition {
    /// Builds a transition from the previous observation, the action taken and
    /// the resulting [`Step`].
    pub fn from_step(state: Vec<f32>, action: usize, step: &Step) -> Self {
        Self {
            state,
            action,
            reward: step.reward,
            next_state: step.next_state.clone(),
            is_done: step.is_done,
        }
    }
}
