//! Batch of transitions sampled from [`ReplayBuffer`](super::ReplayBuffer).
use crate::Transition;

/// Transitions `(o_t, a_t, r_t, o_t+1, is_done_t)` stored column-wise.
///
/// Row `i` of every field belongs to the same transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionBatch {
    /// Observations.
    pub states: Vec<Vec<f32>>,

    /// Actions.
    pub actions: Vec<usize>,

    /// Rewards.
    pub rewards: Vec<f32>,

    /// Next observations.
    pub next_states: Vec<Vec<f32>>,

    /// Done flags.
    pub is_done: Vec<bool>,
}

impl TransitionBatch {
    /// Creates an empty batch with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
            next_states: Vec::with_capacity(capacity),
            is_done: Vec::with_capacity(capacity),
        }
    }

    /// Appends a transition as the last row.
    pub fn push(&mut self, tr: &Transition) {
        self.states.push(tr.state.clone());
        self.actions.push(tr.action);
        self.rewards.push(tr.reward);
        self.next_states.push(tr.next_state.clone());
        self.is_done.push(tr.is_done);
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Returns `true` if the batch has no transitions.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Returns the `i`-th transition.
    pub fn get(&self, i: usize) -> Option<Transition> {
        if i >= self.len() {
            return None;
        }
        Some(Transition {
            state: self.states[i].clone(),
            action: self.actions[i],
            reward: self.rewards[i],
            next_state: self.next_states[i].clone(),
            is_done: self.is_done[i],
        })
    }
}
