//! Fixed-capacity ring buffer of transitions.
use super::{ReplayBufferConfig, TransitionBatch};
use crate::{error::LanderError, Transition};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A ring buffer of [`Transition`]s with FIFO eviction.
///
/// Once `capacity` transitions are stored, every push overwrites the
/// oldest one. Sampling is uniform and without replacement.
pub struct ReplayBuffer {
    capacity: usize,
    /// Write position, which is also the position of the oldest transition
    /// once the buffer is full.
    i: usize,
    data: Vec<Transition>,
    rng: StdRng,
}

impl ReplayBuffer {
    /// Builds a replay buffer from the given configuration.
    pub fn build(config: &ReplayBufferConfig) -> Self {
        Self {
            capacity: config.capacity,
            i: 0,
            data: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Pushes a transition, evicting the oldest one if the buffer is full.
    pub fn push(&mut self, tr: Transition) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() < self.capacity {
            self.data.push(tr);
        } else {
            self.data[self.i] = tr;
        }
        self.i = (self.i + 1) % self.capacity;
    }

    /// Samples `size` distinct transitions uniformly at random.
    ///
    /// # Errors
    ///
    /// [`LanderError::InsufficientTransitions`] if fewer than `size`
    /// transitions are stored.
    pub fn sample(&mut self, size: usize) -> Result<TransitionBatch> {
        if size > self.data.len() {
            return Err(LanderError::InsufficientTransitions {
                requested: size,
                available: self.data.len(),
            }
            .into());
        }

        let ixs = index::sample(&mut self.rng, self.data.len(), size);
        let mut batch = TransitionBatch::with_capacity(size);
        for ix in ixs.iter() {
            batch.push(&self.data[ix]);
        }
        Ok(batch)
    }

    /// The number of stored transitions.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no transition is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the stored transitions from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        let (newer, older) = if self.data.len() < self.capacity {
            self.data.split_at(self.data.len())
        } else {
            self.data.split_at(self.i)
        };
        older.iter().chain(newer.iter())
    }

    /// Removes all transitions.
    pub fn clear(&mut self) {
        self.data.clear();
        self.i = 0;
    }
}
