//! Target computation of one-step Q-learning.

/// Index of the largest value, the first one on ties.
///
/// Returns `0` for an empty slice.
pub fn argmax(xs: &[f32]) -> usize {
    let mut best = 0;
    for (i, x) in xs.iter().enumerate().skip(1) {
        if *x > xs[best] {
            best = i;
        }
    }
    best
}

fn max(xs: &[f32]) -> f32 {
    xs.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

/// Computes bootstrapped targets `r + gamma * max_a' Q(o_t+1, a')`.
///
/// For terminal transitions the target is the reward itself; `next_q` of
/// those rows is not looked at.
pub fn td_targets(rewards: &[f32], is_done: &[bool], next_q: &[Vec<f32>], gamma: f64) -> Vec<f32> {
    rewards
        .iter()
        .zip(is_done.iter())
        .zip(next_q.iter())
        .map(|((&r, &done), q)| {
            if done {
                r
            } else {
                r + gamma as f32 * max(q)
            }
        })
        .collect()
}

/// Writes `targets[i]` into `targets_full[i][actions[i]]`, row by row.
///
/// Entries of other actions keep the values predicted by the regressor, so
/// that they do not contribute to the loss.
pub fn overwrite_action_values(targets_full: &mut [Vec<f32>], actions: &[usize], targets: &[f32]) {
    for (i, (&a, &t)) in actions.iter().zip(targets.iter()).enumerate() {
        targets_full[i][a] = t;
    }
}
