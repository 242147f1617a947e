//! Lander dynamics.
use crate::LanderConfig;
use anyhow::Result;
use lander_core::{error::LanderError, Env, Step};
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::convert::TryFrom;

/// Reward of a soft landing.
const LANDING_REWARD: f32 = 100.0;

/// Reward of a crash or of leaving the field.
const CRASH_REWARD: f32 = -100.0;

/// Cost of a frame with the main engine on.
const MAIN_ENGINE_COST: f32 = 0.3;

/// Cost of a frame with an orientation engine on.
const SIDE_ENGINE_COST: f32 = 0.03;

/// Actions of [`LanderEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Do nothing.
    Noop = 0,

    /// Fire the left orientation engine.
    Left = 1,

    /// Fire the main engine.
    Main = 2,

    /// Fire the right orientation engine.
    Right = 3,
}

impl Action {
    /// The number of actions.
    pub const N: usize = 4;
}

impl TryFrom<usize> for Action {
    type Error = LanderError;

    fn try_from(act: usize) -> Result<Self, Self::Error> {
        match act {
            0 => Ok(Self::Noop),
            1 => Ok(Self::Left),
            2 => Ok(Self::Main),
            3 => Ok(Self::Right),
            _ => Err(LanderError::InvalidAction {
                action: act,
                n_actions: Self::N,
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct State {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    angle: f32,
    angvel: f32,
}

impl State {
    fn obs(&self) -> Vec<f32> {
        vec![self.x, self.y, self.vx, self.vy, self.angle, self.angvel]
    }

    /// Potential of the state; its change is the per-step reward.
    fn shaping(&self) -> f32 {
        -100.0 * (self.x * self.x + self.y * self.y).sqrt()
            - 100.0 * (self.vx * self.vx + self.vy * self.vy).sqrt()
            - 100.0 * self.angle.abs()
    }
}

/// Two-dimensional lander.
///
/// Episodes end with a touchdown on the ground (`+100` if slow and upright,
/// `-100` otherwise) or with `-100` when the lander leaves the field. Between
/// those, the reward is the change of a potential penalizing distance to the
/// pad, speed and tilt, minus the fuel cost of the fired engine.
pub struct LanderEnv {
    config: LanderConfig,
    seed: u64,
    rng: StdRng,
    state: State,
    prev_shaping: f32,
}

impl LanderEnv {
    /// Dimension of observations.
    pub const STATE_DIM: usize = 6;

    fn reset_state(&mut self) -> Vec<f32> {
        let c = &self.config;
        self.state = State {
            x: self.rng.gen_range(-0.3..0.3),
            y: c.initial_height,
            vx: self.rng.gen_range(-0.2..0.2),
            vy: self.rng.gen_range(-0.2..0.0),
            angle: self.rng.gen_range(-0.1..0.1),
            angvel: 0.0,
        };
        self.prev_shaping = self.state.shaping();
        trace!("reset: {:?}", self.state);
        self.state.obs()
    }

    /// Integrates the dynamics over one time step.
    fn integrate(&mut self, act: Action) {
        let c = &self.config;
        let s = &mut self.state;
        let (sin, cos) = s.angle.sin_cos();

        let (mut ax, mut ay, mut aa) = (0f32, -c.gravity, 0f32);
        match act {
            Action::Noop => {}
            Action::Main => {
                ax -= sin * c.main_engine_power;
                ay += cos * c.main_engine_power;
            }
            Action::Left | Action::Right => {
                // The left engine pushes the lander to the right and turns it
                // clockwise.
                let dir = if act == Action::Left { 1.0 } else { -1.0 };
                ax += dir * cos * c.side_engine_power;
                ay += dir * sin * c.side_engine_power;
                aa -= dir * c.side_engine_torque;
            }
        }

        s.vx += ax * c.dt;
        s.vy += ay * c.dt;
        s.angvel += aa * c.dt;
        s.x += s.vx * c.dt;
        s.y += s.vy * c.dt;
        s.angle += s.angvel * c.dt;
    }

    /// Returns the terminal reward if the episode ended.
    fn terminal_reward(&mut self) -> Option<f32> {
        let c = &self.config;
        let s = &mut self.state;

        if s.x.abs() > c.half_width || s.y > c.ceiling {
            debug!("left the field at ({:.2}, {:.2})", s.x, s.y);
            Some(CRASH_REWARD)
        } else if s.y <= 0.0 {
            s.y = 0.0;
            let soft = s.vx.abs() <= c.landing_speed
                && s.vy.abs() <= c.landing_speed
                && s.angle.abs() <= c.landing_angle;
            debug!(
                "touchdown at x = {:.2}, v = ({:.2}, {:.2}), angle = {:.2}: {}",
                s.x,
                s.vx,
                s.vy,
                s.angle,
                if soft { "landed" } else { "crashed" }
            );
            Some(if soft { LANDING_REWARD } else { CRASH_REWARD })
        } else {
            None
        }
    }
}

impl Env for LanderEnv {
    type Config = LanderConfig;

    fn build(config: &Self::Config, seed: u64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            seed,
            rng: StdRng::seed_from_u64(seed),
            state: State::default(),
            prev_shaping: 0.0,
        })
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        Ok(self.reset_state())
    }

    /// Reseeds the environment with `seed + ix` before resetting.
    fn reset_with_index(&mut self, ix: usize) -> Result<Vec<f32>> {
        self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(ix as u64));
        Ok(self.reset_state())
    }

    fn step(&mut self, act: usize) -> Result<Step> {
        let act = Action::try_from(act)?;
        self.integrate(act);

        let terminal = self.terminal_reward();
        let shaping = self.state.shaping();
        let mut reward = shaping - self.prev_shaping;
        self.prev_shaping = shaping;

        reward -= match act {
            Action::Main => MAIN_ENGINE_COST,
            Action::Left | Action::Right => SIDE_ENGINE_COST,
            Action::Noop => 0.0,
        };

        let is_done = terminal.is_some();
        if let Some(r) = terminal {
            reward = r;
        }

        Ok(Step::new(self.state.obs(), reward, is_done))
    }

    fn n_actions(&self) -> usize {
        Action::N
    }

    fn state_dim(&self) -> usize {
        Self::STATE_DIM
    }
}
