//! A two-dimensional lander with a discrete action space.
//!
//! The lander starts above a landing pad at the origin and has to touch down
//! slowly and upright. The environment implements [`lander_core::Env`]:
//!
//! * observation: `[x, y, vx, vy, angle, angular_velocity]`,
//! * actions: [`Action`] as indices in `[0, 4)`.
mod config;
mod env;
pub use config::LanderConfig;
pub use env::{Action, LanderEnv};
