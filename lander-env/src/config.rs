//! Configuration of [`LanderEnv`](crate::LanderEnv).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`LanderEnv`](crate::LanderEnv).
///
/// Lengths are in units of the field: the pad is at the origin and the
/// lander leaves the field when `|x| > half_width` or `y > ceiling`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct LanderConfig {
    /// Integration time step.
    pub dt: f32,

    /// Downward acceleration.
    pub gravity: f32,

    /// Acceleration of the main engine along the body axis.
    pub main_engine_power: f32,

    /// Lateral acceleration of an orientation engine.
    pub side_engine_power: f32,

    /// Angular acceleration of an orientation engine.
    pub side_engine_torque: f32,

    /// Half width of the field.
    pub half_width: f32,

    /// Height of the field.
    pub ceiling: f32,

    /// Initial height.
    pub initial_height: f32,

    /// Touchdowns slower than this along both axes are landings.
    pub landing_speed: f32,

    /// Touchdowns tilted more than this (radians) are crashes.
    pub landing_angle: f32,
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            gravity: 1.0,
            main_engine_power: 2.0,
            side_engine_power: 0.3,
            side_engine_torque: 1.0,
            half_width: 1.0,
            ceiling: 2.0,
            initial_height: 1.4,
            landing_speed: 0.5,
            landing_angle: 0.3,
        }
    }
}

impl LanderConfig {
    /// Sets the time step.
    pub fn dt(mut self, v: f32) -> Self {
        self.dt = v;
        self
    }

    /// Sets the gravity.
    pub fn gravity(mut self, v: f32) -> Self {
        self.gravity = v;
        self
    }

    /// Sets the power of the main engine.
    pub fn main_engine_power(mut self, v: f32) -> Self {
        self.main_engine_power = v;
        self
    }

    /// Sets the lateral power of the orientation engines.
    pub fn side_engine_power(mut self, v: f32) -> Self {
        self.side_engine_power = v;
        self
    }

    /// Sets the torque of the orientation engines.
    pub fn side_engine_torque(mut self, v: f32) -> Self {
        self.side_engine_torque = v;
        self
    }

    /// Constructs [`LanderConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`LanderConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
