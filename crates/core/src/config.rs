//! Simulation tunables supplied by the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named numeric settings read by every frame of the simulation.
///
/// The core assumes a validated configuration and performs no range checks
/// inside [`crate::Flock::step`]; hosts should call [`FlockConfig::validate`]
/// once when the settings are constructed or edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlockConfig {
    /// Maximum distance at which one agent notices another.
    pub perception_radius: f64,
    /// Agents closer than this push away from each other.
    pub min_separation: f64,
    /// The flock's single speed knob: speed cap, boundary bounce speed,
    /// separation scale, and (divided by 10) the path-straighten scale.
    pub flock_speed: f64,
    /// World half-extent: x and z are bounded to `[-range, range]`,
    /// y to `[0, range]` (the ground plane at y = 0 is where agents perch).
    pub flock_range: f64,
    /// Gust speed scale; an active gust's speed is resampled every tick
    /// as a nonzero integer in `[-20, 20]` times `wind_magnitude / 10`.
    pub wind_magnitude: f64,
    /// Pull agents toward the fixed attractor and straighten their paths,
    /// producing rounded circling orbits.
    pub circle_attractor: bool,
    /// Allow intermittent wind gusts to start and push the flock.
    pub wind_enabled: bool,
    /// Allow agents reaching the ground plane to perch for a while.
    pub perch_enabled: bool,
}

impl Default for FlockConfig {
    fn default() -> Self {
        FlockConfig {
            perception_radius: 1.35,
            min_separation: 0.6,
            flock_speed: 0.16,
            flock_range: 4.5,
            wind_magnitude: 0.1,
            circle_attractor: false,
            wind_enabled: false,
            perch_enabled: false,
        }
    }
}

impl FlockConfig {
    /// Check that every numeric setting is in a sane range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, in field order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.perception_radius <= 0.0 || self.perception_radius.is_nan() {
            return Err(ConfigError::NonPositivePerception(self.perception_radius));
        }
        if self.min_separation < 0.0 || self.min_separation.is_nan() {
            return Err(ConfigError::NegativeSeparation(self.min_separation));
        }
        if self.flock_speed <= 0.0 || self.flock_speed.is_nan() {
            return Err(ConfigError::NonPositiveSpeed(self.flock_speed));
        }
        if self.flock_range <= 0.0 || self.flock_range.is_nan() {
            return Err(ConfigError::NonPositiveRange(self.flock_range));
        }
        if self.wind_magnitude < 0.0 || self.wind_magnitude.is_nan() {
            return Err(ConfigError::NegativeWindMagnitude(self.wind_magnitude));
        }
        Ok(())
    }
}

/// A configuration value outside its sane range.
///
/// NaN fields fail the corresponding comparison and are reported under the
/// same variant as an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Perception radius must be greater than zero.
    NonPositivePerception(f64),
    /// Minimum separation distance must not be negative.
    NegativeSeparation(f64),
    /// Flock speed must be greater than zero.
    NonPositiveSpeed(f64),
    /// World half-extent must be greater than zero.
    NonPositiveRange(f64),
    /// Wind magnitude must not be negative.
    NegativeWindMagnitude(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositivePerception(v) => {
                write!(f, "perception radius must be positive, got {v}")
            }
            ConfigError::NegativeSeparation(v) => {
                write!(f, "minimum separation must not be negative, got {v}")
            }
            ConfigError::NonPositiveSpeed(v) => {
                write!(f, "flock speed must be positive, got {v}")
            }
            ConfigError::NonPositiveRange(v) => {
                write!(f, "flock range must be positive, got {v}")
            }
            ConfigError::NegativeWindMagnitude(v) => {
                write!(f, "wind magnitude must not be negative, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
