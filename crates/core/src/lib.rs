//! Flocking Simulation Core Library
//!
//! A headless boid flocking simulation. A population of agents moves under
//! three local emergent rules (cohesion, separation, alignment) plus a set
//! of environmental modifiers: a fixed attractor the flock can circle,
//! path straightening, ground perching, and intermittent wind gusts.
//!
//! The host drives the simulation by calling [`Flock::step`] once per frame
//! and reads back per-agent position, velocity, and perch state for display.
//! All randomness (gust timing, gust speed, spawn positions) flows through
//! an injected [`rand::Rng`], so a seeded generator gives reproducible runs.

pub mod boid;
pub mod config;
pub mod flock;
pub mod vec3;
pub mod wind;

pub use boid::{Boid, BoidState, PERCH_TIME};
pub use config::{ConfigError, FlockConfig};
pub use flock::Flock;
pub use vec3::{Vec3, Vec3Ext};
pub use wind::{Wind, WIND_TIME};
