//! Intermittent wind gust generator.
//!
//! One gust state is shared by the whole flock. The [`crate::Flock`] owns it
//! and advances it exactly once per frame, before any agent is touched; the
//! agents then consume [`Wind::gust_vector`], and the frame ends with
//! [`Wind::tick_down`].

use crate::config::FlockConfig;
use crate::vec3::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How many frames a gust blows for once started.
pub const WIND_TIME: u32 = 50;

/// Chance of a gust starting on an idle tick is 1 in `GUST_ODDS`.
const GUST_ODDS: u32 = 50;

/// Shared intermittent gust state.
///
/// Timing quirk carried over from the reference behavior: the `timer == 0`
/// deactivation check runs inside [`Wind::update`], *after* the start draw
/// and speed resample, while the timer itself is decremented at the end of
/// the frame in [`Wind::tick_down`]. Agents therefore feel a gust for
/// exactly [`WIND_TIME`] frames, but `active` stays true for one extra
/// update before it is cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wind {
    active: bool,
    timer: u32,
    speed: f64,
}

impl Wind {
    /// Calm wind with no gust pending.
    pub fn new() -> Self {
        Wind::default()
    }

    /// Advance the gust state by one frame.
    ///
    /// Does nothing while wind is disabled in the configuration. Otherwise:
    /// an idle tick has a 1-in-50 chance of starting a gust; an active gust
    /// resamples its speed (never exactly zero) every tick; and a gust whose
    /// timer has run out is turned off.
    pub fn update<R: Rng>(&mut self, config: &FlockConfig, rng: &mut R) {
        if !config.wind_enabled {
            return;
        }
        if !self.active && rng.random_range(0..GUST_ODDS) == 0 {
            self.active = true;
            self.timer = WIND_TIME;
            debug!(duration = WIND_TIME, "gust starting");
        }
        if self.active {
            self.speed = random_gust_speed(config.wind_magnitude, rng);
        }
        if self.timer == 0 && self.active {
            self.active = false;
            debug!("gust finished");
        }
    }

    /// Decrement the remaining gust duration. Called once per frame, after
    /// every agent has consumed the gust.
    pub fn tick_down(&mut self) {
        if self.active && self.timer > 0 {
            self.timer -= 1;
        }
    }

    /// True while a gust is blowing with time remaining.
    pub fn gusting(&self) -> bool {
        self.active && self.timer > 0
    }

    /// The push every agent receives this frame: the gust speed applied
    /// uniformly along the two horizontal axes, or zero when there is no
    /// gust or wind is disabled in the configuration.
    pub fn gust_vector(&self, config: &FlockConfig) -> Vec3 {
        if self.gusting() && config.wind_enabled {
            Vec3::new(self.speed, 0.0, self.speed)
        } else {
            Vec3::zeros()
        }
    }

    /// Current gust speed (resampled every active tick).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether a gust is marked active (see the type-level note on the
    /// one-tick deactivation lag).
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Build an arbitrary gust state for tests in other modules.
    #[cfg(test)]
    pub(crate) fn with_state(active: bool, timer: u32, speed: f64) -> Self {
        Wind {
            active,
            timer,
            speed,
        }
    }
}

/// Draw a signed gust speed: a nonzero integer step in `[-20, 20]` scaled by
/// `magnitude / 10`. Resamples until the step is nonzero so an active gust
/// never reads as calm.
fn random_gust_speed<R: Rng>(magnitude: f64, rng: &mut R) -> f64 {
    loop {
        let step: i32 = rng.random_range(-20..=20);
        if step != 0 {
            return f64::from(step) * (magnitude / 10.0);
        }
    }
}
