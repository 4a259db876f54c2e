//! The flock: owns the agents and the shared wind, and runs the per-frame
//! update.

use crate::boid::{Boid, BoidState};
use crate::config::FlockConfig;
use crate::vec3::Vec3;
use crate::wind::Wind;
use rand::Rng;
use tracing::info;

/// Spawn-time range for position components, per axis.
const SPAWN_POSITION_RANGE: f64 = 4.0;
/// Spawn-time range for velocity components, per axis.
const SPAWN_VELOCITY_RANGE: f64 = 0.16;

/// A fixed-size population of agents plus the wind state they share.
///
/// The population is created once and never grows or shrinks during a run;
/// iteration order is creation order and carries no meaning beyond that.
pub struct Flock {
    boids: Vec<Boid>,
    wind: Wind,
    frame: u64,
}

impl Flock {
    /// Build `count` agents from externally supplied samplers, one call per
    /// agent in creation order.
    pub fn new(
        count: usize,
        mut position_sampler: impl FnMut() -> Vec3,
        mut velocity_sampler: impl FnMut() -> Vec3,
    ) -> Self {
        let boids = (0..count)
            .map(|_| Boid::new(position_sampler(), velocity_sampler()))
            .collect();
        info!(count, "flock created");
        Flock {
            boids,
            wind: Wind::new(),
            frame: 0,
        }
    }

    /// Build `count` agents at uniformly random positions and velocities:
    /// position components in ±4.0, velocity components in ±0.16.
    pub fn with_random_boids<R: Rng>(count: usize, rng: &mut R) -> Self {
        let boids = (0..count)
            .map(|_| {
                let position = random_component_vector(rng, SPAWN_POSITION_RANGE);
                let velocity = random_component_vector(rng, SPAWN_VELOCITY_RANGE);
                Boid::new(position, velocity)
            })
            .collect();
        info!(count, "flock created");
        Flock {
            boids,
            wind: Wind::new(),
            frame: 0,
        }
    }

    /// Advance the whole simulation by one frame.
    ///
    /// Order per frame:
    /// 1. advance the wind state;
    /// 2. snapshot every agent's position and velocity, so every rule this
    ///    frame reads pre-frame state only;
    /// 3. per agent: compute the five steering rules, run the perch
    ///    transition and countdown (a perched agent skips the rest), then
    ///    sum the contributions plus the gust into the velocity, integrate,
    ///    bound the position, and cap the speed;
    /// 4. run down the gust timer.
    pub fn step<R: Rng>(&mut self, config: &FlockConfig, rng: &mut R) {
        self.wind.update(config, rng);

        let snapshot: Vec<BoidState> = self.boids.iter().map(Boid::state).collect();
        // The gust is identical for every agent, so it is computed once.
        let gust = self.wind.gust_vector(config);

        for (i, boid) in self.boids.iter_mut().enumerate() {
            let cohesion = boid.cohesion(i, &snapshot, config);
            let separation = boid.separation(i, &snapshot, config);
            let alignment = boid.alignment(i, &snapshot, config);
            let seek = boid.seek_attractor(config);
            let straighten = boid.straighten_path(config);

            boid.try_perch(config, &self.wind);
            if boid.perch_tick() {
                continue;
            }

            let steering = cohesion + separation + alignment + seek + straighten + gust;
            boid.integrate(steering);
            boid.bound_position(config);
            boid.limit_velocity(config);
        }

        self.wind.tick_down();
        self.frame += 1;
    }

    /// Read-only view of every agent, in creation order.
    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    /// Shared gust state, advanced exactly once per [`Flock::step`] before
    /// any agent is touched.
    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    /// Number of agents, fixed at construction.
    pub fn len(&self) -> usize {
        self.boids.len()
    }

    /// True for an empty population.
    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Monotonic count of completed [`Flock::step`] calls.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// A vector whose components are each uniform in `[-range, range]`.
fn random_component_vector<R: Rng>(rng: &mut R, range: f64) -> Vec3 {
    Vec3::new(
        rng.random_range(-range..=range),
        rng.random_range(-range..=range),
        rng.random_range(-range..=range),
    )
}
