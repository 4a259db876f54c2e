//! A single flocking agent and its per-frame steering rules.
//!
//! Each rule reads a frozen snapshot of the roster as it existed at the
//! start of the frame ([`BoidState`]) and returns a contribution vector;
//! a zero vector means "no effect this frame". The [`crate::Flock`] sums
//! the contributions into the agent's velocity and integrates.

use crate::config::FlockConfig;
use crate::vec3::{Vec3, Vec3Ext};
use crate::wind::Wind;
use tracing::debug;

/// How many frames a perched agent stays grounded.
pub const PERCH_TIME: u32 = 100;

/// The fixed point the flock circles when `circle_attractor` is set.
fn attractor() -> Vec3 {
    Vec3::new(0.0, 3.0, 0.0)
}

/// Immutable per-frame summary of one agent, read by every steering rule.
///
/// Snapshotting the roster before any agent is mutated keeps the frame
/// consistent: no rule ever observes another agent's already-updated state.
#[derive(Debug, Clone, Copy)]
pub struct BoidState {
    /// World-space location at the start of the frame.
    pub position: Vec3,
    /// Velocity at the start of the frame.
    pub velocity: Vec3,
}

/// One flocking agent.
#[derive(Debug, Clone)]
pub struct Boid {
    position: Vec3,
    velocity: Vec3,
    perching: bool,
    perch_timer: u32,
}

impl Boid {
    /// Create an agent at `position` moving with `velocity`, flying.
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Boid {
            position,
            velocity,
            perching: false,
            perch_timer: 0,
        }
    }

    /// World-space location.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// True while the agent is grounded and inert.
    pub fn is_perching(&self) -> bool {
        self.perching
    }

    /// Remaining grounded frames; zero while flying.
    pub fn perch_timer(&self) -> u32 {
        self.perch_timer
    }

    /// Snapshot entry for this agent.
    pub fn state(&self) -> BoidState {
        BoidState {
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// Whether `other` is close enough to be noticed.
    fn notices(&self, other: &BoidState, config: &FlockConfig) -> bool {
        (other.position - self.position).norm() <= config.perception_radius
    }

    /// Cohesion: steer toward the average position of noticed neighbors,
    /// at 1/100 of the offset per frame.
    ///
    /// An exactly-zero *sum* of neighbor positions is the "no neighbors"
    /// sentinel, so a flock whose noticed positions sum to the origin is
    /// indistinguishable from an empty neighborhood. Kept for compatibility
    /// with the reference behavior.
    pub fn cohesion(&self, own_index: usize, roster: &[BoidState], config: &FlockConfig) -> Vec3 {
        let mut center = Vec3::zeros();
        let mut nearby = 0usize;
        for (i, other) in roster.iter().enumerate() {
            if i != own_index && self.notices(other, config) {
                center += other.position;
                nearby += 1;
            }
        }
        if center.is_exactly_zero() {
            return center;
        }
        center /= nearby as f64;
        (center - self.position) / 100.0
    }

    /// Separation: push away from every noticed neighbor strictly closer
    /// than the minimum separation distance, scaled by the flock speed.
    /// Neighbors at or beyond the threshold contribute nothing.
    pub fn separation(&self, own_index: usize, roster: &[BoidState], config: &FlockConfig) -> Vec3 {
        let mut push = Vec3::zeros();
        for (i, other) in roster.iter().enumerate() {
            if i == own_index || !self.notices(other, config) {
                continue;
            }
            let offset = other.position - self.position;
            if offset.norm() < config.min_separation {
                push -= offset;
            }
        }
        push * config.flock_speed
    }

    /// Alignment: slowly match the average velocity of noticed neighbors,
    /// closing 1/8 of the difference per frame.
    ///
    /// Uses the same exactly-zero-sum sentinel as [`Boid::cohesion`].
    pub fn alignment(&self, own_index: usize, roster: &[BoidState], config: &FlockConfig) -> Vec3 {
        let mut summed = Vec3::zeros();
        let mut nearby = 0usize;
        for (i, other) in roster.iter().enumerate() {
            if i != own_index && self.notices(other, config) {
                summed += other.velocity;
                nearby += 1;
            }
        }
        if summed.is_exactly_zero() {
            return summed;
        }
        summed /= nearby as f64;
        (summed - self.velocity) / 8.0
    }

    /// Gentle pull toward the fixed attractor, when circling is enabled.
    pub fn seek_attractor(&self, config: &FlockConfig) -> Vec3 {
        if config.circle_attractor {
            (attractor() - self.position) / 180.0
        } else {
            Vec3::zeros()
        }
    }

    /// Bias motion to continue straight, when circling is enabled; combined
    /// with the attractor pull this rounds out the orbits.
    pub fn straighten_path(&self, config: &FlockConfig) -> Vec3 {
        if config.circle_attractor {
            self.velocity.normalized_or_zero() * (config.flock_speed / 10.0)
        } else {
            Vec3::zeros()
        }
    }

    /// Try to start perching: the agent must not already be perching, the
    /// air must be calm, and the agent must be at or below the ground plane.
    /// On transition the vertical position snaps to exactly zero and the
    /// perch timer is armed.
    pub(crate) fn try_perch(&mut self, config: &FlockConfig, wind: &Wind) {
        if !config.perch_enabled || self.perching || wind.is_active() {
            return;
        }
        if self.position.y <= 0.0 {
            self.position.y = 0.0;
            self.perching = true;
            self.perch_timer = PERCH_TIME;
            debug!(x = self.position.x, z = self.position.z, "perching");
        }
    }

    /// Run one frame of the perch countdown. Returns true when the agent is
    /// grounded this frame and the rest of its update must be skipped; the
    /// frame the timer reads zero clears the flag and returns false, so
    /// normal integration resumes that same frame.
    pub(crate) fn perch_tick(&mut self) -> bool {
        if !self.perching {
            return false;
        }
        if self.perch_timer > 0 {
            self.perch_timer -= 1;
            return true;
        }
        self.perching = false;
        false
    }

    /// Add the frame's summed steering to the velocity and integrate the
    /// position.
    pub(crate) fn integrate(&mut self, steering: Vec3) {
        self.velocity += steering;
        self.position += self.velocity;
    }

    /// Keep the agent inside the world: an agent past a bound on some axis
    /// gets its velocity on that axis forced back toward the interior at
    /// the flock speed. The position itself is not clamped, so an agent can
    /// sit outside the bounds for a frame before the forced velocity pushes
    /// it back.
    pub(crate) fn bound_position(&mut self, config: &FlockConfig) {
        let range = config.flock_range;
        let bounce = config.flock_speed;

        if self.position.x < -range {
            self.velocity.x = bounce;
        } else if self.position.x > range {
            self.velocity.x = -bounce;
        }
        // The y band is asymmetric: the ground plane at y = 0 is the floor.
        if self.position.y < 0.0 {
            self.velocity.y = bounce;
        } else if self.position.y > range {
            self.velocity.y = -bounce;
        }
        if self.position.z < -range {
            self.velocity.z = bounce;
        } else if self.position.z > range {
            self.velocity.z = -bounce;
        }
    }

    /// Rescale the velocity to exactly the flock speed when it exceeds it.
    pub(crate) fn limit_velocity(&mut self, config: &FlockConfig) {
        let limit = config.flock_speed;
        if self.velocity.norm() > limit {
            self.velocity = self.velocity.normalized_or_zero() * limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> FlockConfig {
        FlockConfig::default()
    }

    fn roster(boids: &[Boid]) -> Vec<BoidState> {
        boids.iter().map(Boid::state).collect()
    }

    #[test]
    fn lone_boid_gets_zero_from_all_local_rules() {
        let boid = Boid::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.1, 0.0, 0.0));
        let snapshot = roster(&[boid.clone()]);
        let cfg = config();
        assert!(boid.cohesion(0, &snapshot, &cfg).is_exactly_zero());
        assert!(boid.separation(0, &snapshot, &cfg).is_exactly_zero());
        assert!(boid.alignment(0, &snapshot, &cfg).is_exactly_zero());
    }

    #[test]
    fn cohesion_pulls_toward_a_neighbor() {
        let a = Boid::new(Vec3::zeros(), Vec3::zeros());
        let b = Boid::new(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros());
        let snapshot = roster(&[a.clone(), b]);
        let pull = a.cohesion(0, &snapshot, &config());
        // Center of mass is (1,0,0); contribution is the offset / 100.
        assert_relative_eq!(pull.x, 0.01, epsilon = 1e-12);
        assert_eq!(pull.y, 0.0);
        assert_eq!(pull.z, 0.0);
    }

    #[test]
    fn cohesion_ignores_neighbors_out_of_perception() {
        let a = Boid::new(Vec3::zeros(), Vec3::zeros());
        let far = Boid::new(Vec3::new(100.0, 0.0, 0.0), Vec3::zeros());
        let snapshot = roster(&[a.clone(), far]);
        assert!(a.cohesion(0, &snapshot, &config()).is_exactly_zero());
    }

    #[test]
    fn perception_boundary_is_inclusive() {
        let cfg = config();
        let a = Boid::new(Vec3::zeros(), Vec3::zeros());
        let at_edge = BoidState {
            position: Vec3::new(cfg.perception_radius, 0.0, 0.0),
            velocity: Vec3::zeros(),
        };
        assert!(a.notices(&at_edge, &cfg));
    }

    #[test]
    fn zero_sum_of_neighbor_positions_reads_as_no_neighbors() {
        // Two noticed neighbors placed symmetrically about the origin sum
        // to exactly zero, which trips the sentinel. This conflation is
        // intentional (kept from the reference behavior).
        let a = Boid::new(Vec3::zeros(), Vec3::zeros());
        let left = Boid::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::zeros());
        let right = Boid::new(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros());
        let snapshot = roster(&[a.clone(), left, right]);
        assert!(a.cohesion(0, &snapshot, &config()).is_exactly_zero());
    }

    #[test]
    fn separation_points_away_from_a_close_neighbor() {
        let a = Boid::new(Vec3::zeros(), Vec3::zeros());
        let b = Boid::new(Vec3::new(0.2, 0.1, 0.0), Vec3::zeros());
        let snapshot = roster(&[a.clone(), b.clone()]);
        let cfg = config();

        let push_a = a.separation(0, &snapshot, &cfg);
        let push_b = b.separation(1, &snapshot, &cfg);
        let a_to_b = b.position() - a.position();

        assert!(push_a.dot(&a_to_b) < 0.0);
        assert!(push_b.dot(&-a_to_b) < 0.0);
    }

    #[test]
    fn separation_ignores_neighbors_at_or_beyond_the_threshold() {
        let cfg = config();
        let a = Boid::new(Vec3::zeros(), Vec3::zeros());
        let at_threshold = Boid::new(Vec3::new(cfg.min_separation, 0.0, 0.0), Vec3::zeros());
        let snapshot = roster(&[a.clone(), at_threshold]);
        assert!(a.separation(0, &snapshot, &cfg).is_exactly_zero());
    }

    #[test]
    fn alignment_closes_an_eighth_of_the_velocity_gap() {
        let a = Boid::new(Vec3::zeros(), Vec3::zeros());
        let b = Boid::new(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.08, 0.0, 0.0));
        let snapshot = roster(&[a.clone(), b]);
        let steer = a.alignment(0, &snapshot, &config());
        assert_relative_eq!(steer.x, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn attractor_rules_are_inert_unless_enabled() {
        let boid = Boid::new(Vec3::new(0.0, 3.0, 1.8), Vec3::new(0.1, 0.0, 0.0));
        let off = config();
        assert!(boid.seek_attractor(&off).is_exactly_zero());
        assert!(boid.straighten_path(&off).is_exactly_zero());

        let on = FlockConfig {
            circle_attractor: true,
            ..config()
        };
        let seek = boid.seek_attractor(&on);
        assert_relative_eq!(seek.z, -0.01, epsilon = 1e-12);
        assert_eq!(seek.x, 0.0);
        assert_eq!(seek.y, 0.0);

        let straighten = boid.straighten_path(&on);
        assert_relative_eq!(straighten.x, on.flock_speed / 10.0, epsilon = 1e-12);
    }

    #[test]
    fn straighten_path_tolerates_a_zero_velocity() {
        let boid = Boid::new(Vec3::zeros(), Vec3::zeros());
        let on = FlockConfig {
            circle_attractor: true,
            ..config()
        };
        assert!(boid.straighten_path(&on).is_exactly_zero());
    }

    #[test]
    fn boundary_overrides_velocity_per_axis() {
        let cfg = config();
        let mut boid = Boid::new(
            Vec3::new(cfg.flock_range + 1.0, -0.5, -(cfg.flock_range + 2.0)),
            Vec3::new(0.05, -0.05, -0.05),
        );
        boid.bound_position(&cfg);
        assert_eq!(boid.velocity().x, -cfg.flock_speed);
        assert_eq!(boid.velocity().y, cfg.flock_speed);
        assert_eq!(boid.velocity().z, cfg.flock_speed);
        // Position is untouched; only the velocity is overridden.
        assert_eq!(boid.position().x, cfg.flock_range + 1.0);
    }

    #[test]
    fn velocity_is_rescaled_to_exactly_the_limit() {
        let cfg = config();
        let mut boid = Boid::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        boid.limit_velocity(&cfg);
        assert_relative_eq!(boid.velocity().norm(), cfg.flock_speed, epsilon = 1e-12);
    }

    #[test]
    fn velocity_under_the_limit_is_untouched() {
        let cfg = config();
        let v = Vec3::new(0.01, 0.0, 0.0);
        let mut boid = Boid::new(Vec3::zeros(), v);
        boid.limit_velocity(&cfg);
        assert_eq!(boid.velocity(), v);
    }

    #[test]
    fn perch_snaps_to_the_ground_and_arms_the_timer() {
        let cfg = FlockConfig {
            perch_enabled: true,
            ..config()
        };
        let wind = Wind::new();
        let mut boid = Boid::new(Vec3::new(1.0, -0.3, 1.0), Vec3::new(0.0, -0.1, 0.0));
        boid.try_perch(&cfg, &wind);
        assert!(boid.is_perching());
        assert_eq!(boid.position().y, 0.0);
        assert_eq!(boid.perch_timer(), PERCH_TIME);
    }

    #[test]
    fn perch_requires_the_flag_and_calm_air() {
        let wind = Wind::new();
        let mut grounded = Boid::new(Vec3::new(0.0, -0.1, 0.0), Vec3::zeros());
        grounded.try_perch(&config(), &wind);
        assert!(!grounded.is_perching());

        let cfg = FlockConfig {
            perch_enabled: true,
            ..config()
        };
        let mut airborne = Boid::new(Vec3::new(0.0, 2.0, 0.0), Vec3::zeros());
        airborne.try_perch(&cfg, &wind);
        assert!(!airborne.is_perching());
    }

    #[test]
    fn no_perching_while_a_gust_is_active() {
        let cfg = FlockConfig {
            perch_enabled: true,
            ..config()
        };
        let gusty = Wind::with_state(true, 10, 0.1);
        let mut boid = Boid::new(Vec3::new(0.0, -0.1, 0.0), Vec3::zeros());
        boid.try_perch(&cfg, &gusty);
        assert!(!boid.is_perching());
        // The wind dying down lets the same agent perch.
        boid.try_perch(&cfg, &Wind::new());
        assert!(boid.is_perching());
    }

    #[test]
    fn perch_tick_skips_while_counting_and_resumes_on_zero() {
        let cfg = FlockConfig {
            perch_enabled: true,
            ..config()
        };
        let mut boid = Boid::new(Vec3::new(0.0, -0.1, 0.0), Vec3::zeros());
        boid.try_perch(&cfg, &Wind::new());

        let mut skipped = 0;
        while boid.perch_tick() {
            skipped += 1;
        }
        assert_eq!(skipped, PERCH_TIME);
        assert!(!boid.is_perching());
        // Once flying again the tick is a no-op.
        assert!(!boid.perch_tick());
    }
}
