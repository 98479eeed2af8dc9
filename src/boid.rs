use glam::Vec3;
use rand::rngs::SmallRng;

use crate::config::BoidConfig;
use crate::math::{uniform_symmetric, wrapped_hue_offset, EPSILON};

/// Half-range of each velocity component drawn at spawn and reset. Reset
/// speed is drawn independently of the envelope; the next tick's clamp pulls
/// it back in.
const SPAWN_VELOCITY_HALF_RANGE: f32 = 0.05;

/// One flocking agent: kinematic state plus a hue that diffuses toward its
/// neighbors unless the boid was created color-locked.
#[derive(Debug, Clone)]
pub struct Boid {
    position: Vec3,
    velocity: Vec3,
    hue: f32,
    color_locked: bool,
}

impl Boid {
    pub(crate) fn spawn(config: &BoidConfig, index: usize, rng: &mut SmallRng) -> Self {
        let locked_count =
            (config.num_boids as f32 * config.constant_color_percentage).floor() as usize;
        let mut boid = Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            hue: config.base_hue,
            color_locked: index < locked_count,
        };
        boid.reset(config, rng);
        boid
    }

    /// Reinitializes position, velocity, and hue in place. The color lock is
    /// assigned at spawn and survives resets.
    pub(crate) fn reset(&mut self, config: &BoidConfig, rng: &mut SmallRng) {
        self.set_random_position(config, rng);
        self.velocity = Vec3::new(
            uniform_symmetric(rng, SPAWN_VELOCITY_HALF_RANGE),
            uniform_symmetric(rng, SPAWN_VELOCITY_HALF_RANGE),
            uniform_symmetric(rng, SPAWN_VELOCITY_HALF_RANGE),
        );
        self.hue = config.base_hue + uniform_symmetric(rng, config.hue_range);
    }

    pub(crate) fn set_random_position(&mut self, config: &BoidConfig, rng: &mut SmallRng) {
        let bounds = config.bounds;
        self.position = Vec3::new(
            uniform_symmetric(rng, bounds.width),
            uniform_symmetric(rng, bounds.height),
            uniform_symmetric(rng, bounds.depth),
        );
    }

    pub(crate) fn apply_force(&mut self, accel: Vec3, config: &BoidConfig) {
        self.velocity += accel;
        self.enforce_speed_limits(config);
    }

    fn enforce_speed_limits(&mut self, config: &BoidConfig) {
        let speed = self.velocity.length();
        if speed > config.max_speed {
            self.velocity *= config.max_speed / speed;
        } else if speed < config.min_speed && speed > EPSILON {
            // A zero velocity has no direction to rescale along.
            self.velocity *= config.min_speed / speed;
        }
    }

    pub(crate) fn update_position(&mut self, config: &BoidConfig) {
        self.position += self.velocity;
        self.enforce_position_bounds(config);
    }

    fn enforce_position_bounds(&mut self, config: &BoidConfig) {
        let bounds = config.bounds;
        self.position.x = self.position.x.clamp(-bounds.width, bounds.width);
        self.position.y = self.position.y.clamp(-bounds.height, bounds.height);
        self.position.z = self.position.z.clamp(-bounds.depth, bounds.depth);
    }

    /// Blends the hue toward the locally observed average, then re-centers it
    /// into `base_hue ± hue_range` through the shortest wrapped offset.
    pub(crate) fn update_color(
        &mut self,
        average_hue: f32,
        nearby_count: usize,
        config: &BoidConfig,
    ) {
        if self.color_locked || nearby_count == 0 {
            return;
        }
        self.hue +=
            (average_hue - self.hue) * config.color_update_speed * config.color_influence_factor;
        let offset = wrapped_hue_offset(self.hue, config.base_hue);
        self.hue = config.base_hue + offset.clamp(-config.hue_range, config.hue_range);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn is_color_locked(&self) -> bool {
        self.color_locked
    }

    /// Unit heading aligned with the velocity; +X when the boid is at rest.
    pub fn heading(&self) -> Vec3 {
        self.velocity.try_normalize().unwrap_or(Vec3::X)
    }
}

#[cfg(test)]
impl Boid {
    pub(crate) fn place(&mut self, position: Vec3, velocity: Vec3) {
        self.position = position;
        self.velocity = velocity;
    }

    pub(crate) fn set_hue(&mut self, hue: f32) {
        self.hue = hue;
    }
}
