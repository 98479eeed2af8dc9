use glam::Vec3;

use crate::math::EPSILON;
use crate::Flock;

impl Flock {
    /// One simulation tick over the whole population, in creation order.
    ///
    /// The pass mutates boids in place, so later boids observe earlier boids
    /// in their already-updated state. Parallelizing or double-buffering this
    /// loop would change the trajectories.
    pub(super) fn step(&mut self) {
        self.tick_index = self.tick_index.wrapping_add(1);
        let config = self.config;

        for i in 0..self.boids.len() {
            let (flocking, average_hue, nearby) = self.flocking_forces(i);
            let wall = self.wall_avoidance(i);

            let boid = &mut self.boids[i];
            if nearby > 0 {
                boid.update_color(average_hue, nearby, &config);
            }
            boid.apply_force(flocking + wall, &config);
            boid.update_position(&config);
        }
    }

    /// Full O(n²) scan of the other boids: cohesion, alignment, and
    /// inverse-square separation, plus the average neighbor hue.
    fn flocking_forces(&self, index: usize) -> (Vec3, f32, usize) {
        let config = &self.config;
        let boid = &self.boids[index];
        let separation_range = config.visual_range * 0.5;

        let mut nearby = 0usize;
        let mut position_sum = Vec3::ZERO;
        let mut velocity_sum = Vec3::ZERO;
        let mut separation = Vec3::ZERO;
        let mut hue_sum = 0.0f32;

        for (j, other) in self.boids.iter().enumerate() {
            if j == index {
                continue;
            }
            let distance = boid.position().distance(other.position());
            if distance >= config.visual_range {
                continue;
            }

            position_sum += other.position();
            velocity_sum += other.velocity();
            hue_sum += other.hue();
            nearby += 1;

            // Coincident boids have no repulsion direction; skip them rather
            // than divide by a zero distance.
            if distance < separation_range && distance > EPSILON {
                separation +=
                    (boid.position() - other.position()) / (distance * distance);
            }
        }

        if nearby == 0 {
            return (Vec3::ZERO, 0.0, 0);
        }

        let count = nearby as f32;
        let cohesion = (position_sum / count - boid.position()) * config.centering_factor;
        let alignment = (velocity_sum / count - boid.velocity()) * config.matching_factor;
        let separation = separation * config.avoid_factor;

        (cohesion + alignment + separation, hue_sum / count, nearby)
    }

    /// Inward push that ramps up linearly once a boid crosses into the wall
    /// margin on any axis.
    fn wall_avoidance(&self, index: usize) -> Vec3 {
        let config = &self.config;
        let position = self.boids[index].position();
        let bounds = config.bounds;
        let margin = config.margin;

        Vec3::new(
            axis_wall_push(position.x, bounds.width, margin),
            axis_wall_push(position.y, bounds.height, margin),
            axis_wall_push(position.z, bounds.depth, margin),
        ) * config.wall_avoid_factor
    }
}

fn axis_wall_push(position: f32, bound: f32, margin: f32) -> f32 {
    if position > bound - margin {
        bound - position - margin
    } else if position < -bound + margin {
        -bound - position + margin
    } else {
        0.0
    }
}
