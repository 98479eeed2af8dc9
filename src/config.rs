use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Host-tunable range for [`crate::Flock::set_max_speed`].
pub const MIN_MAX_SPEED: f32 = 0.01;
pub const MAX_MAX_SPEED: f32 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Half-extents of the simulation volume, per axis. Positions are clamped to
/// `[-extent, +extent]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

/// Shared flock configuration, consumed once at construction. Only the speed
/// envelope mutates afterwards, via [`crate::Flock::set_max_speed`].
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoidConfig {
    /// Center of the flock's hue band, in the wrapping [0, 1) hue space.
    pub base_hue: f32,
    /// Maximum signed hue offset from `base_hue` any boid may carry.
    pub hue_range: f32,
    /// Weight of neighbor hues when blending a boid's color.
    pub color_influence_factor: f32,
    /// Rate at which a boid's hue moves toward the local average.
    pub color_update_speed: f32,
    /// Distance within which boids see each other.
    pub visual_range: f32,
    /// Cohesion gain: pull toward the neighbors' center of mass.
    pub centering_factor: f32,
    /// Alignment gain: pull toward the neighbors' average velocity.
    pub matching_factor: f32,
    /// Separation gain: inverse-square repulsion from close neighbors.
    pub avoid_factor: f32,
    /// Gain on the inward push applied inside the wall margin.
    pub wall_avoid_factor: f32,
    pub max_speed: f32,
    pub min_speed: f32,
    #[wasm_bindgen(skip)]
    #[serde(default = "default_bounds")]
    pub bounds: Bounds,
    /// Distance from a wall at which avoidance starts.
    pub margin: f32,
    pub num_boids: usize,
    /// Fraction of the population (first by creation index) whose hue never
    /// changes after initialization.
    pub constant_color_percentage: f32,
}

fn default_bounds() -> Bounds {
    Bounds::new(35.0, 20.0, 35.0)
}

impl Default for BoidConfig {
    fn default() -> Self {
        Self {
            base_hue: 0.5,
            hue_range: 0.9,
            color_influence_factor: 0.1,
            color_update_speed: 0.8,
            visual_range: 2.5,
            centering_factor: 0.005,
            matching_factor: 0.05,
            avoid_factor: 0.05,
            wall_avoid_factor: 4.0,
            max_speed: 0.2,
            min_speed: 0.1,
            bounds: default_bounds(),
            margin: 3.0,
            num_boids: 500,
            constant_color_percentage: 0.1,
        }
    }
}

#[wasm_bindgen]
impl BoidConfig {
    #[wasm_bindgen(constructor)]
    pub fn new() -> BoidConfig {
        Self::default()
    }

    pub fn set_bounds(&mut self, width: f32, height: f32, depth: f32) {
        self.bounds = Bounds::new(width, height, depth);
    }
}

impl BoidConfig {
    /// Rejects configurations that would poison the numeric state or describe
    /// an impossible population. Checked once, at flock construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            self.base_hue,
            self.hue_range,
            self.color_influence_factor,
            self.color_update_speed,
            self.visual_range,
            self.centering_factor,
            self.matching_factor,
            self.avoid_factor,
            self.wall_avoid_factor,
            self.max_speed,
            self.min_speed,
            self.bounds.width,
            self.bounds.height,
            self.bounds.depth,
            self.margin,
            self.constant_color_percentage,
        ];
        if scalars.iter().any(|value| !value.is_finite()) {
            return Err(ConfigError::InvalidConfig(
                "every numeric field must be finite",
            ));
        }
        if self.num_boids == 0 {
            return Err(ConfigError::InvalidConfig("num_boids must be at least 1"));
        }
        if self.bounds.width <= 0.0 || self.bounds.height <= 0.0 || self.bounds.depth <= 0.0 {
            return Err(ConfigError::InvalidConfig(
                "bounds half-extents must be positive",
            ));
        }
        if self.visual_range < 0.0 {
            return Err(ConfigError::InvalidConfig(
                "visual_range must be non-negative",
            ));
        }
        if self.margin < 0.0 {
            return Err(ConfigError::InvalidConfig("margin must be non-negative"));
        }
        if self.hue_range < 0.0 {
            return Err(ConfigError::InvalidConfig("hue_range must be non-negative"));
        }
        if self.min_speed < 0.0 || self.max_speed < self.min_speed {
            return Err(ConfigError::InvalidConfig(
                "speed envelope must satisfy 0 <= min_speed <= max_speed",
            ));
        }
        if !(0.0..=1.0).contains(&self.constant_color_percentage) {
            return Err(ConfigError::InvalidConfig(
                "constant_color_percentage must be within [0, 1]",
            ));
        }
        Ok(())
    }
}
