//! Flocking simulation engine for the portfolio's boids background.
//!
//! The crate owns simulation state only: a fixed population of boids advanced
//! one discrete tick at a time by an external driver (the render loop). After
//! each tick the driver reads flat position/heading/hue buffers straight out
//! of linear memory; rendering, input, and UI live entirely on the host side.

mod boid;
mod config;
mod flock;
mod math;

pub use boid::Boid;
pub use config::{BoidConfig, Bounds, ConfigError, MAX_MAX_SPEED, MIN_MAX_SPEED};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::debug;
use wasm_bindgen::prelude::*;

/// The owning aggregate: the population plus the shared configuration and the
/// per-tick force algorithm (see `flock.rs`).
#[wasm_bindgen]
pub struct Flock {
    config: BoidConfig,
    boids: Vec<Boid>,
    rng: SmallRng,
    tick_index: u64,
    positions: Vec<f32>,
    headings: Vec<f32>,
    hues: Vec<f32>,
}

#[wasm_bindgen]
impl Flock {
    /// Builds the population from `config`. The seed makes a run exactly
    /// reproducible; hosts that want variety pass a fresh one.
    #[wasm_bindgen(constructor)]
    pub fn new(config: BoidConfig, seed: u32) -> Result<Flock, JsError> {
        Ok(Flock::with_config(config, seed)?)
    }

    /// Advances the simulation one tick. Must run to completion before the
    /// next call; the engine has no internal timing of its own.
    pub fn update(&mut self) {
        self.step();
        self.sync_render_buffers();
        self.debug_validate_state();
    }

    /// Reinitializes every boid in place. The population and the color-lock
    /// assignment are kept; reset velocities may sit outside the speed
    /// envelope until the next tick clamps them.
    pub fn reset(&mut self) {
        let config = self.config;
        for boid in &mut self.boids {
            boid.reset(&config, &mut self.rng);
        }
        self.sync_render_buffers();
        debug!(tick = self.tick_index, "flock reset");
    }

    /// Rescales the speed envelope: `max_speed = value`, `min_speed` follows
    /// at half the new maximum. Current velocities are left alone until the
    /// next tick's clamp. Non-finite or out-of-range input keeps the current
    /// maximum.
    pub fn set_max_speed(&mut self, value: f32) {
        let max_speed = math::clamp_finite(
            value,
            MIN_MAX_SPEED,
            MAX_MAX_SPEED,
            self.config.max_speed,
        );
        self.config.max_speed = max_speed;
        self.config.min_speed = max_speed * 0.5;
        debug!(
            max_speed,
            min_speed = self.config.min_speed,
            "speed envelope changed"
        );
    }

    pub fn count(&self) -> usize {
        self.boids.len()
    }

    /// Number of completed ticks since construction.
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Pointer into linear memory: `count * 3` floats, xyz-interleaved world
    /// positions. Valid until the flock is dropped.
    pub fn positions_ptr(&self) -> *const f32 {
        self.positions.as_ptr()
    }

    /// Pointer into linear memory: `count * 3` floats, unit headings derived
    /// from each boid's velocity.
    pub fn headings_ptr(&self) -> *const f32 {
        self.headings.as_ptr()
    }

    /// Pointer into linear memory: `count` floats in the wrapping [0, 1) hue
    /// space.
    pub fn hues_ptr(&self) -> *const f32 {
        self.hues.as_ptr()
    }
}

impl Flock {
    /// Native constructor; the wasm constructor delegates here.
    pub fn with_config(config: BoidConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(u64::from(seed));
        let boids: Vec<Boid> = (0..config.num_boids)
            .map(|index| Boid::spawn(&config, index, &mut rng))
            .collect();
        let count = boids.len();
        let mut flock = Self {
            config,
            boids,
            rng,
            tick_index: 0,
            positions: vec![0.0; count * 3],
            headings: vec![0.0; count * 3],
            hues: vec![0.0; count],
        };
        flock.sync_render_buffers();
        debug!(num_boids = count, seed, "flock initialized");
        Ok(flock)
    }

    /// Read access for native hosts and tests.
    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn config(&self) -> &BoidConfig {
        &self.config
    }

    fn sync_render_buffers(&mut self) {
        for (i, boid) in self.boids.iter().enumerate() {
            self.positions[i * 3..i * 3 + 3].copy_from_slice(&boid.position().to_array());
            self.headings[i * 3..i * 3 + 3].copy_from_slice(&boid.heading().to_array());
            self.hues[i] = boid.hue();
        }
    }

    /// NaN entering the state is a defect to catch at the source, never a
    /// runtime condition to recover from.
    fn debug_validate_state(&self) {
        #[cfg(debug_assertions)]
        for (index, boid) in self.boids.iter().enumerate() {
            debug_assert!(
                boid.position().is_finite(),
                "non-finite position for boid {index}"
            );
            debug_assert!(
                boid.velocity().is_finite(),
                "non-finite velocity for boid {index}"
            );
            debug_assert!(boid.hue().is_finite(), "non-finite hue for boid {index}");
        }
    }

    #[cfg(test)]
    pub(crate) fn boids_mut(&mut self) -> &mut [Boid] {
        &mut self.boids
    }
}

#[cfg(test)]
mod tests {
    use super::{BoidConfig, Flock};

    #[test]
    fn construction_rejects_invalid_config() {
        let config = BoidConfig {
            num_boids: 0,
            ..BoidConfig::default()
        };
        assert!(Flock::with_config(config, 0).is_err());
    }

    #[test]
    fn render_buffers_track_the_population() {
        let config = BoidConfig {
            num_boids: 8,
            ..BoidConfig::default()
        };
        let mut flock = Flock::with_config(config, 5).expect("valid config");
        flock.update();
        assert_eq!(flock.count(), 8);
        assert_eq!(flock.positions.len(), 24);
        assert_eq!(flock.headings.len(), 24);
        assert_eq!(flock.hues.len(), 8);

        for (i, boid) in flock.boids().iter().enumerate() {
            assert_eq!(flock.positions[i * 3], boid.position().x);
            assert_eq!(flock.hues[i], boid.hue());
            let heading = boid.heading();
            assert!((heading.length() - 1.0).abs() < 1.0e-5);
            assert_eq!(flock.headings[i * 3 + 1], heading.y);
        }
    }

    #[test]
    fn set_max_speed_rescales_the_envelope() {
        let config = BoidConfig {
            num_boids: 4,
            ..BoidConfig::default()
        };
        let mut flock = Flock::with_config(config, 5).expect("valid config");
        flock.set_max_speed(0.4);
        assert_eq!(flock.config().max_speed, 0.4);
        assert_eq!(flock.config().min_speed, 0.2);
    }

    #[test]
    fn set_max_speed_ignores_garbage_input() {
        let config = BoidConfig {
            num_boids: 4,
            ..BoidConfig::default()
        };
        let mut flock = Flock::with_config(config, 5).expect("valid config");
        flock.set_max_speed(f32::NAN);
        assert_eq!(flock.config().max_speed, 0.2);
        assert_eq!(flock.config().min_speed, 0.1);
    }

    #[test]
    fn tick_index_counts_updates() {
        let config = BoidConfig {
            num_boids: 2,
            ..BoidConfig::default()
        };
        let mut flock = Flock::with_config(config, 5).expect("valid config");
        assert_eq!(flock.tick_index(), 0);
        flock.update();
        flock.update();
        assert_eq!(flock.tick_index(), 2);
    }
}
