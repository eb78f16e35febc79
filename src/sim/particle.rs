//! Particle value type and spawning

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::FieldConfig;

/// A single background particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Fixed magnitude, only signs flip on reflection
    pub vel: Vec2,
    /// Disc radius (px), fixed at creation
    pub radius: f32,
    /// Disc alpha, fixed at creation
    pub opacity: f32,
}

impl Particle {
    /// Spawn a particle uniformly inside a `width` x `height` space
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, config: &FieldConfig) -> Self {
        let speed = config.max_speed.abs();
        Self {
            pos: Vec2::new(uniform(rng, 0.0, width), uniform(rng, 0.0, height)),
            vel: Vec2::new(uniform(rng, -speed, speed), uniform(rng, -speed, speed)),
            radius: uniform(rng, config.radius_min, config.radius_max),
            opacity: uniform(rng, config.opacity_min, config.opacity_max),
        }
    }

    /// Advance one frame, then reflect off the space edges.
    ///
    /// The position is never clamped: a particle that crossed an edge stays
    /// outside for the frame and heads back on the next one.
    #[inline]
    pub fn advance(&mut self, width: f32, height: f32) {
        self.pos += self.vel;
        if self.pos.x < 0.0 || self.pos.x > width {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 || self.pos.y > height {
            self.vel.y = -self.vel.y;
        }
    }
}

/// Uniform sample from [lo, hi). Empty or non-finite ranges collapse to `lo`,
/// or to 0 when `lo` itself isn't finite.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if !lo.is_finite() {
        return 0.0;
    }
    if hi.is_finite() && hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
