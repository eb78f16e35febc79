//! Particle field state
//!
//! Owns the space bounds, the particle set, and the links computed on the last
//! tick. Seeded RNG only, so a seed reproduces the same field.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::links::{Link, links_all_pairs, links_grid};
use super::particle::Particle;
use crate::settings::{FieldConfig, Settings};

/// Snapshot of field counters, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldStats {
    pub particles: usize,
    pub links: usize,
    pub ticks: u64,
}

/// The particle background simulation
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f32,
    height: f32,
    particles: Vec<Particle>,
    links: Vec<Link>,
    config: FieldConfig,
    max_particles: usize,
    rng: Pcg32,
    ticks: u64,
}

/// Particle count for a `width` x `height` space:
/// `min(floor(width * height / area_per_particle), cap)`
pub fn target_count(width: f32, height: f32, area_per_particle: f32, cap: usize) -> usize {
    if !(width > 0.0 && height > 0.0) {
        return 0;
    }
    if !(area_per_particle > 0.0) {
        return cap;
    }
    let n = (width as f64 * height as f64 / area_per_particle as f64).floor();
    (n as usize).min(cap)
}

impl ParticleField {
    /// Create and populate a field for the given viewport
    pub fn new(width: f32, height: f32, settings: &Settings, seed: u64) -> Self {
        Self::with_config(width, height, settings.field.clone(), settings.max_particles(), seed)
    }

    pub fn with_config(
        width: f32,
        height: f32,
        config: FieldConfig,
        max_particles: usize,
        seed: u64,
    ) -> Self {
        let mut field = Self {
            width,
            height,
            particles: Vec::new(),
            links: Vec::new(),
            config,
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
            ticks: 0,
        };
        field.reinitialize();
        field
    }

    /// Discard every particle and repopulate for the current space
    pub fn reinitialize(&mut self) {
        let count = target_count(
            self.width,
            self.height,
            self.config.area_per_particle,
            self.max_particles,
        );
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let p = Particle::spawn(&mut self.rng, self.width, self.height, &self.config);
            self.particles.push(p);
        }
        self.links.clear();
        log::debug!(
            "Field populated: {} particles for {}x{}",
            count,
            self.width,
            self.height
        );
    }

    /// Track a new viewport size.
    ///
    /// Only the bounds change: particles keep their positions and the count is
    /// not recomputed for the new area.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Move every particle one frame and reflect off the edges
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.advance(w, h);
        }
        self.ticks += 1;
    }

    /// Recompute proximity links for the current positions
    pub fn update_links(&mut self) {
        if self.config.spatial_grid {
            links_grid(&self.particles, &self.config, &mut self.links);
        } else {
            links_all_pairs(&self.particles, &self.config, &mut self.links);
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Links from the last `update_links`
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            particles: self.particles.len(),
            links: self.links.len(),
            ticks: self.ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(w: f32, h: f32, seed: u64) -> ParticleField {
        ParticleField::new(w, h, &Settings::enabled(), seed)
    }

    #[test]
    fn test_count_examples() {
        assert_eq!(field(1000.0, 1000.0, 1).particles().len(), 66);
        assert_eq!(field(2000.0, 2000.0, 1).particles().len(), 80);
        assert_eq!(field(100.0, 100.0, 1).particles().len(), 0);
        assert_eq!(field(1920.0, 1080.0, 1).particles().len(), 80);
        assert_eq!(field(390.0, 844.0, 1).particles().len(), 21);
    }

    #[test]
    fn test_degenerate_space_is_empty() {
        assert_eq!(target_count(0.0, 900.0, 15_000.0, 80), 0);
        assert_eq!(target_count(-300.0, -300.0, 15_000.0, 80), 0);
        assert_eq!(target_count(f32::NAN, 900.0, 15_000.0, 80), 0);
    }

    #[test]
    fn test_overflowing_override_still_builds() {
        let settings = Settings::from_json(r#"{"field":{"max_speed":1e39}}"#);
        let mut f = ParticleField::new(1000.0, 1000.0, &settings, 1);
        assert_eq!(f.particles().len(), 66);
        f.step();
        assert!(f.particles().iter().all(|p| p.pos.is_finite()));

        // Bypassing settings validation still spawns finite particles
        let config = FieldConfig {
            max_speed: f32::INFINITY,
            opacity_max: f32::INFINITY,
            ..FieldConfig::default()
        };
        let f = ParticleField::with_config(1000.0, 1000.0, config, 80, 1);
        assert_eq!(f.particles().len(), 66);
        assert!(f.particles().iter().all(|p| p.vel.is_finite() && p.opacity.is_finite()));
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = field(1280.0, 720.0, 42);
        let b = field(1280.0, 720.0, 42);
        assert_eq!(a.particles(), b.particles());
        let c = field(1280.0, 720.0, 43);
        assert_ne!(a.particles(), c.particles());
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut f = field(1000.0, 1000.0, 9);
        let before = f.particles().to_vec();
        f.resize(3000.0, 3000.0);
        assert_eq!(f.size(), (3000.0, 3000.0));
        assert_eq!(f.particles(), &before[..]);

        // Shrinking does not drop or move anything either
        f.resize(200.0, 200.0);
        assert_eq!(f.particles().len(), 66);
        assert_eq!(f.particles(), &before[..]);
    }

    #[test]
    fn test_reinitialize_uses_current_space() {
        let mut f = field(1000.0, 1000.0, 9);
        f.resize(600.0, 500.0);
        f.reinitialize();
        assert_eq!(f.particles().len(), 20);
        assert!(f.particles().iter().all(|p| p.pos.x < 600.0 && p.pos.y < 500.0));
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut f = field(1000.0, 1000.0, 3);
        let before = f.particles().to_vec();
        f.step();
        for (old, new) in before.iter().zip(f.particles()) {
            assert_eq!(new.pos, old.pos + old.vel);
        }
        assert_eq!(f.stats().ticks, 1);
    }

    #[test]
    fn test_grid_and_all_pairs_agree_on_field() {
        let mut brute = field(1920.0, 1080.0, 5);
        let mut config = brute.config().clone();
        config.spatial_grid = true;
        let mut grid = ParticleField::with_config(1920.0, 1080.0, config, 80, 5);

        for _ in 0..200 {
            brute.step();
            grid.step();
        }
        brute.update_links();
        grid.update_links();
        assert!(!brute.links().is_empty());
        assert_eq!(brute.links(), grid.links());
    }

    proptest! {
        #[test]
        fn prop_count_formula(w in 0u32..4000, h in 0u32..4000) {
            let expected = ((w as u64 * h as u64) / 15_000).min(80) as usize;
            prop_assert_eq!(target_count(w as f32, h as f32, 15_000.0, 80), expected);
        }

        #[test]
        fn prop_positions_stay_near_bounds(
            seed in any::<u64>(),
            w in 200.0f32..2000.0,
            h in 200.0f32..2000.0,
            steps in 0usize..3000,
        ) {
            let mut f = field(w, h, seed);
            for _ in 0..steps {
                f.step();
            }
            // One frame of overshoot at most
            let eps = 0.2 + 1e-3;
            for p in f.particles() {
                prop_assert!(p.pos.x >= -eps && p.pos.x <= w + eps, "x = {}", p.pos.x);
                prop_assert!(p.pos.y >= -eps && p.pos.y <= h + eps, "y = {}", p.pos.y);
            }
        }
    }
}
