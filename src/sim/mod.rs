//! Particle field simulation
//!
//! Pure and deterministic, no rendering or platform dependencies:
//! - One step per display frame, no delta time
//! - Seeded RNG only
//! - Stable particle order (links are reported by index)

pub mod field;
pub mod links;
pub mod particle;
pub mod tick;

pub use field::{FieldStats, ParticleField, target_count};
pub use links::{Link, link_alpha, links_all_pairs, links_grid};
pub use particle::Particle;
pub use tick::tick;
