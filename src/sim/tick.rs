//! Per-frame simulation tick

use super::field::ParticleField;

/// Advance the field by one display frame: move and reflect every particle,
/// then link the pairs that ended up close enough.
pub fn tick(field: &mut ParticleField) {
    field.step();
    field.update_links();
}
