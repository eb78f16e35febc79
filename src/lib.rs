//! pagefx - Landing page effects in WebAssembly
//!
//! Core modules:
//! - `sim`: Particle field simulation (motion, reflection, proximity links)
//! - `renderer`: Draw lists and the wgpu pipeline that presents them
//! - `platform`: Frame scheduling and visibility observation seams
//! - `effects`: Scroll reveal, counters, video sound toggle, anchor scroll
//! - `settings`: Quality presets and field tuning

pub mod effects;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::FxError;
pub use settings::{FieldConfig, QualityPreset, Settings};

/// Effect configuration constants
pub mod consts {
    /// Viewport area (px²) that earns one particle
    pub const AREA_PER_PARTICLE: f32 = 15_000.0;
    /// Hard cap on the particle count
    pub const MAX_PARTICLES: usize = 80;

    /// Velocity components are drawn from [-MAX_SPEED, MAX_SPEED] (px/frame)
    pub const MAX_SPEED: f32 = 0.2;
    pub const RADIUS_MIN: f32 = 0.5;
    pub const RADIUS_MAX: f32 = 2.5;
    pub const OPACITY_MIN: f32 = 0.1;
    pub const OPACITY_MAX: f32 = 0.5;

    /// Pairs closer than this get a connecting line
    pub const LINK_DISTANCE: f32 = 150.0;
    /// Line alpha at zero distance, fading linearly to 0 at LINK_DISTANCE
    pub const LINK_ALPHA: f32 = 0.06;
    pub const LINK_WIDTH: f32 = 0.5;

    /// Particle and link hue (rgb 10, 132, 255)
    pub const FIELD_RGB: [u8; 3] = [10, 132, 255];

    /// Reveal stagger between visible siblings (ms)
    pub const REVEAL_STAGGER_MS: f64 = 80.0;
    pub const REVEAL_THRESHOLD: f32 = 0.1;
    /// Bottom root margin for reveals (px, negative shrinks the viewport)
    pub const REVEAL_BOTTOM_MARGIN: f32 = -40.0;

    /// Counter animation length (ms)
    pub const COUNTER_DURATION_MS: f64 = 2000.0;
    pub const COUNTER_THRESHOLD: f32 = 0.3;
}

/// Convert an 8-bit rgb triple plus alpha to normalized rgba
#[inline]
pub fn rgba(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha,
    ]
}
