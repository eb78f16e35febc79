//! Effect settings
//!
//! Defaults reproduce the stock landing page. A page can override them with a
//! JSON blob in the canvas's `data-settings` attribute.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => MAX_PARTICLES,
            QualityPreset::High => 120,
        }
    }

    /// Circle tessellation for particle discs
    pub fn disc_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 12,
            QualityPreset::High => 20,
        }
    }
}

/// Particle field tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Viewport area (px²) per particle
    pub area_per_particle: f32,
    /// Velocity component bound (px/frame)
    pub max_speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    /// Pairs closer than this are linked
    pub link_distance: f32,
    /// Link alpha at zero distance
    pub link_alpha: f32,
    pub link_width: f32,
    /// Shared hue for discs and links
    pub color: [u8; 3],
    /// Bucket particles into a grid for the link pass instead of testing every pair
    pub spatial_grid: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            area_per_particle: AREA_PER_PARTICLE,
            max_speed: MAX_SPEED,
            radius_min: RADIUS_MIN,
            radius_max: RADIUS_MAX,
            opacity_min: OPACITY_MIN,
            opacity_max: OPACITY_MAX,
            link_distance: LINK_DISTANCE,
            link_alpha: LINK_ALPHA,
            link_width: LINK_WIDTH,
            color: FIELD_RGB,
            spatial_grid: false,
        }
    }
}

impl FieldConfig {
    /// Every numeric knob is finite and non-negative
    pub fn is_valid(&self) -> bool {
        [
            self.area_per_particle,
            self.max_speed,
            self.radius_min,
            self.radius_max,
            self.opacity_min,
            self.opacity_max,
            self.link_distance,
            self.link_alpha,
            self.link_width,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Page effect settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle field tuning
    pub field: FieldConfig,

    // === Effects ===
    /// Animated particle background
    pub particles: bool,
    /// Scroll reveal of page sections
    pub reveal: bool,
    /// Stat counters
    pub counters: bool,
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::enabled();
        settings.quality = preset;
        settings
    }

    /// Stock settings with every effect on
    pub fn enabled() -> Self {
        Self {
            particles: true,
            reveal: true,
            counters: true,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Parse settings from a JSON override, falling back to stock settings
    pub fn from_json(json: &str) -> Self {
        // Start from the enabled stock settings so partial overrides keep effects on
        let base = serde_json::to_value(Self::enabled()).unwrap_or_default();
        let patch: serde_json::Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                return Self::enabled();
            }
        };
        match serde_json::from_value::<Self>(merge(base, patch)) {
            Ok(settings) if !settings.field.is_valid() => {
                log::warn!("Ignoring settings with out-of-range field values: {:?}", settings.field);
                Self::enabled()
            }
            Ok(settings) => {
                log::info!("Loaded settings override");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid settings: {}", e);
                Self::enabled()
            }
        }
    }
}

/// Overlay `patch` onto `base`, recursing into objects
fn merge(base: serde_json::Value, patch: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match (base, patch) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (key, value) in patch {
                let merged = match base.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, patch) => patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_preset_matches_stock_cap() {
        let settings = Settings::enabled();
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.max_particles(), 80);
    }

    #[test]
    fn test_particles_disabled_caps_at_zero() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 120);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let settings = Settings::from_json(r#"{"quality":"low","field":{"link_distance":100.0}}"#);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.field.link_distance, 100.0);
        assert_eq!(settings.field.link_alpha, LINK_ALPHA);
        assert!(settings.particles);
        assert!(settings.counters);
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let settings = Settings::from_json("{not json");
        assert_eq!(settings.max_particles(), 80);
        assert_eq!(settings.field, FieldConfig::default());
    }

    #[test]
    fn test_overflowing_override_falls_back() {
        // 1e39 overflows f32 and deserializes to infinity
        for json in [
            r#"{"field":{"max_speed":1e39}}"#,
            r#"{"field":{"radius_max":1e39}}"#,
            r#"{"field":{"opacity_min":-1e39}}"#,
            r#"{"field":{"link_distance":-5.0}}"#,
        ] {
            let settings = Settings::from_json(json);
            assert_eq!(settings.field, FieldConfig::default(), "{}", json);
            assert!(settings.particles);
        }
    }

    #[test]
    fn test_default_field_is_valid() {
        assert!(FieldConfig::default().is_valid());
        let config = FieldConfig {
            max_speed: f32::NAN,
            ..FieldConfig::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
