use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Rect;

/// Per-body response coefficients.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyMaterial {
    /// Verlet damping; 1.0 keeps the full implied velocity.
    pub drag: f32,
    /// Fraction of tangential velocity removed on contact.
    pub friction: f32,
    /// Extra reflection of the normal velocity (applied as `1 + bounce`).
    pub bounce: f32,
    pub gravity_scale: f32,
    /// Cap used by the `move_*` helpers.
    pub max_speed: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self { drag: 1.0, friction: 0.05, bounce: 0.3, gravity_scale: 1.0, max_speed: 8.0 }
    }
}

/// World-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Downward bias added by the Verlet integrator each step.
    pub gravity: f32,
    /// Solid world edges and the quadtree root region.
    pub bounds: Rect,
    /// Step used by the arcade integrator and `move_*` helpers.
    pub dt: f32,
    /// Quadtree depth control; min node size is `(w + h) / (2 * divisions)`.
    pub quadtree_divisions: u32,
    pub default_material: BodyMaterial,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: 0.2,
            bounds: Rect::new(Vec2::ZERO, Vec2::new(800.0, 600.0)),
            dt: 1.0 / 60.0,
            quadtree_divisions: 6,
            default_material: BodyMaterial::default(),
        }
    }
}

impl WorldConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let cfg: WorldConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt > 0.0) {
            return Err(ConfigError::Invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if self.quadtree_divisions == 0 {
            return Err(ConfigError::Invalid("quadtree_divisions must be at least 1".into()));
        }
        if self.bounds.width() <= 0.0 || self.bounds.height() <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "bounds must have positive size, got {}x{}",
                self.bounds.width(),
                self.bounds.height()
            )));
        }
        Ok(())
    }
}
