//! Point lights.

use glam::Vec3A;

use crate::material::Color;

/// Point light with per-channel intensity and no distance falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Light position in world coordinates.
    pub position: Vec3A,
    /// Radiant intensity per RGB channel.
    pub intensity: Color,
}

impl Light {
    /// Create a new point light.
    pub fn new(position: Vec3A, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
}
