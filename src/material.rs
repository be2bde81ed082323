//! Surface material for Blinn-Phong shading and mirror reflection.
//!
//! Every surface carries a diffuse coefficient, a specular coefficient and a
//! Phong exponent. The specular coefficient doubles as the mirror reflectance
//! that attenuates each reflection bounce.

use glam::Vec3A;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Per-surface reflectance coefficients.
///
/// `diffuse` and `specular` are expected to lie in [0, 1] per channel and
/// `shininess` to be non-negative. Scene loading enforces `specular <= 1` so
/// that reflection energy never grows from bounce to bounce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse (Lambertian) reflectance.
    pub diffuse: Color,
    /// Specular highlight color and mirror reflectance.
    pub specular: Color,
    /// Phong exponent applied to the half-vector term.
    pub shininess: f32,
}

impl Material {
    /// Create a new material.
    pub fn new(diffuse: Color, specular: Color, shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
        }
    }

    /// Purely diffuse surface: no highlight and no reflection.
    pub fn matte(diffuse: Color) -> Self {
        Self::new(diffuse, Color::ZERO, 0.0)
    }
}

/// Reflect a vector off a surface using the law of reflection.
///
/// `n` must be unit length; `v` keeps its length.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_mirrors_about_normal() {
        let v = Vec3A::new(1.0, -1.0, 0.0);
        let r = reflect(v, Vec3A::Y);
        assert_eq!(r, Vec3A::new(1.0, 1.0, 0.0));
        assert!((r.length() - v.length()).abs() < 1e-6);
    }

    #[test]
    fn head_on_reflection_reverses_direction() {
        let r = reflect(Vec3A::new(0.0, 0.0, -1.0), Vec3A::Z);
        assert_eq!(r, Vec3A::Z);
    }

    #[test]
    fn matte_material_has_no_specular() {
        let matte = Material::matte(Color::new(0.2, 0.4, 0.6));
        assert_eq!(matte.specular, Color::ZERO);
        assert_eq!(matte.shininess, 0.0);
    }
}
