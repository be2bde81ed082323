//! Sphere primitive for ray tracing.
//!
//! Ray-sphere intersection solves `a*t^2 + b*t + c = 0` and keeps only the near
//! root. A ray that starts inside a sphere therefore sees its near root behind
//! the origin and passes through without a hit.

use glam::Vec3A;

use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;

/// Sphere primitive defined by center, radius, and material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Radius of the sphere. Scene loading rejects non-positive values.
    pub radius: f32,

    /// Material properties determining light interaction.
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3A, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        // Vector from sphere center to ray origin
        let pc = r.origin - self.center;

        let a = r.direction.dot(r.direction);
        let b = 2.0 * pc.dot(r.direction);
        let c = pc.dot(pc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Near root only
        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = r.at(t);
        Some(HitRecord {
            t,
            p,
            normal: (p - self.center).normalize(),
            material: self.material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::T_EPSILON;
    use crate::material::Color;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3A::ZERO, 1.0, Material::matte(Color::ONE))
    }

    #[test]
    fn head_on_hit_reports_near_surface() {
        let r = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::new(0.0, 0.0, -1.0));
        let rec = unit_sphere().hit(&r, Interval::from_min(T_EPSILON)).unwrap();

        assert_eq!(rec.t, 4.0);
        assert_eq!(rec.p, Vec3A::new(0.0, 0.0, 1.0));
        assert_eq!(rec.normal, Vec3A::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn miss_when_discriminant_negative() {
        let r = Ray::new(Vec3A::new(0.0, 2.0, 5.0), Vec3A::new(0.0, 0.0, -1.0));
        assert!(unit_sphere().hit(&r, Interval::from_min(T_EPSILON)).is_none());
    }

    #[test]
    fn sphere_behind_origin_is_rejected() {
        let r = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::new(0.0, 0.0, 1.0));
        assert!(unit_sphere().hit(&r, Interval::from_min(T_EPSILON)).is_none());
    }

    #[test]
    fn origin_inside_sphere_does_not_take_far_root() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::X);
        assert!(unit_sphere().hit(&r, Interval::from_min(T_EPSILON)).is_none());
    }

    #[test]
    fn surface_origin_does_not_self_intersect() {
        // Leaving the surface outward: near root is negative.
        let outward = Ray::new(Vec3A::new(0.0, 0.0, 1.0), Vec3A::new(0.0, 0.0, 1.0));
        assert!(unit_sphere().hit(&outward, Interval::from_min(T_EPSILON)).is_none());

        // Grazing into the surface: near root is ~0 and falls under epsilon.
        let inward = Ray::new(Vec3A::new(0.0, 0.0, 1.0), Vec3A::new(0.0, 0.0, -1.0));
        assert!(unit_sphere().hit(&inward, Interval::from_min(T_EPSILON)).is_none());
    }

    #[test]
    fn near_root_within_epsilon_is_discarded() {
        // Origin 5e-5 above the surface, heading in: the near root lies in (0, 1e-4].
        let r = Ray::new(Vec3A::new(0.0, 0.0, 1.0 + 5e-5), Vec3A::new(0.0, 0.0, -1.0));
        assert!(unit_sphere().hit(&r, Interval::from_min(T_EPSILON)).is_none());
        assert_eq!(T_EPSILON, 1e-4);
    }

    #[test]
    fn near_root_just_past_epsilon_is_kept() {
        let r = Ray::new(Vec3A::new(0.0, 0.0, 1.0 + 3e-4), Vec3A::new(0.0, 0.0, -1.0));
        let rec = unit_sphere().hit(&r, Interval::from_min(T_EPSILON)).unwrap();
        assert!((rec.t - 3e-4).abs() < 1e-5);
        assert!(rec.t > T_EPSILON);
    }

    #[test]
    fn unnormalized_direction_scales_t() {
        let r = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::new(0.0, 0.0, -2.0));
        let rec = unit_sphere().hit(&r, Interval::from_min(T_EPSILON)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-6);
        assert!((rec.p - Vec3A::new(0.0, 0.0, 1.0)).length() < 1e-6);
    }
}
