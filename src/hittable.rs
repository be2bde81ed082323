//! Ray-object intersection system.
//!
//! Defines the Hittable trait for geometric primitives and HitRecord for
//! storing intersection data. Primary visibility, shadow tests and reflection
//! rays all go through the slice implementation of [`Hittable`] below, so the
//! self-intersection cutoff and nearest-hit rule live in exactly one place.

use glam::Vec3A;

use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;

/// Smallest accepted ray parameter. Hits at or below it are treated as the
/// ray re-hitting the surface it was spawned from.
pub const T_EPSILON: f32 = 1e-4;

/// Nearest valid intersection along a ray.
///
/// Produced fresh for each query and consumed by shading or the bounce loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Point where the ray intersects the object
    pub p: Vec3A,
    /// Outward surface normal at the intersection point (unit vector).
    ///
    /// Not flipped toward the ray: a hit from inside a sphere still reports
    /// the outward normal.
    pub normal: Vec3A,
    /// Material of the object at the hit point
    pub material: Material,
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) so one scene can be shared by every
/// render worker.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection with `t` strictly inside `ray_t`.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

/// Linear nearest-hit search over a list of primitives.
///
/// The accepted window shrinks to each new best `t`, so a later primitive only
/// wins when it is strictly closer. Ties keep the earlier primitive.
impl<T: Hittable> Hittable for [T] {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for object in self {
            let window = ray_t.with_max(closest.map_or(ray_t.max, |rec| rec.t));
            if let Some(rec) = object.hit(r, window) {
                closest = Some(rec);
            }
        }

        closest
    }
}

impl<T: Hittable> Hittable for Vec<T> {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.as_slice().hit(r, ray_t)
    }
}
