//! Ray representation for reflection tracing.
//!
//! A ray is defined as r(t) = origin + t * direction. The same type carries
//! primary camera rays, shadow rays toward lights and mirror-reflected rays.

use glam::Vec3A;

/// Ray in 3D space defined by origin and direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// The camera position for primary rays, or a surface point for shadow
    /// and reflection rays.
    pub origin: Vec3A,

    /// Direction vector of the ray.
    ///
    /// Must be non-zero. It is never renormalized by the intersection code, so
    /// `t` values are measured in units of this vector's length.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}
