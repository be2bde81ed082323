//! Reflection tracer: direct shading plus a bounded chain of mirror bounces.
//!
//! The chain is an explicit loop carrying `(ray, hit, attenuation)`. Each
//! bounce multiplies the attenuation by the specular coefficient of the surface
//! it lands on, so with coefficients in [0, 1] later bounces can only
//! contribute less.

use crate::hittable::HitRecord;
use crate::material::{reflect, Color};
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::shade;

/// Color and coverage for one camera sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Accumulated radiance.
    pub color: Color,
    /// 1.0 when the primary ray hit geometry, 0.0 when it shows background.
    pub alpha: f32,
}

/// One reflection segment, reported by [`Tracer::trace_observed`].
#[derive(Debug, Clone, Copy)]
pub struct Bounce {
    /// Zero-based bounce number.
    pub index: u32,
    /// The reflected ray that was cast.
    pub ray: Ray,
    /// What it hit, or `None` if it escaped to the environment.
    pub hit: Option<HitRecord>,
    /// Weight applied to this segment's contribution.
    pub attenuation: Color,
}

/// Traces camera rays against a borrowed scene.
#[derive(Clone, Copy)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    bounce_limit: u32,
}

impl<'a> Tracer<'a> {
    /// `bounce_limit` counts reflection segments after the primary hit;
    /// zero means direct lighting only.
    pub fn new(scene: &'a Scene, bounce_limit: u32) -> Self {
        Self {
            scene,
            bounce_limit,
        }
    }

    /// Maximum number of reflection segments per sample.
    pub fn bounce_limit(&self) -> u32 {
        self.bounce_limit
    }

    /// Per-pixel entry point for the camera driver.
    pub fn render_ray(&self, ray: &Ray) -> Sample {
        self.trace(ray)
    }

    /// Shade `ray` and follow its mirror reflections.
    pub fn trace(&self, ray: &Ray) -> Sample {
        self.trace_observed(ray, |_| {})
    }

    /// Same as [`Tracer::trace`], calling `on_bounce` once per reflection
    /// segment in order.
    pub fn trace_observed<F>(&self, ray: &Ray, mut on_bounce: F) -> Sample
    where
        F: FnMut(&Bounce),
    {
        let environment = self.scene.environment();

        let Some(hit) = self.scene.intersect(ray) else {
            return Sample {
                color: environment.sample(ray.direction),
                alpha: 0.0,
            };
        };

        let mut color = shade(self.scene, &hit.material, hit.p, hit.normal, (-ray.direction).normalize());
        let mut attenuation = hit.material.specular;
        let mut current_ray = *ray;
        let mut current_hit = hit;

        let mut bounce = 0;
        while bounce < self.bounce_limit && attenuation.element_sum() > 0.0 {
            let reflected = Ray::new(current_hit.p, reflect(current_ray.direction, current_hit.normal));
            let next = self.scene.intersect(&reflected);

            on_bounce(&Bounce {
                index: bounce,
                ray: reflected,
                hit: next,
                attenuation,
            });

            let Some(next_hit) = next else {
                // The environment always ends the chain.
                color += attenuation * environment.sample(reflected.direction);
                break;
            };

            let view = (-reflected.direction).normalize();
            color += attenuation * shade(self.scene, &next_hit.material, next_hit.p, next_hit.normal, view);
            attenuation *= next_hit.material.specular;
            current_ray = reflected;
            current_hit = next_hit;
            bounce += 1;
        }

        Sample { color, alpha: 1.0 }
    }
}
