//! Direct lighting: Blinn-Phong with hard shadows.

use glam::Vec3A;

use crate::material::{Color, Material};
use crate::ray::Ray;
use crate::scene::Scene;

/// Direct illumination at a surface point from every light in `scene`.
///
/// `view` points from the surface toward the viewer and must be unit length.
/// A light is skipped entirely when its shadow ray hits anything, including
/// geometry farther away than the light itself.
pub fn shade(scene: &Scene, material: &Material, position: Vec3A, normal: Vec3A, view: Vec3A) -> Color {
    let mut color = Color::ZERO;

    for light in scene.lights() {
        let light_dir = (light.position - position).normalize();
        let shadow_ray = Ray::new(position, light_dir);
        if scene.intersect(&shadow_ray).is_some() {
            continue;
        }

        let diffuse = light_dir.dot(normal).max(0.0) * material.diffuse;
        let half = (light_dir + view).normalize();
        let specular = half.dot(normal).max(0.0).powf(material.shininess) * material.specular;

        color += light.intensity * (diffuse + specular);
    }

    color
}
