//! Scene model: spheres, point lights and the environment behind them.
//!
//! A scene is assembled once and then only read. Tracing borrows it
//! immutably, so a single `&Scene` can be shared by every render worker.

use log::{info, warn};

use crate::environment::Environment;
use crate::hittable::{HitRecord, Hittable, T_EPSILON};
use crate::interval::Interval;
use crate::light::Light;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Immutable collection of primitives, lights and one environment sampler.
pub struct Scene {
    spheres: Vec<Sphere>,
    lights: Vec<Light>,
    environment: Box<dyn Environment>,
}

impl Scene {
    /// Take ownership of the scene contents.
    ///
    /// Empty sphere or light lists are accepted: the scene then renders as
    /// pure environment or as unlit surfaces respectively.
    pub fn new(spheres: Vec<Sphere>, lights: Vec<Light>, environment: Box<dyn Environment>) -> Self {
        if spheres.is_empty() {
            warn!("Scene has no spheres, every ray will show the environment");
        }
        if lights.is_empty() {
            warn!("Scene has no lights, direct lighting will be black");
        }
        info!("Scene: {} spheres, {} lights", spheres.len(), lights.len());

        Self {
            spheres,
            lights,
            environment,
        }
    }

    /// Nearest hit along `ray` beyond the self-intersection epsilon.
    ///
    /// This is the only intersection query in the renderer.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        self.spheres.hit(ray, Interval::from_min(T_EPSILON))
    }

    /// Spheres in the scene.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Point lights in the scene.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Background sampler for escaping rays.
    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::SolidColor;
    use crate::material::{Color, Material};
    use glam::Vec3A;

    #[test]
    fn intersect_uses_nearest_sphere() {
        let near = Sphere::new(Vec3A::new(0.0, 0.0, -3.0), 1.0, Material::matte(Color::X));
        let far = Sphere::new(Vec3A::new(0.0, 0.0, -8.0), 1.0, Material::matte(Color::Y));
        let scene = Scene::new(vec![far, near], vec![], Box::new(SolidColor::new(Color::ZERO)));

        let hit = scene
            .intersect(&Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0)))
            .unwrap();
        assert_eq!(hit.material.diffuse, Color::X);
        assert!((hit.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn empty_scene_never_hits() {
        let scene = Scene::new(vec![], vec![], Box::new(SolidColor::new(Color::ONE)));
        assert!(scene.intersect(&Ray::new(Vec3A::ZERO, Vec3A::Z)).is_none());
        assert_eq!(scene.environment().sample(Vec3A::Z), Color::ONE);
    }
}
