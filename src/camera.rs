//! Camera for ray generation and frame rendering

use glam::Vec3A;
use image::{ImageBuffer, Rgba};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::ray::Ray;
use crate::tracer::Tracer;

/// Linear RGBA frame: color from the tracer, alpha = 1 where geometry was hit.
pub type Framebuffer = ImageBuffer<Rgba<f32>, Vec<f32>>;

/// Pinhole camera generating one ray per pixel center.
///
/// There is no jitter and no lens: each pixel maps to exactly one ray, so
/// rendering the same scene twice yields identical frames.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Point camera is looking from (camera position)
    pub lookfrom: Vec3A,
    /// Point camera is looking at (look target)
    pub lookat: Vec3A,
    /// Camera-relative "up" direction vector
    pub vup: Vec3A,

    /// Camera position in world space (same as lookfrom)
    center: Vec3A,
    /// World position of the top-left pixel (pixel 0,0)
    pixel00_loc: Vec3A,
    /// Offset vector from pixel to pixel horizontally (right direction)
    pixel_delta_u: Vec3A,
    /// Offset vector from pixel to pixel vertically (down direction)
    pixel_delta_v: Vec3A,
    /// Flag to track whether camera parameters have been calculated
    initialized: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Creates a new camera with default settings.
    ///
    /// Default: 100x100 image, 90° FOV, at the origin looking down -Z.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            image_height: 100,
            vfov: 90.0,
            lookfrom: Vec3A::new(0.0, 0.0, 0.0),
            lookat: Vec3A::new(0.0, 0.0, -1.0),
            vup: Vec3A::new(0.0, 1.0, 0.0),
            center: Vec3A::ZERO,
            pixel00_loc: Vec3A::ZERO,
            pixel_delta_u: Vec3A::ZERO,
            pixel_delta_v: Vec3A::ZERO,
            initialized: false,
        }
    }

    /// Renders the frame by tracing one ray per pixel.
    ///
    /// Pixels are independent, so rows are spread across the rayon pool and
    /// each worker writes only its own pixel.
    pub fn render(&mut self, tracer: &Tracer) -> Framebuffer {
        self.initialize();

        let mut image = Framebuffer::new(self.image_width, self.image_height);

        info!(
            "Tracing {}x{} pixels, {} bounces, on {} CPU cores...",
            self.image_width,
            self.image_height,
            tracer.bounce_limit(),
            rayon::current_num_threads()
        );
        let generation_start = std::time::Instant::now();
        let pb = ProgressBar::new(self.image_height as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
            pb.set_style(style);
        }

        let camera = &*self;
        let row_len = self.image_width as usize * 4;
        image
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(j, row)| {
                for (i, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let sample = tracer.render_ray(&camera.get_ray(i as u32, j as u32));
                    pixel.copy_from_slice(&[sample.color.x, sample.color.y, sample.color.z, sample.alpha]);
                }
                pb.inc(1);
            });

        pb.finish();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        image
    }

    /// Initialize camera parameters based on current settings.
    ///
    /// Sets up the camera coordinate system and a viewport one unit in front
    /// of the eye. Automatically called by render().
    fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        self.image_width = self.image_width.max(1);
        self.image_height = self.image_height.max(1);

        self.center = self.lookfrom;

        // Determine viewport dimensions
        let theta = self.vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate the u,v,w unit basis vectors for the camera coordinate frame
        let w = (self.lookfrom - self.lookat).normalize(); // Points opposite view direction
        let u = self.vup.cross(w).normalize(); // Points to camera right
        let v = w.cross(u); // Points to camera up

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate the location of the upper left pixel
        let viewport_upper_left = self.center - w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        debug!("Camera basis u={:?} v={:?} w={:?}", u, v, w);
        self.initialized = true;
    }

    /// Unit-length ray from the eye through the center of pixel (i, j).
    pub fn get_ray(&self, i: u32, j: u32) -> Ray {
        let pixel_center = self.pixel00_loc + (i as f32 * self.pixel_delta_u) + (j as f32 * self.pixel_delta_v);
        Ray::new(self.center, (pixel_center - self.center).normalize())
    }

    /// Force initialization, for callers that need [`Camera::get_ray`] without
    /// a full render.
    pub fn prepare(&mut self) -> &Self {
        self.initialize();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::SolidColor;
    use crate::light::Light;
    use crate::material::{Color, Material};
    use crate::scene::Scene;
    use crate::sphere::Sphere;

    fn camera(width: u32, height: u32) -> Camera {
        let mut c = Camera::new();
        c.image_width = width;
        c.image_height = height;
        c
    }

    #[test]
    fn center_pixel_looks_down_view_axis() {
        let mut c = camera(3, 3);
        let r = c.prepare().get_ray(1, 1);
        assert_eq!(r.origin, Vec3A::ZERO);
        assert!((r.direction - Vec3A::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn rays_are_unit_length_and_oriented() {
        let mut c = camera(8, 4);
        let c = c.prepare();
        for (i, j) in [(0, 0), (7, 0), (0, 3), (7, 3), (4, 2)] {
            assert!((c.get_ray(i, j).direction.length() - 1.0).abs() < 1e-6);
        }
        // Top-left points up and left, bottom-right down and right.
        let tl = c.get_ray(0, 0).direction;
        let br = c.get_ray(7, 3).direction;
        assert!(tl.x < 0.0 && tl.y > 0.0);
        assert!(br.x > 0.0 && br.y < 0.0);
    }

    #[test]
    fn render_marks_hits_opaque_and_background_transparent() {
        let scene = Scene::new(
            vec![Sphere::new(Vec3A::new(0.0, 0.0, -3.0), 1.0, Material::matte(Color::ONE))],
            vec![Light::new(Vec3A::new(0.0, 0.0, 5.0), Color::ONE)],
            Box::new(SolidColor::new(Color::new(0.0, 0.0, 0.5))),
        );
        let tracer = Tracer::new(&scene, 2);
        let mut c = camera(9, 9);
        let frame = c.render(&tracer);

        let center = frame.get_pixel(4, 4);
        assert_eq!(center[3], 1.0);
        assert!(center[0] > 0.9);

        let corner = frame.get_pixel(0, 0);
        assert_eq!(corner.0, [0.0, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn rendering_is_repeatable() {
        let scene = Scene::new(
            vec![Sphere::new(Vec3A::new(0.3, 0.1, -4.0), 1.0, Material::new(Color::splat(0.3), Color::splat(0.6), 30.0))],
            vec![Light::new(Vec3A::new(2.0, 3.0, 1.0), Color::ONE)],
            Box::new(SolidColor::new(Color::splat(0.2))),
        );
        let tracer = Tracer::new(&scene, 3);
        let a = camera(16, 12).render(&tracer);
        let b = camera(16, 12).render(&tracer);
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
