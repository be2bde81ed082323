//! Environment samplers: the background seen by rays that leave the scene.
//!
//! An environment is a pure function of direction. It is consulted for primary
//! rays that miss every sphere and as the terminal color of a reflection chain.

use std::error::Error;
use std::f32::consts::PI;
use std::path::Path;

use glam::{Vec3A, Vec3Swizzles};
use image::Rgb32FImage;
use log::debug;

use crate::material::Color;

/// Directional background lookup.
///
/// Implementations must be side-effect free and safe to share across render
/// threads. `direction` is not required to be unit length.
pub trait Environment: Send + Sync {
    /// Background color seen along `direction`.
    fn sample(&self, direction: Vec3A) -> Color;
}

/// Constant background color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    /// Color returned for every direction.
    pub color: Color,
}

impl SolidColor {
    /// Create a constant environment.
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Environment for SolidColor {
    fn sample(&self, _direction: Vec3A) -> Color {
        self.color
    }
}

/// Vertical sky gradient blending from `horizon` (looking down) to `zenith`
/// (looking up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    /// Color at y = -1.
    pub horizon: Color,
    /// Color at y = +1.
    pub zenith: Color,
}

impl SkyGradient {
    /// Create a gradient sky.
    pub fn new(horizon: Color, zenith: Color) -> Self {
        Self { horizon, zenith }
    }
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self::new(Color::new(1.0, 1.0, 1.0), Color::new(0.5, 0.7, 1.0))
    }
}

impl Environment for SkyGradient {
    fn sample(&self, direction: Vec3A) -> Color {
        let unit_direction = direction.normalize();
        // Y = -1 (down) gives a = 0, Y = 1 (up) gives a = 1
        let a = 0.5 * (unit_direction.y + 1.0);
        (1.0 - a) * self.horizon + a * self.zenith
    }
}

/// Cube-map faces in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    /// +X
    PosX = 0,
    /// -X
    NegX = 1,
    /// +Y
    PosY = 2,
    /// -Y
    NegY = 3,
    /// +Z
    PosZ = 4,
    /// -Z
    NegZ = 5,
}

impl CubeFace {
    /// Pick the face hit by `d` and the `[0, 1]` texture coordinates on it.
    ///
    /// Follows the conventional cube-map orientation: for each face, `s` and
    /// `t` grow to the right and downward when the face is viewed from inside
    /// the cube.
    pub fn locate(d: Vec3A) -> (CubeFace, f32, f32) {
        let abs = d.abs();
        let (face, major, sc, tc) = if abs.x >= abs.y && abs.x >= abs.z {
            if d.x > 0.0 {
                (CubeFace::PosX, abs.x, -d.z, -d.y)
            } else {
                (CubeFace::NegX, abs.x, d.z, -d.y)
            }
        } else if abs.y >= abs.z {
            if d.y > 0.0 {
                (CubeFace::PosY, abs.y, d.x, d.z)
            } else {
                (CubeFace::NegY, abs.y, d.x, -d.z)
            }
        } else if d.z > 0.0 {
            (CubeFace::PosZ, abs.z, d.x, -d.y)
        } else {
            (CubeFace::NegZ, abs.z, -d.x, -d.y)
        };

        let s = 0.5 * (sc / major + 1.0);
        let t = 0.5 * (tc / major + 1.0);
        (face, s, t)
    }
}

/// Six-face cube map environment.
pub struct CubeMap {
    faces: [Rgb32FImage; 6],
    /// Look up with `(x, z, y)` instead of `(x, y, z)`, for maps authored
    /// with Z as the up axis.
    pub swap_yz: bool,
}

impl CubeMap {
    /// Build a cube map from six square, equally sized faces ordered
    /// +X, -X, +Y, -Y, +Z, -Z.
    pub fn from_faces(faces: [Rgb32FImage; 6], swap_yz: bool) -> Result<Self, Box<dyn Error>> {
        let (width, height) = faces[0].dimensions();
        if width == 0 || width != height {
            return Err(format!("cube map face must be square and non-empty, got {}x{}", width, height).into());
        }
        if let Some(bad) = faces.iter().position(|face| face.dimensions() != (width, height)) {
            return Err(format!(
                "cube map face {} is {:?}, expected {}x{}",
                bad,
                faces[bad].dimensions(),
                width,
                height
            )
            .into());
        }
        Ok(Self { faces, swap_yz })
    }

    /// Load six face images from disk, ordered +X, -X, +Y, -Y, +Z, -Z.
    pub fn load<P: AsRef<Path>>(paths: &[P; 6], swap_yz: bool) -> Result<Self, Box<dyn Error>> {
        let mut faces = Vec::with_capacity(6);
        for path in paths {
            let path: &Path = path.as_ref();
            debug!("Loading cube map face {}", path.display());
            let face = image::open(path)
                .map_err(|e| format!("failed to load cube map face {}: {}", path.display(), e))?
                .into_rgb32f();
            faces.push(face);
        }
        let faces: [Rgb32FImage; 6] = faces
            .try_into()
            .map_err(|_| "cube map needs exactly six faces")?;
        Self::from_faces(faces, swap_yz)
    }
}

impl Environment for CubeMap {
    fn sample(&self, direction: Vec3A) -> Color {
        let d = if self.swap_yz { direction.xzy() } else { direction };
        let (face, s, t) = CubeFace::locate(d);
        sample_bilinear(&self.faces[face as usize], s, t, false)
    }
}

/// Latitude/longitude environment image.
pub struct Equirectangular {
    image: Rgb32FImage,
}

impl Equirectangular {
    /// Wrap an in-memory panorama.
    pub fn new(image: Rgb32FImage) -> Result<Self, Box<dyn Error>> {
        if image.width() == 0 || image.height() == 0 {
            return Err("equirectangular environment image is empty".into());
        }
        Ok(Self { image })
    }

    /// Load a panorama from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let path: &Path = path.as_ref();
        debug!("Loading equirectangular environment {}", path.display());
        let image = image::open(path)
            .map_err(|e| format!("failed to load environment {}: {}", path.display(), e))?
            .into_rgb32f();
        Self::new(image)
    }
}

/// Map a direction to panorama coordinates: `u` follows azimuth around +Y,
/// `v` runs from the zenith (0) to the nadir (1).
pub fn direction_to_uv(direction: Vec3A) -> (f32, f32) {
    let d = direction.normalize();
    let u = d.z.atan2(d.x) / (2.0 * PI) + 0.5;
    let v = d.y.clamp(-1.0, 1.0).acos() / PI;
    (u, v)
}

impl Environment for Equirectangular {
    fn sample(&self, direction: Vec3A) -> Color {
        let (u, v) = direction_to_uv(direction);
        sample_bilinear(&self.image, u, v, true)
    }
}

/// Bilinear texture lookup. Rows are clamped to the edge; columns wrap
/// around when `wrap_x` is set so panoramas blend across the u = 0/1 seam.
fn sample_bilinear(image: &Rgb32FImage, u: f32, v: f32, wrap_x: bool) -> Color {
    let (width, height) = image.dimensions();
    let y = (v * height as f32 - 0.5).clamp(0.0, (height - 1) as f32);
    let y0 = y.floor() as u32;
    let y1 = (y0 + 1).min(height - 1);
    let fy = y - y0 as f32;

    let (x0, x1, fx) = if wrap_x {
        let x = u * width as f32 - 0.5;
        let base = x.floor();
        let x0 = (base as i64).rem_euclid(width as i64) as u32;
        (x0, (x0 + 1) % width, x - base)
    } else {
        let x = (u * width as f32 - 0.5).clamp(0.0, (width - 1) as f32);
        let x0 = x.floor() as u32;
        (x0, (x0 + 1).min(width - 1), x - x0 as f32)
    };

    let texel = |px: u32, py: u32| Color::from_array(image.get_pixel(px, py).0);
    let top = texel(x0, y0).lerp(texel(x1, y0), fx);
    let bottom = texel(x0, y1).lerp(texel(x1, y1), fx);
    top.lerp(bottom, fy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid_face(size: u32, value: f32) -> Rgb32FImage {
        Rgb32FImage::from_pixel(size, size, Rgb([value, value, value]))
    }

    /// Face i is filled with (i + 1) / 10 so lookups reveal which face they hit.
    fn tagged_cube(swap_yz: bool) -> CubeMap {
        let faces = std::array::from_fn(|i| solid_face(4, (i + 1) as f32 / 10.0));
        CubeMap::from_faces(faces, swap_yz).unwrap()
    }

    fn approx(a: Color, b: Color) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn solid_color_ignores_direction() {
        let env = SolidColor::new(Color::new(0.2, 0.3, 0.4));
        assert_eq!(env.sample(Vec3A::X), env.sample(Vec3A::new(-3.0, 1.0, 7.0)));
    }

    #[test]
    fn sky_gradient_endpoints() {
        let sky = SkyGradient::default();
        assert!(approx(sky.sample(Vec3A::new(0.0, 5.0, 0.0)), sky.zenith));
        assert!(approx(sky.sample(Vec3A::new(0.0, -1.0, 0.0)), sky.horizon));
        assert!(approx(sky.sample(Vec3A::X), 0.5 * (sky.horizon + sky.zenith)));
    }

    #[test]
    fn cube_face_selection_by_major_axis() {
        assert_eq!(CubeFace::locate(Vec3A::new(2.0, 0.5, -0.3)).0, CubeFace::PosX);
        assert_eq!(CubeFace::locate(Vec3A::new(-2.0, 0.5, -0.3)).0, CubeFace::NegX);
        assert_eq!(CubeFace::locate(Vec3A::new(0.1, 0.9, -0.3)).0, CubeFace::PosY);
        assert_eq!(CubeFace::locate(Vec3A::new(0.1, -0.9, -0.3)).0, CubeFace::NegY);
        assert_eq!(CubeFace::locate(Vec3A::new(0.1, 0.2, 0.3)).0, CubeFace::PosZ);
        assert_eq!(CubeFace::locate(Vec3A::new(0.1, 0.2, -0.3)).0, CubeFace::NegZ);
    }

    #[test]
    fn face_center_maps_to_middle_of_texture() {
        let (_, s, t) = CubeFace::locate(Vec3A::new(0.0, 0.0, -1.0));
        assert!((s - 0.5).abs() < 1e-6 && (t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn cube_map_samples_face_along_direction() {
        let cube = tagged_cube(false);
        assert!(approx(cube.sample(Vec3A::X), Color::splat(0.1)));
        assert!(approx(cube.sample(Vec3A::Y), Color::splat(0.3)));
        assert!(approx(cube.sample(-Vec3A::Z), Color::splat(0.6)));
    }

    #[test]
    fn swap_yz_looks_up_swizzled_direction() {
        let cube = tagged_cube(true);
        // +Z in the scene reads the +Y face, +Y reads +Z.
        assert!(approx(cube.sample(Vec3A::Z), Color::splat(0.3)));
        assert!(approx(cube.sample(Vec3A::Y), Color::splat(0.5)));
    }

    #[test]
    fn cube_map_rejects_mismatched_faces() {
        let mut faces: [Rgb32FImage; 6] = std::array::from_fn(|_| solid_face(4, 0.0));
        faces[3] = solid_face(8, 0.0);
        assert!(CubeMap::from_faces(faces, false).is_err());

        let rect = Rgb32FImage::new(4, 2);
        let faces: [Rgb32FImage; 6] = std::array::from_fn(|_| rect.clone());
        assert!(CubeMap::from_faces(faces, false).is_err());
    }

    #[test]
    fn bilinear_blends_between_texels() {
        let mut img = Rgb32FImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0.0, 0.0, 0.0]));
        img.put_pixel(1, 0, Rgb([1.0, 1.0, 1.0]));
        assert!(approx(sample_bilinear(&img, 0.5, 0.5, false), Color::splat(0.5)));
        assert!(approx(sample_bilinear(&img, 0.0, 0.5, false), Color::ZERO));
        assert!(approx(sample_bilinear(&img, 1.0, 0.5, false), Color::ONE));
    }

    #[test]
    fn wrapped_columns_blend_across_seam() {
        let mut img = Rgb32FImage::new(4, 1);
        img.put_pixel(0, 0, Rgb([1.0, 1.0, 1.0]));
        img.put_pixel(3, 0, Rgb([0.0, 0.0, 0.0]));

        // Both edges of the texture sit halfway between the last and first column.
        assert!(approx(sample_bilinear(&img, 0.0, 0.5, true), Color::splat(0.5)));
        assert!(approx(sample_bilinear(&img, 1.0, 0.5, true), Color::splat(0.5)));
        // Clamped addressing keeps the edge texel instead.
        assert!(approx(sample_bilinear(&img, 0.0, 0.5, false), Color::ONE));
        assert!(approx(sample_bilinear(&img, 1.0, 0.5, false), Color::ZERO));
    }

    #[test]
    fn panorama_is_continuous_across_seam() {
        let mut img = Rgb32FImage::new(8, 2);
        for y in 0..2 {
            img.put_pixel(0, y, Rgb([1.0, 1.0, 1.0]));
        }
        let env = Equirectangular::new(img).unwrap();
        // -X lands on u = 0 / u = 1; both sides of the seam must agree.
        let above = env.sample(Vec3A::new(-1.0, 0.0, 1e-4));
        let below = env.sample(Vec3A::new(-1.0, 0.0, -1e-4));
        assert!((above - below).abs().max_element() < 1e-3);
        assert!((above - Color::splat(0.5)).abs().max_element() < 1e-3);
    }

    #[test]
    fn equirectangular_poles_and_seam() {
        let (_, v_up) = direction_to_uv(Vec3A::Y);
        let (_, v_down) = direction_to_uv(-Vec3A::Y);
        assert!(v_up.abs() < 1e-6);
        assert!((v_down - 1.0).abs() < 1e-6);

        let (u, v) = direction_to_uv(Vec3A::X);
        assert!((u - 0.5).abs() < 1e-6 && (v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn equirectangular_reads_top_row_looking_up() {
        let mut img = Rgb32FImage::new(4, 2);
        for x in 0..4 {
            img.put_pixel(x, 0, Rgb([1.0, 0.0, 0.0]));
            img.put_pixel(x, 1, Rgb([0.0, 0.0, 1.0]));
        }
        let env = Equirectangular::new(img).unwrap();
        assert!(approx(env.sample(Vec3A::Y), Color::new(1.0, 0.0, 0.0)));
        assert!(approx(env.sample(-Vec3A::Y), Color::new(0.0, 0.0, 1.0)));
    }
}
