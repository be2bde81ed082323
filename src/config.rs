//! Scene description files.
//!
//! Scenes are JSON documents deserialized into the plain `*Data` structs
//! below and then validated into a [`Scene`]. Image paths inside a scene file
//! are resolved relative to the file's directory.

use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use glam::Vec3A;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::environment::{CubeMap, Environment, Equirectangular, SkyGradient, SolidColor};
use crate::light::Light;
use crate::material::Material;
use crate::scene::Scene;
use crate::sphere::Sphere;

fn vec3(v: [f32; 3]) -> Vec3A {
    Vec3A::from_array(v)
}

fn default_bounce_limit() -> u32 {
    5
}

fn default_vup() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_vfov() -> f32 {
    45.0
}

/// Material coefficients as written in a scene file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialData {
    /// Diffuse reflectance per channel.
    pub diffuse: [f32; 3],
    /// Specular reflectance per channel, zero when omitted.
    #[serde(default)]
    pub specular: [f32; 3],
    /// Phong exponent, zero when omitted.
    #[serde(default)]
    pub shininess: f32,
}

impl MaterialData {
    /// Build a material, warning about coefficients outside [0, 1].
    ///
    /// Specular channels above 1 are clamped: they would let reflections gain
    /// energy with every bounce.
    pub fn transform(&self, owner: &str) -> Material {
        let diffuse = vec3(self.diffuse);
        if diffuse.cmplt(Vec3A::ZERO).any() || diffuse.cmpgt(Vec3A::ONE).any() {
            warn!("{}: diffuse {:?} outside [0, 1]", owner, self.diffuse);
        }

        let mut specular = vec3(self.specular);
        if specular.cmplt(Vec3A::ZERO).any() {
            warn!("{}: negative specular {:?}", owner, self.specular);
        }
        if specular.cmpgt(Vec3A::ONE).any() {
            warn!("{}: specular {:?} clamped to 1", owner, self.specular);
            specular = specular.min(Vec3A::ONE);
        }

        if self.shininess < 0.0 {
            warn!("{}: negative shininess {}", owner, self.shininess);
        }

        Material::new(diffuse, specular, self.shininess)
    }
}

/// A sphere entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SphereData {
    /// Center in world coordinates.
    pub center: [f32; 3],
    /// Must be positive.
    pub radius: f32,
    /// Surface material.
    pub material: MaterialData,
}

impl SphereData {
    /// Build the sphere; `index` names it in error and warning messages.
    pub fn transform(&self, index: usize) -> Result<Sphere, Box<dyn Error>> {
        if !(self.radius > 0.0) {
            return Err(format!("sphere {}: radius must be positive, got {}", index, self.radius).into());
        }
        let material = self.material.transform(&format!("sphere {}", index));
        Ok(Sphere::new(vec3(self.center), self.radius, material))
    }
}

/// A point light entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LightData {
    /// Position in world coordinates.
    pub position: [f32; 3],
    /// Intensity per channel.
    pub intensity: [f32; 3],
}

impl From<&LightData> for Light {
    fn from(data: &LightData) -> Self {
        Light::new(vec3(data.position), vec3(data.intensity))
    }
}

/// Background description, tagged by `"type"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
#[allow(missing_docs)]
pub enum EnvironmentData {
    /// Constant color.
    Solid { color: [f32; 3] },
    /// Vertical gradient, see [`SkyGradient`].
    Sky { horizon: [f32; 3], zenith: [f32; 3] },
    /// Six face images, see [`CubeMap`].
    CubeMap {
        /// Face images ordered +X, -X, +Y, -Y, +Z, -Z.
        faces: [PathBuf; 6],
        #[serde(default)]
        swap_yz: bool,
    },
    /// Latitude/longitude panorama.
    Equirectangular { path: PathBuf },
}

impl Default for EnvironmentData {
    fn default() -> Self {
        let sky = SkyGradient::default();
        EnvironmentData::Sky {
            horizon: sky.horizon.to_array(),
            zenith: sky.zenith.to_array(),
        }
    }
}

impl EnvironmentData {
    /// Build the sampler, loading any images relative to `base_dir`.
    pub fn transform(&self, base_dir: &Path) -> Result<Box<dyn Environment>, Box<dyn Error>> {
        Ok(match self {
            Self::Solid { color } => Box::new(SolidColor::new(vec3(*color))),
            Self::Sky { horizon, zenith } => Box::new(SkyGradient::new(vec3(*horizon), vec3(*zenith))),
            Self::CubeMap { faces, swap_yz } => {
                let paths = faces.clone().map(|face| base_dir.join(face));
                Box::new(CubeMap::load(&paths, *swap_yz)?)
            }
            Self::Equirectangular { path } => Box::new(Equirectangular::load(base_dir.join(path))?),
        })
    }
}

/// Optional camera placement stored with a scene.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraData {
    /// Eye position.
    pub lookfrom: [f32; 3],
    /// Point the camera looks at.
    pub lookat: [f32; 3],
    /// Up direction, +Y when omitted.
    #[serde(default = "default_vup")]
    pub vup: [f32; 3],
    /// Vertical field of view in degrees, 45 when omitted.
    #[serde(default = "default_vfov")]
    pub vfov: f32,
}

impl CameraData {
    /// Copy the view placement onto `camera`, leaving its resolution alone.
    pub fn apply(&self, camera: &mut Camera) {
        camera.lookfrom = vec3(self.lookfrom);
        camera.lookat = vec3(self.lookat);
        camera.vup = vec3(self.vup);
        camera.vfov = self.vfov;
    }
}

/// Top-level scene file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneData {
    /// Reflection segments after the primary hit, 5 when omitted.
    #[serde(default = "default_bounce_limit")]
    pub bounce_limit: u32,
    /// Sphere list.
    #[serde(default)]
    pub spheres: Vec<SphereData>,
    /// Point light list.
    #[serde(default)]
    pub lights: Vec<LightData>,
    /// Background, a white-to-blue sky when omitted.
    #[serde(default)]
    pub environment: EnvironmentData,
    /// Camera placement; the renderer keeps its default view when omitted.
    #[serde(default)]
    pub camera: Option<CameraData>,
}

impl SceneData {
    /// Validate and assemble the scene. Relative image paths are joined onto
    /// `base_dir`.
    pub fn build(&self, base_dir: &Path) -> Result<Scene, Box<dyn Error>> {
        let spheres = self
            .spheres
            .iter()
            .enumerate()
            .map(|(i, s)| s.transform(i))
            .collect::<Result<Vec<_>, _>>()?;
        let lights = self.lights.iter().map(Light::from).collect();
        let environment = self.environment.transform(base_dir)?;
        debug!("Environment: {:?}", self.environment);

        Ok(Scene::new(spheres, lights, environment))
    }

    /// Built-in scene: mirror and colored spheres resting on a large floor
    /// sphere under two lights and a gradient sky.
    pub fn demo() -> Self {
        let sphere = |center: [f32; 3], radius: f32, diffuse: [f32; 3], specular: [f32; 3], shininess: f32| SphereData {
            center,
            radius,
            material: MaterialData {
                diffuse,
                specular,
                shininess,
            },
        };

        SceneData {
            bounce_limit: 5,
            spheres: vec![
                sphere([0.0, -100.0, 0.0], 100.0, [0.5, 0.5, 0.5], [0.2, 0.2, 0.2], 20.0),
                sphere([0.0, 1.0, 0.0], 1.0, [0.05, 0.05, 0.05], [0.9, 0.9, 0.9], 200.0),
                sphere([-2.3, 0.8, 0.6], 0.8, [0.8, 0.1, 0.1], [0.3, 0.3, 0.3], 50.0),
                sphere([2.3, 0.8, 0.6], 0.8, [0.1, 0.2, 0.8], [0.3, 0.3, 0.3], 50.0),
                sphere([0.9, 0.35, 2.0], 0.35, [0.4, 0.3, 0.05], [0.8, 0.6, 0.2], 100.0),
            ],
            lights: vec![
                LightData {
                    position: [-4.0, 6.0, 4.0],
                    intensity: [0.7, 0.7, 0.7],
                },
                LightData {
                    position: [5.0, 8.0, -2.0],
                    intensity: [0.5, 0.5, 0.6],
                },
            ],
            environment: EnvironmentData::default(),
            camera: Some(CameraData {
                lookfrom: [0.0, 2.5, 9.0],
                lookat: [0.0, 1.0, 0.0],
                vup: default_vup(),
                vfov: 35.0,
            }),
        }
    }
}

/// Read and deserialize a JSON file.
pub fn load_json<T>(path: &Path) -> Result<T, Box<dyn Error>>
where
    T: DeserializeOwned,
{
    let mut input = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut input))
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    let data: T = serde_json::from_str(&input).map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
    Ok(data)
}

/// Load a scene file, returning both the parsed description and the built scene.
pub fn load_scene(path: &Path) -> Result<(SceneData, Scene), Box<dyn Error>> {
    let data: SceneData = load_json(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let scene = data.build(base_dir)?;
    Ok((data, scene))
}
