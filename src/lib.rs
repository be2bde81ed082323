//! Mirrorball reflection ray tracer
//!
//! Shades camera rays against spheres and point lights with Blinn-Phong
//! direct lighting, hard shadows and a bounded chain of mirror reflections
//! that ends in an environment map.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod config;
pub mod environment;
pub mod hittable;
pub mod interval;
pub mod light;
pub mod material;
pub mod output;
pub mod ray;
pub mod scene;
pub mod shading;
pub mod sphere;
pub mod tracer;
