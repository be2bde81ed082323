//! # Output Module
//!
//! Writes rendered RGBA frames out:
//! - PNG export with sRGB encoding of the clamped color and linear alpha
//! - EXR export of the raw linear values
//! - Real-time visualization via TEV (The EXR Viewer)
//!
//! All three sinks log failures as warnings and return normally.

use std::net::TcpStream;

use exr::prelude::write_rgba_file;
use image::{ImageBuffer, Rgba, RgbaImage};
use log::{debug, info, warn};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::camera::Framebuffer;

/// Default TEV port used when the address has none.
pub const TEV_DEFAULT_PORT: u16 = 14158;

const TEV_IMAGE_NAME: &str = "mirrorball_output";
const TEV_CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

/// sRGB transfer function for a linear value already clamped to [0, 1].
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 0.0031308 {
        // Linear portion for very dark values
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert a linear frame to 8-bit RGBA.
///
/// Color channels are clamped to [0, 1] and sRGB encoded; alpha is only
/// clamped and scaled.
pub fn to_rgba8(image: &Framebuffer) -> RgbaImage {
    let quantize = |v: f32| (v * 255.0).round() as u8;
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        Rgba([
            quantize(linear_to_srgb(r.clamp(0.0, 1.0))),
            quantize(linear_to_srgb(g.clamp(0.0, 1.0))),
            quantize(linear_to_srgb(b.clamp(0.0, 1.0))),
            quantize(a.clamp(0.0, 1.0)),
        ])
    })
}

/// Save the frame as an 8-bit sRGB PNG with alpha.
pub fn save_image_as_png(image: &Framebuffer, output_path: &str) {
    match to_rgba8(image).save(output_path) {
        Ok(_) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Save the frame as a linear RGBA OpenEXR file.
pub fn save_image_as_exr(image: &Framebuffer, output_path: &str) {
    let result = write_rgba_file(
        output_path,
        image.width() as usize,
        image.height() as usize,
        |x, y| {
            let [r, g, b, a] = image.get_pixel(x as u32, y as u32).0;
            (r, g, b, a)
        },
    );

    match result {
        Ok(_) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}

/// Append the default TEV port when `address` has none.
pub fn tev_address_with_port(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, TEV_DEFAULT_PORT)
    }
}

/// Reorder interleaved RGBA into planar RRR..GGG..BBB..AAA.. as TEV expects.
fn planar_channels(image: &Framebuffer) -> Vec<f32> {
    let pixel_count = (image.width() * image.height()) as usize;
    let mut data = Vec::with_capacity(pixel_count * 4);
    for channel in 0..4 {
        data.extend(image.pixels().map(|pixel| pixel[channel]));
    }
    data
}

/// Stream the frame to a running TEV instance.
pub fn send_image_to_tev(image: &Framebuffer, tev_address: &str) {
    let tev_address = tev_address_with_port(tev_address);
    let (width, height) = image.dimensions();

    debug!("Attempting to connect to TEV at {}", tev_address);
    let stream = match TcpStream::connect(&tev_address) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to connect to TEV on {}: {}", tev_address, e);
            return;
        }
    };
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let mut client = TevClient::wrap(stream);

    let create_packet = PacketCreateImage {
        image_name: TEV_IMAGE_NAME,
        grab_focus: true,
        width,
        height,
        channel_names: &TEV_CHANNELS,
    };
    if let Err(e) = client.send(create_packet) {
        warn!("Failed to create image in TEV: {}", e);
        return;
    }

    let data = planar_channels(image);
    let plane = (width * height) as u64;
    debug!("Sending {} pixels to TEV ({:.1} MB)", plane, data.len() as f32 * 4.0 / 1_000_000.0);
    let start_time = std::time::Instant::now();

    let update_packet = PacketUpdateImage {
        image_name: TEV_IMAGE_NAME,
        grab_focus: false,
        channel_names: &TEV_CHANNELS,
        x: 0,
        y: 0,
        width,
        height,
        channel_offsets: &[0, plane, 2 * plane, 3 * plane],
        channel_strides: &[1, 1, 1, 1],
        data: &data,
    };
    match client.send(update_packet) {
        Ok(_) => info!("Image data sent to TEV at {} in {:.2?}", tev_address, start_time.elapsed()),
        Err(e) => warn!("Failed to send image data to TEV: {}", e),
    }
}
