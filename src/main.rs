use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use mirrorball::camera::Camera;
use mirrorball::config::{load_scene, SceneData};
use mirrorball::output::{save_image_as_exr, save_image_as_png, send_image_to_tev};
use mirrorball::scene::Scene;
use mirrorball::tracer::Tracer;

/// Output formats the binary can write, picked from the file extension.
enum OutputFormat {
    Png,
    Exr,
}

fn output_format(path: &str) -> Result<OutputFormat, Box<dyn Error>> {
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => Ok(OutputFormat::Png),
        "exr" => Ok(OutputFormat::Exr),
        other => Err(format!("Unsupported file extension '{}'. Only .png and .exr formats are supported.", other).into()),
    }
}

/// Load the requested scene, or build the demo scene.
fn open_scene(args: &Args) -> Result<(SceneData, Scene), Box<dyn Error>> {
    match &args.scene {
        Some(path) => {
            info!("Loading scene {}", path.display());
            load_scene(path)
        }
        None => {
            info!("No scene file given, rendering the demo scene");
            let data = SceneData::demo();
            let scene = data.build(Path::new("."))?;
            Ok((data, scene))
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let format = output_format(&args.output)?;
    let (data, scene) = open_scene(&args)?;

    let bounce_limit = args.bounces.unwrap_or(data.bounce_limit);
    let tracer = Tracer::new(&scene, bounce_limit);

    let mut camera = Camera::new();
    camera.image_width = args.width;
    camera.image_height = args.height;
    if let Some(view) = &data.camera {
        view.apply(&mut camera);
    }

    let image = camera.render(&tracer);

    // Send image to TEV if requested
    if args.tev || args.tev_address.is_some() {
        let tev_address = args.tev_address.as_deref().unwrap_or("localhost");
        send_image_to_tev(&image, tev_address);
    }

    match format {
        OutputFormat::Png => save_image_as_png(&image, &args.output),
        OutputFormat::Exr => save_image_as_exr(&image, &args.output),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    info!("Mirrorball - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
