use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser, Debug)]
#[command(name = "mirrorball")]
#[command(about = "A recursive-reflection ray tracer for spheres and point lights")]
pub struct Args {
    /// Scene description (JSON). Renders the built-in demo scene when omitted.
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600")]
    pub height: u32,

    /// Reflection bounces after the primary hit (overrides the scene file)
    #[arg(long, short = 'b')]
    pub bounces: Option<u32>,

    /// Send image to TEV for real-time visualization
    #[arg(long)]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long)]
    pub tev_address: Option<String>,

    /// Output file path (.png for 8-bit sRGB with alpha, .exr for HDR linear)
    #[arg(short, long, default_value = "output.png")]
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["mirrorball"]);
        assert!(args.scene.is_none());
        assert_eq!((args.width, args.height), (800, 600));
        assert!(args.bounces.is_none());
        assert_eq!(args.output, "output.png");
        assert_eq!(LevelFilter::from(args.debug_level), LevelFilter::Info);
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "mirrorball",
            "--scene",
            "scenes/demo.json",
            "-b",
            "0",
            "--debug-level",
            "trace",
            "--tev-address",
            "host:1",
        ]);
        assert_eq!(args.scene, Some(PathBuf::from("scenes/demo.json")));
        assert_eq!(args.bounces, Some(0));
        assert_eq!(args.tev_address.as_deref(), Some("host:1"));
        assert_eq!(LevelFilter::from(args.debug_level), LevelFilter::Trace);
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
