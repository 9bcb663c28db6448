//! three - inspect three-rs primitives, rotations and colors
//!
//! Every command builds its data with the library crates and prints a
//! summary; nothing is written to disk.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use three_math::RotationOrder;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "three")]
#[command(author, version, about = "Inspect three-rs geometry, rotations and colors")]
#[command(long_about = "
Builds geometry, rotations and colors with the three-rs crates and prints
what they contain.

Examples:
  three box -W 2 -H 1 -D 1 --segments 2   # Box attribute summary
  three box --json                        # Same, machine-readable
  three rotation 90 0 0 --degrees --to ZYX
  three color tomato '#08f' 'hsl(120,50%,50%)'
  three -v render --count 5               # Log every draw call
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a box and summarize its buffers and bounds
    #[command(visible_alias = "b")]
    Box(BoxArgs),

    /// Convert an Euler rotation to quaternion and matrix form
    #[command(visible_alias = "rot")]
    Rotation(RotationArgs),

    /// Parse CSS-style colors
    Color(ColorArgs),

    /// Render a demo scene with the dry-run renderer
    Render(RenderArgs),
}

#[derive(Args)]
struct BoxArgs {
    /// Width (x extent)
    #[arg(short = 'W', long, default_value_t = 1.0)]
    width: f64,

    /// Height (y extent)
    #[arg(short = 'H', long, default_value_t = 1.0)]
    height: f64,

    /// Depth (z extent)
    #[arg(short = 'D', long, default_value_t = 1.0)]
    depth: f64,

    /// Segments along every axis
    #[arg(short, long, default_value_t = 1)]
    segments: usize,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RotationArgs {
    /// Angle about x
    #[arg(allow_negative_numbers = true)]
    x: f64,

    /// Angle about y
    #[arg(allow_negative_numbers = true)]
    y: f64,

    /// Angle about z
    #[arg(allow_negative_numbers = true)]
    z: f64,

    /// Order the angles are applied in
    #[arg(short, long, default_value = "XYZ")]
    order: RotationOrder,

    /// Angles are in degrees instead of radians
    #[arg(short, long)]
    degrees: bool,

    /// Re-extract the Euler angles in this order
    #[arg(long)]
    to: Option<RotationOrder>,
}

#[derive(Args)]
struct ColorArgs {
    /// Colors: keyword, #rgb, #rrggbb, rgb(), rgb(%), hsl()
    #[arg(required = true)]
    styles: Vec<String>,

    /// Fail on the first unparseable color instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct RenderArgs {
    /// Viewport width in pixels
    #[arg(short, long, default_value_t = 640)]
    width: u32,

    /// Viewport height in pixels
    #[arg(short = 'H', long, default_value_t = 480)]
    height: u32,

    /// Boxes in the demo scene
    #[arg(short, long, default_value_t = 3)]
    count: usize,

    /// Use an orthographic camera
    #[arg(long)]
    ortho: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Box(args) => commands::geometry::run(args, cli.verbose),
        Commands::Rotation(args) => commands::rotation::run(args, cli.verbose),
        Commands::Color(args) => commands::color::run(args, cli.verbose),
        Commands::Render(args) => commands::render::run(args, cli.verbose),
    }
}
