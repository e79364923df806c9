use clap::{Parser, ValueEnum};
use paper_burn_core::{BackendPreference, PaperSimulation, SimConfig};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Paper burn demo: hold a spark on a sheet, let it burn, save the last frame
#[derive(Parser, Debug)]
#[command(name = "paper-burn-demo")]
#[command(about = "Headless paper burn simulation demo", long_about = None)]
struct Args {
    /// Sheet width in cells
    #[arg(long, default_value_t = 512)]
    width: usize,

    /// Sheet height in cells
    #[arg(long, default_value_t = 512)]
    height: usize,

    /// Total frames to run
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Frames the spark is held down at the start
    #[arg(long, default_value_t = 30)]
    hold_frames: u64,

    /// Spark x position (0 = left, 1 = right)
    #[arg(short = 'x', long, default_value_t = 0.5)]
    spark_x: f32,

    /// Spark y position (0 = bottom, 1 = top)
    #[arg(short = 'y', long, default_value_t = 0.5)]
    spark_y: f32,

    /// Drag the spark horizontally by this much over the hold
    #[arg(long, default_value_t = 0.0)]
    drag: f32,

    /// Kernel passes per frame
    #[arg(short, long, default_value_t = 1)]
    steps_per_frame: u32,

    /// Noise seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Compute backend
    #[arg(short, long, value_enum, default_value_t = Backend::Auto)]
    backend: Backend,

    /// Report interval in frames
    #[arg(short, long, default_value_t = 60)]
    report_interval: u64,

    /// Write the final frame to this PNG
    #[arg(short, long, default_value = "paper_burn.png")]
    output: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Backend {
    Auto,
    Cpu,
    Gpu,
}

impl From<Backend> for BackendPreference {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Auto => BackendPreference::Auto,
            Backend::Cpu => BackendPreference::Cpu,
            Backend::Gpu => BackendPreference::Gpu,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    println!("=== Paper Burn Demo ===\n");

    let mut config = SimConfig::new(args.width, args.height).with_backend(args.backend.into());
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config.steps_per_frame = args.steps_per_frame;

    let mut sim = PaperSimulation::new(config)?;
    println!(
        "Created {}x{} sheet (sheet seed {}, GPU: {})",
        args.width,
        args.height,
        sim.sheet_seed(),
        sim.is_gpu_accelerated()
    );
    println!(
        "Spark at ({:.2}, {:.2}) for {} frames, drag {:.2}\n",
        args.spark_x, args.spark_y, args.hold_frames, args.drag
    );

    println!(" Frame | Unburned | Scorched | Burning | Charred |  Spent | Consumed | ms/frame");
    println!("-------|----------|----------|---------|---------|--------|----------|---------");

    let report_interval = args.report_interval.max(1);
    for frame in 0..args.frames {
        if frame < args.hold_frames {
            let progress = frame as f32 / args.hold_frames as f32;
            let x = args.spark_x + args.drag * progress;
            if frame == 0 {
                sim.pointer_down(x, args.spark_y)?;
            } else {
                sim.pointer_move(x, args.spark_y)?;
            }
        } else if frame == args.hold_frames {
            sim.pointer_up();
        }

        sim.frame()?;

        if (frame + 1) % report_interval == 0 || frame + 1 == args.frames {
            let stats = sim.stats()?;
            println!(
                "{:6} | {:8} | {:8} | {:7} | {:7} | {:6} | {:7.2}% | {:8.2}",
                sim.frame_index(),
                stats.unburned,
                stats.scorched,
                stats.burning,
                stats.charred,
                stats.spent,
                stats.consumed_fraction() * 100.0,
                sim.average_frame_time_ms()
            );
            if frame >= args.hold_frames && stats.is_quiescent() {
                info!("Fire went out after {} frames", sim.frame_index());
                break;
            }
        }
    }

    let stats = sim.stats()?;
    println!("\n=== Simulation Complete ===");
    println!("Frames run: {}", sim.frame_index());
    println!("Fuel consumed: {:.2}%", stats.consumed_fraction() * 100.0);
    println!("Cells still burning: {}", stats.burning);

    let image = sim.image();
    let buffer = image::RgbaImage::from_raw(
        u32::try_from(image.width())?,
        u32::try_from(image.height())?,
        image.as_bytes().to_vec(),
    );
    match buffer {
        Some(buffer) => {
            buffer.save(&args.output)?;
            println!("Saved final frame to {}", args.output.display());
        }
        None => warn!("Rendered image does not match its dimensions, nothing saved"),
    }

    Ok(())
}
