//! Windowed paper burn: hold the left mouse button to set the sheet alight.
//!
//! Keys: R resets the sheet, Escape quits.

use clap::Parser;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use paper_burn_core::{PaperSimulation, SimConfig, SimError};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "paper-burn-window")]
#[command(about = "Burn a sheet of paper with the mouse", long_about = None)]
struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = 800)]
    width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Kernel passes per frame
    #[arg(short, long, default_value_t = 1)]
    steps_per_frame: u32,

    /// Noise seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Run on the CPU even if a GPU is available
    #[arg(long)]
    cpu: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = SimConfig::new(args.width, args.height);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.cpu {
        config = config.with_backend(paper_burn_core::BackendPreference::Cpu);
    }
    config.steps_per_frame = args.steps_per_frame;

    let mut sim = PaperSimulation::new(config)?;
    let mut window = Window::new(
        "Paper Burn - hold left mouse, R to reset, Esc to quit",
        args.width,
        args.height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    let mut was_down = false;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            sim.reset()?;
        }

        feed_pointer(&window, &mut sim, &mut was_down)?;

        let (width, height) = sim.dimensions();
        let pixels = sim.frame()?.to_argb_u32();
        window.update_with_buffer(&pixels, width, height)?;

        if sim.frame_index() % 300 == 0 {
            let stats = sim.stats()?;
            info!(
                "frame {}: {} burning, {:.1}% consumed, {:.2} ms/frame",
                sim.frame_index(),
                stats.burning,
                stats.consumed_fraction() * 100.0,
                sim.average_frame_time_ms()
            );
        }
    }

    Ok(())
}

/// Translate the mouse into pointer events with a bottom-left origin.
fn feed_pointer(
    window: &Window,
    sim: &mut PaperSimulation,
    was_down: &mut bool,
) -> Result<(), SimError> {
    let down = window.get_mouse_down(MouseButton::Left);
    let Some((mx, my)) = window.get_mouse_pos(MouseMode::Clamp) else {
        if *was_down && !down {
            sim.pointer_up();
            *was_down = false;
        }
        return Ok(());
    };

    let (width, height) = window.get_size();
    let x = mx / width.max(1) as f32;
    let y = 1.0 - my / height.max(1) as f32;

    match (down, *was_down) {
        (true, false) => sim.pointer_down(x, y)?,
        (false, true) => sim.pointer_up(),
        _ => sim.pointer_move(x, y)?,
    }
    *was_down = down;
    Ok(())
}
