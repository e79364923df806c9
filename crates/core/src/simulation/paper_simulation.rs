//! Frame driver for the paper burn
//!
//! `PaperSimulation` owns the solver, the pointer state and the rendered
//! image. Each call to [`PaperSimulation::frame`] samples the pointer once,
//! runs the configured number of kernel passes and colours the result.

use super::stats::BurnStats;
use crate::config::{validate_dimensions, SimConfig};
use crate::core_types::{Cell, FrameImage, PointerSample, Spark};
use crate::error::SimError;
use crate::solver::{create_burn_solver, BurnSolver, CellField, FrameTimer, PaperGenerator, ProfilerScope};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::borrow::Cow;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Paper burn simulation driven one displayed frame at a time
pub struct PaperSimulation {
    config: SimConfig,
    solver: Box<dyn BurnSolver>,
    image: FrameImage,
    pointer: PointerSample,

    /// Source of per-sheet seeds, seeded from `config.seed`
    rng: StdRng,
    sheet_seed: u64,

    frame_index: u64,
    timer: FrameTimer,
}

impl PaperSimulation {
    /// Create a simulation with a freshly generated sheet
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the GPU backend
    /// was explicitly requested and is not available.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let sheet_seed = rng.random();

        let sheet = generate_sheet(&config, sheet_seed)?;
        let solver = create_burn_solver(&config, sheet)?;

        info!(
            "Paper simulation initialized: {}x{} grid, seed={}, GPU={}",
            config.width,
            config.height,
            seed,
            solver.is_gpu_accelerated()
        );

        Ok(Self::from_solver(config, solver, rng, sheet_seed))
    }

    /// Create a simulation over an existing sheet
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the sheet does not
    /// match `config.width * config.height`, a cell is out of range, or the
    /// requested backend is unavailable.
    pub fn with_cells(config: SimConfig, cells: Vec<Cell>) -> Result<Self, SimError> {
        config.validate()?;
        let sheet = CellField::from_cells(config.width, config.height, cells)?;
        let solver = create_burn_solver(&config, sheet)?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self::from_solver(config, solver, StdRng::seed_from_u64(seed), seed))
    }

    fn from_solver(
        config: SimConfig,
        solver: Box<dyn BurnSolver>,
        rng: StdRng,
        sheet_seed: u64,
    ) -> Self {
        Self {
            image: FrameImage::new(config.width, config.height),
            config,
            solver,
            pointer: PointerSample::default(),
            rng,
            sheet_seed,
            frame_index: 0,
            timer: FrameTimer::new(),
        }
    }

    /// Advance and render one displayed frame
    ///
    /// The pointer is sampled once; every kernel pass of this frame sees the
    /// same spark.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ReadbackFailed`] if the rendered image could not
    /// be read back from the GPU. The kernel passes have still run and the
    /// frame is counted; the previous image is kept.
    pub fn frame(&mut self) -> Result<&FrameImage, SimError> {
        let start = Instant::now();
        let spark = self.sample_spark();
        {
            let _scope = ProfilerScope::new("burn_steps");
            for _ in 0..self.config.steps_per_frame {
                self.solver.step(spark);
            }
        }
        self.frame_index += 1;
        {
            let _scope = ProfilerScope::new("flame_render");
            self.solver.render(&mut self.image)?;
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.timer.record(elapsed_ms);

        debug!(
            frame = self.frame_index,
            spark = spark.is_active(),
            elapsed_ms,
            "Frame complete"
        );
        Ok(&self.image)
    }

    /// Advance `count` kernel passes without rendering
    pub fn step_n(&mut self, count: usize) {
        let spark = self.sample_spark();
        for _ in 0..count {
            self.solver.step(spark);
        }
    }

    /// Pointer pressed at normalized `(x, y)`, origin bottom-left
    ///
    /// Coordinates outside `[0, 1]` are clamped to the sheet edge.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for a non-finite coordinate.
    /// The pointer is left unchanged.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<(), SimError> {
        let (x, y) = clamp_pointer(x, y)?;
        self.pointer = PointerSample { active: true, x, y };
        Ok(())
    }

    /// Pointer moved; heats only while pressed
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for a non-finite coordinate.
    /// The pointer is left unchanged.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<(), SimError> {
        let (x, y) = clamp_pointer(x, y)?;
        self.pointer.x = x;
        self.pointer.y = y;
        Ok(())
    }

    /// Pointer released
    pub fn pointer_up(&mut self) {
        self.pointer.active = false;
    }

    /// Apply a whole pointer sample at once
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for a non-finite coordinate.
    pub fn set_pointer(&mut self, sample: PointerSample) -> Result<(), SimError> {
        if sample.active {
            self.pointer_down(sample.x, sample.y)
        } else {
            self.pointer_move(sample.x, sample.y)?;
            self.pointer_up();
            Ok(())
        }
    }

    /// Current pointer state
    pub fn pointer(&self) -> PointerSample {
        self.pointer
    }

    /// Start over with a new sheet at the same size
    ///
    /// # Errors
    ///
    /// Propagates sheet generation and upload failures.
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.sheet_seed = self.rng.random();
        let sheet = generate_sheet(&self.config, self.sheet_seed)?;
        self.solver.write_cells(sheet.as_slice())?;
        self.frame_index = 0;
        info!("Paper simulation reset with sheet seed {}", self.sheet_seed);
        Ok(())
    }

    /// Re-create the grid at a new size with a new sheet
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDimensions`] for a zero or oversized grid.
    /// The simulation is left unchanged on error.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), SimError> {
        validate_dimensions(width, height)?;
        if (width, height) == self.dimensions() {
            return Ok(());
        }

        let mut config = self.config.clone();
        config.width = width;
        config.height = height;
        let sheet_seed = self.rng.random();
        let sheet = generate_sheet(&config, sheet_seed)?;
        self.solver = create_burn_solver(&config, sheet)?;

        self.config = config;
        self.sheet_seed = sheet_seed;
        self.image.resize(width, height);
        self.frame_index = 0;
        info!("Paper simulation resized to {}x{}", width, height);
        Ok(())
    }

    /// Stage counts and fuel totals for the current front buffer
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ReadbackFailed`] if the cells could not be read
    /// back from the GPU.
    pub fn stats(&self) -> Result<BurnStats, SimError> {
        Ok(BurnStats::from_cells(&self.solver.read_cells()?, &self.config.burn))
    }

    /// Current front buffer, row-major with row 0 at the bottom
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ReadbackFailed`] if the cells could not be read
    /// back from the GPU.
    pub fn cells(&self) -> Result<Cow<'_, [Cell]>, SimError> {
        self.solver.read_cells()
    }

    /// Replace the current state
    ///
    /// # Errors
    ///
    /// Returns [`SimError::BufferSizeMismatch`] for a wrongly sized buffer and
    /// [`SimError::InvalidParameter`] for an out-of-range cell.
    pub fn write_cells(&mut self, cells: &[Cell]) -> Result<(), SimError> {
        self.solver.write_cells(cells)
    }

    /// Last rendered image
    pub fn image(&self) -> &FrameImage {
        &self.image
    }

    /// Grid dimensions `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        self.solver.dimensions()
    }

    /// Frames rendered since creation, reset or resize
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Wall time of the last frame
    pub fn last_frame_time_ms(&self) -> f64 {
        self.timer.last_frame_time_ms()
    }

    /// Smoothed wall time per frame
    pub fn average_frame_time_ms(&self) -> f64 {
        self.timer.average_frame_time_ms()
    }

    /// Seed of the current sheet's noise
    pub fn sheet_seed(&self) -> u64 {
        self.sheet_seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Check if GPU backend is being used
    pub fn is_gpu_accelerated(&self) -> bool {
        self.solver.is_gpu_accelerated()
    }

    fn sample_spark(&self) -> Spark {
        Spark::from_sample(self.pointer)
    }
}

fn clamp_pointer(x: f32, y: f32) -> Result<(f32, f32), SimError> {
    if x.is_finite() && y.is_finite() {
        return Ok((x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)));
    }
    warn!("Rejected non-finite pointer sample ({}, {})", x, y);
    Err(SimError::invalid_parameter(
        "pointer",
        format!("coordinates must be finite, got ({x}, {y})"),
    ))
}

fn generate_sheet(config: &SimConfig, sheet_seed: u64) -> Result<CellField, SimError> {
    let _scope = ProfilerScope::new("paper_generate");
    PaperGenerator::new(config.noise, sheet_seed).generate(config.width, config.height)
}
