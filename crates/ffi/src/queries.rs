use paper_burn_core::{BurnStats, Cell};

use crate::error::{DefaultPaperBurnError, PaperBurnErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_paper_sim, with_paper_sim_mut};
use crate::instance::PaperBurnInstance;

#[repr(C)]
/// FFI-friendly snapshot of whole-sheet burn statistics.
/// Keep this layout stable for C/C++/C# consumers.
pub struct PaperBurnStats {
    /// Cells that have lost no fuel and are cold.
    pub unburned: u32,
    /// Cells that have lost no fuel but are heated.
    pub scorched: u32,
    /// Cells above the ignition threshold that have lost fuel.
    pub burning: u32,
    /// Cells that have lost fuel, still hold some and have cooled.
    pub charred: u32,
    /// Extinguished cells.
    pub spent: u32,
    /// Fraction of the initial fuel consumed (0.0 - 1.0).
    pub consumed_fraction: f32,
    /// Frames rendered since creation, reset or resize.
    pub frame_index: u64,
    /// Smoothed wall time per frame in milliseconds.
    pub average_frame_time_ms: f32,
    /// Whether the GPU backend is in use.
    pub gpu_accelerated: bool,
}

impl From<(&BurnStats, u64, f64, bool)> for PaperBurnStats {
    #[allow(clippy::cast_possible_truncation)]
    fn from((stats, frame_index, average_ms, gpu): (&BurnStats, u64, f64, bool)) -> Self {
        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        Self {
            unburned: count(stats.unburned),
            scorched: count(stats.scorched),
            burning: count(stats.burning),
            charred: count(stats.charred),
            spent: count(stats.spent),
            consumed_fraction: stats.consumed_fraction() as f32,
            frame_index,
            average_frame_time_ms: average_ms as f32,
            gpu_accelerated: gpu,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// One grid cell as seen across the FFI boundary.
pub struct PaperBurnCell {
    /// Remaining fuel.
    pub fuel: f32,
    /// Temperature.
    pub temperature: f32,
    /// Fuel at initialization; never changes while burning.
    pub reference_fuel: f32,
}

impl From<&Cell> for PaperBurnCell {
    fn from(cell: &Cell) -> Self {
        Self {
            fuel: cell.fuel,
            temperature: cell.temperature,
            reference_fuel: cell.reference_fuel,
        }
    }
}

impl From<&PaperBurnCell> for Cell {
    fn from(cell: &PaperBurnCell) -> Self {
        Cell::new(cell.fuel, cell.temperature, cell.reference_fuel)
    }
}

#[no_mangle]
/// Fill `out_stats` with a snapshot of the current sheet.
///
/// Thread-safe: Acquires `RwLock` read lock on simulation state.
///
/// Returns
/// - `Ok` (0) on success
/// - `NullPointer` if `ptr` or `out_stats` is null
/// - `LockPoisoned` if the internal lock is poisoned
/// - `ReadbackFailed` if the GPU grid could not be read
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `paper_burn_new` or null.
/// - `out_stats` must be a valid pointer to writable memory or null.
pub unsafe extern "C" fn paper_burn_get_stats(
    ptr: *const PaperBurnInstance,
    out_stats: *mut PaperBurnStats,
) -> PaperBurnErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let stats = with_paper_sim(instance, |sim| {
            sim.stats().map(|stats| {
                PaperBurnStats::from((
                    &stats,
                    sim.frame_index(),
                    sim.average_frame_time_ms(),
                    sim.is_gpu_accelerated(),
                ))
            })
        })??;
        unsafe {
            out_stats.write(stats);
        }
        Ok(())
    })
}

#[no_mangle]
/// Write the grid dimensions into `out_width` and `out_height`.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `paper_burn_new` or null.
/// - `out_width` and `out_height` must be valid pointers to writable memory.
pub unsafe extern "C" fn paper_burn_get_dimensions(
    ptr: *const PaperBurnInstance,
    out_width: *mut u32,
    out_height: *mut u32,
) -> PaperBurnErrorCode {
    if out_width.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_width"));
    }
    if out_height.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_height"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let (width, height) = with_paper_sim(instance, |sim| {
            let (width, height) = sim.dimensions();
            (
                u32::try_from(width).unwrap_or(u32::MAX),
                u32::try_from(height).unwrap_or(u32::MAX),
            )
        })?;
        unsafe {
            *out_width = width;
            *out_height = height;
        }
        Ok(())
    })
}

#[no_mangle]
/// Copy the current grid into `out_cells`, row-major with row 0 at the bottom.
///
/// `len` must equal `width * height`.
///
/// Returns
/// - `Ok` (0) on success
/// - `NullPointer` if `ptr` or `out_cells` is null
/// - `BufferSizeMismatch` if `len` does not match the grid
/// - `ReadbackFailed` if the GPU grid could not be read
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `paper_burn_new` or null.
/// - `out_cells` must point to `len` writable `PaperBurnCell` values.
pub unsafe extern "C" fn paper_burn_read_cells(
    ptr: *const PaperBurnInstance,
    out_cells: *mut PaperBurnCell,
    len: usize,
) -> PaperBurnErrorCode {
    if out_cells.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_cells"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_paper_sim(instance, |sim| -> Result<(), DefaultPaperBurnError> {
            let cells = sim.cells()?;
            if cells.len() != len {
                return Err(DefaultPaperBurnError::buffer_size("out_cells", cells.len(), len));
            }
            // SAFETY: caller guarantees `out_cells` points to `len` elements
            let out = unsafe { std::slice::from_raw_parts_mut(out_cells, len) };
            for (dst, src) in out.iter_mut().zip(cells.iter()) {
                *dst = PaperBurnCell::from(src);
            }
            Ok(())
        })?
    })
}

#[no_mangle]
/// Replace the grid with `len` cells from `cells`.
///
/// Returns
/// - `Ok` (0) on success
/// - `NullPointer` if `ptr` or `cells` is null
/// - `BufferSizeMismatch` if `len` does not match the grid
/// - `InvalidParameter` if a cell is non-finite, has negative temperature, or
///   does not satisfy `0 <= fuel <= reference_fuel <= 1`
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `paper_burn_new` or null.
/// - `cells` must point to `len` readable `PaperBurnCell` values.
pub unsafe extern "C" fn paper_burn_write_cells(
    ptr: *const PaperBurnInstance,
    cells: *const PaperBurnCell,
    len: usize,
) -> PaperBurnErrorCode {
    if cells.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("cells"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        // SAFETY: caller guarantees `cells` points to `len` elements
        let input = unsafe { std::slice::from_raw_parts(cells, len) };
        let converted: Vec<Cell> = input.iter().map(Cell::from).collect();
        with_paper_sim_mut(instance, |sim| sim.write_cells(&converted))??;
        Ok(())
    })
}
