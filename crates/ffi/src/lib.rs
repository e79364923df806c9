//! C ABI for the paper burn simulation.
//!
//! Every entry point returns a [`PaperBurnErrorCode`]; on failure the message
//! is available from `paper_burn_get_last_error` on the calling thread.
//! Instances are opaque and owned by the caller between `paper_burn_new` and
//! `paper_burn_destroy`.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{paper_burn_get_last_error, paper_burn_get_last_error_code, PaperBurnErrorCode};
pub use instance::{
    paper_burn_default_config, paper_burn_destroy, paper_burn_new, PaperBurnBackend,
    PaperBurnConfig, PaperBurnInstance,
};
pub use queries::{
    paper_burn_get_dimensions, paper_burn_get_stats, paper_burn_read_cells,
    paper_burn_write_cells, PaperBurnCell, PaperBurnStats,
};
pub use simulation::{
    paper_burn_frame, paper_burn_pointer_down, paper_burn_pointer_move, paper_burn_pointer_up,
    paper_burn_reset, paper_burn_resize, paper_burn_step,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    fn cpu_config(width: u32, height: u32) -> PaperBurnConfig {
        PaperBurnConfig {
            seed: 42,
            use_seed: true,
            backend: PaperBurnBackend::Cpu,
            ..paper_burn_default_config(width, height)
        }
    }

    fn create(config: PaperBurnConfig) -> *mut PaperBurnInstance {
        let mut sim = ptr::null_mut();
        let code = unsafe { paper_burn_new(config, &mut sim) };
        assert_eq!(code, PaperBurnErrorCode::Ok);
        assert!(!sim.is_null());
        sim
    }

    fn last_error() -> String {
        let msg = paper_burn_get_last_error();
        assert!(!msg.is_null());
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }

    #[test]
    fn test_create_and_destroy() {
        let sim = create(cpu_config(16, 12));
        let (mut width, mut height) = (0, 0);
        let code = unsafe { paper_burn_get_dimensions(sim, &mut width, &mut height) };
        assert_eq!(code, PaperBurnErrorCode::Ok);
        assert_eq!((width, height), (16, 12));
        unsafe { paper_burn_destroy(sim) };
    }

    #[test]
    fn test_destroy_null_is_noop() {
        unsafe { paper_burn_destroy(ptr::null_mut()) };
    }

    #[test]
    fn test_invalid_dimensions_report_error() {
        let mut sim = ptr::null_mut();
        let code = unsafe { paper_burn_new(cpu_config(0, 8), &mut sim) };
        assert_eq!(code, PaperBurnErrorCode::InvalidDimensions);
        assert!(sim.is_null());
        assert_eq!(paper_burn_get_last_error_code(), PaperBurnErrorCode::InvalidDimensions);
        assert!(!last_error().is_empty());
    }

    #[test]
    fn test_zero_steps_per_frame_rejected() {
        let mut sim = ptr::null_mut();
        let config = PaperBurnConfig {
            steps_per_frame: 0,
            ..cpu_config(8, 8)
        };
        let code = unsafe { paper_burn_new(config, &mut sim) };
        assert_eq!(code, PaperBurnErrorCode::InvalidParameter);
        assert!(sim.is_null());
    }

    #[test]
    fn test_null_instance_reports_null_pointer() {
        let code = unsafe { paper_burn_pointer_up(ptr::null()) };
        assert_eq!(code, PaperBurnErrorCode::NullPointer);
        assert!(last_error().contains("ptr"));
    }

    #[test]
    fn test_frame_copies_rgba() {
        let sim = create(cpu_config(8, 4));
        let mut rgba = vec![0u8; 8 * 4 * 4];
        let code = unsafe { paper_burn_frame(sim, rgba.as_mut_ptr(), rgba.len()) };
        assert_eq!(code, PaperBurnErrorCode::Ok);
        // Cold paper is opaque
        assert!(rgba.chunks_exact(4).all(|px| px[3] == 255));

        let code = unsafe { paper_burn_frame(sim, rgba.as_mut_ptr(), rgba.len() - 1) };
        assert_eq!(code, PaperBurnErrorCode::BufferSizeMismatch);
        assert!(last_error().contains("out_rgba"));

        let code = unsafe { paper_burn_frame(sim, ptr::null_mut(), 0) };
        assert_eq!(code, PaperBurnErrorCode::Ok);
        unsafe { paper_burn_destroy(sim) };
    }

    #[test]
    fn test_wrong_frame_buffer_does_not_advance() {
        let sim = create(cpu_config(8, 4));
        let mut rgba = vec![0u8; 8 * 4 * 4 + 4];
        let code = unsafe { paper_burn_frame(sim, rgba.as_mut_ptr(), rgba.len()) };
        assert_eq!(code, PaperBurnErrorCode::BufferSizeMismatch);
        // Nothing was written either
        assert!(rgba.iter().all(|&b| b == 0));

        let mut stats = std::mem::MaybeUninit::<PaperBurnStats>::uninit();
        let code = unsafe { paper_burn_get_stats(sim, stats.as_mut_ptr()) };
        assert_eq!(code, PaperBurnErrorCode::Ok);
        assert_eq!(unsafe { stats.assume_init() }.frame_index, 0);
        unsafe { paper_burn_destroy(sim) };
    }

    #[test]
    fn test_pointer_heats_sheet() {
        let sim = create(cpu_config(32, 32));
        unsafe {
            assert_eq!(paper_burn_pointer_down(sim, 0.5, 0.5), PaperBurnErrorCode::Ok);
            assert_eq!(paper_burn_step(sim, 5), PaperBurnErrorCode::Ok);
            assert_eq!(paper_burn_pointer_up(sim), PaperBurnErrorCode::Ok);
        }

        let mut cells = vec![PaperBurnCell::default(); 32 * 32];
        let code = unsafe { paper_burn_read_cells(sim, cells.as_mut_ptr(), cells.len()) };
        assert_eq!(code, PaperBurnErrorCode::Ok);
        assert!(cells.iter().any(|c| c.temperature > 0.0));
        unsafe { paper_burn_destroy(sim) };
    }

    #[test]
    fn test_non_finite_pointer_rejected() {
        let sim = create(cpu_config(8, 8));
        let code = unsafe { paper_burn_pointer_move(sim, f32::NAN, 0.5) };
        assert_eq!(code, PaperBurnErrorCode::InvalidParameter);
        let code = unsafe { paper_burn_pointer_down(sim, 0.5, f32::INFINITY) };
        assert_eq!(code, PaperBurnErrorCode::InvalidParameter);
        assert!(last_error().contains("pointer"));

        // The rejected press left the sheet cold and finite
        assert_eq!(unsafe { paper_burn_step(sim, 4) }, PaperBurnErrorCode::Ok);
        let mut cells = vec![PaperBurnCell::default(); 64];
        unsafe { paper_burn_read_cells(sim, cells.as_mut_ptr(), cells.len()) };
        assert!(cells.iter().all(|c| c.temperature == 0.0));
        unsafe { paper_burn_destroy(sim) };
    }

    #[test]
    fn test_write_then_read_cells() {
        let sim = create(cpu_config(4, 4));
        let cells = vec![
            PaperBurnCell {
                fuel: 0.5,
                temperature: 0.0,
                reference_fuel: 0.5,
            };
            16
        ];
        let code = unsafe { paper_burn_write_cells(sim, cells.as_ptr(), cells.len()) };
        assert_eq!(code, PaperBurnErrorCode::Ok);

        let mut out = vec![PaperBurnCell::default(); 16];
        unsafe { paper_burn_read_cells(sim, out.as_mut_ptr(), out.len()) };
        assert_eq!(out, cells);

        let code = unsafe { paper_burn_write_cells(sim, cells.as_ptr(), 3) };
        assert_eq!(code, PaperBurnErrorCode::BufferSizeMismatch);
        unsafe { paper_burn_destroy(sim) };
    }

    #[test]
    fn test_out_of_range_cells_rejected() {
        let sim = create(cpu_config(2, 2));
        let mut cells = vec![
            PaperBurnCell {
                fuel: 0.25,
                temperature: 0.0,
                reference_fuel: 0.25,
            };
            4
        ];
        cells[3] = PaperBurnCell {
            fuel: 1.0,
            temperature: 600.0,
            reference_fuel: 0.25,
        };
        let code = unsafe { paper_burn_write_cells(sim, cells.as_ptr(), cells.len()) };
        assert_eq!(code, PaperBurnErrorCode::InvalidParameter);
        assert!(last_error().contains("cells"));

        cells[3].temperature = f32::NAN;
        cells[3].fuel = 0.25;
        let code = unsafe { paper_burn_write_cells(sim, cells.as_ptr(), cells.len()) };
        assert_eq!(code, PaperBurnErrorCode::InvalidParameter);
        unsafe { paper_burn_destroy(sim) };
    }

    #[test]
    fn test_stats_reset_and_resize() {
        let sim = create(cpu_config(8, 8));
        let mut rgba = vec![0u8; 8 * 8 * 4];
        unsafe { paper_burn_frame(sim, rgba.as_mut_ptr(), rgba.len()) };

        let mut stats = std::mem::MaybeUninit::<PaperBurnStats>::uninit();
        let code = unsafe { paper_burn_get_stats(sim, stats.as_mut_ptr()) };
        assert_eq!(code, PaperBurnErrorCode::Ok);
        let stats = unsafe { stats.assume_init() };
        assert_eq!(stats.frame_index, 1);
        assert_eq!(stats.unburned + stats.scorched, 64);
        assert!(!stats.gpu_accelerated);

        assert_eq!(unsafe { paper_burn_reset(sim) }, PaperBurnErrorCode::Ok);
        assert_eq!(unsafe { paper_burn_resize(sim, 10, 6) }, PaperBurnErrorCode::Ok);
        let (mut width, mut height) = (0, 0);
        unsafe { paper_burn_get_dimensions(sim, &mut width, &mut height) };
        assert_eq!((width, height), (10, 6));

        assert_eq!(
            unsafe { paper_burn_resize(sim, 0, 6) },
            PaperBurnErrorCode::InvalidDimensions
        );
        unsafe { paper_burn_destroy(sim) };
    }
}
