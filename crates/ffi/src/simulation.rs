use crate::error::{DefaultPaperBurnError, PaperBurnErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_paper_sim_mut};
use crate::instance::PaperBurnInstance;

/// Advance one frame and copy the rendered image into `out_rgba`.
///
/// The image is `width * height` RGBA8 pixels, row 0 at the top. Pass a null
/// `out_rgba` to advance without copying. A non-null `out_rgba` whose `len`
/// is not `width * height * 4` is rejected before the simulation advances.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `paper_burn_new`.
/// - `out_rgba` must be null or point to `len` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_frame(
    ptr: *const PaperBurnInstance,
    out_rgba: *mut u8,
    len: usize,
) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_paper_sim_mut(instance, |sim| -> Result<(), DefaultPaperBurnError> {
            let (width, height) = sim.dimensions();
            let expected = width * height * 4;
            if !out_rgba.is_null() && len != expected {
                return Err(DefaultPaperBurnError::buffer_size("out_rgba", expected, len));
            }
            let image = sim.frame()?;
            if out_rgba.is_null() {
                return Ok(());
            }
            let bytes = image.as_bytes();
            // SAFETY: caller guarantees `out_rgba` points to `len` writable bytes
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), out_rgba, len);
            }
            Ok(())
        })?
    })
}

/// Advance `count` kernel passes without rendering.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `paper_burn_new`.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_step(ptr: *const PaperBurnInstance, count: u32) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_paper_sim_mut(instance, |sim| sim.step_n(count as usize))
    })
}

/// Press the pointer at normalized `(x, y)`, origin bottom-left.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `paper_burn_new`.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_pointer_down(
    ptr: *const PaperBurnInstance,
    x: f32,
    y: f32,
) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_paper_sim_mut(instance, |sim| sim.pointer_down(x, y))??;
        Ok(())
    })
}

/// Move the pointer to normalized `(x, y)`; heats only while pressed.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `paper_burn_new`.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_pointer_move(
    ptr: *const PaperBurnInstance,
    x: f32,
    y: f32,
) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_paper_sim_mut(instance, |sim| sim.pointer_move(x, y))??;
        Ok(())
    })
}

/// Release the pointer.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `paper_burn_new`.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_pointer_up(ptr: *const PaperBurnInstance) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_paper_sim_mut(instance, |sim| sim.pointer_up())
    })
}

/// Start over with a fresh sheet at the same size.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `paper_burn_new`.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_reset(ptr: *const PaperBurnInstance) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_paper_sim_mut(instance, |sim| sim.reset())??;
        Ok(())
    })
}

/// Re-create the grid at a new size with a fresh sheet.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `paper_burn_new`.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_resize(
    ptr: *const PaperBurnInstance,
    width: u32,
    height: u32,
) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_paper_sim_mut(instance, |sim| sim.resize(width as usize, height as usize))??;
        Ok(())
    })
}
