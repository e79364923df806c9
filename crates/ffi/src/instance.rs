use paper_burn_core::{BackendPreference, PaperSimulation, SimConfig};
use std::ptr;
use std::sync::RwLock;

use crate::error::{DefaultPaperBurnError, PaperBurnErrorCode};
use crate::helpers::{track_error, track_result};

/// Backend selection for `PaperBurnConfig`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperBurnBackend {
    /// GPU when available, CPU otherwise.
    Auto = 0,
    /// Always run on the CPU.
    Cpu = 1,
    /// Require the GPU; creation fails without one.
    Gpu = 2,
}

impl From<PaperBurnBackend> for BackendPreference {
    fn from(backend: PaperBurnBackend) -> Self {
        match backend {
            PaperBurnBackend::Auto => BackendPreference::Auto,
            PaperBurnBackend::Cpu => BackendPreference::Cpu,
            PaperBurnBackend::Gpu => BackendPreference::Gpu,
        }
    }
}

/// Creation parameters for `paper_burn_new`.
///
/// Obtain defaults from `paper_burn_default_config` and override fields as
/// needed. Kernel constants always use their reference values.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PaperBurnConfig {
    /// Grid width in cells (usually the surface width in pixels).
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Noise seed, used only when `use_seed` is true.
    pub seed: u64,
    /// Whether `seed` is used; otherwise a random seed is drawn.
    pub use_seed: bool,
    /// Kernel passes per rendered frame, at least 1.
    pub steps_per_frame: u32,
    /// Backend selection.
    pub backend: PaperBurnBackend,
}

impl From<PaperBurnConfig> for SimConfig {
    fn from(config: PaperBurnConfig) -> Self {
        let mut sim_config = SimConfig::new(config.width as usize, config.height as usize);
        if config.use_seed {
            sim_config = sim_config.with_seed(config.seed);
        }
        sim_config.steps_per_frame = config.steps_per_frame;
        sim_config.with_backend(config.backend.into())
    }
}

/// The paper burn simulation context.
///
/// # Thread Safety
/// The internal simulation is protected by an `RwLock`, allowing:
/// - **Multiple concurrent readers** (stats, cell reads): `.read()` lock
/// - **Exclusive writer** (frames, pointer input, reset): `.write()` lock
///
/// # Usage
/// ```c
/// PaperBurnConfig config = paper_burn_default_config(800, 600);
/// PaperBurnInstance* sim = NULL;
/// if (paper_burn_new(config, &sim) != Ok) {
///     fprintf(stderr, "%s\n", paper_burn_get_last_error());
///     return;
/// }
///
/// uint8_t* rgba = malloc(800 * 600 * 4);
/// paper_burn_pointer_down(sim, 0.5f, 0.5f);
/// paper_burn_frame(sim, rgba, 800 * 600 * 4);
///
/// paper_burn_destroy(sim);
/// ```
pub struct PaperBurnInstance {
    pub(crate) sim: RwLock<PaperSimulation>,
}

impl PaperBurnInstance {
    /// Creates a new instance from a C configuration.
    ///
    /// # Errors
    ///
    /// Returns the core error mapped to its FFI code when the configuration
    /// is invalid or the requested backend is unavailable.
    pub(crate) fn new(config: PaperBurnConfig) -> Result<Box<Self>, DefaultPaperBurnError> {
        let sim = PaperSimulation::new(config.into())?;
        Ok(Box::new(Self {
            sim: RwLock::new(sim),
        }))
    }
}

/// Default configuration for a `width` x `height` sheet.
///
/// Random seed, one step per frame, automatic backend selection.
#[no_mangle]
pub extern "C" fn paper_burn_default_config(width: u32, height: u32) -> PaperBurnConfig {
    PaperBurnConfig {
        width,
        height,
        seed: 0,
        use_seed: false,
        steps_per_frame: 1,
        backend: PaperBurnBackend::Auto,
    }
}

/// Create a new paper burn instance and return it via out-parameter.
///
/// Returns
/// - `Ok` (0) - success, `out_instance` contains a valid pointer
/// - `NullPointer` - `out_instance` is null
/// - `InvalidDimensions` - width or height is zero or too large
/// - `InvalidParameter` - `steps_per_frame` is zero
/// - `GpuUnavailable` - `backend` is `Gpu` and no usable GPU was found
///
/// On failure `out_instance` is set to null and `paper_burn_get_last_error()`
/// describes the problem.
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned instance and MUST call
///   `paper_burn_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_new(
    config: PaperBurnConfig,
    out_instance: *mut *mut PaperBurnInstance,
) -> PaperBurnErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_instance"));
    }

    match track_result(PaperBurnInstance::new(config)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            PaperBurnErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `paper_burn_new`.
///
/// If `ptr` is null this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `paper_burn_new`.
/// - The pointer MUST NOT have been freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_destroy(ptr: *mut PaperBurnInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `paper_burn_new` and not freed yet.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
