use paper_burn_core::SimError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait PaperBurnError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> PaperBurnErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `PaperBurnError` for common FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultPaperBurnError {
    code: PaperBurnErrorCode,
    msg: String,
}

impl DefaultPaperBurnError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: PaperBurnErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: PaperBurnErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for a caller buffer of the wrong length.
    ///
    /// # Arguments
    /// * `param_name` - The buffer parameter (e.g., `"out_rgba"`)
    /// * `expected` - Required number of elements
    /// * `actual` - Number of elements the caller passed
    pub fn buffer_size(param_name: &str, expected: usize, actual: usize) -> Self {
        Self {
            code: PaperBurnErrorCode::BufferSizeMismatch,
            msg: format!("Buffer '{param_name}' holds {actual} elements, expected {expected}"),
        }
    }
}

impl From<SimError> for DefaultPaperBurnError {
    fn from(error: SimError) -> Self {
        let code = match error {
            SimError::InvalidDimensions { .. } => PaperBurnErrorCode::InvalidDimensions,
            SimError::InvalidParameter { .. } => PaperBurnErrorCode::InvalidParameter,
            SimError::BufferSizeMismatch { .. } => PaperBurnErrorCode::BufferSizeMismatch,
            SimError::GpuUnavailable(_) => PaperBurnErrorCode::GpuUnavailable,
            SimError::ReadbackFailed(_) => PaperBurnErrorCode::ReadbackFailed,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl PaperBurnError for DefaultPaperBurnError {
    fn code(&self) -> PaperBurnErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by paper burn functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperBurnErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Grid width or height is zero or too large.
    InvalidDimensions = 3,

    /// A tuning parameter is out of range.
    InvalidParameter = 4,

    /// A caller-supplied buffer does not match the grid size.
    BufferSizeMismatch = 5,

    /// The GPU backend was requested but is not available.
    GpuUnavailable = 6,

    /// Grid or image data could not be read back from the GPU.
    ReadbackFailed = 7,
}

impl From<DefaultPaperBurnError> for PaperBurnErrorCode {
    fn from(error: DefaultPaperBurnError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, PaperBurnErrorCode)> = const { RefCell::new((None, PaperBurnErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, PaperBurnErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, PaperBurnErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread sees its own errors.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// PaperBurnInstance* sim = NULL;
/// PaperBurnErrorCode err = paper_burn_new(config, &sim);
/// if (err != Ok) {
///     const char* error = paper_burn_get_last_error();
///     if (error) {
///         printf("Paper burn creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn paper_burn_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `Ok` (0) if no error has occurred on this thread since the last
/// successful call.
#[no_mangle]
pub extern "C" fn paper_burn_get_last_error_code() -> PaperBurnErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
