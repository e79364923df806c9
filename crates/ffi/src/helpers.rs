use crate::error::{
    with_last_error_mut, DefaultPaperBurnError, PaperBurnError, PaperBurnErrorCode,
};
use crate::instance::PaperBurnInstance;
use paper_burn_core::PaperSimulation;
use std::ffi::CString;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl PaperBurnError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = PaperBurnErrorCode::Ok;
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl PaperBurnError) -> PaperBurnErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the outcome of `result`, converting failures to their code.
pub(crate) fn track_result<T, E: PaperBurnError>(result: Result<T, E>) -> Result<T, PaperBurnErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run `func` and collapse its result into an error code.
pub(crate) fn handle_ffi_result_error<F>(func: F) -> PaperBurnErrorCode
where
    F: FnOnce() -> Result<(), DefaultPaperBurnError>,
{
    match track_result(func()) {
        Ok(()) => PaperBurnErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow an instance from a caller pointer.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const PaperBurnInstance,
) -> Result<&'a PaperBurnInstance, DefaultPaperBurnError> {
    // SAFETY: callers promise `ptr` is null or came from `paper_burn_new` and
    // has not been destroyed.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultPaperBurnError::null_pointer("ptr"))
}

/// Run `func` with shared access to the simulation.
pub(crate) fn with_paper_sim<F, T>(
    instance: &PaperBurnInstance,
    func: F,
) -> Result<T, DefaultPaperBurnError>
where
    F: FnOnce(&PaperSimulation) -> T,
{
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultPaperBurnError::lock_poisoned("RwLock"))?;
    Ok(func(&sim))
}

/// Run `func` with exclusive access to the simulation.
pub(crate) fn with_paper_sim_mut<F, T>(
    instance: &PaperBurnInstance,
    func: F,
) -> Result<T, DefaultPaperBurnError>
where
    F: FnOnce(&mut PaperSimulation) -> T,
{
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultPaperBurnError::lock_poisoned("RwLock"))?;
    Ok(func(&mut sim))
}
