use crate::error::{with_last_error_mut, FireRiskError, FireRiskErrorCode};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `FireRiskError` trait.
pub(crate) fn set_last_error(error: &impl FireRiskError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FireRiskError) -> FireRiskErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the outcome of a fallible operation.
///
/// Success clears the thread-local error; failure stores it and yields its code.
pub(crate) fn track_result<T, E>(result: Result<T, E>) -> Result<T, FireRiskErrorCode>
where
    E: FireRiskError,
{
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireRiskErrorCode::Ok;
    });
}
