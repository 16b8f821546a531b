use fire_risk_core::RiskError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FireRiskError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FireRiskErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FireRiskError` for the failures the C ABI can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFireRiskError {
    code: FireRiskErrorCode,
    msg: String,
}

impl DefaultFireRiskError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"input"`, `"out_output"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireRiskErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }
}

impl From<RiskError> for DefaultFireRiskError {
    fn from(error: RiskError) -> Self {
        let code = match error {
            RiskError::InvalidInput { .. } => FireRiskErrorCode::InvalidInput,
            RiskError::ModelUnavailable(_) => FireRiskErrorCode::ModelUnavailable,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl FireRiskError for DefaultFireRiskError {
    fn code(&self) -> FireRiskErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by fire risk functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRiskErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// An input field was malformed or out of range. Nothing was computed.
    InvalidInput = 2,

    /// The fire-event model could not be loaded or failed to predict.
    ModelUnavailable = 3,
}

impl From<DefaultFireRiskError> for FireRiskErrorCode {
    fn from(error: DefaultFireRiskError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to keep the pointer handed to C alive.
    static LAST_ERROR: RefCell<(Option<CString>, FireRiskErrorCode)> = const { RefCell::new((None, FireRiskErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireRiskErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireRiskErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or the message cannot be converted to a C string.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread has its own independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// FireRiskOutput out;
/// if (fire_risk_evaluate(&input, &out) != Ok) {
///     const char* error = fire_risk_get_last_error();
///     if (error) {
///         fprintf(stderr, "Fire risk evaluation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_risk_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns:
/// - `FireRiskErrorCode::Ok` (0) if the last call on this thread succeeded
/// - The specific error code from the last failed operation
#[no_mangle]
pub extern "C" fn fire_risk_get_last_error_code() -> FireRiskErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
