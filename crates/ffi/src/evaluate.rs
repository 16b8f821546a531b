use fire_risk_core::{
    adjust_risk, preload_model, Celsius, Hectopascals, HourOfDay, MetersPerSecond, Millimeters,
    Month, Observation, Percent, RiskAssessment, RiskError, RiskEvaluator, RiskRequest,
    WindDirection,
};

use crate::error::{DefaultFireRiskError, FireRiskErrorCode};
use crate::helpers::{track_error, track_result};

/// One observation plus the recent-precipitation level, as entered by the user.
///
/// Categorical fields are plain integers so the struct can be filled from any
/// language: `month` 1-12, `hour` 0-23, `wind_direction` 0-7 (N, NE, E, SE,
/// S, SW, W, NW) and `recent_level` 0-5 (very dry .. saturated).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireRiskInput {
    /// Air temperature in °C
    pub temperature: f64,
    /// Rainfall today in mm
    pub rainfall: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Dew point in °C
    pub dew_point: f64,
    /// Station pressure in hPa
    pub pressure: f64,
    /// Month of the year (1-12)
    pub month: u8,
    /// Hour of the day (0-23)
    pub hour: u8,
    /// Wind direction code (0 = N, clockwise in 45° steps)
    pub wind_direction: u8,
    /// Recent-precipitation level (0 = driest)
    pub recent_level: u8,
}

impl Default for FireRiskInput {
    fn default() -> Self {
        let request = RiskRequest::default();
        let obs = request.observation;
        Self {
            temperature: *obs.temperature,
            rainfall: *obs.rainfall,
            wind_speed: *obs.wind_speed,
            humidity: *obs.humidity,
            dew_point: *obs.dew_point,
            pressure: *obs.pressure,
            month: obs.month.get(),
            hour: obs.hour.get(),
            wind_direction: obs.wind_direction.code(),
            recent_level: request.recent_level,
        }
    }
}

impl TryFrom<&FireRiskInput> for RiskRequest {
    type Error = RiskError;

    fn try_from(input: &FireRiskInput) -> Result<Self, Self::Error> {
        let observation = Observation {
            temperature: Celsius::new(input.temperature),
            rainfall: Millimeters::new(input.rainfall),
            wind_speed: MetersPerSecond::new(input.wind_speed),
            humidity: Percent::new(input.humidity),
            dew_point: Celsius::new(input.dew_point),
            pressure: Hectopascals::new(input.pressure),
            month: Month::new(input.month)?,
            hour: HourOfDay::new(input.hour)?,
            wind_direction: WindDirection::from_code(input.wind_direction)?,
        };
        Ok(RiskRequest::new(observation, input.recent_level))
    }
}

/// Result of a successful evaluation.
///
/// All risks are percentages; all factors are fractions in `[0, 1]`.
/// Use `fire_risk_level_label` / `fire_risk_level_color` to render `level`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FireRiskOutput {
    /// Classifier probability (0-1)
    pub probability: f64,
    /// Probability × 100
    pub base_risk: f64,
    /// Risk after the precipitation and humidity adjustment
    pub adjusted_risk: f64,
    /// Share of the base risk removed, in percent
    pub reduction_percent: f64,
    /// Base risk minus adjusted risk, in percentage points
    pub reduction_points: f64,
    /// Effect of today's rainfall
    pub rainfall_effect: f64,
    /// Moisture of the chosen recent-precipitation tier
    pub recent_moisture: f64,
    /// Larger of the two moisture signals
    pub soil_moisture: f64,
    /// Soil contribution to the reduction
    pub soil_factor: f64,
    /// Humidity contribution to the reduction
    pub humidity_factor: f64,
    /// Combined reduction
    pub total_reduction: f64,
    /// Level code (0 = very low .. 5 = extreme)
    pub level: u8,
}

impl From<&RiskAssessment> for FireRiskOutput {
    fn from(a: &RiskAssessment) -> Self {
        let b = &a.breakdown;
        Self {
            probability: a.probability,
            base_risk: *a.base_risk,
            adjusted_risk: *a.adjusted_risk,
            reduction_percent: *a.reduction_percent,
            reduction_points: *a.reduction_points,
            rainfall_effect: *b.rainfall_effect,
            recent_moisture: *b.recent_moisture,
            soil_moisture: *b.soil_moisture,
            soil_factor: *b.soil_factor,
            humidity_factor: *b.humidity_factor,
            total_reduction: *b.total_reduction,
            level: a.level.code(),
        }
    }
}

fn evaluate_input(input: &FireRiskInput) -> Result<FireRiskOutput, DefaultFireRiskError> {
    let request = RiskRequest::try_from(input)?;
    let assessment = RiskEvaluator::shared().evaluate(&request)?;
    Ok(FireRiskOutput::from(&assessment))
}

/// Load the built-in fire-event model now rather than on the first evaluation.
///
/// Safe to call any number of times from any thread; the model is built once.
///
/// Returns `FireRiskErrorCode::ModelUnavailable` if the model cannot be loaded.
/// Every later evaluation will then fail with the same code.
#[no_mangle]
pub extern "C" fn fire_risk_preload_model() -> FireRiskErrorCode {
    match track_result(preload_model().map_err(DefaultFireRiskError::from)) {
        Ok(()) => FireRiskErrorCode::Ok,
        Err(code) => code,
    }
}

/// Evaluate one observation with the shared model and canonical settings.
///
/// On success `*out_output` is filled and `FireRiskErrorCode::Ok` is returned.
/// On failure `*out_output` is left untouched and the error message is
/// available from `fire_risk_get_last_error`.
///
/// # Errors
/// - `NullPointer` if `input` or `out_output` is null
/// - `InvalidInput` if any field is out of range
/// - `ModelUnavailable` if the model cannot be loaded
///
/// # Safety
/// - `input` must be null or point to a valid, initialized `FireRiskInput`.
/// - `out_output` must be null or point to writable memory for one `FireRiskOutput`.
///
/// Example (C)
/// ```c
/// FireRiskInput input = { 31.0, 0.0, 6.5, 28.0, 9.0, 1008.0, 4, 15, 5, 1 };
/// FireRiskOutput out;
/// if (fire_risk_evaluate(&input, &out) == Ok) {
///     printf("%.1f%% (%s)\n", out.adjusted_risk, fire_risk_level_label(out.level));
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn fire_risk_evaluate(
    input: *const FireRiskInput,
    out_output: *mut FireRiskOutput,
) -> FireRiskErrorCode {
    if input.is_null() {
        return track_error(&DefaultFireRiskError::null_pointer("input"));
    }
    if out_output.is_null() {
        return track_error(&DefaultFireRiskError::null_pointer("out_output"));
    }

    // SAFETY: both pointers were checked for null above; the caller guarantees
    // they are valid and properly aligned.
    let input = unsafe { &*input };
    match track_result(evaluate_input(input)) {
        Ok(output) => {
            unsafe {
                *out_output = output;
            }
            FireRiskErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Apply the canonical precipitation and humidity adjustment to a base risk.
///
/// Does not touch the model. On success the adjusted risk is written to
/// `*out_adjusted_risk`; on failure it is left untouched.
///
/// # Errors
/// - `NullPointer` if `out_adjusted_risk` is null
/// - `InvalidInput` if `base_risk` or `humidity` is outside 0-100, `rainfall_mm`
///   is negative, any value is non-finite, or `recent_level` is above 5
///
/// # Safety
/// `out_adjusted_risk` must be null or point to a writable `double`.
#[no_mangle]
pub unsafe extern "C" fn fire_risk_adjust(
    base_risk: f64,
    rainfall_mm: f64,
    recent_level: u8,
    humidity: f64,
    out_adjusted_risk: *mut f64,
) -> FireRiskErrorCode {
    if out_adjusted_risk.is_null() {
        return track_error(&DefaultFireRiskError::null_pointer("out_adjusted_risk"));
    }

    let adjusted = adjust_risk(base_risk, rainfall_mm, recent_level, humidity)
        .map(|adjustment| *adjustment.adjusted_risk)
        .map_err(DefaultFireRiskError::from);
    match track_result(adjusted) {
        Ok(value) => {
            // SAFETY: checked for null above; the caller guarantees validity.
            unsafe {
                *out_adjusted_risk = value;
            }
            FireRiskErrorCode::Ok
        }
        Err(code) => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{fire_risk_get_last_error, fire_risk_get_last_error_code};
    use approx::assert_relative_eq;
    use std::ffi::CStr;
    use std::ptr;

    fn last_error() -> String {
        let msg = fire_risk_get_last_error();
        assert!(!msg.is_null());
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }

    #[test]
    fn test_preload_model() {
        assert_eq!(fire_risk_preload_model(), FireRiskErrorCode::Ok);
        assert_eq!(fire_risk_get_last_error_code(), FireRiskErrorCode::Ok);
        assert!(fire_risk_get_last_error().is_null());
    }

    #[test]
    fn test_evaluate_default_input() {
        let input = FireRiskInput::default();
        let mut out = FireRiskOutput::default();
        let code = unsafe { fire_risk_evaluate(&input, &mut out) };
        assert_eq!(code, FireRiskErrorCode::Ok);
        assert!((0.0..=1.0).contains(&out.probability));
        assert_relative_eq!(out.base_risk, out.probability * 100.0);
        // Default input is dry with moderate humidity: nothing is removed
        assert_relative_eq!(out.adjusted_risk, out.base_risk);
        assert_eq!(out.reduction_points, 0.0);
        assert!(out.level <= 5);
    }

    #[test]
    fn test_evaluate_reports_reduction_points() {
        let input = FireRiskInput {
            rainfall: 15.0,
            humidity: 90.0,
            recent_level: 5,
            ..FireRiskInput::default()
        };
        let mut out = FireRiskOutput::default();
        let code = unsafe { fire_risk_evaluate(&input, &mut out) };
        assert_eq!(code, FireRiskErrorCode::Ok);
        assert_relative_eq!(
            out.reduction_points,
            out.base_risk - out.adjusted_risk,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            out.reduction_points,
            out.base_risk * out.reduction_percent / 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_evaluate_rejects_bad_fields() {
        let mut out = FireRiskOutput::default();
        let cases = [
            FireRiskInput {
                rainfall: -1.0,
                ..FireRiskInput::default()
            },
            FireRiskInput {
                recent_level: 9,
                ..FireRiskInput::default()
            },
            FireRiskInput {
                month: 13,
                ..FireRiskInput::default()
            },
            FireRiskInput {
                wind_direction: 8,
                ..FireRiskInput::default()
            },
        ];
        for input in cases {
            let code = unsafe { fire_risk_evaluate(&input, &mut out) };
            assert_eq!(code, FireRiskErrorCode::InvalidInput, "{input:?}");
            assert_eq!(fire_risk_get_last_error_code(), FireRiskErrorCode::InvalidInput);
            assert!(last_error().starts_with("Invalid input"));
        }
        // Output untouched on failure
        assert_eq!(out, FireRiskOutput::default());
    }

    #[test]
    fn test_evaluate_null_pointers() {
        let input = FireRiskInput::default();
        let mut out = FireRiskOutput::default();
        let code = unsafe { fire_risk_evaluate(ptr::null(), &mut out) };
        assert_eq!(code, FireRiskErrorCode::NullPointer);
        assert_eq!(last_error(), "Parameter 'input' cannot be null");

        let code = unsafe { fire_risk_evaluate(&input, ptr::null_mut()) };
        assert_eq!(code, FireRiskErrorCode::NullPointer);
        assert_eq!(last_error(), "Parameter 'out_output' cannot be null");
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut adjusted = 0.0;
        let code = unsafe { fire_risk_adjust(80.0, -1.0, 0, 50.0, &mut adjusted) };
        assert_eq!(code, FireRiskErrorCode::InvalidInput);
        assert!(!fire_risk_get_last_error().is_null());

        let code = unsafe { fire_risk_adjust(80.0, 15.0, 5, 90.0, &mut adjusted) };
        assert_eq!(code, FireRiskErrorCode::Ok);
        assert_relative_eq!(adjusted, 20.876, epsilon = 1e-9);
        assert_eq!(fire_risk_get_last_error_code(), FireRiskErrorCode::Ok);
        assert!(fire_risk_get_last_error().is_null());
    }

    #[test]
    fn test_adjust_null_output() {
        let code = unsafe { fire_risk_adjust(80.0, 0.0, 0, 50.0, ptr::null_mut()) };
        assert_eq!(code, FireRiskErrorCode::NullPointer);
    }

    #[test]
    fn test_input_conversion_matches_request() {
        let request = RiskRequest::try_from(&FireRiskInput::default()).unwrap();
        assert_eq!(request, RiskRequest::default());
    }
}
