use fire_risk_core::{risk_level, RiskLevel, RiskLevelTable};
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use std::sync::LazyLock;

use crate::error::DefaultFireRiskError;
use crate::helpers::track_result;

struct LevelStrings {
    label: CString,
    color: CString,
}

// Indexed by level code; lives for the whole process so pointers stay valid.
static LEVEL_STRINGS: LazyLock<[LevelStrings; 6]> = LazyLock::new(|| {
    let table = RiskLevelTable::canonical();
    RiskLevel::ALL.map(|level| LevelStrings {
        label: CString::new(level.label()).unwrap_or_default(),
        color: CString::new(table.band_for(level).map_or("", |band| band.color))
            .unwrap_or_default(),
    })
});

fn level_strings(code: u8) -> Result<&'static LevelStrings, DefaultFireRiskError> {
    let level = RiskLevel::from_code(code)?;
    Ok(&LEVEL_STRINGS[usize::from(level.code())])
}

/// Level code (0 = very low .. 5 = extreme) for an adjusted risk in percent.
///
/// Total: every input maps to a level. Thresholds are inclusive lower bounds
/// (80 is extreme, 79.999 is very high); NaN maps to very low.
#[no_mangle]
pub extern "C" fn fire_risk_level(adjusted_risk: f64) -> u8 {
    risk_level(adjusted_risk).0.code()
}

/// Label for a level code, e.g. `"very high"`.
///
/// Returns a static string that must not be freed, or null (with
/// `InvalidInput` recorded) for codes above 5.
#[no_mangle]
pub extern "C" fn fire_risk_level_label(level: u8) -> *const c_char {
    match track_result(level_strings(level)) {
        Ok(strings) => strings.label.as_ptr(),
        Err(_) => ptr::null(),
    }
}

/// Display color for a level code, e.g. `"darkred"`.
///
/// Returns a static string that must not be freed, or null (with
/// `InvalidInput` recorded) for codes above 5.
#[no_mangle]
pub extern "C" fn fire_risk_level_color(level: u8) -> *const c_char {
    match track_result(level_strings(level)) {
        Ok(strings) => strings.color.as_ptr(),
        Err(_) => ptr::null(),
    }
}
