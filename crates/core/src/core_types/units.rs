//! Semantic unit types for weather observation quantities
//!
//! Newtype wrappers keep the nine observation fields from being mixed up
//! (e.g. passing dew point where temperature is expected, or millimetres of
//! rain where a humidity percentage is expected).
//!
//! # Design Philosophy
//! - All quantities use f64 so evaluations are bit-for-bit reproducible
//! - Total ordering via `Ord` (NaN sorts above all values)
//! - `Deref` to the raw value for arithmetic in formulas
//! - Serde support so requests and reports can be read and written as JSON
//!
//! Range checks are not performed here; an `Observation` validates its fields
//! at the evaluation boundary where a failure can be reported as input error.
//!
//! # Usage
//! ```
//! use fire_risk_core::core_types::units::{Millimeters, Percent};
//!
//! let rain = Millimeters::new(2.5);
//! assert!(*rain > 0.0);
//!
//! let humidity = Percent::new(80.0);
//! assert!((*humidity.to_fraction() - 0.8).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Implements ordering, deref, conversions and display for a transparent f64 unit.
macro_rules! f64_unit {
    ($name:ident, $suffix:expr) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                f64_total_cmp(self.0, other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl $name {
            /// Wrap a raw value
            #[inline]
            #[must_use]
            pub const fn new(value: f64) -> Self {
                $name(value)
            }

            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }

            /// True when the value is neither NaN nor infinite
            #[inline]
            #[must_use]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match f.precision() {
                    Some(p) => write!(f, "{:.*}{}", p, self.0, $suffix),
                    None => write!(f, "{}{}", self.0, $suffix),
                }
            }
        }
    };
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Temperature in degrees Celsius (air temperature and dew point)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Celsius(f64);

f64_unit!(Celsius, "°C");

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);
}

// ============================================================================
// PRECIPITATION
// ============================================================================

/// Precipitation depth in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Millimeters(f64);

f64_unit!(Millimeters, " mm");

// ============================================================================
// WIND
// ============================================================================

/// Wind speed in metres per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

f64_unit!(MetersPerSecond, " m/s");

// ============================================================================
// PRESSURE
// ============================================================================

/// Station pressure in hectopascals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Hectopascals(f64);

f64_unit!(Hectopascals, " hPa");

impl Hectopascals {
    /// Standard sea-level pressure
    pub const STANDARD: Hectopascals = Hectopascals(1013.25);
}

impl Default for Hectopascals {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ============================================================================
// RATIOS
// ============================================================================

/// Percentage value (0-100 for humidity and risk figures)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Percent(f64);

f64_unit!(Percent, "%");

impl Percent {
    /// Convert to fraction (0-1)
    #[inline]
    #[must_use]
    pub fn to_fraction(self) -> Fraction {
        Fraction(self.0 / 100.0)
    }}

/// Dimensionless fraction (0-1) used for moisture and reduction factors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Fraction(f64);

f64_unit!(Fraction, "");

impl Fraction {
    /// Nothing removed
    pub const ZERO: Fraction = Fraction(0.0);

    /// Everything removed
    pub const ONE: Fraction = Fraction(1.0);

    /// Convert to a percentage
    #[inline]
    #[must_use]
    pub fn to_percent(self) -> Percent {
        Percent(self.0 * 100.0)
    }

    /// Clamp into `[0, 1]`
    #[inline]
    #[must_use]
    pub fn clamped(self) -> Self {
        Fraction(self.0.clamp(0.0, 1.0))
    }}

impl From<Percent> for Fraction {
    fn from(p: Percent) -> Fraction {
        p.to_fraction()
    }
}
