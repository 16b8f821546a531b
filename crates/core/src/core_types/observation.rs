//! Hand-entered weather observation fed to the classifier
//!
//! The nine fields mirror the columns the fire-event classifier was trained
//! on: six continuous weather readings and three categorical time/direction
//! fields. Categorical fields are validated when they are constructed, so an
//! `Observation` can only ever hold a real month, hour and compass point.
//! The continuous fields are range-checked by [`Observation::validate`].

use crate::core_types::units::{Celsius, Hectopascals, MetersPerSecond, Millimeters, Percent};
use crate::error::{require_finite, require_non_negative, require_range, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month (1-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    /// Create a month, rejecting anything outside 1-12
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] for values outside 1-12.
    pub fn new(value: u8) -> Result<Self, RiskError> {
        if (1..=12).contains(&value) {
            Ok(Month(value))
        } else {
            Err(RiskError::invalid(
                "month",
                format!("must be between 1 and 12, got {value}"),
            ))
        }
    }

    /// Month number (1-12)
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Month {
    type Error = RiskError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Month::new(value)
    }
}

impl From<Month> for u8 {
    fn from(m: Month) -> u8 {
        m.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hour of the day (0-23)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Create an hour, rejecting anything outside 0-23
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] for values above 23.
    pub fn new(value: u8) -> Result<Self, RiskError> {
        if value < 24 {
            Ok(HourOfDay(value))
        } else {
            Err(RiskError::invalid(
                "hour",
                format!("must be between 0 and 23, got {value}"),
            ))
        }
    }

    /// Hour number (0-23)
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HourOfDay {
    type Error = RiskError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        HourOfDay::new(value)
    }
}

impl From<HourOfDay> for u8 {
    fn from(h: HourOfDay) -> u8 {
        h.0
    }
}

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// Eight-point compass wind direction.
///
/// Discriminants are the ordinal codes the classifier was trained with
/// (clockwise from north).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WindDirection {
    /// North
    #[serde(rename = "N")]
    North = 0,
    /// North-east
    #[serde(rename = "NE")]
    NorthEast = 1,
    /// East
    #[serde(rename = "E")]
    East = 2,
    /// South-east
    #[serde(rename = "SE")]
    SouthEast = 3,
    /// South
    #[serde(rename = "S")]
    South = 4,
    /// South-west
    #[serde(rename = "SW")]
    SouthWest = 5,
    /// West
    #[serde(rename = "W")]
    West = 6,
    /// North-west
    #[serde(rename = "NW")]
    NorthWest = 7,
}

impl WindDirection {
    /// All directions in code order
    pub const ALL: [WindDirection; 8] = [
        WindDirection::North,
        WindDirection::NorthEast,
        WindDirection::East,
        WindDirection::SouthEast,
        WindDirection::South,
        WindDirection::SouthWest,
        WindDirection::West,
        WindDirection::NorthWest,
    ];

    /// Look up a direction by its ordinal code (0 = N … 7 = NW)
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] for codes above 7.
    pub fn from_code(code: u8) -> Result<Self, RiskError> {
        Self::ALL.get(usize::from(code)).copied().ok_or_else(|| {
            RiskError::invalid(
                "wind_direction",
                format!("code must be between 0 and 7, got {code}"),
            )
        })
    }

    /// Ordinal code (0 = N … 7 = NW)
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Compass abbreviation
    pub fn abbreviation(self) -> &'static str {
        match self {
            WindDirection::North => "N",
            WindDirection::NorthEast => "NE",
            WindDirection::East => "E",
            WindDirection::SouthEast => "SE",
            WindDirection::South => "S",
            WindDirection::SouthWest => "SW",
            WindDirection::West => "W",
            WindDirection::NorthWest => "NW",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for WindDirection {
    type Err = RiskError;

    /// Accepts abbreviations (`"NE"`), full names (`"north-east"`) and codes (`"1"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Bare digits only; `u8::from_str` would also take a leading '+'.
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            let code = trimmed.parse::<u8>().map_err(|_| {
                RiskError::invalid("wind_direction", format!("unknown direction code '{s}'"))
            })?;
            return Self::from_code(code);
        }
        let key = trimmed.to_ascii_lowercase().replace(['_', ' '], "-");
        let direction = match key.as_str() {
            "n" | "north" => WindDirection::North,
            "ne" | "northeast" | "north-east" => WindDirection::NorthEast,
            "e" | "east" => WindDirection::East,
            "se" | "southeast" | "south-east" => WindDirection::SouthEast,
            "s" | "south" => WindDirection::South,
            "sw" | "southwest" | "south-west" => WindDirection::SouthWest,
            "w" | "west" => WindDirection::West,
            "nw" | "northwest" | "north-west" => WindDirection::NorthWest,
            _ => {
                return Err(RiskError::invalid(
                    "wind_direction",
                    format!("'{s}' is not one of N, NE, E, SE, S, SW, W, NW"),
                ))
            }
        };
        Ok(direction)
    }
}

/// Number of continuous fields in [`Observation::float_features`]
pub const FLOAT_FEATURE_COUNT: usize = 6;

/// One set of weather readings as entered by the user.
///
/// All fields are required. Use [`Observation::validate`] before handing an
/// observation built from untrusted input to a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Air temperature
    pub temperature: Celsius,
    /// Rainfall currently falling or fallen today
    pub rainfall: Millimeters,
    /// Wind speed
    pub wind_speed: MetersPerSecond,
    /// Relative humidity (0-100)
    pub humidity: Percent,
    /// Dew point temperature
    pub dew_point: Celsius,
    /// Station pressure
    pub pressure: Hectopascals,
    /// Month of observation
    pub month: Month,
    /// Hour of observation
    pub hour: HourOfDay,
    /// Prevailing wind direction
    pub wind_direction: WindDirection,
}

impl Observation {
    /// Check every continuous field for finiteness and physical range.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), RiskError> {
        let absolute_zero = *Celsius::ABSOLUTE_ZERO;

        require_finite("temperature", *self.temperature)?;
        if *self.temperature < absolute_zero {
            return Err(RiskError::invalid("temperature", "is below absolute zero"));
        }
        require_non_negative("rainfall", *self.rainfall)?;
        require_non_negative("wind_speed", *self.wind_speed)?;
        require_range("humidity", *self.humidity, 0.0, 100.0)?;
        require_finite("dew_point", *self.dew_point)?;
        if *self.dew_point < absolute_zero {
            return Err(RiskError::invalid("dew_point", "is below absolute zero"));
        }
        require_finite("pressure", *self.pressure)?;
        if *self.pressure <= 0.0 {
            return Err(RiskError::invalid(
                "pressure",
                format!("must be positive, got {}", *self.pressure),
            ));
        }
        Ok(())
    }

    /// Continuous features in training column order:
    /// temperature, rainfall, wind speed, humidity, dew point, pressure.
    pub fn float_features(&self) -> [f64; FLOAT_FEATURE_COUNT] {
        [
            *self.temperature,
            *self.rainfall,
            *self.wind_speed,
            *self.humidity,
            *self.dew_point,
            *self.pressure,
        ]
    }
}

impl Default for Observation {
    /// The entry form's initial values: a mild, dry January noon.
    fn default() -> Self {
        Observation {
            temperature: Celsius::new(25.0),
            rainfall: Millimeters::new(0.0),
            wind_speed: MetersPerSecond::new(2.0),
            humidity: Percent::new(50.0),
            dew_point: Celsius::new(15.0),
            pressure: Hectopascals::STANDARD,
            month: Month(1),
            hour: HourOfDay(12),
            wind_direction: WindDirection::North,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        assert!(Month::new(0).is_err());
        assert_eq!(Month::new(1).map(Month::get), Ok(1));
        assert_eq!(Month::new(12).map(Month::get), Ok(12));
        assert!(Month::new(13).is_err());
    }

    #[test]
    fn test_hour_bounds() {
        assert_eq!(HourOfDay::new(0).map(HourOfDay::get), Ok(0));
        assert_eq!(HourOfDay::new(23).map(HourOfDay::get), Ok(23));
        assert!(HourOfDay::new(24).is_err());
    }

    #[test]
    fn test_wind_direction_codes_round_trip() {
        for (code, dir) in WindDirection::ALL.iter().enumerate() {
            assert_eq!(usize::from(dir.code()), code);
            assert_eq!(WindDirection::from_code(dir.code()), Ok(*dir));
        }
        assert!(WindDirection::from_code(8).is_err());
    }

    #[test]
    fn test_wind_direction_parsing() {
        assert_eq!("NE".parse::<WindDirection>(), Ok(WindDirection::NorthEast));
        assert_eq!(" south-west ".parse::<WindDirection>(), Ok(WindDirection::SouthWest));
        assert_eq!("7".parse::<WindDirection>(), Ok(WindDirection::NorthWest));
        assert!("NNE".parse::<WindDirection>().is_err());
        assert!("9".parse::<WindDirection>().is_err());
        assert_eq!("north_west".parse::<WindDirection>(), Ok(WindDirection::NorthWest));
    }

    #[test]
    fn test_wind_direction_rejects_signed_codes_and_junk() {
        for junk in ["-1", "+1", "n_-e", "n e", "", "1.0", "300"] {
            let err = junk.parse::<WindDirection>().unwrap_err();
            assert!(err.is_invalid_input(), "{junk:?} parsed");
        }
    }

    #[test]
    fn test_default_observation_is_valid() {
        assert_eq!(Observation::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_negative_rainfall() {
        let obs = Observation {
            rainfall: Millimeters::new(-1.0),
            ..Observation::default()
        };
        let err = obs.validate().unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput { field: "rainfall", .. }));
    }

    #[test]
    fn test_validate_rejects_bad_humidity_and_pressure() {
        let obs = Observation {
            humidity: Percent::new(120.0),
            ..Observation::default()
        };
        assert!(matches!(
            obs.validate(),
            Err(RiskError::InvalidInput { field: "humidity", .. })
        ));

        let obs = Observation {
            pressure: Hectopascals::new(0.0),
            ..Observation::default()
        };
        assert!(matches!(
            obs.validate(),
            Err(RiskError::InvalidInput { field: "pressure", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_temperature() {
        let obs = Observation {
            temperature: Celsius::new(f64::NAN),
            ..Observation::default()
        };
        assert!(matches!(
            obs.validate(),
            Err(RiskError::InvalidInput { field: "temperature", .. })
        ));
    }

    #[test]
    fn test_float_feature_order() {
        let obs = Observation::default();
        assert_eq!(obs.float_features(), [25.0, 0.0, 2.0, 50.0, 15.0, 1013.25]);
    }
}
