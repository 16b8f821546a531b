//! Discrete risk levels and the threshold tables that select them
//!
//! A table is an ordered list of bands, highest threshold first. A risk
//! belongs to the first band whose threshold it reaches (`>=`), so boundary
//! values fall into the higher band. The last band has an infinite negative
//! threshold and catches everything else, NaN included, which makes
//! classification total.

use crate::error::RiskError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Severity of an adjusted fire risk, least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Ignition very unlikely
    VeryLow,
    /// Low
    Low,
    /// Moderate
    Moderate,
    /// High
    High,
    /// Very high
    VeryHigh,
    /// Extreme
    Extreme,
}

impl RiskLevel {
    /// Every level, least severe first
    pub const ALL: [RiskLevel; 6] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::VeryHigh,
        RiskLevel::Extreme,
    ];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very low",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very high",
            RiskLevel::Extreme => "extreme",
        }
    }

    /// Numeric code used across the C ABI (0 = very low … 5 = extreme)
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Level for a numeric code.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] for codes above 5.
    pub fn from_code(code: u8) -> Result<Self, RiskError> {
        Self::ALL.get(usize::from(code)).copied().ok_or_else(|| {
            RiskError::invalid("level", format!("unknown level code {code}, expected 0-5"))
        })
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a threshold table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskBand {
    /// Lowest adjusted risk (percent, inclusive) that falls in this band
    pub min_risk: f64,
    /// Level reported for the band
    pub level: RiskLevel,
    /// Display color
    pub color: &'static str,
}

impl RiskBand {
    /// Label of the band's level
    pub fn label(&self) -> &'static str {
        self.level.label()
    }
}

const fn band(min_risk: f64, level: RiskLevel, color: &'static str) -> RiskBand {
    RiskBand {
        min_risk,
        level,
        color,
    }
}

static CANONICAL_BANDS: [RiskBand; 6] = [
    band(80.0, RiskLevel::Extreme, "darkred"),
    band(65.0, RiskLevel::VeryHigh, "red"),
    band(45.0, RiskLevel::High, "orange"),
    band(25.0, RiskLevel::Moderate, "gold"),
    band(10.0, RiskLevel::Low, "green"),
    band(f64::NEG_INFINITY, RiskLevel::VeryLow, "blue"),
];

static LEGACY_BANDS: [RiskBand; 5] = [
    band(85.0, RiskLevel::VeryHigh, "red"),
    band(65.0, RiskLevel::High, "orange"),
    band(45.0, RiskLevel::Moderate, "yellow"),
    band(25.0, RiskLevel::Low, "green"),
    band(f64::NEG_INFINITY, RiskLevel::VeryLow, "blue"),
];

/// Ordered threshold table mapping adjusted risk to a level and color.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskLevelTable {
    bands: Cow<'static, [RiskBand]>,
}

impl Default for RiskLevelTable {
    fn default() -> Self {
        Self::canonical()
    }
}

impl RiskLevelTable {
    /// Six bands: ≥80 extreme, ≥65 very high, ≥45 high, ≥25 moderate,
    /// ≥10 low, otherwise very low.
    pub fn canonical() -> Self {
        RiskLevelTable {
            bands: Cow::Borrowed(&CANONICAL_BANDS),
        }
    }

    /// The first field release's five bands: ≥85 very high, ≥65 high,
    /// ≥45 moderate, ≥25 low, otherwise very low.
    pub fn legacy() -> Self {
        RiskLevelTable {
            bands: Cow::Borrowed(&LEGACY_BANDS),
        }
    }

    /// Build a custom table.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] if the table is empty, thresholds
    /// are NaN or not strictly descending, or the last band does not catch
    /// all remaining risks (threshold `f64::NEG_INFINITY`).
    pub fn new(bands: Vec<RiskBand>) -> Result<Self, RiskError> {
        let Some(last) = bands.last() else {
            return Err(RiskError::invalid("risk_levels", "table is empty"));
        };
        if bands.iter().any(|b| b.min_risk.is_nan()) {
            return Err(RiskError::invalid("risk_levels", "threshold is NaN"));
        }
        if !bands.windows(2).all(|w| w[0].min_risk > w[1].min_risk) {
            return Err(RiskError::invalid(
                "risk_levels",
                "thresholds must be strictly descending",
            ));
        }
        if last.min_risk != f64::NEG_INFINITY {
            return Err(RiskError::invalid(
                "risk_levels",
                "last band must have a threshold of negative infinity",
            ));
        }
        Ok(RiskLevelTable {
            bands: Cow::Owned(bands),
        })
    }

    /// Bands, highest threshold first
    pub fn bands(&self) -> &[RiskBand] {
        &self.bands
    }

    /// Band reporting `level`, if the table has one
    pub fn band_for(&self, level: RiskLevel) -> Option<&RiskBand> {
        self.bands.iter().find(|b| b.level == level)
    }

    /// Band for an adjusted risk. Total: every input, NaN included, lands
    /// in exactly one band.
    pub fn classify(&self, adjusted_risk: f64) -> &RiskBand {
        self.bands
            .iter()
            .find(|b| adjusted_risk >= b.min_risk)
            .unwrap_or_else(|| &self.bands[self.bands.len() - 1])
    }
}

/// Level and color for an adjusted risk under the canonical table.
pub fn risk_level(adjusted_risk: f64) -> (RiskLevel, &'static str) {
    let band = CANONICAL_BANDS
        .iter()
        .find(|b| adjusted_risk >= b.min_risk)
        .unwrap_or(&CANONICAL_BANDS[CANONICAL_BANDS.len() - 1]);
    (band.level, band.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_thresholds() {
        assert_eq!(risk_level(100.0), (RiskLevel::Extreme, "darkred"));
        assert_eq!(risk_level(80.0), (RiskLevel::Extreme, "darkred"));
        assert_eq!(risk_level(79.999), (RiskLevel::VeryHigh, "red"));
        assert_eq!(risk_level(65.0), (RiskLevel::VeryHigh, "red"));
        assert_eq!(risk_level(64.9), (RiskLevel::High, "orange"));
        assert_eq!(risk_level(45.0), (RiskLevel::High, "orange"));
        assert_eq!(risk_level(25.0), (RiskLevel::Moderate, "gold"));
        assert_eq!(risk_level(24.99), (RiskLevel::Low, "green"));
        assert_eq!(risk_level(10.0), (RiskLevel::Low, "green"));
        assert_eq!(risk_level(9.99), (RiskLevel::VeryLow, "blue"));
        assert_eq!(risk_level(0.0), (RiskLevel::VeryLow, "blue"));
    }

    #[test]
    fn test_classification_is_total() {
        assert_eq!(risk_level(-5.0).0, RiskLevel::VeryLow);
        assert_eq!(risk_level(f64::NEG_INFINITY).0, RiskLevel::VeryLow);
        assert_eq!(risk_level(f64::NAN).0, RiskLevel::VeryLow);
        assert_eq!(risk_level(f64::INFINITY).0, RiskLevel::Extreme);
        assert_eq!(risk_level(1e9).0, RiskLevel::Extreme);
    }

    #[test]
    fn test_table_matches_free_function() {
        let table = RiskLevelTable::canonical();
        for step in 0..=1000 {
            let risk = f64::from(step) * 0.1;
            let band = table.classify(risk);
            assert_eq!((band.level, band.color), risk_level(risk));
        }
    }

    #[test]
    fn test_levels_never_decrease_with_risk() {
        let table = RiskLevelTable::canonical();
        let mut previous = RiskLevel::VeryLow;
        for step in 0..=1000 {
            let level = table.classify(f64::from(step) * 0.1).level;
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_legacy_table() {
        let table = RiskLevelTable::legacy();
        assert_eq!(table.classify(85.0).level, RiskLevel::VeryHigh);
        assert_eq!(table.classify(84.9).level, RiskLevel::High);
        assert_eq!(table.classify(45.0).color, "yellow");
        assert_eq!(table.classify(24.0).level, RiskLevel::VeryLow);
    }

    #[test]
    fn test_custom_table_validation() {
        assert!(RiskLevelTable::new(vec![]).is_err());
        assert!(RiskLevelTable::new(vec![
            band(10.0, RiskLevel::Low, "green"),
            band(50.0, RiskLevel::High, "red"),
            band(f64::NEG_INFINITY, RiskLevel::VeryLow, "blue"),
        ])
        .is_err());
        assert!(RiskLevelTable::new(vec![
            band(50.0, RiskLevel::High, "red"),
            band(0.0, RiskLevel::Low, "green"),
        ])
        .is_err());
        assert!(RiskLevelTable::new(vec![
            band(f64::NAN, RiskLevel::High, "red"),
            band(f64::NEG_INFINITY, RiskLevel::Low, "green"),
        ])
        .is_err());

        let table = RiskLevelTable::new(vec![
            band(50.0, RiskLevel::High, "red"),
            band(f64::NEG_INFINITY, RiskLevel::Low, "green"),
        ])
        .unwrap();
        assert_eq!(table.classify(50.0).label(), "high");
        assert_eq!(table.classify(49.0).label(), "low");
        assert_eq!(table.bands().len(), 2);
    }

    #[test]
    fn test_level_codes_follow_severity() {
        assert_eq!(RiskLevel::VeryLow.code(), 0);
        assert_eq!(RiskLevel::Extreme.code(), 5);
        assert_eq!(RiskLevel::VeryHigh.to_string(), "very high");
        for level in RiskLevel::ALL {
            assert_eq!(RiskLevel::from_code(level.code()).unwrap(), level);
        }
        assert!(RiskLevel::from_code(6).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_band_lookup_by_level() {
        let canonical = RiskLevelTable::canonical();
        assert_eq!(canonical.band_for(RiskLevel::Moderate).unwrap().color, "gold");
        assert_eq!(RiskLevelTable::legacy().band_for(RiskLevel::Extreme), None);
    }
}
