//! Precipitation signals feeding the risk reduction
//!
//! Two independent wetness signals are derived here:
//! - the **immediate-rainfall effect**, a function of rain falling today
//!   ([`RainfallCurve`])
//! - the **recent-history effect**, a lookup of the user's recollection of
//!   the last days' weather on an ordinal scale ([`RecentScale`])
//!
//! Both are dimensionless fractions in `[0, 1]` that never decrease as the
//! ground gets wetter.

use crate::core_types::units::{Fraction, Millimeters};
use crate::error::RiskError;
use serde::{Deserialize, Serialize};

// ============================================================================
// IMMEDIATE RAINFALL
// ============================================================================

/// Step table: `(minimum rainfall mm, effect)` checked top-down with `>=`,
/// plus the effect for any trace amount above zero.
struct RainfallSteps {
    steps: [(f64, f64); 3],
    trace: f64,
}

impl RainfallSteps {
    fn effect(&self, rainfall_mm: f64) -> f64 {
        self.steps
            .iter()
            .find(|(min_mm, _)| rainfall_mm >= *min_mm)
            .map_or_else(
                || if rainfall_mm > 0.0 { self.trace } else { 0.0 },
                |(_, effect)| *effect,
            )
    }
}

const STEPPED: RainfallSteps = RainfallSteps {
    steps: [(10.0, 0.9), (5.0, 0.7), (1.0, 0.4)],
    trace: 0.2,
};

/// Reduction the first field release applied: risk × 0.1 / 0.2 / 0.4 / 0.7.
const LEGACY: RainfallSteps = RainfallSteps {
    steps: [(10.0, 0.9), (5.0, 0.8), (1.0, 0.6)],
    trace: 0.3,
};

/// How current rainfall maps to a wetness effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RainfallCurve {
    /// `min(ceiling, rainfall × slope)`
    Linear {
        /// Effect gained per millimetre
        slope: f64,
        /// Upper bound on the effect
        ceiling: f64,
    },
    /// ≥10 mm → 0.9, ≥5 mm → 0.7, ≥1 mm → 0.4, >0 mm → 0.2, else 0
    Stepped,
    /// ≥10 mm → 0.9, ≥5 mm → 0.8, ≥1 mm → 0.6, >0 mm → 0.3, else 0
    Legacy,
}

impl RainfallCurve {
    /// `min(0.99, rainfall × 0.2)`
    pub const CANONICAL: RainfallCurve = RainfallCurve::Linear {
        slope: 0.2,
        ceiling: 0.99,
    };

    /// Wetness effect of the given rainfall.
    ///
    /// Rainfall is expected to be validated (finite, non-negative).
    pub fn effect(&self, rainfall: Millimeters) -> Fraction {
        let mm = *rainfall;
        let effect = match *self {
            RainfallCurve::Linear { slope, ceiling } => (mm * slope).min(ceiling),
            RainfallCurve::Stepped => STEPPED.effect(mm),
            RainfallCurve::Legacy => LEGACY.effect(mm),
        };
        Fraction::new(effect).clamped()
    }

    /// Check slope and ceiling of a linear curve.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] for a negative or non-finite slope,
    /// or a ceiling outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), RiskError> {
        if let RainfallCurve::Linear { slope, ceiling } = *self {
            if !slope.is_finite() || slope < 0.0 {
                return Err(RiskError::invalid(
                    "rainfall_curve.slope",
                    format!("must be finite and non-negative, got {slope}"),
                ));
            }
            if !(0.0..=1.0).contains(&ceiling) {
                return Err(RiskError::invalid(
                    "rainfall_curve.ceiling",
                    format!("must be between 0 and 1, got {ceiling}"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for RainfallCurve {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Descriptive band for today's rainfall, used when explaining a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainfallBand {
    /// Exactly 0 mm
    None,
    /// Above 0 and below 1 mm
    Trace,
    /// 1 to 5 mm
    Light,
    /// 5 to 10 mm
    Moderate,
    /// 10 mm or more
    Heavy,
}

impl RainfallBand {
    /// All bands from driest to wettest
    pub const ALL: [RainfallBand; 5] = [
        RainfallBand::None,
        RainfallBand::Trace,
        RainfallBand::Light,
        RainfallBand::Moderate,
        RainfallBand::Heavy,
    ];

    /// Band containing the given rainfall
    pub fn classify(rainfall: Millimeters) -> Self {
        let mm = *rainfall;
        if mm >= 10.0 {
            RainfallBand::Heavy
        } else if mm >= 5.0 {
            RainfallBand::Moderate
        } else if mm >= 1.0 {
            RainfallBand::Light
        } else if mm > 0.0 {
            RainfallBand::Trace
        } else {
            RainfallBand::None
        }
    }

    /// Short description with the band's range
    pub fn description(self) -> &'static str {
        match self {
            RainfallBand::None => "no rain (0 mm)",
            RainfallBand::Trace => "trace rain (0.1-1 mm)",
            RainfallBand::Light => "light rain (1-5 mm)",
            RainfallBand::Moderate => "moderate rain (5-10 mm)",
            RainfallBand::Heavy => "heavy rain (10 mm or more)",
        }
    }

    /// Representative rainfall inside the band
    pub fn representative(self) -> Millimeters {
        Millimeters::new(match self {
            RainfallBand::None => 0.0,
            RainfallBand::Trace => 0.5,
            RainfallBand::Light => 3.0,
            RainfallBand::Moderate => 7.5,
            RainfallBand::Heavy => 15.0,
        })
    }
}

// ============================================================================
// RECENT PRECIPITATION HISTORY
// ============================================================================

/// One tier of a recent-precipitation scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecentTier {
    /// Short name shown in a selector
    pub name: &'static str,
    /// What the user should recall to pick this tier
    pub description: &'static str,
    /// Ground wetness attributed to the tier
    pub moisture: f64,
}

const fn tier(name: &'static str, description: &'static str, moisture: f64) -> RecentTier {
    RecentTier {
        name,
        description,
        moisture,
    }
}

static SIX_TIERS: [RecentTier; 6] = [
    tier("very dry", "no meaningful rain for more than two weeks", 0.0),
    tier("dry", "only light showers in the past week", 0.1),
    tier("normal", "some rain during the past week", 0.25),
    tier("damp", "rain within the last two or three days", 0.45),
    tier("wet", "substantial rain in the last day or two", 0.7),
    tier("saturated", "heavy rain over several days, ground waterlogged", 0.9),
];

static FIVE_TIERS: [RecentTier; 5] = [
    tier("very dry", "no meaningful rain for more than two weeks", 0.0),
    tier("dry", "little rain in the past week", 0.15),
    tier("normal", "some rain during the past week", 0.35),
    tier("wet", "substantial rain in the last two days", 0.6),
    tier("saturated", "heavy rain over several days, ground waterlogged", 0.85),
];

static FOUR_TIERS: [RecentTier; 4] = [
    tier("dry", "little or no rain in the past week", 0.05),
    tier("normal", "some rain during the past week", 0.3),
    tier("wet", "substantial rain in the last two days", 0.6),
    tier("saturated", "heavy rain over several days, ground waterlogged", 0.8),
];

/// Ordinal scale the user picks their recent-precipitation level from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentScale {
    /// very dry, dry, normal, damp, wet, saturated
    #[default]
    SixTier,
    /// very dry, dry, normal, wet, saturated
    FiveTier,
    /// dry, normal, wet, saturated
    FourTier,
}

impl RecentScale {
    /// Tiers from driest to wettest
    pub fn tiers(self) -> &'static [RecentTier] {
        match self {
            RecentScale::SixTier => &SIX_TIERS,
            RecentScale::FiveTier => &FIVE_TIERS,
            RecentScale::FourTier => &FOUR_TIERS,
        }
    }

    /// Number of tiers; valid levels are `0..tier_count()`
    pub fn tier_count(self) -> usize {
        self.tiers().len()
    }

    /// Highest valid level (the saturated tier)
    pub fn max_level(self) -> u8 {
        (self.tier_count() - 1) as u8
    }

    /// Tier for a level.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] when the level is outside the scale.
    pub fn tier(self, level: u8) -> Result<&'static RecentTier, RiskError> {
        self.tiers().get(usize::from(level)).ok_or_else(|| {
            RiskError::invalid(
                "recent_level",
                format!("must be between 0 and {}, got {level}", self.max_level()),
            )
        })
    }
}
