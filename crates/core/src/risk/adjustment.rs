//! Precipitation and humidity adjustment of the classifier's base risk
//!
//! The classifier only sees today's weather. Ground that is still wet from
//! the last few days, or rain falling right now, suppresses ignition far more
//! than the model's training data captured, so its output is scaled down:
//!
//! ```text
//! soil_moisture    = max(recent_tier.moisture, rainfall_curve(rainfall))
//! soil_factor      = soil_moisture × 0.7
//! humidity_factor  = clamp((humidity - 60) / 40, 0, 1) × 0.2
//! total_reduction  = 1 - (1 - soil_factor) × (1 - humidity_factor)
//! adjusted_risk    = clamp(base_risk × (1 - total_reduction), 0, base_risk)
//! ```
//!
//! Every input is validated before any arithmetic runs, so an error never
//! comes with a partially computed result.

use crate::core_types::units::{Fraction, Millimeters, Percent};
use crate::error::{require_non_negative, require_range, RiskError};
use crate::risk::precipitation::{RainfallCurve, RecentScale, RecentTier};
use serde::{Deserialize, Serialize};

/// How the soil and humidity factors are merged into one reduction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombinationPolicy {
    /// `1 - (1 - soil) × (1 - humidity)`: each factor independently
    /// suppresses a share of what the other leaves
    #[default]
    ComplementMultiply,
    /// `max(soil, humidity)`: the wetter signal alone decides
    MaxOfTwo,
    /// `min(soil + humidity, cap)`
    CappedSum {
        /// Ceiling on the summed reduction
        cap: f64,
    },
}

impl CombinationPolicy {
    /// Additive policy with the usual 0.99 ceiling
    pub const CAPPED_SUM: CombinationPolicy = CombinationPolicy::CappedSum { cap: 0.99 };

    /// Merge two factors in `[0, 1]` into a total reduction in `[0, 1]`.
    pub fn combine(self, soil: Fraction, humidity: Fraction) -> Fraction {
        let total = match self {
            CombinationPolicy::ComplementMultiply => {
                1.0 - (1.0 - *soil) * (1.0 - *humidity)
            }
            CombinationPolicy::MaxOfTwo => soil.max(humidity).value(),
            CombinationPolicy::CappedSum { cap } => (*soil + *humidity).min(cap),
        };
        Fraction::new(total).clamped()
    }
}

/// Tunable constants of the adjustment heuristic.
///
/// `Default` is the canonical configuration. Presets for the older field
/// releases are provided so their numbers can be reproduced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentConfig {
    /// Mapping from today's rainfall to a wetness effect
    pub rainfall_curve: RainfallCurve,
    /// Scale the recent-precipitation level is picked from
    pub recent_scale: RecentScale,
    /// Share of soil moisture that becomes reduction (cap on the soil factor)
    pub soil_weight: f64,
    /// Relative humidity below which humidity has no effect (%)
    pub humidity_threshold: f64,
    /// Humidity range over which the humidity factor ramps to its weight (%)
    pub humidity_span: f64,
    /// Cap on the humidity factor
    pub humidity_weight: f64,
    /// How the two factors combine
    pub policy: CombinationPolicy,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

impl AdjustmentConfig {
    /// Linear rainfall curve, six-tier history, complement-multiply.
    pub const fn canonical() -> Self {
        AdjustmentConfig {
            rainfall_curve: RainfallCurve::CANONICAL,
            recent_scale: RecentScale::SixTier,
            soil_weight: 0.7,
            humidity_threshold: 60.0,
            humidity_span: 40.0,
            humidity_weight: 0.2,
            policy: CombinationPolicy::ComplementMultiply,
        }
    }

    /// Canonical configuration with the stepped rainfall table.
    pub const fn stepped() -> Self {
        AdjustmentConfig {
            rainfall_curve: RainfallCurve::Stepped,
            ..Self::canonical()
        }
    }

    /// The first field release: rainfall alone, applied in full.
    ///
    /// With recent level 0 this reproduces the release's multipliers
    /// (×0.1 for heavy rain through ×0.7 for a trace).
    pub const fn legacy() -> Self {
        AdjustmentConfig {
            rainfall_curve: RainfallCurve::Legacy,
            recent_scale: RecentScale::SixTier,
            soil_weight: 1.0,
            humidity_threshold: 60.0,
            humidity_span: 40.0,
            humidity_weight: 0.0,
            policy: CombinationPolicy::ComplementMultiply,
        }
    }

    /// Check weights and ranges.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), RiskError> {
        self.rainfall_curve.validate()?;
        require_range("config.soil_weight", self.soil_weight, 0.0, 1.0)?;
        require_range("config.humidity_weight", self.humidity_weight, 0.0, 1.0)?;
        require_range(
            "config.humidity_threshold",
            self.humidity_threshold,
            0.0,
            100.0,
        )?;
        require_range("config.humidity_span", self.humidity_span, 0.0, 100.0)?;
        if self.humidity_span <= 0.0 {
            return Err(RiskError::invalid(
                "config.humidity_span",
                "must be positive",
            ));
        }
        if let CombinationPolicy::CappedSum { cap } = self.policy {
            require_range("config.policy.cap", cap, 0.0, 1.0)?;
        }
        Ok(())
    }
}

/// Intermediate factors behind an adjustment, kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjustmentBreakdown {
    /// Effect of today's rainfall alone
    pub rainfall_effect: Fraction,
    /// Moisture of the chosen recent-precipitation tier
    pub recent_moisture: Fraction,
    /// Larger of the two signals above
    pub soil_moisture: Fraction,
    /// `soil_moisture × soil_weight`
    pub soil_factor: Fraction,
    /// Humidity ramp above the threshold
    pub humidity_factor: Fraction,
    /// Combined share of base risk removed
    pub total_reduction: Fraction,
}

/// Result of adjusting one base risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Adjustment {
    /// Unadjusted classifier risk (0-100)
    pub base_risk: Percent,
    /// Risk after the reduction, within `[0, base_risk]`
    pub adjusted_risk: Percent,
    /// How the reduction was built
    pub breakdown: AdjustmentBreakdown,
}

impl Adjustment {
    /// Share of the base risk removed, in percent.
    ///
    /// Measured from the clamped result, so it is exact even where clamping
    /// kicked in. Zero when the base risk is zero.
    pub fn reduction_percent(&self) -> Percent {
        if *self.base_risk > 0.0 {
            Percent::new((*self.base_risk - *self.adjusted_risk) / *self.base_risk * 100.0)
        } else {
            Percent::new(0.0)
        }
    }

    /// Risk removed in percentage points
    pub fn reduction_points(&self) -> Percent {
        Percent::new(*self.base_risk - *self.adjusted_risk)
    }
}

/// Applies the adjustment heuristic under a fixed configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAdjuster {
    config: AdjustmentConfig,
}

impl Default for RiskAdjuster {
    fn default() -> Self {
        Self::canonical()
    }
}

impl RiskAdjuster {
    /// Adjuster with the canonical configuration
    pub const fn canonical() -> Self {
        RiskAdjuster {
            config: AdjustmentConfig::canonical(),
        }
    }

    /// Adjuster with a custom configuration.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] if the configuration is out of range.
    pub fn new(config: AdjustmentConfig) -> Result<Self, RiskError> {
        config.validate()?;
        Ok(RiskAdjuster { config })
    }

    /// Active configuration
    pub fn config(&self) -> &AdjustmentConfig {
        &self.config
    }

    /// Look up a recent-precipitation tier on the configured scale.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] when the level is outside the scale.
    pub fn recent_tier(&self, recent_level: u8) -> Result<&'static RecentTier, RiskError> {
        self.config.recent_scale.tier(recent_level)
    }

    /// Humidity factor for a validated humidity.
    pub fn humidity_factor(&self, humidity: Percent) -> Fraction {
        let cfg = &self.config;
        let ramp = ((*humidity - cfg.humidity_threshold) / cfg.humidity_span).clamp(0.0, 1.0);
        Fraction::new(ramp * cfg.humidity_weight)
    }

    /// Reduce `base_risk` for rainfall, recent wetness and humidity.
    ///
    /// # Errors
    /// Returns [`RiskError::InvalidInput`] when the base risk or humidity is
    /// outside `[0, 100]`, rainfall is negative, any value is non-finite, or
    /// the recent level is outside the configured scale.
    pub fn adjust(
        &self,
        base_risk: Percent,
        rainfall: Millimeters,
        recent_level: u8,
        humidity: Percent,
    ) -> Result<Adjustment, RiskError> {
        require_range("base_risk", *base_risk, 0.0, 100.0)?;
        require_non_negative("rainfall", *rainfall)?;
        require_range("humidity", *humidity, 0.0, 100.0)?;
        let tier = self.recent_tier(recent_level)?;

        let cfg = &self.config;
        let rainfall_effect = cfg.rainfall_curve.effect(rainfall);
        let recent_moisture = Fraction::new(tier.moisture);
        let soil_moisture = rainfall_effect.max(recent_moisture);
        let soil_factor = Fraction::new(*soil_moisture * cfg.soil_weight);
        let humidity_factor = self.humidity_factor(humidity);
        let total_reduction = cfg.policy.combine(soil_factor, humidity_factor);

        let adjusted = (*base_risk * (1.0 - *total_reduction)).clamp(0.0, *base_risk);

        Ok(Adjustment {
            base_risk,
            adjusted_risk: Percent::new(adjusted),
            breakdown: AdjustmentBreakdown {
                rainfall_effect,
                recent_moisture,
                soil_moisture,
                soil_factor,
                humidity_factor,
                total_reduction,
            },
        })
    }
}

/// Adjust a base risk with the canonical configuration.
///
/// # Errors
/// See [`RiskAdjuster::adjust`].
pub fn adjust_risk(
    base_risk: f64,
    rainfall_mm: f64,
    recent_level: u8,
    humidity: f64,
) -> Result<Adjustment, RiskError> {
    RiskAdjuster::canonical().adjust(
        Percent::new(base_risk),
        Millimeters::new(rainfall_mm),
        recent_level,
        Percent::new(humidity),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dry_calm_conditions_leave_risk_untouched() {
        let adj = adjust_risk(80.0, 0.0, 0, 50.0).unwrap();
        assert_eq!(*adj.breakdown.total_reduction, 0.0);
        assert_eq!(*adj.adjusted_risk, 80.0);
        assert_eq!(*adj.reduction_percent(), 0.0);
    }

    #[test]
    fn test_complement_multiply_formula() {
        // rainfall 1mm -> 0.2, damp tier 0.45 wins; humidity 80 -> 0.1
        let adj = adjust_risk(60.0, 1.0, 3, 80.0).unwrap();
        let b = adj.breakdown;
        assert_relative_eq!(*b.soil_moisture, 0.45);
        assert_relative_eq!(*b.soil_factor, 0.315, epsilon = 1e-12);
        assert_relative_eq!(*b.humidity_factor, 0.1, epsilon = 1e-12);
        assert_relative_eq!(*b.total_reduction, 1.0 - 0.685 * 0.9, epsilon = 1e-12);
        assert_relative_eq!(*adj.adjusted_risk, 60.0 * 0.685 * 0.9, epsilon = 1e-9);
    }

    #[test]
    fn test_rain_dominates_dry_history() {
        let adj = adjust_risk(50.0, 3.0, 0, 40.0).unwrap();
        assert_relative_eq!(*adj.breakdown.rainfall_effect, 0.6, epsilon = 1e-12);
        assert_relative_eq!(*adj.breakdown.soil_moisture, 0.6, epsilon = 1e-12);
        assert_relative_eq!(*adj.adjusted_risk, 50.0 * (1.0 - 0.42), epsilon = 1e-9);
    }

    #[test]
    fn test_reduction_as_share_and_points() {
        // 60 * 0.685 * 0.9 = 36.99 remains
        let adj = adjust_risk(60.0, 1.0, 3, 80.0).unwrap();
        assert_relative_eq!(*adj.reduction_points(), 23.01, epsilon = 1e-9);
        assert_relative_eq!(*adj.reduction_percent(), 38.35, epsilon = 1e-9);

        let none = adjust_risk(0.0, 12.0, 5, 100.0).unwrap();
        assert_eq!(*none.reduction_points(), 0.0);
    }

    #[test]
    fn test_humidity_below_threshold_has_no_effect() {
        let a = adjust_risk(70.0, 0.5, 2, 0.0).unwrap();
        let b = adjust_risk(70.0, 0.5, 2, 60.0).unwrap();
        assert_eq!(a.adjusted_risk, b.adjusted_risk);
        assert_eq!(*b.breakdown.humidity_factor, 0.0);

        let full = adjust_risk(70.0, 0.0, 0, 100.0).unwrap();
        assert_relative_eq!(*full.breakdown.humidity_factor, 0.2);
    }

    #[test]
    fn test_soaked_scenario_drops_to_low_tiers() {
        let adj = adjust_risk(80.0, 15.0, 5, 90.0).unwrap();
        assert_relative_eq!(*adj.breakdown.soil_factor, 0.693, epsilon = 1e-12);
        assert_relative_eq!(*adj.breakdown.humidity_factor, 0.15, epsilon = 1e-12);
        assert!(*adj.adjusted_risk < 25.0, "got {}", *adj.adjusted_risk);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let err = adjust_risk(80.0, -1.0, 0, 50.0).unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput { field: "rainfall", .. }));

        let err = adjust_risk(80.0, 0.0, 9, 50.0).unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput { field: "recent_level", .. }));

        let err = adjust_risk(80.0, 0.0, 0, 101.0).unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput { field: "humidity", .. }));

        let err = adjust_risk(f64::NAN, 0.0, 0, 50.0).unwrap_err();
        assert!(matches!(err, RiskError::InvalidInput { field: "base_risk", .. }));

        assert!(adjust_risk(100.5, 0.0, 0, 50.0).is_err());
        assert!(adjust_risk(50.0, f64::INFINITY, 0, 50.0).is_err());
    }

    #[test]
    fn test_zero_base_risk() {
        let adj = adjust_risk(0.0, 20.0, 5, 100.0).unwrap();
        assert_eq!(*adj.adjusted_risk, 0.0);
        assert_eq!(*adj.reduction_percent(), 0.0);
    }

    #[test]
    fn test_policies() {
        let soil = Fraction::new(0.5);
        let humidity = Fraction::new(0.2);
        assert_relative_eq!(
            *CombinationPolicy::ComplementMultiply.combine(soil, humidity),
            0.6,
            epsilon = 1e-12
        );
        assert_eq!(*CombinationPolicy::MaxOfTwo.combine(soil, humidity), 0.5);
        assert_relative_eq!(
            *CombinationPolicy::CAPPED_SUM.combine(soil, humidity),
            0.7,
            epsilon = 1e-12
        );
        assert_eq!(
            *CombinationPolicy::CAPPED_SUM.combine(Fraction::new(0.9), Fraction::new(0.2)),
            0.99
        );
    }

    #[test]
    fn test_legacy_preset_reproduces_multipliers() {
        let adjuster = RiskAdjuster::new(AdjustmentConfig::legacy()).unwrap();
        let cases = [(0.0, 1.0), (0.5, 0.7), (2.0, 0.4), (6.0, 0.2), (10.0, 0.1)];
        for (rain, multiplier) in cases {
            let adj = adjuster
                .adjust(
                    Percent::new(90.0),
                    Millimeters::new(rain),
                    0,
                    Percent::new(95.0),
                )
                .unwrap();
            assert_relative_eq!(*adj.adjusted_risk, 90.0 * multiplier, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_stepped_preset() {
        let adjuster = RiskAdjuster::new(AdjustmentConfig::stepped()).unwrap();
        let adj = adjuster
            .adjust(
                Percent::new(80.0),
                Millimeters::new(15.0),
                5,
                Percent::new(90.0),
            )
            .unwrap();
        assert_relative_eq!(*adj.breakdown.soil_factor, 0.63, epsilon = 1e-12);
    }

    #[test]
    fn test_config_validation() {
        assert!(AdjustmentConfig::canonical().validate().is_ok());
        assert!(AdjustmentConfig::legacy().validate().is_ok());

        let bad = AdjustmentConfig {
            soil_weight: 1.5,
            ..AdjustmentConfig::canonical()
        };
        assert!(RiskAdjuster::new(bad).is_err());

        let bad = AdjustmentConfig {
            humidity_span: 0.0,
            ..AdjustmentConfig::canonical()
        };
        assert!(RiskAdjuster::new(bad).is_err());

        let bad = AdjustmentConfig {
            policy: CombinationPolicy::CappedSum { cap: 2.0 },
            ..AdjustmentConfig::canonical()
        };
        assert!(RiskAdjuster::new(bad).is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let cfg: AdjustmentConfig =
            serde_json::from_str(r#"{ "rainfall_curve": { "kind": "stepped" } }"#).unwrap();
        assert_eq!(cfg.rainfall_curve, RainfallCurve::Stepped);
        assert_eq!(cfg.soil_weight, 0.7);
        assert_eq!(cfg.policy, CombinationPolicy::ComplementMultiply);
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let a = adjust_risk(63.7, 2.3, 2, 77.0).unwrap();
        let b = adjust_risk(63.7, 2.3, 2, 77.0).unwrap();
        assert_eq!(a.adjusted_risk.to_bits(), b.adjusted_risk.to_bits());
        assert_eq!(a, b);
    }
}
