//! Risk heuristics applied on top of the classifier

pub mod adjustment;
pub mod level;
pub mod precipitation;

pub use adjustment::{
    adjust_risk, Adjustment, AdjustmentBreakdown, AdjustmentConfig, CombinationPolicy,
    RiskAdjuster,
};
pub use level::{risk_level, RiskBand, RiskLevel, RiskLevelTable};
pub use precipitation::{RainfallBand, RainfallCurve, RecentScale, RecentTier};
