//! Fire Risk Assessment Core Library
//!
//! Estimates wildfire risk from a single hand-entered weather observation.
//! A pre-trained fire-event classifier supplies a base probability, which is
//! then reduced for ground wetness (today's rainfall and the last days'
//! precipitation) and humid air, and finally mapped to a risk level.
//!
//! ## Pipeline
//!
//! - [`Observation`] + recent-precipitation level → [`RiskRequest`]
//! - [`Classifier::predict`] → probability → base risk (× 100)
//! - [`RiskAdjuster::adjust`] → adjusted risk within `[0, base risk]`
//! - [`RiskLevelTable::classify`] → level, label and color
//!
//! ```
//! use fire_risk_core::{assess, RiskLevel, RiskRequest};
//!
//! let assessment = assess(&RiskRequest::default()).unwrap();
//! assert!(*assessment.adjusted_risk <= *assessment.base_risk);
//! assert!(assessment.level <= RiskLevel::Extreme);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Classifier adapter and shared model
pub mod classifier;

// Adjustment heuristic and level tables
pub mod risk;

// Evaluation boundary
pub mod evaluation;

// Re-export core types
pub use core_types::{
    Celsius, Fraction, Hectopascals, HourOfDay, MetersPerSecond, Millimeters, Month, Observation,
    Percent, WindDirection,
};
pub use error::RiskError;

// Re-export classifier types
pub use classifier::{
    preload_model, shared_model, Classifier, ObliviousEnsemble, SharedModel,
};

// Re-export risk heuristics
pub use risk::{
    adjust_risk, risk_level, Adjustment, AdjustmentBreakdown, AdjustmentConfig,
    CombinationPolicy, RainfallBand, RainfallCurve, RecentScale, RiskAdjuster, RiskLevel,
    RiskLevelTable,
};

// Re-export evaluation
pub use evaluation::{assess, RiskAssessment, RiskEvaluator, RiskRequest};
