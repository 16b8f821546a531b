//! Single-shot risk evaluation
//!
//! [`RiskEvaluator::evaluate`] is the one operation callers need: it
//! validates a request, asks the classifier once, adjusts the base risk and
//! picks a level. Any failure comes back as a [`RiskError`] for that request
//! alone; nothing is cached between calls.

use crate::classifier::{Classifier, SharedModel};
use crate::core_types::observation::Observation;
use crate::core_types::units::Percent;
use crate::error::RiskError;
use crate::risk::adjustment::{AdjustmentBreakdown, RiskAdjuster};
use crate::risk::level::{RiskLevel, RiskLevelTable};
use crate::risk::precipitation::RainfallBand;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Everything the user enters for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskRequest {
    /// Today's weather readings
    #[serde(flatten)]
    pub observation: Observation,
    /// Recent-precipitation level (0 = driest tier)
    pub recent_level: u8,
}

impl RiskRequest {
    /// Request from an observation and a recent-precipitation level
    pub fn new(observation: Observation, recent_level: u8) -> Self {
        RiskRequest {
            observation,
            recent_level,
        }
    }
}

/// Outcome of one evaluation, ready to render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Raw classifier probability (0-1)
    pub probability: f64,
    /// Probability scaled to percent
    pub base_risk: Percent,
    /// Risk after precipitation and humidity adjustment
    pub adjusted_risk: Percent,
    /// Share of base risk removed, in percent
    pub reduction_percent: Percent,
    /// Base risk minus adjusted risk, in percentage points
    pub reduction_points: Percent,
    /// Factors behind the reduction
    pub breakdown: AdjustmentBreakdown,
    /// Band of today's rainfall
    pub rainfall_band: RainfallBand,
    /// Name of the chosen recent-precipitation tier
    pub recent_tier: &'static str,
    /// Severity level
    pub level: RiskLevel,
    /// Label of the level
    pub label: &'static str,
    /// Display color of the level
    pub color: &'static str,
}

/// Classifier plus adjustment and level configuration.
#[derive(Debug, Clone)]
pub struct RiskEvaluator<C> {
    classifier: C,
    adjuster: RiskAdjuster,
    levels: RiskLevelTable,
}

impl RiskEvaluator<SharedModel> {
    /// Evaluator over the process-wide reference model with canonical settings
    pub fn shared() -> Self {
        RiskEvaluator::new(SharedModel)
    }
}

impl<C: Classifier> RiskEvaluator<C> {
    /// Evaluator with canonical adjustment and level table
    pub fn new(classifier: C) -> Self {
        RiskEvaluator {
            classifier,
            adjuster: RiskAdjuster::canonical(),
            levels: RiskLevelTable::canonical(),
        }
    }

    /// Replace the adjuster
    pub fn with_adjuster(mut self, adjuster: RiskAdjuster) -> Self {
        self.adjuster = adjuster;
        self
    }

    /// Replace the level table
    pub fn with_levels(mut self, levels: RiskLevelTable) -> Self {
        self.levels = levels;
        self
    }

    /// Active adjuster
    pub fn adjuster(&self) -> &RiskAdjuster {
        &self.adjuster
    }

    /// Active level table
    pub fn levels(&self) -> &RiskLevelTable {
        &self.levels
    }

    /// Wrapped classifier
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Evaluate one request.
    ///
    /// # Errors
    /// - [`RiskError::InvalidInput`] if any observation field or the recent
    ///   level is out of range. The classifier is not called.
    /// - [`RiskError::ModelUnavailable`] if the classifier fails or returns
    ///   something other than a probability.
    pub fn evaluate(&self, request: &RiskRequest) -> Result<RiskAssessment, RiskError> {
        let observation = &request.observation;
        let tier = observation
            .validate()
            .and_then(|()| self.adjuster.recent_tier(request.recent_level))
            .inspect_err(|e| warn!(error = %e, "rejected risk request"))?;

        let probability = self.classifier.predict(observation)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(RiskError::model(format!(
                "classifier returned {probability}, expected a probability in [0, 1]"
            )));
        }

        let base_risk = Percent::new(probability * 100.0);
        let adjustment = self.adjuster.adjust(
            base_risk,
            observation.rainfall,
            request.recent_level,
            observation.humidity,
        )?;
        let band = self.levels.classify(*adjustment.adjusted_risk);

        debug!(
            probability,
            base_risk = *base_risk,
            adjusted_risk = *adjustment.adjusted_risk,
            level = band.label(),
            "evaluated fire risk"
        );

        Ok(RiskAssessment {
            probability,
            base_risk,
            adjusted_risk: adjustment.adjusted_risk,
            reduction_percent: adjustment.reduction_percent(),
            reduction_points: adjustment.reduction_points(),
            breakdown: adjustment.breakdown,
            rainfall_band: RainfallBand::classify(observation.rainfall),
            recent_tier: tier.name,
            level: band.level,
            label: band.label(),
            color: band.color,
        })
    }
}

/// Evaluate a request against the shared model with canonical settings.
///
/// # Errors
/// See [`RiskEvaluator::evaluate`].
pub fn assess(request: &RiskRequest) -> Result<RiskAssessment, RiskError> {
    RiskEvaluator::shared().evaluate(request)
}
