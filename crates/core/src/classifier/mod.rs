//! Fire-event classifier adapter
//!
//! The core treats the classifier as a black box: one observation in, one
//! probability out. Any deterministic model can be plugged in through
//! [`Classifier`]; the crate ships [`ObliviousEnsemble`] with a reference
//! model that is built once per process and shared read-only.

pub mod ensemble;
pub mod reference_model;

pub use ensemble::{FloatFeature, ObliviousEnsemble, ObliviousTree, Split, MAX_TREE_DEPTH};
pub use reference_model::{reference_model, REFERENCE_MODEL_NAME};

use crate::core_types::observation::Observation;
use crate::error::RiskError;
use std::sync::LazyLock;
use tracing::{error, info};

/// Binary classifier returning the probability of a fire event.
///
/// Implementations must be deterministic: the same observation always gives
/// the same probability. Callers never cache predictions.
pub trait Classifier {
    /// Probability in `[0, 1]` that the fire-event label applies.
    ///
    /// # Errors
    /// Returns [`RiskError::ModelUnavailable`] if the model cannot produce a
    /// prediction.
    fn predict(&self, observation: &Observation) -> Result<f64, RiskError>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict(&self, observation: &Observation) -> Result<f64, RiskError> {
        (**self).predict(observation)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, observation: &Observation) -> Result<f64, RiskError> {
        (**self).predict(observation)
    }
}

// Built on first access, never mutated afterwards.
static SHARED_MODEL: LazyLock<Result<ObliviousEnsemble, RiskError>> =
    LazyLock::new(load_reference_model);

fn load_reference_model() -> Result<ObliviousEnsemble, RiskError> {
    let loaded = reference_model()
        .map_err(|e| RiskError::model(e.to_string()))
        .and_then(|model| model.validate().map(|()| model));
    match &loaded {
        Ok(model) => info!(
            model = model.name(),
            trees = model.trees().len(),
            depth = model.max_depth(),
            "loaded fire-event model"
        ),
        Err(e) => error!(error = %e, "fire-event model failed to load"),
    }
    loaded
}

/// Process-wide model, loaded on first call.
///
/// # Errors
/// Returns [`RiskError::ModelUnavailable`] on every call if the model failed
/// to load.
pub fn shared_model() -> Result<&'static ObliviousEnsemble, RiskError> {
    match &*SHARED_MODEL {
        Ok(model) => Ok(model),
        Err(e) => Err(e.clone()),
    }
}

/// Load the shared model now instead of on the first evaluation.
///
/// Intended for process start-up, where a failure should be fatal.
///
/// # Errors
/// Returns [`RiskError::ModelUnavailable`] if the model failed to load.
pub fn preload_model() -> Result<(), RiskError> {
    shared_model().map(|_| ())
}

/// Classifier handle backed by [`shared_model`].
///
/// Zero-sized; load failures surface as [`RiskError::ModelUnavailable`] from
/// each prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SharedModel;

impl Classifier for SharedModel {
    fn predict(&self, observation: &Observation) -> Result<f64, RiskError> {
        shared_model()?.predict(observation)
    }
}
