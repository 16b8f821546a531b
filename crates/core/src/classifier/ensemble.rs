//! Gradient-boosted ensemble of oblivious decision trees
//!
//! An oblivious (symmetric) tree uses the same split for every node on a
//! level, so a tree of depth `d` is just `d` splits and `2^d` leaf values.
//! Evaluating it means computing one bit per split and reading the leaf at
//! the resulting index:
//!
//! ```text
//! leaf_index = Σ (split_i fires) << i
//! raw_score  = bias + scale × Σ tree.leaf_values[leaf_index]
//! p(fire)    = 1 / (1 + e^-raw_score)
//! ```
//!
//! Splits test either a continuous feature against a border (`value > border`)
//! or a categorical field for equality with one value (one-hot split).

use crate::classifier::Classifier;
use crate::core_types::observation::{HourOfDay, Month, Observation, WindDirection};
use crate::error::RiskError;
use serde::Serialize;

/// Deepest tree accepted by [`ObliviousEnsemble::validate`]
pub const MAX_TREE_DEPTH: usize = 10;

/// Continuous observation fields, in training column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatFeature {
    /// Air temperature (°C)
    Temperature,
    /// Current rainfall (mm)
    Rainfall,
    /// Wind speed (m/s)
    WindSpeed,
    /// Relative humidity (%)
    Humidity,
    /// Dew point (°C)
    DewPoint,
    /// Pressure (hPa)
    Pressure,
}

impl FloatFeature {
    /// Position in [`Observation::float_features`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One split shared by every node on a tree level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Split {
    /// Fires when the feature is strictly greater than `border`
    Border {
        /// Feature tested
        feature: FloatFeature,
        /// Threshold
        border: f64,
    },
    /// Fires in the given month
    Month {
        /// Month matched
        month: Month,
    },
    /// Fires at the given hour
    Hour {
        /// Hour matched
        hour: HourOfDay,
    },
    /// Fires for the given wind direction
    WindDirection {
        /// Direction matched
        direction: WindDirection,
    },
}

impl Split {
    #[inline]
    fn fires(&self, observation: &Observation, floats: &[f64; 6]) -> bool {
        match *self {
            Split::Border { feature, border } => floats[feature.index()] > border,
            Split::Month { month } => observation.month == month,
            Split::Hour { hour } => observation.hour == hour,
            Split::WindDirection { direction } => observation.wind_direction == direction,
        }
    }
}

/// Symmetric decision tree: `splits.len()` levels, `2^depth` leaves
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObliviousTree {
    splits: Vec<Split>,
    leaf_values: Vec<f64>,
}

impl ObliviousTree {
    /// Assemble a tree; shape is checked by [`ObliviousEnsemble::validate`].
    pub fn new(splits: Vec<Split>, leaf_values: Vec<f64>) -> Self {
        ObliviousTree {
            splits,
            leaf_values,
        }
    }

    /// Number of levels
    pub fn depth(&self) -> usize {
        self.splits.len()
    }

    /// Splits from the first level down
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Leaf values indexed by the split bit pattern
    pub fn leaf_values(&self) -> &[f64] {
        &self.leaf_values
    }

    fn leaf_index(&self, observation: &Observation, floats: &[f64; 6]) -> usize {
        self.splits
            .iter()
            .enumerate()
            .fold(0, |index, (level, split)| {
                // Levels past the width of usize cannot address a leaf.
                let fired = usize::from(split.fires(observation, floats));
                let bit = u32::try_from(level)
                    .ok()
                    .and_then(|shift| fired.checked_shl(shift))
                    .unwrap_or(0);
                index | bit
            })
    }

    fn check_shape(&self, position: usize) -> Result<(), RiskError> {
        let depth = self.depth();
        if depth > MAX_TREE_DEPTH {
            return Err(RiskError::model(format!(
                "tree {position} has depth {depth}, maximum is {MAX_TREE_DEPTH}"
            )));
        }
        let expected = 1usize << depth;
        if self.leaf_values.len() != expected {
            return Err(RiskError::model(format!(
                "tree {position} has {} leaves, expected {expected}",
                self.leaf_values.len()
            )));
        }
        if let Some(value) = self.leaf_values.iter().find(|v| !v.is_finite()) {
            return Err(RiskError::model(format!(
                "tree {position} has non-finite leaf value {value}"
            )));
        }
        let bad_border = self.splits.iter().any(|split| match split {
            Split::Border { border, .. } => !border.is_finite(),
            _ => false,
        });
        if bad_border {
            return Err(RiskError::model(format!(
                "tree {position} has a non-finite split border"
            )));
        }
        Ok(())
    }
}

/// Binary classifier built from boosted oblivious trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObliviousEnsemble {
    name: String,
    bias: f64,
    scale: f64,
    trees: Vec<ObliviousTree>,
}

impl ObliviousEnsemble {
    /// Assemble an ensemble. Call [`ObliviousEnsemble::validate`] before use.
    pub fn new(name: impl Into<String>, bias: f64, scale: f64, trees: Vec<ObliviousTree>) -> Self {
        ObliviousEnsemble {
            name: name.into(),
            bias,
            scale,
            trees,
        }
    }

    /// Identifier of the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trees in boosting order
    pub fn trees(&self) -> &[ObliviousTree] {
        &self.trees
    }

    /// Depth of the deepest tree
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(ObliviousTree::depth).max().unwrap_or(0)
    }

    /// Check that the ensemble can be evaluated.
    ///
    /// # Errors
    /// Returns [`RiskError::ModelUnavailable`] if there are no trees, a tree's
    /// leaf count does not match its depth, or any number is non-finite.
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.trees.is_empty() {
            return Err(RiskError::model(format!("model '{}' has no trees", self.name)));
        }
        if !self.bias.is_finite() || !self.scale.is_finite() {
            return Err(RiskError::model(format!(
                "model '{}' has non-finite bias or scale",
                self.name
            )));
        }
        for (position, tree) in self.trees.iter().enumerate() {
            tree.check_shape(position)?;
        }
        Ok(())
    }

    /// Raw additive score (log-odds) for an observation.
    pub fn raw_score(&self, observation: &Observation) -> f64 {
        let floats = observation.float_features();
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| {
                tree.leaf_values
                    .get(tree.leaf_index(observation, &floats))
                    .copied()
                    .unwrap_or(0.0)
            })
            .sum();
        self.bias + self.scale * total
    }
}

impl Classifier for ObliviousEnsemble {
    fn predict(&self, observation: &Observation) -> Result<f64, RiskError> {
        let depth = self.max_depth();
        if depth > MAX_TREE_DEPTH {
            return Err(RiskError::model(format!(
                "model '{}' has a tree of depth {depth}, maximum is {MAX_TREE_DEPTH}",
                self.name
            )));
        }
        let raw = self.raw_score(observation);
        let probability = 1.0 / (1.0 + (-raw).exp());
        if probability.is_finite() {
            Ok(probability)
        } else {
            Err(RiskError::model(format!(
                "model '{}' produced a non-finite score",
                self.name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Millimeters, Percent};
    use approx::assert_relative_eq;

    fn humidity_split(border: f64) -> Split {
        Split::Border {
            feature: FloatFeature::Humidity,
            border,
        }
    }

    fn tiny_model() -> ObliviousEnsemble {
        ObliviousEnsemble::new(
            "tiny",
            0.0,
            1.0,
            vec![
                ObliviousTree::new(
                    vec![
                        humidity_split(40.0),
                        Split::Border {
                            feature: FloatFeature::Rainfall,
                            border: 0.0,
                        },
                    ],
                    vec![1.0, -0.5, -1.0, -2.0],
                ),
                ObliviousTree::new(
                    vec![Split::WindDirection {
                        direction: WindDirection::West,
                    }],
                    vec![0.0, 0.5],
                ),
            ],
        )
    }

    #[test]
    fn test_leaf_index_bits() {
        let model = tiny_model();
        let dry = Observation {
            humidity: Percent::new(30.0),
            ..Observation::default()
        };
        assert_relative_eq!(model.raw_score(&dry), 1.0);

        let humid = Observation {
            humidity: Percent::new(50.0),
            ..Observation::default()
        };
        assert_relative_eq!(model.raw_score(&humid), -0.5);

        let humid_rain = Observation {
            rainfall: Millimeters::new(2.0),
            wind_direction: WindDirection::West,
            ..humid
        };
        assert_relative_eq!(model.raw_score(&humid_rain), -1.5);
    }

    #[test]
    fn test_probability_is_sigmoid_of_score() {
        let model = tiny_model();
        let obs = Observation {
            humidity: Percent::new(30.0),
            ..Observation::default()
        };
        let p = model.predict(&obs).unwrap();
        assert_relative_eq!(p, 1.0 / (1.0 + (-1.0f64).exp()), epsilon = 1e-12);
    }

    #[test]
    fn test_overdeep_tree_is_refused_without_panicking() {
        let deep = ObliviousEnsemble::new(
            "deep",
            0.0,
            1.0,
            vec![ObliviousTree::new(
                (0..70).map(|i| humidity_split(f64::from(i))).collect(),
                vec![0.25; 4],
            )],
        );
        let soaked = Observation {
            humidity: Percent::new(100.0),
            ..Observation::default()
        };
        assert!(deep.raw_score(&soaked).is_finite());
        assert!(matches!(
            deep.predict(&soaked),
            Err(RiskError::ModelUnavailable(_))
        ));
        assert!(deep.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_well_formed_model() {
        assert!(tiny_model().validate().is_ok());
        assert_eq!(tiny_model().max_depth(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let empty = ObliviousEnsemble::new("empty", 0.0, 1.0, vec![]);
        assert!(matches!(empty.validate(), Err(RiskError::ModelUnavailable(_))));

        let wrong_leaves = ObliviousEnsemble::new(
            "wrong",
            0.0,
            1.0,
            vec![ObliviousTree::new(vec![humidity_split(50.0)], vec![0.1])],
        );
        assert!(matches!(
            wrong_leaves.validate(),
            Err(RiskError::ModelUnavailable(_))
        ));

        let nan_leaf = ObliviousEnsemble::new(
            "nan",
            0.0,
            1.0,
            vec![ObliviousTree::new(
                vec![humidity_split(50.0)],
                vec![0.1, f64::NAN],
            )],
        );
        assert!(nan_leaf.validate().is_err());

        let nan_border = ObliviousEnsemble::new(
            "border",
            0.0,
            1.0,
            vec![ObliviousTree::new(
                vec![humidity_split(f64::NAN)],
                vec![0.1, 0.2],
            )],
        );
        assert!(nan_border.validate().is_err());

        let bad_bias = ObliviousEnsemble::new("bias", f64::INFINITY, 1.0, tiny_model().trees);
        assert!(bad_bias.validate().is_err());
    }
}
