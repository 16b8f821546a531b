//! Reference fire-event model compiled into the crate
//!
//! Ten shallow oblivious trees over the nine observation fields. Dry air,
//! heat, wind and the spring fire season push the score up; rain, humid air
//! and a small gap between temperature and dew point push it down.

use crate::classifier::ensemble::{FloatFeature, ObliviousEnsemble, ObliviousTree, Split};
use crate::core_types::observation::{HourOfDay, Month, WindDirection};
use crate::error::RiskError;

/// Name reported by the reference model
pub const REFERENCE_MODEL_NAME: &str = "reference-fire-event-v1";

fn border(feature: FloatFeature, border: f64) -> Split {
    Split::Border { feature, border }
}

fn month(value: u8) -> Result<Split, RiskError> {
    Ok(Split::Month {
        month: Month::new(value)?,
    })
}

fn hour(value: u8) -> Result<Split, RiskError> {
    Ok(Split::Hour {
        hour: HourOfDay::new(value)?,
    })
}

fn wind(direction: WindDirection) -> Split {
    Split::WindDirection { direction }
}

/// Build the reference ensemble.
///
/// # Errors
/// Returns [`RiskError::InvalidInput`] only if a categorical constant in the
/// table is out of range.
pub fn reference_model() -> Result<ObliviousEnsemble, RiskError> {
    use FloatFeature::{DewPoint, Humidity, Pressure, Rainfall, Temperature, WindSpeed};

    let trees = vec![
        // dry air
        ObliviousTree::new(
            vec![border(Humidity, 40.0), border(Humidity, 60.0)],
            vec![1.1, 0.1, 0.0, -0.9],
        ),
        // heat
        ObliviousTree::new(
            vec![border(Temperature, 20.0), border(Temperature, 30.0)],
            vec![-0.6, 0.2, 0.0, 0.7],
        ),
        // wind
        ObliviousTree::new(
            vec![border(WindSpeed, 4.0), border(WindSpeed, 8.0)],
            vec![-0.2, 0.4, 0.0, 0.8],
        ),
        // rain on the day
        ObliviousTree::new(
            vec![border(Rainfall, 0.0), border(Rainfall, 5.0)],
            vec![0.2, -0.8, 0.0, -1.5],
        ),
        // spring fire season
        ObliviousTree::new(
            vec![month(3)?, month(4)?, month(5)?],
            vec![-0.2, 0.9, 0.8, 0.0, 0.4, 0.0, 0.0, 0.0],
        ),
        // late winter and late autumn
        ObliviousTree::new(vec![month(2)?, month(11)?], vec![-0.05, 0.3, 0.3, 0.0]),
        // afternoon peak
        ObliviousTree::new(
            vec![hour(13)?, hour(14)?, hour(15)?],
            vec![-0.1, 0.35, 0.45, 0.0, 0.35, 0.0, 0.0, 0.0],
        ),
        // dew point depression
        ObliviousTree::new(
            vec![border(DewPoint, 10.0), border(Temperature, 25.0)],
            vec![0.1, -0.3, 0.5, 0.0],
        ),
        // dry downslope westerlies
        ObliviousTree::new(
            vec![wind(WindDirection::West), wind(WindDirection::SouthWest)],
            vec![0.0, 0.3, 0.25, 0.0],
        ),
        // passing lows
        ObliviousTree::new(
            vec![border(Pressure, 1005.0), border(Pressure, 1020.0)],
            vec![0.1, 0.0, 0.0, -0.1],
        ),
    ];

    Ok(ObliviousEnsemble::new(REFERENCE_MODEL_NAME, -1.2, 1.0, trees))
}
