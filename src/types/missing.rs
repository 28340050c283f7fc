//! Missing data descriptors
//!
//! Uploaded tables may encode "no measurement" with sentinel values rather than empty cells.
//! There are multiple ways to describe the missing data. Currently we support:
//!
//! * A single missing value
//! * Multiple missing values
//! * A valid minimum value
//! * A valid maximum value
//! * A valid range of values
//!
//! Cells matched by the descriptor are treated exactly like empty cells.

use serde::{Deserialize, Serialize};
use validator::ValidationError;

/// Missing data
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Missing {
    /// A single missing value
    MissingValue(f64),
    /// Multple missing values
    MissingValues(Vec<f64>),
    /// Valid minimum
    ValidMin(f64),
    /// Valid maxiumum
    ValidMax(f64),
    /// Valid range
    ValidRange(f64, f64),
}

impl Missing {
    /// Build a descriptor from separately supplied sentinel values and bounds.
    ///
    /// Returns `None` when nothing was supplied. Sentinel values take precedence over bounds,
    /// and a minimum and maximum together form a valid range.
    pub fn from_parts(
        missing_values: &[f64],
        valid_min: Option<f64>,
        valid_max: Option<f64>,
    ) -> Option<Self> {
        match (missing_values, valid_min, valid_max) {
            ([value], _, _) => Some(Missing::MissingValue(*value)),
            ([_, _, ..], _, _) => Some(Missing::MissingValues(missing_values.to_vec())),
            ([], Some(min), Some(max)) => Some(Missing::ValidRange(min, max)),
            ([], Some(min), None) => Some(Missing::ValidMin(min)),
            ([], None, Some(max)) => Some(Missing::ValidMax(max)),
            ([], None, None) => None,
        }
    }

    /// Validate the descriptor.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let values: &[f64] = match self {
            Missing::MissingValue(value) => std::slice::from_ref(value),
            Missing::MissingValues(values) => values,
            Missing::ValidMin(min) => std::slice::from_ref(min),
            Missing::ValidMax(max) => std::slice::from_ref(max),
            Missing::ValidRange(min, max) => {
                if min >= max {
                    let mut error =
                        ValidationError::new("Missing data valid range min must be less than max");
                    error.add_param("min".into(), min);
                    error.add_param("max".into(), max);
                    return Err(error);
                };
                return Ok(());
            }
        };
        if values.iter().any(|value| value.is_nan()) {
            return Err(ValidationError::new(
                "Missing data descriptor must not contain NaN",
            ));
        }
        Ok(())
    }

    /// Check whether the provided value is a 'missing' value
    pub fn is_missing(&self, x: &f64) -> bool {
        match self {
            Missing::MissingValue(value) => x == value,
            Missing::MissingValues(values) => values.contains(x),
            Missing::ValidMin(min) => x < min,
            Missing::ValidMax(max) => x > max,
            Missing::ValidRange(min, max) => x < min || x > max,
        }
    }
}
