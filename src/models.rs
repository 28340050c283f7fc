//! Data types and associated functions and methods

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use validator::{Validate, ValidationError};

use crate::error::FuncTreeError;

/// Supported aggregation methods
///
/// This is the allow-list of column-wise reductions that may be applied to the rows matched
/// under an internal hierarchy node.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Method {
    /// Arithmetic sum
    Sum,
    /// Arithmetic mean
    Mean,
    /// Minimum
    Min,
    /// Maximum
    Max,
    /// Median (midpoint of the two central values for even counts)
    Median,
}

impl Method {
    /// All supported methods, in their canonical order.
    pub const ALL: [Method; 5] = [
        Method::Sum,
        Method::Mean,
        Method::Min,
        Method::Max,
        Method::Median,
    ];

    /// Methods computed when the caller does not ask for specific ones.
    pub const DEFAULT: [Method; 3] = [Method::Sum, Method::Mean, Method::Max];

    /// Look up a method by name.
    ///
    /// Names are matched case-insensitively after trimming whitespace. Anything outside the
    /// allow-list is rejected.
    pub fn from_name(name: &str) -> Result<Self, FuncTreeError> {
        let wanted = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.to_string() == wanted)
            .ok_or_else(|| FuncTreeError::UnsupportedMethod {
                method: name.to_string(),
            })
    }
}

impl std::str::FromStr for Method {
    type Err = FuncTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Compression algorithm of uploaded measurement tables
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Gzip
    Gzip,
    /// Zlib
    Zlib,
}

/// Parameters of a single analysis run
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct AnalysisRequest {
    /// Aggregation methods, one result series each
    #[validate(
        length(min = 1, message = "methods must not be empty"),
        custom = "validate_methods"
    )]
    pub methods: Vec<Method>,
    /// Name of the hierarchy the data is mapped onto (e.g. KEGG)
    #[validate(length(min = 1, message = "target must not be empty"))]
    pub target: String,
    /// Free text description of the uploaded data
    #[serde(default)]
    pub description: String,
}

impl AnalysisRequest {
    /// Return a new AnalysisRequest with an empty description.
    pub fn new(methods: Vec<Method>, target: &str) -> Self {
        AnalysisRequest {
            methods,
            target: target.to_string(),
            description: String::new(),
        }
    }
}

/// Validate that no method is requested twice
fn validate_methods(methods: &[Method]) -> Result<(), ValidationError> {
    for (i, method) in methods.iter().enumerate() {
        if methods[..i].contains(method) {
            let mut error = ValidationError::new("methods must not contain duplicates");
            error.add_param("method".into(), &method.to_string());
            return Err(error);
        }
    }
    Ok(())
}
