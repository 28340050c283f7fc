//! Command Line Interface (CLI) arguments.

use clap::Parser;
use validator::Validate;

use crate::analysis;
use crate::error::FuncTreeError;
use crate::models::{AnalysisRequest, Compression};
use crate::types::Missing;

/// FuncTree command line interface
///
/// Maps a table of leaf abundances onto a functional hierarchy and writes the aggregated
/// profile as JSON.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct CommandLineArgs {
    /// Path to the hierarchy JSON document
    #[arg(long, env = "FUNCTREE_TREE")]
    pub tree: String,
    /// Path to the tab separated measurement table
    #[arg(long, env = "FUNCTREE_INPUT")]
    pub input: String,
    /// Path to which the profile is written. Standard output if not set
    #[arg(long, env = "FUNCTREE_OUTPUT")]
    pub output: Option<String>,
    /// Comma separated aggregation methods (sum, mean, min, max, median)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "sum,mean,max",
        env = "FUNCTREE_METHODS"
    )]
    pub methods: Vec<String>,
    /// Compression of the measurement table
    #[arg(long, value_enum, env = "FUNCTREE_COMPRESSION")]
    pub compression: Option<Compression>,
    /// Comma separated values which denote a missing measurement
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        env = "FUNCTREE_MISSING_VALUES"
    )]
    pub missing_values: Vec<f64>,
    /// Measurements below this value are treated as missing
    #[arg(long, allow_negative_numbers = true, env = "FUNCTREE_VALID_MIN")]
    pub valid_min: Option<f64>,
    /// Measurements above this value are treated as missing
    #[arg(long, allow_negative_numbers = true, env = "FUNCTREE_VALID_MAX")]
    pub valid_max: Option<f64>,
    /// Name of the hierarchy the data is mapped onto
    #[arg(long, default_value = "KEGG", env = "FUNCTREE_TARGET")]
    pub target: String,
    /// Free text description stored in the profile
    #[arg(long, default_value = "", env = "FUNCTREE_DESCRIPTION")]
    pub description: String,
    /// Whether to indent the JSON output
    #[arg(long, default_value_t = false, env = "FUNCTREE_PRETTY")]
    pub pretty: bool,
    /// Whether to use Rayon to compute the methods in parallel.
    #[arg(long, default_value_t = false, env = "FUNCTREE_USE_RAYON")]
    pub use_rayon: bool,
}

impl CommandLineArgs {
    /// Missing data descriptor assembled from the arguments, if any.
    pub fn missing(&self) -> Option<Missing> {
        Missing::from_parts(&self.missing_values, self.valid_min, self.valid_max)
    }

    /// Analysis request assembled from the arguments.
    ///
    /// Method names are checked against the allow-list and the request is validated here,
    /// before any data is loaded.
    pub fn request(&self) -> Result<AnalysisRequest, FuncTreeError> {
        let request = AnalysisRequest {
            methods: analysis::parse_methods(&self.methods)?,
            target: self.target.clone(),
            description: self.description.clone(),
        };
        request.validate()?;
        Ok(request)
    }
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Method;

    fn parse_from(extra: &[&str]) -> CommandLineArgs {
        let args = ["functree", "--tree", "tree.json", "--input", "input.tsv"];
        CommandLineArgs::try_parse_from(args.iter().chain(extra)).unwrap()
    }

    #[test]
    fn defaults() {
        let args = parse_from(&[]);
        assert_eq!("tree.json", args.tree);
        assert_eq!("input.tsv", args.input);
        assert_eq!(None, args.output);
        assert_eq!(vec!["sum", "mean", "max"], args.methods);
        assert_eq!(None, args.compression);
        assert_eq!(None, args.missing());
        assert!(!args.pretty);
        assert!(!args.use_rayon);
        let request = args.request().unwrap();
        assert_eq!(Method::DEFAULT.to_vec(), request.methods);
        assert_eq!("KEGG", request.target);
    }

    #[test]
    fn methods_and_compression() {
        let args = parse_from(&["--methods", "median,min", "--compression", "gzip"]);
        assert_eq!(Some(Compression::Gzip), args.compression);
        assert_eq!(
            vec![Method::Median, Method::Min],
            args.request().unwrap().methods
        );
    }

    #[test]
    fn unsupported_method() {
        let args = parse_from(&["--methods", "sum,__import__"]);
        let err = args.request().unwrap_err();
        assert_eq!("unsupported method __import__", err.to_string());
    }

    #[test]
    fn duplicate_methods() {
        let args = parse_from(&["--methods", "sum,max,sum"]);
        let err = args.request().unwrap_err();
        assert!(matches!(err, FuncTreeError::RequestValidation(_)));
    }

    #[test]
    fn negative_missing_values() {
        let args = parse_from(&["--missing-values", "-1,-999"]);
        assert_eq!(
            Some(Missing::MissingValues(vec![-1.0, -999.0])),
            args.missing()
        );
    }

    #[test]
    fn valid_range() {
        let args = parse_from(&["--valid-min", "-0.5", "--valid-max", "100"]);
        assert_eq!(Some(Missing::ValidRange(-0.5, 100.0)), args.missing());
    }

    #[test]
    fn missing_required() {
        let err = CommandLineArgs::try_parse_from(["functree", "--tree", "tree.json"]).unwrap_err();
        assert_eq!(clap::error::ErrorKind::MissingRequiredArgument, err.kind());
    }
}
