//! Analysis driver.
//!
//! Ties the inputs together: validates the request, flattens the hierarchy once, aggregates the
//! measurements for every requested method and assembles the profile.

use std::path::Path;

use rayon::prelude::*;
use tracing::{event, Level};
use validator::Validate;

use crate::aggregator::{calc_abundances, ResultsCollection};
use crate::compression;
use crate::error::FuncTreeError;
use crate::hierarchy::{Hierarchy, HierarchyNode};
use crate::models::{AnalysisRequest, Compression, Method};
use crate::profile::Profile;
use crate::table::{MeasurementTable, ResultTable};
use crate::types::Missing;

/// Parse a list of method names against the allow-list.
pub fn parse_methods<S: AsRef<str>>(names: &[S]) -> Result<Vec<Method>, FuncTreeError> {
    names
        .iter()
        .map(|name| Method::from_name(name.as_ref()))
        .collect()
}

/// Read a hierarchy JSON document from a file.
#[tracing::instrument(level = "DEBUG")]
pub fn read_hierarchy(path: &Path) -> Result<Hierarchy, FuncTreeError> {
    let data = std::fs::read(path)?;
    let hierarchy = Hierarchy::from_slice(&data)?;
    event!(
        Level::DEBUG,
        "Loaded hierarchy with {} roots and depth {}",
        hierarchy.roots().len(),
        hierarchy.depth()
    );
    Ok(hierarchy)
}

/// Read a measurement table from a file, decompressing it first if requested.
#[tracing::instrument(level = "DEBUG")]
pub fn read_table(
    path: &Path,
    compression: Option<Compression>,
    missing: Option<&Missing>,
) -> Result<MeasurementTable, FuncTreeError> {
    if let Some(missing) = missing {
        missing.validate().map_err(FuncTreeError::InvalidMissing)?;
    }
    let data = std::fs::read(path)?;
    let data = match compression {
        Some(compression) => compression::decompress(compression, &data)?,
        None => data,
    };
    MeasurementTable::from_reader(data.as_slice(), missing)
}

/// Aggregate `table` over `nodes` once per method.
///
/// The methods are independent of each other, so with `use_rayon` they are computed in
/// parallel. Results are collected in the order of `methods` either way.
pub fn compute_results(
    methods: &[Method],
    table: &MeasurementTable,
    nodes: &[&HierarchyNode],
    use_rayon: bool,
) -> ResultsCollection {
    let tables: Vec<ResultTable> = if use_rayon {
        methods
            .par_iter()
            .map(|method| calc_abundances(table, nodes, *method))
            .collect()
    } else {
        methods
            .iter()
            .map(|method| calc_abundances(table, nodes, *method))
            .collect()
    };
    let mut results = ResultsCollection::new();
    for (method, table) in methods.iter().zip(tables) {
        results.insert(*method, table);
    }
    results
}

/// Map a measurement table onto a hierarchy and build a profile.
///
/// # Arguments
///
/// * `request`: Methods and metadata of the analysis
/// * `hierarchy`: Functional hierarchy
/// * `table`: Leaf measurements
/// * `use_rayon`: Whether to compute the methods in parallel
#[tracing::instrument(level = "INFO", skip_all, fields(target = %request.target))]
pub fn perform_basic(
    request: &AnalysisRequest,
    hierarchy: &Hierarchy,
    table: &MeasurementTable,
    use_rayon: bool,
) -> Result<Profile, FuncTreeError> {
    request.validate()?;
    let nodes = hierarchy.flatten();

    let mapped = nodes
        .iter()
        .filter(|node| node.is_leaf() && table.row(node.entry()).is_some())
        .map(|node| node.entry())
        .collect::<hashbrown::HashSet<_>>()
        .len();
    if mapped < table.len() {
        event!(
            Level::WARN,
            "{} of {} table entries are not leaves of the hierarchy",
            table.len() - mapped,
            table.len()
        );
    }

    let results = compute_results(&request.methods, table, &nodes, use_rayon);
    let profile = Profile::from_results(request, &results);
    event!(
        Level::INFO,
        "Computed {} series over {} nodes",
        profile.series.len(),
        profile.profile.len()
    );
    Ok(profile)
}
