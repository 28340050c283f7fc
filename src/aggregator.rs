//! Abundance aggregation over a functional hierarchy.
//!
//! Leaf measurements are rolled up the hierarchy: every leaf takes its own row of the
//! measurement table and every internal node takes the column-wise reduction of the rows of all
//! of its leaf descendants.

use hashbrown::HashSet;
use ndarray::{s, Array2};
use tracing::{event, Level};

use crate::hierarchy::HierarchyNode;
use crate::models::Method;
use crate::table::{MeasurementTable, ResultTable};

/// Compute one row per hierarchy node by aggregating leaf measurements with `method`.
///
/// Nodes are visited in the given order. A node is skipped if its entry was already visited
/// or is a placeholder (starts with `*`); the first node with a given entry wins even if it
/// has no data. A leaf takes its row of `table`. An internal node reduces the rows of those of
/// its leaf descendants that are present in `table`. Nodes without any data are left out of
/// the result and remaining missing cells are zero.
///
/// Lookup failures are not errors: they leave the node without data.
///
/// # Arguments
///
/// * `table`: Leaf measurements
/// * `nodes`: Flattened hierarchy, see [Hierarchy::flatten](crate::hierarchy::Hierarchy::flatten)
/// * `method`: Aggregation method for internal nodes
#[tracing::instrument(level = "DEBUG", skip(table, nodes), fields(nodes = nodes.len()))]
pub fn calc_abundances(
    table: &MeasurementTable,
    nodes: &[&HierarchyNode],
    method: Method,
) -> ResultTable {
    let reduce = method.reducer();
    let mut rows = Array2::from_elem((nodes.len(), table.columns().len()), f64::NAN);
    let mut entries: Vec<String> = Vec::with_capacity(nodes.len());
    let mut visited: HashSet<&str> = HashSet::with_capacity(nodes.len());

    for node in nodes {
        let entry = node.entry();
        if node.is_placeholder() {
            continue;
        }
        if !visited.insert(entry) {
            // Repeated entries keep their first value, even if it was empty.
            event!(Level::TRACE, "Skipping repeated node {}", entry);
            continue;
        }

        let mut row = rows.row_mut(entries.len());
        match node {
            HierarchyNode::Leaf { .. } => {
                if let Some(values) = table.row(entry) {
                    row.assign(&values);
                }
            }
            HierarchyNode::Internal { .. } => {
                let targets = node.leaves().map(HierarchyNode::entry);
                if let Some(selected) = table.select(targets) {
                    row.assign(&reduce(selected.view()));
                }
            }
        }
        entries.push(entry.to_string());
    }

    let result = ResultTable::from_sparse_rows(
        table.columns().to_vec(),
        entries,
        rows.slice(s![..visited.len(), ..]),
    );
    event!(
        Level::DEBUG,
        "Aggregated {} of {} nodes by {}",
        result.len(),
        nodes.len(),
        method
    );
    result
}

/// Result tables keyed by aggregation method
///
/// Methods keep the order in which their tables were inserted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultsCollection {
    results: Vec<(Method, ResultTable)>,
}

impl ResultsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the table of a method, returning the table it replaces.
    pub fn insert(&mut self, method: Method, table: ResultTable) -> Option<ResultTable> {
        match self.results.iter_mut().find(|(m, _)| *m == method) {
            Some((_, existing)) => Some(std::mem::replace(existing, table)),
            None => {
                self.results.push((method, table));
                None
            }
        }
    }

    pub fn get(&self, method: Method) -> Option<&ResultTable> {
        self.results
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, table)| table)
    }

    /// Methods in insertion order.
    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        self.results.iter().map(|(method, _)| *method)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Method, &ResultTable)> {
        self.results.iter().map(|(method, table)| (*method, table))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
