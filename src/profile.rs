//! Profile documents.
//!
//! A profile is the serialised outcome of an analysis, consumed by the visualisation layer. It
//! holds one series per aggregation method and, for every hierarchy node with data, one row of
//! values per series.

use std::io::Write;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::aggregator::ResultsCollection;
use crate::error::FuncTreeError;
use crate::models::AnalysisRequest;

/// Values of one hierarchy node
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProfileEntry {
    /// Node entry
    pub entry: String,
    /// One row per series, one value per column
    pub values: Vec<Vec<f64>>,
}

/// Analysis result document
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Profile {
    /// Unique identifier (hex encoded UUID v4)
    pub profile_id: String,
    /// Name of the hierarchy the data was mapped onto
    pub target: String,
    /// Free text description
    pub description: String,
    /// Creation time
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
    /// Method name of each series
    pub series: Vec<String>,
    /// Column names of each series
    pub columns: Vec<Vec<String>>,
    /// Per-node values
    pub profile: Vec<ProfileEntry>,
}

impl Profile {
    /// Build a profile from the results of an analysis.
    ///
    /// Entries are listed in the order in which they first appear across the result tables. An
    /// entry that is absent from one series gets zeros for it.
    pub fn from_results(request: &AnalysisRequest, results: &ResultsCollection) -> Self {
        let mut seen = HashSet::new();
        let entries: Vec<&str> = results
            .iter()
            .flat_map(|(_, table)| table.entries())
            .map(String::as_str)
            .filter(|entry| seen.insert(*entry))
            .collect();

        let profile = entries
            .into_iter()
            .map(|entry| ProfileEntry {
                entry: entry.to_string(),
                values: results
                    .iter()
                    .map(|(_, table)| match table.row(entry) {
                        Some(row) => row.to_vec(),
                        None => vec![0.0; table.columns().len()],
                    })
                    .collect(),
            })
            .collect();

        Profile {
            profile_id: Uuid::new_v4().simple().to_string(),
            target: request.target.clone(),
            description: request.description.clone(),
            added_at: OffsetDateTime::now_utc(),
            series: results.methods().map(|method| method.to_string()).collect(),
            columns: results
                .iter()
                .map(|(_, table)| table.columns().to_vec())
                .collect(),
            profile,
        }
    }

    /// Look up the values of an entry.
    pub fn get(&self, entry: &str) -> Option<&ProfileEntry> {
        self.profile.iter().find(|e| e.entry == entry)
    }

    /// Write the profile as a single element JSON array, the upload format of the web layer.
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<(), FuncTreeError> {
        let documents = [self];
        if pretty {
            serde_json::to_writer_pretty(writer, &documents)?;
        } else {
            serde_json::to_writer(writer, &documents)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::calc_abundances;
    use crate::models::Method;
    use crate::test_utils;

    fn test_profile() -> Profile {
        let request = test_utils::get_test_analysis_request();
        let hierarchy = test_utils::get_test_hierarchy();
        let table = test_utils::get_test_table();
        let nodes = hierarchy.flatten();
        let mut results = ResultsCollection::new();
        for method in &request.methods {
            results.insert(*method, calc_abundances(&table, &nodes, *method));
        }
        Profile::from_results(&request, &results)
    }

    #[test]
    fn from_results() {
        let profile = test_profile();
        assert_eq!(vec!["sum", "mean", "max"], profile.series);
        assert_eq!(vec![vec!["s1", "s2"]; 3], profile.columns);
        assert_eq!("KEGG", profile.target);
        assert_eq!(32, profile.profile_id.len());
        let entries: Vec<&str> = profile.profile.iter().map(|e| e.entry.as_str()).collect();
        assert_eq!(
            vec!["root", "A", "A.1", "A.2", "B", "B.1", "B.1.1", "B.2", "C"],
            entries
        );
        assert_eq!(
            vec![vec![4.0, 6.0], vec![2.0, 3.0], vec![3.0, 4.0]],
            profile.get("A").unwrap().values
        );
        assert_eq!(None, profile.get("*Undefined*"));
    }

    #[test]
    fn absent_entry_gets_zeros() {
        let request = AnalysisRequest::new(vec![Method::Sum, Method::Max], "KEGG");
        let table = test_utils::get_test_table();
        let a = crate::hierarchy::HierarchyNode::leaf("A.1");
        let z = crate::hierarchy::HierarchyNode::leaf("Z");
        let mut results = ResultsCollection::new();
        results.insert(Method::Sum, calc_abundances(&table, &[&a], Method::Sum));
        results.insert(Method::Max, calc_abundances(&table, &[&z], Method::Max));
        let profile = Profile::from_results(&request, &results);
        assert_eq!(
            vec![vec![1.0, 2.0], vec![0.0, 0.0]],
            profile.get("A.1").unwrap().values
        );
        assert_eq!(
            vec![vec![0.0, 0.0], vec![9.0, 9.0]],
            profile.get("Z").unwrap().values
        );
    }

    #[test]
    fn write_json() {
        let profile = test_profile();
        let mut buf = Vec::new();
        profile.write_json(&mut buf, false).unwrap();
        let documents: Vec<Profile> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(vec![profile], documents);
    }

    #[test]
    fn write_json_pretty() {
        let profile = test_profile();
        let mut buf = Vec::new();
        profile.write_json(&mut buf, true).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.starts_with("[\n  {\n    \"profile_id\""));
        assert!(json.contains("\"series\": [\n      \"sum\",\n      \"mean\",\n      \"max\"\n    ]"));
    }
}
