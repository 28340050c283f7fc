use crate::hierarchy::{Hierarchy, HierarchyNode};
use crate::models::*;
use crate::table::MeasurementTable;

/// Measurement table used throughout the tests. `B.1.1` has no value for `s2` and `B.1.2` is
/// absent.
pub(crate) const TEST_TABLE: &str = "\
# test abundances
entry\ts1\ts2
A.1\t1\t2
A.2\t3\t4
B.1.1\t5\t
B.2\t1\t1
C\t7\t8
Z\t9\t9
";

/// Create the test hierarchy:
///
/// ```text
/// root
/// ├── A
/// │   ├── A.1
/// │   └── A.2
/// ├── B
/// │   ├── B.1
/// │   │   ├── B.1.1
/// │   │   └── B.1.2
/// │   └── B.2
/// └── *Undefined*
///     └── C
/// ```
pub(crate) fn get_test_hierarchy() -> Hierarchy {
    Hierarchy::new(vec![HierarchyNode::internal(
        "root",
        vec![
            HierarchyNode::internal(
                "A",
                vec![HierarchyNode::leaf("A.1"), HierarchyNode::leaf("A.2")],
            ),
            HierarchyNode::internal(
                "B",
                vec![
                    HierarchyNode::internal(
                        "B.1",
                        vec![HierarchyNode::leaf("B.1.1"), HierarchyNode::leaf("B.1.2")],
                    ),
                    HierarchyNode::leaf("B.2"),
                ],
            ),
            HierarchyNode::internal("*Undefined*", vec![HierarchyNode::leaf("C")]),
        ],
    )])
}

/// Create the test measurement table from [TEST_TABLE].
pub(crate) fn get_test_table() -> MeasurementTable {
    MeasurementTable::from_reader(TEST_TABLE.as_bytes(), None).unwrap()
}

/// Create an AnalysisRequest with the default methods.
pub(crate) fn get_test_analysis_request() -> AnalysisRequest {
    AnalysisRequest::new(Method::DEFAULT.to_vec(), "KEGG")
}
