use crate::models::Method;
use crate::operations;

use ndarray::{Array1, ArrayView2};

/// Trait for aggregation methods.
///
/// This forms the contract between the aggregator and the numerical reductions.
pub trait Reduction {
    /// Reduce a set of rows to a single row, column by column.
    ///
    /// Missing (NaN) cells are ignored. A column without any defined cell reduces to NaN.
    ///
    /// # Arguments
    ///
    /// * `rows`: Matched table rows, one row per entry and one column per sample.
    fn reduce(rows: ArrayView2<f64>) -> Array1<f64>;
}

/// Signature shared by all [Reduction::reduce] implementations.
pub type ReduceFn = fn(ArrayView2<f64>) -> Array1<f64>;

impl Method {
    /// Returns the reduction implementing this method.
    pub fn reducer(self) -> ReduceFn {
        match self {
            Method::Sum => operations::Sum::reduce,
            Method::Mean => operations::Mean::reduce,
            Method::Min => operations::Min::reduce,
            Method::Max => operations::Max::reduce,
            Method::Median => operations::Median::reduce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    struct TestOp {}

    impl Reduction for TestOp {
        fn reduce(rows: ArrayView2<f64>) -> Array1<f64> {
            // Return the first row.
            rows.row(0).to_owned()
        }
    }

    #[test]
    fn reduction_as_reduce_fn() {
        let reduce: ReduceFn = TestOp::reduce;
        let rows = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(array![1.0, 2.0], reduce(rows.view()));
    }

    #[test]
    fn every_method_has_a_reducer() {
        let rows = array![[1.0, 6.0], [3.0, 2.0], [5.0, 4.0]];
        let expected = [
            (Method::Sum, array![9.0, 12.0]),
            (Method::Mean, array![3.0, 4.0]),
            (Method::Min, array![1.0, 2.0]),
            (Method::Max, array![5.0, 6.0]),
            (Method::Median, array![3.0, 4.0]),
        ];
        assert_eq!(Method::ALL.len(), expected.len());
        for (method, expected) in expected {
            assert_eq!(expected, method.reducer()(rows.view()), "{}", method);
        }
    }
}
