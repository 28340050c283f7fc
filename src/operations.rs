//! Numerical operations.
//!
//! Each aggregation method is implemented as a struct that implements the
//! [Reduction](crate::operation::Reduction) trait. All reductions work column-wise over the
//! rows matched under a hierarchy node and skip missing (NaN) cells.

use crate::operation::Reduction;

use ndarray::{Array1, ArrayView2, Axis};
use ndarray_stats::{interpolate::Midpoint, QuantileExt};
use noisy_float::types::n64;

/// Sum each column over rows, counting the defined cells.
fn sum_and_count(rows: ArrayView2<f64>) -> Array1<(f64, usize)> {
    rows.fold_axis(Axis(0), (0.0, 0), |(sum, count), val| {
        if val.is_nan() {
            (*sum, *count)
        } else {
            (*sum + *val, count + 1)
        }
    })
}

/// Return the sum of the rows.
pub struct Sum {}

impl Reduction for Sum {
    fn reduce(rows: ArrayView2<f64>) -> Array1<f64> {
        sum_and_count(rows).mapv(|(sum, count)| if count == 0 { f64::NAN } else { sum })
    }
}

/// Return the arithmetic mean of the rows.
pub struct Mean {}

impl Reduction for Mean {
    fn reduce(rows: ArrayView2<f64>) -> Array1<f64> {
        sum_and_count(rows).mapv(|(sum, count)| {
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        })
    }
}

/// Return the minimum of the rows.
pub struct Min {}

impl Reduction for Min {
    fn reduce(rows: ArrayView2<f64>) -> Array1<f64> {
        // min_skipnan yields NaN for a column with no defined values.
        rows.map_axis(Axis(0), |column| *column.min_skipnan())
    }
}

/// Return the maximum of the rows.
pub struct Max {}

impl Reduction for Max {
    fn reduce(rows: ArrayView2<f64>) -> Array1<f64> {
        rows.map_axis(Axis(0), |column| *column.max_skipnan())
    }
}

/// Return the median of the rows.
///
/// For an even number of defined cells the two central values are averaged.
pub struct Median {}

impl Reduction for Median {
    fn reduce(rows: ArrayView2<f64>) -> Array1<f64> {
        let ncols = rows.ncols();
        let mut rows = rows.to_owned();
        rows.quantile_axis_skipnan_mut(Axis(0), n64(0.5), &Midpoint)
            // Only fails for zero rows, where every column is undefined.
            .unwrap_or_else(|_| Array1::from_elem(ncols, f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::{array, Array2};

    const NAN: f64 = f64::NAN;

    /// Compare reduction results, treating NaN as equal to NaN.
    fn assert_row_eq(expected: Array1<f64>, actual: Array1<f64>) {
        assert_eq!(expected.len(), actual.len(), "{} != {}", expected, actual);
        for (e, a) in expected.iter().zip(actual.iter()) {
            assert!(
                (e.is_nan() && a.is_nan()) || e == a,
                "{} != {}",
                expected,
                actual
            );
        }
    }

    fn test_rows() -> Array2<f64> {
        array![[1.0, NAN, NAN], [4.0, 2.0, NAN], [2.0, NAN, NAN], [7.0, 8.0, NAN]]
    }

    #[test]
    fn sum_rows() {
        assert_row_eq(array![14.0, 10.0, NAN], Sum::reduce(test_rows().view()));
    }

    #[test]
    fn sum_single_row() {
        let rows = array![[1.5, NAN]];
        assert_row_eq(array![1.5, NAN], Sum::reduce(rows.view()));
    }

    #[test]
    fn sum_infinity() {
        let rows = array![[1.0], [f64::INFINITY]];
        assert_row_eq(array![f64::INFINITY], Sum::reduce(rows.view()));
    }

    #[test]
    fn sum_zero_rows() {
        let rows = Array2::<f64>::zeros((0, 2));
        assert_row_eq(array![NAN, NAN], Sum::reduce(rows.view()));
    }

    #[test]
    fn mean_rows() {
        assert_row_eq(array![3.5, 5.0, NAN], Mean::reduce(test_rows().view()));
    }

    #[test]
    fn mean_zero_rows() {
        let rows = Array2::<f64>::zeros((0, 1));
        assert_row_eq(array![NAN], Mean::reduce(rows.view()));
    }

    #[test]
    fn min_rows() {
        assert_row_eq(array![1.0, 2.0, NAN], Min::reduce(test_rows().view()));
    }

    #[test]
    fn min_nan_first() {
        let rows = array![[NAN], [3.0], [-1.0]];
        assert_row_eq(array![-1.0], Min::reduce(rows.view()));
    }

    #[test]
    fn max_rows() {
        assert_row_eq(array![7.0, 8.0, NAN], Max::reduce(test_rows().view()));
    }

    #[test]
    fn max_infinity_first() {
        let rows = array![[f64::INFINITY], [1.0]];
        assert_row_eq(array![f64::INFINITY], Max::reduce(rows.view()));
    }

    #[test]
    fn median_rows() {
        // Column 0 sorted: 1, 2, 4, 7.
        assert_row_eq(array![3.0, 5.0, NAN], Median::reduce(test_rows().view()));
    }

    #[test]
    fn median_odd_count() {
        let rows = array![[5.0], [1.0], [3.0]];
        assert_row_eq(array![3.0], Median::reduce(rows.view()));
    }

    #[test]
    fn median_zero_rows() {
        let rows = Array2::<f64>::zeros((0, 2));
        assert_row_eq(array![NAN, NAN], Median::reduce(rows.view()));
    }

    #[test]
    fn reductions_do_not_modify_input() {
        let rows = test_rows();
        let before = rows.clone();
        Median::reduce(rows.view());
        assert_eq!(before.mapv(f64::to_bits), rows.mapv(f64::to_bits));
    }
}
