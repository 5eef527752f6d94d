//! Back-substitution on a permuted upper-triangular system

use super::elimination::scaled_ratio;
use crate::traits::RealField;
use ndarray::{Array1, Array2};

/// Solve the triangularized system addressed through `perm`
///
/// Equation `i` lives in storage row `perm[i]` and has its leading
/// coefficient in column `i`, so it determines unknown `i`. The returned
/// vector is indexed by unknown (column) number.
///
/// Every divisor is checked against `threshold` with the same scaled test as
/// pivot selection. On failure the offending equation index is returned.
pub(crate) fn back_substitute<T: RealField>(
    a: &Array2<T>,
    b: &Array1<T>,
    scales: &Array1<T>,
    perm: &[usize],
    threshold: T,
) -> Result<Array1<T>, usize> {
    let n = perm.len();
    let mut x = Array1::from_elem(n, T::zero());

    for i in (0..n).rev() {
        let row = perm[i];
        let diag = a[[row, i]];
        if !(scaled_ratio(diag, scales[row]) > threshold) {
            return Err(i);
        }

        let mut sum = b[row];
        for j in (i + 1)..n {
            sum -= a[[row, j]] * x[j];
        }
        x[i] = sum / diag;
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_identity_permutation() {
        let a = array![[2.0_f64, 1.0, -1.0], [0.0, 4.0, 2.0], [0.0, 0.0, 5.0]];
        let b = array![1.0_f64, 10.0, 15.0];
        let s = array![2.0_f64, 4.0, 5.0];

        let x = back_substitute(&a, &b, &s, &[0, 1, 2], 1e-12).unwrap();

        assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[0], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rows_addressed_through_permutation() {
        // Same triangular system, stored bottom-up.
        let a = array![[0.0_f64, 0.0, 5.0], [0.0, 4.0, 2.0], [2.0, 1.0, -1.0]];
        let b = array![15.0_f64, 10.0, 1.0];
        let s = array![5.0_f64, 4.0, 2.0];

        let x = back_substitute(&a, &b, &s, &[2, 1, 0], 1e-12).unwrap();

        assert_relative_eq!(x[0], 1.5, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_near_zero_divisor_reported() {
        let a = array![[1.0_f64, 1.0], [0.0, 1e-14]];
        let b = array![2.0_f64, 0.0];
        let s = array![1.0_f64, 1.0];

        assert_eq!(back_substitute(&a, &b, &s, &[0, 1], 1e-12), Err(1));
    }
}
