//! Dense vector and matrix helpers
//!
//! Small generic kernels shared by the solver, the residual computation and
//! the tests. They work on any [`RealField`] scalar, so they do not rely on
//! `ndarray`'s BLAS-backed `dot`.

use crate::traits::RealField;
use ndarray::{Array1, Array2, ArrayView1};

/// Compute vector 2-norm: ||x||_2 = sqrt(Σ x_i^2)
#[inline]
pub fn vector_norm<T: RealField>(x: &Array1<T>) -> T {
    x.iter().fold(T::zero(), |acc, &xi| acc + xi * xi).sqrt()
}

/// Largest absolute value in a vector view (0 for an empty view)
///
/// NaN entries are ignored, so a row made only of NaNs reports 0.
#[inline]
pub fn max_abs<T: RealField>(x: ArrayView1<'_, T>) -> T {
    x.iter().fold(T::zero(), |acc, &xi| acc.max(xi.abs()))
}

/// Dense matrix-vector product y = A * x
pub fn matvec<T: RealField>(a: &Array2<T>, x: &Array1<T>) -> Array1<T> {
    assert_eq!(
        a.ncols(),
        x.len(),
        "Vector length must match matrix columns for matvec"
    );
    a.rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(x.iter())
                .fold(T::zero(), |acc, (&aij, &xj)| acc + aij * xj)
        })
        .collect()
}

/// Check that `perm` is a bijection over `[0, perm.len())`
pub fn is_permutation(perm: &[usize]) -> bool {
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        if p >= perm.len() || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}
