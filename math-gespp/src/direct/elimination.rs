//! Scaled partial pivot elimination kernels
//!
//! Rows are never moved in storage. Every kernel addresses rows through the
//! row-order permutation `perm`, where `perm[k]` is the storage row acting as
//! the k-th equation of the triangularized system.

use crate::traits::RealField;
use crate::vector_ops::max_abs;
use ndarray::{Array1, Array2};

/// Compute the scale vector: s[i] = max_j |A[i][j]|
///
/// Must be called on the original matrix, before any elimination stage.
pub(crate) fn scale_vector<T: RealField>(a: &Array2<T>) -> Array1<T> {
    a.rows().into_iter().map(max_abs).collect()
}

/// Scaled magnitude |value| / scale
///
/// A zero scale falls back to the raw magnitude so the ratio is always
/// defined.
#[inline]
pub(crate) fn scaled_ratio<T: RealField>(value: T, scale: T) -> T {
    if scale > T::zero() {
        value.abs() / scale
    } else {
        value.abs()
    }
}

/// Select the pivot for stage `k` among `perm[k..]`
///
/// Returns the position in `perm` of the chosen row and its scaled ratio.
/// Ties keep the first candidate scanned (lowest position). NaN ratios never
/// win; if every candidate is NaN the ratio is `-inf`, which fails any
/// threshold check.
pub(crate) fn select_pivot<T: RealField>(
    a: &Array2<T>,
    scales: &Array1<T>,
    perm: &[usize],
    k: usize,
) -> (usize, T) {
    let mut best = k;
    let mut best_ratio = T::neg_infinity();

    for (pos, &row) in perm.iter().enumerate().skip(k) {
        let ratio = scaled_ratio(a[[row, k]], scales[row]);
        if ratio > best_ratio {
            best = pos;
            best_ratio = ratio;
        }
    }

    (best, best_ratio)
}

/// Eliminate column `k` from every row below the pivot row `perm[k]`
///
/// The pivot must already be in place (`perm[k]` swapped in) and known to be
/// non-zero. Column `k` of the eliminated rows is set to exactly zero.
pub(crate) fn eliminate_stage<T: RealField>(
    a: &mut Array2<T>,
    b: &mut Array1<T>,
    perm: &[usize],
    k: usize,
) {
    let n = perm.len();
    let pivot_row = perm[k];
    let pivot = a[[pivot_row, k]];

    for &row in &perm[k + 1..] {
        let mult = a[[row, k]] / pivot;
        a[[row, k]] = T::zero();

        for j in (k + 1)..n {
            let update = mult * a[[pivot_row, j]];
            a[[row, j]] -= update;
        }

        let update = mult * b[pivot_row];
        b[row] -= update;
    }
}
