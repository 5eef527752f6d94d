//! Gaussian elimination with scaled partial pivoting (GESPP)
//!
//! Solves dense square systems Ax = b. Pivots are chosen by row-relative
//! magnitude |A[r][k]| / s[r], where s[r] is the largest absolute coefficient
//! of the original row r. Row interchanges are recorded in a permutation;
//! matrix storage is never reordered.
//!
//! A [`Solver`] is single-use and moves through
//! `Loaded -> Eliminated -> Solved`, or ends in `Singular`.

use super::elimination::{eliminate_stage, scale_vector, scaled_ratio, select_pivot};
use super::substitution::back_substitute;
use crate::traits::RealField;
use ndarray::{Array1, Array2};
use std::fmt;
use thiserror::Error;

/// Default zero threshold for `f64` systems
pub const DEFAULT_ZERO_THRESHOLD: f64 = 1e-12;

/// Errors that can occur while solving with GESPP
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GesppError {
    #[error("Matrix is singular to working precision (elimination stage {stage})")]
    SingularSystem { stage: usize },
    #[error("System is empty: dimension must be positive")]
    EmptySystem,
    #[error("Matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("Matrix dimensions mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Coefficient A[{row}][{col}] is not finite")]
    NonFiniteCoefficient { row: usize, col: usize },
    #[error("Right-hand side b[{row}] is not finite")]
    NonFiniteRhs { row: usize },
    #[error("Zero threshold must be finite and positive, got {0}")]
    InvalidThreshold(f64),
    #[error("Cannot {operation} a solver in state {state}")]
    InvalidState {
        operation: &'static str,
        state: SolverState,
    },
}

impl GesppError {
    /// True for the errors raised before elimination because (A, b) do not
    /// have the n×n / n shape
    pub fn is_invalid_dimension(&self) -> bool {
        matches!(
            self,
            GesppError::EmptySystem
                | GesppError::NotSquare { .. }
                | GesppError::DimensionMismatch { .. }
        )
    }

    /// True for NaN or infinite entries in A or b
    pub fn is_non_finite_input(&self) -> bool {
        matches!(
            self,
            GesppError::NonFiniteCoefficient { .. } | GesppError::NonFiniteRhs { .. }
        )
    }
}

/// GESPP solver configuration
#[derive(Debug, Clone)]
pub struct GesppConfig<R> {
    /// Pivot or divisor magnitudes (scaled by the row's original maximum) at
    /// or below this value are treated as exact zero
    pub zero_threshold: R,
    /// Log progress every N elimination stages (0 = no output)
    pub print_interval: usize,
}

impl Default for GesppConfig<f64> {
    fn default() -> Self {
        Self {
            zero_threshold: DEFAULT_ZERO_THRESHOLD,
            print_interval: 0,
        }
    }
}

impl Default for GesppConfig<f32> {
    fn default() -> Self {
        Self {
            zero_threshold: 1e-6,
            print_interval: 0,
        }
    }
}

impl<R: RealField> GesppConfig<R> {
    /// Configuration with the given zero threshold and no progress output
    pub fn with_threshold(zero_threshold: R) -> Self {
        Self {
            zero_threshold,
            print_interval: 0,
        }
    }

    /// Check that the zero threshold is usable
    pub fn validate(&self) -> Result<(), GesppError> {
        let eps = self.zero_threshold;
        if eps.is_finite() && eps > R::zero() {
            Ok(())
        } else {
            Err(GesppError::InvalidThreshold(eps.to_f64_lossy()))
        }
    }
}

/// Lifecycle of a [`Solver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// (A, b) accepted, nothing computed yet
    Loaded,
    /// Scale vector and permutation computed, (A, b) triangularized
    Eliminated,
    /// Solution available
    Solved,
    /// Terminal failure: the system is singular to working precision
    Singular,
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverState::Loaded => write!(f, "Loaded"),
            SolverState::Eliminated => write!(f, "Eliminated"),
            SolverState::Solved => write!(f, "Solved"),
            SolverState::Singular => write!(f, "Singular"),
        }
    }
}

/// Check the n×n / n shape contract for (A, b)
fn validate_shapes<T>(a: &Array2<T>, b: &Array1<T>) -> Result<usize, GesppError> {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return Err(GesppError::EmptySystem);
    }
    if rows != cols {
        return Err(GesppError::NotSquare { rows, cols });
    }
    if b.len() != rows {
        return Err(GesppError::DimensionMismatch {
            expected: rows,
            got: b.len(),
        });
    }
    Ok(rows)
}

/// Check the shape contract and reject NaN or infinite entries in (A, b)
pub(crate) fn validate_system<T: RealField>(
    a: &Array2<T>,
    b: &Array1<T>,
) -> Result<usize, GesppError> {
    let n = validate_shapes(a, b)?;
    if let Some(((row, col), _)) = a.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(GesppError::NonFiniteCoefficient { row, col });
    }
    if let Some(row) = b.iter().position(|v| !v.is_finite()) {
        return Err(GesppError::NonFiniteRhs { row });
    }
    Ok(n)
}

/// Single-use GESPP solver
///
/// Owns the coefficient matrix, right-hand side, scale vector, row-order
/// permutation and solution for its whole lifetime. A and b are modified in
/// place during elimination.
#[derive(Debug, Clone)]
pub struct Solver<T: RealField> {
    a: Array2<T>,
    b: Array1<T>,
    scales: Option<Array1<T>>,
    perm: Vec<usize>,
    x: Option<Array1<T>>,
    config: GesppConfig<T>,
    state: SolverState,
}

impl<T: RealField> Solver<T> {
    /// Take ownership of (A, b) after checking shapes, entries and
    /// configuration
    ///
    /// NaN or infinite entries are rejected here, so a later
    /// [`GesppError::SingularSystem`] always means a singular finite system.
    pub fn new(a: Array2<T>, b: Array1<T>, config: GesppConfig<T>) -> Result<Self, GesppError> {
        let n = validate_system(&a, &b)?;
        config.validate()?;

        Ok(Self {
            a,
            b,
            scales: None,
            perm: (0..n).collect(),
            x: None,
            config,
            state: SolverState::Loaded,
        })
    }

    /// System dimension
    pub fn n(&self) -> usize {
        self.perm.len()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SolverState {
        self.state
    }

    /// Solver configuration
    pub fn config(&self) -> &GesppConfig<T> {
        &self.config
    }

    /// Scale vector, available once elimination has started
    pub fn scales(&self) -> Option<&Array1<T>> {
        self.scales.as_ref()
    }

    /// Row-order permutation: `permutation()[k]` is the storage row used as
    /// the k-th pivot row
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    /// Coefficient matrix in storage order (triangular through the
    /// permutation after elimination)
    pub fn matrix(&self) -> &Array2<T> {
        &self.a
    }

    /// Right-hand side in storage order
    pub fn rhs(&self) -> &Array1<T> {
        &self.b
    }

    /// Solution vector, indexed by unknown, once solved
    pub fn solution(&self) -> Option<&Array1<T>> {
        self.x.as_ref()
    }

    /// Consume a solved solver and return its solution
    pub fn into_solution(self) -> Result<Array1<T>, GesppError> {
        let state = self.state;
        match self.x {
            Some(x) if state == SolverState::Solved => Ok(x),
            _ => Err(GesppError::InvalidState {
                operation: "take the solution of",
                state,
            }),
        }
    }

    fn require_state(
        &self,
        expected: SolverState,
        operation: &'static str,
    ) -> Result<(), GesppError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GesppError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    /// Triangularize (A, b) with scaled partial pivoting
    ///
    /// Fails with [`GesppError::SingularSystem`] as soon as a row of A is
    /// entirely zero, a stage's best scaled pivot is at or below the zero
    /// threshold, or the final diagonal entry is. The solver is then
    /// terminal.
    pub fn eliminate(&mut self) -> Result<(), GesppError> {
        self.require_state(SolverState::Loaded, "eliminate")?;

        let n = self.n();
        let eps = self.config.zero_threshold;
        let print_interval = self.config.print_interval;
        let scales = self.scales.insert(scale_vector(&self.a));

        if let Some(row) = scales.iter().position(|s| *s == T::zero()) {
            log::warn!("GESPP: row {} of the coefficient matrix is entirely zero", row);
            self.state = SolverState::Singular;
            return Err(GesppError::SingularSystem { stage: 0 });
        }

        for k in 0..n - 1 {
            let (pos, ratio) = select_pivot(&self.a, scales, &self.perm, k);
            if !(ratio > eps) {
                log::warn!(
                    "GESPP stage {}: best scaled pivot {:.3e} is not above threshold {:.3e}",
                    k,
                    ratio.to_f64_lossy(),
                    eps.to_f64_lossy()
                );
                self.state = SolverState::Singular;
                return Err(GesppError::SingularSystem { stage: k });
            }

            self.perm.swap(k, pos);
            log::debug!(
                "GESPP stage {}: pivot row {} (scaled ratio {:.6e})",
                k,
                self.perm[k],
                ratio.to_f64_lossy()
            );

            eliminate_stage(&mut self.a, &mut self.b, &self.perm, k);

            if print_interval > 0 && (k + 1) % print_interval == 0 {
                log::info!("GESPP elimination stage {}/{} done", k + 1, n - 1);
            }
        }

        let last = self.perm[n - 1];
        let ratio = scaled_ratio(self.a[[last, n - 1]], scales[last]);
        if !(ratio > eps) {
            log::warn!(
                "GESPP: final pivot {:.3e} is not above threshold {:.3e}",
                ratio.to_f64_lossy(),
                eps.to_f64_lossy()
            );
            self.state = SolverState::Singular;
            return Err(GesppError::SingularSystem { stage: n - 1 });
        }

        self.state = SolverState::Eliminated;
        Ok(())
    }

    /// Compute x from the triangularized system
    pub fn back_substitute(&mut self) -> Result<(), GesppError> {
        self.require_state(SolverState::Eliminated, "back-substitute")?;

        let Some(scales) = self.scales.as_ref() else {
            return Err(GesppError::InvalidState {
                operation: "back-substitute",
                state: self.state,
            });
        };

        match back_substitute(
            &self.a,
            &self.b,
            scales,
            &self.perm,
            self.config.zero_threshold,
        ) {
            Ok(x) => {
                self.x = Some(x);
                self.state = SolverState::Solved;
                Ok(())
            }
            Err(stage) => {
                log::warn!("GESPP: near-zero divisor in back-substitution at equation {}", stage);
                self.state = SolverState::Singular;
                Err(GesppError::SingularSystem { stage })
            }
        }
    }

    /// Run elimination and back-substitution
    ///
    /// Only valid once, from the `Loaded` state.
    pub fn solve(&mut self) -> Result<&Array1<T>, GesppError> {
        self.require_state(SolverState::Loaded, "solve")?;
        self.eliminate()?;
        self.back_substitute()?;

        if self.config.print_interval > 0 {
            log::info!("GESPP solved {}x{} system", self.n(), self.n());
        }

        self.x.as_ref().ok_or(GesppError::InvalidState {
            operation: "solve",
            state: self.state,
        })
    }
}

/// Solve Ax = b using Gaussian elimination with scaled partial pivoting
///
/// Convenience wrapper that copies the inputs into a one-shot [`Solver`].
pub fn gespp_solve<T: RealField>(
    a: &Array2<T>,
    b: &Array1<T>,
    config: &GesppConfig<T>,
) -> Result<Array1<T>, GesppError> {
    let mut solver = Solver::new(a.clone(), b.clone(), config.clone())?;
    solver.solve()?;
    solver.into_solution()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_ops::{is_permutation, matvec, vector_norm};
    use approx::assert_relative_eq;
    use ndarray::array;

    fn default_solver(a: Array2<f64>, b: Array1<f64>) -> Solver<f64> {
        Solver::new(a, b, GesppConfig::default()).expect("valid system")
    }

    #[test]
    fn test_single_unknown() {
        let x = gespp_solve(&array![[2.0_f64]], &array![4.0], &GesppConfig::default())
            .expect("GESPP solve should succeed");
        assert_eq!(x.len(), 1);
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_diagonal_layout() {
        let mut solver = default_solver(array![[0.0, 1.0], [1.0, 0.0]], array![2.0, 3.0]);
        let x = solver.solve().expect("GESPP solve should succeed").clone();

        assert_eq!(solver.permutation(), &[1, 0]);
        assert_relative_eq!(x[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_proportional_rows_are_singular() {
        let mut solver = default_solver(array![[1.0, 1.0], [1.0, 1.0]], array![2.0, 2.0]);

        let err = solver.solve().unwrap_err();
        assert_eq!(err, GesppError::SingularSystem { stage: 1 });
        assert_eq!(solver.state(), SolverState::Singular);
        assert!(solver.solution().is_none());
    }

    #[test]
    fn test_three_by_three_residual() {
        let a = array![[4.0, -2.0, 1.0], [-2.0, 4.0, -2.0], [1.0, -2.0, 4.0]];
        let b = array![11.0, -16.0, 17.0];

        let x = gespp_solve(&a, &b, &GesppConfig::default()).expect("GESPP solve should succeed");

        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], -2.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);

        let r = &matvec(&a, &x) - &b;
        assert!(vector_norm(&r) < 1e-12);
    }

    #[test]
    fn test_tiny_leading_pivot_is_avoided() {
        let a = array![[1e-12, 1.0], [1.0, 1.0]];
        let b = array![1.0, 2.0];
        let mut solver = Solver::new(a, b, GesppConfig::with_threshold(1e-9)).unwrap();

        let x = solver.solve().expect("GESPP solve should succeed").clone();

        assert_eq!(solver.permutation()[0], 1);
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_scaled_choice_differs_from_raw_magnitude() {
        let a = array![[2.0_f64, 100000.0], [1.0, 1.0]];
        let b = array![100000.0, 2.0];

        // Raw partial pivoting would take row 0 for column 0.
        assert!(a[[0, 0]].abs() > a[[1, 0]].abs());

        let mut solver = default_solver(a.clone(), b.clone());
        solver.eliminate().expect("elimination should succeed");
        assert_eq!(solver.permutation()[0], 1);

        solver.back_substitute().expect("back-substitution should succeed");
        let x = solver.into_solution().unwrap();
        assert_relative_eq!(x[0], 100000.0 / 99998.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 2.0 - 100000.0 / 99998.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tie_break_prefers_lower_index() {
        // Both rows have scaled ratio 0.5 in column 0.
        let mut solver = default_solver(array![[2.0, 4.0], [1.0, -2.0]], array![6.0, -1.0]);
        solver.eliminate().unwrap();
        assert_eq!(solver.permutation()[0], 0);

        let mut swapped = default_solver(array![[1.0, -2.0], [2.0, 4.0]], array![-1.0, 6.0]);
        swapped.eliminate().unwrap();
        assert_eq!(swapped.permutation()[0], 0);
    }

    #[test]
    fn test_permutation_stays_bijective() {
        let a = array![
            [1.0, 2.0, 3.0, 4.0],
            [10.0, 1.0, 0.0, 2.0],
            [0.5, 8.0, 1.0, 1.0],
            [3.0, 3.0, 9.0, 1.0]
        ];
        let b = array![1.0, 2.0, 3.0, 4.0];
        let mut solver = default_solver(a.clone(), b.clone());
        assert!(is_permutation(solver.permutation()));

        solver.eliminate().unwrap();
        assert!(is_permutation(solver.permutation()));

        solver.back_substitute().unwrap();
        let x = solver.into_solution().unwrap();
        let r = &matvec(&a, &x) - &b;
        assert!(vector_norm(&r) < 1e-10);
    }

    #[test]
    fn test_storage_is_not_reordered() {
        let a = array![[0.0, 1.0], [1.0, 0.0]];
        let mut solver = default_solver(a, array![2.0, 3.0]);
        solver.eliminate().unwrap();

        // Storage row 1 keeps its pivot, storage row 0 keeps its own data.
        assert_eq!(solver.matrix()[[1, 0]], 1.0);
        assert_eq!(solver.matrix()[[0, 1]], 1.0);
        assert_eq!(solver.rhs()[0], 2.0);
        assert_eq!(solver.rhs()[1], 3.0);
    }

    #[test]
    fn test_scales_from_original_matrix() {
        let mut solver = default_solver(array![[1.0, -3.0], [4.0, 2.0]], array![1.0, 1.0]);
        assert!(solver.scales().is_none());

        solver.solve().unwrap();
        assert_eq!(solver.scales().unwrap().to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_zero_row_is_immediately_singular() {
        let mut solver = default_solver(array![[1.0, 2.0], [0.0, 0.0]], array![1.0, 0.0]);
        assert_eq!(
            solver.eliminate(),
            Err(GesppError::SingularSystem { stage: 0 })
        );
        assert_eq!(solver.state(), SolverState::Singular);

        let mut scalar = default_solver(array![[0.0]], array![1.0]);
        assert_eq!(
            scalar.solve().unwrap_err(),
            GesppError::SingularSystem { stage: 0 }
        );
    }

    #[test]
    fn test_threshold_controls_singularity() {
        let a = array![[1.0, 1.0], [1.0, 1.0 + 1e-8]];
        let b = array![2.0, 2.0 + 1e-8];

        let x = gespp_solve(&a, &b, &GesppConfig::with_threshold(1e-12)).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-6);

        let err = gespp_solve(&a, &b, &GesppConfig::with_threshold(1e-6)).unwrap_err();
        assert_eq!(err, GesppError::SingularSystem { stage: 1 });
    }

    #[test]
    fn test_solve_twice_is_rejected() {
        let mut solver = default_solver(array![[2.0]], array![4.0]);
        solver.solve().unwrap();

        let err = solver.solve().unwrap_err();
        assert_eq!(
            err,
            GesppError::InvalidState {
                operation: "solve",
                state: SolverState::Solved,
            }
        );
        assert_relative_eq!(solver.solution().unwrap()[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_solver_is_terminal() {
        let mut solver = default_solver(array![[1.0, 1.0], [1.0, 1.0]], array![2.0, 2.0]);
        assert!(solver.solve().is_err());

        assert!(matches!(
            solver.solve(),
            Err(GesppError::InvalidState {
                state: SolverState::Singular,
                ..
            })
        ));
        assert!(solver.into_solution().is_err());
    }

    #[test]
    fn test_out_of_order_operations() {
        let mut solver = default_solver(array![[2.0]], array![4.0]);
        assert!(matches!(
            solver.back_substitute(),
            Err(GesppError::InvalidState {
                state: SolverState::Loaded,
                ..
            })
        ));

        solver.eliminate().unwrap();
        assert!(matches!(
            solver.eliminate(),
            Err(GesppError::InvalidState {
                state: SolverState::Eliminated,
                ..
            })
        ));
    }

    #[test]
    fn test_shape_validation() {
        let config = GesppConfig::<f64>::default();

        let err = Solver::new(Array2::<f64>::zeros((0, 0)), Array1::zeros(0), config.clone())
            .unwrap_err();
        assert_eq!(err, GesppError::EmptySystem);

        let err = Solver::new(Array2::<f64>::zeros((2, 3)), Array1::zeros(2), config.clone())
            .unwrap_err();
        assert_eq!(err, GesppError::NotSquare { rows: 2, cols: 3 });
        assert!(err.is_invalid_dimension());

        let err =
            Solver::new(Array2::<f64>::eye(3), Array1::zeros(2), config.clone()).unwrap_err();
        assert_eq!(
            err,
            GesppError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_non_finite_entries_rejected() {
        let config = GesppConfig::<f64>::default();

        let err = Solver::new(
            array![[f64::NAN, 1.0], [1.0, 1.0]],
            array![1.0, 2.0],
            config.clone(),
        )
        .unwrap_err();
        assert_eq!(err, GesppError::NonFiniteCoefficient { row: 0, col: 0 });
        assert!(err.is_non_finite_input());
        assert!(!err.is_invalid_dimension());

        let err = gespp_solve(
            &array![[1.0, 1.0], [1.0, f64::INFINITY]],
            &array![1.0, 2.0],
            &config,
        )
        .unwrap_err();
        assert_eq!(err, GesppError::NonFiniteCoefficient { row: 1, col: 1 });

        let err = Solver::new(
            array![[1.0, 0.0], [0.0, 1.0]],
            array![1.0, f64::NEG_INFINITY],
            config,
        )
        .unwrap_err();
        assert_eq!(err, GesppError::NonFiniteRhs { row: 1 });
    }

    #[test]
    fn test_back_substitution_divisor_failure_is_terminal() {
        let mut solver = default_solver(array![[2.0, 1.0], [1.0, 3.0]], array![3.0, 4.0]);
        solver.eliminate().unwrap();
        assert_eq!(solver.state(), SolverState::Eliminated);

        // Collapse the last divisor after elimination accepted it.
        let last = solver.perm[1];
        solver.a[[last, 1]] = 1e-15;

        assert_eq!(
            solver.back_substitute(),
            Err(GesppError::SingularSystem { stage: 1 })
        );
        assert_eq!(solver.state(), SolverState::Singular);
        assert!(solver.solution().is_none());
        assert!(matches!(
            solver.back_substitute(),
            Err(GesppError::InvalidState {
                state: SolverState::Singular,
                ..
            })
        ));
        assert!(solver.into_solution().is_err());
    }

    #[test]
    fn test_threshold_validation() {
        for eps in [0.0, -1e-9, f64::NAN, f64::INFINITY] {
            let result = Solver::new(
                Array2::<f64>::eye(2),
                Array1::ones(2),
                GesppConfig::with_threshold(eps),
            );
            assert!(matches!(result, Err(GesppError::InvalidThreshold(_))));
        }
    }

    #[test]
    fn test_f32_system() {
        let a = array![[4.0_f32, 1.0], [1.0, 3.0]];
        let b = array![1.0_f32, 2.0];

        let x = gespp_solve(&a, &b, &GesppConfig::default()).expect("GESPP solve should succeed");

        assert_relative_eq!(x[0], 1.0 / 11.0, epsilon = 1e-6);
        assert_relative_eq!(x[1], 7.0 / 11.0, epsilon = 1e-6);
    }

    #[test]
    fn test_error_messages() {
        let err = GesppError::SingularSystem { stage: 2 };
        assert_eq!(
            err.to_string(),
            "Matrix is singular to working precision (elimination stage 2)"
        );

        let err = GesppError::InvalidState {
            operation: "solve",
            state: SolverState::Solved,
        };
        assert_eq!(err.to_string(), "Cannot solve a solver in state Solved");
    }
}
