//! Dense linear system representation
//!
//! [`LinearSystem`] is the validated (A, b) pair handed from the loader to
//! the solver. It keeps the original coefficients, so residuals can be
//! checked after a solve.

use crate::direct::{GesppConfig, GesppError, Solver, gespp_solve, validate_system};
use crate::traits::RealField;
use crate::vector_ops::{matvec, vector_norm};
use ndarray::{Array1, Array2};
use std::fmt;

/// A square system Ax = b
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem<T> {
    a: Array2<T>,
    b: Array1<T>,
}

impl<T: RealField> LinearSystem<T> {
    /// Create a system, checking that A is n×n, b has length n (n > 0) and
    /// every entry is finite
    pub fn new(a: Array2<T>, b: Array1<T>) -> Result<Self, GesppError> {
        validate_system(&a, &b)?;
        Ok(Self { a, b })
    }

    /// Number of unknowns
    pub fn n(&self) -> usize {
        self.b.len()
    }

    /// Coefficient matrix
    pub fn a(&self) -> &Array2<T> {
        &self.a
    }

    /// Right-hand side
    pub fn b(&self) -> &Array1<T> {
        &self.b
    }

    /// Split into (A, b)
    pub fn into_parts(self) -> (Array2<T>, Array1<T>) {
        (self.a, self.b)
    }

    /// Hand the system over to a single-use [`Solver`]
    pub fn into_solver(self, config: GesppConfig<T>) -> Result<Solver<T>, GesppError> {
        Solver::new(self.a, self.b, config)
    }

    /// Solve a copy of the system, leaving this one untouched
    pub fn solve(&self, config: &GesppConfig<T>) -> Result<Array1<T>, GesppError> {
        gespp_solve(&self.a, &self.b, config)
    }

    /// Residual vector r = Ax - b
    pub fn residual(&self, x: &Array1<T>) -> Result<Array1<T>, GesppError> {
        if x.len() != self.n() {
            return Err(GesppError::DimensionMismatch {
                expected: self.n(),
                got: x.len(),
            });
        }
        Ok(&matvec(&self.a, x) - &self.b)
    }

    /// Residual 2-norm ||Ax - b||
    pub fn residual_norm(&self, x: &Array1<T>) -> Result<T, GesppError> {
        self.residual(x).map(|r| vector_norm(&r))
    }
}

/// Augmented matrix `[A | b]`, one equation per line
impl<T: RealField> fmt::Display for LinearSystem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, rhs) in self.a.rows().into_iter().zip(self.b.iter()) {
            write!(f, "[")?;
            for value in row.iter() {
                write!(f, " {:>12.6}", value)?;
            }
            writeln!(f, " | {:>12.6} ]", rhs)?;
        }
        Ok(())
    }
}
