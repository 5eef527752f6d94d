//! Direct solvers for dense linear systems
//!
//! This module provides:
//! - [`Solver`]: single-use Gaussian elimination with scaled partial pivoting
//! - [`gespp_solve`]: one-shot convenience wrapper

mod elimination;
mod gespp;
mod substitution;

pub use gespp::{
    DEFAULT_ZERO_THRESHOLD, GesppConfig, GesppError, Solver, SolverState, gespp_solve,
};

pub(crate) use gespp::validate_system;
