//! Dense linear solver using Gaussian elimination with scaled partial pivoting
//!
//! This crate solves square systems Ax = b with GESPP: pivots are selected by
//! their magnitude relative to the largest coefficient of their original row,
//! which keeps elimination stable when rows have very different scales.
//!
//! # Features
//!
//! - **Direct solver**: single-use [`Solver`] state machine and the one-shot
//!   [`gespp_solve`] wrapper
//! - **Singularity detection**: configurable zero threshold on scaled pivots
//! - **Text I/O**: [`load_system`] / [`parse_system`] for system descriptions,
//!   [`export_solution`] for solution vectors
//! - **Generic scalars**: works with `f64` and `f32`
//!
//! # Example
//!
//! ```
//! use gespp::{GesppConfig, gespp_solve};
//! use ndarray::array;
//!
//! let a = array![[0.0_f64, 1.0], [1.0, 0.0]];
//! let b = array![2.0, 3.0];
//!
//! let x = gespp_solve(&a, &b, &GesppConfig::default()).unwrap();
//! assert!((x[0] - 3.0).abs() < 1e-12);
//! assert!((x[1] - 2.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod direct;
pub mod io;
pub mod system;
pub mod traits;
pub mod vector_ops;

// Re-export main types
pub use system::LinearSystem;
pub use traits::RealField;

// Re-export the solver
pub use direct::{
    DEFAULT_ZERO_THRESHOLD, GesppConfig, GesppError, Solver, SolverState, gespp_solve,
};

// Re-export I/O
pub use io::{
    LoadError, SolutionDisplay, export_solution, format_solution, load_system, parse_system,
    read_system, write_solution,
};

pub use config::{ConfigError, OutputConfig, RunConfig, SolverConfig};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
