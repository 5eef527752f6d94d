//! Linear system I/O module
//!
//! Provides loading of systems from text and export of solution vectors.

pub mod export;
pub mod loader;

pub use export::{
    DEFAULT_PRECISION, SolutionDisplay, export_solution, format_solution, write_solution,
};
pub use loader::{LoadError, load_system, parse_system, read_system};
