//! Linear system text loader
//!
//! The text format is a stream of whitespace-separated tokens:
//!
//! ```text
//! # comment to end of line
//! 3                 # n
//! 4  -2   1         # n rows of n coefficients
//! -2  4  -2
//! 1  -2   4
//! 11 -16 17         # n right-hand-side values
//! ```
//!
//! Line breaks carry no meaning; only the token order matters.

use crate::direct::GesppError;
use crate::system::LinearSystem;
use ndarray::{Array1, Array2};
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Comment marker, valid anywhere on a line
pub const COMMENT_MARKER: char = '#';

/// Linear system parsing errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input contains no system description")]
    Empty,

    #[error("Parse error at line {line} ('{token}'): {message}")]
    Parse {
        line: usize,
        token: String,
        message: String,
    },

    #[error("Expected {expected} values after the dimension, found {got}")]
    MissingValues { expected: usize, got: usize },

    #[error("Unexpected trailing value at line {line}: '{token}'")]
    TrailingValues { line: usize, token: String },

    #[error("Invalid system: {0}")]
    System(#[from] GesppError),
}

/// Split content into (1-based line number, token) pairs, skipping comments
fn tokens(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content.lines().enumerate().flat_map(|(idx, line)| {
        let data = match line.find(COMMENT_MARKER) {
            Some(pos) => &line[..pos],
            None => line,
        };
        data.split_whitespace().map(move |token| (idx + 1, token))
    })
}

fn parse_dimension(line: usize, token: &str) -> Result<usize, LoadError> {
    let n = token.parse::<usize>().map_err(|_| LoadError::Parse {
        line,
        token: token.to_string(),
        message: "invalid dimension".to_string(),
    })?;
    if n == 0 {
        return Err(LoadError::Parse {
            line,
            token: token.to_string(),
            message: "dimension must be positive".to_string(),
        });
    }
    Ok(n)
}

fn parse_value(line: usize, token: &str) -> Result<f64, LoadError> {
    let value = token.parse::<f64>().map_err(|_| LoadError::Parse {
        line,
        token: token.to_string(),
        message: "invalid number".to_string(),
    })?;
    if !value.is_finite() {
        return Err(LoadError::Parse {
            line,
            token: token.to_string(),
            message: "non-finite value".to_string(),
        });
    }
    Ok(value)
}

/// Parse a system from string content
pub fn parse_system(content: &str) -> Result<LinearSystem<f64>, LoadError> {
    let mut tokens = tokens(content);

    let (line, token) = tokens.next().ok_or(LoadError::Empty)?;
    let n = parse_dimension(line, token)?;

    let (n_coeffs, expected) = n
        .checked_mul(n)
        .and_then(|coeffs| coeffs.checked_add(n).map(|total| (coeffs, total)))
        .ok_or_else(|| LoadError::Parse {
            line,
            token: token.to_string(),
            message: "dimension is too large".to_string(),
        })?;

    let mut values = Vec::with_capacity(expected.min(1 << 16));
    for (line, token) in tokens.by_ref().take(expected) {
        values.push(parse_value(line, token)?);
    }

    if values.len() < expected {
        return Err(LoadError::MissingValues {
            expected,
            got: values.len(),
        });
    }

    if let Some((line, token)) = tokens.next() {
        return Err(LoadError::TrailingValues {
            line,
            token: token.to_string(),
        });
    }

    let rhs = values.split_off(n_coeffs);
    let a = Array2::from_shape_vec((n, n), values).map_err(|e| LoadError::Parse {
        line,
        token: token.to_string(),
        message: format!("failed to shape coefficient matrix: {}", e),
    })?;

    log::debug!("Parsed {}x{} linear system", n, n);

    Ok(LinearSystem::new(a, Array1::from(rhs))?)
}

/// Parse a system from any reader
pub fn read_system<R: Read>(mut reader: R) -> Result<LinearSystem<f64>, LoadError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_system(&content)
}

/// Load a system from a text file
pub fn load_system<P: AsRef<Path>>(path: P) -> Result<LinearSystem<f64>, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let system = parse_system(&content)?;
    log::info!(
        "Loaded {}x{} system from {}",
        system.n(),
        system.n(),
        path.display()
    );
    Ok(system)
}
