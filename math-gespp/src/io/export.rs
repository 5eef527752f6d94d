//! Export functions for solution vectors

use crate::traits::RealField;
use ndarray::Array1;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default number of digits after the decimal point
pub const DEFAULT_PRECISION: usize = 6;

/// Text rendering of a solution vector
///
/// A `# solution (n = N)` header followed by one value per line, ordered by
/// unknown index. The header uses the loader's comment marker, so the output
/// can be tokenized by the same reader.
pub struct SolutionDisplay<'a, T> {
    x: &'a Array1<T>,
    precision: usize,
}

impl<'a, T: RealField> SolutionDisplay<'a, T> {
    /// Render `x` with `precision` digits after the decimal point
    pub fn new(x: &'a Array1<T>, precision: usize) -> Self {
        Self { x, precision }
    }
}

impl<T: RealField> fmt::Display for SolutionDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# solution (n = {})", self.x.len())?;
        for value in self.x.iter() {
            writeln!(f, "{:.*}", self.precision, value)?;
        }
        Ok(())
    }
}

/// Format a solution vector as text
pub fn format_solution<T: RealField>(x: &Array1<T>, precision: usize) -> String {
    SolutionDisplay::new(x, precision).to_string()
}

/// Write a solution vector to any writer
pub fn write_solution<T: RealField, W: Write>(
    x: &Array1<T>,
    writer: &mut W,
    precision: usize,
) -> std::io::Result<()> {
    write!(writer, "{}", SolutionDisplay::new(x, precision))
}

/// Export a solution vector to a text file
pub fn export_solution<T: RealField, P: AsRef<Path>>(
    x: &Array1<T>,
    path: P,
    precision: usize,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write_solution(x, &mut writer, precision)?;
    writer.flush()?;

    log::info!("Wrote {} solution values to {}", x.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_format_solution() {
        let x = array![3.0_f64, -2.0];
        assert_eq!(
            format_solution(&x, 3),
            "# solution (n = 2)\n3.000\n-2.000\n"
        );
    }

    #[test]
    fn test_write_solution_to_buffer() {
        let x = array![0.5_f32];
        let mut buf = Vec::new();
        write_solution(&x, &mut buf, DEFAULT_PRECISION).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "# solution (n = 1)\n0.500000\n");
    }

    #[test]
    fn test_export_solution_file() {
        let path = std::env::temp_dir().join("gespp_export_unit_test.txt");
        let x = array![1.25_f64, 2.5, -3.75];

        export_solution(&x, &path, 2).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let values: Vec<f64> = content
            .lines()
            .filter(|l| !l.starts_with('#'))
            .map(|l| l.parse().unwrap())
            .collect();
        assert_eq!(values, vec![1.25, 2.5, -3.75]);

        let _ = std::fs::remove_file(&path);
    }
}
