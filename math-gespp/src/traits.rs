//! Core traits for the direct solver
//!
//! This module defines the scalar abstraction used by the elimination kernels:
//! - [`RealField`]: Trait for real floating-point scalars (`f64`, `f32`)

use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types that can be used by the GESPP solver.
///
/// The solver only needs ordered real arithmetic: absolute values for the
/// scale vector and pivot ratios, and division for multipliers. Complex
/// scalars are deliberately not covered.
///
/// # Implementations
///
/// Blanket-implemented for every type meeting the bounds, which covers:
/// - `f64` (default)
/// - `f32` (for memory-constrained applications)
pub trait RealField:
    Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + Display + 'static
{
    /// Convert to `f64` for logging and error reporting
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T> RealField for T where
    T: Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + Display + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lossy<T: RealField>(value: T) -> f64 {
        value.to_f64_lossy()
    }

    #[test]
    fn test_to_f64_lossy() {
        assert_eq!(lossy(2.5_f64), 2.5);
        assert_eq!(lossy(0.5_f32), 0.5);
        assert!(lossy(f64::NAN).is_nan());
    }
}
