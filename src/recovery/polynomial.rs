use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::{Point, RecoveryError};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Polynomial {
    /// Coefficients in ascending order, i.e. [1, 2, 3] -> 1 + 2x + 3x^2
    coefficients: Vec<BigInt>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<BigInt>) -> Self {
        let mut coefficients = coefficients;
        while let Some(c) = coefficients.last()
            && c.is_zero()
        {
            coefficients.pop();
        }
        Self { coefficients }
    }

    /// Degree of the polynomial, `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    pub fn evaluate(&self, x: u64) -> BigInt {
        let x = BigInt::from(x);
        self.coefficients
            .iter()
            .rev()
            .fold(BigInt::zero(), |acc, c| acc * &x + c)
    }

    pub fn constant_term(&self) -> BigInt {
        self.coefficients.first().cloned().unwrap_or_default()
    }
}

/// Value at x = 0 of the unique polynomial of degree `points.len() - 1` through `points`,
/// rounded to the nearest integer with halves rounded away from zero.
pub fn interpolate_at_zero(points: &[Point]) -> Result<BigInt, RecoveryError> {
    Ok(interpolate_at_zero_exact(points)?.round().to_integer())
}

/// Exact Lagrange interpolation at x = 0.
///
/// Each basis value `L_i(0) = prod_{j != i} (0 - x_j) / (x_i - x_j)` is kept as a single
/// numerator/denominator pair so that only one reduction happens per point.
pub fn interpolate_at_zero_exact(points: &[Point]) -> Result<BigRational, RecoveryError> {
    if points.is_empty() {
        return Err(RecoveryError::InsufficientPoints {
            required: 1,
            available: 0,
        });
    }

    let mut sum = BigRational::zero();
    for (i, point) in points.iter().enumerate() {
        let x_i = BigInt::from(point.x);
        let mut numerator = point.y.clone();
        let mut denominator = BigInt::one();
        for (j, other) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            if other.x == point.x {
                return Err(RecoveryError::DuplicateCoordinate(point.x));
            }
            let x_j = BigInt::from(other.x);
            numerator *= -&x_j;
            denominator *= &x_i - &x_j;
        }
        sum += BigRational::new(numerator, denominator);
    }
    Ok(sum)
}
