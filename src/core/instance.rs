// src/core/instance.rs

//! The immutable LWE instance an experiment runs against.

use super::codec::log2_exact;
use super::error::QlweError;

/// A noisy linear secret: a public matrix `A` (m×n), a secret vector `s`
/// (length n), and a small error vector `e` (length m), all reduced modulo a
/// power of two.
///
/// Constructed once per experiment and shared by reference between the oracle
/// encoder and the aggregator; there is no other coupling between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LweInstance {
    matrix: Vec<Vec<u64>>,
    modulus: u64,
    secret: Vec<u64>,
    error: Vec<u64>,
    /// Cached `log2(modulus)`.
    bits: u32,
}

impl LweInstance {
    /// Validates and builds an instance.
    ///
    /// # Errors
    /// Returns [`QlweError::InvalidInstance`] when the modulus is not a power
    /// of two (or is below 2), the matrix is empty or ragged, the secret or
    /// error dimensions do not match the matrix, or any entry lies outside
    /// `[0, modulus)`.
    pub fn new(
        matrix: Vec<Vec<u64>>,
        secret: Vec<u64>,
        error: Vec<u64>,
        modulus: u64,
    ) -> Result<Self, QlweError> {
        let bits = log2_exact(modulus).ok_or_else(|| QlweError::InvalidInstance {
            message: format!("modulus {} is not a power of two >= 2", modulus),
        })?;

        if matrix.is_empty() || matrix[0].is_empty() {
            return Err(QlweError::InvalidInstance {
                message: "matrix must have at least one row and one column".to_string(),
            });
        }
        let n = matrix[0].len();
        if matrix.iter().any(|row| row.len() != n) {
            return Err(QlweError::InvalidInstance {
                message: "matrix rows must all have the same length".to_string(),
            });
        }
        if secret.len() != n {
            return Err(QlweError::InvalidInstance {
                message: format!(
                    "secret has length {} but matrix has {} columns",
                    secret.len(),
                    n
                ),
            });
        }
        if error.len() != matrix.len() {
            return Err(QlweError::InvalidInstance {
                message: format!(
                    "error vector has length {} but matrix has {} rows",
                    error.len(),
                    matrix.len()
                ),
            });
        }

        let in_range = |value: &u64| *value < modulus;
        if !matrix.iter().flatten().all(in_range)
            || !secret.iter().all(in_range)
            || !error.iter().all(in_range)
        {
            return Err(QlweError::InvalidInstance {
                message: format!("all entries must lie in [0, {})", modulus),
            });
        }

        Ok(Self {
            matrix,
            modulus,
            secret,
            error,
            bits,
        })
    }

    /// The public matrix `A`.
    pub fn matrix(&self) -> &[Vec<u64>] {
        &self.matrix
    }

    /// The modulus `M`.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// The secret vector `s`.
    pub fn secret(&self) -> &[u64] {
        &self.secret
    }

    /// The error vector `e`.
    pub fn error_vector(&self) -> &[u64] {
        &self.error
    }

    /// Number of matrix rows `m` (one phase qubit per row).
    pub fn rows(&self) -> usize {
        self.matrix.len()
    }

    /// Number of matrix columns `n` (one input register group per column).
    pub fn cols(&self) -> usize {
        self.matrix[0].len()
    }

    /// `log2(modulus)`, the number of bits per input coordinate.
    pub fn bit_width(&self) -> u32 {
        self.bits
    }

    /// Evaluates the noisy linear map `y = (A·s + e) mod modulus`.
    pub fn eval(&self) -> Vec<u64> {
        self.matrix
            .iter()
            .zip(&self.error)
            .map(|(row, &err)| {
                let dot: u128 = row
                    .iter()
                    .zip(&self.secret)
                    .map(|(&a, &s)| u128::from(a) * u128::from(s))
                    .sum();
                ((dot + u128::from(err)) % u128::from(self.modulus)) as u64
            })
            .collect()
    }
}
