// src/recovery/mod.rs

//! Classical post-processing: exhaustive preimage search over the input space
//! and GF(2) verification of the recovered linear equation.

use crate::core::codec::{to_fixed_width_digits, vector_to_concatenated_binary};

/// Thresholds each modular value against half the modulus: bit `i` is 1 iff
/// `values[i] >= modulus / 2`.
pub fn round_modular(values: &[u64], modulus: u64) -> Vec<u8> {
    values
        .iter()
        .map(|&value| u8::from(value >= modulus / 2))
        .collect()
}

/// Lazy generator over every base-`base` digit vector of length `length`, in
/// ascending canonical order (index `0 .. base^length`).
///
/// Restartable and cheap to clone; consumers short-circuit on first match
/// instead of walking the whole space.
#[derive(Debug, Clone)]
pub struct CandidateVectors {
    next_index: u64,
    end: u64,
    length: usize,
    base: u64,
}

impl CandidateVectors {
    /// Enumerates `base^length` candidates. The space is capped at the `u64`
    /// index range; this protocol's regime keeps both parameters far smaller.
    pub fn new(length: usize, base: u64) -> Self {
        let end = base.checked_pow(length as u32).unwrap_or(u64::MAX);
        Self {
            next_index: 0,
            end,
            length,
            base,
        }
    }
}

impl Iterator for CandidateVectors {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.end {
            return None;
        }
        let digits = to_fixed_width_digits(self.next_index, self.length, self.base);
        self.next_index += 1;
        Some(digits)
    }
}

/// Finds the first vector `x` (in canonical order) with entries in
/// `[0, modulus)` whose rounded image `[(A·x mod modulus)_i >= modulus/2]`
/// equals `target` exactly.
///
/// Returns `None` when the space is exhausted, a normal outcome for an
/// uninformative sample rather than an error.
pub fn find_preimage(target: &[u8], matrix: &[Vec<u64>], modulus: u64) -> Option<Vec<u64>> {
    let n = matrix.first()?.len();
    CandidateVectors::new(n, modulus)
        .find(|x| round_modular(&mat_vec_mod(matrix, x, modulus), modulus) == target)
}

/// Checks whether `direction · (x1 ⊕ x2) = bit` over GF(2), where `⊕` acts on
/// the concatenated least-significant-bit-first binary expansions of the two
/// vectors.
pub fn check_equation(x1: &[u64], x2: &[u64], direction: &[u8], bit: u8, modulus: u64) -> bool {
    let x1_bits = vector_to_concatenated_binary(x1, modulus);
    let x2_bits = vector_to_concatenated_binary(x2, modulus);
    let dot: u32 = direction
        .iter()
        .zip(x1_bits.iter().zip(&x2_bits))
        .map(|(&d, (&a, &b))| u32::from(d & (a ^ b)))
        .sum();
    (dot % 2) as u8 == bit
}

/// `A·x mod modulus`.
fn mat_vec_mod(matrix: &[Vec<u64>], x: &[u64], modulus: u64) -> Vec<u64> {
    matrix
        .iter()
        .map(|row| {
            let dot: u128 = row
                .iter()
                .zip(x)
                .map(|(&a, &xi)| u128::from(a) * u128::from(xi))
                .sum();
            (dot % u128::from(modulus)) as u64
        })
        .collect()
}
