// src/simulation/engine.rs
use crate::core::{QlweError, QubitId};
use crate::operations::Operation;
// NOTE: Does not directly use Circuit, operates on ops passed from the sampler
use num_complex::Complex;
use num_traits::Zero; // For Complex::zero()
use rand::{Rng, RngExt};
use std::collections::{HashMap, HashSet};
use std::f64::consts::FRAC_1_SQRT_2;

/// Amplitudes below this are treated as numerically zero when sampling.
const AMPLITUDE_TOLERANCE: f64 = 1e-12;

/// The state-vector engine behind `StateVectorSampler`.
///
/// Holds the `2^N` complex amplitude vector for the full register and applies
/// the unitary part of a circuit to it; measurement happens afterwards by
/// drawing whole basis states from the resulting amplitude distribution.
/// (Internal visibility)
pub(crate) struct SimulationEngine {
    /// Maps qubit ids to their index (0..N-1) in the ordered list used for the
    /// global state vector.
    qubit_indices: HashMap<QubitId, usize>,
    /// The global amplitude vector, dimension `2^N`, starting in |0...0⟩.
    state: Vec<Complex<f64>>,
    /// Number of qubits being simulated (N).
    num_qubits: usize,
}

impl SimulationEngine {
    /// Initializes the engine for a given set of qubits in the |0...0⟩ state.
    pub(crate) fn init(qubit_ids: &HashSet<QubitId>) -> Result<Self, QlweError> {
        if qubit_ids.is_empty() {
            return Err(QlweError::InvalidOperation {
                message: "cannot initialize simulation engine with zero qubits".to_string(),
            });
        }

        let num_qubits = qubit_ids.len();
        let dim = 1usize
            .checked_shl(num_qubits as u32)
            .ok_or_else(|| QlweError::SimulationError {
                message: "qubit count too large, state vector dimension overflows usize".to_string(),
            })?;

        // Sort ids so index assignment is deterministic regardless of
        // HashSet iteration order.
        let mut sorted_ids: Vec<QubitId> = qubit_ids.iter().cloned().collect();
        sorted_ids.sort();
        let mut qubit_indices = HashMap::with_capacity(num_qubits);
        for (index, qubit_id) in sorted_ids.into_iter().enumerate() {
            qubit_indices.insert(qubit_id, index);
        }

        let mut state = vec![Complex::zero(); dim];
        state[0] = Complex::new(1.0, 0.0);

        Ok(Self {
            qubit_indices,
            state,
            num_qubits,
        })
    }

    /// Applies a single unitary operation to the global state.
    ///
    /// `Measure` is rejected here: the sampler collects measurement requests
    /// separately and draws outcomes from the final state.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<(), QlweError> {
        match op {
            Operation::Superpose { target } => {
                let target_idx = self.qubit_index(target)?;
                self.apply_superpose(target_idx);
            }
            Operation::PhaseRotate { target, theta } => {
                let target_idx = self.qubit_index(target)?;
                self.apply_phase_rotation(target_idx, *theta);
            }
            Operation::ControlledPhaseRotate {
                control,
                target,
                theta,
            } => {
                let control_idx = self.qubit_index(control)?;
                let target_idx = self.qubit_index(target)?;
                if control_idx == target_idx {
                    return Err(QlweError::InvalidOperation {
                        message: "control and target qubits cannot be the same for a controlled rotation"
                            .to_string(),
                    });
                }
                self.apply_controlled_phase_rotation(control_idx, target_idx, *theta);
            }
            Operation::Measure { .. } => {
                return Err(QlweError::InvalidOperation {
                    message: "Measure operations should not be passed to apply_operation".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Draws one basis-state index from the |amplitude|² distribution of the
    /// current state.
    pub(crate) fn sample_basis_state<R: Rng>(&self, rng: &mut R) -> Result<usize, QlweError> {
        let total: f64 = self.state.iter().map(|amp| amp.norm_sqr()).sum();
        if total < AMPLITUDE_TOLERANCE {
            return Err(QlweError::SimulationError {
                message: "state vector has negligible total probability mass".to_string(),
            });
        }

        // Sample in [0, total) so slight normalization drift cannot bias
        // the draw toward low indices.
        let threshold: f64 = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        let mut chosen = self.state.len() - 1;
        for (index, amp) in self.state.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if threshold < cumulative {
                chosen = index;
                break;
            }
        }
        Ok(chosen)
    }

    /// Extracts the measured bit of `qubit_id` from a sampled basis index.
    pub(crate) fn extract_bit(
        &self,
        qubit_id: &QubitId,
        basis_index: usize,
    ) -> Result<u8, QlweError> {
        let qubit_idx = self.qubit_index(qubit_id)?;
        let bit_pos = self.num_qubits - 1 - qubit_idx;
        Ok(((basis_index >> bit_pos) & 1) as u8)
    }

    /// Helper to get a qubit's index, returning a specific error if not found.
    fn qubit_index(&self, qubit_id: &QubitId) -> Result<usize, QlweError> {
        self.qubit_indices
            .get(qubit_id)
            .copied()
            .ok_or_else(|| QlweError::InvalidOperation {
                message: format!("qubit {} not found in simulation context", qubit_id),
            })
    }

    // --- State manipulation helpers ---
    // The global state assumes the standard tensor-product structure: the
    // qubit at sorted index i owns bit position (N-1-i) of a basis index.

    /// Applies the Hadamard-style superposition matrix to a single qubit by
    /// iterating over pairs of basis states differing only at its position.
    fn apply_superpose(&mut self, target_idx: usize) {
        let k = self.num_qubits - 1 - target_idx; // Bit position (from right, 0-based)
        let k_mask = 1usize << k;
        let lower_mask = k_mask - 1; // Bits to the right of the target

        let dim = self.state.len();
        for i in 0..dim / 2 {
            // Expand the pair counter into the indices of |...0...⟩ and
            // |...1...⟩ at the target position: bits at and above k shift up
            // one place to leave the target bit free.
            let i0 = ((i & !lower_mask) << 1) | (i & lower_mask);
            let i1 = i0 | k_mask;

            let psi0 = self.state[i0];
            let psi1 = self.state[i1];
            self.state[i0] = (psi0 + psi1) * FRAC_1_SQRT_2;
            self.state[i1] = (psi0 - psi1) * FRAC_1_SQRT_2;
        }
    }

    /// Applies `rz(theta) = diag(e^{-iθ/2}, e^{+iθ/2})` to a single qubit.
    /// Diagonal, so a single pass over the amplitudes suffices.
    fn apply_phase_rotation(&mut self, target_idx: usize, theta: f64) {
        let k_mask = 1usize << (self.num_qubits - 1 - target_idx);
        let negative = Complex::from_polar(1.0, -theta / 2.0);
        let positive = Complex::from_polar(1.0, theta / 2.0);

        for (index, amp) in self.state.iter_mut().enumerate() {
            *amp *= if index & k_mask != 0 { positive } else { negative };
        }
    }

    /// Applies `rz(theta)` to the target on the control=1 branch only:
    /// `diag(1, 1, e^{-iθ/2}, e^{+iθ/2})` in the |control, target⟩ basis.
    /// The half-angle phase on the control branch is part of the protocol's
    /// interference pattern and must not be folded away.
    fn apply_controlled_phase_rotation(&mut self, control_idx: usize, target_idx: usize, theta: f64) {
        let control_mask = 1usize << (self.num_qubits - 1 - control_idx);
        let target_mask = 1usize << (self.num_qubits - 1 - target_idx);
        let negative = Complex::from_polar(1.0, -theta / 2.0);
        let positive = Complex::from_polar(1.0, theta / 2.0);

        for (index, amp) in self.state.iter_mut().enumerate() {
            if index & control_mask != 0 {
                *amp *= if index & target_mask != 0 { positive } else { negative };
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &[Complex<f64>] {
        &self.state
    }
}
