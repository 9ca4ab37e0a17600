// src/encoder/mod.rs

//! Translates an LWE instance into the operation sequence that encodes the
//! modular linear map into phase qubits.
//!
//! After the kickback loop, phase qubit `i` sits in `|+_θ⟩` with
//! `θ = π/4 · (⟨A_i, x⟩ + b·y_i)`, where `x` ranges jointly over the
//! superposed input register and `b` over the control qubit. A second
//! superposition layer on the control and input qubits then turns that phase
//! pattern into an interference pattern, and a fixed `-3π/8` basis rotation
//! aligns the phase qubits with the measurement basis the constraint
//! extraction needs.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{LweInstance, QubitId};
use crate::operations::Operation;
use std::f64::consts::{FRAC_PI_4, FRAC_PI_8};

/// Measurement key for the single control bit.
pub const CONTROL_KEY: &str = "control";

/// Measurement key for the combined phase-qubit readout.
pub const ROUNDED_OUTPUT_KEY: &str = "rounded-output";

/// Measurement key for the direction bits of input coordinate `coordinate`.
pub fn direction_key(coordinate: usize) -> String {
    format!("direction-{coordinate}")
}

/// The label partition of the qubit register: one control qubit, `n` groups
/// of `bits` input qubits (one group per input coordinate, bit `k` carrying
/// weight `2^k`), and `m` phase qubits (one per matrix row).
///
/// Purely an addressing scheme; ids are contiguous and deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QubitRegister {
    bits: u32,
    inputs: usize,
    phases: usize,
}

impl QubitRegister {
    /// Lays out a register for an instance with `inputs` coordinates of
    /// `bits` bits each and `phases` output rows.
    pub fn new(inputs: usize, bits: u32, phases: usize) -> Self {
        Self {
            bits,
            inputs,
            phases,
        }
    }

    /// The control qubit.
    pub fn control(&self) -> QubitId {
        QubitId(0)
    }

    /// The qubit holding bit `bit` (weight `2^bit`) of input coordinate `coordinate`.
    pub fn input(&self, coordinate: usize, bit: u32) -> QubitId {
        QubitId(1 + coordinate as u64 * u64::from(self.bits) + u64::from(bit))
    }

    /// All qubits of one input coordinate, least significant bit first.
    pub fn input_group(&self, coordinate: usize) -> Vec<QubitId> {
        (0..self.bits).map(|bit| self.input(coordinate, bit)).collect()
    }

    /// The phase qubit for matrix row `row`.
    pub fn phase(&self, row: usize) -> QubitId {
        QubitId(1 + self.inputs as u64 * u64::from(self.bits) + row as u64)
    }

    /// All phase qubits in row order.
    pub fn phase_group(&self) -> Vec<QubitId> {
        (0..self.phases).map(|row| self.phase(row)).collect()
    }

    /// Total number of qubits in the register.
    pub fn total_qubits(&self) -> usize {
        1 + self.inputs * self.bits as usize + self.phases
    }
}

/// Builds the phase-kickback operation sequence for an LWE instance.
///
/// Construction is deterministic and side-effect free: encoding the same
/// instance twice yields identical sequences.
pub struct LinearOracleEncoder;

impl LinearOracleEncoder {
    /// Emits the full operation sequence and the register layout it addresses.
    pub fn encode(instance: &LweInstance) -> (Circuit, QubitRegister) {
        let m = instance.rows();
        let n = instance.cols();
        let bits = instance.bit_width();
        let register = QubitRegister::new(n, bits, m);
        let y = instance.eval();

        let mut builder = CircuitBuilder::new();

        // Superpose the control qubit and every input bit qubit,
        // yielding the joint state Σ_{b,x} |b⟩|x⟩|0⟩.
        builder = builder.add_op(Operation::Superpose {
            target: register.control(),
        });
        for j in 0..n {
            for k in 0..bits {
                builder = builder.add_op(Operation::Superpose {
                    target: register.input(j, k),
                });
            }
        }

        // Prepare the phase qubits for kickback.
        for i in 0..m {
            builder = builder.add_op(Operation::Superpose {
                target: register.phase(i),
            });
        }

        // Kick the modular linear map into the phase qubits. Bit (j, k) of the
        // input register contributes A[i][j]·2^k to the angle on phase qubit i;
        // the control qubit contributes y[i].
        for i in 0..m {
            for j in 0..n {
                for k in 0..bits {
                    let total = instance.matrix()[i][j] << k;
                    if rotation_is_observable(total) {
                        builder = builder.add_op(Operation::ControlledPhaseRotate {
                            control: register.input(j, k),
                            target: register.phase(i),
                            theta: total as f64 * FRAC_PI_4,
                        });
                    }
                }
            }
            if rotation_is_observable(y[i]) {
                builder = builder.add_op(Operation::ControlledPhaseRotate {
                    control: register.control(),
                    target: register.phase(i),
                    theta: y[i] as f64 * FRAC_PI_4,
                });
            }
        }

        // Second superposition layer: interference turns the accumulated
        // phases into an equation in the secret.
        builder = builder.add_op(Operation::Superpose {
            target: register.control(),
        });
        for j in 0..n {
            for k in 0..bits {
                builder = builder.add_op(Operation::Superpose {
                    target: register.input(j, k),
                });
            }
        }

        // Measure the phase qubits in the {|+_{3π/8}⟩, |−_{3π/8}⟩} basis.
        for i in 0..m {
            builder = builder.add_op(Operation::PhaseRotate {
                target: register.phase(i),
                theta: -3.0 * FRAC_PI_8,
            });
            builder = builder.add_op(Operation::Superpose {
                target: register.phase(i),
            });
        }

        // Readout: one scalar, one vector per input coordinate, one combined
        // vector over all phase qubits.
        builder = builder.add_op(Operation::Measure {
            targets: vec![register.control()],
            key: CONTROL_KEY.to_string(),
        });
        for j in 0..n {
            builder = builder.add_op(Operation::Measure {
                targets: register.input_group(j),
                key: direction_key(j),
            });
        }
        builder = builder.add_op(Operation::Measure {
            targets: register.phase_group(),
            key: ROUNDED_OUTPUT_KEY.to_string(),
        });

        (builder.build(), register)
    }
}

/// Angle-degeneracy pruning: a rotation by `total·π/4` is kept only when the
/// angle is not an integer multiple of `2π`, i.e. `total % 8 != 0`. The
/// degenerate angles are skipped silently.
pub(crate) fn rotation_is_observable(total: u64) -> bool {
    total % 4 != 0 || (total / 4) % 2 == 1
}
