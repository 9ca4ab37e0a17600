// src/operations/mod.rs

//! Defines the gate vocabulary the oracle encoder emits and the sampling
//! backend executes.
//!
//! The set is deliberately small: equal-superposition preparation, z-axis
//! phase rotations (plain and controlled), and terminal measurement requests.
//! Everything the phase-kickback construction needs is expressible with these
//! four operations.

// Import necessary types from the core module
use crate::core::QubitId;
use std::fmt;

/// A single gate or measurement request within an operation sequence,
/// referencing qubits by their register ids.
#[derive(Debug, Clone, PartialEq)] // PartialEq compares rotation angles bit-exactly; encoder output is deterministic.
pub enum Operation {
    /// Places the target qubit into an equal superposition over both basis
    /// states (Hadamard). Applied once to prepare interference and a second
    /// time to read the resulting linear constraint back out.
    Superpose {
        /// The qubit being prepared.
        target: QubitId,
    },

    /// A z-axis rotation `rz(theta) = diag(e^{-iθ/2}, e^{+iθ/2})`.
    ///
    /// The half-angle convention is load-bearing: the controlled form below
    /// inherits it, and the phase picked up on the control branch takes part
    /// in the interference pattern the protocol measures.
    PhaseRotate {
        /// The rotated qubit.
        target: QubitId,
        /// Rotation angle in radians.
        theta: f64,
    },

    /// `rz(theta)` applied to `target` only when `control` is set:
    /// `diag(1, 1, e^{-iθ/2}, e^{+iθ/2})` in the `|control, target⟩` basis.
    /// This is the phase-kickback workhorse.
    ControlledPhaseRotate {
        /// The qubit conditioning the rotation.
        control: QubitId,
        /// The phase qubit receiving the rotation.
        target: QubitId,
        /// Rotation angle in radians.
        theta: f64,
    },

    /// Requests measurement of an ordered list of qubits under a string key.
    /// Bits in the resulting record follow the order of `targets`.
    /// Measurements are terminal: no gate may follow one in a circuit.
    Measure {
        /// The qubits to read out, in record order.
        targets: Vec<QubitId>,
        /// Label under which the outcome is reported.
        key: String,
    },
}

impl Operation {
    /// Returns every qubit id referenced by this operation's parameters.
    /// The circuit uses this to track the full register a sequence touches.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Superpose { target } => vec![*target],
            Operation::PhaseRotate { target, .. } => vec![*target],
            Operation::ControlledPhaseRotate { control, target, .. } => vec![*control, *target],
            Operation::Measure { targets, .. } => targets.clone(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Superpose { target } => write!(f, "H({})", target),
            Operation::PhaseRotate { target, theta } => {
                write!(f, "Rz({}, θ={:.4})", target, theta)
            }
            Operation::ControlledPhaseRotate { control, target, theta } => {
                write!(f, "CRz({} → {}, θ={:.4})", control, target, theta)
            }
            Operation::Measure { targets, key } => {
                write!(f, "M[")?;
                for (i, qubit) in targets.iter().enumerate() {
                    write!(f, "{}{}", if i > 0 { ", " } else { "" }, qubit)?;
                }
                write!(f, "] ⇒ '{}'", key)
            }
        }
    }
}
