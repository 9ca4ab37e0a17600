// src/simulation/mod.rs

//! Executes `qlwe::circuits::Circuit` sequences and samples measurement
//! outcomes from them.
//!
//! The boundary the rest of the crate consumes is the narrow [`Sampler`]
//! trait: hand it an operation sequence and a repetition count, get back one
//! labeled [`MeasurementRecord`] per repetition. The concrete
//! [`StateVectorSampler`] backend drives the internal `SimulationEngine`;
//! deterministic stubs can stand in for it when testing the classical
//! pipeline alone.

// Make engine module crate visible for tests
mod results;
pub(crate) mod engine;

// Re-export the main public interface type
pub use results::MeasurementRecord;

// Import necessary types for the sampler and its methods
use crate::circuits::Circuit;
use crate::core::{QlweError, QubitId};
use crate::operations::Operation;
use engine::SimulationEngine;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A source of measurement samples for an operation sequence.
///
/// Each repetition must be an independent draw from the distribution implied
/// by the encoded state, and the register-to-label mapping of the circuit's
/// `Measure` operations must be preserved.
pub trait Sampler {
    /// Executes `circuit` and returns one record per repetition.
    fn sample(
        &mut self,
        circuit: &Circuit,
        repetitions: usize,
    ) -> Result<Vec<MeasurementRecord>, QlweError>;
}

/// Full state-vector sampling backend.
///
/// Applies the unitary prefix of the circuit once, then draws whole basis
/// states from the final amplitude distribution: one independent draw per
/// repetition, so every labeled bit vector within a record comes from the
/// same joint outcome.
pub struct StateVectorSampler {
    rng: StdRng,
}

impl StateVectorSampler {
    /// Creates a sampler seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: rand::make_rng(),
        }
    }

    /// Creates a sampler with a fixed seed, for reproducible statistics.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StateVectorSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for StateVectorSampler {
    fn sample(
        &mut self,
        circuit: &Circuit,
        repetitions: usize,
    ) -> Result<Vec<MeasurementRecord>, QlweError> {
        // An empty circuit measures nothing; every repetition is an empty record.
        if circuit.is_empty() {
            return Ok((0..repetitions).map(|_| MeasurementRecord::new()).collect());
        }

        let mut engine = SimulationEngine::init(circuit.qubits())?;

        // Split the sequence into its unitary prefix and terminal measurement
        // requests. A gate after a measurement has no defined semantics here.
        let mut measurements: Vec<(&[QubitId], &str)> = Vec::new();
        for op in circuit.operations() {
            match op {
                Operation::Measure { targets, key } => {
                    measurements.push((targets.as_slice(), key.as_str()));
                }
                _ => {
                    if !measurements.is_empty() {
                        return Err(QlweError::InvalidOperation {
                            message: "gate operations may not follow a measurement".to_string(),
                        });
                    }
                    engine.apply_operation(op)?;
                }
            }
        }

        let mut records = Vec::with_capacity(repetitions);
        for _ in 0..repetitions {
            let basis_index = engine.sample_basis_state(&mut self.rng)?;
            let mut record = MeasurementRecord::new();
            for (targets, key) in &measurements {
                let bits = targets
                    .iter()
                    .map(|qubit| engine.extract_bit(qubit, basis_index))
                    .collect::<Result<Vec<u8>, QlweError>>()?;
                record.record((*key).to_string(), bits);
            }
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use std::f64::consts::PI;

    const TEST_TOLERANCE: f64 = 1e-9;

    // --- Helper Functions ---
    fn qid(id: u64) -> QubitId {
        QubitId(id)
    }

    #[test]
    fn superpose_twice_returns_to_basis_state() -> Result<(), QlweError> {
        let q0 = qid(0);
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Superpose { target: q0 })
            .add_op(Operation::Superpose { target: q0 })
            .build();

        let mut engine = SimulationEngine::init(circuit.qubits())?;
        for op in circuit.operations() {
            engine.apply_operation(op)?;
        }
        assert!((engine.state()[0].norm() - 1.0).abs() < TEST_TOLERANCE);
        assert!(engine.state()[1].norm() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn phase_rotation_between_superpositions_flips_the_qubit() -> Result<(), QlweError> {
        // H · rz(π) · H = X up to global phase, so |0⟩ must measure as 1.
        let q0 = qid(0);
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Superpose { target: q0 })
            .add_op(Operation::PhaseRotate { target: q0, theta: PI })
            .add_op(Operation::Superpose { target: q0 })
            .add_op(Operation::Measure {
                targets: vec![q0],
                key: "m".to_string(),
            })
            .build();

        let mut sampler = StateVectorSampler::with_seed(7);
        let records = sampler.sample(&circuit, 32)?;
        assert!(records.iter().all(|r| r.bit("m").unwrap() == 1));
        Ok(())
    }

    #[test]
    fn controlled_rotation_kicks_phase_onto_the_control_branch() -> Result<(), QlweError> {
        // rz(2π) = -I, so the controlled form applies -1 exactly on the
        // control=1 branch; sandwiched between superpositions the control
        // must come out as 1 every time.
        let control = qid(0);
        let target = qid(1);
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Superpose { target: control })
            .add_op(Operation::ControlledPhaseRotate {
                control,
                target,
                theta: 2.0 * PI,
            })
            .add_op(Operation::Superpose { target: control })
            .add_op(Operation::Measure {
                targets: vec![control],
                key: "b".to_string(),
            })
            .build();

        let mut sampler = StateVectorSampler::with_seed(11);
        let records = sampler.sample(&circuit, 32)?;
        assert!(records.iter().all(|r| r.bit("b").unwrap() == 1));
        Ok(())
    }

    #[test]
    fn superposed_qubit_samples_both_outcomes() -> Result<(), QlweError> {
        let q0 = qid(0);
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Superpose { target: q0 })
            .add_op(Operation::Measure {
                targets: vec![q0],
                key: "m".to_string(),
            })
            .build();

        let mut sampler = StateVectorSampler::with_seed(42);
        let records = sampler.sample(&circuit, 200)?;
        let ones: usize = records
            .iter()
            .map(|r| r.bit("m").map(usize::from))
            .collect::<Result<Vec<_>, _>>()?
            .iter()
            .sum();
        // Fair coin over 200 draws; bounds are generous.
        assert!(ones > 50 && ones < 150, "got {} ones out of 200", ones);
        Ok(())
    }

    #[test]
    fn superposition_acts_on_every_register_position() -> Result<(), QlweError> {
        // Apply H to each qubit of a three-qubit register in turn and check
        // the targeted qubit (and only that one) becomes random. Exercises
        // the pair expansion for low, middle, and high bit positions.
        for target in 0..3u64 {
            let circuit = CircuitBuilder::new()
                .add_op(Operation::Superpose { target: qid(target) })
                .add_op(Operation::Measure {
                    targets: vec![qid(0), qid(1), qid(2)],
                    key: "all".to_string(),
                })
                .build();

            let mut sampler = StateVectorSampler::with_seed(17 + target);
            let records = sampler.sample(&circuit, 100)?;
            let mut ones = [0usize; 3];
            for record in &records {
                for (count, &bit) in ones.iter_mut().zip(record.bits("all")?) {
                    *count += usize::from(bit);
                }
            }
            for (position, &count) in ones.iter().enumerate() {
                if position as u64 == target {
                    assert!(count > 20 && count < 80, "qubit {} saw {} ones", position, count);
                } else {
                    assert_eq!(count, 0, "untouched qubit {} flipped", position);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn sampling_is_reproducible_for_equal_seeds() -> Result<(), QlweError> {
        let q0 = qid(0);
        let q1 = qid(1);
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Superpose { target: q0 })
            .add_op(Operation::Superpose { target: q1 })
            .add_op(Operation::Measure {
                targets: vec![q0, q1],
                key: "pair".to_string(),
            })
            .build();

        let mut first = StateVectorSampler::with_seed(123);
        let mut second = StateVectorSampler::with_seed(123);
        assert_eq!(
            first.sample(&circuit, 50)?,
            second.sample(&circuit, 50)?
        );
        Ok(())
    }

    #[test]
    fn gates_after_measurement_are_rejected() {
        let q0 = qid(0);
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Measure {
                targets: vec![q0],
                key: "m".to_string(),
            })
            .add_op(Operation::Superpose { target: q0 })
            .build();

        let mut sampler = StateVectorSampler::with_seed(1);
        let result = sampler.sample(&circuit, 1);
        assert!(matches!(result, Err(QlweError::InvalidOperation { .. })));
    }

    #[test]
    fn missing_labels_are_reported() -> Result<(), QlweError> {
        let q0 = qid(0);
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Measure {
                targets: vec![q0],
                key: "m".to_string(),
            })
            .build();

        let mut sampler = StateVectorSampler::with_seed(1);
        let records = sampler.sample(&circuit, 1)?;
        assert!(matches!(
            records[0].bits("absent"),
            Err(QlweError::MissingMeasurement { .. })
        ));
        Ok(())
    }
}
