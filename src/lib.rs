// src/lib.rs

//! `qlwe` - A library simulating a quantum phase-kickback recovery pipeline
//! for LWE-style instances
//!
//! The pipeline has three stages: an oracle encoder that turns a noisy
//! modular linear map into a sequence of basis preparations and controlled
//! phase rotations, a sampling backend that executes the sequence and draws
//! labeled measurement outcomes, and a classical recovery stage that searches
//! for preimages of the rounded output and verifies a linear equation over
//! GF(2) against them.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod encoder;
pub mod simulation;
pub mod recovery;
pub mod experiment;

// Re-export the most common types for easier top-level use
pub use core::{LweInstance, QlweError, QubitId};
pub use operations::Operation;
pub use circuits::{Circuit, CircuitBuilder};
pub use encoder::{LinearOracleEncoder, QubitRegister};
pub use simulation::{MeasurementRecord, Sampler, StateVectorSampler};
pub use recovery::{CandidateVectors, check_equation, find_preimage, round_modular};
pub use experiment::{ExperimentAggregator, ExperimentStatistics};

// Example 1: Encoding an instance
// Demonstrates validating an LWE instance, evaluating its noisy linear map,
// and building the phase-kickback operation sequence.
/// ```
/// use qlwe::{LinearOracleEncoder, LweInstance, QlweError};
///
/// let instance = LweInstance::new(
///     vec![
///         vec![4, 4],
///         vec![0, 6],
///         vec![6, 0],
///         vec![4, 7],
///         vec![0, 4],
///         vec![7, 5],
///     ],
///     vec![1, 0],
///     vec![1, 1, 0, 0, 0, 0],
///     8,
/// )?;
///
/// // y = (A·s + e) mod 8, fixed before any sampling happens.
/// assert_eq!(instance.eval(), vec![5, 1, 6, 4, 0, 7]);
///
/// let (circuit, register) = LinearOracleEncoder::encode(&instance);
/// // One control qubit, 2 coordinates × 3 bits, 6 phase qubits.
/// assert_eq!(register.total_qubits(), 13);
/// println!("{}", circuit);
/// # Ok::<(), QlweError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Running the full experiment
// Encode, sample repeatedly with a seeded backend, and fold the outcomes
// into success and bias statistics.
/// ```
/// use qlwe::{ExperimentAggregator, LweInstance, QlweError, StateVectorSampler};
///
/// let instance = LweInstance::new(
///     vec![
///         vec![4, 4],
///         vec![0, 6],
///         vec![6, 0],
///         vec![4, 7],
///         vec![0, 4],
///         vec![7, 5],
///     ],
///     vec![1, 0],
///     vec![1, 1, 0, 0, 0, 0],
///     8,
/// )?;
///
/// let aggregator = ExperimentAggregator::new(&instance);
/// let mut sampler = StateVectorSampler::with_seed(7);
/// let stats = aggregator.run(&mut sampler, 200)?;
///
/// assert_eq!(stats.repetitions(), 200);
/// assert!(stats.valid_runs() > 0);
/// println!("{}", stats);
/// # Ok::<(), QlweError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
