//! Error handling logic

use std::fmt;

/// Unique identifier for a qubit wire within a circuit.
/// Uniqueness is context-dependent within one experiment; the oracle encoder
/// assigns contiguous ids according to its register layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q({})", self.0)
    }
}

/// Error types for instance construction, circuit execution and
/// experiment post-processing.
#[derive(Debug, Clone, PartialEq, Eq)] // Eq useful for testing error variants
pub enum QlweError {
    /// An LWE instance failed validation at construction time
    /// (modulus not a power of two, dimension mismatch, out-of-range entries).
    /// Fatal; nothing is encoded from an invalid instance.
    InvalidInstance {
        /// InvalidInstance failure message
        message: String
    },

    /// An operation or circuit is inconsistent with the execution model
    /// (gate after a measurement, control equal to target, unknown qubit).
    InvalidOperation {
        /// InvalidOperation failure message
        message: String
    },

    /// General error encountered by the state-vector backend itself.
    SimulationError {
        /// SimulationError failure message
        message: String
    },

    /// A measurement record lacks a label the consumer asked for.
    MissingMeasurement {
        /// The absent measurement key
        key: String
    },

    /// Every sampled repetition was degenerate, so ratio statistics
    /// (success rate, control bias) are undefined.
    InsufficientData {
        /// InsufficientData failure message
        message: String
    },
}

impl fmt::Display for QlweError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QlweError::InvalidInstance { message } => write!(f, "Invalid Instance: {}", message),
            QlweError::InvalidOperation { message } => write!(f, "Invalid Operation: {}", message),
            QlweError::SimulationError { message } => write!(f, "Simulation Process Error: {}", message),
            QlweError::MissingMeasurement { key } => write!(f, "Missing Measurement: no record for key '{}'", key),
            QlweError::InsufficientData { message } => write!(f, "Insufficient Data: {}", message),
        }
    }
}

// Implement the standard Error trait to allow for easy integration with Rust error handling.
impl std::error::Error for QlweError {}
