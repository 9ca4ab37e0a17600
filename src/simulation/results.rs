// src/simulation/results.rs
use crate::core::QlweError;
use std::collections::HashMap;
use std::fmt;

/// One repetition's measurement outcome: a mapping from measurement label to
/// the bits read out under that label, in the qubit order the `Measure`
/// operation declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRecord {
    outcomes: HashMap<String, Vec<u8>>,
}

impl MeasurementRecord {
    /// Creates a new, empty record. (Internal visibility)
    pub(crate) fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
        }
    }

    /// Records the bits measured under a label. (Internal visibility)
    pub(crate) fn record(&mut self, key: String, bits: Vec<u8>) {
        self.outcomes.insert(key, bits);
    }

    /// The bit vector measured under `key`.
    ///
    /// # Errors
    /// Returns [`QlweError::MissingMeasurement`] when the label is absent.
    pub fn bits(&self, key: &str) -> Result<&[u8], QlweError> {
        self.outcomes
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| QlweError::MissingMeasurement {
                key: key.to_string(),
            })
    }

    /// The first bit measured under `key`, for scalar labels such as the
    /// control qubit's.
    ///
    /// # Errors
    /// Returns [`QlweError::MissingMeasurement`] when the label is absent or
    /// carries no bits.
    pub fn bit(&self, key: &str) -> Result<u8, QlweError> {
        self.bits(key)?
            .first()
            .copied()
            .ok_or_else(|| QlweError::MissingMeasurement {
                key: key.to_string(),
            })
    }

    /// Returns `true` when no label has been recorded.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl fmt::Display for MeasurementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement Record:")?;
        if self.outcomes.is_empty() {
            writeln!(f, "  (no labels recorded)")?;
        } else {
            // Sort by key for consistent and readable output
            let mut sorted: Vec<_> = self.outcomes.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            for (key, bits) in sorted {
                writeln!(f, "  {}: {:?}", key, bits)?;
            }
        }
        Ok(())
    }
}
