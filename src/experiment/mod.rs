// src/experiment/mod.rs

//! Drives repetitions of the encoded experiment and folds the measurement
//! records into success and bias statistics.
//!
//! The aggregator is diagnostic: it holds the true secret so it can shift a
//! recovered preimage and verify the linear relation the protocol claims. It
//! is not a blind attacker.

use crate::core::{LweInstance, QlweError};
use crate::encoder::{CONTROL_KEY, LinearOracleEncoder, ROUNDED_OUTPUT_KEY, direction_key};
use crate::recovery::{check_equation, find_preimage};
use crate::simulation::{MeasurementRecord, Sampler};
use std::fmt;

/// Running counts over an experiment's repetitions.
///
/// Degenerate repetitions (all-zero direction vector) are excluded from both
/// numerator and denominator; repetitions whose preimage search comes up
/// empty stay in the denominator as valid-but-unsuccessful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExperimentStatistics {
    repetitions: usize,
    valid_runs: usize,
    successes: usize,
    control_bit_sum: u64,
}

impl ExperimentStatistics {
    /// Total repetitions sampled, including degenerate ones.
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Repetitions whose direction vector was nonzero.
    pub fn valid_runs(&self) -> usize {
        self.valid_runs
    }

    /// Valid repetitions whose recovered equation checked out.
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// Sum of the control bit over valid repetitions.
    pub fn control_bit_sum(&self) -> u64 {
        self.control_bit_sum
    }

    /// Empirical success probability `successes / valid_runs`.
    ///
    /// # Errors
    /// Returns [`QlweError::InsufficientData`] when every repetition was
    /// degenerate.
    pub fn success_rate(&self) -> Result<f64, QlweError> {
        self.ratio(self.successes as f64)
    }

    /// Empirical control-bit bias `control_bit_sum / valid_runs`.
    ///
    /// # Errors
    /// Returns [`QlweError::InsufficientData`] when every repetition was
    /// degenerate.
    pub fn control_bias(&self) -> Result<f64, QlweError> {
        self.ratio(self.control_bit_sum as f64)
    }

    fn ratio(&self, numerator: f64) -> Result<f64, QlweError> {
        if self.valid_runs == 0 {
            return Err(QlweError::InsufficientData {
                message: format!(
                    "no valid repetitions among {} sampled; ratios are undefined",
                    self.repetitions
                ),
            });
        }
        Ok(numerator / self.valid_runs as f64)
    }
}

impl fmt::Display for ExperimentStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Experiment Statistics:")?;
        writeln!(f, "  repetitions: {}", self.repetitions)?;
        writeln!(f, "  valid runs:  {}", self.valid_runs)?;
        writeln!(f, "  successes:   {}", self.successes)?;
        match (self.success_rate(), self.control_bias()) {
            (Ok(rate), Ok(bias)) => {
                writeln!(f, "  success rate: {:.4}", rate)?;
                writeln!(f, "  control bias: {:.4}", bias)?;
            }
            _ => {
                writeln!(f, "  success rate: undefined (no valid runs)")?;
            }
        }
        Ok(())
    }
}

/// One informative repetition, after the degenerate-sample filter.
struct ValidSample {
    control: u8,
    direction: Vec<u8>,
    rounded: Vec<u8>,
}

/// Runs the full pipeline for one LWE instance: encode once, sample
/// repeatedly, recover and verify per repetition, accumulate counts.
pub struct ExperimentAggregator<'a> {
    instance: &'a LweInstance,
}

impl<'a> ExperimentAggregator<'a> {
    /// Builds an aggregator over a fixed, already-validated instance.
    pub fn new(instance: &'a LweInstance) -> Self {
        Self { instance }
    }

    /// Encodes the oracle, draws `repetitions` samples from `sampler`, and
    /// folds them into statistics.
    pub fn run<S: Sampler>(
        &self,
        sampler: &mut S,
        repetitions: usize,
    ) -> Result<ExperimentStatistics, QlweError> {
        let (circuit, _register) = LinearOracleEncoder::encode(self.instance);
        let records = sampler.sample(&circuit, repetitions)?;
        self.accumulate(&records)
    }

    /// Folds already-sampled records into statistics. Filtering happens
    /// first: only informative samples reach the recovery stage.
    pub fn accumulate(
        &self,
        records: &[MeasurementRecord],
    ) -> Result<ExperimentStatistics, QlweError> {
        let mut stats = ExperimentStatistics {
            repetitions: records.len(),
            ..ExperimentStatistics::default()
        };

        for record in records {
            let Some(sample) = self.filter_informative(record)? else {
                continue; // uninformative, carries no constraint
            };
            stats.valid_runs += 1;
            stats.control_bit_sum += u64::from(sample.control);
            if self.recover_and_verify(&sample) {
                stats.successes += 1;
            }
        }
        Ok(stats)
    }

    /// Extracts the labeled bits of one record, dropping degenerate samples
    /// (all-zero direction vector) entirely.
    fn filter_informative(
        &self,
        record: &MeasurementRecord,
    ) -> Result<Option<ValidSample>, QlweError> {
        let control = record.bit(CONTROL_KEY)?;
        let mut direction =
            Vec::with_capacity(self.instance.cols() * self.instance.bit_width() as usize);
        for j in 0..self.instance.cols() {
            direction.extend_from_slice(record.bits(&direction_key(j))?);
        }
        if direction.iter().all(|&bit| bit == 0) {
            return Ok(None);
        }
        let rounded = record.bits(ROUNDED_OUTPUT_KEY)?.to_vec();
        Ok(Some(ValidSample {
            control,
            direction,
            rounded,
        }))
    }

    /// Searches for a preimage of the rounded output and, on a hit, verifies
    /// the GF(2) relation between it and its secret-shifted counterpart. An
    /// absent preimage leaves the repetition valid but unsuccessful.
    fn recover_and_verify(&self, sample: &ValidSample) -> bool {
        let modulus = self.instance.modulus();
        match find_preimage(&sample.rounded, self.instance.matrix(), modulus) {
            Some(x) => {
                let z: Vec<u64> = x
                    .iter()
                    .zip(self.instance.secret())
                    .map(|(&xi, &si)| (xi + modulus - si) % modulus)
                    .collect();
                check_equation(&x, &z, &sample.direction, sample.control, modulus)
            }
            None => false,
        }
    }
}
