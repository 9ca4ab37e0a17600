// tests/encoding_tests.rs

// Covers the classical codec contracts, instance validation, and the
// deterministic structure of the encoded operation sequence.

use qlwe::core::codec::{
    log2_exact, to_fixed_width_binary, to_fixed_width_digits, vector_to_concatenated_binary,
};
use qlwe::{LinearOracleEncoder, LweInstance, Operation, QlweError};
use std::f64::consts::PI;

// The instance used throughout: m = 6, n = 2, modulus = 8.
fn reference_instance() -> LweInstance {
    LweInstance::new(
        vec![
            vec![4, 4],
            vec![0, 6],
            vec![6, 0],
            vec![4, 7],
            vec![0, 4],
            vec![7, 5],
        ],
        vec![1, 0],
        vec![1, 1, 0, 0, 0, 0],
        8,
    )
    .expect("reference instance is valid")
}

#[test]
fn binary_codec_contract() {
    assert_eq!(to_fixed_width_binary(6, 3), vec![1, 1, 0]);
    for width in 1..=6u32 {
        for value in 0..(1u64 << width) {
            let bits = to_fixed_width_binary(value, width);
            assert_eq!(bits.len(), width as usize);
            let reconstructed: u64 = bits
                .iter()
                .enumerate()
                .map(|(k, &bit)| u64::from(bit) << (width as usize - 1 - k))
                .sum();
            assert_eq!(reconstructed, value, "width {} value {}", width, value);
        }
    }
}

#[test]
fn digit_codec_contract() {
    assert_eq!(to_fixed_width_digits(13, 3, 3), vec![1, 1, 1]);
    for base in 2..=5u64 {
        let width = 3usize;
        for value in 0..base.pow(width as u32) {
            let digits = to_fixed_width_digits(value, width, base);
            let reconstructed = digits.iter().fold(0, |acc, &d| acc * base + d);
            assert_eq!(reconstructed, value, "base {} value {}", base, value);
        }
    }
}

#[test]
fn concatenated_binary_length_invariant() {
    for modulus in [2u64, 4, 8, 16, 32] {
        let width = log2_exact(modulus).unwrap() as usize;
        let vector: Vec<u64> = (0..modulus).collect();
        let bits = vector_to_concatenated_binary(&vector, modulus);
        assert_eq!(bits.len(), vector.len() * width);
    }
}

#[test]
fn instance_validation_rejects_bad_parameters() {
    let bad_modulus = LweInstance::new(vec![vec![1]], vec![0], vec![0], 6);
    assert!(matches!(
        bad_modulus,
        Err(QlweError::InvalidInstance { .. })
    ));

    let out_of_range = LweInstance::new(vec![vec![9, 0]], vec![0, 0], vec![0], 8);
    assert!(matches!(
        out_of_range,
        Err(QlweError::InvalidInstance { .. })
    ));
}

#[test]
fn noisy_linear_map_evaluates_before_sampling() {
    assert_eq!(reference_instance().eval(), vec![5, 1, 6, 4, 0, 7]);
}

#[test]
fn encoding_is_idempotent() {
    let instance = reference_instance();
    let (first, _) = LinearOracleEncoder::encode(&instance);
    let (second, _) = LinearOracleEncoder::encode(&instance);

    assert_eq!(first.len(), second.len());
    let angles = |circuit: &qlwe::Circuit| -> Vec<f64> {
        circuit
            .operations()
            .iter()
            .filter_map(|op| match op {
                Operation::PhaseRotate { theta, .. } => Some(*theta),
                Operation::ControlledPhaseRotate { theta, .. } => Some(*theta),
                _ => None,
            })
            .collect()
    };
    assert_eq!(angles(&first), angles(&second));
}

#[test]
fn encoded_angles_are_quarter_pi_multiples() {
    let (circuit, register) = LinearOracleEncoder::encode(&reference_instance());

    // The first kickback rotation comes from A[0][0]·2^0 = 4 → θ = π.
    let first_controlled = circuit
        .operations()
        .iter()
        .find_map(|op| match op {
            Operation::ControlledPhaseRotate {
                control,
                target,
                theta,
            } => Some((*control, *target, *theta)),
            _ => None,
        })
        .unwrap();
    assert_eq!(first_controlled.0, register.input(0, 0));
    assert_eq!(first_controlled.1, register.phase(0));
    assert!((first_controlled.2 - PI).abs() < 1e-12);

    // Every controlled rotation is a multiple of π/4 that is not a
    // multiple of 2π.
    for op in circuit.operations() {
        if let Operation::ControlledPhaseRotate { theta, .. } = op {
            let quarters = theta / (PI / 4.0);
            assert!((quarters - quarters.round()).abs() < 1e-9);
            assert!(quarters.round() as i64 % 8 != 0);
        }
    }

    // The readout basis rotation is the fixed -3π/8.
    for op in circuit.operations() {
        if let Operation::PhaseRotate { theta, .. } = op {
            assert!((theta + 3.0 * PI / 8.0).abs() < 1e-12);
        }
    }
}
