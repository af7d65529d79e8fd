//! The PowersOfTwo domain (spec.md §8 scenario 2): discover a nucleo
//! program that computes `2^n` for small `n` via the full 12-opcode
//! instruction set (`DEC`, `DOUBLE`, `LOOP` included).

use super::closeness_score;
use crate::domain::Domain;
use crate::vm::{self, InstructionSet};

/// Number of nucleos in a PowersOfTwo genome (16 * 3 bytes = 48).
pub const NUCLEO_COUNT: usize = 16;
pub const GENOME_SIZE: usize = NUCLEO_COUNT * 3;

/// Probe range used both for fitness scoring and for
/// [`PowersOfTwoCalculator::compute`].
pub const PROBE_RANGE: std::ops::RangeInclusive<u64> = 0..=9;

/// The reference table a genome is scored against.
pub struct PowersOfTwoCalculator;

impl PowersOfTwoCalculator {
    pub fn compute(range: std::ops::RangeInclusive<u64>) -> Vec<u64> {
        range.map(|n| 1u64 << n).collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PowersOfTwoDomain;

impl Domain for PowersOfTwoDomain {
    fn genome_size(&self) -> usize {
        GENOME_SIZE
    }

    fn evaluate(&self, genome: &[u8]) -> f64 {
        let expected = PowersOfTwoCalculator::compute(PROBE_RANGE);
        let total: f64 = PROBE_RANGE
            .zip(expected.iter())
            .map(|(n, &exp)| {
                let actual = vm::run(genome, InstructionSet::PowersOfTwo, n, vm::MAX_STEPS);
                closeness_score(actual, exp)
            })
            .sum();
        total / expected.len() as f64
    }

    fn perfect_fitness(&self) -> f64 {
        0.999
    }

    fn display_result(&self, genome: &[u8]) -> String {
        let outputs: Vec<u64> = PROBE_RANGE
            .map(|n| vm::run(genome, InstructionSet::PowersOfTwo, n, vm::MAX_STEPS))
            .collect();
        format!("{outputs:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table_matches_spec_scenario() {
        assert_eq!(
            PowersOfTwoCalculator::compute(0..=9),
            vec![1, 2, 4, 8, 16, 32, 64, 128, 256, 512]
        );
    }

    #[test]
    fn identity_genome_scores_at_most_point_two() {
        // LOADN R0 at nucleo 0 (opcode 6), rest NOP: R0 := n for every probe.
        let mut genome = vec![0u8; GENOME_SIZE];
        genome[0] = 6;
        let score = PowersOfTwoDomain.evaluate(&genome);
        assert!(score <= 0.2, "score was {score}");
    }
}
