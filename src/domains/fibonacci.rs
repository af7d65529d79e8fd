//! The Fibonacci domain (spec.md §8 scenario 1): discover a nucleo program
//! over the reduced 9-opcode instruction set (no `DEC`/`DOUBLE`/`LOOP`)
//! whose straight-line body, re-executed `n` times, approximates `fib(n)`.

use super::closeness_score;
use crate::domain::Domain;
use crate::vm::{self, InstructionSet};

pub const NUCLEO_COUNT: usize = 16;
pub const GENOME_SIZE: usize = NUCLEO_COUNT * 3;

pub const PROBE_RANGE: std::ops::RangeInclusive<u64> = 0..=9;

fn fibonacci_sequence(range: std::ops::RangeInclusive<u64>) -> Vec<u64> {
    let mut a: u64 = 0;
    let mut b: u64 = 1;
    range
        .map(|_| {
            let current = a;
            let next = a.wrapping_add(b);
            a = b;
            b = next;
            current
        })
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct FibonacciDomain;

impl Domain for FibonacciDomain {
    fn genome_size(&self) -> usize {
        GENOME_SIZE
    }

    fn evaluate(&self, genome: &[u8]) -> f64 {
        let expected = fibonacci_sequence(PROBE_RANGE);
        let total: f64 = PROBE_RANGE
            .zip(expected.iter())
            .map(|(n, &exp)| {
                let actual = vm::run_repeated(genome, InstructionSet::Fibonacci, n, vm::MAX_STEPS);
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
            .map(|n| vm::run_repeated(genome, InstructionSet::Fibonacci, n, vm::MAX_STEPS))
            .collect();
        format!("{outputs:?}")
    }
}
