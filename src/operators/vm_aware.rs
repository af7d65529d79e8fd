//! VM-aware operators (spec.md §4.3): identical shape to the byte
//! operators, but every mutated position is aligned to a 3-byte nucleo
//! boundary, opcode bytes are drawn from `[0, K)` and register bytes from
//! `[0, 4)`, and crossover points fall on nucleo boundaries.

use super::GenomeOperators;
use crate::genome::Genome;
use crate::vm::InstructionSet;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct VmAwareOperators {
    pub instruction_set: InstructionSet,
}

impl VmAwareOperators {
    pub fn new(instruction_set: InstructionSet) -> Self {
        Self { instruction_set }
    }

    fn randomize_nucleo<R: Rng + ?Sized>(&self, rng: &mut R, genome: &mut [u8], nucleo_index: usize) {
        let base = nucleo_index * 3;
        let k = self.instruction_set.opcode_count();
        genome[base] = rng.gen_range(0..k);
        genome[base + 1] = rng.gen_range(0u8..4);
        genome[base + 2] = rng.gen_range(0u8..4);
    }
}

impl GenomeOperators for VmAwareOperators {
    fn mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome {
        let mut out = genome.to_vec();
        let nucleo_count = out.len() / 3;
        if nucleo_count == 0 {
            return out;
        }
        let count = rng.gen_range(1..=3.min(nucleo_count));
        for _ in 0..count {
            let idx = rng.gen_range(0..nucleo_count);
            self.randomize_nucleo(rng, &mut out, idx);
        }
        out
    }

    fn heavy_mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome {
        let mut out = genome.to_vec();
        let nucleo_count = out.len() / 3;
        if nucleo_count == 0 {
            return out;
        }
        let fraction = rng.gen_range(0.20..=0.40);
        let count = ((nucleo_count as f64) * fraction).round() as usize;
        for _ in 0..count.max(1) {
            let idx = rng.gen_range(0..nucleo_count);
            self.randomize_nucleo(rng, &mut out, idx);
        }
        out
    }

    fn crossover(&self, rng: &mut dyn rand::RngCore, a: &[u8], b: &[u8]) -> (Genome, Genome) {
        debug_assert_eq!(a.len(), b.len());
        let nucleo_count = a.len() / 3;
        if nucleo_count < 2 {
            return (a.to_vec(), b.to_vec());
        }
        let mut p1 = rng.gen_range(0..nucleo_count) * 3;
        let mut p2 = rng.gen_range(0..nucleo_count) * 3;
        if p1 > p2 {
            std::mem::swap(&mut p1, &mut p2);
        }
        let mut child1 = a.to_vec();
        let mut child2 = b.to_vec();
        child1[p1..p2].copy_from_slice(&b[p1..p2]);
        child2[p1..p2].copy_from_slice(&a[p1..p2]);
        (child1, child2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn mutated_opcodes_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(11);
        let ops = VmAwareOperators::new(InstructionSet::PowersOfTwo);
        let genome = vec![0u8; 48];
        for _ in 0..20 {
            let mutated = ops.heavy_mutate(&mut rng, &genome);
            for chunk in mutated.chunks_exact(3) {
                assert!(chunk[0] < 12);
                assert!(chunk[1] < 4);
                assert!(chunk[2] < 4);
            }
        }
    }

    #[test]
    fn crossover_respects_nucleo_boundaries() {
        let mut rng = SmallRng::seed_from_u64(5);
        let ops = VmAwareOperators::new(InstructionSet::Fibonacci);
        let a = vec![1u8; 48];
        let b = vec![2u8; 48];
        let (c1, _c2) = ops.crossover(&mut rng, &a, &b);
        // Every byte of c1 equals 1 or 2, and the transition (if any)
        // falls on a multiple of 3.
        let mut last = c1[0];
        for (i, &byte) in c1.iter().enumerate() {
            if byte != last {
                assert_eq!(i % 3, 0);
            }
            last = byte;
        }
    }
}
