//! Plain byte operators (spec.md §4.3 "Byte operators"): no structural
//! awareness of what the bytes mean, just raw position mutation and
//! two-point crossover. The default family for domains with no internal
//! alignment requirement.

use super::GenomeOperators;
use crate::genome::Genome;
use rand::Rng;

#[derive(Clone, Debug, Default)]
pub struct ByteOperators;

impl GenomeOperators for ByteOperators {
    fn mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome {
        let mut out = genome.to_vec();
        let count = rng.gen_range(1..=3.min(out.len().max(1)));
        for _ in 0..count {
            let idx = rng.gen_range(0..out.len());
            out[idx] = rng.gen();
        }
        out
    }

    fn heavy_mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome {
        let mut out = genome.to_vec();
        let fraction = rng.gen_range(0.20..=0.40);
        let count = ((out.len() as f64) * fraction).round() as usize;
        for _ in 0..count.max(1) {
            let idx = rng.gen_range(0..out.len());
            out[idx] = rng.gen();
        }
        out
    }

    fn crossover(&self, rng: &mut dyn rand::RngCore, a: &[u8], b: &[u8]) -> (Genome, Genome) {
        debug_assert_eq!(a.len(), b.len());
        two_point_crossover(rng, a, b)
    }
}

/// Two-point byte-aligned swap: pick two cut points, swap the middle
/// segment between parents to produce two children of the parents' length.
pub fn two_point_crossover<R: Rng + ?Sized>(rng: &mut R, a: &[u8], b: &[u8]) -> (Genome, Genome) {
    let len = a.len();
    if len < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let mut p1 = rng.gen_range(0..len);
    let mut p2 = rng.gen_range(0..len);
    if p1 > p2 {
        std::mem::swap(&mut p1, &mut p2);
    }
    let mut child1 = a.to_vec();
    let mut child2 = b.to_vec();
    child1[p1..p2].copy_from_slice(&b[p1..p2]);
    child2[p1..p2].copy_from_slice(&a[p1..p2]);
    (child1, child2)
}
