//! Neural-net-aware operators (spec.md §4.3). Carried as a pure operator
//! family for the legacy neural-net genome shape (813 bytes, weights/bias
//! layers) even though this crate ships no concrete neural-net `Domain` --
//! no domain in spec.md exercises it end-to-end, but §4.3 names the family
//! explicitly as one a caller may select.

use super::GenomeOperators;
use crate::genome::Genome;
use rand::Rng;

/// `layer_boundary` is the byte offset crossover swaps around (legacy net:
/// 765, the boundary between the hidden and output layer weights).
#[derive(Clone, Debug)]
pub struct NeuralOperators {
    pub layer_boundary: usize,
}

impl NeuralOperators {
    pub fn new(layer_boundary: usize) -> Self {
        Self { layer_boundary }
    }
}

fn apply_bounded_delta(rng: &mut dyn rand::RngCore, byte: u8) -> u8 {
    let delta: i32 = rng.gen_range(-20..=20);
    (byte as i32 + delta).clamp(0, 255) as u8
}

impl GenomeOperators for NeuralOperators {
    fn mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome {
        let mut out = genome.to_vec();
        let fraction = rng.gen_range(0.01..=0.05);
        let count = (((out.len() as f64) * fraction).round() as usize).max(1);
        for _ in 0..count {
            let idx = rng.gen_range(0..out.len());
            out[idx] = apply_bounded_delta(rng, out[idx]);
        }
        out
    }

    fn heavy_mutate(&self, rng: &mut dyn rand::RngCore, genome: &[u8]) -> Genome {
        let mut out = genome.to_vec();
        let fraction = rng.gen_range(0.10..=0.30);
        let count = (((out.len() as f64) * fraction).round() as usize).max(1);
        for _ in 0..count {
            let idx = rng.gen_range(0..out.len());
            out[idx] = rng.gen();
        }
        out
    }

    fn crossover(&self, _rng: &mut dyn rand::RngCore, a: &[u8], b: &[u8]) -> (Genome, Genome) {
        debug_assert_eq!(a.len(), b.len());
        let boundary = self.layer_boundary.min(a.len());
        let mut child1 = a[..boundary].to_vec();
        child1.extend_from_slice(&b[boundary..]);
        let mut child2 = b[..boundary].to_vec();
        child2.extend_from_slice(&a[boundary..]);
        (child1, child2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn crossover_swaps_at_layer_boundary() {
        let ops = NeuralOperators::new(765);
        let a = vec![1u8; 813];
        let b = vec![2u8; 813];
        let mut rng = SmallRng::seed_from_u64(9);
        let (c1, c2) = ops.crossover(&mut rng, &a, &b);
        assert!(c1[..765].iter().all(|&v| v == 1));
        assert!(c1[765..].iter().all(|&v| v == 2));
        assert!(c2[..765].iter().all(|&v| v == 2));
        assert!(c2[765..].iter().all(|&v| v == 1));
    }

    #[test]
    fn mutate_preserves_length_and_bounds() {
        let ops = NeuralOperators::new(765);
        let mut rng = SmallRng::seed_from_u64(2);
        let genome = vec![128u8; 813];
        let out = ops.mutate(&mut rng, &genome);
        assert_eq!(out.len(), genome.len());
    }
}
